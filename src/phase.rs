//! Frame-loop state machine: Idle → Scheduled → Running → Scheduled → … with
//! Cancelled as the terminal state. Cancellation is valid from any state and
//! idempotent.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    /// A frame callback is registered and waiting on the next refresh.
    Scheduled,
    /// The frame callback is executing.
    Running,
    /// Terminal; no further frames will be scheduled.
    Cancelled,
}

impl FramePhase {
    /// A frame is pending or executing.
    pub fn is_live(self) -> bool {
        matches!(self, FramePhase::Scheduled | FramePhase::Running)
    }

    pub fn is_cancelled(self) -> bool {
        self == FramePhase::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::FramePhase;

    #[test]
    fn initial_phase_is_idle() {
        assert_eq!(FramePhase::default(), FramePhase::Idle);
        assert!(!FramePhase::Idle.is_live());
    }

    #[test]
    fn scheduled_and_running_are_live() {
        assert!(FramePhase::Scheduled.is_live());
        assert!(FramePhase::Running.is_live());
        assert!(!FramePhase::Cancelled.is_live());
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(FramePhase::Cancelled.is_cancelled());
        assert!(!FramePhase::Running.is_cancelled());
    }
}
