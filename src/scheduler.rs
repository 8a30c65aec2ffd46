//! Host-signal subscriptions: the self-rescheduling animation-frame loop and
//! the window resize listener, both held as explicit handles so teardown can
//! release them deterministically.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::{js_text, RenderError};
use crate::phase::FramePhase;

struct LoopState {
    phase: FramePhase,
    /// At most one outstanding `requestAnimationFrame` registration.
    pending: Option<i32>,
    /// The frame callback keeps itself alive through this slot; it is taken
    /// out on cancellation, which also breaks the `Rc` cycle.
    callback: Option<Closure<dyn FnMut(f64)>>,
}

/// The per-refresh draw-loop driver. Each invocation of the callback draws
/// and re-registers itself, so the loop pauses and resumes with the host's
/// frame signal and runs until [`FrameLoop::cancel`].
pub(crate) struct FrameLoop {
    window: Window,
    state: Rc<RefCell<LoopState>>,
}

impl FrameLoop {
    /// Register the first frame. `tick` receives the host-supplied timestamp,
    /// which is monotonically non-decreasing across invocations.
    pub fn start(window: Window, mut tick: impl FnMut(f64) + 'static) -> Result<Self, RenderError> {
        let state = Rc::new(RefCell::new(LoopState {
            phase: FramePhase::Idle,
            pending: None,
            callback: None,
        }));

        let inner = Rc::clone(&state);
        let inner_window = window.clone();
        let callback = Closure::wrap(Box::new(move |timestamp: f64| {
            {
                let mut state = inner.borrow_mut();
                if !state.phase.is_live() {
                    return;
                }
                state.phase = FramePhase::Running;
                state.pending = None;
            }

            tick(timestamp);

            let mut state = inner.borrow_mut();
            // Cancelled synchronously from within the tick.
            if !state.phase.is_live() {
                return;
            }
            let next = state
                .callback
                .as_ref()
                .map(|cb| inner_window.request_animation_frame(cb.as_ref().unchecked_ref()));
            match next {
                Some(Ok(handle)) => {
                    state.pending = Some(handle);
                    state.phase = FramePhase::Scheduled;
                }
                // The host refused to schedule; the loop ends here.
                Some(Err(_)) => state.phase = FramePhase::Cancelled,
                None => {}
            }
        }) as Box<dyn FnMut(f64)>);

        let handle = window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| RenderError::Initialization(js_text(&e)))?;
        {
            let mut state = state.borrow_mut();
            state.callback = Some(callback);
            state.pending = Some(handle);
            state.phase = FramePhase::Scheduled;
        }

        Ok(Self { window, state })
    }

    /// Cancel the pending registration, if any, and stop the loop for good.
    /// Idempotent; once this returns no further frame callback will fire.
    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        if state.phase.is_cancelled() {
            return;
        }
        if let Some(handle) = state.pending.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        state.phase = FramePhase::Cancelled;
        state.callback = None;
    }
}

/// Explicit handle for the window `resize` listener. Dropping without
/// [`ResizeSubscription::unsubscribe`] leaks the listener, so teardown always
/// calls it.
pub(crate) struct ResizeSubscription {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeSubscription {
    pub fn subscribe(
        window: &Window,
        handler: impl FnMut() + 'static,
    ) -> Result<Self, RenderError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            .map_err(|e| RenderError::Initialization(js_text(&e)))?;
        Ok(Self {
            window: window.clone(),
            callback,
        })
    }

    pub fn unsubscribe(self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
    }
}
