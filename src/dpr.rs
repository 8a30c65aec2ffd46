//! Device-pixel-ratio resolution.
//!
//! The host element may carry a `dpr` attribute holding a string-encoded
//! positive float that overrides the platform-reported ratio. Anything
//! absent, non-numeric, non-finite or non-positive falls back.

/// Resolve the effective device pixel ratio from an optional attribute value
/// and the platform-reported ratio.
pub fn resolve(attr: Option<&str>, platform: f64) -> f64 {
    attr.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(platform)
}
