//! Small host-environment helpers.

pub mod jwt;

/// Milliseconds since the Unix epoch. Zero outside the browser; callers
/// that need determinism pass their own timestamps instead.
pub fn now_ms() -> f64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0.0
    }
}
