//! Feature-gated tracing of internal values, off by default and fully
//! compiled out unless the `ed25519-debug` feature is enabled.

#[cfg(feature = "ed25519-debug")]
use std::sync::OnceLock;

#[cfg(feature = "ed25519-debug")]
fn is_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("ED25519_CORE_DEBUG").is_ok())
}

#[cfg(not(feature = "ed25519-debug"))]
#[inline(always)]
fn is_enabled() -> bool {
    false
}

/// Logs `message()` to stderr if debug tracing is enabled. The closure
/// is not invoked at all when the feature is off, so formatting cost
/// disappears from release builds.
pub fn log<F>(message: F)
where
    F: FnOnce() -> String,
{
    if is_enabled() {
        eprintln!("{}", message());
    }
}
