//! Fatal environment errors.
//!
//! The render core has no recoverable error path: an environment that cannot
//! meet the engine's minimum contract (API version, entry points, device
//! memory, shaders) ends the process with a diagnostic.

use std::fmt::Display;

/// Log `message`, print it to stderr and abort the process.
#[cold]
pub fn fatal(message: impl Display) -> ! {
    let message = message.to_string();
    tracing::error!(target: "duskforge::fatal", "{message}");
    eprintln!("FATAL: {message}");
    std::process::abort()
}

/// Unwrap a backend result, aborting with `what` and the backend's message on
/// failure.
pub fn expect_backend<T, E: Display>(result: Result<T, E>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => fatal(format_args!("{what}: {e}")),
    }
}
