//! Application-level constants and defaults.

/// Application name shown by the host shell.
pub const APP_NAME: &str = "Adhera";

/// Crate version, reported alongside assessment telemetry.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}
