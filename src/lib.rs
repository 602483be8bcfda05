//! Adhera core: medication-adherence risk assessment for a patient-facing
//! check-in form.
//!
//! The crate owns everything behind the form's single "Check My Risk"
//! control: the deterministic clinical scorer with its optional AI second
//! opinion, plus the in-memory session state the host shell binds its
//! widgets to. Rendering is the shell's job; nothing here draws.

pub mod assessment;
pub mod config;
pub mod credential;
pub mod models;
pub mod scoring;
pub mod session;
pub mod validator;

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. The host shell calls this once at
/// startup; honors `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
