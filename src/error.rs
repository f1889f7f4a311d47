//! Error types for the build reporter

use thiserror::Error;

/// Errors surfaced by the reporter.
///
/// Almost everything the reporter does is best-effort terminal output, so most
/// of these are logged and swallowed inside the lifecycle controller. The one
/// variant meant to reach the host is [`ReporterError::WarningsAsErrors`].
#[derive(Error, Debug)]
pub enum ReporterError {
    /// CI treats lint warnings as a failed build
    #[error(
        "Treating warnings as errors because process.env.CI = true.\nMost CI servers set it automatically.\n\n{0}"
    )]
    WarningsAsErrors(String),

    /// Bundler stats payload could not be understood
    #[error("Invalid build stats: {0}")]
    InvalidStats(String),

    /// Desktop notification could not be dispatched
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Signal handler could not be registered
    #[error("Signal handler error: {0}")]
    SignalHandler(#[from] ctrlc::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReporterError>;
