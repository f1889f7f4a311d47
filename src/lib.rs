//! # Format Messages (Native)
//!
//! Terminal and desktop reporting for bundler builds.
//!
//! ## Pipeline
//!
//! 1. **Events**: the bundler adapter forwards `compile`, `invalid`, `done` and
//!    process exit, in order, to a [`BuildLifecycleController`].
//! 2. **Normalization**: on `done`, raw diagnostics go through the
//!    [`MessageNormalizer`]. Loader prefixes, trace lines and foreign stack
//!    frames are stripped; known templates are rewritten.
//! 3. **Decision**: session state plus the normalized batch yield a
//!    [`DisplayDecision`]: banner, messages, notification, URL and size output.
//! 4. **Rendering**: the decision is drawn through a [`Terminal`] and a
//!    [`Notifier`]. Render failures are logged, never propagated.
//!
//! ## Display Rules
//!
//! - At most one error is shown per build, always with its resource path.
//! - If any error is a syntax error, only syntax errors are kept.
//! - Warnings are shown only when there are no errors.
//! - Under CI, a build that ends with warnings is reported as an error.

#[cfg(feature = "napi")]
mod plugin;

pub mod assets;
pub mod config;
pub mod error;
pub mod exit;
pub mod hosting;
pub mod lifecycle;
pub mod lint_format;
pub mod logging;
pub mod messages;
pub mod notify;
pub mod stats;
pub mod terminal;
pub mod urls;


#[cfg(feature = "napi")]
pub use plugin::{format_lint_results_native, format_webpack_messages_native, FormatMessagesPlugin};

pub use config::{DevServerOptions, Mode, PluginOptions, ReporterConfig};
pub use error::{ReporterError, Result};
pub use exit::ExitReason;
pub use lifecycle::{
    BuildLifecycleController, BuildOutcome, DisplayDecision, LifecycleEvent, SessionState,
};
pub use messages::{
    format_message, normalize, DiagnosticBatch, MessageNormalizer, NormalizedDiagnostic,
};
pub use notify::{Notification, Notifier};
pub use stats::BuildStats;
pub use terminal::{SpinnerState, Terminal};
