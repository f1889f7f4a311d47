//! Node bridge for the bundler plugin
//!
//! The JavaScript side is a thin adapter: it registers webpack's `compile`,
//! `invalid` and `done` hooks plus a process-death handler and forwards each
//! one to [`FormatMessagesPlugin`]. Desktop notifications come back in the
//! `done` report for JavaScript to dispatch.

use napi_derive::napi;

use crate::config::{PluginOptions, ReporterConfig};
use crate::exit::ExitReason;
use crate::lifecycle::{BuildLifecycleController, BuildOutcome};
use crate::lint_format::{format_lint_results, LintResult};
use crate::messages::normalize;
use crate::notify::{Notification, QueuedNotifier};
use crate::stats::BuildStats;
use crate::terminal::ConsoleTerminal;

#[napi(object)]
pub struct NotificationPayload {
    pub title: String,
    pub subtitle: Option<String>,
    pub message: String,
    pub icon: Option<String>,
}

impl From<Notification> for NotificationPayload {
    fn from(notification: Notification) -> Self {
        Self {
            title: notification.title,
            subtitle: notification.subtitle,
            message: notification.message,
            icon: notification
                .icon
                .map(|path| path.to_string_lossy().to_string()),
        }
    }
}

#[napi(object)]
pub struct DoneReport {
    /// `success`, `failed` or `warnings`
    pub outcome: String,
    pub messages: Vec<String>,
    pub notifications: Vec<NotificationPayload>,
}

#[napi(object)]
pub struct FormattedMessages {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[napi]
pub fn format_webpack_messages_native(errors: Vec<String>, warnings: Vec<String>) -> FormattedMessages {
    let batch = normalize(&errors, &warnings);
    FormattedMessages {
        errors: batch.errors.into_iter().map(|d| d.into_string()).collect(),
        warnings: batch.warnings.into_iter().map(|d| d.into_string()).collect(),
    }
}

#[napi]
pub fn format_lint_results_native(results: serde_json::Value) -> napi::Result<String> {
    let results: Vec<LintResult> = serde_json::from_value(results)
        .map_err(|e| napi::Error::from_reason(format!("Invalid lint results: {}", e)))?;
    Ok(format_lint_results(&results))
}

#[napi]
pub struct FormatMessagesPlugin {
    controller: BuildLifecycleController,
    notifications: QueuedNotifier,
}

#[napi]
impl FormatMessagesPlugin {
    #[napi(constructor)]
    pub fn new(options: Option<serde_json::Value>) -> napi::Result<Self> {
        crate::logging::init();

        let options: PluginOptions = match options {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| napi::Error::from_reason(format!("Invalid options: {}", e)))?,
            None => PluginOptions::default(),
        };
        let config = ReporterConfig::from_options(options);
        let notifications = QueuedNotifier::new();
        let terminal = ConsoleTerminal::new(config.is_tty);
        let controller = BuildLifecycleController::new(
            config,
            Box::new(terminal),
            Box::new(notifications.clone()),
        );

        Ok(Self {
            controller,
            notifications,
        })
    }

    #[napi]
    pub fn compile(&mut self) {
        self.controller.on_compile();
    }

    #[napi]
    pub fn invalid(&mut self) {
        self.controller.on_invalid();
    }

    #[napi]
    pub fn done(&mut self, stats: serde_json::Value) -> napi::Result<DoneReport> {
        let stats =
            BuildStats::from_json(stats).map_err(|e| napi::Error::from_reason(e.to_string()))?;
        let (decision, notifications) = self
            .controller
            .on_done_drained(&stats, &self.notifications)
            .map_err(|e| napi::Error::from_reason(e.to_string()))?;

        let outcome = match decision.outcome {
            BuildOutcome::Success => "success",
            BuildOutcome::Failed => "failed",
            BuildOutcome::Warnings => "warnings",
        };

        Ok(DoneReport {
            outcome: outcome.to_string(),
            messages: decision
                .messages
                .into_iter()
                .map(|d| d.into_string())
                .collect(),
            notifications: notifications
                .into_iter()
                .map(NotificationPayload::from)
                .collect(),
        })
    }

    #[napi]
    pub fn exit(&mut self, code: i32, signal: Option<String>) {
        let reason = match signal {
            Some(name) => ExitReason {
                code,
                signal: Some(name),
            },
            None => ExitReason::code(code),
        };
        self.controller.on_exit(reason);
    }
}
