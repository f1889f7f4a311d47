//! Desktop notifications
//!
//! The reporter decides *what* to notify; delivering it is up to a [`Notifier`].
//! Under the Node bridge the payloads are queued and handed back to JavaScript,
//! which owns the platform notification service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{ReporterError, Result};
use crate::messages::NormalizedDiagnostic;

pub const NOTIFICATION_TITLE: &str = "Webpack";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub message: String,
    #[serde(default)]
    pub icon: Option<PathBuf>,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            subtitle: None,
            message: message.into(),
            icon: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon(mut self, icon: Option<PathBuf>) -> Self {
        self.icon = icon;
        self
    }

    /// Body built from the first line pair of a diagnostic.
    pub fn from_diagnostic(diagnostic: &NormalizedDiagnostic) -> Self {
        Self::new(diagnostic_summary(diagnostic)).with_subtitle(resource_file(diagnostic))
    }
}

pub trait Notifier {
    fn notify(&mut self, notification: &Notification) -> Result<()>;
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&mut self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

/// Keeps notifications until someone drains them. Clones share one queue, so
/// the bridge can hold a handle while the controller owns the notifier.
#[derive(Debug, Clone, Default)]
pub struct QueuedNotifier {
    pending: Arc<Mutex<Vec<Notification>>>,
}

impl QueuedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.pending
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<()> {
        self.pending
            .lock()
            .map_err(|_| ReporterError::Notification("notification queue poisoned".to_string()))?
            .push(notification.clone());
        Ok(())
    }
}

fn resource_file(diagnostic: &NormalizedDiagnostic) -> String {
    diagnostic
        .resource()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// `message [file]`, or `ESLint: message (line N) [file]` for lint output.
pub fn diagnostic_summary(diagnostic: &NormalizedDiagnostic) -> String {
    let file = resource_file(diagnostic);
    let message = diagnostic.primary().unwrap_or_default().trim();

    // ESLint rows look like "Line 12:  'x' is not defined  no-undef"
    if message.starts_with("Line ") {
        let mut columns = message.split("  ");
        let position = columns.next().unwrap_or_default();
        let text = columns.next().unwrap_or_default();
        let line = position.to_lowercase();
        let line = line.strip_suffix(':').unwrap_or(&line);

        format!("ESLint: {} ({}) [{}]", text, line, file)
    } else {
        format!("{} [{}]", message, file)
    }
}
