//! Build Lifecycle Controller
//!
//! Receives the bundler's lifecycle events in order (compile → invalid → done
//! → … → exit), tracks session state across them, and decides what to show.
//!
//! ## Session State
//!
//! - `is_first_compile`: true until a build finishes without errors.
//! - `has_warnings` / `has_errors`: reset on every invalidation, set on `done`.
//! - `should_notify`: armed until a clean build has been announced; re-armed by
//!   any build with warnings or errors.
//!
//! Everything rendered here is best-effort. A terminal or notification failure
//! is logged and dropped; it never reaches the bundler. The only error a
//! handler returns is the CI warnings escalation from [`BuildLifecycleController::on_done`].

use std::io;

use crate::assets::measure_assets;
use crate::config::{Mode, ReporterConfig};
use crate::error::{ReporterError, Result};
use crate::exit::ExitReason;
use crate::hosting::HostingInfo;
use crate::messages::{DiagnosticBatch, MessageNormalizer, NormalizedDiagnostic};
use crate::notify::{NoopNotifier, Notification, Notifier, QueuedNotifier};
use crate::stats::BuildStats;
use crate::terminal::{ConsoleTerminal, SpinnerState, Terminal};
use crate::urls::{prepare_urls, AddressResolver, RouteProbe};

pub const MESSAGE_STARTING_DEV_SERVER: &str = "Starting the development server...";
pub const MESSAGE_CREATING_BUILD: &str = "Creating an optimized production build...";
pub const MESSAGE_COMPILING: &str = "Compiling...";
pub const MESSAGE_SUCCESS: &str = "Compiled successfully!";
pub const MESSAGE_WARN: &str = "Compiled with warnings.";
pub const MESSAGE_FAIL: &str = "Failed to compile.";

/// The four hooks a bundler adapter forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Compile,
    Invalid,
    Done(BuildStats),
    Exit(ExitReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed,
    Warnings,
}

impl BuildOutcome {
    pub fn banner(self) -> &'static str {
        match self {
            BuildOutcome::Success => MESSAGE_SUCCESS,
            BuildOutcome::Failed => MESSAGE_FAIL,
            BuildOutcome::Warnings => MESSAGE_WARN,
        }
    }

    fn spinner_state(self) -> SpinnerState {
        match self {
            BuildOutcome::Success => SpinnerState::Succeed,
            BuildOutcome::Failed => SpinnerState::Fail,
            BuildOutcome::Warnings => SpinnerState::Warn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub is_first_compile: bool,
    pub has_warnings: bool,
    pub has_errors: bool,
    pub should_notify: bool,
    pub has_exited: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            is_first_compile: true,
            has_warnings: false,
            has_errors: false,
            should_notify: true,
            has_exited: false,
        }
    }
}

/// What one `done` event should look like on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDecision {
    pub outcome: BuildOutcome,
    pub banner: &'static str,
    /// Errors are trimmed to the first one; warnings are shown in full
    pub messages: Vec<NormalizedDiagnostic>,
    pub notification: Option<Notification>,
    pub print_urls: bool,
    pub print_file_sizes: bool,
    pub print_hosting: bool,
}

pub struct BuildLifecycleController {
    config: ReporterConfig,
    normalizer: MessageNormalizer,
    state: SessionState,
    terminal: Box<dyn Terminal + Send>,
    notifier: Box<dyn Notifier + Send>,
    resolver: Box<dyn AddressResolver + Send>,
}

impl BuildLifecycleController {
    pub fn new(
        config: ReporterConfig,
        terminal: Box<dyn Terminal + Send>,
        notifier: Box<dyn Notifier + Send>,
    ) -> Self {
        Self {
            config,
            normalizer: MessageNormalizer::new(),
            state: SessionState::default(),
            terminal,
            notifier,
            resolver: Box::new(RouteProbe),
        }
    }

    /// Real console output, no desktop notifications.
    pub fn console(config: ReporterConfig) -> Self {
        let terminal = ConsoleTerminal::new(config.is_tty);
        Self::new(config, Box::new(terminal), Box::new(NoopNotifier))
    }

    pub fn with_address_resolver(mut self, resolver: Box<dyn AddressResolver + Send>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn handle(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::Compile => self.on_compile(),
            LifecycleEvent::Invalid => self.on_invalid(),
            LifecycleEvent::Done(stats) => {
                self.on_done(&stats)?;
            }
            LifecycleEvent::Exit(reason) => self.on_exit(reason),
        }
        Ok(())
    }

    pub fn on_compile(&mut self) {
        tracing::debug!(mode = ?self.config.mode, first = self.state.is_first_compile, "compile");

        self.ui(|t| t.stop_spinner());
        self.ui(|t| t.clear());

        let banner = self.starting_banner();
        self.ui(|t| t.start_spinner(banner));
    }

    pub fn on_invalid(&mut self) {
        tracing::debug!("invalid");

        self.state.has_warnings = false;
        self.state.has_errors = false;

        if self.config.mode.is_development() && !self.state.is_first_compile {
            self.ui(|t| t.stop_spinner());
            self.ui(|t| t.clear());
            self.ui(|t| t.start_spinner(MESSAGE_COMPILING));
        }
    }

    /// Normalize, decide, render. Fails only for warnings under CI.
    pub fn on_done(&mut self, stats: &BuildStats) -> Result<DisplayDecision> {
        let batch = self
            .normalizer
            .normalize(stats.error_texts(), stats.warning_texts());
        tracing::debug!(
            errors = batch.errors.len(),
            warnings = batch.warnings.len(),
            "done"
        );

        let decision = self.decide(batch);
        self.render(&decision, stats);

        if self.config.is_ci && decision.outcome == BuildOutcome::Warnings {
            let warnings = decision
                .messages
                .iter()
                .map(NormalizedDiagnostic::text)
                .collect::<Vec<_>>()
                .join("\n\n");
            return Err(ReporterError::WarningsAsErrors(warnings));
        }

        Ok(decision)
    }

    /// [`on_done`](Self::on_done) for a controller whose notifier shares `queue`.
    /// The queue is emptied even when the build is escalated, so nothing queued
    /// here leaks into the next build's report.
    pub fn on_done_drained(
        &mut self,
        stats: &BuildStats,
        queue: &QueuedNotifier,
    ) -> Result<(DisplayDecision, Vec<Notification>)> {
        let result = self.on_done(stats);
        let notifications = queue.drain();
        result.map(|decision| (decision, notifications))
    }

    /// Runs at most once per session.
    pub fn on_exit(&mut self, reason: ExitReason) {
        if self.state.has_exited {
            return;
        }
        self.state.has_exited = true;
        tracing::debug!(code = reason.code, signal = ?reason.signal, "exit");

        self.ui(|t| t.stop_spinner());

        // Interrupting a build leaves its output on screen
        if !self.config.mode.is_production() && !reason.is_interrupt() {
            self.ui(|t| t.clear());
        }
    }

    /// State transition for a `done` event.
    pub fn decide(&mut self, batch: DiagnosticBatch) -> DisplayDecision {
        let DiagnosticBatch {
            mut errors,
            warnings,
        } = batch;
        let mode = self.config.mode;

        self.state.has_errors = !errors.is_empty();
        self.state.has_warnings = !warnings.is_empty();

        let (outcome, messages, notification) = if self.state.has_errors {
            // Later errors are usually echoes of the first
            errors.truncate(1);
            let notification = self
                .config
                .notifications
                .then(|| Notification::from_diagnostic(&errors[0]));
            self.state.should_notify = true;
            (BuildOutcome::Failed, errors, notification)
        } else if self.state.has_warnings {
            let notification = self
                .config
                .notifications
                .then(|| Notification::from_diagnostic(&warnings[0]));
            self.state.should_notify = true;
            (BuildOutcome::Warnings, warnings, notification)
        } else {
            let announce = self.config.notifications
                && self.state.should_notify
                && matches!(mode, Mode::Development | Mode::Production);
            let notification = announce.then(|| Notification::new(MESSAGE_SUCCESS));
            self.state.should_notify = false;
            (BuildOutcome::Success, Vec::new(), notification)
        };

        let is_clean = outcome == BuildOutcome::Success;
        let decision = DisplayDecision {
            outcome,
            banner: outcome.banner(),
            messages,
            notification: notification.map(|n| n.with_icon(self.config.icon.clone())),
            print_urls: mode.is_development() && self.config.has_dev_server() && is_clean,
            print_file_sizes: mode.is_production() && !self.state.has_errors,
            print_hosting: mode.is_production() && !self.state.has_errors,
        };

        if !self.state.has_errors {
            self.state.is_first_compile = false;
        }

        decision
    }

    fn starting_banner(&self) -> &'static str {
        match self.config.mode {
            Mode::Development if self.config.has_dev_server() && self.state.is_first_compile => {
                MESSAGE_STARTING_DEV_SERVER
            }
            Mode::Production => MESSAGE_CREATING_BUILD,
            _ => MESSAGE_COMPILING,
        }
    }

    fn render(&mut self, decision: &DisplayDecision, stats: &BuildStats) {
        self.ui(|t| t.stop_spinner());
        self.ui(|t| t.clear());

        let state = decision.outcome.spinner_state();
        self.ui(|t| {
            t.finish_spinner(state, decision.banner)?;
            t.write_line("")
        });

        if !decision.messages.is_empty() {
            let body = decision
                .messages
                .iter()
                .map(NormalizedDiagnostic::styled)
                .collect::<Vec<_>>()
                .join("\n\n");
            self.ui(|t| {
                t.write_line(&body)?;
                t.write_line("")
            });
        }

        if let Some(notification) = &decision.notification {
            if let Err(e) = self.notifier.notify(notification) {
                tracing::warn!("Notification dropped: {}", e);
            }
        }

        if decision.print_urls {
            let urls = self
                .config
                .dev_server
                .as_ref()
                .map(|options| prepare_urls(options, self.resolver.as_ref()));
            if let Some(urls) = urls {
                let app_name = self.config.package.name.clone();
                self.ui(|t| t.print_urls(&app_name, &urls));
            }
        }

        if decision.print_file_sizes {
            let sizes = match &stats.output_path {
                Some(output_path) => {
                    measure_assets(output_path, &stats.assets, &self.config.thresholds)
                }
                None => Vec::new(),
            };
            self.ui(|t| t.print_file_sizes(&sizes));
        }

        if decision.print_hosting {
            let info = HostingInfo::new(&self.config.package, stats.output_path.as_deref());
            self.ui(|t| t.print_hosting_instructions(&info));
        }
    }

    fn ui<F>(&mut self, action: F)
    where
        F: FnOnce(&mut (dyn Terminal + Send)) -> io::Result<()>,
    {
        if let Err(e) = action(self.terminal.as_mut()) {
            tracing::warn!("Terminal output failed: {}", e);
        }
    }
}
