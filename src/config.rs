//! Reporter Configuration
//!
//! Everything the reporter needs to know about its environment is captured
//! once, when the reporter is built. Handlers never look at process state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assets::SizeThresholds;
use crate::hosting::PackageMetadata;

/// Build mode, derived from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
    Other,
}

impl Mode {
    /// Unset `NODE_ENV` counts as development.
    pub fn from_node_env(value: Option<&str>) -> Self {
        match value {
            None | Some("development") => Mode::Development,
            Some("production") => Mode::Production,
            Some(_) => Mode::Other,
        }
    }

    pub fn is_development(self) -> bool {
        self == Mode::Development
    }

    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

/// `CI` is on when set to anything but `false` (any case).
pub fn ci_from_env(value: Option<&str>) -> bool {
    match value {
        Some(v) => !v.eq_ignore_ascii_case("false"),
        None => false,
    }
}

/// The `devServer` block of the bundler config; its presence enables URL output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerOptions {
    #[serde(default)]
    pub https: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for DevServerOptions {
    fn default() -> Self {
        Self {
            https: false,
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Options handed over by the bundler plugin adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    #[serde(default)]
    pub notifications: bool,
    #[serde(default)]
    pub dev_server: Option<DevServerOptions>,
    /// Path to `package.json`, used for the app name and hosting instructions
    #[serde(default)]
    pub package_json: Option<PathBuf>,
    #[serde(default)]
    pub icon: Option<PathBuf>,
    #[serde(default)]
    pub max_bundle_gzip_size: Option<u64>,
    #[serde(default)]
    pub max_chunk_gzip_size: Option<u64>,
}

/// Immutable configuration for one reporter session.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    pub mode: Mode,
    pub is_ci: bool,
    pub is_tty: bool,
    pub notifications: bool,
    pub dev_server: Option<DevServerOptions>,
    pub icon: Option<PathBuf>,
    pub package: PackageMetadata,
    pub thresholds: SizeThresholds,
}

impl ReporterConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            is_ci: false,
            is_tty: false,
            notifications: false,
            dev_server: None,
            icon: None,
            package: PackageMetadata::default(),
            thresholds: SizeThresholds::default(),
        }
    }

    /// Read `NODE_ENV`, `CI` and stdout TTY capability from the process.
    pub fn from_env() -> Self {
        let node_env = std::env::var("NODE_ENV").ok();
        let ci = std::env::var("CI").ok();

        let mut config = Self::new(Mode::from_node_env(node_env.as_deref()));
        config.is_ci = ci_from_env(ci.as_deref());
        config.is_tty = console::Term::stdout().is_term();
        config
    }

    /// Environment capture plus the adapter's options.
    pub fn from_options(options: PluginOptions) -> Self {
        let package = match &options.package_json {
            Some(path) => PackageMetadata::load_or_default(path),
            None => PackageMetadata::default(),
        };

        let mut thresholds = SizeThresholds::default();
        if let Some(size) = options.max_bundle_gzip_size {
            thresholds.bundle = size;
        }
        if let Some(size) = options.max_chunk_gzip_size {
            thresholds.chunk = size;
        }

        Self::from_env()
            .with_notifications(options.notifications)
            .with_dev_server(options.dev_server)
            .with_icon(options.icon)
            .with_package(package)
            .with_thresholds(thresholds)
    }

    pub fn with_ci(mut self, is_ci: bool) -> Self {
        self.is_ci = is_ci;
        self
    }

    pub fn with_tty(mut self, is_tty: bool) -> Self {
        self.is_tty = is_tty;
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    pub fn with_dev_server(mut self, dev_server: Option<DevServerOptions>) -> Self {
        self.dev_server = dev_server;
        self
    }

    pub fn with_icon(mut self, icon: Option<PathBuf>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_package(mut self, package: PackageMetadata) -> Self {
        self.package = package;
        self
    }

    pub fn with_thresholds(mut self, thresholds: SizeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn has_dev_server(&self) -> bool {
        self.dev_server.is_some()
    }
}
