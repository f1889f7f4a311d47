//! Bundler `done` payload
//!
//! Mirrors the subset of webpack's `stats.toJson()` the reporter reads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ReporterError, Result};

/// A diagnostic as the bundler reports it: plain text (webpack ≤ 4) or an
/// object carrying `message` and optionally `moduleName` (webpack 5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDiagnostic {
    Text(String),
    #[serde(rename_all = "camelCase")]
    Object {
        message: String,
        #[serde(default)]
        module_name: Option<String>,
    },
}

impl RawDiagnostic {
    /// The multi-line text blob, resource first.
    pub fn to_text(&self) -> String {
        match self {
            RawDiagnostic::Text(text) => text.clone(),
            RawDiagnostic::Object {
                message,
                module_name: Some(module),
            } if !message.starts_with(module.as_str()) => format!("{}\n{}", module, message),
            RawDiagnostic::Object { message, .. } => message.clone(),
        }
    }
}

impl From<&str> for RawDiagnostic {
    fn from(text: &str) -> Self {
        RawDiagnostic::Text(text.to_string())
    }
}

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    #[serde(default)]
    pub errors: Vec<RawDiagnostic>,
    #[serde(default)]
    pub warnings: Vec<RawDiagnostic>,
    #[serde(default)]
    pub assets: Vec<AssetInfo>,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl BuildStats {
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ReporterError::InvalidStats(e.to_string()))
    }

    pub fn error_texts(&self) -> Vec<String> {
        self.errors.iter().map(RawDiagnostic::to_text).collect()
    }

    pub fn warning_texts(&self) -> Vec<String> {
        self.warnings.iter().map(RawDiagnostic::to_text).collect()
    }
}
