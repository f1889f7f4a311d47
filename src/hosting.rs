//! Package metadata and hosting instructions
//!
//! Reads `package.json` for the app name, the `homepage` field and a `deploy`
//! script, and turns them into the "what now" text printed after a
//! production build.

use console::style;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use url::Url;

use crate::error::Result;

/// Placeholder used when `package.json` is missing or unreadable.
pub const DEFAULT_APP_NAME: &str = "bundle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub scripts: HashMap<String, String>,
}

fn default_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            homepage: None,
            scripts: HashMap::new(),
        }
    }
}

impl PackageMetadata {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Like [`PackageMetadata::load`], but never fails.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(package) => package,
            Err(e) => {
                tracing::debug!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn has_deploy_script(&self) -> bool {
        self.scripts.contains_key("deploy")
    }
}

/// Inputs for the post-build hosting text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingInfo {
    pub app_name: String,
    pub homepage: Option<String>,
    pub has_deploy_script: bool,
    pub build_folder: String,
}

impl HostingInfo {
    pub fn new(package: &PackageMetadata, output_path: Option<&Path>) -> Self {
        let build_folder = output_path
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "build".to_string());

        Self {
            app_name: package.name.clone(),
            homepage: package.homepage.clone(),
            has_deploy_script: package.has_deploy_script(),
            build_folder,
        }
    }

    /// Path the app is served under: the path part of `homepage`, or `/`.
    /// Relative homepages (`/demo`, `.`) resolve against the server root.
    pub fn public_path(&self) -> String {
        let Some(homepage) = self.homepage.as_deref() else {
            return "/".to_string();
        };
        Url::parse(homepage)
            .or_else(|_| Url::parse("http://localhost/").and_then(|root| root.join(homepage)))
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| "/".to_string())
    }

    fn is_github_pages(&self) -> bool {
        self.homepage
            .as_deref()
            .is_some_and(|homepage| homepage.contains("github.io"))
    }
}

pub fn render_hosting_instructions(info: &HostingInfo) -> Vec<String> {
    let mut lines = Vec::new();
    let public_path = info.public_path();

    lines.push(format!(
        "The project was built assuming it is hosted at {}.",
        style(&public_path).green()
    ));
    lines.push(format!(
        "You can control this with the {} field in your {}.",
        style("homepage").green(),
        style("package.json").cyan()
    ));
    lines.push(String::new());
    lines.push(format!(
        "The {} folder is ready to be deployed.",
        style(&info.build_folder).cyan()
    ));

    if info.has_deploy_script {
        let target = info.homepage.as_deref().unwrap_or(public_path.as_str());
        lines.push(format!(
            "To publish it at {}, run {}.",
            style(target).green(),
            style("npm run deploy").cyan()
        ));
    } else if info.is_github_pages() {
        lines.push(format!(
            "To publish it to GitHub Pages, add a {} script that runs {} on the {} folder.",
            style("deploy").cyan(),
            style("gh-pages").cyan(),
            style(&info.build_folder).cyan()
        ));
    } else {
        lines.push("You may serve it with a static server:".to_string());
        lines.push(String::new());
        lines.push(format!("  {}", style("npm install -g serve").cyan()));
        lines.push(format!("  {} -s {}", style("serve").cyan(), info.build_folder));
    }

    lines.push(String::new());
    lines
}
