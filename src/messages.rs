//! Message Normalizer
//!
//! Turns raw bundler diagnostics into something a person can read in a terminal.
//! Every diagnostic goes through the same fixed sequence of textual rewrites:
//!
//! 1. Drop ` @ ` dependency-trace lines and stack frames that do not point
//!    into the bundler's virtual filesystem.
//! 2. Drop the blank separator some backends put after the resource line.
//! 3. Strip loader notation (`babel-loader!./src/a.js` → `./src/a.js`).
//! 4. Clean up `Module not found`, syntax-error and missing-export templates.
//!
//! Line 1 of a diagnostic is the resource, line 2 the primary message. Anything
//! too short to have both is passed through untouched.

use console::style;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Substring that marks a diagnostic as a genuine parse failure.
pub const SYNTAX_ERROR_MARKER: &str = "Syntax error:";

/// Noise removed from `Module not found:` messages, applied in this order.
const MODULE_NOT_FOUND_NOISE: &[&str] = &[
    "Cannot resolve 'file' or 'directory' ",
    "Cannot resolve module ",
    "Error: ",
    "[CaseSensitivePathsPlugin] ",
];

lazy_static! {
    /// `<context> export '<name>' was not found in '<module>'`, context optional
    static ref EXPORT_NOT_FOUND_RE: Regex =
        Regex::new(r#"^\s*(?:(.+?)\s*)?(")?export '(.+?)' was not found in '(.+?)'"#).unwrap();

    /// `at <location>:<line>:<col>` stack frames
    static ref STACK_FRAME_RE: Regex = Regex::new(r"^\s*at\s.*:\d+:\d+[\s)]*$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// NORMALIZED TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// A diagnostic after the rewrite rules ran. Plain text, no terminal styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedDiagnostic(String);

impl NormalizedDiagnostic {
    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.split('\n')
    }

    /// Line 1: the resource the diagnostic is about
    pub fn resource(&self) -> &str {
        self.lines().next().unwrap_or_default()
    }

    /// Line 2: the primary message, if there is one
    pub fn primary(&self) -> Option<&str> {
        self.lines().nth(1)
    }

    pub fn is_likely_syntax_error(&self) -> bool {
        self.0.contains(SYNTAX_ERROR_MARKER)
    }

    /// Terminal rendering with the resource line shown in inverse video.
    pub fn styled(&self) -> String {
        match self.0.split_once('\n') {
            Some((resource, rest)) => format!("{}\n{}", style(resource).reverse(), rest),
            None => style(&self.0).reverse().to_string(),
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cleaned errors and warnings from one `done` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticBatch {
    pub errors: Vec<NormalizedDiagnostic>,
    pub warnings: Vec<NormalizedDiagnostic>,
}

impl DiagnosticBatch {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NORMALIZER
// ═══════════════════════════════════════════════════════════════════════════════

/// Stateless normalizer; the lifecycle controller owns one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageNormalizer;

impl MessageNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize<E, W>(&self, raw_errors: E, raw_warnings: W) -> DiagnosticBatch
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        normalize(raw_errors, raw_warnings)
    }
}

/// Normalize a whole batch, masking non-syntax errors when a syntax error is present.
pub fn normalize<E, W>(raw_errors: E, raw_warnings: W) -> DiagnosticBatch
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    W: IntoIterator,
    W::Item: AsRef<str>,
{
    let mut errors: Vec<NormalizedDiagnostic> = raw_errors
        .into_iter()
        .map(|raw| format_message(raw.as_ref()))
        .collect();
    let warnings = raw_warnings
        .into_iter()
        .map(|raw| format_message(raw.as_ref()))
        .collect();

    // A real syntax error tends to drag parser noise along with it
    if errors.iter().any(NormalizedDiagnostic::is_likely_syntax_error) {
        errors.retain(NormalizedDiagnostic::is_likely_syntax_error);
    }

    DiagnosticBatch { errors, warnings }
}

/// Apply the rewrite pipeline to a single diagnostic.
pub fn format_message(raw: &str) -> NormalizedDiagnostic {
    // Noise goes before the blank-line collapse so it cannot reopen a gap at line 2
    let mut lines: Vec<String> = raw
        .split('\n')
        .enumerate()
        .filter(|&(idx, line)| idx == 0 || !is_noise_line(line))
        .map(|(_, line)| line.to_string())
        .collect();

    while lines.len() > 2 && lines[1].is_empty() {
        lines.remove(1);
    }

    if let Some(bang) = lines[0].rfind('!') {
        lines[0] = lines[0][bang + 1..].to_string();
    }

    if lines.len() < 2 || lines[0].is_empty() || lines[1].is_empty() {
        return NormalizedDiagnostic(lines.join("\n"));
    }

    if lines[1].starts_with("Module not found: ") {
        let cleaned = MODULE_NOT_FOUND_NOISE
            .iter()
            .fold(lines[1].clone(), |acc, noise| acc.replacen(noise, "", 1));
        lines.truncate(2);
        lines[1] = cleaned;
    }

    if lines[1].starts_with("Module build failed: ") {
        lines[1] = lines[1].replacen("Module build failed: SyntaxError:", SYNTAX_ERROR_MARKER, 1);
    }

    if EXPORT_NOT_FOUND_RE.is_match(&lines[1]) {
        let resource = &lines[0];
        let rewritten = EXPORT_NOT_FOUND_RE
            .replace(&lines[1], |caps: &Captures| {
                let context = caps.get(1).map_or(resource.as_str(), |m| m.as_str());
                format!(
                    "{} '{}' does not contain an export named '{}'.",
                    context, &caps[4], &caps[3]
                )
            })
            .into_owned();
        lines[1] = rewritten;
    }

    NormalizedDiagnostic(lines.join("\n").trim_end().to_string())
}

/// Dependency traces, and stack frames unless they point at `webpack:` sources.
fn is_noise_line(line: &str) -> bool {
    line.starts_with(" @ ") || (STACK_FRAME_RE.is_match(line) && !line.contains("webpack:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_passes_through() {
        assert_eq!(format_message("./src/a.js").text(), "./src/a.js");
        assert_eq!(format_message("").text(), "");
    }

    #[test]
    fn test_blank_separator_removed() {
        let msg = format_message("./src/a.js\n\nSomething broke\ndetail");
        assert_eq!(msg.text(), "./src/a.js\nSomething broke\ndetail");
    }

    #[test]
    fn test_blank_second_line_kept_for_two_lines() {
        let msg = format_message("./src/a.js\n");
        assert_eq!(msg.text(), "./src/a.js\n");
    }

    #[test]
    fn test_noise_lines() {
        assert!(is_noise_line("    at Object.<anonymous> (/app/node_modules/x.js:10:5)"));
        assert!(is_noise_line(" @ ./src/index.js 3:0-20"));
        assert!(!is_noise_line("    at webpack:///./src/a.js:1:1"));
        assert!(!is_noise_line("  3 | const at = 1;"));
    }

    #[test]
    fn test_styled_keeps_body() {
        let msg = format_message("./src/a.js\nBroken");
        let styled = msg.styled();
        assert!(styled.contains("./src/a.js"));
        assert!(styled.ends_with("\nBroken"));
    }
}
