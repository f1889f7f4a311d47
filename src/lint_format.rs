//! ESLint formatter
//!
//! Renders lint results as compact `Line N:  message  rule` tables, the format
//! the message normalizer and notification summaries expect to find on line 2.
//! Once an error shows up, warnings are no longer listed.

use console::{measure_text_width, style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub severity: u8,
    #[serde(default)]
    pub fatal: bool,
    pub message: String,
    #[serde(default)]
    pub rule_id: Option<String>,
}

impl LintMessage {
    pub fn is_error(&self) -> bool {
        self.fatal || self.severity == 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub messages: Vec<LintMessage>,
}

/// Left-aligned columns separated by two spaces, trailing whitespace trimmed.
fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| measure_text_width(cell))
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    let padding = widths[col].saturating_sub(measure_text_width(cell));
                    format!("{}{}", cell, " ".repeat(padding))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_lint_results(results: &[LintResult]) -> String {
    let mut output = String::from("\n");
    let mut has_errors = false;
    let mut reports_error_rules = false;

    for result in results {
        if result.messages.is_empty() {
            continue;
        }

        let mut rows: Vec<(bool, Vec<String>)> = result
            .messages
            .iter()
            .map(|message| {
                let is_error = message.is_error();
                if is_error {
                    has_errors = true;
                    reports_error_rules |= message.rule_id.is_some();
                }

                let rule = message.rule_id.clone().unwrap_or_default();
                let rule = if is_error {
                    style(rule).red().to_string()
                } else {
                    style(rule).yellow().to_string()
                };

                let row = vec![
                    String::new(),
                    style(format!("Line {}:", message.line.unwrap_or(0)))
                        .cyan()
                        .to_string(),
                    message
                        .message
                        .strip_suffix('.')
                        .unwrap_or(&message.message)
                        .to_string(),
                    rule,
                ];
                (is_error, row)
            })
            .collect();

        if has_errors {
            rows.retain(|(is_error, _)| *is_error);
        }

        let rows: Vec<Vec<String>> = rows.into_iter().map(|(_, row)| row).collect();
        output.push_str(&render_table(&rows));
        output.push_str("\n\n");
    }

    if reports_error_rules {
        output.push_str(&format!(
            "Search for the {} to learn more about each error.\nTo ignore, add {} to the line before.",
            style("keywords").yellow(),
            style("// eslint-disable-next-line").dim()
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(value: serde_json::Value) -> Vec<LintResult> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_warnings_only() {
        let output = format_lint_results(&results(json!([{
            "filePath": "/app/src/a.js",
            "messages": [
                { "line": 3, "severity": 1, "message": "Unexpected console statement.", "ruleId": "no-console" },
                { "line": 10, "severity": 1, "message": "Missing semicolon.", "ruleId": "semi" }
            ]
        }])));
        let plain = console::strip_ansi_codes(&output).to_string();

        assert!(plain.starts_with('\n'));
        assert!(plain.contains("  Line 3:   Unexpected console statement  no-console"));
        assert!(plain.contains("  Line 10:  Missing semicolon             semi"));
        assert!(!plain.contains("Search for the"));
    }

    #[test]
    fn test_errors_hide_warnings() {
        let output = format_lint_results(&results(json!([{
            "filePath": "/app/src/a.js",
            "messages": [
                { "line": 1, "severity": 1, "message": "warn me", "ruleId": "semi" },
                { "line": 2, "severity": 2, "message": "'x' is not defined.", "ruleId": "no-undef" }
            ]
        }])));
        let plain = console::strip_ansi_codes(&output).to_string();

        assert!(plain.contains("Line 2:  'x' is not defined  no-undef"));
        assert!(!plain.contains("warn me"));
        assert!(plain.contains("Search for the keywords to learn more about each error."));
    }

    #[test]
    fn test_fatal_without_rule() {
        let output = format_lint_results(&results(json!([
            { "filePath": "/app/src/empty.js", "messages": [] },
            {
                "filePath": "/app/src/b.js",
                "messages": [{ "line": 5, "fatal": true, "message": "Parsing error: Unexpected token" }]
            }
        ])));
        let plain = console::strip_ansi_codes(&output).to_string();

        assert!(plain.contains("  Line 5:  Parsing error: Unexpected token"));
        assert!(!plain.contains("Search for the"));
    }
}
