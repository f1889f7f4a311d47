//! Asset size report
//!
//! Gzips every emitted JS/CSS file, sorts them largest first and flags
//! bundles that are big enough to hurt page load.

use console::{measure_text_width, style};
use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::stats::AssetInfo;

/// Gzip sizes above which an asset is called out as large.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeThresholds {
    /// Applies to the `main.*` entry bundle
    pub bundle: u64,
    /// Applies to every other chunk
    pub chunk: u64,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            bundle: 512 * 1024,
            chunk: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSize {
    /// Output folder name joined with the asset's directory, e.g. `build/js`
    pub folder: String,
    pub name: String,
    /// Gzipped size in bytes
    pub size: u64,
    pub label: String,
    pub is_large: bool,
}

fn is_reported(name: &str) -> bool {
    name.ends_with(".js") || name.ends_with(".css")
}

fn is_main_bundle(name: &str) -> bool {
    name.starts_with("main.")
}

pub fn gzip_size(contents: &[u8]) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents)?;
    Ok(encoder.finish()?.len() as u64)
}

/// Human-readable byte count: `512 B`, `48.05 KB`, `1.20 MB`.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let value = bytes as f64;
    if value < KB {
        format!("{} B", bytes)
    } else if value < MB {
        format!("{:.2} KB", value / KB)
    } else {
        format!("{:.2} MB", value / MB)
    }
}

/// Measure the gzip size of every JS/CSS asset under `output_path`.
/// Files that cannot be read are left out of the report.
pub fn measure_assets(
    output_path: &Path,
    assets: &[AssetInfo],
    thresholds: &SizeThresholds,
) -> Vec<AssetSize> {
    let output_folder = output_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut sizes: Vec<AssetSize> = assets
        .par_iter()
        .filter(|asset| is_reported(&asset.name))
        .filter_map(|asset| {
            let path = output_path.join(&asset.name);
            let size = match fs::read(&path).and_then(|contents| gzip_size(&contents)) {
                Ok(size) => size,
                Err(e) => {
                    tracing::warn!("Skipping {} in size report: {}", path.display(), e);
                    return None;
                }
            };

            let relative = Path::new(&asset.name);
            let name = relative
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| asset.name.clone());
            let folder = match relative.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => {
                    Path::new(&output_folder).join(dir).to_string_lossy().to_string()
                }
                _ => output_folder.clone(),
            };
            let limit = if is_main_bundle(&name) {
                thresholds.bundle
            } else {
                thresholds.chunk
            };

            Some(AssetSize {
                folder,
                name,
                size,
                label: format_size(size),
                is_large: size > limit,
            })
        })
        .collect();

    sizes.sort_by(|a, b| b.size.cmp(&a.size));
    sizes
}

pub fn render_file_sizes(assets: &[AssetSize]) -> Vec<String> {
    let labels: Vec<String> = assets
        .iter()
        .map(|asset| {
            if asset.is_large {
                format!("{} {}", asset.label, style("(large)").yellow())
            } else {
                asset.label.clone()
            }
        })
        .collect();
    let longest = labels
        .iter()
        .map(|label| measure_text_width(label))
        .max()
        .unwrap_or(0);

    let mut lines = vec!["File sizes after gzip:".to_string(), String::new()];

    for (asset, label) in assets.iter().zip(&labels) {
        let padding = " ".repeat(longest - measure_text_width(label));
        // 4 spaces lines up with yarn's "Done in..." output
        lines.push(format!(
            "    {}{}  {}{}",
            label,
            padding,
            style(format!("{}/", asset.folder)).dim(),
            style(&asset.name).cyan()
        ));
    }
    lines.push(String::new());

    if assets.iter().any(|asset| asset.is_large) {
        lines.push(
            style("The bundle size is significantly larger than recommended.")
                .yellow()
                .to_string(),
        );
        lines.push(
            style("Consider reducing it with code splitting.")
                .yellow()
                .to_string(),
        );
        lines.push(
            style("You can also analyze the project dependencies to see which modules are the largest.")
                .yellow()
                .to_string(),
        );
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> AssetInfo {
        AssetInfo {
            name: name.to_string(),
            size: 0,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(49_203), "48.05 KB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.50 MB");
    }

    #[test]
    fn test_measure_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        fs::create_dir_all(build.join("js")).unwrap();

        // Incompressible-ish content for the larger file
        let big: Vec<u8> = (0..20_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        fs::write(build.join("js/main.js"), &big).unwrap();
        fs::write(build.join("app.css"), b"body { margin: 0 }").unwrap();
        fs::write(build.join("index.html"), b"<html></html>").unwrap();

        let sizes = measure_assets(
            &build,
            &[asset("app.css"), asset("js/main.js"), asset("index.html"), asset("missing.js")],
            &SizeThresholds::default(),
        );

        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[0].name, "main.js");
        assert_eq!(sizes[0].folder, Path::new("build").join("js").to_string_lossy());
        assert_eq!(sizes[1].name, "app.css");
        assert_eq!(sizes[1].folder, "build");
        assert!(sizes[0].size > sizes[1].size);
        assert!(!sizes[0].is_large);
    }

    #[test]
    fn test_large_flags_use_separate_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 7) as u8).collect();
        fs::write(dir.path().join("main.abc.js"), &data).unwrap();
        fs::write(dir.path().join("1.chunk.js"), &data).unwrap();

        let thresholds = SizeThresholds {
            bundle: 100,
            chunk: 1024 * 1024,
        };
        let sizes = measure_assets(
            dir.path(),
            &[asset("main.abc.js"), asset("1.chunk.js")],
            &thresholds,
        );

        let main = sizes.iter().find(|s| s.name == "main.abc.js").unwrap();
        let chunk = sizes.iter().find(|s| s.name == "1.chunk.js").unwrap();
        assert!(main.is_large);
        assert!(!chunk.is_large);

        let text = console::strip_ansi_codes(&render_file_sizes(&sizes).join("\n")).to_string();
        assert!(text.contains("(large)"));
        assert!(text.contains("significantly larger than recommended"));
    }
}
