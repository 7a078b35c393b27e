//! CLI output formatting for all pipeline stages.
//!
//! # Output Format
//!
//! ## Scan / check
//!
//! ```text
//! Pages
//! 001 about.html
//! 002 index.html
//!     1 gallery (3 images), 2 accordions, header
//! 003 reports/trip.html
//!     1 gallery (2 images), header
//!
//! Assets
//!     1 file
//!
//! Config
//!     reports/config.toml
//! ```
//!
//! ## Enhance
//!
//! ```text
//! index.html → 1 gallery, 2 accordions, header
//! about.html → unchanged
//! style.css → copied
//!
//! Enhanced 3 pages: 2 galleries, 2 accordions, 2 headers; copied 1 asset
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::bootstrap::BootstrapReport;
use crate::enhance::{BuildSummary, PageEvent};
use crate::scan::{DirectiveCensus, Manifest};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 gallery`, `2 galleries`, …
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Scan / check output
// ============================================================================

/// Describe a census as one comma-separated line. Empty when the page has
/// nothing to enhance.
pub fn format_census(census: &DirectiveCensus) -> String {
    let mut parts = Vec::new();
    if census.galleries > 0 {
        parts.push(format!(
            "{} ({})",
            plural(census.galleries, "gallery", "galleries"),
            plural(census.images, "image", "images")
        ));
    }
    if census.accordions > 0 {
        parts.push(plural(census.accordions, "accordion", "accordions"));
    }
    if census.header_mount {
        parts.push("header".to_string());
    }
    parts.join(", ")
}

/// Format the scanned site. `censuses` pairs with `manifest.pages` when the
/// caller counted directives (the `check` command); pass an empty slice to
/// list pages only.
pub fn format_scan_output(manifest: &Manifest, censuses: &[DirectiveCensus]) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in manifest.pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), page.path));
        if let Some(census) = censuses.get(i) {
            let detail = format_census(census);
            if !detail.is_empty() {
                lines.push(format!("{}{}", indent(1), detail));
            }
        }
    }

    lines.push(String::new());
    lines.push("Assets".to_string());
    lines.push(format!(
        "{}{}",
        indent(1),
        plural(manifest.assets.len(), "file", "files")
    ));

    if !manifest.config_files.is_empty() {
        lines.push(String::new());
        lines.push("Config".to_string());
        for file in &manifest.config_files {
            lines.push(format!("{}{}", indent(1), file));
        }
    }
    lines
}

pub fn print_scan_output(manifest: &Manifest, censuses: &[DirectiveCensus]) {
    for line in format_scan_output(manifest, censuses) {
        println!("{}", line);
    }
}

// ============================================================================
// Enhance output
// ============================================================================

fn format_report(report: &BootstrapReport) -> String {
    if report.is_passive() {
        return "unchanged".to_string();
    }
    let mut parts = Vec::new();
    if report.galleries > 0 {
        parts.push(plural(report.galleries, "gallery", "galleries"));
    }
    if report.accordions > 0 {
        parts.push(plural(report.accordions, "accordion", "accordions"));
    }
    if report.header_injected {
        parts.push("header".to_string());
    }
    parts.join(", ")
}

/// Format a single enhance progress event as display lines.
pub fn format_page_event(event: &PageEvent) -> Vec<String> {
    match event {
        PageEvent::Enhanced { path, report } => {
            vec![format!("{} \u{2192} {}", path, format_report(report))]
        }
        PageEvent::AssetCopied { path } => vec![format!("{} \u{2192} copied", path)],
    }
}

/// Format the closing summary of a build.
pub fn format_build_summary(summary: &BuildSummary) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Enhanced {}: {}, {}, {}; copied {}",
            plural(summary.pages.len(), "page", "pages"),
            plural(summary.galleries(), "gallery", "galleries"),
            plural(summary.accordions(), "accordion", "accordions"),
            plural(summary.headers(), "header", "headers"),
            plural(summary.assets, "asset", "assets"),
        ),
    ]
}

pub fn print_build_summary(summary: &BuildSummary) {
    for line in format_build_summary(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::enhance::PageResult;
    use crate::scan::PageSource;

    fn manifest() -> Manifest {
        Manifest {
            pages: vec![
                PageSource {
                    path: "about.html".to_string(),
                    config: SiteConfig::default(),
                },
                PageSource {
                    path: "index.html".to_string(),
                    config: SiteConfig::default(),
                },
            ],
            assets: vec!["style.css".to_string()],
            config_files: vec!["config.toml".to_string()],
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn census_line_lists_only_present_parts() {
        let census = DirectiveCensus {
            galleries: 1,
            images: 3,
            accordions: 2,
            header_mount: true,
        };
        assert_eq!(
            format_census(&census),
            "1 gallery (3 images), 2 accordions, header"
        );
        assert_eq!(format_census(&DirectiveCensus::default()), "");
    }

    #[test]
    fn scan_output_without_census() {
        let lines = format_scan_output(&manifest(), &[]);
        assert_eq!(
            lines,
            vec![
                "Pages",
                "001 about.html",
                "002 index.html",
                "",
                "Assets",
                "    1 file",
                "",
                "Config",
                "    config.toml",
            ]
        );
    }

    #[test]
    fn scan_output_with_census_skips_empty_pages() {
        let censuses = vec![
            DirectiveCensus::default(),
            DirectiveCensus {
                galleries: 2,
                images: 1,
                accordions: 0,
                header_mount: false,
            },
        ];
        let lines = format_scan_output(&manifest(), &censuses);
        assert_eq!(lines[1], "001 about.html");
        assert_eq!(lines[2], "002 index.html");
        assert_eq!(lines[3], "    2 galleries (1 image)");
    }

    #[test]
    fn page_event_lines() {
        let enhanced = PageEvent::Enhanced {
            path: "index.html".to_string(),
            report: BootstrapReport {
                galleries: 1,
                accordions: 2,
                header_injected: true,
                overlay_mounted: true,
            },
        };
        assert_eq!(
            format_page_event(&enhanced),
            vec!["index.html \u{2192} 1 gallery, 2 accordions, header"]
        );

        let passive = PageEvent::Enhanced {
            path: "about.html".to_string(),
            report: BootstrapReport {
                overlay_mounted: true,
                ..Default::default()
            },
        };
        assert_eq!(format_page_event(&passive), vec!["about.html \u{2192} unchanged"]);

        let copied = PageEvent::AssetCopied {
            path: "style.css".to_string(),
        };
        assert_eq!(format_page_event(&copied), vec!["style.css \u{2192} copied"]);
    }

    #[test]
    fn build_summary_line() {
        let summary = BuildSummary {
            pages: vec![PageResult {
                path: "index.html".to_string(),
                report: BootstrapReport {
                    galleries: 2,
                    accordions: 1,
                    header_injected: true,
                    overlay_mounted: true,
                },
            }],
            assets: 3,
        };
        assert_eq!(
            format_build_summary(&summary)[1],
            "Enhanced 1 page: 2 galleries, 1 accordion, 1 header; copied 3 assets"
        );
    }
}
