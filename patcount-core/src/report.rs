//! Plain-text report rendering. Presentation only: everything rendered
//! here is already present in the [`AnalysisResult`].

use crate::types::{AnalysisResult, CheckStatus};
use std::fmt::Write;

/// Render the analysis as a plain-text report: header, per-section
/// counts, findings in their presentation order, then the applied
/// configuration as YAML.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let title = "Patent Document Length Analysis";
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    let _ = writeln!(out, "File: {}", result.filename);
    let _ = writeln!(out, "Count mode: {}", result.count_mode);
    let _ = writeln!(out, "Total count: {}", result.total_count);
    let _ = writeln!(out, "Config source: {}", result.config_source);

    if !result.notes.is_empty() {
        let _ = writeln!(out, "\n--- Extraction notes ---");
        for note in &result.notes {
            let _ = writeln!(out, "- {note}");
        }
    }

    let _ = writeln!(out, "\n--- Section counts ---");
    if result.sections.is_empty() {
        let _ = writeln!(out, "  (no sections recognized)");
    } else {
        for (name, report) in &result.sections {
            let mut line = format!("- {name} (heading: '{}'): {}", report.heading, report.count);
            if report.aggregated {
                line.push_str(&format!(
                    " (aggregated from: {})",
                    report.sub_sections.join(", ")
                ));
            }
            let _ = writeln!(out, "{line}");
        }
    }

    let _ = writeln!(out, "\n--- Requirement checks ---");
    if result.findings.is_empty() {
        let _ = writeln!(out, "  (no requirements configured)");
    } else {
        for finding in &result.findings {
            let prefix = match finding.status {
                CheckStatus::Pass => "✓ pass",
                CheckStatus::Fail => "✗ fail",
                CheckStatus::Informational => "ℹ info",
                CheckStatus::SectionNotFound
                | CheckStatus::SubSectionsNotFound
                | CheckStatus::TargetUnresolved
                | CheckStatus::ReferenceUnresolved => "? unresolved",
            };
            let _ = writeln!(out, "{prefix}: {}", finding.message);
            let _ = writeln!(
                out,
                "    actual: {} | expected: {}",
                finding.actual, finding.expected
            );
        }
    }

    let _ = writeln!(out, "\n--- Applied configuration ---");
    match serde_yaml::to_string(&result.applied_config) {
        Ok(yaml) => out.push_str(&yaml),
        Err(_) => {
            let _ = writeln!(out, "  (unable to render configuration)");
        }
    }

    out
}
