//! Human-Readable Report Rendering
//!
//! Plain-text rendering of a scan result for terminals and log capture.
//! JSON output lives on [`ScanResult::to_json`]; this module only formats.

use crate::models::{ScanResult, Severity};
use std::fmt::Write;

/// Findings shown per severity tier before the report collapses the rest
/// into a count.
const MAX_FINDINGS_PER_TIER: usize = 5;

/// Context lines longer than this are truncated at a char boundary.
const MAX_CONTEXT_CHARS: usize = 80;

impl ScanResult {
    /// Render the full plain-text report.
    pub fn format_report(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "SkGuard Security Scan Report");
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out, "Target:       {}", self.target_path.display());
        let _ = writeln!(out, "Scanned:      {}", self.scan_timestamp);
        let _ = writeln!(
            out,
            "Risk score:   {:.1}/100 ({})",
            self.risk_score,
            self.risk_level()
        );
        let _ = writeln!(out, "Files:        {}", self.files_scanned);
        let _ = writeln!(out, "Threats:      {}", self.threat_count());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.summary);

        if !self.findings.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Threat Details:");
            let _ = writeln!(out, "{}", "-".repeat(50));

            for severity in [
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low,
            ] {
                let tier: Vec<_> = self
                    .findings
                    .iter()
                    .filter(|f| f.severity == severity)
                    .collect();
                if tier.is_empty() {
                    continue;
                }

                let _ = writeln!(out);
                let _ = writeln!(out, "[{}] {} finding(s)", severity, tier.len());
                for finding in tier.iter().take(MAX_FINDINGS_PER_TIER) {
                    let _ = writeln!(
                        out,
                        "  {} at {}:{}",
                        finding.threat_type,
                        finding.file_path.display(),
                        finding.line_number
                    );
                    let _ = writeln!(out, "    {}", truncate_context(&finding.context_line));
                    if finding.confidence < 0.8 {
                        let _ = writeln!(out, "    confidence: {:.2}", finding.confidence);
                    }
                }
                if tier.len() > MAX_FINDINGS_PER_TIER {
                    let _ = writeln!(
                        out,
                        "  ... and {} more",
                        tier.len() - MAX_FINDINGS_PER_TIER
                    );
                }
            }
        }

        if !self.recommendations.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Recommendations:");
            let _ = writeln!(out, "{}", "-".repeat(50));
            for (i, rec) in self.recommendations.iter().enumerate() {
                let _ = writeln!(out, "{:2}. {}", i + 1, rec);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Generated by skguard v{}", env!("CARGO_PKG_VERSION"));

        out
    }
}

fn truncate_context(line: &str) -> String {
    if line.chars().count() <= MAX_CONTEXT_CHARS {
        return line.to_string();
    }
    let truncated: String = line.chars().take(MAX_CONTEXT_CHARS).collect();
    format!("{}...", truncated)
}
