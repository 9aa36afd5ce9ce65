//! Heuristic Analyzer
//!
//! Secondary per-file checks that run alongside signature matching:
//! long-line obfuscation, high-entropy content, and risky import density.
//! Thresholds are fixed constants; callers needing different sensitivity
//! should wrap the analyzer rather than patch it.

use crate::models::{Finding, Severity};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::path::Path;

/// Content longer than this with very few line breaks suggests minified
/// or deliberately obfuscated code.
const LONG_CONTENT_LEN: usize = 50_000;
const LONG_CONTENT_MAX_LINES: usize = 100;

/// Entropy is sampled over the first 5000 characters. The threshold is
/// calibrated for a standard Shannon estimator in bits per character:
/// English text sits around 4.3, base64 blobs around 6.0.
const ENTROPY_SAMPLE_CHARS: usize = 5000;
const ENTROPY_THRESHOLD: f64 = 5.5;

/// More risky module imports than this in one file is unusual.
const IMPORT_DENSITY_LIMIT: usize = 10;

const IMPORT_PATTERNS: [&str; 3] = [
    r"import\s+(os|sys|subprocess|socket|urllib)",
    r#"require\(['"](fs|child_process|net|http)['"]\)"#,
    r"from\s+(os|sys|subprocess|socket|urllib)",
];

pub(crate) struct HeuristicAnalyzer {
    import_patterns: Vec<Regex>,
}

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        let import_patterns = IMPORT_PATTERNS
            .iter()
            .filter_map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        log::warn!("Failed to compile import pattern '{}': {}", pattern, e);
                        e
                    })
                    .ok()
            })
            .collect();

        Self { import_patterns }
    }

    /// Run all heuristics over one file's content.
    pub fn analyze(&self, content: &str, path: &Path) -> Vec<Finding> {
        let mut findings = Vec::new();

        if content.is_empty() {
            return findings;
        }

        // Very long content with few line breaks
        let line_breaks = content.bytes().filter(|&b| b == b'\n').count();
        if content.len() > LONG_CONTENT_LEN && line_breaks < LONG_CONTENT_MAX_LINES {
            findings.push(heuristic_finding(
                "obfuscation",
                Severity::Medium,
                0.6,
                path,
                "long_lines_heuristic",
                "Unusually long lines detected".to_string(),
            ));
        }

        // High entropy in the leading sample
        let sample = match content.char_indices().nth(ENTROPY_SAMPLE_CHARS) {
            Some((idx, _)) => &content[..idx],
            None => content,
        };
        let entropy = shannon_entropy(sample);
        if entropy > ENTROPY_THRESHOLD {
            findings.push(heuristic_finding(
                "high_entropy",
                Severity::Medium,
                0.5,
                path,
                "entropy_analysis",
                format!("High entropy content detected (entropy: {:.2})", entropy),
            ));
        }

        // Concentration of risky imports
        let import_count: usize = self
            .import_patterns
            .iter()
            .map(|p| p.find_iter(content).count())
            .sum();
        if import_count > IMPORT_DENSITY_LIMIT {
            findings.push(heuristic_finding(
                "suspicious_imports",
                Severity::Medium,
                0.7,
                path,
                "import_analysis",
                format!("{} potentially risky imports detected", import_count),
            ));
        }

        findings
    }
}

fn heuristic_finding(
    threat_type: &str,
    severity: Severity,
    confidence: f64,
    path: &Path,
    pattern: &str,
    context: String,
) -> Finding {
    Finding {
        threat_type: threat_type.to_string(),
        severity,
        confidence,
        file_path: path.to_path_buf(),
        line_number: 1,
        matched_pattern: pattern.to_string(),
        context_line: context,
        source: "heuristic".to_string(),
    }
}

/// Shannon entropy in bits per character over the character-frequency
/// distribution of `data`.
pub(crate) fn shannon_entropy(data: &str) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in data.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }

    let total = total as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}
