//! Risk Aggregation and Recommendations
//!
//! Findings are weighted by severity and confidence, summed, and squashed
//! through a log-base-101 curve so the score stays in [0, 100] with
//! diminishing returns as findings pile up.

use crate::models::{Finding, Severity};

/// Compute the bounded aggregate risk score for a set of findings.
///
/// `weighted = severity_weight * confidence` per finding,
/// `score = min(100, ln(total + 1) / ln(101) * 100)` rounded to one
/// decimal place. No findings means exactly 0.0.
pub fn risk_score(findings: &[Finding]) -> f64 {
    if findings.is_empty() {
        return 0.0;
    }

    let total: f64 = findings
        .iter()
        .map(|f| f.severity.weight() * f.confidence)
        .sum();

    let score = ((total + 1.0).ln() / 101.0_f64.ln() * 100.0).min(100.0);
    (score * 10.0).round() / 10.0
}

/// Fixed per-type remediation advice, one line per distinct finding type.
fn type_recommendation(threat_type: &str) -> Option<&'static str> {
    match threat_type {
        "code_injection" | "command_injection" | "shell_injection" | "obfuscated_code" => {
            Some("Review all dynamic code execution paths and add input validation")
        }
        "hardcoded_secrets" | "secrets_exposure" => {
            Some("Move secrets to environment variables or a secure vault")
        }
        "sql_injection" => Some("Use parameterized queries for all database access"),
        "path_traversal" => Some("Canonicalize and validate all file paths before use"),
        "obfuscation" => Some("Investigate obfuscated code for malicious intent"),
        "high_entropy" => Some("Inspect encoded or compressed blobs for hidden payloads"),
        "suspicious_imports" => {
            Some("Audit process, network, and filesystem module usage")
        }
        "unsafe_yaml" | "unsafe_pickle" | "unsafe_deserialization" => {
            Some("Avoid deserializing untrusted input")
        }
        "crypto_weakness" | "weak_crypto" | "insecure_random" => {
            Some("Replace weak cryptographic primitives with modern algorithms")
        }
        "backdoor_pattern" | "reverse_shell" | "crypto_mining" => {
            Some("Treat as hostile: isolate the host and rotate exposed credentials")
        }
        "debug_mode" => Some("Disable debug mode before deployment"),
        "insecure_protocol" => Some("Use HTTPS for all remote endpoints"),
        _ => None,
    }
}

/// Build the ordered recommendation list: tier messages first, then one
/// message per distinct finding type in first-encountered order, then the
/// two closing messages. Duplicates are never emitted.
pub fn recommendations(findings: &[Finding], score: f64) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    if score >= 80.0 {
        recs.push(
            "CRITICAL: Immediate quarantine recommended - high-risk threats detected".to_string(),
        );
        recs.push("Do not deploy this code in production environments".to_string());
    } else if score >= 60.0 {
        recs.push("HIGH RISK: Manual security review required before deployment".to_string());
        recs.push("Consider running in an isolated or sandboxed environment".to_string());
    } else if score >= 30.0 {
        recs.push("MEDIUM RISK: Enhanced monitoring recommended during execution".to_string());
        recs.push("Review flagged code sections for potential issues".to_string());
    } else {
        recs.push("LOW RISK: Standard security monitoring sufficient".to_string());
    }

    for finding in findings {
        if let Some(message) = type_recommendation(&finding.threat_type) {
            if !recs.iter().any(|r| r == message) {
                recs.push(message.to_string());
            }
        }
    }

    recs.push("Keep threat intelligence signatures up to date".to_string());
    recs.push("Enable continuous monitoring during execution".to_string());

    recs
}

/// One-line scan summary with a severity breakdown and the action implied
/// by the score tier.
pub fn summary(findings: &[Finding], score: f64, files_scanned: usize) -> String {
    if findings.is_empty() {
        return format!("No security threats detected in {} files", files_scanned);
    }

    let mut parts = Vec::new();
    for severity in [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ] {
        let count = findings.iter().filter(|f| f.severity == severity).count();
        if count > 0 {
            parts.push(format!("{} {}", count, severity.to_string().to_lowercase()));
        }
    }

    let action = if score >= 80.0 {
        "requires immediate quarantine"
    } else if score >= 60.0 {
        "requires manual review"
    } else if score >= 30.0 {
        "requires enhanced monitoring"
    } else {
        "cleared for standard deployment"
    };

    format!(
        "Found {} threats ({}) in {} files, {}",
        findings.len(),
        parts.join(", "),
        files_scanned,
        action
    )
}
