use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Threat severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Base weight used by the risk aggregator before confidence scaling.
    pub fn weight(self) -> f64 {
        match self {
            Severity::Critical => 25.0,
            Severity::High => 15.0,
            Severity::Medium => 8.0,
            Severity::Low => 3.0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single threat signature: a regex pattern tagged with a threat type,
/// severity and confidence. Immutable once loaded for a scan; the active
/// set is replaced wholesale between scans, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatSignature {
    #[serde(rename = "type")]
    pub threat_type: String,
    pub pattern: String,
    pub severity: Severity,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_source")]
    pub source: String,
}

pub(crate) fn default_confidence() -> f64 {
    0.8
}

pub(crate) fn default_source() -> String {
    "scanner".to_string()
}

/// Individual threat match produced by the scanner. Never mutated after
/// creation; multiple findings may reference the same file and line under
/// different signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub threat_type: String,
    pub severity: Severity,
    pub confidence: f64,
    pub file_path: PathBuf,
    /// 1-indexed line of the match start.
    pub line_number: usize,
    pub matched_pattern: String,
    pub context_line: String,
    pub source: String,
}

/// Immutable result of one scan invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub target_path: PathBuf,
    pub scan_timestamp: String,
    /// Bounded aggregate risk in [0, 100], one decimal place.
    pub risk_score: f64,
    pub files_scanned: usize,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl ScanResult {
    pub fn threat_count(&self) -> usize {
        self.findings.len()
    }

    /// Risk level tier derived from the aggregate score.
    pub fn risk_level(&self) -> Severity {
        risk_level(self.risk_score)
    }

    /// Structured rendering for programmatic consumers.
    pub fn to_json(&self) -> crate::errors::SkGuardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Convert an aggregate risk score to its level tier.
pub fn risk_level(score: f64) -> Severity {
    if score >= 80.0 {
        Severity::Critical
    } else if score >= 60.0 {
        Severity::High
    } else if score >= 30.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Per-target trust record, upserted after each scan. Only the latest
/// record is retained for a given target name; history lives in the
/// event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub target_name: String,
    /// 100 minus the risk score, clamped at zero.
    pub trust_score: f64,
    pub risk_level: Severity,
    pub last_scan: String,
    pub finding_count: usize,
}

impl ReputationRecord {
    pub fn from_scan(result: &ScanResult) -> Self {
        let target_name = result
            .target_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| result.target_path.display().to_string());

        Self {
            target_name,
            trust_score: (100.0 - result.risk_score).max(0.0),
            risk_level: result.risk_level(),
            last_scan: result.scan_timestamp.clone(),
            finding_count: result.findings.len(),
        }
    }
}

/// Append-only audit event recorded in the persistence store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub timestamp: String,
    pub event_type: String,
    pub severity: String,
    pub source: String,
    pub description: String,
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Critical.weight(), 25.0);
        assert_eq!(Severity::High.weight(), 15.0);
        assert_eq!(Severity::Medium.weight(), 8.0);
        assert_eq!(Severity::Low.weight(), 3.0);
    }

    #[test]
    fn test_severity_serde_uppercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let parsed: Severity = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn test_risk_level_tiers() {
        assert_eq!(risk_level(0.0), Severity::Low);
        assert_eq!(risk_level(29.9), Severity::Low);
        assert_eq!(risk_level(30.0), Severity::Medium);
        assert_eq!(risk_level(60.0), Severity::High);
        assert_eq!(risk_level(80.0), Severity::Critical);
        assert_eq!(risk_level(100.0), Severity::Critical);
    }

    #[test]
    fn test_signature_defaults_from_feed_json() {
        let sig: ThreatSignature = serde_json::from_str(
            r#"{"type": "code_injection", "pattern": "eval\\s*\\(", "severity": "CRITICAL"}"#,
        )
        .unwrap();
        assert_eq!(sig.confidence, 0.8);
        assert_eq!(sig.source, "scanner");
    }

    #[test]
    fn test_reputation_trust_is_inverse_of_risk() {
        let result = ScanResult {
            target_path: PathBuf::from("/skills/payment-helper"),
            scan_timestamp: "2026-08-25 10:00:00".to_string(),
            risk_score: 72.5,
            files_scanned: 3,
            findings: Vec::new(),
            recommendations: Vec::new(),
            summary: String::new(),
        };
        let record = ReputationRecord::from_scan(&result);
        assert_eq!(record.target_name, "payment-helper");
        assert!((record.trust_score - 27.5).abs() < f64::EPSILON);
        assert_eq!(record.risk_level, Severity::High);
    }
}
