//! Threat Feed Snapshot Loading
//!
//! Parses the JSON snapshot format written by the intelligence updater and
//! merges multiple signature sources with per-pattern deduplication. The
//! loader never touches the network; fetching and caching the feed is the
//! updater's job, the scanner only consumes the snapshot file.

use crate::errors::{SkGuardError, SkGuardResult};
use crate::models::ThreatSignature;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// On-disk feed snapshot shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatFeed {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    pub threats: Vec<ThreatSignature>,
}

/// Load signatures from a feed snapshot file.
///
/// Any failure (missing file, malformed JSON) maps to
/// `SignatureSourceUnavailable`; the caller decides whether to fall back
/// to the built-in table.
pub fn load_feed_file(path: &Path) -> SkGuardResult<Vec<ThreatSignature>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        SkGuardError::SignatureSource(format!("cannot read feed snapshot {:?}: {}", path, e))
    })?;

    let feed: ThreatFeed = serde_json::from_str(&raw).map_err(|e| {
        SkGuardError::SignatureSource(format!("malformed feed snapshot {:?}: {}", path, e))
    })?;

    log::info!(
        "Loaded {} signatures from feed snapshot {:?} (sources: {})",
        feed.threats.len(),
        path,
        if feed.sources.is_empty() {
            "unknown".to_string()
        } else {
            feed.sources.join(", ")
        }
    );

    Ok(feed.threats)
}

/// Merge signature sets in priority order, dropping duplicate patterns.
/// The first occurrence of a pattern wins.
pub fn merge(sets: Vec<Vec<ThreatSignature>>) -> Vec<ThreatSignature> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for set in sets {
        for signature in set {
            if seen.insert(signature.pattern.clone()) {
                merged.push(signature);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn named(threat_type: &str, pattern: &str) -> ThreatSignature {
        ThreatSignature {
            threat_type: threat_type.to_string(),
            pattern: pattern.to_string(),
            severity: Severity::High,
            confidence: 0.8,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_load_feed_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "last_updated": "2026-08-24T03:00:00",
                "version": "1.1",
                "sources": ["Built-in Enhanced"],
                "threats": [
                    {{"type": "code_injection", "pattern": "eval\\s*\\(", "severity": "CRITICAL"}},
                    {{"type": "keylogger", "pattern": "keypress[^\\n]*log", "severity": "HIGH", "confidence": 0.65}}
                ]
            }}"#
        )
        .unwrap();

        let threats = load_feed_file(file.path()).unwrap();
        assert_eq!(threats.len(), 2);
        assert_eq!(threats[0].severity, Severity::Critical);
        assert_eq!(threats[0].confidence, 0.8); // default filled in
        assert_eq!(threats[1].confidence, 0.65);
    }

    #[test]
    fn test_missing_feed_is_source_unavailable() {
        let err = load_feed_file(Path::new("/nonexistent/threat_cache.json")).unwrap_err();
        assert!(matches!(err, SkGuardError::SignatureSource(_)));
    }

    #[test]
    fn test_malformed_feed_is_source_unavailable() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        let err = load_feed_file(file.path()).unwrap_err();
        assert!(matches!(err, SkGuardError::SignatureSource(_)));
    }

    #[test]
    fn test_merge_deduplicates_by_pattern() {
        let feed = vec![
            named("code_injection", r"\beval\s*\("),
            named("keylogger", r"keypress[^\n]*log"),
        ];
        let fallback = vec![
            named("code_injection_dup", r"\beval\s*\("), // same pattern, dropped
            named("sql_injection", r"execute\s*\([^\n)]*%[^\n)]*\)"),
        ];

        let merged = merge(vec![feed, fallback]);
        assert_eq!(merged.len(), 3);
        // First occurrence wins
        assert_eq!(merged[0].threat_type, "code_injection");
        assert!(merged.iter().all(|s| s.threat_type != "code_injection_dup"));
    }
}
