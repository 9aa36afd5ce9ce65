//! Threat Signature Source
//!
//! Supplies the active signature set for a scan: the built-in table, a feed
//! snapshot file, or a merge of both. Signatures are compiled once at load
//! time and treated as an immutable snapshot for the scan's duration.

mod builtin;
mod feed;

pub use builtin::builtin_signatures;
pub use feed::{load_feed_file, merge, ThreatFeed};

use crate::models::{Severity, ThreatSignature};
use regex::{Regex, RegexBuilder};

/// A signature with its pattern compiled for matching. All patterns are
/// compiled case-insensitive in multi-line mode (`^`/`$` anchor to line
/// boundaries, `.` does not cross lines).
#[derive(Debug, Clone)]
pub struct CompiledSignature {
    pub threat_type: String,
    pub pattern: String,
    pub severity: Severity,
    pub confidence: f64,
    pub source: String,
    regex: Regex,
}

impl CompiledSignature {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Immutable snapshot of the active signatures for one scan.
pub struct SignatureSet {
    signatures: Vec<CompiledSignature>,
}

impl SignatureSet {
    /// Compile a set of signature definitions. Empty patterns are ignored
    /// and patterns that fail to compile are dropped with a warning, so a
    /// partially bad feed never aborts scanning.
    pub fn compile(definitions: Vec<ThreatSignature>) -> Self {
        let mut signatures = Vec::with_capacity(definitions.len());

        for def in definitions {
            if def.pattern.is_empty() {
                log::debug!("Ignoring signature '{}' with empty pattern", def.threat_type);
                continue;
            }

            match RegexBuilder::new(&def.pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
            {
                Ok(regex) => signatures.push(CompiledSignature {
                    threat_type: def.threat_type,
                    pattern: def.pattern,
                    severity: def.severity,
                    confidence: def.confidence,
                    source: def.source,
                    regex,
                }),
                Err(e) => {
                    log::warn!(
                        "Failed to compile signature pattern '{}': {}",
                        def.pattern,
                        e
                    );
                }
            }
        }

        log::debug!("Compiled {} threat signatures", signatures.len());
        Self { signatures }
    }

    /// The built-in signature table, always available.
    pub fn builtin() -> Self {
        Self::compile(builtin::builtin_signatures())
    }

    /// Load a feed snapshot and merge the built-in table behind it, the
    /// way the intelligence updater always appends its fallback set.
    pub fn from_feed_file(path: &std::path::Path) -> crate::errors::SkGuardResult<Self> {
        let feed_threats = feed::load_feed_file(path)?;
        let merged = feed::merge(vec![feed_threats, builtin::builtin_signatures()]);
        Ok(Self::compile(merged))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledSignature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
