//! SkGuard - risk-scoring security scanner for AI agent skills and code trees.
//!
//! Scans a file or directory with a regex signature set plus content
//! heuristics, suppresses documentation examples, aggregates findings into
//! a bounded risk score, and emits recommendations. Results can optionally
//! be recorded in a SQLite store and paired with remediation suggestions.

pub mod cli;
pub mod errors;
pub mod models;
pub mod remediation;
pub mod report;
pub mod scanner;
pub mod signatures;
pub mod store;

pub use errors::{SkGuardError, SkGuardResult};
pub use models::{Finding, ScanResult, Severity, ThreatSignature};
pub use scanner::{ScanOptions, SecurityScanner};
