//! Persistence Store
//!
//! Optional SQLite store for the append-only security event log and the
//! per-target reputation table. Scanning never requires the store; the
//! CLI opens one only when asked to record results.

use crate::errors::SkGuardResult;
use crate::models::{ReputationRecord, ScanResult, SecurityEvent};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SecurityStore {
    conn: Connection,
}

impl SecurityStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> SkGuardResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> SkGuardResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> SkGuardResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS security_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                severity TEXT NOT NULL,
                source TEXT NOT NULL,
                description TEXT NOT NULL,
                metadata TEXT
            );
            CREATE TABLE IF NOT EXISTS target_reputation (
                target_name TEXT PRIMARY KEY,
                trust_score REAL NOT NULL,
                risk_level TEXT NOT NULL,
                last_scan TEXT NOT NULL,
                finding_count INTEGER NOT NULL,
                usage_count INTEGER NOT NULL DEFAULT 0
            );",
        )?;
        Ok(())
    }

    /// Append one event to the audit log. Events are never updated or
    /// deleted.
    pub fn log_event(&self, event: &SecurityEvent) -> SkGuardResult<()> {
        self.conn.execute(
            "INSERT INTO security_events
                (timestamp, event_type, severity, source, description, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.timestamp,
                event.event_type,
                event.severity,
                event.source,
                event.description,
                serde_json::to_string(&event.metadata)?,
            ],
        )?;
        Ok(())
    }

    /// Replace the reputation row for a target. The usage count is tracked
    /// by consumers of the target, not by scans, so it carries over.
    pub fn upsert_reputation(&self, record: &ReputationRecord) -> SkGuardResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO target_reputation
                (target_name, trust_score, risk_level, last_scan, finding_count, usage_count)
             VALUES (?1, ?2, ?3, ?4, ?5,
                COALESCE((SELECT usage_count FROM target_reputation
                          WHERE target_name = ?1), 0))",
            params![
                record.target_name,
                record.trust_score,
                record.risk_level.to_string(),
                record.last_scan,
                record.finding_count,
            ],
        )?;
        Ok(())
    }

    pub fn get_reputation(&self, target_name: &str) -> SkGuardResult<Option<ReputationRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT target_name, trust_score, risk_level, last_scan, finding_count
                 FROM target_reputation WHERE target_name = ?1",
                params![target_name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        match record {
            Some((target_name, trust_score, risk_level, last_scan, finding_count)) => {
                let risk_level = serde_json::from_value(serde_json::Value::String(risk_level))?;
                Ok(Some(ReputationRecord {
                    target_name,
                    trust_score,
                    risk_level,
                    last_scan,
                    finding_count: finding_count as usize,
                }))
            }
            None => Ok(None),
        }
    }

    pub fn event_count(&self) -> SkGuardResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM security_events", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Record one completed scan: a single audit event plus a reputation
    /// upsert for the target.
    pub fn record_scan(&self, result: &ScanResult) -> SkGuardResult<()> {
        let severity = if result.risk_score >= 80.0 {
            "CRITICAL"
        } else if result.risk_score >= 60.0 {
            "HIGH"
        } else {
            "INFO"
        };

        let event = SecurityEvent {
            timestamp: result.scan_timestamp.clone(),
            event_type: "scan_completed".to_string(),
            severity: severity.to_string(),
            source: "skguard".to_string(),
            description: result.summary.clone(),
            metadata: serde_json::json!({
                "target": result.target_path.display().to_string(),
                "risk_score": result.risk_score,
                "files_scanned": result.files_scanned,
                "finding_count": result.findings.len(),
            }),
        };
        self.log_event(&event)?;

        self.upsert_reputation(&ReputationRecord::from_scan(result))?;
        Ok(())
    }
}
