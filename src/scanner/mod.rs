//! Security Scanner
//!
//! Walks a target file or directory, runs signature matching plus
//! heuristics over every eligible text file, and aggregates the findings
//! into a scored, immutable [`ScanResult`]. Files that disappear or turn
//! unreadable mid-walk are skipped, never fatal.

mod heuristics;
mod matcher;
pub mod risk;

pub(crate) use heuristics::HeuristicAnalyzer;

use crate::errors::{SkGuardError, SkGuardResult};
use crate::models::{Finding, ScanResult};
use crate::signatures::SignatureSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default per-file size ceiling: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions excluded from directory walks by default. Stored without
/// the leading dot, compared case-insensitively.
pub const DEFAULT_SKIP_EXTENSIONS: [&str; 17] = [
    "pyc", "pyo", "so", "dll", "exe", "bin", "jpg", "png", "gif", "zip", "tar", "gz", "bz2",
    "7z", "pdf", "doc", "docx",
];

/// File selection knobs for a scan. An explicitly named single file
/// bypasses all of these.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_file_size: u64,
    pub skip_extensions: Vec<String>,
    pub skip_binaries: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            skip_extensions: DEFAULT_SKIP_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_binaries: true,
        }
    }
}

/// The scanning engine: an immutable signature snapshot plus the
/// heuristic analyzer. Build once, scan many targets.
pub struct SecurityScanner {
    signatures: SignatureSet,
    heuristics: HeuristicAnalyzer,
    options: ScanOptions,
}

impl SecurityScanner {
    pub fn new(signatures: SignatureSet, options: ScanOptions) -> Self {
        Self {
            signatures,
            heuristics: HeuristicAnalyzer::new(),
            options,
        }
    }

    /// Scanner with the built-in signature table and default options.
    pub fn with_builtin_signatures() -> Self {
        Self::new(SignatureSet::builtin(), ScanOptions::default())
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Scan a file or directory tree and produce a scored result.
    ///
    /// Re-running on an unchanged tree with the same signature set yields
    /// the same findings and score (only the timestamp differs).
    pub fn scan(&self, target: &Path) -> SkGuardResult<ScanResult> {
        if !target.exists() {
            return Err(SkGuardError::InvalidTarget(target.to_path_buf()));
        }

        log::info!("Scanning {:?} with {} signatures", target, self.signatures.len());

        let files = self.scannable_files(target);
        let mut findings: Vec<Finding> = Vec::new();
        let mut files_scanned = 0usize;

        for file in &files {
            let content = match fs::read(file) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    log::warn!("Skipping unreadable file {:?}: {}", file, e);
                    continue;
                }
            };

            findings.extend(matcher::match_signatures(&content, &self.signatures, file));
            findings.extend(self.heuristics.analyze(&content, file));
            files_scanned += 1;
        }

        let score = risk::risk_score(&findings);
        let recommendations = risk::recommendations(&findings, score);
        let summary = risk::summary(&findings, score, files_scanned);

        log::info!(
            "Scan of {:?} complete: {} findings across {} files, risk {:.1}",
            target,
            findings.len(),
            files_scanned,
            score
        );

        Ok(ScanResult {
            target_path: target.to_path_buf(),
            scan_timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            risk_score: score,
            files_scanned,
            findings,
            recommendations,
            summary,
        })
    }

    /// Enumerate the files a scan of `target` will read. A single named
    /// file is always included; directory walks apply the selection rules.
    fn scannable_files(&self, target: &Path) -> Vec<PathBuf> {
        if target.is_file() {
            return vec![target.to_path_buf()];
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(target).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_eligible(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
        files
    }

    fn is_eligible(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            if self.options.skip_extensions.iter().any(|s| *s == ext) {
                log::debug!("Skipping {:?}: excluded extension", path);
                return false;
            }
        }

        match fs::metadata(path) {
            Ok(meta) if meta.len() > self.options.max_file_size => {
                log::debug!("Skipping {:?}: exceeds size limit", path);
                return false;
            }
            Err(e) => {
                log::debug!("Skipping {:?}: {}", path, e);
                return false;
            }
            _ => {}
        }

        if self.options.skip_binaries && is_binary_file(path) {
            log::debug!("Skipping {:?}: binary content", path);
            return false;
        }

        true
    }
}

/// Binary detection: a non-text MIME guess from the extension, or a NUL
/// byte in the first 1 KiB. Unopenable files are treated as binary so the
/// walk excludes them.
pub(crate) fn is_binary_file(path: &Path) -> bool {
    if let Some(mime) = mime_guess::from_path(path).first() {
        if mime.type_() != mime_guess::mime::TEXT {
            return true;
        }
    }

    let mut file = match fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return true,
    };
    let mut buf = [0u8; 1024];
    let n = match file.read(&mut buf) {
        Ok(n) => n,
        Err(_) => return true,
    };
    buf[..n].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_missing_target_is_invalid() {
        let scanner = SecurityScanner::with_builtin_signatures();
        let err = scanner.scan(Path::new("/no/such/path")).unwrap_err();
        assert!(matches!(err, SkGuardError::InvalidTarget(_)));
    }

    #[test]
    fn test_clean_directory_scores_zero() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "notes.txt", b"weekly status update\nnothing else\n");

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(dir.path()).unwrap();

        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.files_scanned, 1);
        assert!(result.findings.is_empty());
        assert!(result.summary.starts_with("No security threats"));
    }

    #[test]
    fn test_directory_scan_finds_threats() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "helper.txt",
            b"import os\nresult = eval(user_input)\npassword = \"hunter2\"\n",
        );

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(dir.path()).unwrap();

        assert!(result.risk_score > 0.0);
        let types: Vec<&str> = result
            .findings
            .iter()
            .map(|f| f.threat_type.as_str())
            .collect();
        assert!(types.contains(&"code_injection"));
        assert!(types.contains(&"hardcoded_secrets"));
    }

    #[test]
    fn test_documented_examples_are_suppressed() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "readme.txt",
            b"# example: eval(expression) evaluates a string\n",
        );

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(dir.path()).unwrap();
        assert!(result.findings.is_empty());
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_excluded_extension_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "module.pyc", b"eval(payload)");
        write_file(&dir, "module.txt", b"plain text\n");

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(dir.path()).unwrap();
        assert_eq!(result.files_scanned, 1);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_office_documents_are_skipped_by_extension() {
        assert!(DEFAULT_SKIP_EXTENSIONS.contains(&"doc"));
        assert!(DEFAULT_SKIP_EXTENSIONS.contains(&"docx"));

        let dir = TempDir::new().unwrap();
        write_file(&dir, "report.docx", b"password = \"hunter2\"\n");

        // Extension filter applies even when binary detection is off
        let options = ScanOptions {
            skip_binaries: false,
            ..ScanOptions::default()
        };
        let scanner = SecurityScanner::new(SignatureSet::builtin(), options);
        let result = scanner.scan(dir.path()).unwrap();
        assert_eq!(result.files_scanned, 0);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_oversized_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "big.txt", b"eval(x)\n");
        write_file(&dir, "small.txt", b"hello\n");

        let options = ScanOptions {
            max_file_size: 4,
            ..ScanOptions::default()
        };
        let scanner = SecurityScanner::new(SignatureSet::builtin(), options);
        let result = scanner.scan(dir.path()).unwrap();
        assert_eq!(result.files_scanned, 0);
    }

    #[test]
    fn test_binary_content_is_skipped_in_walk() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "blob.dat", b"eval(\x00\x01\x02payload)");

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(dir.path()).unwrap();
        assert_eq!(result.files_scanned, 0);
    }

    #[test]
    fn test_named_file_bypasses_selection() {
        let dir = TempDir::new().unwrap();
        // Excluded extension and a NUL byte, but named explicitly
        let path = write_file(&dir, "payload.bin", b"eval(code)\x00");

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(&path).unwrap();
        assert_eq!(result.files_scanned, 1);
        assert!(result
            .findings
            .iter()
            .any(|f| f.threat_type == "code_injection"));
    }

    #[test]
    fn test_rescan_is_deterministic() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "app.txt",
            b"cursor.execute(\"select * from t where id = %s\" % uid)\n",
        );

        let scanner = SecurityScanner::with_builtin_signatures();
        let first = scanner.scan(dir.path()).unwrap();
        let second = scanner.scan(dir.path()).unwrap();

        assert_eq!(first.risk_score, second.risk_score);
        assert_eq!(first.findings, second.findings);
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[test]
    fn test_nested_directories_are_walked() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        write_file(&dir, "a/b/deep.txt", b"os.system(\"rm -rf /\")\n");

        let scanner = SecurityScanner::with_builtin_signatures();
        let result = scanner.scan(dir.path()).unwrap();
        assert!(result
            .findings
            .iter()
            .any(|f| f.threat_type == "command_injection"));
    }

    #[test]
    fn test_binary_detection_by_nul_byte() {
        let dir = TempDir::new().unwrap();
        let text = write_file(&dir, "a.txt", b"plain text");
        let binary = write_file(&dir, "b.txt", b"text\x00more");

        assert!(!is_binary_file(&text));
        assert!(is_binary_file(&binary));
    }
}
