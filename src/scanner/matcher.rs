//! Signature Matcher
//!
//! Runs the active signature set over a file's content and turns matches
//! into findings. Line numbers are 1-indexed; the context line is the full
//! line containing the match start. Matches whose context line looks like
//! documentation (a comment marker followed by "example" or "demo") are
//! suppressed. This is a single-line heuristic, not a comment parser.

use crate::models::Finding;
use crate::signatures::SignatureSet;
use std::path::Path;

/// Match every signature against the content and emit findings.
pub(crate) fn match_signatures(
    content: &str,
    signatures: &SignatureSet,
    path: &Path,
) -> Vec<Finding> {
    if content.is_empty() {
        return Vec::new();
    }

    let mut findings = Vec::new();

    for signature in signatures.iter() {
        for mat in signature.regex().find_iter(content) {
            let line_number = content[..mat.start()]
                .bytes()
                .filter(|&b| b == b'\n')
                .count()
                + 1;

            let line_start = content[..mat.start()]
                .rfind('\n')
                .map_or(0, |i| i + 1);
            let line_end = content[mat.end()..]
                .find('\n')
                .map_or(content.len(), |i| mat.end() + i);
            let context_line = &content[line_start..line_end];

            if is_documentation_context(context_line) {
                log::trace!(
                    "Suppressing documentation match at {:?}:{}",
                    path,
                    line_number
                );
                continue;
            }

            findings.push(Finding {
                threat_type: signature.threat_type.clone(),
                severity: signature.severity,
                confidence: signature.confidence,
                file_path: path.to_path_buf(),
                line_number,
                matched_pattern: signature.pattern.clone(),
                context_line: context_line.trim().to_string(),
                source: signature.source.clone(),
            });
        }
    }

    findings
}

const COMMENT_MARKERS: [&str; 5] = ["#", "//", "*", "\"\"\"", "'''"];

/// True when the line starts with a comment marker and mentions "example"
/// or "demo" after it. Only the single matched line is inspected.
pub(crate) fn is_documentation_context(line: &str) -> bool {
    let trimmed = line.trim_start();

    for marker in COMMENT_MARKERS {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            let rest = rest.to_lowercase();
            if rest.contains("example") || rest.contains("demo") {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, ThreatSignature};

    fn signatures(defs: &[(&str, &str, Severity)]) -> SignatureSet {
        SignatureSet::compile(
            defs.iter()
                .map(|(t, p, s)| ThreatSignature {
                    threat_type: t.to_string(),
                    pattern: p.to_string(),
                    severity: *s,
                    confidence: 0.8,
                    source: "scanner".to_string(),
                })
                .collect(),
        )
    }

    fn secrets_set() -> SignatureSet {
        signatures(&[(
            "hardcoded_secrets",
            r#"(password|token|key|secret)\s*=\s*['"][^'"]+['"]"#,
            Severity::High,
        )])
    }

    #[test]
    fn test_empty_content_yields_no_findings() {
        let set = SignatureSet::builtin();
        let findings = match_signatures("", &set, Path::new("empty.py"));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_basic_match_with_line_number_and_context() {
        let set = secrets_set();
        let content = "import os\n\npassword = \"hunter2secret\"\nprint(password)\n";
        let findings = match_signatures(content, &set, Path::new("app.py"));

        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.threat_type, "hardcoded_secrets");
        assert_eq!(f.line_number, 3);
        assert_eq!(f.context_line, "password = \"hunter2secret\"");
        assert_eq!(f.source, "scanner");
    }

    #[test]
    fn test_match_on_first_line() {
        let set = secrets_set();
        let findings = match_signatures("password = \"x\"", &set, Path::new("a.py"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, 1);
        assert_eq!(findings[0].context_line, "password = \"x\"");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let set = secrets_set();
        let findings = match_signatures("PASSWORD = \"Shout1ng\"", &set, Path::new("a.py"));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_comment_example_is_suppressed() {
        let set = secrets_set();
        let content = "# example: password = \"x\"\n";
        let findings = match_signatures(content, &set, Path::new("a.py"));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_slash_comment_demo_is_suppressed() {
        let set = signatures(&[("code_injection", r"\beval\s*\(", Severity::Critical)]);
        let content = "// demo of eval(input) usage\n";
        let findings = match_signatures(content, &set, Path::new("a.js"));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_plain_comment_without_example_is_kept() {
        let set = secrets_set();
        let content = "# token = \"abcdef123456\"\n";
        let findings = match_signatures(content, &set, Path::new("a.py"));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_multiple_signatures_can_hit_same_line() {
        let set = signatures(&[
            ("code_injection", r"\beval\s*\(", Severity::Critical),
            ("obfuscated_code", r"eval\s*\([^\n]*atob", Severity::Critical),
        ]);
        let content = "result = eval(atob(payload))\n";
        let findings = match_signatures(content, &set, Path::new("a.js"));
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line_number, findings[1].line_number);
    }

    #[test]
    fn test_documentation_context_predicate() {
        assert!(is_documentation_context("  # example usage"));
        assert!(is_documentation_context("// quick demo"));
        assert!(is_documentation_context("* Example: do not use"));
        assert!(is_documentation_context("\"\"\" example docstring"));
        assert!(!is_documentation_context("password = \"x\"  # real"));
        assert!(!is_documentation_context("# just a comment"));
        assert!(!is_documentation_context("example without marker"));
    }
}
