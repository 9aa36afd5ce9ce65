//! Built-in Threat Signature Table
//!
//! The fallback signature set used when no feed snapshot is available.
//! Patterns are compiled case-insensitive in multi-line mode, so none of
//! them carry explicit `(?i)` flags.

use crate::models::{Severity, ThreatSignature};

fn sig(
    threat_type: &str,
    pattern: &str,
    severity: Severity,
    confidence: f64,
) -> ThreatSignature {
    ThreatSignature {
        threat_type: threat_type.to_string(),
        pattern: pattern.to_string(),
        severity,
        confidence,
        source: "builtin".to_string(),
    }
}

/// Get the built-in signature definitions.
pub fn builtin_signatures() -> Vec<ThreatSignature> {
    vec![
        // Dynamic code execution
        sig("code_injection", r"\beval\s*\(", Severity::Critical, 0.9),
        sig(
            "command_injection",
            r"os\.system\s*\(",
            Severity::Critical,
            0.9,
        ),
        sig(
            "shell_injection",
            r"subprocess\.(call|run|Popen)[^\n]*shell\s*=\s*True",
            Severity::High,
            0.85,
        ),
        sig(
            "obfuscated_code",
            r"eval\s*\([^\n]*(atob|unescape|fromCharCode)",
            Severity::Critical,
            0.9,
        ),

        // Secrets and credentials
        sig(
            "hardcoded_secrets",
            r#"(password|token|key|secret|api_key)\s*=\s*['"][^'"]+['"]"#,
            Severity::High,
            0.8,
        ),
        sig(
            "secrets_exposure",
            r"(github_pat_|ghp_)[A-Za-z0-9_]{20,}",
            Severity::High,
            0.9,
        ),

        // Unsafe deserialization
        sig("unsafe_yaml", r"yaml\.load\s*\(", Severity::Medium, 0.8),
        sig("unsafe_pickle", r"pickle\.loads?\s*\(", Severity::High, 0.85),
        sig(
            "unsafe_deserialization",
            r"json\.loads[^\n]*input|loads\([^\n]*request",
            Severity::Medium,
            0.6,
        ),

        // Injection into downstream interpreters
        sig(
            "sql_injection",
            r"execute\s*\([^\n)]*%[^\n)]*\)",
            Severity::High,
            0.7,
        ),
        sig(
            "xss_potential",
            r"innerHTML\s*=|document\.write\s*\(",
            Severity::Medium,
            0.7,
        ),
        sig("path_traversal", r"\.\./", Severity::Medium, 0.6),

        // Weak cryptography and randomness
        sig("crypto_weakness", r"\b(md5|sha1)\s*\(", Severity::Low, 0.7),
        sig("weak_crypto", r"\b(DES|RC4|3DES)\b", Severity::High, 0.6),
        sig(
            "insecure_random",
            r"random\.random\s*\(|Math\.random\s*\(",
            Severity::Low,
            0.7,
        ),

        // Configuration and transport
        sig(
            "debug_mode",
            r"DEBUG\s*=\s*True|debug\s*=\s*true",
            Severity::Medium,
            0.6,
        ),
        // Dotted hostnames only, so localhost and loopback literals never match
        sig(
            "insecure_protocol",
            r"http://(?:[a-z0-9-]+\.)+[a-z]{2,}",
            Severity::Medium,
            0.6,
        ),

        // Native memory hazards
        sig(
            "buffer_overflow",
            r"strcpy\s*\(|strcat\s*\(",
            Severity::High,
            0.8,
        ),
        sig("format_string", r"printf\s*\([^,)\n]*%", Severity::High, 0.7),

        // Host compromise indicators
        sig(
            "privilege_escalation",
            r"sudo\s+NOPASSWD|setuid\s*\(\s*0\s*\)|chmod\s+[0-7]*7[0-7]{2}",
            Severity::High,
            0.7,
        ),
        sig(
            "backdoor_pattern",
            r"reverse_shell|nc\s+-e|/bin/sh\s+-i",
            Severity::Critical,
            0.9,
        ),
        sig(
            "crypto_mining",
            r"\b(xmrig|cryptonight|stratum\+tcp)\b",
            Severity::High,
            0.7,
        ),
    ]
}
