//! Remediation Suggestions
//!
//! Turns a finding into a concrete before/after code suggestion when the
//! threat type has a known mechanical fix. Suggestions are advisory text;
//! nothing here rewrites files.

use crate::models::Finding;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// A suggested code change for one finding.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationFix {
    pub threat_type: String,
    pub old_code: String,
    pub new_code: String,
    pub explanation: String,
}

pub struct RemediationEngine {
    secret_assignment: Option<Regex>,
    os_system_call: Option<Regex>,
}

impl RemediationEngine {
    pub fn new() -> Self {
        Self {
            secret_assignment: build_pattern(
                r#"(?P<var>[A-Za-z_][A-Za-z0-9_]*)\s*=\s*['"][^'"]+['"]"#,
            ),
            os_system_call: build_pattern(r"os\.system\s*\(\s*(?P<cmd>[^\n)]+)\)"),
        }
    }

    /// Produce a fix suggestion for a finding, if its threat type has one.
    pub fn generate_fix(&self, finding: &Finding) -> Option<RemediationFix> {
        let context = finding.context_line.as_str();

        match finding.threat_type.as_str() {
            "hardcoded_secrets" | "secrets_exposure" => {
                let caps = self.secret_assignment.as_ref()?.captures(context)?;
                let var = caps.name("var")?.as_str();
                let env_name = var.to_uppercase();
                Some(RemediationFix {
                    threat_type: finding.threat_type.clone(),
                    old_code: caps.get(0)?.as_str().to_string(),
                    new_code: format!("{} = os.getenv(\"{}\")", var, env_name),
                    explanation: format!(
                        "Read {} from the {} environment variable instead of embedding it",
                        var, env_name
                    ),
                })
            }
            "command_injection" => {
                let caps = self.os_system_call.as_ref()?.captures(context)?;
                let cmd = caps.name("cmd")?.as_str().trim();
                Some(RemediationFix {
                    threat_type: finding.threat_type.clone(),
                    old_code: caps.get(0)?.as_str().to_string(),
                    new_code: format!("subprocess.run(shlex.split({}), check=True)", cmd),
                    explanation: "Run the command without a shell so arguments cannot inject"
                        .to_string(),
                })
            }
            "shell_injection" => Some(RemediationFix {
                threat_type: finding.threat_type.clone(),
                old_code: context.to_string(),
                new_code: "subprocess.run([command, *args], shell=False, check=True)".to_string(),
                explanation: "Pass an argument list with shell=False instead of a shell string"
                    .to_string(),
            }),
            "sql_injection" => Some(RemediationFix {
                threat_type: finding.threat_type.clone(),
                old_code: context.to_string(),
                new_code: "cursor.execute(query, (param,))".to_string(),
                explanation: "Bind values with query parameters instead of string formatting"
                    .to_string(),
            }),
            "path_traversal" => Some(RemediationFix {
                threat_type: finding.threat_type.clone(),
                old_code: context.to_string(),
                new_code: "safe_path = os.path.normpath(os.path.join(base_dir, \
                           os.path.basename(user_path)))"
                    .to_string(),
                explanation: "Resolve paths against a fixed base directory and strip traversal \
                              segments"
                    .to_string(),
            }),
            "code_injection" => Some(RemediationFix {
                threat_type: finding.threat_type.clone(),
                old_code: context.to_string(),
                new_code: "ast.literal_eval(expression)".to_string(),
                explanation: "Evaluate literals only; arbitrary eval executes attacker input"
                    .to_string(),
            }),
            "unsafe_yaml" => Some(RemediationFix {
                threat_type: finding.threat_type.clone(),
                old_code: context.to_string(),
                new_code: "yaml.safe_load(stream)".to_string(),
                explanation: "safe_load refuses arbitrary object construction".to_string(),
            }),
            _ => None,
        }
    }

    /// Fixes for every finding that has one, in finding order.
    pub fn generate_fixes(&self, findings: &[Finding]) -> Vec<RemediationFix> {
        findings.iter().filter_map(|f| self.generate_fix(f)).collect()
    }
}

impl Default for RemediationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn build_pattern(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("Failed to compile remediation pattern '{}': {}", pattern, e);
            None
        }
    }
}
