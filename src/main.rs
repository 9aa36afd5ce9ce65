use clap::Parser;
use env_logger::Env;
use skguard::cli::{Args, OutputFormat};
use skguard::remediation::RemediationEngine;
use skguard::scanner::{ScanOptions, SecurityScanner};
use skguard::signatures::SignatureSet;
use skguard::store::SecurityStore;
use skguard::SkGuardResult;
use std::fmt::Write as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    match run(&args) {
        Ok(exceeded) => {
            if exceeded {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Run one scan. Returns whether the risk score reached the threshold.
fn run(args: &Args) -> SkGuardResult<bool> {
    let signatures = match &args.signatures {
        Some(path) => match SignatureSet::from_feed_file(path) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Falling back to built-in signatures: {}", e);
                SignatureSet::builtin()
            }
        },
        None => SignatureSet::builtin(),
    };

    let mut options = ScanOptions {
        max_file_size: args.max_file_size * 1024 * 1024,
        skip_binaries: !args.include_binaries,
        ..ScanOptions::default()
    };
    if !args.skip_extensions.is_empty() {
        options.skip_extensions = args.skip_extensions.clone();
    }

    let scanner = SecurityScanner::new(signatures, options);
    let result = scanner.scan(&args.target)?;

    if let Some(db_path) = &args.db {
        let store = SecurityStore::open(db_path)?;
        store.record_scan(&result)?;
        log::info!("Scan recorded in {:?}", db_path);
    }

    let mut output = match args.format {
        OutputFormat::Json => result.to_json()?,
        OutputFormat::Text => result.format_report(),
    };

    if args.remediate && args.format == OutputFormat::Text {
        let fixes = RemediationEngine::new().generate_fixes(&result.findings);
        if !fixes.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "Suggested Fixes:");
            let _ = writeln!(output, "{}", "-".repeat(50));
            for fix in &fixes {
                let _ = writeln!(output, "[{}]", fix.threat_type);
                let _ = writeln!(output, "  - {}", fix.old_code);
                let _ = writeln!(output, "  + {}", fix.new_code);
                let _ = writeln!(output, "    {}", fix.explanation);
            }
        }
    }

    match &args.export {
        Some(path) => {
            std::fs::write(path, &output)
                .map_err(|e| skguard::SkGuardError::io(e, Some(path.clone())))?;
            log::info!("Results written to {:?}", path);
        }
        None => println!("{}", output),
    }

    Ok(result.risk_score >= args.threshold)
}
