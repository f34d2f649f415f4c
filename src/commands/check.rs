// Check command - parse save files and report everything wrong with them

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::cli::args::CheckArgs;
use crate::config::Config;
use crate::parser;

use super::collect_save_files;

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub warnings: Vec<String>,
    pub reference_warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    Ok,
    Rejected,
    IoError,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileReport>,
    pub summary: CheckSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub total_files: usize,
    pub files_rejected: usize,
    pub total_warnings: usize,
}

pub async fn handle_check(args: &CheckArgs, config: &Config) -> Result<()> {
    let mut files = Vec::new();
    let mut reports: Vec<FileReport> = Vec::new();

    for path in &args.paths {
        if path.is_dir() || path.is_file() {
            files.extend(collect_save_files(path));
        } else {
            reports.push(FileReport {
                file: path.to_string_lossy().to_string(),
                status: FileStatus::IoError,
                reason: Some("Path not found".to_string()),
                warnings: Vec::new(),
                reference_warnings: Vec::new(),
            });
        }
    }

    let validate = config.check.validate && !args.no_validate;

    info!("Checking {} file(s)...", files.len());

    for file in &files {
        let file_str = file.to_string_lossy().to_string();
        let report = match parser::parse_save_file(file) {
            Ok(Ok(parsed)) => {
                let reference_warnings = if validate {
                    parser::validate_collection(&parsed.collection, parsed.dictionary())
                } else {
                    Vec::new()
                };
                FileReport {
                    file: file_str,
                    status: FileStatus::Ok,
                    reason: None,
                    warnings: parsed.warnings,
                    reference_warnings,
                }
            }
            Ok(Err(rejection)) => FileReport {
                file: file_str,
                status: FileStatus::Rejected,
                reason: Some(rejection.to_string()),
                warnings: Vec::new(),
                reference_warnings: Vec::new(),
            },
            Err(e) => FileReport {
                file: file_str,
                status: FileStatus::IoError,
                reason: Some(e.to_string()),
                warnings: Vec::new(),
                reference_warnings: Vec::new(),
            },
        };
        reports.push(report);
    }

    let files_rejected = reports
        .iter()
        .filter(|r| r.status != FileStatus::Ok)
        .count();
    let total_warnings = reports
        .iter()
        .map(|r| r.warnings.len() + r.reference_warnings.len())
        .sum();

    if args.is_json() {
        let report = CheckReport {
            summary: CheckSummary {
                total_files: reports.len(),
                files_rejected,
                total_warnings,
            },
            files: reports,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for report in &reports {
            match report.status {
                FileStatus::Ok => {
                    if report.warnings.is_empty() && report.reference_warnings.is_empty() {
                        println!("{} ... OK", report.file);
                    } else {
                        println!(
                            "{} ... {} warning(s)",
                            report.file,
                            report.warnings.len() + report.reference_warnings.len()
                        );
                        for w in &report.warnings {
                            println!("  warning: {}", w);
                        }
                        for w in &report.reference_warnings {
                            println!("  reference: {}", w);
                        }
                    }
                }
                FileStatus::Rejected => {
                    println!(
                        "{} ... REJECTED: {}",
                        report.file,
                        report.reason.as_deref().unwrap_or("unknown")
                    );
                }
                FileStatus::IoError => {
                    println!(
                        "{} ... ERROR: {}",
                        report.file,
                        report.reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
    }

    if files_rejected > 0 {
        std::process::exit(1);
    }
    Ok(())
}
