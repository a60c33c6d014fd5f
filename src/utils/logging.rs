//! Logging helpers
//!
//! Subscriber setup plus the formatted status blocks the app prints at
//! startup and after a batch.

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::BatchReport;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with verbose
/// logging on.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Writes the run-log header.
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\nInvoice conversion run - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// Appends the per-file outcomes and the final tally to the run log.
pub fn append_run_log(log_file_path: &str, report: &BatchReport) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    for outcome in &report.outcomes {
        let mark = if outcome.success { "OK " } else { "ERR" };
        writeln!(
            file,
            "[{}] {} - {}",
            mark,
            outcome.file_name,
            outcome.detail.as_deref().unwrap_or("-")
        )
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    }

    writeln!(
        file,
        "\nProcessed {}/{} ({} failed{}) - {}",
        report.processed,
        report.total,
        report.failed,
        if report.aborted { ", aborted" } else { "" },
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
    .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// Logs the startup banner.
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Invoice2Erpnext batch conversion");
    info!("🌐 Site: {}", config.base_url);
    info!("📁 Invoice folder: {}", config.invoice_folder);
    info!("⚙️ Mode: {}", config.mode);
    info!("{}", "=".repeat(60));
}

/// Logs how many invoice files the scan found.
pub fn log_files_found(total: usize, folder: &str) {
    info!("✓ Found {} invoice file(s) in {}", total, folder);
    info!("💡 Files are converted strictly one at a time\n");
}

/// Prints the final batch tally.
pub fn log_final_summary(report: &BatchReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Batch complete");
    info!(
        "Finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ Processed: {}/{}", report.processed, report.total);
    if report.failed > 0 {
        info!("❌ Failed calls: {}", report.failed);
    }
    if report.aborted {
        info!("⚠️ Batch aborted before the last file");
    }
    info!("{}", "=".repeat(60));
    info!("\nRun log written to: {}", log_file_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileOutcome;

    #[test]
    fn test_run_log_holds_header_outcomes_and_summary() {
        let path = std::env::temp_dir().join(format!("i2e-runlog-test-{}.log", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        init_log_file(&path_str).unwrap();
        let report = BatchReport {
            total: 2,
            attempted: 2,
            succeeded: 1,
            failed: 1,
            processed: 2,
            outcomes: vec![
                FileOutcome {
                    file_name: "a.pdf".to_string(),
                    success: true,
                    detail: Some("ACC-PINV-2025-00001".to_string()),
                },
                FileOutcome {
                    file_name: "b.pdf".to_string(),
                    success: false,
                    detail: Some("Insufficient credits".to_string()),
                },
            ],
            ..Default::default()
        };
        append_run_log(&path_str, &report).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Invoice conversion run"));
        assert!(contents.contains("[OK ] a.pdf - ACC-PINV-2025-00001"));
        assert!(contents.contains("[ERR] b.pdf - Insufficient credits"));
        assert!(contents.contains("Processed 2/2 (1 failed)"));

        fs::remove_file(&path).unwrap();
    }
}
