//! Batch conversion orchestrator
//!
//! ## Responsibility
//!
//! Entry point of the application: wires up the services, applies the
//! enabled gate, uploads the invoice folder and runs the sequential
//! conversion batch.
//!
//! ## Core behavior
//!
//! 1. **Startup**: run-log header, credential check, service construction
//! 2. **Gate**: the batch never starts when the integration is disabled
//! 3. **Upload**: every invoice file becomes a File doc before the batch
//! 4. **Manual selection**: gathered and validated once, before the batch
//! 5. **Sequential loop**: one conversion call in flight at any time;
//!    the counter advances exactly once per completed call
//! 6. **Summary**: progress dismissed after a short delay, final tally
//!    logged, per the configured counting mode
//!
//! There is no cancellation once the loop runs and no per-call timeout;
//! a hung remote call stalls the batch, which matches the original
//! client.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::clients::FrappeClient;
use crate::config::Config;
use crate::error::{AppError, AppResult, BusinessError, ConfigError};
use crate::models::{
    BatchOptions, BatchReport, ConvertMode, FailurePolicy, FileOutcome, ManualSelection,
    UploadedFile,
};
use crate::progress::{LogProgress, ProgressSurface};
use crate::services::{
    ConversionService, FileConverter, SelectionService, SettingsService, UploadService,
};
use crate::utils::logging;

/// Application root: owns the client and the services built on it.
pub struct App {
    config: Config,
    settings: SettingsService,
    uploads: UploadService,
    selections: SelectionService,
    converter: ConversionService,
}

impl App {
    /// Initializes the application
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        if config.api_key.is_empty() {
            return Err(AppError::Config(ConfigError::MissingCredential {
                var_name: "I2E_API_KEY".to_string(),
            })
            .into());
        }
        if config.api_secret.is_empty() {
            return Err(AppError::Config(ConfigError::MissingCredential {
                var_name: "I2E_API_SECRET".to_string(),
            })
            .into());
        }

        let client = Arc::new(FrappeClient::new(&config));
        Ok(Self {
            settings: SettingsService::new(client.clone()),
            uploads: UploadService::new(client.clone()),
            selections: SelectionService::new(client.clone()),
            converter: ConversionService::new(client),
            config,
        })
    }

    /// Runs the application main flow
    pub async fn run(&self) -> Result<()> {
        if self.config.test_connection {
            return self.run_connection_test().await;
        }

        // The original client hides its upload entry points when the
        // integration is off or the check errs; stay quiet likewise.
        match self.settings.check_enabled().await {
            Ok(true) => {}
            Ok(false) => {
                warn!("⚠️ Invoice2Erpnext integration is disabled in settings, nothing to do");
                return Ok(());
            }
            Err(e) => {
                warn!("⚠️ Could not check integration settings ({}), nothing to do", e);
                return Ok(());
            }
        }

        if let Ok(Some(credits)) = self.settings.available_credits().await {
            info!("💳 Available credits: {:.2}", credits);
        }

        let paths = crate::services::upload_service::scan_invoice_folder(
            self.config.invoice_folder.as_ref(),
        )?;
        if paths.is_empty() {
            warn!(
                "⚠️ No invoice files found in {}, nothing to do",
                self.config.invoice_folder
            );
            return Ok(());
        }
        logging::log_files_found(paths.len(), &self.config.invoice_folder);

        let files = self.uploads.upload_all(&paths).await?;

        let selection = match self.resolve_selection().await? {
            SelectionStep::NotNeeded => None,
            SelectionStep::Chosen(selection) => Some(selection),
            SelectionStep::Cancelled => {
                info!("Selection cancelled, batch not started");
                return Ok(());
            }
        };

        let options = BatchOptions {
            counting_mode: self.config.counting_mode,
            failure_policy: self.config.failure_policy,
            dismiss_delay: Duration::from_millis(self.config.dismiss_delay_ms),
        };
        let progress = LogProgress::new();
        let report = run_batch(
            &self.converter,
            &files,
            self.config.mode,
            selection.as_ref(),
            &progress,
            &options,
        )
        .await?;

        if let Err(e) = logging::append_run_log(&self.config.output_log_file, &report) {
            warn!("⚠️ Could not write run log: {}", e);
        }
        logging::log_final_summary(&report, &self.config.output_log_file);
        Ok(())
    }

    /// TEST_CONNECTION mode: probe the backend, report, exit.
    async fn run_connection_test(&self) -> Result<()> {
        let status = self.settings.test_connection().await?;
        if status.success {
            match status.credits {
                Some(credits) => info!("✅ Connection successful! Credits: {:.2}", credits),
                None => info!("✅ Connection successful!"),
            }
        } else {
            error!("❌ Connection failed: {}", status.message);
        }
        Ok(())
    }

    /// Gathers and validates the manual selection before the batch.
    ///
    /// Configured values win; otherwise a blocking prompt stands in for
    /// the original selection dialog. An empty answer cancels, and a
    /// cancelled or invalid selection means the batch never starts.
    async fn resolve_selection(&self) -> AppResult<SelectionStep> {
        if self.config.mode != ConvertMode::Manual {
            return Ok(SelectionStep::NotNeeded);
        }

        let selection = match self.config.manual_selection() {
            Some(selection) => selection,
            None => {
                // The prompt blocks on stdin, so it runs off the
                // runtime's worker threads.
                let prompted = tokio::task::spawn_blocking(prompt_manual_selection)
                    .await
                    .map_err(|e| AppError::Other(format!("selection prompt failed: {}", e)))??;
                match prompted {
                    Some(selection) => selection,
                    None => return Ok(SelectionStep::Cancelled),
                }
            }
        };

        self.selections.validate(&selection).await?;
        info!(
            "📋 Manual selection: supplier={}, item={}",
            selection.supplier, selection.item
        );
        Ok(SelectionStep::Chosen(selection))
    }
}

enum SelectionStep {
    NotNeeded,
    Chosen(ManualSelection),
    Cancelled,
}

/// Runs one conversion batch: one remote call per file, strictly in
/// order, each awaited before the next starts.
///
/// The progress handle is scoped to this invocation; it is started
/// before the first call and sees exactly one `advance` per completed
/// call, so the percentage after call `i` is `i/N*100`. An empty input
/// returns an empty report without touching the progress surface.
pub async fn run_batch(
    converter: &dyn FileConverter,
    files: &[UploadedFile],
    mode: ConvertMode,
    selection: Option<&ManualSelection>,
    progress: &dyn ProgressSurface,
    options: &BatchOptions,
) -> AppResult<BatchReport> {
    if files.is_empty() {
        return Ok(BatchReport::default());
    }
    if mode == ConvertMode::Manual && selection.is_none() {
        return Err(AppError::Business(BusinessError::ManualSelectionMissing));
    }

    let total = files.len();
    let mut report = BatchReport {
        total,
        ..Default::default()
    };

    progress.start(total).await;

    for file in files {
        let (success, detail) = match converter.convert(file, mode, selection).await {
            Ok(outcome) if outcome.success => {
                match &outcome.document_id {
                    Some(id) => info!("✓ {} → {}", file, id),
                    None => info!("✓ {}", file),
                }
                (true, outcome.document_id)
            }
            Ok(outcome) => {
                warn!(
                    "⚠️ {} was rejected: {}",
                    file,
                    outcome.error_message.as_deref().unwrap_or("no message")
                );
                (false, outcome.error_message)
            }
            Err(e) => {
                error!("❌ {} failed: {}", file, e);
                (false, Some(e.to_string()))
            }
        };

        if success {
            report.succeeded += 1;
        } else {
            report.failed += 1;
        }
        report.outcomes.push(FileOutcome {
            file_name: file.file_name.clone(),
            success,
            detail,
        });

        // One advance per completed call, success or not.
        report.attempted += 1;
        progress.advance(report.attempted, total).await;

        if !success
            && options.failure_policy == FailurePolicy::Abort
            && report.attempted < total
        {
            warn!(
                "⚠️ Aborting batch after {} of {} files",
                report.attempted, total
            );
            report.aborted = true;
            break;
        }
    }

    // Leave the full (or last) bar visible for a moment, as the original
    // dialog did, before dismissing the surface.
    sleep(options.dismiss_delay).await;
    progress.finish(report.attempted, total).await;

    report.settle(options.counting_mode);
    info!("✅ Created {} documents successfully", report.processed);
    Ok(report)
}

/// Blocking stand-in for the supplier/item selection dialog.
///
/// Empty input on either prompt cancels the batch.
fn prompt_manual_selection() -> AppResult<Option<ManualSelection>> {
    let supplier = prompt_line("Supplier: ")?;
    if supplier.is_empty() {
        return Ok(None);
    }
    let item = prompt_line("Item: ")?;
    if item.is_empty() {
        return Ok(None);
    }
    Ok(Some(ManualSelection::new(supplier, item)))
}

fn prompt_line(label: &str) -> AppResult<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
