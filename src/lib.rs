//! # invoice2erpnext
//!
//! Batch client for the Invoice2Erpnext integration of a Frappe/ERPNext
//! site: uploads a folder of invoice files and converts them into
//! Purchase Invoices, one remote call at a time.
//!
//! ## Architecture
//!
//! The crate keeps a strict layering:
//!
//! ### ① Transport (`clients/`)
//! - `FrappeClient` - the only module that touches HTTP; authenticated
//!   whitelisted-method calls and multipart file uploads
//!
//! ### ② Capabilities (`services/`)
//! - `ConversionService` - converts a single uploaded file
//! - `SettingsService` - enabled gate, connection test, credits
//! - `SelectionService` - validates a manual supplier/item pair
//! - `UploadService` - pushes local files to the site
//!
//! ### ③ Progress (`progress/`)
//! - `ProgressSurface` - explicit per-batch handle, no global dialog state
//! - `LogProgress` - textual percentage bar on the log
//!
//! ### ④ Orchestration (`orchestrator/`)
//! - `App` - startup, gates, upload, manual selection
//! - `run_batch` - the sequential conversion loop and its tally

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod services;
pub mod utils;

// Re-export the common types
pub use clients::FrappeClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    BatchOptions, BatchReport, ConversionOutcome, ConvertMode, CountingMode, FailurePolicy,
    FileOutcome, ManualSelection, UploadedFile,
};
pub use orchestrator::{run_batch, App};
pub use progress::{LogProgress, ProgressSurface};
pub use services::{ConversionService, FileConverter};
