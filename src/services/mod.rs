//! Capability layer
//!
//! Each service wraps one remote capability and only ever deals with a
//! single file or a single lookup. Batch sequencing, counting and
//! progress all live one layer up, in the orchestrator.

pub mod conversion_service;
pub mod selection_service;
pub mod settings_service;
pub mod upload_service;

pub use conversion_service::{ConversionService, FileConverter};
pub use selection_service::SelectionService;
pub use settings_service::{ConnectionStatus, SettingsService};
pub use upload_service::UploadService;
