pub mod batch;
pub mod invoice_file;

pub use batch::{BatchOptions, BatchReport, CountingMode, FailurePolicy, FileOutcome};
pub use invoice_file::{ConversionOutcome, ConvertMode, ManualSelection, UploadedFile};
