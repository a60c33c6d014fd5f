//! Conversion service - capability layer
//!
//! Only covers the "turn one uploaded file into a purchase document"
//! capability. It never sees the batch: no `Vec<UploadedFile>`, no
//! counters, no progress.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::clients::FrappeClient;
use crate::error::AppResult;
use crate::models::{ConversionOutcome, ConvertMode, ManualSelection, UploadedFile};

/// Whitelisted server method that converts one File doc into a
/// Purchase Invoice (creating an Invoice2Erpnext Log along the way).
const CONVERT_METHOD: &str =
    "invoice2erpnext.invoice2erpnext.doctype.invoice2erpnext_log.invoice2erpnext_log.create_purchase_invoice_from_file";

/// The remote conversion operation, as the orchestrator sees it.
///
/// A seam rather than a concrete call so the batch loop can be exercised
/// against recorded fakes.
#[async_trait]
pub trait FileConverter: Send + Sync {
    async fn convert(
        &self,
        file: &UploadedFile,
        mode: ConvertMode,
        selection: Option<&ManualSelection>,
    ) -> AppResult<ConversionOutcome>;
}

/// Production converter backed by the Frappe client.
pub struct ConversionService {
    client: Arc<FrappeClient>,
}

impl ConversionService {
    pub fn new(client: Arc<FrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileConverter for ConversionService {
    async fn convert(
        &self,
        file: &UploadedFile,
        mode: ConvertMode,
        selection: Option<&ManualSelection>,
    ) -> AppResult<ConversionOutcome> {
        let args = build_args(file, mode, selection);
        debug!("converting {}", file);

        let message = self.client.call_method(CONVERT_METHOD, &args).await?;
        Ok(ConversionOutcome::from_message(&message))
    }
}

/// Builds the argument payload for one conversion call.
///
/// Supplier and item are only attached in manual mode; the auto path
/// sends the file reference and mode alone.
fn build_args(
    file: &UploadedFile,
    mode: ConvertMode,
    selection: Option<&ManualSelection>,
) -> Value {
    let mut args = json!({
        "file_doc_name": file.name,
        "mode": mode.as_str(),
    });
    if let Some(selection) = selection {
        args["supplier"] = Value::String(selection.supplier.clone());
        args["item"] = Value::String(selection.item.clone());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> UploadedFile {
        UploadedFile {
            name: "FILE-0001".to_string(),
            file_name: "invoice.pdf".to_string(),
            file_url: None,
        }
    }

    #[test]
    fn test_auto_args_carry_no_selection() {
        let args = build_args(&sample_file(), ConvertMode::Auto, None);
        assert_eq!(args["file_doc_name"], "FILE-0001");
        assert_eq!(args["mode"], "auto");
        assert!(args.get("supplier").is_none());
        assert!(args.get("item").is_none());
    }

    #[test]
    fn test_manual_args_carry_selection() {
        let selection = ManualSelection::new("SUP-0001", "ITEM-0001");
        let args = build_args(&sample_file(), ConvertMode::Manual, Some(&selection));
        assert_eq!(args["mode"], "manual");
        assert_eq!(args["supplier"], "SUP-0001");
        assert_eq!(args["item"], "ITEM-0001");
    }
}
