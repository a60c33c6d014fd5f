//! Invoice file and conversion types.
//!
//! These mirror the documents the Frappe site works with: an uploaded
//! `File` doc reference, the conversion mode, the manual supplier/item
//! selection and the outcome of one remote conversion call.

use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{AppError, BusinessError};

/// Reference to a file already persisted on the site.
///
/// Created by the upload step; the batch orchestrator only ever reads it.
/// The document store owns the underlying binary, never this crate.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Unique name of the `File` document.
    pub name: String,
    /// Display name of the file as uploaded.
    pub file_name: String,
    /// URL the site serves the file under, when reported back.
    #[serde(default)]
    pub file_url: Option<String>,
}

impl Display for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.file_name, self.name)
    }
}

/// Operating mode of a conversion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertMode {
    /// The server extracts supplier and items from the file on its own.
    Auto,
    /// A supplier/item pair chosen up front is attached to every call.
    Manual,
}

impl ConvertMode {
    /// Wire value expected by the remote method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConvertMode::Auto => "auto",
            ConvertMode::Manual => "manual",
        }
    }
}

impl FromStr for ConvertMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ConvertMode::Auto),
            "manual" => Ok(ConvertMode::Manual),
            other => Err(AppError::Business(BusinessError::ModeParseFailed {
                mode: other.to_string(),
            })),
        }
    }
}

impl Display for ConvertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplier/item pair gathered once before a manual batch starts.
///
/// The same pair is attached identically to every call in the batch;
/// it is never re-prompted per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualSelection {
    pub supplier: String,
    pub item: String,
}

impl ManualSelection {
    pub fn new(supplier: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            supplier: supplier.into(),
            item: item.into(),
        }
    }
}

/// Outcome of one remote conversion call.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Whether the server reported the document as created.
    pub success: bool,
    /// Name of the created document (or conversion log), when reported.
    pub document_id: Option<String>,
    /// Application-level error message, when the server rejected the file.
    pub error_message: Option<String>,
}

impl ConversionOutcome {
    /// Interprets the unwrapped `message` payload of the remote method.
    ///
    /// Two shapes exist in the wild:
    /// - an object `{"success": bool, "document_id"/"message": ...}`
    /// - a bare string holding the created log name (older servers),
    ///   which is taken as success
    pub fn from_message(message: &Value) -> Self {
        if let Some(name) = message.as_str() {
            return Self {
                success: true,
                document_id: Some(name.to_string()),
                error_message: None,
            };
        }

        let success = message
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let document_id = message
            .get("document_id")
            .or_else(|| message.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let error_message = if success {
            None
        } else {
            message
                .get("message")
                .or_else(|| message.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            success,
            document_id,
            error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_mode_round_trip() {
        assert_eq!("auto".parse::<ConvertMode>().unwrap(), ConvertMode::Auto);
        assert_eq!(
            "MANUAL".parse::<ConvertMode>().unwrap(),
            ConvertMode::Manual
        );
        assert!("batch".parse::<ConvertMode>().is_err());
    }

    #[test]
    fn test_outcome_from_object_message() {
        let outcome = ConversionOutcome::from_message(&json!({
            "success": true,
            "document_id": "ACC-PINV-2025-00042"
        }));
        assert!(outcome.success);
        assert_eq!(outcome.document_id.as_deref(), Some("ACC-PINV-2025-00042"));
        assert!(outcome.error_message.is_none());
    }

    #[test]
    fn test_outcome_from_error_message() {
        let outcome = ConversionOutcome::from_message(&json!({
            "success": false,
            "message": "Insufficient credits"
        }));
        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("Insufficient credits"));
    }

    #[test]
    fn test_outcome_from_bare_log_name() {
        // Older servers answer with the conversion-log name only.
        let outcome = ConversionOutcome::from_message(&json!("I2E-LOG-00007"));
        assert!(outcome.success);
        assert_eq!(outcome.document_id.as_deref(), Some("I2E-LOG-00007"));
    }
}
