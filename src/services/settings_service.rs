//! Settings service - capability layer
//!
//! Talks to the Invoice2Erpnext Settings doc: the enabled gate checked
//! before anything else runs, the connection test and the credits
//! balance shown at startup.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::FrappeClient;
use crate::error::AppResult;

const CHECK_ENABLED_METHOD: &str = "invoice2erpnext.utils.check_settings_enabled";
const GET_CREDITS_METHOD: &str =
    "invoice2erpnext.invoice2erpnext.doctype.invoice2erpnext_settings.invoice2erpnext_settings.get_available_credits";
/// Generic dispatcher for doc methods; used for `test_connection`, which
/// lives on the settings doc itself.
const RUN_DOC_METHOD: &str = "run_doc_method";
/// Single doctype, so doc name equals doctype name.
const SETTINGS_DOCTYPE: &str = "Invoice2Erpnext Settings";

/// Result of a connection test against the conversion backend.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub success: bool,
    pub credits: Option<f64>,
    pub message: String,
}

pub struct SettingsService {
    client: Arc<FrappeClient>,
}

impl SettingsService {
    pub fn new(client: Arc<FrappeClient>) -> Self {
        Self { client }
    }

    /// Whether the integration is switched on in settings.
    ///
    /// The original client hides every upload entry point when this is
    /// false, so callers should stop before uploading anything.
    pub async fn check_enabled(&self) -> AppResult<bool> {
        let message = self.client.call_method(CHECK_ENABLED_METHOD, &json!({})).await?;
        Ok(is_truthy(&message))
    }

    /// Runs the settings doc's `test_connection`, which also refreshes
    /// the enabled flag server-side.
    pub async fn test_connection(&self) -> AppResult<ConnectionStatus> {
        let args = json!({
            "dt": SETTINGS_DOCTYPE,
            "dn": SETTINGS_DOCTYPE,
            "method": "test_connection",
        });
        let message = self.client.call_method(RUN_DOC_METHOD, &args).await?;
        Ok(parse_connection_status(&message))
    }

    /// Current credits balance, as shown on the settings form.
    pub async fn available_credits(&self) -> AppResult<Option<f64>> {
        let message = self.client.call_method(GET_CREDITS_METHOD, &json!({})).await?;
        Ok(parse_credits(&message))
    }
}

// ========== Payload helpers ==========

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

fn parse_connection_status(message: &Value) -> ConnectionStatus {
    let success = message
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    ConnectionStatus {
        success,
        credits: message.get("credits").and_then(as_number),
        message: message
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(if success { "Connection successful" } else { "Connection failed" })
            .to_string(),
    }
}

/// The credits endpoint answers `{"value": ...}`, number or numeric string.
fn parse_credits(message: &Value) -> Option<f64> {
    message.get("value").and_then(as_number)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', ".").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("yes")));
    }

    #[test]
    fn test_parse_connection_status_success() {
        let status = parse_connection_status(&json!({
            "success": true,
            "credits": 42.5,
            "message": "Successfully connected to ERPNext API"
        }));
        assert!(status.success);
        assert_eq!(status.credits, Some(42.5));
        assert_eq!(status.message, "Successfully connected to ERPNext API");
    }

    #[test]
    fn test_parse_connection_status_failure_defaults() {
        let status = parse_connection_status(&json!({}));
        assert!(!status.success);
        assert!(status.credits.is_none());
        assert_eq!(status.message, "Connection failed");
    }

    #[test]
    fn test_parse_credits_accepts_numeric_strings() {
        assert_eq!(parse_credits(&json!({"value": 10})), Some(10.0));
        assert_eq!(parse_credits(&json!({"value": "12,50"})), Some(12.5));
        assert_eq!(parse_credits(&json!({})), None);
    }
}
