//! Selection service - capability layer
//!
//! Validates a manual supplier/item pair against the site before a batch
//! starts, with the same restrictions the original selection dialog put
//! on its link fields: suppliers must not be disabled, items must not be
//! disabled and must be purchase items.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::FrappeClient;
use crate::error::{AppError, AppResult, BusinessError};
use crate::models::ManualSelection;

const GET_VALUE_METHOD: &str = "frappe.client.get_value";

pub struct SelectionService {
    client: Arc<FrappeClient>,
}

impl SelectionService {
    pub fn new(client: Arc<FrappeClient>) -> Self {
        Self { client }
    }

    /// Checks both halves of the selection; an unusable half fails the
    /// whole validation and the batch never starts.
    pub async fn validate(&self, selection: &ManualSelection) -> AppResult<()> {
        let supplier_args = json!({
            "doctype": "Supplier",
            "filters": { "name": selection.supplier, "disabled": 0 },
            "fieldname": "name",
        });
        let message = self.client.call_method(GET_VALUE_METHOD, &supplier_args).await?;
        if !record_found(&message) {
            return Err(AppError::Business(BusinessError::SupplierNotUsable {
                supplier: selection.supplier.clone(),
                reason: "not found or disabled".to_string(),
            }));
        }

        let item_args = json!({
            "doctype": "Item",
            "filters": {
                "name": selection.item,
                "disabled": 0,
                "is_purchase_item": 1,
            },
            "fieldname": "name",
        });
        let message = self.client.call_method(GET_VALUE_METHOD, &item_args).await?;
        if !record_found(&message) {
            return Err(AppError::Business(BusinessError::ItemNotUsable {
                item: selection.item.clone(),
                reason: "not found, disabled or not a purchase item".to_string(),
            }));
        }

        Ok(())
    }
}

/// `frappe.client.get_value` answers `{}` or `null` when nothing matched.
fn record_found(message: &Value) -> bool {
    message
        .get("name")
        .map(|name| !name.is_null())
        .unwrap_or(false)
}
