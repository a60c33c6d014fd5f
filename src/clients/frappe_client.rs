//! Frappe REST client
//!
//! Wraps every HTTP exchange with the site: whitelisted-method calls and
//! file uploads. Nothing above this layer touches reqwest directly.

use std::path::Path;

use reqwest::multipart;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::UploadedFile;

/// Standard Frappe endpoint that persists an uploaded file as a File doc.
const UPLOAD_FILE_METHOD: &str = "upload_file";

/// Authenticated client for one Frappe site.
pub struct FrappeClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl FrappeClient {
    /// Creates a client from the configured site URL and token pair.
    ///
    /// Authentication uses the `token <api_key>:<api_secret>` scheme the
    /// Invoice2Erpnext settings doc itself uses for its outbound calls.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: format!("token {}:{}", config.api_key, config.api_secret),
        }
    }

    /// Calls a whitelisted server method and returns its unwrapped result.
    ///
    /// Frappe wraps every method result in a `{"message": ...}` envelope;
    /// this strips it so callers see the payload the method returned.
    pub async fn call_method(&self, method: &str, args: &Value) -> AppResult<Value> {
        let endpoint = format!("{}/api/method/{}", self.base_url, method);
        debug!("POST {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(args)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                body,
            }));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        payload
            .get("message")
            .cloned()
            .ok_or_else(|| AppError::bad_response(&endpoint, "missing 'message' envelope"))
    }

    /// Uploads one local file and returns the resulting File doc reference.
    pub async fn upload_file(&self, path: &Path) -> AppResult<UploadedFile> {
        let endpoint = format!("{}/api/method/{}", self.base_url, UPLOAD_FILE_METHOD);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.to_string_lossy(), e))?;

        debug!("POST {} ({}, {} bytes)", endpoint, file_name, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(content_type_for(&file_name))
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("is_private", "0");

        let response = self
            .http
            .post(&endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                body,
            }));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;
        let message = payload
            .get("message")
            .cloned()
            .ok_or_else(|| AppError::bad_response(&endpoint, "missing 'message' envelope"))?;

        serde_json::from_value(message)
            .map_err(|e| AppError::bad_response(&endpoint, format!("bad File doc: {}", e)))
    }
}

// ========== Helpers ==========

/// Content type by file extension, octet-stream when unknown.
fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
