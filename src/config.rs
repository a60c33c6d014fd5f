use crate::models::{ConvertMode, CountingMode, FailurePolicy};

/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Frappe site
    pub base_url: String,
    /// API key of the integration user
    pub api_key: String,
    /// API secret of the integration user
    pub api_secret: String,
    /// Folder scanned for invoice files to upload
    pub invoice_folder: String,
    /// Conversion mode (auto | manual)
    pub mode: ConvertMode,
    /// Supplier for manual mode (prompted for when unset)
    pub supplier: Option<String>,
    /// Item for manual mode (prompted for when unset)
    pub item: Option<String>,
    /// How completed calls are counted (legacy | strict)
    pub counting_mode: CountingMode,
    /// What a failed call does to the batch (continue | abort)
    pub failure_policy: FailurePolicy,
    /// Delay in ms before the progress surface is dismissed
    pub dismiss_delay_ms: u64,
    /// Only test the connection and report credits, then exit
    pub test_connection: bool,
    /// Whether to show verbose logs
    pub verbose_logging: bool,
    /// Run log file
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            invoice_folder: "invoices".to_string(),
            mode: ConvertMode::Auto,
            supplier: None,
            item: None,
            counting_mode: CountingMode::Legacy,
            failure_policy: FailurePolicy::Continue,
            dismiss_delay_ms: 1000,
            test_connection: false,
            verbose_logging: false,
            output_log_file: "invoice2erpnext.log".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("I2E_BASE_URL").unwrap_or(default.base_url),
            api_key: std::env::var("I2E_API_KEY").unwrap_or(default.api_key),
            api_secret: std::env::var("I2E_API_SECRET").unwrap_or(default.api_secret),
            invoice_folder: std::env::var("INVOICE_FOLDER").unwrap_or(default.invoice_folder),
            mode: std::env::var("CONVERT_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.mode),
            supplier: std::env::var("SUPPLIER").ok().filter(|v| !v.is_empty()),
            item: std::env::var("ITEM").ok().filter(|v| !v.is_empty()),
            counting_mode: std::env::var("COUNTING_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.counting_mode),
            failure_policy: std::env::var("FAILURE_POLICY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.failure_policy),
            dismiss_delay_ms: std::env::var("DISMISS_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dismiss_delay_ms),
            test_connection: std::env::var("TEST_CONNECTION").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(default.test_connection),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// Manual selection as configured, when both halves are present.
    pub fn manual_selection(&self) -> Option<crate::models::ManualSelection> {
        match (&self.supplier, &self.item) {
            (Some(supplier), Some(item)) => Some(crate::models::ManualSelection::new(
                supplier.clone(),
                item.clone(),
            )),
            _ => None,
        }
    }
}
