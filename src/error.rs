use std::fmt;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Remote API call errors
    Api(ApiError),
    /// Local file handling errors
    File(FileError),
    /// Business rule violations
    Business(BusinessError),
    /// Configuration errors
    Config(ConfigError),
    /// Anything else (wraps third-party errors)
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API error: {}", e),
            AppError::File(e) => write!(f, "file error: {}", e),
            AppError::Business(e) => write!(f, "business error: {}", e),
            AppError::Config(e) => write!(f, "config error: {}", e),
            AppError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Business(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// Remote API call errors
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The server answered with a non-success HTTP status
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body did not carry the expected envelope
    BadResponse {
        endpoint: String,
        detail: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "request to {} failed: {}", endpoint, source)
            }
            ApiError::BadStatus {
                endpoint,
                status,
                body,
            } => {
                write!(f, "HTTP {} from {}: {}", status, endpoint, body)
            }
            ApiError::BadResponse { endpoint, detail } => {
                write!(f, "unexpected response from {}: {}", endpoint, detail)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Local file handling errors
#[derive(Debug)]
pub enum FileError {
    /// Reading a file failed
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Writing a file failed
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Invoice folder does not exist
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "reading {} failed: {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "writing {} failed: {}", path, source)
            }
            FileError::DirectoryNotFound { path } => {
                write!(f, "directory not found: {}", path)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Business rule violations
#[derive(Debug)]
pub enum BusinessError {
    /// The Invoice2Erpnext integration is switched off in settings
    IntegrationDisabled,
    /// Manual mode started without a supplier/item selection
    ManualSelectionMissing,
    /// The chosen supplier cannot be used
    SupplierNotUsable {
        supplier: String,
        reason: String,
    },
    /// The chosen item cannot be used
    ItemNotUsable {
        item: String,
        reason: String,
    },
    /// Unknown conversion mode string
    ModeParseFailed {
        mode: String,
    },
    /// Unknown value for a batch option
    OptionParseFailed {
        option: String,
        value: String,
    },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::IntegrationDisabled => {
                write!(f, "the Invoice2Erpnext integration is disabled in settings")
            }
            BusinessError::ManualSelectionMissing => {
                write!(f, "manual mode requires a supplier and an item selection")
            }
            BusinessError::SupplierNotUsable { supplier, reason } => {
                write!(f, "supplier {} cannot be used: {}", supplier, reason)
            }
            BusinessError::ItemNotUsable { item, reason } => {
                write!(f, "item {} cannot be used: {}", item, reason)
            }
            BusinessError::ModeParseFailed { mode } => {
                write!(f, "unknown conversion mode: {}", mode)
            }
            BusinessError::OptionParseFailed { option, value } => {
                write!(f, "unknown {}: {}", option, value)
            }
        }
    }
}

impl std::error::Error for BusinessError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// A required credential is not set
    MissingCredential {
        var_name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCredential { var_name } => {
                write!(f, "required credential {} is not set", var_name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== Conversions from common error types ==========
// anyhow already blanket-covers AppError, nothing to implement there.

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(), // io errors usually carry no path
            source: Box::new(err),
        })
    }
}

// ========== Convenience constructors ==========

impl AppError {
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    pub fn bad_response(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            detail: detail.into(),
        })
    }

    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result type alias ==========

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
