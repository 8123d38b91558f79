use chemsure_models::LookupError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChemsureError {
    #[error("Reference data not loaded: {message}")]
    DataNotLoaded { message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Text extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("OCR backend error: {backend} - {message}")]
    OcrBackend { backend: String, message: String },

    #[error("Reference data error: {message}")]
    ReferenceData { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Unmatched routes. Lookup misses are `Ok(None)`, never this.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ChemsureError {
    pub fn data_not_loaded() -> Self {
        Self::DataNotLoaded {
            message: "GADSL data failed to load; lookups are unavailable".to_string(),
        }
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    pub fn extraction_failed(message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
        }
    }

    pub fn ocr_backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OcrBackend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn reference_data(message: impl Into<String>) -> Self {
        Self::ReferenceData {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataNotLoaded { .. } => "DATA_NOT_LOADED",
            Self::MalformedInput { .. } => "MALFORMED_INPUT",
            Self::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            Self::OcrBackend { .. } => "OCR_BACKEND_ERROR",
            Self::ReferenceData { .. } => "REFERENCE_DATA_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::DataNotLoaded { .. } => 503,
            Self::MalformedInput { .. } => 400,
            Self::ExtractionFailed { .. } => 422,
            Self::OcrBackend { .. } => 502,
            Self::ReferenceData { .. } => 500,
            Self::Configuration { .. } => 500,
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Internal { .. } => 500,
        }
    }
}

pub type ChemsureResult<T> = Result<T, ChemsureError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<ChemsureError> for ErrorResponse {
    fn from(error: ChemsureError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl From<LookupError> for ChemsureError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::DataNotLoaded => Self::data_not_loaded(),
        }
    }
}

impl From<std::io::Error> for ChemsureError {
    fn from(error: std::io::Error) -> Self {
        Self::internal(error.to_string())
    }
}

impl From<csv::Error> for ChemsureError {
    fn from(error: csv::Error) -> Self {
        Self::reference_data(error.to_string())
    }
}

impl From<calamine::Error> for ChemsureError {
    fn from(error: calamine::Error) -> Self {
        Self::reference_data(error.to_string())
    }
}

impl From<calamine::XlsxError> for ChemsureError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::reference_data(error.to_string())
    }
}

impl From<config::ConfigError> for ChemsureError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<serde_json::Error> for ChemsureError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}
