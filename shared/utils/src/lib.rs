pub mod config;
pub mod logging;
pub mod error;
pub mod reference;

pub use config::*;
pub use logging::*;
pub use error::*;
pub use reference::{ReferenceDataset, ReferenceFormat, ReferenceLoader};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.scanner.min_text_chars, 50);
        assert_eq!(config.scanner.ocr_dpi, 300);
        assert_eq!(config.scanner.contrast_factor, 2.0);
        assert!(!config.reference.require_on_startup);
    }

    #[test]
    fn test_error_handling() {
        let error = ChemsureError::validation("cas_rn", "CAS number is required");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);

        let error = ChemsureError::data_not_loaded();
        assert_eq!(error.error_code(), "DATA_NOT_LOADED");
        assert_eq!(error.http_status_code(), 503);
    }

    #[test]
    fn test_lookup_error_conversion() {
        let error: ChemsureError = chemsure_models::LookupError::DataNotLoaded.into();
        assert!(matches!(error, ChemsureError::DataNotLoaded { .. }));

        let response = ErrorResponse::from(error);
        assert_eq!(response.code, "DATA_NOT_LOADED");
    }
}
