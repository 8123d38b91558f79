use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reference: ReferenceConfig,
    pub scanner: ScannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// GADSL reference list (.xlsx, .xls or .csv).
    pub path: String,
    /// Worksheet to read; the first sheet when unset.
    pub sheet: Option<String>,
    /// Abort startup instead of serving `DataNotLoaded` when the list fails to load.
    pub require_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Structured text shorter than this (after trimming) triggers the OCR fallback.
    pub min_text_chars: usize,
    pub ocr_dpi: u32,
    pub contrast_factor: f32,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub tesseract_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let defaults = Config::try_from(&AppConfig::default())?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Local overrides (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("CHEMSURE").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_request_size: 32 * 1024 * 1024, // 32MB
            },
            reference: ReferenceConfig {
                path: "GADSL-Reference-List.xlsx".to_string(),
                sheet: None,
                require_on_startup: false,
            },
            scanner: ScannerConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                file_path: None,
            },
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 50,
            ocr_dpi: 300,
            contrast_factor: 2.0,
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            tesseract_lang: "eng".to_string(),
        }
    }
}
