use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "chemsure-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let reference = match state.chemicals.summary() {
        Some(summary) => json!({
            "status": "healthy",
            "records": summary.records,
            "cas_entries": summary.cas_entries,
            "name_entries": summary.name_entries,
            "source": summary.source,
            "fingerprint": summary.fingerprint,
            "built_at": summary.built_at.to_rfc3339(),
        }),
        None => json!({
            "status": "unhealthy",
            "message": "GADSL data not loaded",
            "path": state.config.reference.path,
        }),
    };

    let scanner = &state.config.scanner;
    let status = if state.chemicals.is_loaded() { "healthy" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "chemsure-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "reference": reference,
            "scanner": {
                "min_text_chars": scanner.min_text_chars,
                "ocr_dpi": scanner.ocr_dpi,
                "pdftoppm": scanner.pdftoppm_path,
                "tesseract": scanner.tesseract_path,
            }
        }
    }))
}
