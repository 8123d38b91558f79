//! MSDS Upload Handler
//!
//! Accepts a PDF safety data sheet and reports the GADSL substances it lists.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use chemsure_document_processing::MsdsDocument;
use chemsure_utils::ChemsureError;
use tracing::info;

use crate::handlers::lookup::LookupResponse;
use crate::middleware::{ApiError, ApiResult};
use crate::AppState;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "msds_pdf";

/// POST /upload_msds_pdf
pub async fn upload_msds_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<LookupResponse>> {
    // One index for the whole scan, even if a reload lands meanwhile.
    let index = match state.chemicals.store().snapshot() {
        Ok(index) => index,
        Err(e) => {
            state.metrics.record_scan_failure("DATA_NOT_LOADED");
            return Err(e.into());
        }
    };

    let document = read_document(&mut multipart).await?;
    info!(filename = document.filename(), bytes = document.data().len(), "MSDS upload received");

    let scanner = Arc::clone(&state.scanner);
    let outcome = tokio::task::spawn_blocking(move || scanner.scan_document(&document, index.as_ref())).await?;

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            state.metrics.record_scan_failure(e.error_code());
            return Err(e.into());
        }
    };

    state
        .metrics
        .record_scan(&report.text_source.to_string(), report.matches.len());

    Ok(Json(LookupResponse::from_records(
        report.matches.into_iter().map(|m| m.record),
    )))
}

async fn read_document(multipart: &mut Multipart) -> ApiResult<MsdsDocument> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(MsdsDocument::new(filename, data.to_vec())?);
    }

    Err(ApiError(ChemsureError::malformed_input("No PDF file provided in the request.")))
}
