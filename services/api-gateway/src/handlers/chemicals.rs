//! CAS validation and reference list administration.

use axum::{
    extract::{Path, State},
    response::Json,
};
use chemsure_chemical_database::IndexSummary;
use chemsure_models::CasValidation;
use tracing::info;

use crate::middleware::ApiResult;
use crate::AppState;

/// GET /api/v1/chemicals/:cas/validate
pub async fn validate_cas(State(state): State<AppState>, Path(cas): Path<String>) -> Json<CasValidation> {
    Json(state.chemicals.validate_cas(&cas))
}

/// POST /api/v1/reference/reload
///
/// A failed reload leaves the current index in service.
pub async fn reload_reference(State(state): State<AppState>) -> ApiResult<Json<IndexSummary>> {
    info!("Reference reload requested");
    let chemicals = state.chemicals.clone();
    let summary = tokio::task::spawn_blocking(move || chemicals.load()).await??;
    Ok(Json(summary))
}
