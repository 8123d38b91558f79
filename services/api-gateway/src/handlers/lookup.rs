//! Reference lookups by CAS number and substance name.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use chemsure_models::{regulatory_summary, ReferenceLookup, ReferenceRecord};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::middleware::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CasLookupRequest {
    #[validate(required(message = "CAS number is required in the request body."))]
    pub cas_rn: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NameLookupRequest {
    #[validate(required(message = "Substance name is required in the request body."))]
    pub substance_name: Option<String>,
}

/// A reference record as returned to clients, with its plain-text summary.
#[derive(Debug, Serialize)]
pub struct RecordView {
    #[serde(flatten)]
    pub record: Arc<ReferenceRecord>,
    pub summary: String,
}

impl From<Arc<ReferenceRecord>> for RecordView {
    fn from(record: Arc<ReferenceRecord>) -> Self {
        let summary = regulatory_summary(&record);
        Self { record, summary }
    }
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub results: Vec<RecordView>,
}

impl LookupResponse {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<ReferenceRecord>>,
    {
        Self {
            results: records.into_iter().map(RecordView::from).collect(),
        }
    }
}

/// POST /lookup_by_cas_rn
pub async fn lookup_by_cas_rn(
    State(state): State<AppState>,
    body: Result<Json<CasLookupRequest>, JsonRejection>,
) -> ApiResult<Json<LookupResponse>> {
    ensure_loaded(&state, "cas")?;
    let Json(request) = body?;
    request.validate()?;
    let cas_rn = request.cas_rn.unwrap_or_default();

    let found = state.chemicals.lookup_by_cas(&cas_rn)?;
    state.metrics.record_lookup("cas", outcome(found.is_some()));
    if found.is_none() {
        info!(cas_rn = %cas_rn, "CAS RN not found in GADSL");
    }

    Ok(Json(LookupResponse::from_records(found)))
}

/// POST /lookup_by_substance_name
pub async fn lookup_by_substance_name(
    State(state): State<AppState>,
    body: Result<Json<NameLookupRequest>, JsonRejection>,
) -> ApiResult<Json<LookupResponse>> {
    ensure_loaded(&state, "name")?;
    let Json(request) = body?;
    request.validate()?;
    let substance_name = request.substance_name.unwrap_or_default();

    let found = state.chemicals.lookup_by_name(&substance_name)?;
    state.metrics.record_lookup("name", outcome(found.is_some()));
    if found.is_none() {
        info!(substance_name = %substance_name, "Substance name not found in GADSL");
    }

    Ok(Json(LookupResponse::from_records(found)))
}

/// Checked before the request body is parsed.
fn ensure_loaded(state: &AppState, kind: &str) -> ApiResult<()> {
    state.chemicals.ensure_loaded().map_err(|e| {
        state.metrics.record_lookup(kind, "not_loaded");
        e.into()
    })
}

fn outcome(hit: bool) -> &'static str {
    if hit {
        "hit"
    } else {
        "miss"
    }
}
