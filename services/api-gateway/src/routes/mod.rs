use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::{
    handlers::*,
    middleware::{request_id_middleware, route_not_found},
    AppState,
};

/// Versioned API routes, nested under `/api/v1`.
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .route("/chemicals/:cas/validate", get(validate_cas))
        .route("/reference/reload", post(reload_reference))
}

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server.max_request_size;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/lookup_by_cas_rn", post(lookup_by_cas_rn))
        .route("/lookup_by_substance_name", post(lookup_by_substance_name))
        .route("/upload_msds_pdf", post(upload_msds_pdf))
        .nest("/api/v1", create_api_routes())
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error encoding metrics".to_string())
        }
    }
}
