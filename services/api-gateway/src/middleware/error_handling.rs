use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::MultipartError,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use chemsure_models::LookupError;
use chemsure_utils::{ChemsureError, ErrorResponse};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Error returned by every handler, rendered as an `ErrorResponse` body.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ChemsureError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

/// Fallback for paths no route matches, so they get the JSON error body too.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError(ChemsureError::not_found(uri.path()))
}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        Self(error.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ChemsureError::validation("body", rejection.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        Self(ChemsureError::malformed_input(format!("Failed to read upload: {}", error)))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("body".to_string(), errors.to_string()));
        Self(ChemsureError::validation(field, message))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self(ChemsureError::internal(format!("background task failed: {}", error)))
    }
}
