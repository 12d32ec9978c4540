//! Response helpers shared by the admin and public routers.
//!
//! Every failure leaves the service as `{"error": "<message>"}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::store::RepositoryError;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

pub(crate) fn deleted_response() -> Response {
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

/// Unwraps a JSON body, turning malformed payloads (unknown enum values, missing
/// required fields) into a 400 with the usual error body.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
}

impl IntoResponse for RepositoryError {
    fn into_response(self) -> Response {
        let status = match self {
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::Referenced { .. } => StatusCode::CONFLICT,
            RepositoryError::TransitionRefused { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RepositoryError::Conflict
            | RepositoryError::ForeignKey { .. }
            | RepositoryError::Unavailable(_) => {
                error!(error = %self, "store rejected request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self.to_string())
    }
}
