//! Error boundary for the manifesto endpoint.
//!
//! Every failure of `POST /generate_manifesto` is one of these kinds and is
//! rendered as `{"success": false, "error": ...}`.

use crate::models::ManifestoResponse;
use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use thiserror::Error;

/// Message returned when any form field is missing or blank.
pub const FIELDS_REQUIRED_MESSAGE: &str = "All fields are required";

#[derive(Debug, Error)]
pub enum ManifestoError {
    #[error("{}", FIELDS_REQUIRED_MESSAGE)]
    Validation,

    #[error("{0}")]
    MalformedBody(String),

    #[error("{0}")]
    Generation(#[from] ProviderError),

    #[error("Manifesto generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ManifestoError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ManifestoError::Validation | ManifestoError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ManifestoError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ManifestoError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ManifestoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ManifestoResponse::failure(self.to_string()))).into_response()
    }
}
