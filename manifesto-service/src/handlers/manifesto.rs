use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use service_core::middleware::tracing::RequestId;

use crate::error::ManifestoError;
use crate::models::{ManifestoRequest, ManifestoResponse};
use crate::startup::AppState;

/// Draft a manifesto from the submitted form.
///
/// POST /generate_manifesto
#[tracing::instrument(
    name = "generate_manifesto",
    skip(state, request_id, payload),
    fields(request_id = tracing::field::Empty)
)]
pub async fn generate_manifesto(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<ManifestoRequest>, JsonRejection>,
) -> Result<Json<ManifestoResponse>, ManifestoError> {
    if let Some(Extension(id)) = &request_id {
        tracing::Span::current().record("request_id", tracing::field::display(id));
    }

    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected manifesto request body");
        ManifestoError::MalformedBody(rejection.body_text())
    })?;

    let fields = request.validate().inspect_err(|_| {
        tracing::info!("Manifesto request is missing required fields");
    })?;

    tracing::info!(party_name = %fields.party_name(), "Generating manifesto");

    let manifesto = state
        .generator
        .generate(
            fields.party_name(),
            fields.issues(),
            fields.policies(),
            fields.vision(),
        )
        .await?;

    Ok(Json(ManifestoResponse::success(manifesto, fields.filename())))
}
