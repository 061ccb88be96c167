//! Participant registration handler.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use roomie_types::participant::Participant;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateParticipantRequest {
    #[serde(default)]
    pub name: String,
}

/// POST /api/v1/participants - Register a participant.
pub async fn create_participant(
    State(state): State<AppState>,
    body: Result<Json<CreateParticipantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Participant>>), AppError> {
    let start = Instant::now();
    let Json(body) = body?;

    let participant = state.message_service.register_participant(&body.name).await?;
    tracing::info!(participant = %participant.id, "participant registered");

    let link = format!("/api/v1/messages/for/{}", participant.id);
    let resp = ApiResponse::timed(participant, start).with_link("messages", &link);
    Ok((StatusCode::CREATED, Json(resp)))
}
