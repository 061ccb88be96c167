//! Message store handlers: create, history between two participants,
//! everything for one participant, and read receipts.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use roomie_types::message::{Message, MessageId, NewMessage, ParticipantMessage};

use crate::http::error::AppError;
use crate::http::handlers::{parse_id, require_id, IdInput};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub sender_id: Option<IdInput>,
    pub receiver_id: Option<IdInput>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetweenRequest {
    pub receiver_id: Option<IdInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub reader_id: Option<IdInput>,
}

/// POST /api/v1/messages - Persist a message.
pub async fn create_message(
    State(state): State<AppState>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), AppError> {
    let start = Instant::now();
    let Json(body) = body?;

    let msg = NewMessage {
        sender_id: require_id(body.sender_id, "senderId")?,
        receiver_id: require_id(body.receiver_id, "receiverId")?,
        content: body.content,
    };
    let stored = state.message_service.send(&msg).await?;

    let link = format!("/api/v1/messages/between/{}", stored.sender_id);
    let resp = ApiResponse::timed(stored, start).with_link("between", &link);
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/messages/between/{senderId} - History between two participants.
pub async fn messages_between(
    State(state): State<AppState>,
    Path(sender_id): Path<String>,
    body: Result<Json<BetweenRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let sender = parse_id(&sender_id, "senderId")?;
    let Json(body) = body?;
    let receiver = require_id(body.receiver_id, "receiverId")?;

    let messages = state.message_service.between(sender, receiver).await?;
    Ok(Json(ApiResponse::timed(messages, start)))
}

/// GET /api/v1/messages/for/{userId} - Every message of one participant, newest first.
pub async fn messages_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ParticipantMessage>>>, AppError> {
    let start = Instant::now();
    let user = parse_id(&user_id, "userId")?;

    let messages = state.message_service.for_user(user).await?;
    let link = format!("/api/v1/messages/for/{user}");
    Ok(Json(ApiResponse::timed(messages, start).with_link("self", &link)))
}

/// POST /api/v1/messages/{id}/read - Mark a message read by its receiver.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MarkReadRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let id = MessageId(parse_id(&id, "id")?.0);
    let Json(body) = body?;
    let reader = require_id(body.reader_id, "readerId")?;

    let message = state.message_service.mark_read(id, reader).await?;
    Ok(Json(ApiResponse::timed(message, start)))
}
