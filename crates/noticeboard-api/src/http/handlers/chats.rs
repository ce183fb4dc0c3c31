//! Per-chat outbox endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use noticeboard_types::chat::{ChatId, MessageId};
use noticeboard_types::view::Outbound;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::http::server::ServerState;

#[derive(Debug, Serialize)]
pub struct Gone {
    pub message_id: MessageId,
}

/// GET /api/v1/chats/{id}/outbox - Drain effects recorded for a chat.
pub async fn drain_outbox(
    State(state): State<ServerState>,
    _auth: Authenticated,
    Path(chat_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Outbound>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let effects = state.outbox.drain(ChatId(chat_id));

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(effects, request_id, elapsed)
        .with_link("self", &format!("/api/v1/chats/{chat_id}/outbox"));
    Ok(Json(resp))
}

/// GET /api/v1/chats/{id}/messages - Ids of the chat's live messages.
pub async fn live_messages(
    State(state): State<ServerState>,
    _auth: Authenticated,
    Path(chat_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<MessageId>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let ids = state.outbox.live_messages(ChatId(chat_id));

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(ids, request_id, elapsed)))
}

/// DELETE /api/v1/chats/{id}/messages/{message_id} - Report a message gone.
///
/// Later edits of it fail, so the live view falls back to a new message.
pub async fn message_gone(
    State(state): State<ServerState>,
    _auth: Authenticated,
    Path((chat_id, message_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<Gone>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message_id = MessageId(message_id);
    if !state.outbox.mark_gone(ChatId(chat_id), message_id) {
        return Err(AppError::NotFound(format!(
            "Message {message_id} is not live in chat {chat_id}"
        )));
    }
    tracing::debug!(chat_id, %message_id, "message reported gone");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(Gone { message_id }, request_id, elapsed)))
}
