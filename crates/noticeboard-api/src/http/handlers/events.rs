//! Inbound event endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use noticeboard_types::chat::{ActorId, ChatId, MessageId};
use noticeboard_types::event::InboundEvent;
use noticeboard_types::view::Action;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::http::server::ServerState;

/// Request body for `POST /api/v1/events`: exactly one of `text` or `action`.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub chat_id: i64,
    pub actor_id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub action: Option<Action>,
    /// Message the pressed control belongs to.
    #[serde(default)]
    pub message_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Accepted {
    pub chat_id: ChatId,
    pub queued: bool,
}

impl EventRequest {
    pub fn into_event(self) -> Result<InboundEvent, AppError> {
        let chat = ChatId(self.chat_id);
        let actor = ActorId(self.actor_id);
        let event = match (self.text, self.action) {
            (Some(text), None) => InboundEvent::text(chat, actor, text),
            (None, Some(action)) => InboundEvent::action(chat, actor, action),
            _ => {
                return Err(AppError::Validation(
                    "Provide exactly one of 'text' or 'action'.".to_string(),
                ));
            }
        };
        Ok(match self.message_id {
            Some(id) => event.from_message(MessageId(id)),
            None => event,
        })
    }
}

/// POST /api/v1/events - Queue an inbound event for its chat.
///
/// Replies are not returned here; they appear in the chat's outbox.
pub async fn post_event(
    State(state): State<ServerState>,
    _auth: Authenticated,
    Json(body): Json<EventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Accepted>>), AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let event = body.into_event()?;
    let chat = event.chat;
    state
        .events
        .send(event)
        .await
        .map_err(|_| AppError::Unavailable("The board is shutting down.".to_string()))?;
    tracing::debug!(chat_id = %chat, "event queued");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        Accepted {
            chat_id: chat,
            queued: true,
        },
        request_id,
        elapsed,
    )
    .with_link("outbox", &format!("/api/v1/chats/{chat}/outbox"));

    Ok((StatusCode::ACCEPTED, Json(resp)))
}
