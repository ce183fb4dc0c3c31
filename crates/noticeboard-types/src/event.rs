//! Inbound events from the chat transport.

use serde::{Deserialize, Serialize};

use crate::chat::{ActorId, ChatId, MessageId};
use crate::view::Action;

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    /// Plain text, including slash commands and menu labels.
    Text(String),
    /// A pressed inline control.
    Action(Action),
}

/// One inbound event, scoped to a chat and the actor who produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat: ChatId,
    pub actor: ActorId,
    pub payload: EventPayload,
    /// The message carrying the pressed control, when the payload is an action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<MessageId>,
}

impl InboundEvent {
    pub fn text(chat: ChatId, actor: ActorId, text: impl Into<String>) -> Self {
        Self {
            chat,
            actor,
            payload: EventPayload::Text(text.into()),
            origin: None,
        }
    }

    pub fn action(chat: ChatId, actor: ActorId, action: Action) -> Self {
        Self {
            chat,
            actor,
            payload: EventPayload::Action(action),
            origin: None,
        }
    }

    /// Attach the message the control was pressed on.
    pub fn from_message(mut self, origin: MessageId) -> Self {
        self.origin = Some(origin);
        self
    }
}
