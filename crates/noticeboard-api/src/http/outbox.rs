//! Transport that records outbound effects per chat for HTTP clients to drain.
//!
//! A client posting events for a chat polls that chat's outbox and applies
//! the effects on its side. The transport tracks which messages are live so
//! edits of a message the client reported gone fail the way a real network
//! would, and the engines fall back to sending a new message.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use noticeboard_core::transport::Transport;
use noticeboard_types::chat::{ChatId, MessageId};
use noticeboard_types::error::TransportError;
use noticeboard_types::view::{Outbound, View};

pub struct OutboxTransport {
    next_id: AtomicI64,
    pending: DashMap<ChatId, Vec<Outbound>>,
    live: DashMap<ChatId, HashSet<MessageId>>,
}

impl OutboxTransport {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            pending: DashMap::new(),
            live: DashMap::new(),
        }
    }

    /// Take every effect recorded for `chat` since the last drain, in order.
    pub fn drain(&self, chat: ChatId) -> Vec<Outbound> {
        self.pending
            .get_mut(&chat)
            .map(|mut effects| std::mem::take(&mut *effects))
            .unwrap_or_default()
    }

    /// Forget a delivered message. Returns false if it was not live.
    pub fn mark_gone(&self, chat: ChatId, message: MessageId) -> bool {
        self.live
            .get_mut(&chat)
            .is_some_and(|mut live| live.remove(&message))
    }

    /// Ids of the chat's messages that can still be edited, ascending.
    pub fn live_messages(&self, chat: ChatId) -> Vec<MessageId> {
        let mut ids: Vec<MessageId> = self
            .live
            .get(&chat)
            .map(|live| live.iter().copied().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    fn is_live(&self, chat: ChatId, message: MessageId) -> bool {
        self.live
            .get(&chat)
            .is_some_and(|live| live.contains(&message))
    }

    fn push(&self, chat: ChatId, effect: Outbound) {
        self.pending.entry(chat).or_default().push(effect);
    }
}

impl Default for OutboxTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for OutboxTransport {
    async fn send(&self, chat: ChatId, view: &View) -> Result<MessageId, TransportError> {
        let message_id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.live.entry(chat).or_default().insert(message_id);
        self.push(
            chat,
            Outbound::Send {
                message_id,
                view: view.clone(),
            },
        );
        Ok(message_id)
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        view: &View,
    ) -> Result<(), TransportError> {
        if !self.is_live(chat, message) {
            return Err(TransportError::MessageNotFound(message));
        }
        self.push(
            chat,
            Outbound::Edit {
                message_id: message,
                view: view.clone(),
            },
        );
        Ok(())
    }

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        if !self.mark_gone(chat, message) {
            return Err(TransportError::MessageNotFound(message));
        }
        self.push(chat, Outbound::Delete { message_id: message });
        Ok(())
    }

    async fn notify(&self, chat: ChatId, text: &str) -> Result<(), TransportError> {
        self.push(
            chat,
            Outbound::Notice {
                text: text.to_string(),
            },
        );
        Ok(())
    }
}
