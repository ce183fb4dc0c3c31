//! Live view publishing.
//!
//! Each chat has at most one navigation message. Publishing edits it in
//! place; when that is impossible (never sent, too old, removed) a new
//! message is sent, its id replaces the old one, and the old message is
//! deleted on a best-effort basis.

use noticeboard_types::chat::{ChatId, MessageId};
use noticeboard_types::error::TransportError;
use noticeboard_types::view::View;

use tracing::{debug, warn};

use crate::transport::Transport;

/// Show `view` in the chat's live view and return the message now holding it.
///
/// Only a failed send is an error; edit and delete failures are recovered.
pub async fn publish<T: Transport>(
    transport: &T,
    chat: ChatId,
    slot: &mut Option<MessageId>,
    view: &View,
) -> Result<MessageId, TransportError> {
    if let Some(current) = *slot {
        match transport.edit(chat, current, view).await {
            Ok(()) => return Ok(current),
            Err(e) => {
                warn!(chat_id = %chat, message_id = %current, error = %e, "live view edit failed, sending a new one");
            }
        }
    }

    let fresh = transport.send(chat, view).await?;
    if let Some(old) = slot.replace(fresh) {
        retire(transport, chat, old).await;
    }
    Ok(fresh)
}

/// Point the live view at `message`, retiring the previous one if different.
pub async fn adopt<T: Transport>(
    transport: &T,
    chat: ChatId,
    slot: &mut Option<MessageId>,
    message: MessageId,
) {
    if let Some(old) = slot.replace(message)
        && old != message
    {
        retire(transport, chat, old).await;
    }
}

/// Best-effort delete of a message that no longer represents anything.
pub async fn retire<T: Transport>(transport: &T, chat: ChatId, message: MessageId) {
    if let Err(e) = transport.delete(chat, message).await {
        debug!(chat_id = %chat, message_id = %message, error = %e, "could not delete retired message");
    }
}
