//! Chat transport port.
//!
//! The engines never talk to a chat network directly; they hand `View`s to a
//! `Transport`. Edit and delete are allowed to fail (the message may be too
//! old or gone) and callers recover from that locally.

use std::future::Future;

use noticeboard_types::chat::{ChatId, MessageId};
use noticeboard_types::error::TransportError;
use noticeboard_types::view::View;

/// Outbound side of a chat network.
pub trait Transport: Send + Sync {
    /// Send a new message and return its id.
    fn send(
        &self,
        chat: ChatId,
        view: &View,
    ) -> impl Future<Output = Result<MessageId, TransportError>> + Send;

    /// Replace the content of a previously sent message.
    fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        view: &View,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Delete a previously sent message.
    fn delete(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Show a short transient notice (a toast, not a chat message).
    fn notify(
        &self,
        chat: ChatId,
        text: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Edit `origin` in place when given, otherwise (or when the edit fails) send
/// a new message.
pub async fn reply_in_place<T: Transport>(
    transport: &T,
    chat: ChatId,
    origin: Option<MessageId>,
    view: &View,
) -> Result<MessageId, TransportError> {
    if let Some(message) = origin {
        match transport.edit(chat, message, view).await {
            Ok(()) => return Ok(message),
            Err(e) => {
                tracing::debug!(%chat, %message, error = %e, "edit failed, sending new message");
            }
        }
    }
    transport.send(chat, view).await
}
