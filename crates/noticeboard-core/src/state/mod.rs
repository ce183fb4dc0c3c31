//! Per-chat state and the keyed store that serializes access to it.

pub mod session;
pub mod store;

use noticeboard_types::admin::AdminPhase;
use noticeboard_types::chat::{ChatId, MessageId};

pub use session::{Direction, SessionState, ViewMode};
pub use store::KeyedStateStore;

/// Everything the dispatcher remembers about one chat.
///
/// Navigation and admin state share a slot so a single lock covers both.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub session: SessionState,
    pub admin: AdminPhase,
}

impl ChatState {
    /// Reset to a fresh chat, returning the live view that was being tracked.
    pub fn reset(&mut self) -> Option<MessageId> {
        let live_view = self.session.live_view();
        *self = ChatState::default();
        live_view
    }

    /// Nothing browsed, no live view, no pending admin step.
    pub fn is_fresh(&self) -> bool {
        !self.session.is_browsing() && self.session.live_view().is_none() && self.admin.is_idle()
    }
}

/// Store of per-chat state, keyed by chat id.
pub type ChatStore = KeyedStateStore<ChatId, ChatState>;
