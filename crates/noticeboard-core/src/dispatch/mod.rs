//! Inbound event routing.
//!
//! The dispatcher owns the keyed chat store. Each event locks its chat's slot
//! for the whole handling, then routes to the navigation or admin engine and
//! turns their results into outbound effects. User-facing failures become
//! short notices; only a transport that cannot send at all is an error.

pub mod command;
pub mod event_loop;
pub mod menu;

use std::sync::Arc;

use noticeboard_types::admin::AdminPhase;
use noticeboard_types::chat::{ActorId, ChatId, MessageId};
use noticeboard_types::config::{BoardConfig, BoundaryPolicy};
use noticeboard_types::error::{AdminError, NavigationError, TransportError};
use noticeboard_types::event::{EventPayload, InboundEvent};
use noticeboard_types::section::SectionKey;
use noticeboard_types::view::{Action, View};

use tracing::{debug, warn};

use crate::admin::panel::{self, Purpose};
use crate::admin::{AdminEngine, AdminOutcome};
use crate::auth::Authorizer;
use crate::catalog::{self, CONTACT_LABEL};
use crate::content::{SectionContent, unavailable_notice};
use crate::navigation::{NavigationEngine, live_view};
use crate::repository::record::RecordRepository;
use crate::state::{ChatState, ChatStore, Direction};
use crate::transport::{Transport, reply_in_place};

pub use command::Command;
pub use event_loop::EventLoop;

/// Behavior knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub policy: BoundaryPolicy,
    /// Text shown for "Register" and "Contact administrator".
    pub contact: String,
}

impl DispatchSettings {
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            policy: config.navigation.boundary,
            contact: config.contact.clone(),
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}

/// Routes inbound events for every chat.
pub struct Dispatcher<R, T, C, A>
where
    R: RecordRepository,
    T: Transport,
    C: SectionContent,
    A: Authorizer,
{
    chats: ChatStore,
    navigation: NavigationEngine<R, T>,
    admin: AdminEngine<R, A>,
    transport: Arc<T>,
    content: Arc<C>,
    contact: String,
}

impl<R, T, C, A> Dispatcher<R, T, C, A>
where
    R: RecordRepository,
    T: Transport,
    C: SectionContent,
    A: Authorizer,
{
    pub fn new(
        records: Arc<R>,
        transport: Arc<T>,
        content: Arc<C>,
        authorizer: Arc<A>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            chats: ChatStore::new(),
            navigation: NavigationEngine::new(records.clone(), transport.clone(), settings.policy),
            admin: AdminEngine::new(records, authorizer),
            transport,
            content,
            contact: settings.contact,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// A copy of the chat's current state.
    pub async fn state(&self, chat: ChatId) -> ChatState {
        let state = self.chats.lock(chat).await.clone();
        self.chats.evict_if(&chat, ChatState::is_fresh);
        state
    }

    /// Handle one event, logging instead of returning transport failures.
    pub async fn dispatch(&self, event: InboundEvent) {
        let chat = event.chat;
        if let Err(e) = self.handle(event).await {
            warn!(chat_id = %chat, error = %e, "could not deliver reply");
        }
    }

    /// Handle one event while holding the chat's state lock.
    #[tracing::instrument(
        name = "dispatch",
        skip(self, event),
        fields(chat_id = %event.chat, actor_id = %event.actor)
    )]
    pub async fn handle(&self, event: InboundEvent) -> Result<(), TransportError> {
        let InboundEvent {
            chat,
            actor,
            payload,
            origin,
        } = event;
        let mut state = self.chats.lock(chat).await;

        let result = match payload {
            EventPayload::Text(text) => self.on_text(chat, actor, &mut state, &text).await,
            EventPayload::Action(action) => {
                self.on_action(chat, actor, &mut state, action, origin)
                    .await
            }
        };

        // Chats back at the main menu hold no state worth a slot.
        drop(state);
        self.chats.evict_if(&chat, ChatState::is_fresh);
        result
    }

    async fn on_text(
        &self,
        chat: ChatId,
        actor: ActorId,
        state: &mut ChatState,
        text: &str,
    ) -> Result<(), TransportError> {
        if let Some(command) = Command::parse(text) {
            return self.on_command(chat, actor, state, command).await;
        }

        // A pending admin input takes precedence over menu labels, but only
        // for admins; other members of the chat keep navigating.
        if state.admin.awaits_text() && self.admin.is_admin(actor) {
            let result = match state.admin {
                AdminPhase::AwaitingNewContent { .. } => {
                    self.admin.complete_create(actor, &mut state.admin, text).await
                }
                _ => self.admin.complete_edit(actor, &mut state.admin, text).await,
            };
            return self.reply_admin(chat, None, result.map(|o| panel::outcome(&o))).await;
        }

        if let Some(section) = catalog::resolve(text) {
            let page = self.section_page(section).await;
            self.transport.send(chat, &page).await?;
            return Ok(());
        }

        if text.trim() == CONTACT_LABEL {
            self.transport.send(chat, &View::text(&self.contact)).await?;
            return Ok(());
        }

        debug!(chat_id = %chat, "ignoring unrecognized text");
        Ok(())
    }

    async fn on_command(
        &self,
        chat: ChatId,
        actor: ActorId,
        state: &mut ChatState,
        command: Command,
    ) -> Result<(), TransportError> {
        match command {
            Command::Start | Command::Menu => {
                if let Some(live) = state.reset() {
                    live_view::retire(self.transport.as_ref(), chat, live).await;
                }
                self.transport.send(chat, &menu::main_menu()).await?;
                Ok(())
            }
            Command::Admin => {
                let view = self.admin.authorize(actor).map(|()| panel::panel());
                self.reply_admin(chat, None, view).await
            }
            Command::Cancel => {
                if state.admin.is_idle() {
                    return Ok(());
                }
                let result = self.admin.cancel(actor, &mut state.admin);
                self.reply_admin(chat, None, result.map(|o| panel::outcome(&o)))
                    .await
            }
            Command::Unknown(name) => {
                debug!(chat_id = %chat, command = %name, "ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn on_action(
        &self,
        chat: ChatId,
        actor: ActorId,
        state: &mut ChatState,
        action: Action,
        origin: Option<MessageId>,
    ) -> Result<(), TransportError> {
        let session = &mut state.session;
        let phase = &mut state.admin;

        match action {
            Action::SectionDetails(section) => {
                let text = self
                    .content
                    .details_page(section)
                    .await
                    .unwrap_or_else(|| unavailable_notice(section));
                self.transport.send(chat, &View::text(text)).await?;
                Ok(())
            }
            Action::Register(_) => {
                self.transport.send(chat, &View::text(&self.contact)).await?;
                Ok(())
            }
            Action::Schedule(section) => {
                let result = self.navigation.enter(chat, session, section, origin).await;
                self.settle_navigation(chat, result).await
            }
            Action::NavPrev => {
                let result = self.navigation.advance(chat, session, Direction::Prev).await;
                self.settle_navigation(chat, result).await
            }
            Action::NavNext => {
                let result = self.navigation.advance(chat, session, Direction::Next).await;
                self.settle_navigation(chat, result).await
            }
            Action::NavDetails => {
                let result = self.navigation.show_details(chat, session).await;
                self.settle_navigation(chat, result).await
            }
            Action::NavBack => {
                let result = self.navigation.back(chat, session).await;
                self.settle_navigation(chat, result).await
            }
            Action::NavExit => {
                let result = match session.section() {
                    Some(section) => {
                        let page = self.section_page(section).await;
                        self.navigation.exit(chat, session, &page).await
                    }
                    None => Err(NavigationError::NotBrowsing),
                };
                self.settle_navigation(chat, result).await
            }

            Action::AdminPanel => {
                let view = self.admin.authorize(actor).map(|()| panel::panel());
                self.reply_admin(chat, origin, view).await
            }
            Action::AdminAdd | Action::AdminEdit | Action::AdminDelete => {
                let purpose = match action {
                    Action::AdminAdd => Purpose::Add,
                    Action::AdminEdit => Purpose::Edit,
                    _ => Purpose::Delete,
                };
                let view = self
                    .admin
                    .authorize(actor)
                    .map(|()| panel::section_picker(purpose));
                self.reply_admin(chat, origin, view).await
            }
            Action::AdminCancel => {
                let result = if matches!(phase, AdminPhase::AwaitingDeleteConfirmation { .. }) {
                    self.admin.cancel_delete(actor, phase)
                } else {
                    self.admin.cancel(actor, phase)
                };
                self.reply_outcome(chat, origin, result).await
            }
            Action::AdminAddSection(section) => {
                let result = self.admin.start_create(actor, phase, section);
                self.reply_outcome(chat, origin, result).await
            }
            Action::AdminEditSection(section) => {
                let view = self
                    .admin
                    .records_for(actor, section)
                    .await
                    .map(|records| panel::record_picker(Purpose::Edit, section, &records));
                self.reply_admin(chat, origin, view).await
            }
            Action::AdminDeleteSection(section) => {
                let view = self
                    .admin
                    .records_for(actor, section)
                    .await
                    .map(|records| panel::record_picker(Purpose::Delete, section, &records));
                self.reply_admin(chat, origin, view).await
            }
            Action::AdminEditRecord(record_id) => {
                let result = self.admin.start_edit(actor, phase, record_id).await;
                self.reply_outcome(chat, origin, result).await
            }
            Action::AdminDeleteRecord(record_id) => {
                let result = self.admin.start_delete(actor, phase, record_id).await;
                self.reply_outcome(chat, origin, result).await
            }
            Action::AdminConfirmDelete => {
                let result = self.admin.confirm_delete(actor, phase).await;
                self.reply_outcome(chat, origin, result).await
            }
        }
    }

    async fn section_page(&self, section: SectionKey) -> View {
        menu::section_page(section, self.content.page(section).await)
    }

    /// Turn a navigation result into notices. Only transport errors escape.
    async fn settle_navigation(
        &self,
        chat: ChatId,
        result: Result<MessageId, NavigationError>,
    ) -> Result<(), TransportError> {
        let notice = match result {
            Ok(_) => return Ok(()),
            Err(NavigationError::Transport(e)) => return Err(e),
            Err(NavigationError::NotInDetailView) => return Ok(()),
            Err(NavigationError::EmptyCollection(section)) => {
                format!("{} has no entries yet.", catalog::display_name(section))
            }
            Err(NavigationError::NotBrowsing) => {
                "This list is no longer active. Open the section again.".to_string()
            }
            Err(NavigationError::NoDetails) => "This entry has no details.".to_string(),
            Err(NavigationError::Storage(e)) => {
                warn!(chat_id = %chat, error = %e, "navigation store failure");
                "⚠️ The schedule is unavailable right now. Please try again later.".to_string()
            }
        };
        self.transport.notify(chat, &notice).await
    }

    async fn reply_outcome(
        &self,
        chat: ChatId,
        origin: Option<MessageId>,
        result: Result<AdminOutcome, AdminError>,
    ) -> Result<(), TransportError> {
        self.reply_admin(chat, origin, result.map(|o| panel::outcome(&o)))
            .await
    }

    /// Show an admin view in place of `origin`, or a notice on failure.
    async fn reply_admin(
        &self,
        chat: ChatId,
        origin: Option<MessageId>,
        result: Result<View, AdminError>,
    ) -> Result<(), TransportError> {
        let notice = match result {
            Ok(view) => {
                reply_in_place(self.transport.as_ref(), chat, origin, &view).await?;
                return Ok(());
            }
            Err(AdminError::Unauthorized) => "⛔ Access denied.".to_string(),
            Err(AdminError::RecordNotFound(_)) => {
                "Entry not found. It may have been deleted.".to_string()
            }
            Err(AdminError::InvalidPhase { .. }) => {
                "That action is no longer available.".to_string()
            }
            Err(AdminError::Storage(e)) => {
                warn!(chat_id = %chat, error = %e, "admin store failure");
                "⚠️ Storage is unavailable. The operation was cancelled.".to_string()
            }
        };
        self.transport.notify(chat, &notice).await
    }
}
