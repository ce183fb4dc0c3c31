//! In-memory doubles for the core ports, shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

use noticeboard_types::chat::{ActorId, ChatId, MessageId};
use noticeboard_types::error::{RepositoryError, TransportError};
use noticeboard_types::record::{Record, RecordId};
use noticeboard_types::section::SectionKey;
use noticeboard_types::view::{Outbound, View};

use crate::auth::StaticAllowList;
use crate::content::SectionContent;
use crate::repository::record::RecordRepository;
use crate::transport::Transport;

pub const ADMIN: ActorId = ActorId(1);
pub const VISITOR: ActorId = ActorId(2);

pub fn admins() -> StaticAllowList {
    StaticAllowList::new([ADMIN.0])
}

/// A record whose `created_at` grows with its id.
pub fn record(id: i64, section: SectionKey, body: &str, details: Option<&str>) -> Record {
    Record {
        id: RecordId(id),
        section,
        body: body.to_string(),
        details: details.map(str::to_string),
        created_at: base_time() + Duration::days(id),
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Record repository backed by a vector.
#[derive(Default)]
pub struct MemoryRecordRepository {
    records: Mutex<Vec<Record>>,
    next_id: AtomicI64,
    failing: AtomicBool,
}

impl MemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit timestamp, bypassing `append`.
    pub fn insert_at(
        &self,
        section: SectionKey,
        body: &str,
        details: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> RecordId {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records.lock().unwrap().push(Record {
            id,
            section,
            body: body.to_string(),
            details: details.map(str::to_string),
            created_at,
        });
        id
    }

    /// Insert `count` records, oldest first, and return their ids.
    pub fn seed(&self, section: SectionKey, count: usize) -> Vec<RecordId> {
        (0..count)
            .map(|i| {
                self.insert_at(
                    section,
                    &format!("{section} #{}", i + 1),
                    None,
                    base_time() + Duration::hours(i as i64),
                )
            })
            .collect()
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepositoryError::Connection)
        } else {
            Ok(())
        }
    }
}

impl RecordRepository for MemoryRecordRepository {
    async fn append(
        &self,
        section: SectionKey,
        body: &str,
        details: Option<&str>,
    ) -> Result<RecordId, RepositoryError> {
        self.check()?;
        Ok(self.insert_at(section, body, details, Utc::now()))
    }

    async fn list(&self, section: SectionKey) -> Result<Vec<Record>, RepositoryError> {
        self.check()?;
        let mut records: Vec<Record> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.section == section)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record>, RepositoryError> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update_details(
        &self,
        id: RecordId,
        details: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.check()?;
        if let Some(record) = self.records.lock().unwrap().iter_mut().find(|r| r.id == id) {
            record.details = details.map(str::to_string);
        }
        Ok(())
    }

    async fn replace(
        &self,
        id: RecordId,
        body: &str,
        details: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.check()?;
        if let Some(record) = self.records.lock().unwrap().iter_mut().find(|r| r.id == id) {
            record.body = body.to_string();
            record.details = details.map(str::to_string);
        }
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        self.check()?;
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn count(&self, section: SectionKey) -> Result<u64, RepositoryError> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.section == section)
            .count() as u64)
    }
}

/// Transport that records every effect instead of delivering it.
#[derive(Default)]
pub struct RecordingTransport {
    next_id: AtomicI64,
    effects: Mutex<Vec<(ChatId, Outbound)>>,
    live: Mutex<HashSet<MessageId>>,
    fail_edits: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every edit fail as if the message were too old.
    pub fn set_fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    /// Pretend the user removed a message; later edits of it fail.
    pub fn forget(&self, message: MessageId) {
        self.live.lock().unwrap().remove(&message);
    }

    pub fn effects(&self, chat: ChatId) -> Vec<Outbound> {
        self.effects
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == chat)
            .map(|(_, effect)| effect.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.effects.lock().unwrap().clear();
    }

    /// Latest content of every message still present in the chat.
    pub fn messages(&self, chat: ChatId) -> HashMap<MessageId, View> {
        let live = self.live.lock().unwrap().clone();
        let mut messages = HashMap::new();
        for effect in self.effects(chat) {
            match effect {
                Outbound::Send { message_id, view } | Outbound::Edit { message_id, view } => {
                    messages.insert(message_id, view);
                }
                Outbound::Delete { message_id } => {
                    messages.remove(&message_id);
                }
                Outbound::Notice { .. } => {}
            }
        }
        messages.retain(|id, _| live.contains(id));
        messages
    }

    /// The view most recently sent or edited in `chat`.
    pub fn last_view(&self, chat: ChatId) -> Option<View> {
        self.effects(chat).into_iter().rev().find_map(|effect| match effect {
            Outbound::Send { view, .. } | Outbound::Edit { view, .. } => Some(view),
            _ => None,
        })
    }

    pub fn notices(&self, chat: ChatId) -> Vec<String> {
        self.effects(chat)
            .into_iter()
            .filter_map(|effect| match effect {
                Outbound::Notice { text } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn sends(&self, chat: ChatId) -> usize {
        self.effects(chat)
            .iter()
            .filter(|effect| matches!(effect, Outbound::Send { .. }))
            .count()
    }

    fn push(&self, chat: ChatId, effect: Outbound) {
        self.effects.lock().unwrap().push((chat, effect));
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, chat: ChatId, view: &View) -> Result<MessageId, TransportError> {
        let message_id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.live.lock().unwrap().insert(message_id);
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
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(TransportError::NotEditable(message));
        }
        if !self.live.lock().unwrap().contains(&message) {
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
        if !self.live.lock().unwrap().remove(&message) {
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

/// Static pages held in a map; sections without an entry are "missing".
#[derive(Default)]
pub struct MapContent {
    pages: HashMap<SectionKey, String>,
    details: HashMap<SectionKey, String>,
}

impl MapContent {
    pub fn with_page(mut self, section: SectionKey, text: &str) -> Self {
        self.pages.insert(section, text.to_string());
        self
    }

    pub fn with_details(mut self, section: SectionKey, text: &str) -> Self {
        self.details.insert(section, text.to_string());
        self
    }
}

impl SectionContent for MapContent {
    async fn page(&self, section: SectionKey) -> Option<String> {
        self.pages.get(&section).cloned()
    }

    async fn details_page(&self, section: SectionKey) -> Option<String> {
        self.details.get(&section).cloned()
    }
}
