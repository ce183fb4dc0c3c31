//! Navigation engine: the per-chat browse state machine.
//!
//! States are `NO_SECTION -> BROWSING -> (DETAIL_VIEW | NO_SECTION)`. The
//! engine queries the record store only on entry; every later step works on
//! the snapshot held by the session.

use std::sync::Arc;

use noticeboard_types::chat::{ChatId, MessageId};
use noticeboard_types::config::BoundaryPolicy;
use noticeboard_types::error::NavigationError;
use noticeboard_types::section::SectionKey;
use noticeboard_types::view::View;

use tracing::debug;

use crate::navigation::{live_view, render};
use crate::repository::record::RecordRepository;
use crate::state::{Direction, SessionState};
use crate::transport::Transport;

/// Drives browsing for one chat at a time.
///
/// Generic over the repository and transport to allow testing with mocks
/// and swapping implementations (SQLite vs. in-memory, console vs. HTTP).
pub struct NavigationEngine<R: RecordRepository, T: Transport> {
    records: Arc<R>,
    transport: Arc<T>,
    policy: BoundaryPolicy,
}

impl<R: RecordRepository, T: Transport> NavigationEngine<R, T> {
    pub fn new(records: Arc<R>, transport: Arc<T>, policy: BoundaryPolicy) -> Self {
        Self {
            records,
            transport,
            policy,
        }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Start browsing `section` from a fresh snapshot.
    ///
    /// When the user pressed a control on an existing message (`origin`),
    /// that message becomes the live view. An empty section returns
    /// `EmptyCollection` and leaves the session as it was.
    pub async fn enter(
        &self,
        chat: ChatId,
        session: &mut SessionState,
        section: SectionKey,
        origin: Option<MessageId>,
    ) -> Result<MessageId, NavigationError> {
        let snapshot = self.records.list(section).await?;
        session.begin(section, snapshot)?;
        debug!(chat_id = %chat, %section, records = session.len(), "entered section");

        if let Some(origin) = origin {
            live_view::adopt(self.transport.as_ref(), chat, session.live_view_slot(), origin)
                .await;
        }
        self.show(chat, session).await
    }

    /// Move the cursor one step and re-render. Never re-queries the store.
    pub async fn advance(
        &self,
        chat: ChatId,
        session: &mut SessionState,
        direction: Direction,
    ) -> Result<MessageId, NavigationError> {
        let cursor = session.step(direction, self.policy)?;
        debug!(chat_id = %chat, ?direction, cursor, "advanced");
        self.show(chat, session).await
    }

    /// Switch to the details of the current record.
    pub async fn show_details(
        &self,
        chat: ChatId,
        session: &mut SessionState,
    ) -> Result<MessageId, NavigationError> {
        session.open_details()?;
        debug!(chat_id = %chat, cursor = ?session.cursor(), "showing details");
        self.show(chat, session).await
    }

    /// Return from details to the browsing view at the same cursor.
    pub async fn back(
        &self,
        chat: ChatId,
        session: &mut SessionState,
    ) -> Result<MessageId, NavigationError> {
        session.close_details()?;
        self.show(chat, session).await
    }

    /// Leave browsing: replace the live view with the section `page` and
    /// clear the session.
    pub async fn exit(
        &self,
        chat: ChatId,
        session: &mut SessionState,
        page: &View,
    ) -> Result<MessageId, NavigationError> {
        let section = session.section().ok_or(NavigationError::NotBrowsing)?;
        let shown =
            live_view::publish(self.transport.as_ref(), chat, session.live_view_slot(), page)
                .await;
        session.clear();
        debug!(chat_id = %chat, %section, "left section");
        Ok(shown?)
    }

    async fn show(
        &self,
        chat: ChatId,
        session: &mut SessionState,
    ) -> Result<MessageId, NavigationError> {
        let view = render::render(session, self.policy).ok_or(NavigationError::NotBrowsing)?;
        let message =
            live_view::publish(self.transport.as_ref(), chat, session.live_view_slot(), &view)
                .await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryRecordRepository, RecordingTransport};
    use chrono::{TimeZone, Utc};
    use noticeboard_types::record::RecordId;
    use noticeboard_types::view::Action;

    const CHAT: ChatId = ChatId(7);

    struct Fixture {
        records: Arc<MemoryRecordRepository>,
        transport: Arc<RecordingTransport>,
        engine: NavigationEngine<MemoryRecordRepository, RecordingTransport>,
    }

    fn fixture(policy: BoundaryPolicy) -> Fixture {
        let records = Arc::new(MemoryRecordRepository::new());
        let transport = Arc::new(RecordingTransport::new());
        let engine = NavigationEngine::new(records.clone(), transport.clone(), policy);
        Fixture {
            records,
            transport,
            engine,
        }
    }

    /// Lectures with R1 (2024-01-01) and R2 (2024-02-01).
    fn seed_lectures(records: &MemoryRecordRepository) -> (RecordId, RecordId) {
        let r1 = records.insert_at(
            SectionKey::Lectures,
            "R1",
            None,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        let r2 = records.insert_at(
            SectionKey::Lectures,
            "R2",
            Some("Hall B"),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        );
        (r1, r2)
    }

    fn shown(f: &Fixture) -> View {
        f.transport.last_view(CHAT).unwrap()
    }

    #[tokio::test]
    async fn test_lectures_scenario_wraps() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let mut session = SessionState::default();

        f.engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        assert_eq!(session.cursor(), Some(0));
        assert!(shown(&f).text.ends_with("1/2\n\nR2"));

        f.engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();
        assert!(shown(&f).text.ends_with("2/2\n\nR1"));

        f.engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();
        assert!(shown(&f).text.ends_with("1/2\n\nR2"));

        // All three renders went into the same message.
        assert_eq!(f.transport.sends(CHAT), 1);
    }

    #[tokio::test]
    async fn test_enter_renders_first_of_n() {
        let f = fixture(BoundaryPolicy::Wrap);
        f.records.seed(SectionKey::Films, 5);
        let mut session = SessionState::default();

        f.engine
            .enter(CHAT, &mut session, SectionKey::Films, None)
            .await
            .unwrap();
        assert_eq!(session.cursor(), Some(0));
        assert!(shown(&f).text.contains("\n1/5\n"));
    }

    #[tokio::test]
    async fn test_enter_empty_section_creates_no_state() {
        let f = fixture(BoundaryPolicy::Wrap);
        let mut session = SessionState::default();

        let err = f
            .engine
            .enter(CHAT, &mut session, SectionKey::Conf, None)
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::EmptyCollection(SectionKey::Conf)));
        assert!(!session.is_browsing());
        assert!(f.transport.effects(CHAT).is_empty());
    }

    #[tokio::test]
    async fn test_enter_store_failure_leaves_session() {
        let f = fixture(BoundaryPolicy::Wrap);
        f.records.set_failing(true);
        let mut session = SessionState::default();

        let err = f
            .engine
            .enter(CHAT, &mut session, SectionKey::Conf, None)
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::Storage(_)));
        assert!(!session.is_browsing());
    }

    #[tokio::test]
    async fn test_enter_adopts_origin_message() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let page = f.transport.send(CHAT, &View::text("page")).await.unwrap();
        let mut session = SessionState::default();

        let live = f
            .engine
            .enter(CHAT, &mut session, SectionKey::Lectures, Some(page))
            .await
            .unwrap();
        assert_eq!(live, page);
        assert_eq!(f.transport.sends(CHAT), 1);
    }

    #[tokio::test]
    async fn test_details_then_back_restores_view() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let mut session = SessionState::default();

        f.engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        let before = shown(&f);

        f.engine.show_details(CHAT, &mut session).await.unwrap();
        assert_eq!(shown(&f).text, "Hall B");

        f.engine.back(CHAT, &mut session).await.unwrap();
        assert_eq!(shown(&f), before);
        assert_eq!(session.cursor(), Some(0));
    }

    #[tokio::test]
    async fn test_details_absent_is_noop() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let mut session = SessionState::default();

        f.engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        f.engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();
        let before = f.transport.effects(CHAT).len();

        let err = f.engine.show_details(CHAT, &mut session).await.unwrap_err();
        assert!(matches!(err, NavigationError::NoDetails));
        assert_eq!(f.transport.effects(CHAT).len(), before);
        assert_eq!(session.cursor(), Some(1));
    }

    #[tokio::test]
    async fn test_snapshot_survives_deletion() {
        let f = fixture(BoundaryPolicy::Wrap);
        let (r1, _) = seed_lectures(&f.records);
        let mut session = SessionState::default();

        f.engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        f.records.delete(r1).await.unwrap();

        f.engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();
        assert!(shown(&f).text.ends_with("2/2\n\nR1"));

        // Only a fresh entry resynchronizes.
        f.engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_unrelated_record_keeps_other_sessions_valid() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let films = f.records.seed(SectionKey::Films, 2);
        let mut lectures = SessionState::default();

        f.engine
            .enter(CHAT, &mut lectures, SectionKey::Lectures, None)
            .await
            .unwrap();
        f.records.delete(films[0]).await.unwrap();

        for _ in 0..3 {
            f.engine
                .advance(CHAT, &mut lectures, Direction::Prev)
                .await
                .unwrap();
            assert!(lectures.cursor().unwrap() < lectures.len());
        }
    }

    #[tokio::test]
    async fn test_clamp_policy_holds_at_end() {
        let f = fixture(BoundaryPolicy::Clamp);
        seed_lectures(&f.records);
        let mut session = SessionState::default();

        f.engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        f.engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();
        f.engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();

        assert_eq!(session.cursor(), Some(1));
        let view = shown(&f);
        assert!(!view.control(Action::NavNext).unwrap().enabled);
    }

    #[tokio::test]
    async fn test_failed_edit_sends_new_live_view() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let mut session = SessionState::default();

        let first = f
            .engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        f.transport.set_fail_edits(true);
        let second = f
            .engine
            .advance(CHAT, &mut session, Direction::Next)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(session.live_view(), Some(second));
        assert_eq!(f.transport.messages(CHAT).len(), 1);
    }

    #[tokio::test]
    async fn test_exit_shows_page_and_clears() {
        let f = fixture(BoundaryPolicy::Wrap);
        seed_lectures(&f.records);
        let mut session = SessionState::default();

        let live = f
            .engine
            .enter(CHAT, &mut session, SectionKey::Lectures, None)
            .await
            .unwrap();
        let page = View::text("Lecture hall info");
        let shown_in = f.engine.exit(CHAT, &mut session, &page).await.unwrap();

        assert_eq!(shown_in, live);
        assert_eq!(shown(&f), page);
        assert!(!session.is_browsing());
        assert!(session.live_view().is_none());
    }

    #[tokio::test]
    async fn test_navigation_without_session() {
        let f = fixture(BoundaryPolicy::Wrap);
        let mut session = SessionState::default();

        assert!(matches!(
            f.engine.advance(CHAT, &mut session, Direction::Next).await,
            Err(NavigationError::NotBrowsing)
        ));
        assert!(matches!(
            f.engine.exit(CHAT, &mut session, &View::text("x")).await,
            Err(NavigationError::NotBrowsing)
        ));
    }
}
