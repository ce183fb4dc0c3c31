//! Per-chat navigation state.
//!
//! A session is either idle or browsing a snapshot of one section. The
//! snapshot is a point-in-time copy: records an admin deletes afterwards stay
//! visible until the user enters the section again. The cursor is only
//! reachable through methods that keep it inside the snapshot, and a browse
//! can only be created from a non-empty snapshot.

use noticeboard_types::chat::MessageId;
use noticeboard_types::config::BoundaryPolicy;
use noticeboard_types::error::NavigationError;
use noticeboard_types::record::Record;
use noticeboard_types::section::SectionKey;

/// Direction of a cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Which rendering of the current record is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Browsing,
    Details,
}

#[derive(Debug, Clone)]
struct Browse {
    section: SectionKey,
    snapshot: Vec<Record>,
    cursor: usize,
    mode: ViewMode,
}

/// Transient navigation state for one chat.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    browse: Option<Browse>,
    live_view: Option<MessageId>,
}

impl SessionState {
    /// Start browsing `section` with a fresh snapshot, cursor at 0.
    ///
    /// Replaces any previous browse wholesale. An empty snapshot is rejected
    /// and leaves the current state untouched.
    pub fn begin(
        &mut self,
        section: SectionKey,
        snapshot: Vec<Record>,
    ) -> Result<(), NavigationError> {
        if snapshot.is_empty() {
            return Err(NavigationError::EmptyCollection(section));
        }
        self.browse = Some(Browse {
            section,
            snapshot,
            cursor: 0,
            mode: ViewMode::Browsing,
        });
        Ok(())
    }

    pub fn is_browsing(&self) -> bool {
        self.browse.is_some()
    }

    pub fn section(&self) -> Option<SectionKey> {
        self.browse.as_ref().map(|b| b.section)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.browse.as_ref().map(|b| b.cursor)
    }

    pub fn mode(&self) -> Option<ViewMode> {
        self.browse.as_ref().map(|b| b.mode)
    }

    /// Number of records in the snapshot (0 when idle).
    pub fn len(&self) -> usize {
        self.browse.as_ref().map_or(0, |b| b.snapshot.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> &[Record] {
        self.browse.as_ref().map_or(&[], |b| b.snapshot.as_slice())
    }

    /// The record under the cursor.
    pub fn current(&self) -> Option<&Record> {
        self.browse.as_ref().map(|b| &b.snapshot[b.cursor])
    }

    /// Move the cursor one step and return the new position.
    ///
    /// Under `Wrap` the snapshot is circular. Under `Clamp` a step past either
    /// end leaves the cursor where it is. Stepping also returns from the
    /// details view to browsing.
    pub fn step(
        &mut self,
        direction: Direction,
        policy: BoundaryPolicy,
    ) -> Result<usize, NavigationError> {
        let browse = self.browse.as_mut().ok_or(NavigationError::NotBrowsing)?;
        let len = browse.snapshot.len();
        browse.cursor = match (direction, policy) {
            (Direction::Next, BoundaryPolicy::Wrap) => (browse.cursor + 1) % len,
            (Direction::Prev, BoundaryPolicy::Wrap) => (browse.cursor + len - 1) % len,
            (Direction::Next, BoundaryPolicy::Clamp) => (browse.cursor + 1).min(len - 1),
            (Direction::Prev, BoundaryPolicy::Clamp) => browse.cursor.saturating_sub(1),
        };
        browse.mode = ViewMode::Browsing;
        Ok(browse.cursor)
    }

    /// Switch to the details view of the current record and return its details.
    pub fn open_details(&mut self) -> Result<&str, NavigationError> {
        let browse = self.browse.as_mut().ok_or(NavigationError::NotBrowsing)?;
        let record = &browse.snapshot[browse.cursor];
        let details = record.details.as_deref().ok_or(NavigationError::NoDetails)?;
        browse.mode = ViewMode::Details;
        Ok(details)
    }

    /// Leave the details view; the cursor is unchanged.
    pub fn close_details(&mut self) -> Result<(), NavigationError> {
        let browse = self.browse.as_mut().ok_or(NavigationError::NotBrowsing)?;
        if browse.mode != ViewMode::Details {
            return Err(NavigationError::NotInDetailView);
        }
        browse.mode = ViewMode::Browsing;
        Ok(())
    }

    /// The message currently representing the navigation view.
    pub fn live_view(&self) -> Option<MessageId> {
        self.live_view
    }

    /// Mutable access to the live view slot, for the publisher.
    pub fn live_view_slot(&mut self) -> &mut Option<MessageId> {
        &mut self.live_view
    }

    /// Forget everything: browse and live view.
    pub fn clear(&mut self) {
        *self = SessionState::default();
    }
}
