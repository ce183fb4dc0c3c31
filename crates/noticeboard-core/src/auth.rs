//! Authorization port for admin entry points.

use std::collections::HashSet;

use noticeboard_types::chat::ActorId;

/// Decides whether an actor may use the admin surface.
///
/// Treated as a pure function: no I/O, no side effects.
pub trait Authorizer: Send + Sync {
    fn is_privileged(&self, actor: ActorId) -> bool;
}

/// Fixed allow-list of admin actor ids, usually taken from `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct StaticAllowList {
    admins: HashSet<i64>,
}

impl StaticAllowList {
    pub fn new(admins: impl IntoIterator<Item = i64>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

impl Authorizer for StaticAllowList {
    fn is_privileged(&self, actor: ActorId) -> bool {
        self.admins.contains(&actor.0)
    }
}
