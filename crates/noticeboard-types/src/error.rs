use thiserror::Error;

use crate::chat::MessageId;
use crate::record::RecordId;
use crate::section::SectionKey;

/// Errors from repository operations (used by trait definitions in noticeboard-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the chat transport.
///
/// Edit and delete failures are expected (message too old, removed by the
/// user) and are recovered by the engines.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    #[error("message {0} can no longer be edited")]
    NotEditable(MessageId),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Errors related to session navigation.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("section '{0}' has no records")]
    EmptyCollection(SectionKey),

    #[error("no active navigation session")]
    NotBrowsing,

    #[error("record has no details")]
    NoDetails,

    #[error("not viewing details")]
    NotInDetailView,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors related to admin mutations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("access denied")]
    Unauthorized,

    #[error("record {0} not found")]
    RecordNotFound(RecordId),

    #[error("unexpected input while {phase}")]
    InvalidPhase { phase: &'static str },

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
