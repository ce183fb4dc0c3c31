//! Admin mutation engine.
//!
//! Create and edit go `IDLE -> awaiting input -> IDLE`; delete goes
//! `IDLE -> awaiting confirmation -> IDLE`. Every entry point checks the
//! authorizer first. A failed store call resets the phase to `Idle` so an
//! admin is never left stuck in a half-finished operation.

use std::sync::Arc;

use noticeboard_types::admin::AdminPhase;
use noticeboard_types::chat::ActorId;
use noticeboard_types::error::AdminError;
use noticeboard_types::record::{Record, RecordId, details_from_input};
use noticeboard_types::section::SectionKey;

use tracing::{info, warn};

use crate::auth::Authorizer;
use crate::repository::record::RecordRepository;

/// Result of an admin step, rendered by `admin::panel`.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminOutcome {
    /// Waiting for the body of a new record.
    AwaitingContent { section: SectionKey },
    Created {
        record_id: RecordId,
        section: SectionKey,
    },
    /// Waiting for new details; carries the record so its current details
    /// can be shown to the operator.
    AwaitingDetails { record: Record },
    DetailsUpdated {
        record_id: RecordId,
        details: Option<String>,
    },
    AwaitingConfirmation { record: Record },
    Deleted(RecordId),
    Cancelled,
}

/// Service driving admin mutations of the record store.
pub struct AdminEngine<R: RecordRepository, A: Authorizer> {
    records: Arc<R>,
    authorizer: Arc<A>,
}

impl<R: RecordRepository, A: Authorizer> AdminEngine<R, A> {
    pub fn new(records: Arc<R>, authorizer: Arc<A>) -> Self {
        Self {
            records,
            authorizer,
        }
    }

    /// Fail with `Unauthorized` unless `actor` is privileged.
    /// Privilege check without the denial log, for routing decisions.
    pub fn is_admin(&self, actor: ActorId) -> bool {
        self.authorizer.is_privileged(actor)
    }

    pub fn authorize(&self, actor: ActorId) -> Result<(), AdminError> {
        if self.authorizer.is_privileged(actor) {
            Ok(())
        } else {
            warn!(actor_id = %actor, "admin access denied");
            Err(AdminError::Unauthorized)
        }
    }

    /// Records of `section`, newest first, for the record pickers.
    pub async fn records_for(
        &self,
        actor: ActorId,
        section: SectionKey,
    ) -> Result<Vec<Record>, AdminError> {
        self.authorize(actor)?;
        Ok(self.records.list(section).await?)
    }

    pub fn start_create(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
        section: SectionKey,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        *phase = AdminPhase::AwaitingNewContent { section };
        Ok(AdminOutcome::AwaitingContent { section })
    }

    /// Store `text` verbatim as the body of a new record.
    pub async fn complete_create(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
        text: &str,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        let AdminPhase::AwaitingNewContent { section } = *phase else {
            return Err(AdminError::InvalidPhase { phase: phase.name() });
        };
        *phase = AdminPhase::Idle;

        let record_id = self.records.append(section, text, None).await?;
        info!(actor_id = %actor, %section, %record_id, "record created");
        Ok(AdminOutcome::Created { record_id, section })
    }

    pub async fn start_edit(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
        record_id: RecordId,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        let record = self.existing(phase, record_id).await?;
        *phase = AdminPhase::AwaitingDetailEdit { record_id };
        Ok(AdminOutcome::AwaitingDetails { record })
    }

    /// Set the pending record's details; a bare `-` clears them.
    pub async fn complete_edit(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
        text: &str,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        let AdminPhase::AwaitingDetailEdit { record_id } = *phase else {
            return Err(AdminError::InvalidPhase { phase: phase.name() });
        };
        *phase = AdminPhase::Idle;

        // The record may have been deleted while we waited for input.
        self.existing(phase, record_id).await?;
        let details = details_from_input(text);
        self.records
            .update_details(record_id, details.as_deref())
            .await?;
        info!(actor_id = %actor, %record_id, cleared = details.is_none(), "record details updated");
        Ok(AdminOutcome::DetailsUpdated { record_id, details })
    }

    pub async fn start_delete(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
        record_id: RecordId,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        let record = self.existing(phase, record_id).await?;
        *phase = AdminPhase::AwaitingDeleteConfirmation { record_id };
        Ok(AdminOutcome::AwaitingConfirmation { record })
    }

    pub async fn confirm_delete(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        let AdminPhase::AwaitingDeleteConfirmation { record_id } = *phase else {
            return Err(AdminError::InvalidPhase { phase: phase.name() });
        };
        *phase = AdminPhase::Idle;

        self.existing(phase, record_id).await?;
        self.records.delete(record_id).await?;
        info!(actor_id = %actor, %record_id, "record deleted");
        Ok(AdminOutcome::Deleted(record_id))
    }

    /// Abandon a pending delete without touching the store.
    pub fn cancel_delete(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        if !matches!(phase, AdminPhase::AwaitingDeleteConfirmation { .. }) {
            return Err(AdminError::InvalidPhase { phase: phase.name() });
        }
        *phase = AdminPhase::Idle;
        Ok(AdminOutcome::Cancelled)
    }

    /// Abandon whatever is pending.
    pub fn cancel(
        &self,
        actor: ActorId,
        phase: &mut AdminPhase,
    ) -> Result<AdminOutcome, AdminError> {
        self.authorize(actor)?;
        *phase = AdminPhase::Idle;
        Ok(AdminOutcome::Cancelled)
    }

    /// Load `record_id`, resetting the phase when the store fails.
    async fn existing(
        &self,
        phase: &mut AdminPhase,
        record_id: RecordId,
    ) -> Result<Record, AdminError> {
        match self.records.get(record_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(AdminError::RecordNotFound(record_id)),
            Err(e) => {
                warn!(%record_id, error = %e, "record lookup failed, admin phase reset");
                *phase = AdminPhase::Idle;
                Err(e.into())
            }
        }
    }
}
