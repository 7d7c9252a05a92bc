//! The revert path.
//!
//! A reverted action's own record is retracted: dropped from the buffer if
//! it has not been flushed yet, otherwise deleted from the store by action
//! id. Crafting, enhancement and purchases also left equipment rows that
//! mirror current slot or inventory state, so those are re-derived from the
//! post-revert snapshot and buffered again.
//!
//! Ranking battles and purchases have no action record to retract. Stake,
//! claim and migration records are only retracted when
//! `retract_stake_records` is set; otherwise their reverts are no-ops.

use chronicle_db::{DbError, RecordStore};
use chronicle_extract::{ExtractError, RevertContext, rederive_after_revert};
use chronicle_state::RevertEvent;
use chronicle_types::records::action_key;
use chronicle_types::{ActionKind, RecordKind};

use crate::buffer::BatchBuffer;

/// Errors raised while reconciling a revert.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The compensating delete failed.
    #[error("compensating delete failed: {0}")]
    Store(#[from] DbError),

    /// Re-deriving equipment from the post-revert state failed.
    #[error("re-derivation failed: {0}")]
    Extract(#[from] ExtractError),
}

/// How an action record was retracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retraction {
    /// The kind keeps no retractable record.
    NotTracked,
    /// Dropped from the buffer without store I/O.
    Buffered,
    /// Deleted from the store; carries the number of rows removed.
    Deleted(u64),
}

/// Result of one reconciled revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertOutcome {
    /// What happened to the action's own record.
    pub retraction: Retraction,
    /// Rows re-derived and buffered.
    pub rederived: usize,
}

/// Applies revert events to the buffer and the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    retract_stake_records: bool,
}

impl Reconciler {
    /// Create a reconciler.
    pub const fn new(retract_stake_records: bool) -> Self {
        Self {
            retract_stake_records,
        }
    }

    /// The record kind retracted when an action of `kind` is reverted.
    pub const fn retracted_kind(&self, kind: ActionKind) -> Option<RecordKind> {
        match kind {
            ActionKind::HackAndSlash
            | ActionKind::CombinationConsumable
            | ActionKind::CombinationEquipment
            | ActionKind::ItemEnhancement => kind.action_record_kind(),
            ActionKind::Stake | ActionKind::ClaimStakeReward | ActionKind::MigrateMonsterCollection
                if self.retract_stake_records =>
            {
                kind.action_record_kind()
            }
            _ => None,
        }
    }

    /// Retract the reverted action's record, then re-derive what mirrors
    /// post-revert state.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Store`] if the delete fails (nothing is
    /// re-derived then) and [`ReconcileError::Extract`] if re-derivation
    /// fails after the retraction went through.
    pub async fn revert<S: RecordStore>(
        &self,
        event: &RevertEvent,
        kind: ActionKind,
        buffer: &mut BatchBuffer,
        store: &S,
    ) -> Result<RevertOutcome, ReconcileError> {
        let retraction = match self.retracted_kind(kind) {
            None => Retraction::NotTracked,
            Some(record_kind) => {
                let key = action_key(event.action_id);
                if buffer.remove(record_kind, &key).is_some() {
                    Retraction::Buffered
                } else {
                    Retraction::Deleted(store.delete(record_kind, &key).await?)
                }
            }
        };

        let ctx = RevertContext::from_event(event);
        let records = rederive_after_revert(&ctx, &event.action)?;
        let rederived = records.len();
        buffer.add_all(records);

        Ok(RevertOutcome {
            retraction,
            rederived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stake_kinds_follow_the_switch() {
        let default = Reconciler::new(false);
        let retracting = Reconciler::new(true);
        for kind in [
            ActionKind::Stake,
            ActionKind::ClaimStakeReward,
            ActionKind::MigrateMonsterCollection,
        ] {
            assert_eq!(default.retracted_kind(kind), None);
            assert_eq!(retracting.retracted_kind(kind), kind.action_record_kind());
        }
    }

    #[test]
    fn battles_and_crafting_always_retract() {
        let reconciler = Reconciler::default();
        assert_eq!(
            reconciler.retracted_kind(ActionKind::HackAndSlash),
            Some(RecordKind::HackAndSlash)
        );
        assert_eq!(
            reconciler.retracted_kind(ActionKind::ItemEnhancement),
            Some(RecordKind::ItemEnhancement)
        );
        assert_eq!(reconciler.retracted_kind(ActionKind::Buy), None);
        assert_eq!(reconciler.retracted_kind(ActionKind::RankingBattle), None);
    }
}
