//! Per-event inputs handed to extractors.

use chrono::{DateTime, Utc};
use chronicle_state::{ApplyEvent, RevertEvent, RuleTables, StateReader};
use chronicle_types::{ActionId, Address, AgentRow, Currency, Record};
use rust_decimal::Decimal;

use crate::error::ExtractError;

/// Inputs of an apply-path extractor.
#[derive(Clone, Copy)]
pub struct ApplyContext<'a> {
    /// Action id.
    pub action_id: ActionId,
    /// Signer of the action.
    pub signer: Address,
    /// Block of the action.
    pub block_index: u64,
    /// Block timestamp.
    pub block_time: DateTime<Utc>,
    /// State before the action.
    pub previous: &'a dyn StateReader,
    /// State after the action.
    pub output: &'a dyn StateReader,
}

impl<'a> ApplyContext<'a> {
    /// Context over an apply event's snapshots.
    pub fn from_event(event: &'a ApplyEvent) -> Self {
        Self {
            action_id: event.action_id,
            signer: event.signer,
            block_index: event.block_index,
            block_time: event.block_time,
            previous: &event.previous_state,
            output: &event.output_state,
        }
    }

    /// Rule tables in force for the action (read from the previous state).
    pub fn rules(&self) -> &'a RuleTables {
        self.previous.rules()
    }

    /// Account row of the signer.
    pub const fn signer_record(&self) -> Record {
        Record::Agent(AgentRow {
            address: self.signer,
        })
    }
}

/// Inputs of the revert-path re-derivation.
#[derive(Clone, Copy)]
pub struct RevertContext<'a> {
    /// Action id.
    pub action_id: ActionId,
    /// Signer of the reverted action.
    pub signer: Address,
    /// Block the action had been applied in.
    pub block_index: u64,
    /// Block timestamp.
    pub block_time: DateTime<Utc>,
    /// State after the revert.
    pub state: &'a dyn StateReader,
}

impl<'a> RevertContext<'a> {
    /// Context over a revert event's snapshot.
    pub fn from_event(event: &'a RevertEvent) -> Self {
        Self {
            action_id: event.action_id,
            signer: event.signer,
            block_index: event.block_index,
            block_time: event.block_time,
            state: &event.state,
        }
    }
}

/// Raw gold amount as a decimal in major units.
pub(crate) fn to_major(gold: &Currency, raw: i128) -> Result<Decimal, ExtractError> {
    gold.to_major(raw)
        .ok_or_else(|| ExtractError::Internal(format!("gold amount {raw} out of decimal range")))
}
