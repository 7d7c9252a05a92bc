//! Apply and revert event envelopes shipped by the chain follower.

use chrono::{DateTime, Utc};
use chronicle_types::{ActionId, ActionPayload, Address};
use serde::{Deserialize, Serialize};

use crate::snapshot::WorldSnapshot;

/// An action's effects were materialized into canonical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyEvent {
    /// Action id.
    pub action_id: ActionId,
    /// Account that signed the transaction.
    pub signer: Address,
    /// Block the action was applied in.
    pub block_index: u64,
    /// Block timestamp.
    pub block_time: DateTime<Utc>,
    /// Decoded action parameters.
    pub action: ActionPayload,
    /// State before the action.
    pub previous_state: WorldSnapshot,
    /// State after the action.
    pub output_state: WorldSnapshot,
    /// Set when the action failed on chain.
    #[serde(default)]
    pub failed: bool,
}

/// An action's effects were unwound from canonical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertEvent {
    /// Action id.
    pub action_id: ActionId,
    /// Account that signed the transaction.
    pub signer: Address,
    /// Block the action had been applied in.
    pub block_index: u64,
    /// Block timestamp.
    pub block_time: DateTime<Utc>,
    /// Decoded action parameters.
    pub action: ActionPayload,
    /// State after the revert.
    pub state: WorldSnapshot,
    /// Set when the reverted action had failed on chain.
    #[serde(default)]
    pub failed: bool,
}

/// One entry of the ordered chain event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainEvent {
    /// An action was applied.
    Apply(Box<ApplyEvent>),
    /// An action was reverted.
    Revert(Box<RevertEvent>),
}

impl ChainEvent {
    /// Id of the action the event concerns.
    pub const fn action_id(&self) -> ActionId {
        match self {
            Self::Apply(e) => e.action_id,
            Self::Revert(e) => e.action_id,
        }
    }

    /// Block index of the event.
    pub const fn block_index(&self) -> u64 {
        match self {
            Self::Apply(e) => e.block_index,
            Self::Revert(e) => e.block_index,
        }
    }
}
