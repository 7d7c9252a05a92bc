//! The read-only view extractors use to inspect chain state.
//!
//! One reader covers one snapshot: the state before an action, after it,
//! or after its revert. Readers never mutate and extractors never cache
//! across events.

use chronicle_types::{
    AgentState, Address, AvatarState, CollectionState, CombinationSlotState, Currency,
    ItemSlotState, MonsterCollectionState, Order, OrderId, RuneState, StakeState, TradableId,
    TradableItem,
};

use crate::error::StateError;
use crate::rules::RuleTables;

/// Typed reads against one world-state snapshot.
pub trait StateReader {
    /// Avatar state by avatar address.
    fn avatar(&self, address: &Address) -> Option<&AvatarState>;

    /// Account state by account address.
    fn agent(&self, address: &Address) -> Option<&AgentState>;

    /// Adventure item slots of an avatar.
    fn item_slot(&self, avatar: &Address) -> Option<&ItemSlotState>;

    /// A crafting slot of an avatar.
    fn combination_slot(&self, avatar: &Address, slot_index: i32)
    -> Option<&CombinationSlotState>;

    /// A shop listing's item by tradable id.
    fn tradable_item(&self, id: TradableId) -> Option<&TradableItem>;

    /// A shop order.
    fn order(&self, id: OrderId) -> Option<&Order>;

    /// The stake of an account.
    fn stake(&self, agent: &Address) -> Option<&StakeState>;

    /// Gold staked by an account, in raw minor units.
    fn staked_balance(&self, agent: &Address) -> i128;

    /// The monster collection of an account for a collection round.
    fn monster_collection(&self, agent: &Address, round: u32) -> Option<&MonsterCollectionState>;

    /// Gold balance of an address, in raw minor units.
    fn balance(&self, address: &Address) -> i128;

    /// The chain's gold currency definition.
    fn gold_currency(&self) -> Option<&Currency>;

    /// Runes held by an avatar.
    fn runes(&self, avatar: &Address) -> &[RuneState];

    /// Completed collections of an avatar.
    fn collection(&self, avatar: &Address) -> Option<&CollectionState>;

    /// Rule tables stored in this snapshot.
    fn rules(&self) -> &RuleTables;

    /// Avatar state, or [`StateError::MissingChainState`].
    fn require_avatar(&self, address: &Address) -> Result<&AvatarState, StateError> {
        self.avatar(address)
            .ok_or_else(|| StateError::missing_state("avatar", address))
    }

    /// Stake state, or [`StateError::MissingChainState`].
    fn require_stake(&self, agent: &Address) -> Result<&StakeState, StateError> {
        self.stake(agent)
            .ok_or_else(|| StateError::missing_state("stake", agent))
    }

    /// Gold currency, or [`StateError::MissingChainState`].
    fn require_gold_currency(&self) -> Result<&Currency, StateError> {
        self.gold_currency()
            .ok_or_else(|| StateError::missing_state("gold currency", "chain"))
    }
}
