//! In-memory world snapshot.
//!
//! [`WorldSnapshot`] is the decoded state view the chain follower ships
//! alongside each event. It implements [`StateReader`] directly.

use std::collections::BTreeMap;

use chronicle_types::{
    AgentState, Address, AvatarState, CollectionState, CombinationSlotState, Currency,
    ItemSlotState, MonsterCollectionState, Order, OrderId, RuneState, StakeState, TradableId,
    TradableItem,
};
use serde::{Deserialize, Serialize};

use crate::reader::StateReader;
use crate::rules::RuleTables;

/// A decoded view of world state at one point of the apply/revert sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Avatars by address.
    #[serde(default)]
    pub avatars: BTreeMap<Address, AvatarState>,
    /// Accounts by address.
    #[serde(default)]
    pub agents: BTreeMap<Address, AgentState>,
    /// Adventure item slots by avatar.
    #[serde(default)]
    pub item_slots: BTreeMap<Address, ItemSlotState>,
    /// Crafting slots by avatar, then slot index.
    #[serde(default)]
    pub combination_slots: BTreeMap<Address, BTreeMap<i32, CombinationSlotState>>,
    /// Shop items by tradable id.
    #[serde(default)]
    pub tradable_items: BTreeMap<TradableId, TradableItem>,
    /// Shop orders.
    #[serde(default)]
    pub orders: BTreeMap<OrderId, Order>,
    /// Stakes by account.
    #[serde(default)]
    pub stakes: BTreeMap<Address, StakeState>,
    /// Staked gold by account, raw minor units.
    #[serde(default)]
    pub staked_balances: BTreeMap<Address, i128>,
    /// Monster collections by account, then round.
    #[serde(default)]
    pub monster_collections: BTreeMap<Address, BTreeMap<u32, MonsterCollectionState>>,
    /// Gold balances, raw minor units.
    #[serde(default)]
    pub balances: BTreeMap<Address, i128>,
    /// Gold currency definition.
    #[serde(default)]
    pub gold_currency: Option<Currency>,
    /// Runes by avatar.
    #[serde(default)]
    pub runes: BTreeMap<Address, Vec<RuneState>>,
    /// Completed collections by avatar.
    #[serde(default)]
    pub collections: BTreeMap<Address, CollectionState>,
    /// Rule tables.
    #[serde(default)]
    pub rules: RuleTables,
}

impl WorldSnapshot {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an avatar.
    #[must_use]
    pub fn with_avatar(mut self, avatar: AvatarState) -> Self {
        self.avatars.insert(avatar.address, avatar);
        self
    }

    /// Add an account.
    #[must_use]
    pub fn with_agent(mut self, agent: AgentState) -> Self {
        self.agents.insert(agent.address, agent);
        self
    }

    /// Set an avatar's adventure item slots.
    #[must_use]
    pub fn with_item_slot(mut self, avatar: Address, slot: ItemSlotState) -> Self {
        self.item_slots.insert(avatar, slot);
        self
    }

    /// Set one crafting slot of an avatar.
    #[must_use]
    pub fn with_combination_slot(
        mut self,
        avatar: Address,
        slot_index: i32,
        slot: CombinationSlotState,
    ) -> Self {
        self.combination_slots
            .entry(avatar)
            .or_default()
            .insert(slot_index, slot);
        self
    }

    /// List an item in the shop.
    #[must_use]
    pub fn with_tradable_item(mut self, id: TradableId, item: TradableItem) -> Self {
        self.tradable_items.insert(id, item);
        self
    }

    /// Add a shop order.
    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.insert(order.order_id, order);
        self
    }

    /// Set an account's stake and staked gold.
    #[must_use]
    pub fn with_stake(mut self, agent: Address, stake: StakeState, staked_raw: i128) -> Self {
        self.stakes.insert(agent, stake);
        self.staked_balances.insert(agent, staked_raw);
        self
    }

    /// Set an account's monster collection for a round.
    #[must_use]
    pub fn with_monster_collection(
        mut self,
        agent: Address,
        round: u32,
        collection: MonsterCollectionState,
    ) -> Self {
        self.monster_collections
            .entry(agent)
            .or_default()
            .insert(round, collection);
        self
    }

    /// Set a gold balance.
    #[must_use]
    pub fn with_balance(mut self, address: Address, raw: i128) -> Self {
        self.balances.insert(address, raw);
        self
    }

    /// Set the gold currency.
    #[must_use]
    pub fn with_gold_currency(mut self, currency: Currency) -> Self {
        self.gold_currency = Some(currency);
        self
    }

    /// Set an avatar's runes.
    #[must_use]
    pub fn with_runes(mut self, avatar: Address, runes: Vec<RuneState>) -> Self {
        self.runes.insert(avatar, runes);
        self
    }

    /// Set an avatar's completed collections.
    #[must_use]
    pub fn with_collection(mut self, avatar: Address, collection: CollectionState) -> Self {
        self.collections.insert(avatar, collection);
        self
    }

    /// Replace the rule tables.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleTables) -> Self {
        self.rules = rules;
        self
    }
}

impl StateReader for WorldSnapshot {
    fn avatar(&self, address: &Address) -> Option<&AvatarState> {
        self.avatars.get(address)
    }

    fn agent(&self, address: &Address) -> Option<&AgentState> {
        self.agents.get(address)
    }

    fn item_slot(&self, avatar: &Address) -> Option<&ItemSlotState> {
        self.item_slots.get(avatar)
    }

    fn combination_slot(
        &self,
        avatar: &Address,
        slot_index: i32,
    ) -> Option<&CombinationSlotState> {
        self.combination_slots
            .get(avatar)
            .and_then(|slots| slots.get(&slot_index))
    }

    fn tradable_item(&self, id: TradableId) -> Option<&TradableItem> {
        self.tradable_items.get(&id)
    }

    fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    fn stake(&self, agent: &Address) -> Option<&StakeState> {
        self.stakes.get(agent)
    }

    fn staked_balance(&self, agent: &Address) -> i128 {
        self.staked_balances.get(agent).copied().unwrap_or(0)
    }

    fn monster_collection(&self, agent: &Address, round: u32) -> Option<&MonsterCollectionState> {
        self.monster_collections
            .get(agent)
            .and_then(|rounds| rounds.get(&round))
    }

    fn balance(&self, address: &Address) -> i128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    fn gold_currency(&self) -> Option<&Currency> {
        self.gold_currency.as_ref()
    }

    fn runes(&self, avatar: &Address) -> &[RuneState] {
        self.runes.get(avatar).map_or(&[][..], Vec::as_slice)
    }

    fn collection(&self, avatar: &Address) -> Option<&CollectionState> {
        self.collections.get(avatar)
    }

    fn rules(&self) -> &RuleTables {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn absent_balances_read_as_zero() {
        let snapshot = WorldSnapshot::new().with_balance(addr(1), 500);
        assert_eq!(snapshot.balance(&addr(1)), 500);
        assert_eq!(snapshot.balance(&addr(2)), 0);
        assert_eq!(snapshot.staked_balance(&addr(1)), 0);
        assert!(snapshot.runes(&addr(1)).is_empty());
    }

    #[test]
    fn require_avatar_reports_address() {
        let snapshot = WorldSnapshot::new();
        assert_eq!(
            snapshot.require_avatar(&addr(9)).err(),
            Some(StateError::missing_state("avatar", addr(9)))
        );
    }

    #[test]
    fn combination_slot_by_index() {
        let snapshot = WorldSnapshot::new().with_combination_slot(
            addr(1),
            2,
            CombinationSlotState::default(),
        );
        assert!(snapshot.combination_slot(&addr(1), 2).is_some());
        assert!(snapshot.combination_slot(&addr(1), 0).is_none());
    }

    #[test]
    fn snapshot_survives_json_with_map_keys() {
        let snapshot = WorldSnapshot::new()
            .with_balance(addr(3), 1_000_000_000_000_000_000_000)
            .with_stake(
                addr(3),
                StakeState {
                    started_block_index: 10,
                    received_block_index: 0,
                },
                100_000,
            );
        let json = serde_json::to_string(&snapshot).ok();
        let back: Option<WorldSnapshot> = json.and_then(|j| serde_json::from_str(&j).ok());
        assert_eq!(back, Some(snapshot));
    }
}
