//! Chain-state records as returned by a state reader.
//!
//! These are the decoded forms of the on-chain values the extractors read:
//! avatars and their inventories, crafting slots, shop orders, stake and
//! monster-collection states, and currency definitions. Balances are kept in
//! raw minor units (`i128`) and converted to decimals only at the row level.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{ElementalType, ItemSubType, ItemType, StatType};
use crate::ids::{Address, ItemId, OrderId, TradableId};

/// A single stat contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    /// Which stat.
    pub stat_type: StatType,
    /// Flat amount added.
    pub value: Decimal,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A piece of wearable gear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Non-fungible instance id.
    pub item_id: ItemId,
    /// Item sheet id.
    pub id: i32,
    /// Gear slot.
    pub item_sub_type: ItemSubType,
    /// Rarity grade.
    pub grade: i32,
    /// Element.
    pub elemental_type: ElementalType,
    /// Enhancement level.
    pub level: i32,
    /// Set bonus id.
    pub set_id: i32,
    /// Stats granted at the current level (main stat plus options).
    pub stats: Vec<StatValue>,
    /// Number of attack skills.
    pub skill_count: u32,
    /// Number of buff skills.
    pub buff_skill_count: u32,
    /// Client resource path.
    pub spine_resource_path: String,
    /// Block before which the item cannot be used.
    pub required_block_index: u64,
    /// The stat this gear is built around.
    pub unique_stat_type: StatType,
    /// Whether the item is equipped (legacy equip flag).
    #[serde(default)]
    pub equipped: bool,
}

impl Equipment {
    /// Tradable id of this item (equal to its non-fungible id).
    pub fn tradable_id(&self) -> TradableId {
        TradableId::from(self.item_id)
    }
}

/// A costume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costume {
    /// Non-fungible instance id.
    pub item_id: ItemId,
    /// Item sheet id.
    pub id: i32,
    /// Costume slot.
    pub item_sub_type: ItemSubType,
    /// Rarity grade.
    pub grade: i32,
    /// Element.
    pub elemental_type: ElementalType,
    /// Whether the costume is worn (legacy equip flag).
    #[serde(default)]
    pub equipped: bool,
    /// Client resource path.
    pub spine_resource_path: String,
    /// Block before which the item cannot be used.
    pub required_block_index: u64,
}

/// A consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    /// Non-fungible instance id.
    pub item_id: ItemId,
    /// Item sheet id.
    pub id: i32,
    /// Consumable sub-type.
    pub item_sub_type: ItemSubType,
    /// Rarity grade.
    pub grade: i32,
    /// Element.
    pub elemental_type: ElementalType,
    /// Number of attack skills.
    pub skill_count: u32,
    /// Number of buff skills.
    pub buff_skill_count: u32,
    /// Block before which the item cannot be used.
    pub required_block_index: u64,
    /// Primary stat.
    pub main_stat: StatType,
}

/// A stackable material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Fungible id (hex digest of the sheet row).
    pub fungible_id: String,
    /// Item sheet id.
    pub id: i32,
    /// Material sub-type.
    pub item_sub_type: ItemSubType,
    /// Rarity grade.
    pub grade: i32,
    /// Element.
    pub elemental_type: ElementalType,
}

/// An item that can sit in a shop listing or a crafting slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item_type")]
pub enum TradableItem {
    /// Gear.
    Equipment(Equipment),
    /// Costume.
    Costume(Costume),
    /// Consumable.
    Consumable(Consumable),
    /// Material.
    Material(Material),
}

impl TradableItem {
    /// Top-level category.
    pub const fn item_type(&self) -> ItemType {
        match self {
            Self::Equipment(_) => ItemType::Equipment,
            Self::Costume(_) => ItemType::Costume,
            Self::Consumable(_) => ItemType::Consumable,
            Self::Material(_) => ItemType::Material,
        }
    }

    /// The equipment inside, if this is gear.
    pub const fn as_equipment(&self) -> Option<&Equipment> {
        match self {
            Self::Equipment(e) => Some(e),
            _ => None,
        }
    }
}

/// Items owned by an avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Gear.
    #[serde(default)]
    pub equipments: Vec<Equipment>,
    /// Costumes.
    #[serde(default)]
    pub costumes: Vec<Costume>,
    /// Consumables.
    #[serde(default)]
    pub consumables: Vec<Consumable>,
    /// Materials.
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Inventory {
    /// Find gear by tradable id.
    pub fn equipment_by_tradable_id(&self, tradable_id: TradableId) -> Option<&Equipment> {
        self.equipments
            .iter()
            .find(|e| e.tradable_id() == tradable_id)
    }

    /// Find gear by non-fungible id.
    pub fn equipment(&self, item_id: ItemId) -> Option<&Equipment> {
        self.equipments.iter().find(|e| e.item_id == item_id)
    }

    /// Find a costume by non-fungible id.
    pub fn costume(&self, item_id: ItemId) -> Option<&Costume> {
        self.costumes.iter().find(|c| c.item_id == item_id)
    }
}

// ---------------------------------------------------------------------------
// Avatar and account
// ---------------------------------------------------------------------------

/// An avatar (playable character) owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarState {
    /// Avatar address.
    pub address: Address,
    /// Owning account.
    pub agent_address: Address,
    /// Display name.
    pub name: String,
    /// Character sheet id.
    pub character_id: i32,
    /// Avatar level.
    pub level: i32,
    /// Owned items.
    #[serde(default)]
    pub inventory: Inventory,
    /// Stage ids the avatar has cleared.
    #[serde(default)]
    pub cleared_stages: BTreeSet<i32>,
}

/// An account's top-level state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    /// Account address.
    pub address: Address,
    /// Round of the account's current monster collection.
    #[serde(default)]
    pub monster_collection_round: u32,
}

/// Items an avatar wears into adventure battles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSlotState {
    /// Equipped gear ids.
    #[serde(default)]
    pub equipments: Vec<ItemId>,
    /// Equipped costume ids.
    #[serde(default)]
    pub costumes: Vec<ItemId>,
}

/// A crafting slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSlotState {
    /// Block at which the slot frees up.
    #[serde(default)]
    pub unlock_block_index: u64,
    /// Item produced by the last crafting or enhancement in this slot.
    #[serde(default)]
    pub result: Option<TradableItem>,
}

/// A rune held by an avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneState {
    /// Rune sheet id.
    pub rune_id: i32,
    /// Rune level.
    pub level: i32,
}

/// Collections an avatar has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionState {
    /// Completed collection ids.
    #[serde(default)]
    pub ids: BTreeSet<i32>,
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// How an order sells its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "order_type")]
pub enum OrderKind {
    /// A single non-fungible item.
    NonFungible,
    /// A stack of fungible items.
    Fungible {
        /// Number of units in the stack.
        item_count: i32,
    },
}

/// A shop order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub order_id: OrderId,
    /// Seller account.
    pub seller_agent_address: Address,
    /// Seller avatar.
    pub seller_avatar_address: Address,
    /// Listed item.
    pub tradable_id: TradableId,
    /// Order shape.
    pub kind: OrderKind,
}

impl Order {
    /// Units sold by this order (1 for non-fungible orders).
    pub const fn item_count(&self) -> i32 {
        match self.kind {
            OrderKind::NonFungible => 1,
            OrderKind::Fungible { item_count } => item_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Currency and staking
// ---------------------------------------------------------------------------

/// A fungible currency definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Ticker symbol.
    pub ticker: String,
    /// Decimal places of the fixed-point representation.
    pub decimal_places: u8,
    /// Addresses allowed to mint. `None` means anyone.
    #[serde(default)]
    pub minters: Option<Vec<Address>>,
}

impl Currency {
    /// Raw minor units in one major unit (`10^decimal_places`).
    pub fn unit_raw(&self) -> Option<i128> {
        10_i128.checked_pow(u32::from(self.decimal_places))
    }

    /// Convert a raw minor-unit amount to a decimal in major units.
    pub fn to_major(&self, raw: i128) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(raw, u32::from(self.decimal_places)).ok()
    }

    /// Whether `address` is one of the currency's minters.
    pub fn has_minter(&self, address: &Address) -> bool {
        self.minters
            .as_ref()
            .is_some_and(|m| m.iter().any(|a| a == address))
    }
}

/// An account's stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeState {
    /// Block at which the current stake started.
    pub started_block_index: u64,
    /// Block of the last reward claim, 0 if never claimed.
    #[serde(default)]
    pub received_block_index: u64,
}

impl StakeState {
    /// Block from which rewards are currently accruing.
    pub const fn last_claim_block_index(&self) -> u64 {
        if self.received_block_index > 0 {
            self.received_block_index
        } else {
            self.started_block_index
        }
    }
}

/// A legacy monster collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterCollectionState {
    /// Address holding the collected deposit.
    pub address: Address,
    /// Collection level.
    pub level: i32,
    /// Block at which the collection started.
    pub started_block_index: u64,
}
