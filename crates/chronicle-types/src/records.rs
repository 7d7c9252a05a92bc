//! Output rows written to the mirror.
//!
//! Each row type maps onto one table. [`Record`] wraps them so the buffer
//! and the store can handle every kind uniformly; [`Record::key`] is the
//! dedup key within a flush cycle and the delete key on revert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{ElementalType, ItemSubType, ItemType, RecordKind, StatType};
use crate::ids::{ActionId, Address, ItemId, OrderId, TradableId};

/// A signer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRow {
    /// Account address.
    pub address: Address,
}

/// An avatar profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarRow {
    /// Avatar address.
    pub address: Address,
    /// Owning account.
    pub agent_address: Address,
    /// Display name.
    pub name: String,
    /// Avatar level.
    pub avatar_level: i32,
    /// Sheet id of the equipped title, if any.
    pub title_id: Option<i32>,
    /// Sheet id of the equipped armor (or the default armor).
    pub armor_id: i32,
    /// Aggregate combat power.
    pub cp: i32,
    /// Block time of the event that produced the row.
    pub timestamp: DateTime<Utc>,
}

/// A stage battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HackAndSlashRow {
    /// Action id.
    pub id: ActionId,
    /// Signer.
    pub agent_address: Address,
    /// Fighting avatar.
    pub avatar_address: Address,
    /// Stage fought.
    pub stage_id: i32,
    /// Whether the stage is cleared after the battle.
    pub cleared: bool,
    /// Whether the stage belongs to the Mimisbrunnr world.
    pub mimisbrunnr: bool,
    /// Block of the action.
    pub block_index: u64,
}

/// A consumable crafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationConsumableRow {
    /// Action id.
    pub id: ActionId,
    /// Signer.
    pub agent_address: Address,
    /// Crafting avatar.
    pub avatar_address: Address,
    /// Recipe used.
    pub recipe_id: i32,
    /// Crafting slot.
    pub slot_index: i32,
    /// Block of the action.
    pub block_index: u64,
}

/// An equipment crafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationEquipmentRow {
    /// Action id.
    pub id: ActionId,
    /// Signer.
    pub agent_address: Address,
    /// Crafting avatar.
    pub avatar_address: Address,
    /// Recipe used.
    pub recipe_id: i32,
    /// Crafting slot.
    pub slot_index: i32,
    /// Sub-recipe used, 0 when none.
    pub sub_recipe_id: i32,
    /// Block of the action.
    pub block_index: u64,
}

/// An equipment upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEnhancementRow {
    /// Action id.
    pub id: ActionId,
    /// Signer.
    pub agent_address: Address,
    /// Upgrading avatar.
    pub avatar_address: Address,
    /// Upgraded gear.
    pub item_id: ItemId,
    /// Consumed gear.
    pub material_id: ItemId,
    /// Crafting slot.
    pub slot_index: i32,
    /// Block of the action.
    pub block_index: u64,
}

/// Columns shared by every shop-history shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopTrade {
    /// Filled order.
    pub order_id: OrderId,
    /// Block of the purchase.
    pub block_index: u64,
    /// Item id (non-fungible id, or fungible digest for materials).
    pub item_id: String,
    /// Seller avatar.
    pub seller_avatar_address: Address,
    /// Buyer avatar.
    pub buyer_avatar_address: Address,
    /// Price in major currency units.
    pub price: Decimal,
    /// Top-level item category.
    pub item_type: ItemType,
    /// Item sub-type.
    pub item_sub_type: ItemSubType,
    /// Item sheet id.
    pub id: i32,
    /// Rarity grade.
    pub grade: i32,
    /// Element.
    pub elemental_type: ElementalType,
    /// Units sold.
    pub item_count: i32,
    /// Block time of the purchase.
    pub timestamp: DateTime<Utc>,
}

/// A purchased piece of gear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopHistoryEquipmentRow {
    /// Shared trade columns.
    pub trade: ShopTrade,
    /// Number of buff skills.
    pub buff_skill_count: u32,
    /// Set bonus id.
    pub set_id: i32,
    /// Number of attack skills.
    pub skills_count: u32,
    /// Client resource path.
    pub spine_resource_path: String,
    /// Block before which the item cannot be used.
    pub required_block_index: u64,
    /// Non-fungible id.
    pub non_fungible_id: ItemId,
    /// Tradable id.
    pub tradable_id: TradableId,
    /// Unique stat of the gear.
    pub unique_stat_type: StatType,
}

/// A purchased costume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopHistoryCostumeRow {
    /// Shared trade columns.
    pub trade: ShopTrade,
    /// Whether the costume was worn when sold.
    pub equipped: bool,
    /// Client resource path.
    pub spine_resource_path: String,
    /// Block before which the item cannot be used.
    pub required_block_index: u64,
    /// Non-fungible id.
    pub non_fungible_id: ItemId,
    /// Tradable id.
    pub tradable_id: TradableId,
}

/// A purchased material stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopHistoryMaterialRow {
    /// Shared trade columns.
    pub trade: ShopTrade,
}

/// A purchased consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopHistoryConsumableRow {
    /// Shared trade columns.
    pub trade: ShopTrade,
    /// Number of buff skills.
    pub buff_skill_count: u32,
    /// Number of attack skills.
    pub skills_count: u32,
    /// Block before which the item cannot be used.
    pub required_block_index: u64,
    /// Non-fungible id.
    pub non_fungible_id: ItemId,
    /// Tradable id.
    pub tradable_id: TradableId,
    /// Primary stat.
    pub main_stat: StatType,
}

/// The current state of one piece of gear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRow {
    /// Non-fungible id.
    pub item_id: ItemId,
    /// Owning account.
    pub agent_address: Address,
    /// Owning avatar.
    pub avatar_address: Address,
    /// Item sheet id.
    pub equipment_id: i32,
    /// Combat power of the item alone.
    pub cp: i32,
    /// Enhancement level.
    pub level: i32,
    /// Gear slot.
    pub item_sub_type: ItemSubType,
}

/// A stake change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRow {
    /// Action id.
    pub id: ActionId,
    /// Block of the action.
    pub block_index: u64,
    /// Signer.
    pub agent_address: Address,
    /// Staked balance before the action.
    pub previous_amount: Decimal,
    /// Staked balance after the action.
    pub new_amount: Decimal,
    /// Unstaked gold left on the account.
    pub remaining_ncg: Decimal,
    /// Start block of the replaced stake, 0 if none.
    pub prev_stake_start_block_index: u64,
    /// Start block of the resulting stake.
    pub new_stake_start_block_index: u64,
    /// Block time of the action.
    pub timestamp: DateTime<Utc>,
}

/// A stake reward claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimStakeRewardRow {
    /// Action id.
    pub id: ActionId,
    /// Block of the action.
    pub block_index: u64,
    /// Signer.
    pub agent_address: Address,
    /// Avatar receiving the rewards.
    pub claim_reward_avatar_address: Address,
    /// Hourglasses granted.
    pub hourglass_count: i64,
    /// AP potions granted.
    pub ap_potion_count: i64,
    /// Start block of the stake.
    pub claim_stake_start_block_index: u64,
    /// Last claim block before this claim.
    pub claim_stake_end_block_index: u64,
    /// Block time of the action.
    pub timestamp: DateTime<Utc>,
}

/// A monster collection migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateMonsterCollectionRow {
    /// Action id.
    pub id: ActionId,
    /// Block of the action.
    pub block_index: u64,
    /// Signer.
    pub agent_address: Address,
    /// Deposit moved into the stake, in major units.
    pub migration_amount: Decimal,
    /// Block of the migration.
    pub migration_start_block_index: u64,
    /// Start block of the resulting stake.
    pub stake_start_block_index: u64,
    /// Block time of the action.
    pub timestamp: DateTime<Utc>,
}

/// Any output row.
///
/// The wide shop-history shapes are boxed to keep the enum small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Signer account.
    Agent(AgentRow),
    /// Avatar profile.
    Avatar(AvatarRow),
    /// Stage battle.
    HackAndSlash(HackAndSlashRow),
    /// Consumable crafting.
    CombinationConsumable(CombinationConsumableRow),
    /// Equipment crafting.
    CombinationEquipment(CombinationEquipmentRow),
    /// Equipment upgrade.
    ItemEnhancement(ItemEnhancementRow),
    /// Gear purchase.
    ShopHistoryEquipment(Box<ShopHistoryEquipmentRow>),
    /// Costume purchase.
    ShopHistoryCostume(Box<ShopHistoryCostumeRow>),
    /// Material purchase.
    ShopHistoryMaterial(ShopHistoryMaterialRow),
    /// Consumable purchase.
    ShopHistoryConsumable(Box<ShopHistoryConsumableRow>),
    /// Gear snapshot.
    Equipment(EquipmentRow),
    /// Stake change.
    Stake(StakeRow),
    /// Stake reward claim.
    ClaimStakeReward(ClaimStakeRewardRow),
    /// Monster collection migration.
    MigrateMonsterCollection(MigrateMonsterCollectionRow),
}

impl Record {
    /// The table this row belongs to.
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Agent(_) => RecordKind::Agent,
            Self::Avatar(_) => RecordKind::Avatar,
            Self::HackAndSlash(_) => RecordKind::HackAndSlash,
            Self::CombinationConsumable(_) => RecordKind::CombinationConsumable,
            Self::CombinationEquipment(_) => RecordKind::CombinationEquipment,
            Self::ItemEnhancement(_) => RecordKind::ItemEnhancement,
            Self::ShopHistoryEquipment(_) => RecordKind::ShopHistoryEquipment,
            Self::ShopHistoryCostume(_) => RecordKind::ShopHistoryCostume,
            Self::ShopHistoryMaterial(_) => RecordKind::ShopHistoryMaterial,
            Self::ShopHistoryConsumable(_) => RecordKind::ShopHistoryConsumable,
            Self::Equipment(_) => RecordKind::Equipment,
            Self::Stake(_) => RecordKind::Stake,
            Self::ClaimStakeReward(_) => RecordKind::ClaimStakeReward,
            Self::MigrateMonsterCollection(_) => RecordKind::MigrateMonsterCollection,
        }
    }

    /// Natural key of the row.
    pub fn key(&self) -> String {
        match self {
            Self::Agent(r) => r.address.to_hex(),
            Self::Avatar(r) => r.address.to_hex(),
            Self::HackAndSlash(r) => r.id.to_string(),
            Self::CombinationConsumable(r) => r.id.to_string(),
            Self::CombinationEquipment(r) => r.id.to_string(),
            Self::ItemEnhancement(r) => r.id.to_string(),
            Self::ShopHistoryEquipment(r) => r.trade.order_id.to_string(),
            Self::ShopHistoryCostume(r) => r.trade.order_id.to_string(),
            Self::ShopHistoryMaterial(r) => r.trade.order_id.to_string(),
            Self::ShopHistoryConsumable(r) => r.trade.order_id.to_string(),
            Self::Equipment(r) => r.item_id.to_string(),
            Self::Stake(r) => r.id.to_string(),
            Self::ClaimStakeReward(r) => r.id.to_string(),
            Self::MigrateMonsterCollection(r) => r.id.to_string(),
        }
    }
}

/// Delete key for an action record: the action id's text form.
pub fn action_key(id: ActionId) -> String {
    id.to_string()
}
