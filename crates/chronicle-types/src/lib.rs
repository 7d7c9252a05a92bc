//! Shared type definitions for the Chronicle chain-history mirror.
//!
//! This crate holds every type that crosses a crate boundary:
//!
//! - [`ids`] -- Typed identifiers and the 20-byte [`Address`]
//! - [`enums`] -- Item taxonomy, tracked action kinds, output record kinds
//! - [`state`] -- Decoded chain-state records read by the extractors
//! - [`sheets`] -- Rule-table rows that parameterize derived values
//! - [`actions`] -- Decoded action payloads
//! - [`records`] -- Output rows and the [`Record`] wrapper

pub mod actions;
pub mod enums;
pub mod ids;
pub mod records;
pub mod sheets;
pub mod state;

pub use actions::{ActionPayload, PurchaseInfo};
pub use enums::{
    ActionKind, DedupPolicy, ElementalType, ItemSubType, ItemType, RecordKind, StatType,
};
pub use ids::{ActionId, Address, AddressParseError, ItemId, OrderId, TradableId};
pub use records::{
    AgentRow, AvatarRow, ClaimStakeRewardRow, CombinationConsumableRow,
    CombinationEquipmentRow, EquipmentRow, HackAndSlashRow, ItemEnhancementRow,
    MigrateMonsterCollectionRow, Record, ShopHistoryConsumableRow, ShopHistoryCostumeRow,
    ShopHistoryEquipmentRow, ShopHistoryMaterialRow, ShopTrade, StakeRow,
};
pub use state::{
    AgentState, AvatarState, CollectionState, CombinationSlotState, Consumable, Costume,
    Currency, Equipment, Inventory, ItemSlotState, Material, MonsterCollectionState, Order,
    OrderKind, RuneState, StakeState, StatValue, TradableItem,
};
