//! Enumeration types shared across the pipeline.
//!
//! Item classification mirrors the chain's item taxonomy. [`ActionKind`] and
//! [`RecordKind`] describe what the mirror tracks and how each output table
//! deduplicates within a flush cycle.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Item taxonomy
// ---------------------------------------------------------------------------

/// Top-level item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Single-use items (food).
    Consumable,
    /// Cosmetic items, some of which grant stats.
    Costume,
    /// Gear that grants stats and skills.
    Equipment,
    /// Crafting materials.
    Material,
}

impl ItemType {
    /// Text form used in the mirror's columns.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consumable => "Consumable",
            Self::Costume => "Costume",
            Self::Equipment => "Equipment",
            Self::Material => "Material",
        }
    }
}

/// Fine-grained item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemSubType {
    /// Consumable food.
    Food,
    /// Full-body costume.
    FullCostume,
    /// Hair costume.
    HairCostume,
    /// Ear costume.
    EarCostume,
    /// Eye costume.
    EyeCostume,
    /// Tail costume.
    TailCostume,
    /// Title shown next to the avatar name.
    Title,
    /// Weapon slot gear.
    Weapon,
    /// Armor slot gear.
    Armor,
    /// Belt slot gear.
    Belt,
    /// Necklace slot gear.
    Necklace,
    /// Ring slot gear.
    Ring,
    /// Material used for equipment crafting.
    EquipmentMaterial,
    /// Material used for food crafting.
    FoodMaterial,
    /// Monster drop.
    MonsterPart,
    /// Generic material.
    NormalMaterial,
    /// Hourglass (speeds up crafting).
    Hourglass,
    /// Action-point stone.
    ApStone,
    /// Chest.
    Chest,
}

impl ItemSubType {
    /// Whether this sub-type is wearable gear that gets an equipment row.
    pub const fn is_gear(self) -> bool {
        matches!(
            self,
            Self::Weapon | Self::Armor | Self::Belt | Self::Necklace | Self::Ring
        )
    }

    /// The top-level [`ItemType`] this sub-type belongs to.
    pub const fn item_type(self) -> ItemType {
        match self {
            Self::Food => ItemType::Consumable,
            Self::FullCostume
            | Self::HairCostume
            | Self::EarCostume
            | Self::EyeCostume
            | Self::TailCostume
            | Self::Title => ItemType::Costume,
            Self::Weapon | Self::Armor | Self::Belt | Self::Necklace | Self::Ring => {
                ItemType::Equipment
            }
            Self::EquipmentMaterial
            | Self::FoodMaterial
            | Self::MonsterPart
            | Self::NormalMaterial
            | Self::Hourglass
            | Self::ApStone
            | Self::Chest => ItemType::Material,
        }
    }

    /// Text form used in the mirror's columns.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::FullCostume => "FullCostume",
            Self::HairCostume => "HairCostume",
            Self::EarCostume => "EarCostume",
            Self::EyeCostume => "EyeCostume",
            Self::TailCostume => "TailCostume",
            Self::Title => "Title",
            Self::Weapon => "Weapon",
            Self::Armor => "Armor",
            Self::Belt => "Belt",
            Self::Necklace => "Necklace",
            Self::Ring => "Ring",
            Self::EquipmentMaterial => "EquipmentMaterial",
            Self::FoodMaterial => "FoodMaterial",
            Self::MonsterPart => "MonsterPart",
            Self::NormalMaterial => "NormalMaterial",
            Self::Hourglass => "Hourglass",
            Self::ApStone => "ApStone",
            Self::Chest => "Chest",
        }
    }
}

/// Elemental affinity of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementalType {
    /// No element.
    Normal,
    /// Fire.
    Fire,
    /// Water.
    Water,
    /// Land.
    Land,
    /// Wind.
    Wind,
}

impl ElementalType {
    /// Text form used in the mirror's columns.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Land => "Land",
            Self::Wind => "Wind",
        }
    }
}

/// A character statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatType {
    /// Hit points.
    Hp,
    /// Attack.
    Atk,
    /// Defense.
    Def,
    /// Critical chance.
    Cri,
    /// Accuracy.
    Hit,
    /// Speed.
    Spd,
    /// Damage reduction (flat).
    Drv,
    /// Damage reduction (rate).
    Drr,
    /// Critical damage.
    Cdmg,
}

impl StatType {
    /// Every stat, in a fixed order.
    pub const ALL: [Self; 9] = [
        Self::Hp,
        Self::Atk,
        Self::Def,
        Self::Cri,
        Self::Hit,
        Self::Spd,
        Self::Drv,
        Self::Drr,
        Self::Cdmg,
    ];

    /// Text form used in the mirror's columns.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hp => "HP",
            Self::Atk => "ATK",
            Self::Def => "DEF",
            Self::Cri => "CRI",
            Self::Hit => "HIT",
            Self::Spd => "SPD",
            Self::Drv => "DRV",
            Self::Drr => "DRR",
            Self::Cdmg => "CDMG",
        }
    }
}

// ---------------------------------------------------------------------------
// Tracked actions and output kinds
// ---------------------------------------------------------------------------

/// Action kinds the mirror tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Stage battle.
    HackAndSlash,
    /// Arena battle (profile refresh only).
    RankingBattle,
    /// Consumable crafting.
    CombinationConsumable,
    /// Equipment crafting.
    CombinationEquipment,
    /// Equipment upgrade.
    ItemEnhancement,
    /// Shop purchase.
    Buy,
    /// Stake deposit or change.
    Stake,
    /// Stake reward claim.
    ClaimStakeReward,
    /// Monster collection to stake migration.
    MigrateMonsterCollection,
}

impl ActionKind {
    /// The record kind holding this action's own row, keyed by action id.
    ///
    /// `None` for kinds whose stored facts are keyed differently (ranking
    /// battles store no action row, purchases store shop history by order).
    pub const fn action_record_kind(self) -> Option<RecordKind> {
        match self {
            Self::HackAndSlash => Some(RecordKind::HackAndSlash),
            Self::CombinationConsumable => Some(RecordKind::CombinationConsumable),
            Self::CombinationEquipment => Some(RecordKind::CombinationEquipment),
            Self::ItemEnhancement => Some(RecordKind::ItemEnhancement),
            Self::Stake => Some(RecordKind::Stake),
            Self::ClaimStakeReward => Some(RecordKind::ClaimStakeReward),
            Self::MigrateMonsterCollection => Some(RecordKind::MigrateMonsterCollection),
            Self::RankingBattle | Self::Buy => None,
        }
    }

    /// Text form used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HackAndSlash => "hack_and_slash",
            Self::RankingBattle => "ranking_battle",
            Self::CombinationConsumable => "combination_consumable",
            Self::CombinationEquipment => "combination_equipment",
            Self::ItemEnhancement => "item_enhancement",
            Self::Buy => "buy",
            Self::Stake => "stake",
            Self::ClaimStakeReward => "claim_stake_reward",
            Self::MigrateMonsterCollection => "migrate_monster_collection",
        }
    }
}

/// How duplicate keys collapse within one flush cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupPolicy {
    /// The most recently added record replaces earlier ones (upserted rows).
    LastWins,
    /// The first record is kept and later duplicates are dropped
    /// (append-only rows, where duplicates only come from re-delivery).
    FirstWins,
}

/// Output table kinds.
///
/// Declaration order is the flush order: agents first, then avatars, then
/// everything that references them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Signer accounts.
    Agent,
    /// Avatar profiles.
    Avatar,
    /// Stage battle records.
    HackAndSlash,
    /// Consumable crafting records.
    CombinationConsumable,
    /// Equipment crafting records.
    CombinationEquipment,
    /// Equipment upgrade records.
    ItemEnhancement,
    /// Equipment purchases.
    ShopHistoryEquipment,
    /// Costume purchases.
    ShopHistoryCostume,
    /// Material purchases.
    ShopHistoryMaterial,
    /// Consumable purchases.
    ShopHistoryConsumable,
    /// Current equipment snapshots.
    Equipment,
    /// Stake records.
    Stake,
    /// Stake reward claims.
    ClaimStakeReward,
    /// Monster collection migrations.
    MigrateMonsterCollection,
}

impl RecordKind {
    /// Every record kind in flush order.
    pub const ALL: [Self; 14] = [
        Self::Agent,
        Self::Avatar,
        Self::HackAndSlash,
        Self::CombinationConsumable,
        Self::CombinationEquipment,
        Self::ItemEnhancement,
        Self::ShopHistoryEquipment,
        Self::ShopHistoryCostume,
        Self::ShopHistoryMaterial,
        Self::ShopHistoryConsumable,
        Self::Equipment,
        Self::Stake,
        Self::ClaimStakeReward,
        Self::MigrateMonsterCollection,
    ];

    /// Dedup policy for this kind.
    pub const fn dedup_policy(self) -> DedupPolicy {
        match self {
            Self::Agent | Self::Avatar | Self::Equipment => DedupPolicy::LastWins,
            _ => DedupPolicy::FirstWins,
        }
    }

    /// Whether rows of this kind may be deleted by key.
    pub const fn supports_delete(self) -> bool {
        matches!(
            self,
            Self::HackAndSlash
                | Self::CombinationConsumable
                | Self::CombinationEquipment
                | Self::ItemEnhancement
                | Self::Equipment
                | Self::Stake
                | Self::ClaimStakeReward
                | Self::MigrateMonsterCollection
        )
    }

    /// Whether rows of this kind reference agents and avatars that must be
    /// written before them.
    pub const fn is_parent(self) -> bool {
        matches!(self, Self::Agent | Self::Avatar)
    }

    /// Mirror table name.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Agent => "agents",
            Self::Avatar => "avatars",
            Self::HackAndSlash => "hack_and_slashes",
            Self::CombinationConsumable => "combination_consumables",
            Self::CombinationEquipment => "combination_equipments",
            Self::ItemEnhancement => "item_enhancements",
            Self::ShopHistoryEquipment => "shop_history_equipments",
            Self::ShopHistoryCostume => "shop_history_costumes",
            Self::ShopHistoryMaterial => "shop_history_materials",
            Self::ShopHistoryConsumable => "shop_history_consumables",
            Self::Equipment => "equipments",
            Self::Stake => "stakings",
            Self::ClaimStakeReward => "claim_stake_rewards",
            Self::MigrateMonsterCollection => "migrate_monster_collections",
        }
    }
}

impl core::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gear_sub_types_are_equipment() {
        for sub in [
            ItemSubType::Weapon,
            ItemSubType::Armor,
            ItemSubType::Belt,
            ItemSubType::Necklace,
            ItemSubType::Ring,
        ] {
            assert!(sub.is_gear());
            assert_eq!(sub.item_type(), ItemType::Equipment);
        }
        assert!(!ItemSubType::Title.is_gear());
        assert!(!ItemSubType::Hourglass.is_gear());
    }

    #[test]
    fn record_kinds_sorted_in_flush_order() {
        let mut sorted = RecordKind::ALL;
        sorted.sort();
        assert_eq!(sorted, RecordKind::ALL);
        assert_eq!(RecordKind::ALL.first(), Some(&RecordKind::Agent));
    }

    #[test]
    fn upsert_kinds_are_last_wins() {
        assert_eq!(RecordKind::Avatar.dedup_policy(), DedupPolicy::LastWins);
        assert_eq!(RecordKind::Equipment.dedup_policy(), DedupPolicy::LastWins);
        assert_eq!(
            RecordKind::HackAndSlash.dedup_policy(),
            DedupPolicy::FirstWins
        );
        assert_eq!(
            RecordKind::ShopHistoryMaterial.dedup_policy(),
            DedupPolicy::FirstWins
        );
    }

    #[test]
    fn shop_history_and_profiles_cannot_be_deleted() {
        assert!(!RecordKind::Agent.supports_delete());
        assert!(!RecordKind::Avatar.supports_delete());
        assert!(!RecordKind::ShopHistoryEquipment.supports_delete());
        assert!(RecordKind::Equipment.supports_delete());
    }

    #[test]
    fn action_record_kinds() {
        assert_eq!(
            ActionKind::ItemEnhancement.action_record_kind(),
            Some(RecordKind::ItemEnhancement)
        );
        assert_eq!(ActionKind::Buy.action_record_kind(), None);
        assert_eq!(ActionKind::RankingBattle.action_record_kind(), None);
    }
}
