//! Rule-table ("sheet") rows that parameterize derived values.
//!
//! Only the columns the mirror needs are modelled. Lookup and the
//! missing-row error live in the state crate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::StatType;
use crate::state::StatValue;

/// Base stats of a character and their per-level growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRow {
    /// Character sheet id.
    pub id: i32,
    /// Level 1 hit points.
    pub hp: Decimal,
    /// Level 1 attack.
    pub atk: Decimal,
    /// Level 1 defense.
    pub def: Decimal,
    /// Level 1 critical chance.
    pub cri: Decimal,
    /// Level 1 accuracy.
    pub hit: Decimal,
    /// Level 1 speed.
    pub spd: Decimal,
    /// Hit points gained per level.
    pub lv_hp: Decimal,
    /// Attack gained per level.
    pub lv_atk: Decimal,
    /// Defense gained per level.
    pub lv_def: Decimal,
    /// Critical chance gained per level.
    pub lv_cri: Decimal,
    /// Accuracy gained per level.
    pub lv_hit: Decimal,
    /// Speed gained per level.
    pub lv_spd: Decimal,
}

impl CharacterRow {
    /// Level 1 value and per-level growth for a stat. Stats the character
    /// sheet does not grow are `(0, 0)`.
    pub const fn base_and_growth(&self, stat: StatType) -> (Decimal, Decimal) {
        match stat {
            StatType::Hp => (self.hp, self.lv_hp),
            StatType::Atk => (self.atk, self.lv_atk),
            StatType::Def => (self.def, self.lv_def),
            StatType::Cri => (self.cri, self.lv_cri),
            StatType::Hit => (self.hit, self.lv_hit),
            StatType::Spd => (self.spd, self.lv_spd),
            StatType::Drv | StatType::Drr | StatType::Cdmg => (Decimal::ZERO, Decimal::ZERO),
        }
    }
}

/// A stat granted by a costume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostumeStatRow {
    /// Row id.
    pub id: i32,
    /// Costume sheet id the stat belongs to.
    pub costume_id: i32,
    /// Which stat.
    pub stat_type: StatType,
    /// Flat amount.
    pub stat: Decimal,
}

/// Options a rune grants at one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneOptionInfo {
    /// Flat combat power granted.
    pub cp: i32,
    /// Stats granted.
    #[serde(default)]
    pub stats: Vec<StatValue>,
}

/// Per-level options of one rune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneOptionRow {
    /// Rune sheet id.
    pub rune_id: i32,
    /// Options by rune level.
    pub level_options: BTreeMap<i32, RuneOptionInfo>,
}

/// Rune catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneListRow {
    /// Rune sheet id.
    pub id: i32,
    /// Rarity grade.
    pub grade: i32,
    /// Weight of this rune's level in the total rune level.
    pub bonus_coef: i32,
}

/// Bonus granted once the weighted total rune level reaches a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneLevelBonusRow {
    /// Row id.
    pub id: i32,
    /// Weighted total rune level required.
    pub rune_level: i32,
    /// Bonus in thousandths of a percent of base stats.
    pub bonus: i32,
}

/// How a collection modifier applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierOperation {
    /// Add the value to the stat.
    Add,
    /// Add the given percent of the stat.
    Percentage,
}

/// A collection stat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    /// Which stat.
    pub stat_type: StatType,
    /// How the value applies.
    pub operation: ModifierOperation,
    /// Amount or percent.
    pub value: Decimal,
}

/// Modifiers granted by a completed collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRow {
    /// Collection id.
    pub id: i32,
    /// Modifiers granted.
    pub modifiers: Vec<StatModifier>,
}

/// A percentage-based stake reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRegularReward {
    /// Rewarded item sheet id.
    pub item_id: i32,
    /// Currency units staked per rewarded item.
    pub rate: Decimal,
}

/// A stake tier with percentage-based rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRegularRewardRow {
    /// Tier level.
    pub level: i32,
    /// Minimum stake, in major currency units.
    pub required_gold: i64,
    /// Rewards of this tier.
    pub rewards: Vec<StakeRegularReward>,
}

/// A fixed-quantity stake reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeFixedReward {
    /// Rewarded item sheet id.
    pub item_id: i32,
    /// Items granted per accrual period.
    pub count: i32,
}

/// A stake tier with fixed-quantity rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeFixedRewardRow {
    /// Tier level.
    pub level: i32,
    /// Minimum stake, in major currency units.
    pub required_gold: i64,
    /// Rewards of this tier.
    pub rewards: Vec<StakeFixedReward>,
}
