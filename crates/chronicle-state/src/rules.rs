//! Rule tables and their lookups.
//!
//! A missing row is a [`StateError::MissingRuleData`], which skips the
//! single event being processed. The fixed stake reward table is optional
//! on chain, so its absence is not an error.

use std::collections::BTreeMap;

use chronicle_types::sheets::{
    CharacterRow, CollectionRow, CostumeStatRow, RuneLevelBonusRow, RuneListRow,
    RuneOptionInfo, RuneOptionRow, StakeFixedRewardRow, StakeRegularRewardRow,
};
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Sheet name used in errors for the character table.
pub const CHARACTER_SHEET: &str = "CharacterSheet";
/// Sheet name used in errors for the rune option table.
pub const RUNE_OPTION_SHEET: &str = "RuneOptionSheet";
/// Sheet name used in errors for the rune list table.
pub const RUNE_LIST_SHEET: &str = "RuneListSheet";
/// Sheet name used in errors for the collection table.
pub const COLLECTION_SHEET: &str = "CollectionSheet";
/// Sheet name used in errors for the regular stake reward table.
pub const STAKE_REGULAR_REWARD_SHEET: &str = "StakeRegularRewardSheet";

/// Every rule table the extractors consult.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTables {
    /// Character base stats by character id.
    #[serde(default)]
    pub character: BTreeMap<i32, CharacterRow>,
    /// Costume stats (several rows per costume).
    #[serde(default)]
    pub costume_stat: Vec<CostumeStatRow>,
    /// Rune options by rune id.
    #[serde(default)]
    pub rune_option: BTreeMap<i32, RuneOptionRow>,
    /// Rune catalogue by rune id.
    #[serde(default)]
    pub rune_list: BTreeMap<i32, RuneListRow>,
    /// Rune level bonus thresholds.
    #[serde(default)]
    pub rune_level_bonus: Vec<RuneLevelBonusRow>,
    /// Collection modifiers by collection id.
    #[serde(default)]
    pub collection: BTreeMap<i32, CollectionRow>,
    /// Percentage-based stake reward tiers.
    #[serde(default)]
    pub stake_regular_reward: Vec<StakeRegularRewardRow>,
    /// Fixed-quantity stake reward tiers, when the chain carries them.
    #[serde(default)]
    pub stake_fixed_reward: Option<Vec<StakeFixedRewardRow>>,
}

impl RuleTables {
    /// Character row by id.
    pub fn character(&self, id: i32) -> Result<&CharacterRow, StateError> {
        self.character
            .get(&id)
            .ok_or_else(|| StateError::missing_rule(CHARACTER_SHEET, id))
    }

    /// All stat rows of one costume. Costumes without stats yield nothing.
    pub fn costume_stats(&self, costume_id: i32) -> impl Iterator<Item = &CostumeStatRow> {
        self.costume_stat
            .iter()
            .filter(move |row| row.costume_id == costume_id)
    }

    /// Options of a rune at a given level.
    pub fn rune_option(&self, rune_id: i32, level: i32) -> Result<&RuneOptionInfo, StateError> {
        self.rune_option
            .get(&rune_id)
            .and_then(|row| row.level_options.get(&level))
            .ok_or_else(|| {
                StateError::missing_rule(RUNE_OPTION_SHEET, format!("rune {rune_id} level {level}"))
            })
    }

    /// Rune catalogue row.
    pub fn rune_list(&self, rune_id: i32) -> Result<&RuneListRow, StateError> {
        self.rune_list
            .get(&rune_id)
            .ok_or_else(|| StateError::missing_rule(RUNE_LIST_SHEET, rune_id))
    }

    /// Collection row.
    pub fn collection(&self, id: i32) -> Result<&CollectionRow, StateError> {
        self.collection
            .get(&id)
            .ok_or_else(|| StateError::missing_rule(COLLECTION_SHEET, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::StatType;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_character_is_rule_error() {
        let tables = RuleTables::default();
        assert_eq!(
            tables.character(100_010),
            Err(StateError::missing_rule(CHARACTER_SHEET, 100_010))
        );
    }

    #[test]
    fn rune_option_requires_level_row() {
        let mut tables = RuleTables::default();
        tables.rune_option.insert(
            10_001,
            RuneOptionRow {
                rune_id: 10_001,
                level_options: BTreeMap::from([(1, RuneOptionInfo::default())]),
            },
        );
        assert!(tables.rune_option(10_001, 1).is_ok());
        assert!(matches!(
            tables.rune_option(10_001, 2),
            Err(StateError::MissingRuleData { sheet: RUNE_OPTION_SHEET, .. })
        ));
        assert!(tables.rune_option(99, 1).is_err());
    }

    #[test]
    fn costume_stats_filters_by_costume() {
        let tables = RuleTables {
            costume_stat: vec![
                CostumeStatRow {
                    id: 1,
                    costume_id: 40_100_000,
                    stat_type: StatType::Atk,
                    stat: dec!(30),
                },
                CostumeStatRow {
                    id: 2,
                    costume_id: 49_900_001,
                    stat_type: StatType::Hp,
                    stat: dec!(100),
                },
            ],
            ..RuleTables::default()
        };
        let stats: Vec<_> = tables.costume_stats(40_100_000).collect();
        assert_eq!(stats.len(), 1);
        assert_eq!(tables.costume_stats(1).count(), 0);
    }
}
