//! Combat power.
//!
//! Stats are assembled in a fixed order:
//!
//! 1. Character stats at the avatar's level: `base + growth * (level - 1)`.
//! 2. Flat additions from equipped gear, equipped costumes and rune options.
//! 3. Rune level bonus: `level_stat * bonus / 100_000` per stat.
//! 4. Collection modifiers. `Add` adds its value and `Percentage` adds a
//!    percent of the stat as it stood after step 3.
//!
//! The combat power of the assembled stats is the weighted sum of
//! [`stat_cp`], scaled by [`skill_multiplier`] of the equipped skill count,
//! plus the flat combat power of every rune option, truncated toward zero.

use std::collections::BTreeMap;

use chronicle_types::sheets::{
    CharacterRow, ModifierOperation, RuneLevelBonusRow, RuneOptionInfo, StatModifier,
};
use chronicle_types::{Equipment, StatType, StatValue};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::CalcError;

/// Divisor applied to the rune level bonus.
pub const RUNE_BONUS_DIVISOR: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Stat totals keyed by stat.
pub type StatTotals = BTreeMap<StatType, Decimal>;

/// Everything that feeds an avatar's combat power.
#[derive(Debug, Clone, Copy)]
pub struct CpInputs<'a> {
    /// Avatar level.
    pub level: i32,
    /// Character row of the avatar.
    pub character: &'a CharacterRow,
    /// Equipped gear.
    pub equipments: &'a [&'a Equipment],
    /// Stats of equipped costumes.
    pub costume_stats: &'a [StatValue],
    /// Options of every held rune at its level.
    pub rune_options: &'a [&'a RuneOptionInfo],
    /// Modifiers of completed collections.
    pub collection_modifiers: &'a [StatModifier],
    /// Rune level bonus from the rune level bonus table.
    pub rune_level_bonus: i32,
}

/// Combat power weight of one stat point.
///
/// Critical chance scales with the character level. Stats outside the six
/// primary ones carry no weight.
pub fn stat_cp(stat: StatType, value: Decimal, level: i32) -> Decimal {
    let weight = match stat {
        StatType::Hp => Decimal::new(7, 1),
        StatType::Atk | StatType::Def => Decimal::new(105, 1),
        StatType::Cri => Decimal::from(20_i64.saturating_mul(i64::from(level))),
        StatType::Hit => Decimal::new(23, 1),
        StatType::Spd => Decimal::from(4),
        StatType::Drv | StatType::Drr | StatType::Cdmg => Decimal::ZERO,
    };
    value.saturating_mul(weight)
}

/// Multiplier for the number of skills on the equipped gear.
pub const fn skill_multiplier(skill_count: u32) -> Decimal {
    match skill_count {
        0 => Decimal::ONE,
        1 => Decimal::from_parts(115, 0, 0, false, 2),
        _ => Decimal::from_parts(135, 0, 0, false, 2),
    }
}

/// Character stats at a level.
pub fn level_stats(character: &CharacterRow, level: i32) -> Result<StatTotals, CalcError> {
    let steps = Decimal::from(level.saturating_sub(1).max(0));
    let mut totals = StatTotals::new();
    for stat in StatType::ALL {
        let (base, growth) = character.base_and_growth(stat);
        let value = growth
            .checked_mul(steps)
            .and_then(|g| base.checked_add(g))
            .ok_or(CalcError::Overflow("level stats"))?;
        totals.insert(stat, value);
    }
    Ok(totals)
}

fn add_stats<'s>(
    totals: &mut StatTotals,
    stats: impl IntoIterator<Item = &'s StatValue>,
) -> Result<(), CalcError> {
    for stat in stats {
        let entry = totals.entry(stat.stat_type).or_insert(Decimal::ZERO);
        *entry = entry
            .checked_add(stat.value)
            .ok_or(CalcError::Overflow("stat addition"))?;
    }
    Ok(())
}

/// Final stats of an avatar after every bonus.
pub fn total_stats(inputs: &CpInputs<'_>) -> Result<StatTotals, CalcError> {
    let base = level_stats(inputs.character, inputs.level)?;
    let mut totals = base.clone();

    add_stats(
        &mut totals,
        inputs.equipments.iter().flat_map(|e| e.stats.iter()),
    )?;
    add_stats(&mut totals, inputs.costume_stats)?;
    add_stats(
        &mut totals,
        inputs.rune_options.iter().flat_map(|r| r.stats.iter()),
    )?;

    if inputs.rune_level_bonus != 0 {
        let bonus = Decimal::from(inputs.rune_level_bonus);
        for (stat, value) in &base {
            let extra = value
                .checked_mul(bonus)
                .and_then(|v| v.checked_div(RUNE_BONUS_DIVISOR))
                .ok_or(CalcError::Overflow("rune level bonus"))?;
            let entry = totals.entry(*stat).or_insert(Decimal::ZERO);
            *entry = entry
                .checked_add(extra)
                .ok_or(CalcError::Overflow("rune level bonus"))?;
        }
    }

    let before_collection = totals.clone();
    for modifier in inputs.collection_modifiers {
        let delta = match modifier.operation {
            ModifierOperation::Add => modifier.value,
            ModifierOperation::Percentage => before_collection
                .get(&modifier.stat_type)
                .copied()
                .unwrap_or(Decimal::ZERO)
                .checked_mul(modifier.value)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(CalcError::Overflow("collection modifier"))?,
        };
        let entry = totals.entry(modifier.stat_type).or_insert(Decimal::ZERO);
        *entry = entry
            .checked_add(delta)
            .ok_or(CalcError::Overflow("collection modifier"))?;
    }

    Ok(totals)
}

/// Weighted combat power of a stat block.
pub fn stats_cp(totals: &StatTotals, level: i32) -> Result<Decimal, CalcError> {
    totals.iter().try_fold(Decimal::ZERO, |acc, (stat, value)| {
        acc.checked_add(stat_cp(*stat, *value, level))
            .ok_or(CalcError::Overflow("stat combat power"))
    })
}

fn truncate_cp(value: Decimal) -> Result<i32, CalcError> {
    value
        .trunc()
        .to_i32()
        .ok_or(CalcError::Overflow("combat power"))
}

/// Aggregate combat power of an avatar.
pub fn total_cp(inputs: &CpInputs<'_>) -> Result<i32, CalcError> {
    let totals = total_stats(inputs)?;
    let skills = inputs.equipments.iter().fold(0_u32, |acc, e| {
        acc.saturating_add(e.skill_count)
            .saturating_add(e.buff_skill_count)
    });
    let rune_cp = inputs
        .rune_options
        .iter()
        .fold(0_i64, |acc, r| acc.saturating_add(i64::from(r.cp)));

    let cp = stats_cp(&totals, inputs.level)?
        .checked_mul(skill_multiplier(skills))
        .and_then(|v| v.checked_add(Decimal::from(rune_cp)))
        .ok_or(CalcError::Overflow("combat power"))?;
    truncate_cp(cp)
}

/// Combat power of one piece of gear on its own.
pub fn equipment_cp(equipment: &Equipment) -> Result<i32, CalcError> {
    let mut totals = StatTotals::new();
    add_stats(&mut totals, &equipment.stats)?;
    let skills = equipment
        .skill_count
        .saturating_add(equipment.buff_skill_count);
    let cp = stats_cp(&totals, 1)?
        .checked_mul(skill_multiplier(skills))
        .ok_or(CalcError::Overflow("equipment combat power"))?;
    truncate_cp(cp)
}

/// Weighted total rune level: sum of `bonus_coef * level` over held runes.
pub fn weighted_rune_level(runes: impl IntoIterator<Item = (i32, i32)>) -> i64 {
    runes.into_iter().fold(0_i64, |acc, (coef, level)| {
        acc.saturating_add(i64::from(coef).saturating_mul(i64::from(level)))
    })
}

/// Bonus of the highest threshold row not above the weighted rune level.
pub fn rune_level_bonus(weighted_level: i64, rows: &[RuneLevelBonusRow]) -> i32 {
    rows.iter()
        .filter(|row| i64::from(row.rune_level) <= weighted_level)
        .max_by_key(|row| row.rune_level)
        .map_or(0, |row| row.bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::{ElementalType, ItemId, ItemSubType};
    use rust_decimal_macros::dec;

    fn character() -> CharacterRow {
        CharacterRow {
            id: 100_010,
            hp: dec!(300),
            atk: dec!(20),
            def: dec!(10),
            cri: dec!(0),
            hit: dec!(90),
            spd: dec!(80),
            lv_hp: dec!(10),
            lv_atk: dec!(2),
            lv_def: dec!(1),
            lv_cri: dec!(0),
            lv_hit: dec!(1),
            lv_spd: dec!(0),
        }
    }

    fn sword(atk: Decimal, skills: u32) -> Equipment {
        Equipment {
            item_id: ItemId::new(),
            id: 10_100_000,
            item_sub_type: ItemSubType::Weapon,
            grade: 1,
            elemental_type: ElementalType::Normal,
            level: 0,
            set_id: 1,
            stats: vec![StatValue {
                stat_type: StatType::Atk,
                value: atk,
            }],
            skill_count: skills,
            buff_skill_count: 0,
            spine_resource_path: String::new(),
            required_block_index: 0,
            unique_stat_type: StatType::Atk,
            equipped: true,
        }
    }

    fn inputs<'a>(
        character: &'a CharacterRow,
        level: i32,
        equipments: &'a [&'a Equipment],
    ) -> CpInputs<'a> {
        CpInputs {
            level,
            character,
            equipments,
            costume_stats: &[],
            rune_options: &[],
            collection_modifiers: &[],
            rune_level_bonus: 0,
        }
    }

    #[test]
    fn level_stats_grow_linearly() {
        let stats = level_stats(&character(), 11).ok();
        let hp = stats.as_ref().and_then(|s| s.get(&StatType::Hp)).copied();
        let atk = stats.as_ref().and_then(|s| s.get(&StatType::Atk)).copied();
        assert_eq!(hp, Some(dec!(400)));
        assert_eq!(atk, Some(dec!(40)));
    }

    #[test]
    fn naked_level_one_cp() {
        // 300*0.7 + 20*10.5 + 10*10.5 + 0 + 90*2.3 + 80*4 = 1052
        let row = character();
        assert_eq!(total_cp(&inputs(&row, 1, &[])), Ok(1052));
    }

    #[test]
    fn gear_skills_scale_stat_cp_but_not_rune_cp() {
        let row = character();
        let weapon = sword(dec!(10), 1);
        let rune = RuneOptionInfo {
            cp: 100,
            stats: vec![],
        };
        let gear = [&weapon];
        let runes = [&rune];
        let mut with_all = inputs(&row, 1, &gear);
        with_all.rune_options = &runes;
        // (1052 + 105) * 1.15 + 100 = 1430.55
        assert_eq!(total_cp(&with_all), Ok(1430));
    }

    #[test]
    fn collection_percentage_uses_pre_collection_stat() {
        let row = character();
        let modifiers = [
            StatModifier {
                stat_type: StatType::Atk,
                operation: ModifierOperation::Add,
                value: dec!(10),
            },
            StatModifier {
                stat_type: StatType::Atk,
                operation: ModifierOperation::Percentage,
                value: dec!(50),
            },
        ];
        let mut cp_inputs = inputs(&row, 1, &[]);
        cp_inputs.collection_modifiers = &modifiers;
        let totals = total_stats(&cp_inputs).ok();
        let atk = totals.and_then(|t| t.get(&StatType::Atk).copied());
        // 20 + 10 + 20 * 50%
        assert_eq!(atk, Some(dec!(40)));
    }

    #[test]
    fn rune_level_bonus_applies_to_level_stats_only() {
        let row = character();
        let weapon = sword(dec!(1000), 0);
        let gear = [&weapon];
        let mut cp_inputs = inputs(&row, 1, &gear);
        cp_inputs.rune_level_bonus = 50_000;
        let totals = total_stats(&cp_inputs).ok();
        let atk = totals.and_then(|t| t.get(&StatType::Atk).copied());
        // 20 + 1000 + 20 * 0.5
        assert_eq!(atk, Some(dec!(1030)));
    }

    #[test]
    fn equipment_cp_uses_own_stats_and_skills() {
        assert_eq!(equipment_cp(&sword(dec!(100), 0)), Ok(1050));
        assert_eq!(equipment_cp(&sword(dec!(100), 2)), Ok(1417));
    }

    #[test]
    fn critical_weight_scales_with_level() {
        assert_eq!(stat_cp(StatType::Cri, dec!(2), 5), dec!(200));
        assert_eq!(stat_cp(StatType::Cdmg, dec!(2), 5), Decimal::ZERO);
    }

    #[test]
    fn rune_bonus_picks_highest_reached_threshold() {
        let rows = [
            RuneLevelBonusRow {
                id: 1,
                rune_level: 10,
                bonus: 1_000,
            },
            RuneLevelBonusRow {
                id: 2,
                rune_level: 30,
                bonus: 5_000,
            },
        ];
        let weighted = weighted_rune_level([(1, 5), (2, 10)]);
        assert_eq!(weighted, 25);
        assert_eq!(rune_level_bonus(weighted, &rows), 1_000);
        assert_eq!(rune_level_bonus(30, &rows), 5_000);
        assert_eq!(rune_level_bonus(9, &rows), 0);
    }
}
