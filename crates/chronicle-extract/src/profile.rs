//! Avatar profile rows.
//!
//! [`avatar_row`] is the one place an avatar's combat power is computed.
//! Every extractor that refreshes a profile goes through it, so the
//! per-action path and the full-profile path always agree.

use chrono::{DateTime, Utc};
use chronicle_calc::{CpInputs, rune_level_bonus, total_cp, weighted_rune_level};
use chronicle_state::{RuleTables, StateError, StateReader};
use chronicle_types::sheets::{RuneOptionInfo, StatModifier};
use chronicle_types::{
    AgentRow, AvatarRow, AvatarState, Costume, Equipment, ItemSlotState, ItemSubType, Record,
    StatValue,
};

use crate::context::ApplyContext;
use crate::error::ExtractError;

/// Armor id reported when no armor is equipped.
pub const DEFAULT_ARMOR_ID: i32 = 10_200_000;

/// Gear and costumes an avatar currently wears.
#[derive(Debug, Clone, Default)]
pub struct Loadout<'a> {
    /// Worn gear.
    pub equipments: Vec<&'a Equipment>,
    /// Worn costumes.
    pub costumes: Vec<&'a Costume>,
}

impl<'a> Loadout<'a> {
    /// Resolve what an avatar wears.
    ///
    /// The adventure item slots decide when present; ids that no longer
    /// resolve in the inventory are ignored. Without item slots the
    /// inventory's equip flags decide.
    pub fn resolve(avatar: &'a AvatarState, slots: Option<&ItemSlotState>) -> Self {
        let inventory = &avatar.inventory;
        match slots {
            Some(slots) => Self {
                equipments: slots
                    .equipments
                    .iter()
                    .filter_map(|id| inventory.equipment(*id))
                    .collect(),
                costumes: slots
                    .costumes
                    .iter()
                    .filter_map(|id| inventory.costume(*id))
                    .collect(),
            },
            None => Self {
                equipments: inventory.equipments.iter().filter(|e| e.equipped).collect(),
                costumes: inventory.costumes.iter().filter(|c| c.equipped).collect(),
            },
        }
    }

    /// Sheet id of the worn title.
    pub fn title_id(&self) -> Option<i32> {
        self.costumes
            .iter()
            .find(|c| c.item_sub_type == ItemSubType::Title)
            .map(|c| c.id)
    }

    /// Sheet id of the worn armor, or [`DEFAULT_ARMOR_ID`].
    pub fn armor_id(&self) -> i32 {
        self.equipments
            .iter()
            .find(|e| e.item_sub_type == ItemSubType::Armor)
            .map_or(DEFAULT_ARMOR_ID, |e| e.id)
    }
}

/// Aggregate combat power of an avatar.
pub fn avatar_cp(
    avatar: &AvatarState,
    loadout: &Loadout<'_>,
    state: &dyn StateReader,
    rules: &RuleTables,
) -> Result<i32, ExtractError> {
    let character = rules.character(avatar.character_id)?;

    let costume_stats: Vec<StatValue> = loadout
        .costumes
        .iter()
        .flat_map(|c| rules.costume_stats(c.id))
        .map(|row| StatValue {
            stat_type: row.stat_type,
            value: row.stat,
        })
        .collect();

    let runes = state.runes(&avatar.address);
    let rune_options = runes
        .iter()
        .map(|r| rules.rune_option(r.rune_id, r.level))
        .collect::<Result<Vec<&RuneOptionInfo>, StateError>>()?;
    let bonus = if runes.is_empty() {
        0
    } else {
        let weights = runes
            .iter()
            .map(|r| rules.rune_list(r.rune_id).map(|row| (row.bonus_coef, r.level)))
            .collect::<Result<Vec<_>, StateError>>()?;
        rune_level_bonus(weighted_rune_level(weights), &rules.rune_level_bonus)
    };

    let mut modifiers: Vec<StatModifier> = Vec::new();
    if let Some(collection) = state.collection(&avatar.address) {
        for id in &collection.ids {
            modifiers.extend(rules.collection(*id)?.modifiers.iter().copied());
        }
    }

    let cp = total_cp(&CpInputs {
        level: avatar.level,
        character,
        equipments: &loadout.equipments,
        costume_stats: &costume_stats,
        rune_options: &rune_options,
        collection_modifiers: &modifiers,
        rune_level_bonus: bonus,
    })?;
    Ok(cp)
}

/// Profile row of an avatar as seen in `state`.
pub fn avatar_row(
    avatar: &AvatarState,
    state: &dyn StateReader,
    rules: &RuleTables,
    block_time: DateTime<Utc>,
) -> Result<AvatarRow, ExtractError> {
    let loadout = Loadout::resolve(avatar, state.item_slot(&avatar.address));
    let cp = avatar_cp(avatar, &loadout, state, rules)?;
    Ok(AvatarRow {
        address: avatar.address,
        agent_address: avatar.agent_address,
        name: avatar.name.clone(),
        avatar_level: avatar.level,
        title_id: loadout.title_id(),
        armor_id: loadout.armor_id(),
        cp,
        timestamp: block_time,
    })
}

/// Account and avatar rows for an avatar.
pub fn profile_records(
    avatar: &AvatarState,
    state: &dyn StateReader,
    rules: &RuleTables,
    block_time: DateTime<Utc>,
) -> Result<Vec<Record>, ExtractError> {
    let row = avatar_row(avatar, state, rules, block_time)?;
    Ok(vec![
        Record::Agent(AgentRow {
            address: avatar.agent_address,
        }),
        Record::Avatar(row),
    ])
}

/// Profile rows for `avatar` as it stands after an apply, plus the signer's
/// account row when the signer is not the avatar's owner.
///
/// Action rows reference the signer, so its account must be written in the
/// same flush even when it owns no avatar.
pub fn signed_profile_records(
    ctx: &ApplyContext<'_>,
    avatar: &AvatarState,
) -> Result<Vec<Record>, ExtractError> {
    let mut records = profile_records(avatar, ctx.output, ctx.rules(), ctx.block_time)?;
    if avatar.agent_address != ctx.signer {
        records.insert(0, ctx.signer_record());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chronicle_state::WorldSnapshot;
    use chronicle_types::sheets::{CollectionRow, ModifierOperation, RuneLevelBonusRow, RuneListRow, RuneOptionRow};
    use chronicle_types::{CollectionState, ItemId, RuneState, StatType};
    use rust_decimal_macros::dec;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn item_slots_take_precedence_over_equip_flags() {
        let mut avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let flagged = fixtures::armor(dec!(10), true);
        let slotted = fixtures::armor(dec!(20), false);
        avatar.inventory.equipments = vec![flagged.clone(), slotted.clone()];

        let by_flag = Loadout::resolve(&avatar, None);
        assert_eq!(by_flag.equipments.len(), 1);
        assert_eq!(by_flag.equipments.first().map(|e| e.item_id), Some(flagged.item_id));

        let slots = ItemSlotState {
            equipments: vec![slotted.item_id, ItemId::new()],
            costumes: vec![],
        };
        let by_slot = Loadout::resolve(&avatar, Some(&slots));
        assert_eq!(by_slot.equipments.len(), 1);
        assert_eq!(by_slot.equipments.first().map(|e| e.item_id), Some(slotted.item_id));
    }

    #[test]
    fn armor_and_title_ids() {
        let mut avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        assert_eq!(Loadout::resolve(&avatar, None).armor_id(), DEFAULT_ARMOR_ID);

        avatar.inventory.equipments = vec![fixtures::armor(dec!(5), true)];
        avatar.inventory.costumes = vec![fixtures::title(49_900_001, true)];
        let loadout = Loadout::resolve(&avatar, None);
        assert_eq!(loadout.armor_id(), fixtures::ARMOR_SHEET_ID);
        assert_eq!(loadout.title_id(), Some(49_900_001));
    }

    #[test]
    fn profile_row_carries_cp_and_block_time() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let snapshot = WorldSnapshot::new()
            .with_avatar(avatar.clone())
            .with_rules(fixtures::rules());
        let row = avatar_row(&avatar, &snapshot, &snapshot.rules, fixtures::block_time());
        let row = row.ok();
        assert_eq!(row.as_ref().map(|r| r.cp), Some(fixtures::NAKED_CP));
        assert_eq!(row.map(|r| r.timestamp), Some(fixtures::block_time()));
    }

    #[test]
    fn missing_character_row_is_rule_error() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let snapshot = WorldSnapshot::new().with_avatar(avatar.clone());
        let err = avatar_row(&avatar, &snapshot, &snapshot.rules, fixtures::block_time()).err();
        assert!(matches!(
            err,
            Some(ExtractError::State(StateError::MissingRuleData { .. }))
        ));
    }

    #[test]
    fn missing_rune_option_is_rule_error() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let snapshot = WorldSnapshot::new()
            .with_avatar(avatar.clone())
            .with_runes(fixtures::AVATAR, vec![RuneState { rune_id: 1, level: 3 }])
            .with_rules(fixtures::rules());
        let err = avatar_row(&avatar, &snapshot, &snapshot.rules, fixtures::block_time()).err();
        assert!(matches!(
            err,
            Some(ExtractError::State(StateError::MissingRuleData { sheet: "RuneOptionSheet", .. }))
        ));
    }

    #[test]
    fn runes_and_collections_feed_cp() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let mut rules = fixtures::rules();
        rules.rune_option.insert(
            1,
            RuneOptionRow {
                rune_id: 1,
                level_options: BTreeMap::from([(
                    2,
                    RuneOptionInfo {
                        cp: 50,
                        stats: vec![],
                    },
                )]),
            },
        );
        rules.rune_list.insert(
            1,
            RuneListRow {
                id: 1,
                grade: 1,
                bonus_coef: 1,
            },
        );
        rules.rune_level_bonus = vec![RuneLevelBonusRow {
            id: 1,
            rune_level: 100,
            bonus: 10_000,
        }];
        rules.collection.insert(
            7,
            CollectionRow {
                id: 7,
                modifiers: vec![StatModifier {
                    stat_type: StatType::Spd,
                    operation: ModifierOperation::Add,
                    value: dec!(10),
                }],
            },
        );
        let snapshot = WorldSnapshot::new()
            .with_avatar(avatar.clone())
            .with_runes(fixtures::AVATAR, vec![RuneState { rune_id: 1, level: 2 }])
            .with_collection(
                fixtures::AVATAR,
                CollectionState {
                    ids: BTreeSet::from([7]),
                },
            )
            .with_rules(rules);
        let row = avatar_row(&avatar, &snapshot, &snapshot.rules, fixtures::block_time()).ok();
        // Weighted rune level 2 stays under the bonus threshold; +10 SPD adds 40.
        assert_eq!(row.map(|r| r.cp), Some(fixtures::NAKED_CP + 40 + 50));
    }
}
