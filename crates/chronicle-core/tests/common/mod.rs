//! Event builders shared by the pipeline tests.

#![allow(dead_code, clippy::arithmetic_side_effects)]

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone as _, Utc};
use chronicle_calc::stake::{HOURGLASS_ITEM_ID, REWARD_INTERVAL};
use chronicle_state::{ApplyEvent, ChainEvent, RevertEvent, RuleTables, WorldSnapshot};
use chronicle_types::sheets::{CharacterRow, StakeRegularReward, StakeRegularRewardRow};
use chronicle_types::{
    ActionId, ActionPayload, Address, AvatarState, CombinationSlotState, Currency,
    ElementalType, Equipment, Inventory, ItemId, ItemSubType, StakeState, StatType, StatValue,
    TradableItem,
};
use rust_decimal_macros::dec;

pub const AVATAR: Address = Address::new([0x11; 20]);
pub const AGENT: Address = Address::new([0x10; 20]);
pub const OTHER_AVATAR: Address = Address::new([0x21; 20]);
pub const OTHER_AGENT: Address = Address::new([0x20; 20]);

pub const BLOCK: u64 = 2_000_000;
const CHARACTER_ID: i32 = 100_010;

pub fn block_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or_default()
}

pub fn avatar(address: Address, agent: Address, level: i32) -> AvatarState {
    AvatarState {
        address,
        agent_address: agent,
        name: format!("avatar-{level}"),
        character_id: CHARACTER_ID,
        level,
        inventory: Inventory::default(),
        cleared_stages: BTreeSet::new(),
    }
}

fn rules() -> RuleTables {
    let mut rules = RuleTables::default();
    rules.character.insert(
        CHARACTER_ID,
        CharacterRow {
            id: CHARACTER_ID,
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
        },
    );
    rules.stake_regular_reward = vec![StakeRegularRewardRow {
        level: 1,
        required_gold: 5,
        rewards: vec![StakeRegularReward {
            item_id: HOURGLASS_ITEM_ID,
            rate: dec!(0.1),
        }],
    }];
    rules
}

/// A snapshot with gold, rules and the given avatars.
pub fn world(avatars: impl IntoIterator<Item = AvatarState>) -> WorldSnapshot {
    avatars.into_iter().fold(
        WorldSnapshot::new()
            .with_gold_currency(Currency {
                ticker: "NCG".to_owned(),
                decimal_places: 2,
                minters: None,
            })
            .with_rules(rules()),
        WorldSnapshot::with_avatar,
    )
}

fn apply_event(
    signer: Address,
    block_index: u64,
    action: ActionPayload,
    previous_state: WorldSnapshot,
    output_state: WorldSnapshot,
) -> ApplyEvent {
    ApplyEvent {
        action_id: ActionId::new(),
        signer,
        block_index,
        block_time: block_time(),
        action,
        previous_state,
        output_state,
        failed: false,
    }
}

/// A stage battle by `avatar`, whose state after the battle is given.
pub fn hack_and_slash(block_index: u64, avatar: AvatarState) -> ApplyEvent {
    let signer = avatar.agent_address;
    let action = ActionPayload::HackAndSlash {
        avatar_address: avatar.address,
        stage_id: 5,
    };
    let snapshot = world([avatar]);
    apply_event(signer, block_index, action, snapshot.clone(), snapshot)
}

/// A first stake of `staked_raw` minor units by `AGENT`.
pub fn stake(block_index: u64, staked_raw: i128) -> ApplyEvent {
    let previous = world([avatar(AVATAR, AGENT, 1)]);
    let output = previous.clone().with_stake(
        AGENT,
        StakeState {
            started_block_index: block_index,
            received_block_index: 0,
        },
        staked_raw,
    );
    let action = ActionPayload::Stake {
        amount: dec!(10),
    };
    apply_event(AGENT, block_index, action, previous, output)
}

/// A reward claim three full intervals after the stake started.
pub fn claim_after_three_intervals() -> ApplyEvent {
    let started = BLOCK - 3 * REWARD_INTERVAL;
    let base = world([avatar(AVATAR, AGENT, 1)]);
    let previous = base.clone().with_stake(
        AGENT,
        StakeState {
            started_block_index: started,
            received_block_index: 0,
        },
        1_000,
    );
    let output = base.with_stake(
        AGENT,
        StakeState {
            started_block_index: started,
            received_block_index: BLOCK,
        },
        1_000,
    );
    let action = ActionPayload::ClaimStakeReward {
        avatar_address: AVATAR,
    };
    apply_event(AGENT, BLOCK, action, previous, output)
}

/// A weapon with one attack stat at enhancement `level`.
pub fn weapon(item_id: ItemId, level: i32) -> Equipment {
    let stat = StatValue {
        stat_type: StatType::Atk,
        value: dec!(40),
    };
    Equipment {
        item_id,
        id: 10_100_000,
        item_sub_type: ItemSubType::Weapon,
        grade: 1,
        elemental_type: ElementalType::Normal,
        level,
        set_id: 1,
        stats: vec![stat],
        skill_count: 0,
        buff_skill_count: 0,
        spine_resource_path: String::new(),
        required_block_index: 0,
        unique_stat_type: StatType::Atk,
        equipped: false,
    }
}

/// An enhancement in slot 0 that takes `item_id` from level 0 to level 1.
pub fn item_enhancement(block_index: u64, item_id: ItemId) -> ApplyEvent {
    let in_slot = |level| CombinationSlotState {
        unlock_block_index: block_index,
        result: Some(TradableItem::Equipment(weapon(item_id, level))),
    };
    let base = world([avatar(AVATAR, AGENT, 1)]);
    let previous = base.clone().with_combination_slot(AVATAR, 0, in_slot(0));
    let output = base.with_combination_slot(AVATAR, 0, in_slot(1));
    let action = ActionPayload::ItemEnhancement {
        avatar_address: AVATAR,
        item_id,
        material_id: ItemId::new(),
        slot_index: 0,
    };
    apply_event(AGENT, block_index, action, previous, output)
}

/// The revert of `apply`, back to its previous state.
pub fn revert_of(apply: &ApplyEvent) -> RevertEvent {
    RevertEvent {
        action_id: apply.action_id,
        signer: apply.signer,
        block_index: apply.block_index,
        block_time: apply.block_time,
        action: apply.action.clone(),
        state: apply.previous_state.clone(),
        failed: apply.failed,
    }
}

pub fn applied(event: ApplyEvent) -> ChainEvent {
    ChainEvent::Apply(Box::new(event))
}

pub fn reverted(event: RevertEvent) -> ChainEvent {
    ChainEvent::Revert(Box::new(event))
}
