//! Shared test data for extractor tests.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone as _, Utc};
use chronicle_state::{RuleTables, WorldSnapshot};
use chronicle_types::sheets::CharacterRow;
use chronicle_types::{
    ActionId, Address, AvatarState, Consumable, Costume, Currency, ElementalType, Equipment,
    Inventory, ItemId, ItemSubType, Material, StatType, StatValue,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::context::{ApplyContext, RevertContext};

pub const AVATAR: Address = Address::new([0xA1; 20]);
pub const AGENT: Address = Address::new([0xA0; 20]);
pub const SELLER_AVATAR: Address = Address::new([0xB1; 20]);
pub const SELLER_AGENT: Address = Address::new([0xB0; 20]);

pub const BLOCK: u64 = 1_000_000;
pub const CHARACTER_ID: i32 = 100_010;
pub const ARMOR_SHEET_ID: i32 = 10_251_000;

/// CP of a level-1 avatar wearing nothing.
pub const NAKED_CP: i32 = 1052;

pub fn block_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or_default()
}

pub fn avatar(address: Address, agent: Address) -> AvatarState {
    AvatarState {
        address,
        agent_address: agent,
        name: "tester".to_owned(),
        character_id: CHARACTER_ID,
        level: 1,
        inventory: Inventory::default(),
        cleared_stages: BTreeSet::new(),
    }
}

fn gear(id: i32, sub_type: ItemSubType, stat: StatValue, equipped: bool) -> Equipment {
    Equipment {
        item_id: ItemId::new(),
        id,
        item_sub_type: sub_type,
        grade: 1,
        elemental_type: ElementalType::Normal,
        level: 0,
        set_id: 1,
        stats: vec![stat],
        skill_count: 0,
        buff_skill_count: 0,
        spine_resource_path: String::new(),
        required_block_index: 0,
        unique_stat_type: stat.stat_type,
        equipped,
    }
}

pub fn weapon(atk: Decimal) -> Equipment {
    let stat = StatValue {
        stat_type: StatType::Atk,
        value: atk,
    };
    gear(10_100_000, ItemSubType::Weapon, stat, false)
}

pub fn armor(def: Decimal, equipped: bool) -> Equipment {
    let stat = StatValue {
        stat_type: StatType::Def,
        value: def,
    };
    gear(ARMOR_SHEET_ID, ItemSubType::Armor, stat, equipped)
}

pub fn title(id: i32, equipped: bool) -> Costume {
    Costume {
        item_id: ItemId::new(),
        id,
        item_sub_type: ItemSubType::Title,
        grade: 5,
        elemental_type: ElementalType::Normal,
        equipped,
        spine_resource_path: String::new(),
        required_block_index: 0,
    }
}

pub fn food() -> Consumable {
    Consumable {
        item_id: ItemId::new(),
        id: 201_000,
        item_sub_type: ItemSubType::Food,
        grade: 1,
        elemental_type: ElementalType::Normal,
        skill_count: 0,
        buff_skill_count: 0,
        required_block_index: 0,
        main_stat: StatType::Hp,
    }
}

pub fn material() -> Material {
    Material {
        fungible_id: "3991e04dd808dc0bc24b21f5adb7bf1997312f8700daf1334bf34936e8a0813a".to_owned(),
        id: 303_000,
        item_sub_type: ItemSubType::EquipmentMaterial,
        grade: 1,
        elemental_type: ElementalType::Normal,
    }
}

pub fn gold() -> Currency {
    Currency {
        ticker: "NCG".to_owned(),
        decimal_places: 2,
        minters: None,
    }
}

pub fn rules() -> RuleTables {
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
    rules
}

/// Previous and output snapshots that both hold `avatar`, gold and rules.
pub fn snapshots(avatar: AvatarState) -> (WorldSnapshot, WorldSnapshot) {
    let snapshot = WorldSnapshot::new()
        .with_avatar(avatar)
        .with_gold_currency(gold())
        .with_rules(rules());
    (snapshot.clone(), snapshot)
}

pub fn apply_ctx<'a>(previous: &'a WorldSnapshot, output: &'a WorldSnapshot) -> ApplyContext<'a> {
    ApplyContext {
        action_id: ActionId::new(),
        signer: AGENT,
        block_index: BLOCK,
        block_time: block_time(),
        previous,
        output,
    }
}

pub fn revert_ctx(state: &WorldSnapshot) -> RevertContext<'_> {
    RevertContext {
        action_id: ActionId::new(),
        signer: AGENT,
        block_index: BLOCK,
        block_time: block_time(),
        state,
    }
}
