//! Crafting and enhancement.
//!
//! Equipment crafting and enhancement only materialize their result in the
//! avatar's crafting slot, so the equipment row is read from the slot.

use chrono::{DateTime, Utc};
use chronicle_state::{RuleTables, StateReader};
use chronicle_types::{
    Address, CombinationConsumableRow, CombinationEquipmentRow, ItemEnhancementRow, ItemId,
    Record,
};

use crate::context::ApplyContext;
use crate::equipment::{equipment_record, slot_equipment};
use crate::error::ExtractError;
use crate::profile::{profile_records, signed_profile_records};

/// Consumable crafting.
pub fn combination_consumable(
    ctx: &ApplyContext<'_>,
    avatar_address: Address,
    recipe_id: i32,
    slot_index: i32,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = ctx.output.require_avatar(&avatar_address)?;
    let mut records = signed_profile_records(ctx, avatar)?;
    records.push(Record::CombinationConsumable(CombinationConsumableRow {
        id: ctx.action_id,
        agent_address: ctx.signer,
        avatar_address,
        recipe_id,
        slot_index,
        block_index: ctx.block_index,
    }));
    Ok(records)
}

/// Equipment crafting.
pub fn combination_equipment(
    ctx: &ApplyContext<'_>,
    avatar_address: Address,
    recipe_id: i32,
    slot_index: i32,
    sub_recipe_id: Option<i32>,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = ctx.output.require_avatar(&avatar_address)?;
    let mut records = signed_profile_records(ctx, avatar)?;
    records.push(Record::CombinationEquipment(CombinationEquipmentRow {
        id: ctx.action_id,
        agent_address: ctx.signer,
        avatar_address,
        recipe_id,
        slot_index,
        sub_recipe_id: sub_recipe_id.unwrap_or(0),
        block_index: ctx.block_index,
    }));
    if let Some(gear) = slot_equipment(ctx.output, &avatar_address, slot_index) {
        records.push(equipment_record(gear, ctx.signer, avatar_address)?);
    }
    Ok(records)
}

/// Equipment enhancement.
pub fn item_enhancement(
    ctx: &ApplyContext<'_>,
    avatar_address: Address,
    item_id: ItemId,
    material_id: ItemId,
    slot_index: i32,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = ctx.output.require_avatar(&avatar_address)?;
    let mut records = signed_profile_records(ctx, avatar)?;
    records.push(Record::ItemEnhancement(ItemEnhancementRow {
        id: ctx.action_id,
        agent_address: ctx.signer,
        avatar_address,
        item_id,
        material_id,
        slot_index,
        block_index: ctx.block_index,
    }));
    if let Some(gear) = slot_equipment(ctx.output, &avatar_address, slot_index) {
        records.push(equipment_record(gear, ctx.signer, avatar_address)?);
    }
    Ok(records)
}

/// Profile and slot equipment as they stand after a revert.
pub fn rederive_slot_equipment(
    state: &dyn StateReader,
    rules: &RuleTables,
    avatar_address: Address,
    slot_index: i32,
    block_time: DateTime<Utc>,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = state.require_avatar(&avatar_address)?;
    let mut records = profile_records(avatar, state, rules, block_time)?;
    if let Some(gear) = slot_equipment(state, &avatar_address, slot_index) {
        records.push(equipment_record(gear, avatar.agent_address, avatar_address)?);
    }
    Ok(records)
}
