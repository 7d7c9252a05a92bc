//! Routing from decoded payloads to extractors.

use chronicle_types::{ActionPayload, Record};

use crate::context::{ApplyContext, RevertContext};
use crate::error::ExtractError;
use crate::handlers::{battle, crafting, shop, staking};

/// Rows produced by applying `action`.
///
/// Untracked payloads produce nothing.
pub fn extract_apply(
    ctx: &ApplyContext<'_>,
    action: &ActionPayload,
) -> Result<Vec<Record>, ExtractError> {
    match action {
        ActionPayload::HackAndSlash {
            avatar_address,
            stage_id,
        } => battle::hack_and_slash(ctx, *avatar_address, *stage_id),
        ActionPayload::RankingBattle { avatar_address, .. } => {
            battle::ranking_battle(ctx, *avatar_address)
        }
        ActionPayload::CombinationConsumable {
            avatar_address,
            recipe_id,
            slot_index,
        } => crafting::combination_consumable(ctx, *avatar_address, *recipe_id, *slot_index),
        ActionPayload::CombinationEquipment {
            avatar_address,
            recipe_id,
            slot_index,
            sub_recipe_id,
        } => crafting::combination_equipment(
            ctx,
            *avatar_address,
            *recipe_id,
            *slot_index,
            *sub_recipe_id,
        ),
        ActionPayload::ItemEnhancement {
            avatar_address,
            item_id,
            material_id,
            slot_index,
        } => crafting::item_enhancement(ctx, *avatar_address, *item_id, *material_id, *slot_index),
        ActionPayload::Buy {
            buyer_avatar_address,
            purchase_infos,
        } => shop::buy(ctx, *buyer_avatar_address, purchase_infos),
        ActionPayload::Stake { .. } => staking::stake(ctx),
        ActionPayload::ClaimStakeReward { avatar_address } => {
            staking::claim_stake_reward(ctx, *avatar_address)
        }
        ActionPayload::MigrateMonsterCollection { .. } => staking::migrate_monster_collection(ctx),
        ActionPayload::Untracked => Ok(Vec::new()),
    }
}

/// Rows whose current value changed because `action` was reverted.
///
/// Only crafting, enhancement and purchases leave equipment rows that need
/// re-deriving; every other kind yields nothing.
pub fn rederive_after_revert(
    ctx: &RevertContext<'_>,
    action: &ActionPayload,
) -> Result<Vec<Record>, ExtractError> {
    match action {
        ActionPayload::CombinationEquipment {
            avatar_address,
            slot_index,
            ..
        }
        | ActionPayload::ItemEnhancement {
            avatar_address,
            slot_index,
            ..
        } => crafting::rederive_slot_equipment(
            ctx.state,
            ctx.state.rules(),
            *avatar_address,
            *slot_index,
            ctx.block_time,
        ),
        ActionPayload::Buy {
            buyer_avatar_address,
            purchase_infos,
        } => shop::rederive_sold_equipment(
            ctx,
            ctx.state.rules(),
            *buyer_avatar_address,
            purchase_infos,
        ),
        _ => Ok(Vec::new()),
    }
}
