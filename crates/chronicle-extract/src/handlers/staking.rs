//! Stake, stake reward claims and monster collection migration.

use chronicle_calc::stake::REWARD_INTERVAL;
use chronicle_calc::{
    ClaimInputs, accrual_periods, claim_rewards, legacy_zero_reward_compat, select_tier,
};
use chronicle_state::StateError;
use chronicle_state::rules::STAKE_REGULAR_REWARD_SHEET;
use chronicle_types::{Address, ClaimStakeRewardRow, MigrateMonsterCollectionRow, Record, StakeRow};

use crate::context::{ApplyContext, to_major};
use crate::error::ExtractError;
use crate::profile::signed_profile_records;

/// Stake deposit or change.
pub fn stake(ctx: &ApplyContext<'_>) -> Result<Vec<Record>, ExtractError> {
    let gold = ctx.output.require_gold_currency()?;
    let new_stake = ctx.output.require_stake(&ctx.signer)?;
    let prev_start = ctx
        .previous
        .stake(&ctx.signer)
        .map_or(0, |s| s.started_block_index);

    let row = StakeRow {
        id: ctx.action_id,
        block_index: ctx.block_index,
        agent_address: ctx.signer,
        previous_amount: to_major(gold, ctx.previous.staked_balance(&ctx.signer))?,
        new_amount: to_major(gold, ctx.output.staked_balance(&ctx.signer))?,
        remaining_ncg: to_major(gold, ctx.output.balance(&ctx.signer))?,
        prev_stake_start_block_index: prev_start,
        new_stake_start_block_index: new_stake.started_block_index,
        timestamp: ctx.block_time,
    };
    Ok(vec![ctx.signer_record(), Record::Stake(row)])
}

/// Stake reward claim.
///
/// Accrual runs from the last claim recorded in the state before the
/// claim; the state after it has already moved the marker to this block.
pub fn claim_stake_reward(
    ctx: &ApplyContext<'_>,
    avatar_address: Address,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = ctx.output.require_avatar(&avatar_address)?;
    let mut records = signed_profile_records(ctx, avatar)?;

    let prev_stake = ctx.previous.require_stake(&ctx.signer)?;
    let gold = ctx.previous.require_gold_currency()?;
    let unit_raw = gold.unit_raw().ok_or_else(|| {
        ExtractError::Internal(format!("{} has too many decimal places", gold.ticker))
    })?;
    let staked_raw = ctx.output.staked_balance(&ctx.signer);

    let rules = ctx.rules();
    let tier = select_tier(&rules.stake_regular_reward, staked_raw, unit_raw).ok_or_else(|| {
        StateError::missing_rule(STAKE_REGULAR_REWARD_SHEET, format!("staked {staked_raw}"))
    })?;
    let fixed = rules
        .stake_fixed_reward
        .as_deref()
        .and_then(|tiers| select_tier(tiers, staked_raw, unit_raw))
        .map_or(&[][..], |t| t.rewards.as_slice());

    let periods = accrual_periods(
        ctx.block_index,
        prev_stake.last_claim_block_index(),
        REWARD_INTERVAL,
    )?;
    let summary = claim_rewards(&ClaimInputs {
        staked_raw,
        unit_raw,
        periods,
        regular: &tier.rewards,
        fixed,
        retain_zero: legacy_zero_reward_compat(gold, ctx.block_index),
    })?;

    records.push(Record::ClaimStakeReward(ClaimStakeRewardRow {
        id: ctx.action_id,
        block_index: ctx.block_index,
        agent_address: ctx.signer,
        claim_reward_avatar_address: avatar_address,
        hourglass_count: summary.hourglass,
        ap_potion_count: summary.ap_potion,
        claim_stake_start_block_index: prev_stake.started_block_index,
        claim_stake_end_block_index: prev_stake.received_block_index,
        timestamp: ctx.block_time,
    }));
    Ok(records)
}

/// Monster collection to stake migration.
pub fn migrate_monster_collection(ctx: &ApplyContext<'_>) -> Result<Vec<Record>, ExtractError> {
    let gold = ctx.previous.require_gold_currency()?;
    let agent = ctx
        .previous
        .agent(&ctx.signer)
        .ok_or_else(|| StateError::missing_state("agent", ctx.signer))?;
    let collection = ctx
        .previous
        .monster_collection(&ctx.signer, agent.monster_collection_round)
        .ok_or_else(|| StateError::missing_state("monster collection", ctx.signer))?;
    let stake = ctx.output.require_stake(&ctx.signer)?;

    let row = MigrateMonsterCollectionRow {
        id: ctx.action_id,
        block_index: ctx.block_index,
        agent_address: ctx.signer,
        migration_amount: to_major(gold, ctx.previous.balance(&collection.address))?,
        migration_start_block_index: ctx.block_index,
        stake_start_block_index: stake.started_block_index,
        timestamp: ctx.block_time,
    };
    Ok(vec![ctx.signer_record(), Record::MigrateMonsterCollection(row)])
}
