//! Stake reward accrual.
//!
//! Rewards accrue once per [`REWARD_INTERVAL`] blocks since the last claim.
//! Per period, each regular reward grants
//! `floor(staked / (unit * rate))` items, where `unit` is one major currency
//! unit in raw minor units, and each fixed reward grants its count. Totals
//! are the per-period quantity times the number of periods.
//!
//! A per-period quantity of zero is skipped, except on the legacy chain
//! (gold minted by [`LEGACY_MINTER`] and the block is below
//! [`LEGACY_ZERO_REWARD_CUTOFF`]) where the zero entry is kept in the grant
//! list. Keeping it never changes the counts.

use chronicle_types::sheets::{
    StakeFixedReward, StakeFixedRewardRow, StakeRegularReward, StakeRegularRewardRow,
};
use chronicle_types::{Address, Currency};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::CalcError;

/// Blocks per accrual period.
pub const REWARD_INTERVAL: u64 = 50_400;

/// Item id of the hourglass reward.
pub const HOURGLASS_ITEM_ID: i32 = 400_000;

/// Item id of the AP potion reward.
pub const AP_POTION_ITEM_ID: i32 = 500_000;

/// Minter of the legacy chain's gold (`340f110b91d0577a9ae0ea69ce15269436f217da`).
pub const LEGACY_MINTER: Address = Address::new([
    0x34, 0x0f, 0x11, 0x0b, 0x91, 0xd0, 0x57, 0x7a, 0x9a, 0xe0, 0xea, 0x69, 0xce, 0x15, 0x26,
    0x94, 0x36, 0xf2, 0x17, 0xda,
]);

/// Block below which the legacy chain keeps zero-quantity reward entries.
pub const LEGACY_ZERO_REWARD_CUTOFF: u64 = 1_200_000;

/// Whether zero-quantity rewards are kept for this chain and block.
pub fn legacy_zero_reward_compat(gold: &Currency, block_index: u64) -> bool {
    gold.has_minter(&LEGACY_MINTER) && block_index < LEGACY_ZERO_REWARD_CUTOFF
}

/// Whole accrual periods between the last claim and `current`.
pub fn accrual_periods(current: u64, last_claim: u64, interval: u64) -> Result<u64, CalcError> {
    current
        .saturating_sub(last_claim)
        .checked_div(interval)
        .ok_or(CalcError::ZeroInterval)
}

/// A stake tier with a minimum stake.
pub trait StakeTier {
    /// Minimum stake in major units.
    fn required_gold(&self) -> i64;
}

impl StakeTier for StakeRegularRewardRow {
    fn required_gold(&self) -> i64 {
        self.required_gold
    }
}

impl StakeTier for StakeFixedRewardRow {
    fn required_gold(&self) -> i64 {
        self.required_gold
    }
}

/// The tier with the largest requirement not exceeding the staked amount.
pub fn select_tier<T: StakeTier>(tiers: &[T], staked_raw: i128, unit_raw: i128) -> Option<&T> {
    tiers
        .iter()
        .filter(|tier| {
            i128::from(tier.required_gold())
                .checked_mul(unit_raw)
                .is_some_and(|required| required <= staked_raw)
        })
        .max_by_key(|tier| tier.required_gold())
}

/// Items granted per period by one regular reward row.
pub fn reward_quantity(
    staked_raw: i128,
    unit_raw: i128,
    rate: Decimal,
    item_id: i32,
) -> Result<i64, CalcError> {
    let unit = Decimal::try_from_i128_with_scale(unit_raw, 0)
        .map_err(|_overflow| CalcError::Overflow("currency unit"))?;
    let staked = Decimal::try_from_i128_with_scale(staked_raw, 0)
        .map_err(|_overflow| CalcError::Overflow("staked amount"))?;
    let divisor = unit
        .checked_mul(rate)
        .ok_or(CalcError::Overflow("reward divisor"))?;
    if divisor <= Decimal::ZERO {
        return Err(CalcError::NonPositiveRate { item_id });
    }
    staked
        .checked_div(divisor)
        .and_then(|q| q.floor().to_i64())
        .ok_or(CalcError::Overflow("reward quantity"))
}

/// Which reward table a grant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardSource {
    /// Percentage-based table.
    Regular,
    /// Fixed-quantity table.
    Fixed,
}

/// One reward entry of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardGrant {
    /// Rewarded item.
    pub item_id: i32,
    /// Total quantity over every elapsed period.
    pub quantity: i64,
    /// Table the entry came from.
    pub source: RewardSource,
}

/// Inputs of a claim.
#[derive(Debug, Clone, Copy)]
pub struct ClaimInputs<'a> {
    /// Staked gold in raw minor units.
    pub staked_raw: i128,
    /// One major unit in raw minor units.
    pub unit_raw: i128,
    /// Elapsed accrual periods.
    pub periods: u64,
    /// Regular rewards of the selected tier.
    pub regular: &'a [StakeRegularReward],
    /// Fixed rewards of the selected tier.
    pub fixed: &'a [StakeFixedReward],
    /// Keep zero-quantity entries (legacy chain).
    pub retain_zero: bool,
}

/// Result of a claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimRewardSummary {
    /// Hourglasses granted.
    pub hourglass: i64,
    /// AP potions granted.
    pub ap_potion: i64,
    /// Every entry counted, in table order.
    pub granted: Vec<RewardGrant>,
}

impl ClaimRewardSummary {
    fn record(
        &mut self,
        item_id: i32,
        per_period: i64,
        periods: i64,
        source: RewardSource,
    ) -> Result<(), CalcError> {
        let quantity = per_period
            .checked_mul(periods)
            .ok_or(CalcError::Overflow("claimed quantity"))?;
        let counter = match item_id {
            HOURGLASS_ITEM_ID => Some(&mut self.hourglass),
            AP_POTION_ITEM_ID => Some(&mut self.ap_potion),
            _ => None,
        };
        if let Some(counter) = counter {
            *counter = counter
                .checked_add(quantity)
                .ok_or(CalcError::Overflow("claimed quantity"))?;
        }
        self.granted.push(RewardGrant {
            item_id,
            quantity,
            source,
        });
        Ok(())
    }
}

/// Rewards of one claim.
pub fn claim_rewards(inputs: &ClaimInputs<'_>) -> Result<ClaimRewardSummary, CalcError> {
    let periods = i64::try_from(inputs.periods).map_err(|_overflow| CalcError::Overflow("periods"))?;
    let mut summary = ClaimRewardSummary::default();

    for reward in inputs.regular {
        let per_period =
            reward_quantity(inputs.staked_raw, inputs.unit_raw, reward.rate, reward.item_id)?;
        if per_period < 1 && !inputs.retain_zero {
            continue;
        }
        summary.record(reward.item_id, per_period, periods, RewardSource::Regular)?;
    }

    for reward in inputs.fixed {
        let per_period = i64::from(reward.count);
        if per_period < 1 && !inputs.retain_zero {
            continue;
        }
        summary.record(reward.item_id, per_period, periods, RewardSource::Fixed)?;
    }

    Ok(summary)
}
