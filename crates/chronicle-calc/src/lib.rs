//! Derived-value calculators for the Chronicle mirror.
//!
//! Pure functions over decoded state and rule-table rows. No floating point:
//! stats and rates are [`rust_decimal::Decimal`], balances are raw minor
//! units (`i128`) of the chain's fixed-point currency.
//!
//! - [`combat_power`] -- Aggregate avatar combat power and per-item combat power
//! - [`stake`] -- Stake accrual periods, tier selection and claim rewards
//!
//! The same [`combat_power::total_cp`] serves the full-profile path and every
//! per-action path, so both produce identical scores for identical state.

pub mod combat_power;
pub mod stake;

pub use combat_power::{
    CpInputs, equipment_cp, rune_level_bonus, skill_multiplier, stat_cp, total_cp,
    weighted_rune_level,
};
pub use stake::{
    ClaimInputs, ClaimRewardSummary, RewardGrant, RewardSource, accrual_periods, claim_rewards,
    legacy_zero_reward_compat, reward_quantity, select_tier,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the calculators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// An intermediate value left the representable range.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// A reward row has a non-positive rate.
    #[error("stake reward rate for item {item_id} must be positive")]
    NonPositiveRate {
        /// Item the reward row grants.
        item_id: i32,
    },

    /// The accrual interval is zero.
    #[error("stake reward interval must be non-zero")]
    ZeroInterval,
}
