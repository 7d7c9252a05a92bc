//! One extractor per tracked action kind.
//!
//! Every extractor reads only through [`crate::ApplyContext`] (or
//! [`crate::RevertContext`] for re-derivation) and returns the rows the
//! event produces.

pub mod battle;
pub mod crafting;
pub mod shop;
pub mod staking;
