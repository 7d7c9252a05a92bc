//! Per-action extractors for the Chronicle ingestion pipeline.
//!
//! An extractor turns one applied action into the rows it produces, reading
//! chain state only through the snapshots carried by the event:
//!
//! - [`dispatch`] -- Routing by payload, for both apply and revert
//! - [`handlers`] -- One function per tracked action kind
//! - [`profile`] -- Account and avatar rows, including combat power
//! - [`equipment`] -- Equipment rows and where the equipment is found
//! - [`context`] -- [`ApplyContext`] and [`RevertContext`]
//! - [`error`] -- [`ExtractError`] and its [`ErrorClass`]
//!
//! Extractors are pure: they never write, never cache across events, and
//! fail the whole event rather than emit a partial row set.

pub mod context;
pub mod dispatch;
pub mod equipment;
pub mod error;
pub mod handlers;
pub mod profile;

#[cfg(test)]
mod fixtures;

pub use context::{ApplyContext, RevertContext};
pub use dispatch::{extract_apply, rederive_after_revert};
pub use error::{ErrorClass, ExtractError};
pub use profile::{DEFAULT_ARMOR_ID, Loadout, avatar_row, profile_records, signed_profile_records};
