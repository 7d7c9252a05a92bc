//! Action payloads carried by chain events.
//!
//! Only the tracked action kinds are decoded. Any other `type_id` lands in
//! [`ActionPayload::Untracked`] and is ignored by the dispatcher.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{ActionKind, ItemSubType};
use crate::ids::{Address, ItemId, OrderId, TradableId};

/// One purchased listing inside a `buy` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseInfo {
    /// Order being filled.
    pub order_id: OrderId,
    /// Listed item.
    pub tradable_id: TradableId,
    /// Seller account.
    pub seller_agent_address: Address,
    /// Seller avatar.
    pub seller_avatar_address: Address,
    /// Sub-type of the listed item.
    pub item_sub_type: ItemSubType,
    /// Price in major currency units.
    pub price: Decimal,
}

/// Decoded parameters of a chain action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type_id", rename_all = "snake_case")]
pub enum ActionPayload {
    /// Stage battle.
    HackAndSlash {
        /// Fighting avatar.
        avatar_address: Address,
        /// Stage fought.
        stage_id: i32,
    },
    /// Arena battle.
    RankingBattle {
        /// Fighting avatar.
        avatar_address: Address,
        /// Opponent avatar.
        enemy_address: Address,
    },
    /// Consumable crafting.
    CombinationConsumable {
        /// Crafting avatar.
        avatar_address: Address,
        /// Recipe used.
        recipe_id: i32,
        /// Crafting slot used.
        slot_index: i32,
    },
    /// Equipment crafting.
    CombinationEquipment {
        /// Crafting avatar.
        avatar_address: Address,
        /// Recipe used.
        recipe_id: i32,
        /// Crafting slot used.
        slot_index: i32,
        /// Optional sub-recipe.
        #[serde(default)]
        sub_recipe_id: Option<i32>,
    },
    /// Equipment upgrade.
    ItemEnhancement {
        /// Upgrading avatar.
        avatar_address: Address,
        /// Gear being upgraded.
        item_id: ItemId,
        /// Gear consumed as material.
        material_id: ItemId,
        /// Crafting slot used.
        slot_index: i32,
    },
    /// Shop purchase of one or more listings.
    Buy {
        /// Buying avatar.
        buyer_avatar_address: Address,
        /// Listings bought.
        purchase_infos: Vec<PurchaseInfo>,
    },
    /// Stake deposit or change.
    Stake {
        /// Requested stake in major units.
        amount: Decimal,
    },
    /// Stake reward claim.
    ClaimStakeReward {
        /// Avatar receiving the rewards.
        avatar_address: Address,
    },
    /// Monster collection to stake migration.
    MigrateMonsterCollection {
        /// Avatar that held the collection.
        avatar_address: Address,
    },
    /// Any action the mirror does not track.
    #[serde(other)]
    Untracked,
}

impl ActionPayload {
    /// The tracked kind of this action, or `None` when untracked.
    pub const fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::HackAndSlash { .. } => Some(ActionKind::HackAndSlash),
            Self::RankingBattle { .. } => Some(ActionKind::RankingBattle),
            Self::CombinationConsumable { .. } => Some(ActionKind::CombinationConsumable),
            Self::CombinationEquipment { .. } => Some(ActionKind::CombinationEquipment),
            Self::ItemEnhancement { .. } => Some(ActionKind::ItemEnhancement),
            Self::Buy { .. } => Some(ActionKind::Buy),
            Self::Stake { .. } => Some(ActionKind::Stake),
            Self::ClaimStakeReward { .. } => Some(ActionKind::ClaimStakeReward),
            Self::MigrateMonsterCollection { .. } => Some(ActionKind::MigrateMonsterCollection),
            Self::Untracked => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_id_is_untracked() {
        let payload: Result<ActionPayload, _> =
            serde_json::from_str(r#"{"type_id": "daily_reward", "avatar_address": "00"}"#);
        assert!(matches!(payload, Ok(ActionPayload::Untracked)));
        assert_eq!(ActionPayload::Untracked.kind(), None);
    }

    #[test]
    fn hack_and_slash_decodes() {
        let json = format!(
            r#"{{"type_id": "hack_and_slash", "avatar_address": "{}", "stage_id": 12}}"#,
            "11".repeat(20)
        );
        let payload: Result<ActionPayload, _> = serde_json::from_str(&json);
        assert!(matches!(
            payload,
            Ok(ActionPayload::HackAndSlash { stage_id: 12, .. })
        ));
    }

    #[test]
    fn missing_sub_recipe_defaults_to_none() {
        let json = format!(
            r#"{{"type_id": "combination_equipment", "avatar_address": "{}", "recipe_id": 1, "slot_index": 0}}"#,
            "22".repeat(20)
        );
        let payload: Result<ActionPayload, _> = serde_json::from_str(&json);
        assert!(matches!(
            payload,
            Ok(ActionPayload::CombinationEquipment {
                sub_recipe_id: None,
                ..
            })
        ));
    }
}
