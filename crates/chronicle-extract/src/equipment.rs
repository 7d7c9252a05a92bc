//! Equipment snapshot rows.
//!
//! An equipment row mirrors the current state of one piece of gear. It is
//! derived from where the gear sits right now (a crafting slot result, or a
//! buyer's or seller's inventory), never from action parameters.

use chronicle_calc::equipment_cp;
use chronicle_state::StateReader;
use chronicle_types::{Address, AvatarState, Equipment, EquipmentRow, Record, TradableId};

use crate::error::ExtractError;

/// Equipment row for a piece of gear owned by `avatar_address`.
pub fn equipment_record(
    equipment: &Equipment,
    agent_address: Address,
    avatar_address: Address,
) -> Result<Record, ExtractError> {
    Ok(Record::Equipment(EquipmentRow {
        item_id: equipment.item_id,
        agent_address,
        avatar_address,
        equipment_id: equipment.id,
        cp: equipment_cp(equipment)?,
        level: equipment.level,
        item_sub_type: equipment.item_sub_type,
    }))
}

/// The gear held as the result of a crafting slot, if the result is gear.
pub fn slot_equipment<'a>(
    state: &'a dyn StateReader,
    avatar_address: &Address,
    slot_index: i32,
) -> Option<&'a Equipment> {
    state
        .combination_slot(avatar_address, slot_index)
        .and_then(|slot| slot.result.as_ref())
        .and_then(|item| item.as_equipment())
}

/// A traded piece of gear, looked up in the buyer's inventory first and the
/// seller's second.
pub fn traded_equipment<'a>(
    buyer: Option<&'a AvatarState>,
    seller: Option<&'a AvatarState>,
    tradable_id: TradableId,
) -> Option<&'a Equipment> {
    buyer
        .and_then(|b| b.inventory.equipment_by_tradable_id(tradable_id))
        .or_else(|| seller.and_then(|s| s.inventory.equipment_by_tradable_id(tradable_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chronicle_state::WorldSnapshot;
    use chronicle_types::{CombinationSlotState, TradableItem};
    use rust_decimal_macros::dec;

    #[test]
    fn buyer_inventory_wins_over_seller() {
        let gear = fixtures::weapon(dec!(10));
        let mut upgraded = gear.clone();
        upgraded.level = 3;

        let mut buyer = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        buyer.inventory.equipments = vec![upgraded];
        let mut seller = fixtures::avatar(fixtures::SELLER_AVATAR, fixtures::SELLER_AGENT);
        seller.inventory.equipments = vec![gear.clone()];

        let found = traded_equipment(Some(&buyer), Some(&seller), gear.tradable_id());
        assert_eq!(found.map(|e| e.level), Some(3));

        let from_seller = traded_equipment(None, Some(&seller), gear.tradable_id());
        assert_eq!(from_seller.map(|e| e.level), Some(0));

        assert!(traded_equipment(Some(&buyer), Some(&seller), TradableId::new()).is_none());
    }

    #[test]
    fn slot_equipment_ignores_non_gear_results() {
        let gear = fixtures::weapon(dec!(10));
        let snapshot = WorldSnapshot::new()
            .with_combination_slot(
                fixtures::AVATAR,
                0,
                CombinationSlotState {
                    unlock_block_index: 0,
                    result: Some(TradableItem::Equipment(gear.clone())),
                },
            )
            .with_combination_slot(
                fixtures::AVATAR,
                1,
                CombinationSlotState {
                    unlock_block_index: 0,
                    result: Some(TradableItem::Consumable(fixtures::food())),
                },
            );
        assert_eq!(
            slot_equipment(&snapshot, &fixtures::AVATAR, 0).map(|e| e.item_id),
            Some(gear.item_id)
        );
        assert!(slot_equipment(&snapshot, &fixtures::AVATAR, 1).is_none());
        assert!(slot_equipment(&snapshot, &fixtures::AVATAR, 2).is_none());
    }

    #[test]
    fn equipment_row_carries_item_cp() {
        let gear = fixtures::weapon(dec!(100));
        let record = equipment_record(&gear, fixtures::AGENT, fixtures::AVATAR).ok();
        assert!(matches!(
            record,
            Some(Record::Equipment(EquipmentRow { cp: 1050, .. }))
        ));
    }
}
