//! Shop purchases.
//!
//! Every purchased listing yields one shop-history row whose shape follows
//! the item's type. Gear purchases also refresh the equipment row of the
//! traded item.

use chronicle_state::{RuleTables, StateError};
use chronicle_types::{
    Address, AgentRow, ElementalType, Order, PurchaseInfo, Record, ShopHistoryConsumableRow,
    ShopHistoryCostumeRow, ShopHistoryEquipmentRow, ShopHistoryMaterialRow, ShopTrade,
    TradableItem,
};

use crate::context::{ApplyContext, RevertContext};
use crate::equipment::{equipment_record, traded_equipment};
use crate::error::ExtractError;
use crate::profile::{profile_records, signed_profile_records};

/// Purchase of one or more listings.
pub fn buy(
    ctx: &ApplyContext<'_>,
    buyer_avatar_address: Address,
    purchases: &[PurchaseInfo],
) -> Result<Vec<Record>, ExtractError> {
    let buyer = ctx.output.require_avatar(&buyer_avatar_address)?;
    let mut records = signed_profile_records(ctx, buyer)?;

    for purchase in purchases {
        let item = ctx
            .output
            .tradable_item(purchase.tradable_id)
            .ok_or_else(|| StateError::missing_state("tradable item", purchase.tradable_id))?;
        let order = ctx
            .output
            .order(purchase.order_id)
            .ok_or_else(|| StateError::missing_state("order", purchase.order_id))?;
        records.push(shop_history(ctx, buyer_avatar_address, purchase, order, item));

        if purchase.item_sub_type.is_gear() {
            let seller = ctx.output.avatar(&purchase.seller_avatar_address);
            if let Some(gear) = traded_equipment(Some(buyer), seller, purchase.tradable_id) {
                records.push(equipment_record(gear, ctx.signer, buyer_avatar_address)?);
            }
        }
    }

    Ok(records)
}

fn shop_history(
    ctx: &ApplyContext<'_>,
    buyer_avatar_address: Address,
    purchase: &PurchaseInfo,
    order: &Order,
    item: &TradableItem,
) -> Record {
    let trade = |item_id: String, id: i32, grade: i32, elemental_type: ElementalType| ShopTrade {
        order_id: purchase.order_id,
        block_index: ctx.block_index,
        item_id,
        seller_avatar_address: purchase.seller_avatar_address,
        buyer_avatar_address,
        price: purchase.price,
        item_type: item.item_type(),
        item_sub_type: purchase.item_sub_type,
        id,
        grade,
        elemental_type,
        item_count: order.item_count(),
        timestamp: ctx.block_time,
    };

    match item {
        TradableItem::Equipment(e) => {
            Record::ShopHistoryEquipment(Box::new(ShopHistoryEquipmentRow {
                trade: trade(e.item_id.to_string(), e.id, e.grade, e.elemental_type),
                buff_skill_count: e.buff_skill_count,
                set_id: e.set_id,
                skills_count: e.skill_count,
                spine_resource_path: e.spine_resource_path.clone(),
                required_block_index: e.required_block_index,
                non_fungible_id: e.item_id,
                tradable_id: e.tradable_id(),
                unique_stat_type: e.unique_stat_type,
            }))
        }
        TradableItem::Costume(c) => Record::ShopHistoryCostume(Box::new(ShopHistoryCostumeRow {
            trade: trade(c.item_id.to_string(), c.id, c.grade, c.elemental_type),
            equipped: c.equipped,
            spine_resource_path: c.spine_resource_path.clone(),
            required_block_index: c.required_block_index,
            non_fungible_id: c.item_id,
            tradable_id: c.item_id.into(),
        })),
        TradableItem::Consumable(c) => {
            Record::ShopHistoryConsumable(Box::new(ShopHistoryConsumableRow {
                trade: trade(c.item_id.to_string(), c.id, c.grade, c.elemental_type),
                buff_skill_count: c.buff_skill_count,
                skills_count: c.skill_count,
                required_block_index: c.required_block_index,
                non_fungible_id: c.item_id,
                tradable_id: c.item_id.into(),
                main_stat: c.main_stat,
            }))
        }
        TradableItem::Material(m) => Record::ShopHistoryMaterial(ShopHistoryMaterialRow {
            trade: trade(m.fungible_id.clone(), m.id, m.grade, m.elemental_type),
        }),
    }
}

/// Equipment rows of sold gear as they stand after a revert, attributed to
/// the seller.
pub fn rederive_sold_equipment(
    ctx: &RevertContext<'_>,
    rules: &RuleTables,
    buyer_avatar_address: Address,
    purchases: &[PurchaseInfo],
) -> Result<Vec<Record>, ExtractError> {
    let buyer = ctx.state.avatar(&buyer_avatar_address);
    let mut records = Vec::new();

    for purchase in purchases.iter().filter(|p| p.item_sub_type.is_gear()) {
        let seller = ctx.state.avatar(&purchase.seller_avatar_address);
        let Some(gear) = traded_equipment(buyer, seller, purchase.tradable_id) else {
            continue;
        };
        records.push(Record::Agent(AgentRow {
            address: purchase.seller_agent_address,
        }));
        if let Some(seller) = seller {
            records.extend(profile_records(seller, ctx.state, rules, ctx.block_time)?);
        }
        records.push(equipment_record(
            gear,
            purchase.seller_agent_address,
            purchase.seller_avatar_address,
        )?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chronicle_state::WorldSnapshot;
    use chronicle_types::{EquipmentRow, ItemSubType, OrderId, OrderKind, RecordKind, TradableId};
    use rust_decimal_macros::dec;

    fn purchase(tradable_id: TradableId, sub_type: ItemSubType) -> PurchaseInfo {
        PurchaseInfo {
            order_id: OrderId::new(),
            tradable_id,
            seller_agent_address: fixtures::SELLER_AGENT,
            seller_avatar_address: fixtures::SELLER_AVATAR,
            item_sub_type: sub_type,
            price: dec!(12.5),
        }
    }

    fn listed(snapshot: WorldSnapshot, info: &PurchaseInfo, item: TradableItem, kind: OrderKind) -> WorldSnapshot {
        snapshot
            .with_tradable_item(info.tradable_id, item)
            .with_order(Order {
                order_id: info.order_id,
                seller_agent_address: info.seller_agent_address,
                seller_avatar_address: info.seller_avatar_address,
                tradable_id: info.tradable_id,
                kind,
            })
    }

    #[test]
    fn weapon_found_in_buyer_inventory() {
        let gear = fixtures::weapon(dec!(10));
        let info = purchase(gear.tradable_id(), ItemSubType::Weapon);
        let mut buyer = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        buyer.inventory.equipments = vec![gear.clone()];
        let (previous, output) = fixtures::snapshots(buyer);
        let output = listed(output, &info, TradableItem::Equipment(gear.clone()), OrderKind::NonFungible);
        let ctx = fixtures::apply_ctx(&previous, &output);

        let records = buy(&ctx, fixtures::AVATAR, std::slice::from_ref(&info)).unwrap_or_default();
        let kinds: Vec<_> = records.iter().map(Record::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::Agent,
                RecordKind::Avatar,
                RecordKind::ShopHistoryEquipment,
                RecordKind::Equipment
            ]
        );
        assert!(records.iter().any(|r| matches!(
            r,
            Record::Equipment(EquipmentRow { avatar_address, .. }) if *avatar_address == fixtures::AVATAR
        )));
    }

    #[test]
    fn weapon_found_nowhere_still_records_trade() {
        let gear = fixtures::weapon(dec!(10));
        let info = purchase(gear.tradable_id(), ItemSubType::Weapon);
        let buyer = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let (previous, output) = fixtures::snapshots(buyer);
        let output = listed(output, &info, TradableItem::Equipment(gear), OrderKind::NonFungible);
        let ctx = fixtures::apply_ctx(&previous, &output);

        let records = buy(&ctx, fixtures::AVATAR, std::slice::from_ref(&info)).unwrap_or_default();
        assert!(records.iter().any(|r| r.kind() == RecordKind::ShopHistoryEquipment));
        assert!(!records.iter().any(|r| r.kind() == RecordKind::Equipment));
    }

    #[test]
    fn material_stack_records_order_count() {
        let material = fixtures::material();
        let info = purchase(TradableId::new(), ItemSubType::EquipmentMaterial);
        let buyer = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let (previous, output) = fixtures::snapshots(buyer);
        let output = listed(
            output,
            &info,
            TradableItem::Material(material),
            OrderKind::Fungible { item_count: 40 },
        );
        let ctx = fixtures::apply_ctx(&previous, &output);

        let records = buy(&ctx, fixtures::AVATAR, std::slice::from_ref(&info)).unwrap_or_default();
        assert!(records.iter().any(|r| matches!(
            r,
            Record::ShopHistoryMaterial(ShopHistoryMaterialRow { trade })
                if trade.item_count == 40 && trade.price == dec!(12.5)
        )));
    }

    #[test]
    fn missing_order_skips_event() {
        let gear = fixtures::weapon(dec!(10));
        let info = purchase(gear.tradable_id(), ItemSubType::Weapon);
        let buyer = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let (previous, output) = fixtures::snapshots(buyer);
        let output = output.with_tradable_item(info.tradable_id, TradableItem::Equipment(gear));
        let ctx = fixtures::apply_ctx(&previous, &output);
        let result = buy(&ctx, fixtures::AVATAR, std::slice::from_ref(&info));
        assert_eq!(
            result.err().map(|e| e.class()),
            Some(crate::ErrorClass::MissingChainState)
        );
    }

    #[test]
    fn revert_attributes_gear_to_seller() {
        let gear = fixtures::weapon(dec!(10));
        let info = purchase(gear.tradable_id(), ItemSubType::Weapon);
        let mut seller = fixtures::avatar(fixtures::SELLER_AVATAR, fixtures::SELLER_AGENT);
        seller.inventory.equipments = vec![gear];
        let state = WorldSnapshot::new()
            .with_avatar(fixtures::avatar(fixtures::AVATAR, fixtures::AGENT))
            .with_avatar(seller)
            .with_rules(fixtures::rules());
        let ctx = fixtures::revert_ctx(&state);

        let records =
            rederive_sold_equipment(&ctx, &state.rules, fixtures::AVATAR, std::slice::from_ref(&info))
                .unwrap_or_default();
        assert!(records.iter().any(|r| matches!(
            r,
            Record::Equipment(EquipmentRow { agent_address, avatar_address, .. })
                if *agent_address == fixtures::SELLER_AGENT && *avatar_address == fixtures::SELLER_AVATAR
        )));
    }
}
