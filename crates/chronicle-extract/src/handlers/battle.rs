//! Stage and arena battles.

use chronicle_types::{Address, HackAndSlashRow, Record};

use crate::context::ApplyContext;
use crate::error::ExtractError;
use crate::profile::signed_profile_records;

/// Stage ids above this belong to the Mimisbrunnr world.
pub const MIMISBRUNNR_STAGE_OFFSET: i32 = 10_000_000;

/// Stage battle: profile refresh plus the battle record.
pub fn hack_and_slash(
    ctx: &ApplyContext<'_>,
    avatar_address: Address,
    stage_id: i32,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = ctx.output.require_avatar(&avatar_address)?;
    let mut records = signed_profile_records(ctx, avatar)?;
    records.push(Record::HackAndSlash(HackAndSlashRow {
        id: ctx.action_id,
        agent_address: ctx.signer,
        avatar_address,
        stage_id,
        cleared: avatar.cleared_stages.contains(&stage_id),
        mimisbrunnr: stage_id > MIMISBRUNNR_STAGE_OFFSET,
        block_index: ctx.block_index,
    }));
    Ok(records)
}

/// Arena battle: profile refresh only.
pub fn ranking_battle(
    ctx: &ApplyContext<'_>,
    avatar_address: Address,
) -> Result<Vec<Record>, ExtractError> {
    let avatar = ctx.output.require_avatar(&avatar_address)?;
    signed_profile_records(ctx, avatar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chronicle_types::RecordKind;

    #[test]
    fn cleared_and_mimisbrunnr_flags() {
        let mut avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        avatar.cleared_stages.insert(10_000_001);
        let (previous, output) = fixtures::snapshots(avatar);
        let ctx = fixtures::apply_ctx(&previous, &output);

        let records = hack_and_slash(&ctx, fixtures::AVATAR, 10_000_001).unwrap_or_default();
        let kinds: Vec<_> = records.iter().map(Record::kind).collect();
        assert_eq!(
            kinds,
            vec![RecordKind::Agent, RecordKind::Avatar, RecordKind::HackAndSlash]
        );
        assert!(matches!(
            records.last(),
            Some(Record::HackAndSlash(HackAndSlashRow {
                cleared: true,
                mimisbrunnr: true,
                ..
            }))
        ));

        let uncleared = hack_and_slash(&ctx, fixtures::AVATAR, 5).unwrap_or_default();
        assert!(matches!(
            uncleared.last(),
            Some(Record::HackAndSlash(HackAndSlashRow {
                cleared: false,
                mimisbrunnr: false,
                ..
            }))
        ));
    }

    #[test]
    fn missing_avatar_is_chain_state_error() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let (previous, output) = fixtures::snapshots(avatar);
        let ctx = fixtures::apply_ctx(&previous, &output);
        let result = ranking_battle(&ctx, fixtures::SELLER_AVATAR);
        assert_eq!(
            result.err().map(|e| e.class()),
            Some(crate::ErrorClass::MissingChainState)
        );
    }

    #[test]
    fn ranking_battle_refreshes_profile() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let (previous, output) = fixtures::snapshots(avatar);
        let ctx = fixtures::apply_ctx(&previous, &output);
        let records = ranking_battle(&ctx, fixtures::AVATAR).unwrap_or_default();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn foreign_signer_gets_its_own_account_row() {
        let avatar = fixtures::avatar(fixtures::AVATAR, fixtures::AGENT);
        let (previous, output) = fixtures::snapshots(avatar);
        let mut ctx = fixtures::apply_ctx(&previous, &output);
        let relayer = Address::new([0x99; 20]);
        ctx.signer = relayer;

        let records = hack_and_slash(&ctx, fixtures::AVATAR, 3).unwrap_or_default();
        let agents: Vec<_> = records
            .iter()
            .filter_map(|r| match r {
                Record::Agent(row) => Some(row.address),
                _ => None,
            })
            .collect();
        assert_eq!(agents, vec![relayer, fixtures::AGENT]);
        assert!(matches!(
            records.last(),
            Some(Record::HackAndSlash(row)) if row.agent_address == relayer
        ));
    }
}
