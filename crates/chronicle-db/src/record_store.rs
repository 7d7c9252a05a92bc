//! `PostgreSQL` implementation of [`RecordStore`].
//!
//! Each flush writes one kind's records in a single transaction. Within the
//! transaction records are inserted in chunks of `batch_size`, one
//! multi-row `INSERT ... SELECT * FROM UNNEST(...)` per chunk.
//!
//! `avatars` and `equipments` are upserted so the latest profile and item
//! state win. Every other table keeps the first row written for a key, which
//! makes replayed events harmless.

use chrono::{DateTime, Utc};
use chronicle_types::{
    Address, AgentRow, AvatarRow, ClaimStakeRewardRow, CombinationConsumableRow,
    CombinationEquipmentRow, EquipmentRow, HackAndSlashRow, ItemEnhancementRow,
    MigrateMonsterCollectionRow, Record, RecordKind, ShopHistoryConsumableRow,
    ShopHistoryCostumeRow, ShopHistoryEquipmentRow, ShopHistoryMaterialRow, ShopTrade, StakeRow,
};
use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::error::DbError;
use crate::store::RecordStore;

/// Default number of rows per `INSERT` statement.
const DEFAULT_BATCH_SIZE: usize = 500;

/// Mirror store backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
    batch_size: usize,
}

impl PgRecordStore {
    /// Create a store over a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the number of rows per `INSERT` statement (at least one).
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

impl RecordStore for PgRecordStore {
    async fn write_batch(&self, kind: RecordKind, records: &[Record]) -> Result<u64, DbError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written: u64 = 0;
        for chunk in records.chunks(self.batch_size) {
            let affected = insert_chunk(&mut tx, kind, chunk).await?;
            written = written.saturating_add(affected);
        }
        tx.commit().await?;

        tracing::debug!(
            table = kind.table(),
            count = records.len(),
            written,
            "Wrote records (batch UNNEST)"
        );
        Ok(written)
    }

    async fn delete(&self, kind: RecordKind, key: &str) -> Result<u64, DbError> {
        if !kind.supports_delete() {
            return Err(DbError::UnsupportedDelete(kind));
        }
        let id = Uuid::parse_str(key).map_err(|_parse| DbError::InvalidKey {
            kind,
            key: key.to_owned(),
        })?;
        let column = if kind == RecordKind::Equipment {
            "item_id"
        } else {
            "id"
        };
        let sql = format!("DELETE FROM {} WHERE {column} = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        tracing::debug!(table = kind.table(), key, removed = result.rows_affected(), "Deleted record");
        Ok(result.rows_affected())
    }
}

async fn insert_chunk(
    conn: &mut PgConnection,
    kind: RecordKind,
    chunk: &[Record],
) -> Result<u64, DbError> {
    match kind {
        RecordKind::Agent => insert_agents(conn, &typed(kind, chunk, as_agent)?).await,
        RecordKind::Avatar => insert_avatars(conn, &typed(kind, chunk, as_avatar)?).await,
        RecordKind::HackAndSlash => {
            insert_hack_and_slashes(conn, &typed(kind, chunk, as_hack_and_slash)?).await
        }
        RecordKind::CombinationConsumable => {
            insert_combination_consumables(conn, &typed(kind, chunk, as_combination_consumable)?)
                .await
        }
        RecordKind::CombinationEquipment => {
            insert_combination_equipments(conn, &typed(kind, chunk, as_combination_equipment)?)
                .await
        }
        RecordKind::ItemEnhancement => {
            insert_item_enhancements(conn, &typed(kind, chunk, as_item_enhancement)?).await
        }
        RecordKind::ShopHistoryEquipment => {
            insert_shop_equipments(conn, &typed(kind, chunk, as_shop_equipment)?).await
        }
        RecordKind::ShopHistoryCostume => {
            insert_shop_costumes(conn, &typed(kind, chunk, as_shop_costume)?).await
        }
        RecordKind::ShopHistoryMaterial => {
            insert_shop_materials(conn, &typed(kind, chunk, as_shop_material)?).await
        }
        RecordKind::ShopHistoryConsumable => {
            insert_shop_consumables(conn, &typed(kind, chunk, as_shop_consumable)?).await
        }
        RecordKind::Equipment => insert_equipments(conn, &typed(kind, chunk, as_equipment)?).await,
        RecordKind::Stake => insert_stakings(conn, &typed(kind, chunk, as_stake)?).await,
        RecordKind::ClaimStakeReward => {
            insert_claim_stake_rewards(conn, &typed(kind, chunk, as_claim)?).await
        }
        RecordKind::MigrateMonsterCollection => {
            insert_migrations(conn, &typed(kind, chunk, as_migration)?).await
        }
    }
}

// =============================================================================
// Record narrowing
// =============================================================================

fn typed<'r, T>(
    kind: RecordKind,
    chunk: &'r [Record],
    pick: fn(&Record) -> Option<&T>,
) -> Result<Vec<&'r T>, DbError> {
    chunk
        .iter()
        .map(|record| {
            pick(record).ok_or(DbError::KindMismatch {
                expected: kind,
                found: record.kind(),
            })
        })
        .collect()
}

const fn as_agent(r: &Record) -> Option<&AgentRow> {
    if let Record::Agent(row) = r { Some(row) } else { None }
}

const fn as_avatar(r: &Record) -> Option<&AvatarRow> {
    if let Record::Avatar(row) = r { Some(row) } else { None }
}

const fn as_hack_and_slash(r: &Record) -> Option<&HackAndSlashRow> {
    if let Record::HackAndSlash(row) = r { Some(row) } else { None }
}

const fn as_combination_consumable(r: &Record) -> Option<&CombinationConsumableRow> {
    if let Record::CombinationConsumable(row) = r { Some(row) } else { None }
}

const fn as_combination_equipment(r: &Record) -> Option<&CombinationEquipmentRow> {
    if let Record::CombinationEquipment(row) = r { Some(row) } else { None }
}

const fn as_item_enhancement(r: &Record) -> Option<&ItemEnhancementRow> {
    if let Record::ItemEnhancement(row) = r { Some(row) } else { None }
}

fn as_shop_equipment(r: &Record) -> Option<&ShopHistoryEquipmentRow> {
    if let Record::ShopHistoryEquipment(row) = r { Some(row) } else { None }
}

fn as_shop_costume(r: &Record) -> Option<&ShopHistoryCostumeRow> {
    if let Record::ShopHistoryCostume(row) = r { Some(row) } else { None }
}

const fn as_shop_material(r: &Record) -> Option<&ShopHistoryMaterialRow> {
    if let Record::ShopHistoryMaterial(row) = r { Some(row) } else { None }
}

fn as_shop_consumable(r: &Record) -> Option<&ShopHistoryConsumableRow> {
    if let Record::ShopHistoryConsumable(row) = r { Some(row) } else { None }
}

const fn as_equipment(r: &Record) -> Option<&EquipmentRow> {
    if let Record::Equipment(row) = r { Some(row) } else { None }
}

const fn as_stake(r: &Record) -> Option<&StakeRow> {
    if let Record::Stake(row) = r { Some(row) } else { None }
}

const fn as_claim(r: &Record) -> Option<&ClaimStakeRewardRow> {
    if let Record::ClaimStakeReward(row) = r { Some(row) } else { None }
}

const fn as_migration(r: &Record) -> Option<&MigrateMonsterCollectionRow> {
    if let Record::MigrateMonsterCollection(row) = r { Some(row) } else { None }
}

// =============================================================================
// Column conversions
// =============================================================================

fn hex(address: Address) -> String {
    address.to_hex()
}

fn bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// =============================================================================
// Parents
// =============================================================================

async fn insert_agents(conn: &mut PgConnection, rows: &[&AgentRow]) -> Result<u64, DbError> {
    let addresses: Vec<String> = rows.iter().map(|r| hex(r.address)).collect();

    let result = sqlx::query(
        r"INSERT INTO agents (address)
          SELECT * FROM UNNEST($1::TEXT[])
          ON CONFLICT (address) DO NOTHING",
    )
    .bind(&addresses)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn insert_avatars(conn: &mut PgConnection, rows: &[&AvatarRow]) -> Result<u64, DbError> {
    let len = rows.len();
    let mut addresses = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut names = Vec::with_capacity(len);
    let mut levels = Vec::with_capacity(len);
    let mut title_ids: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut armor_ids = Vec::with_capacity(len);
    let mut cps = Vec::with_capacity(len);
    let mut timestamps = Vec::with_capacity(len);

    for row in rows {
        addresses.push(hex(row.address));
        agents.push(hex(row.agent_address));
        names.push(row.name.clone());
        levels.push(row.avatar_level);
        title_ids.push(row.title_id);
        armor_ids.push(row.armor_id);
        cps.push(row.cp);
        timestamps.push(row.timestamp);
    }

    let result = sqlx::query(
        r"INSERT INTO avatars (address, agent_address, name, avatar_level, title_id, armor_id, cp, timestamp)
          SELECT * FROM UNNEST($1::TEXT[], $2::TEXT[], $3::TEXT[], $4::INT[], $5::INT[], $6::INT[], $7::INT[], $8::TIMESTAMPTZ[])
          ON CONFLICT (address) DO UPDATE SET
              agent_address = EXCLUDED.agent_address,
              name = EXCLUDED.name,
              avatar_level = EXCLUDED.avatar_level,
              title_id = EXCLUDED.title_id,
              armor_id = EXCLUDED.armor_id,
              cp = EXCLUDED.cp,
              timestamp = EXCLUDED.timestamp",
    )
    .bind(&addresses)
    .bind(&agents)
    .bind(&names)
    .bind(&levels)
    .bind(&title_ids)
    .bind(&armor_ids)
    .bind(&cps)
    .bind(&timestamps)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

// =============================================================================
// Action rows
// =============================================================================

async fn insert_hack_and_slashes(
    conn: &mut PgConnection,
    rows: &[&HackAndSlashRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut avatars = Vec::with_capacity(len);
    let mut stage_ids = Vec::with_capacity(len);
    let mut cleared = Vec::with_capacity(len);
    let mut mimisbrunnr = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        agents.push(hex(row.agent_address));
        avatars.push(hex(row.avatar_address));
        stage_ids.push(row.stage_id);
        cleared.push(row.cleared);
        mimisbrunnr.push(row.mimisbrunnr);
        blocks.push(bigint(row.block_index));
    }

    let result = sqlx::query(
        r"INSERT INTO hack_and_slashes (id, agent_address, avatar_address, stage_id, cleared, mimisbrunnr, block_index)
          SELECT * FROM UNNEST($1::UUID[], $2::TEXT[], $3::TEXT[], $4::INT[], $5::BOOLEAN[], $6::BOOLEAN[], $7::BIGINT[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&agents)
    .bind(&avatars)
    .bind(&stage_ids)
    .bind(&cleared)
    .bind(&mimisbrunnr)
    .bind(&blocks)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn insert_combination_consumables(
    conn: &mut PgConnection,
    rows: &[&CombinationConsumableRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut avatars = Vec::with_capacity(len);
    let mut recipe_ids = Vec::with_capacity(len);
    let mut slots = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        agents.push(hex(row.agent_address));
        avatars.push(hex(row.avatar_address));
        recipe_ids.push(row.recipe_id);
        slots.push(row.slot_index);
        blocks.push(bigint(row.block_index));
    }

    let result = sqlx::query(
        r"INSERT INTO combination_consumables (id, agent_address, avatar_address, recipe_id, slot_index, block_index)
          SELECT * FROM UNNEST($1::UUID[], $2::TEXT[], $3::TEXT[], $4::INT[], $5::INT[], $6::BIGINT[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&agents)
    .bind(&avatars)
    .bind(&recipe_ids)
    .bind(&slots)
    .bind(&blocks)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn insert_combination_equipments(
    conn: &mut PgConnection,
    rows: &[&CombinationEquipmentRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut avatars = Vec::with_capacity(len);
    let mut recipe_ids = Vec::with_capacity(len);
    let mut slots = Vec::with_capacity(len);
    let mut sub_recipe_ids = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        agents.push(hex(row.agent_address));
        avatars.push(hex(row.avatar_address));
        recipe_ids.push(row.recipe_id);
        slots.push(row.slot_index);
        sub_recipe_ids.push(row.sub_recipe_id);
        blocks.push(bigint(row.block_index));
    }

    let result = sqlx::query(
        r"INSERT INTO combination_equipments (id, agent_address, avatar_address, recipe_id, slot_index, sub_recipe_id, block_index)
          SELECT * FROM UNNEST($1::UUID[], $2::TEXT[], $3::TEXT[], $4::INT[], $5::INT[], $6::INT[], $7::BIGINT[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&agents)
    .bind(&avatars)
    .bind(&recipe_ids)
    .bind(&slots)
    .bind(&sub_recipe_ids)
    .bind(&blocks)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn insert_item_enhancements(
    conn: &mut PgConnection,
    rows: &[&ItemEnhancementRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut avatars = Vec::with_capacity(len);
    let mut item_ids = Vec::with_capacity(len);
    let mut material_ids = Vec::with_capacity(len);
    let mut slots = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        agents.push(hex(row.agent_address));
        avatars.push(hex(row.avatar_address));
        item_ids.push(row.item_id.into_inner());
        material_ids.push(row.material_id.into_inner());
        slots.push(row.slot_index);
        blocks.push(bigint(row.block_index));
    }

    let result = sqlx::query(
        r"INSERT INTO item_enhancements (id, agent_address, avatar_address, item_id, material_id, slot_index, block_index)
          SELECT * FROM UNNEST($1::UUID[], $2::TEXT[], $3::TEXT[], $4::UUID[], $5::UUID[], $6::INT[], $7::BIGINT[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&agents)
    .bind(&avatars)
    .bind(&item_ids)
    .bind(&material_ids)
    .bind(&slots)
    .bind(&blocks)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

// =============================================================================
// Shop history
// =============================================================================

/// Columns shared by every shop-history table, bound as `$1..$13`.
#[derive(Default)]
struct TradeColumns {
    order_ids: Vec<Uuid>,
    blocks: Vec<i64>,
    item_ids: Vec<String>,
    sellers: Vec<String>,
    buyers: Vec<String>,
    prices: Vec<Decimal>,
    item_types: Vec<String>,
    item_sub_types: Vec<String>,
    sheet_ids: Vec<i32>,
    grades: Vec<i32>,
    elemental_types: Vec<String>,
    item_counts: Vec<i32>,
    timestamps: Vec<DateTime<Utc>>,
}

impl TradeColumns {
    fn push(&mut self, trade: &ShopTrade) {
        self.order_ids.push(trade.order_id.into_inner());
        self.blocks.push(bigint(trade.block_index));
        self.item_ids.push(trade.item_id.clone());
        self.sellers.push(hex(trade.seller_avatar_address));
        self.buyers.push(hex(trade.buyer_avatar_address));
        self.prices.push(trade.price);
        self.item_types.push(trade.item_type.as_str().to_owned());
        self.item_sub_types.push(trade.item_sub_type.as_str().to_owned());
        self.sheet_ids.push(trade.id);
        self.grades.push(trade.grade);
        self.elemental_types.push(trade.elemental_type.as_str().to_owned());
        self.item_counts.push(trade.item_count);
        self.timestamps.push(trade.timestamp);
    }

    fn bind<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(&self.order_ids)
            .bind(&self.blocks)
            .bind(&self.item_ids)
            .bind(&self.sellers)
            .bind(&self.buyers)
            .bind(&self.prices)
            .bind(&self.item_types)
            .bind(&self.item_sub_types)
            .bind(&self.sheet_ids)
            .bind(&self.grades)
            .bind(&self.elemental_types)
            .bind(&self.item_counts)
            .bind(&self.timestamps)
    }
}

async fn insert_shop_equipments(
    conn: &mut PgConnection,
    rows: &[&ShopHistoryEquipmentRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut trades = TradeColumns::default();
    let mut buff_skills = Vec::with_capacity(len);
    let mut set_ids = Vec::with_capacity(len);
    let mut skills = Vec::with_capacity(len);
    let mut spine_paths = Vec::with_capacity(len);
    let mut required_blocks = Vec::with_capacity(len);
    let mut non_fungible_ids = Vec::with_capacity(len);
    let mut tradable_ids = Vec::with_capacity(len);
    let mut unique_stats = Vec::with_capacity(len);

    for row in rows {
        trades.push(&row.trade);
        buff_skills.push(int(row.buff_skill_count));
        set_ids.push(row.set_id);
        skills.push(int(row.skills_count));
        spine_paths.push(row.spine_resource_path.clone());
        required_blocks.push(bigint(row.required_block_index));
        non_fungible_ids.push(row.non_fungible_id.into_inner());
        tradable_ids.push(row.tradable_id.into_inner());
        unique_stats.push(row.unique_stat_type.as_str().to_owned());
    }

    let query = sqlx::query(
        r"INSERT INTO shop_history_equipments (order_id, block_index, item_id, seller_avatar_address, buyer_avatar_address, price, item_type, item_sub_type, sheet_id, grade, elemental_type, item_count, timestamp, buff_skill_count, set_id, skills_count, spine_resource_path, required_block_index, non_fungible_id, tradable_id, unique_stat_type)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::TEXT[], $5::TEXT[], $6::NUMERIC[], $7::TEXT[], $8::TEXT[], $9::INT[], $10::INT[], $11::TEXT[], $12::INT[], $13::TIMESTAMPTZ[], $14::INT[], $15::INT[], $16::INT[], $17::TEXT[], $18::BIGINT[], $19::UUID[], $20::UUID[], $21::TEXT[])
          ON CONFLICT (order_id) DO NOTHING",
    );
    let result = trades
        .bind(query)
        .bind(&buff_skills)
        .bind(&set_ids)
        .bind(&skills)
        .bind(&spine_paths)
        .bind(&required_blocks)
        .bind(&non_fungible_ids)
        .bind(&tradable_ids)
        .bind(&unique_stats)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

async fn insert_shop_costumes(
    conn: &mut PgConnection,
    rows: &[&ShopHistoryCostumeRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut trades = TradeColumns::default();
    let mut equipped = Vec::with_capacity(len);
    let mut spine_paths = Vec::with_capacity(len);
    let mut required_blocks = Vec::with_capacity(len);
    let mut non_fungible_ids = Vec::with_capacity(len);
    let mut tradable_ids = Vec::with_capacity(len);

    for row in rows {
        trades.push(&row.trade);
        equipped.push(row.equipped);
        spine_paths.push(row.spine_resource_path.clone());
        required_blocks.push(bigint(row.required_block_index));
        non_fungible_ids.push(row.non_fungible_id.into_inner());
        tradable_ids.push(row.tradable_id.into_inner());
    }

    let query = sqlx::query(
        r"INSERT INTO shop_history_costumes (order_id, block_index, item_id, seller_avatar_address, buyer_avatar_address, price, item_type, item_sub_type, sheet_id, grade, elemental_type, item_count, timestamp, equipped, spine_resource_path, required_block_index, non_fungible_id, tradable_id)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::TEXT[], $5::TEXT[], $6::NUMERIC[], $7::TEXT[], $8::TEXT[], $9::INT[], $10::INT[], $11::TEXT[], $12::INT[], $13::TIMESTAMPTZ[], $14::BOOLEAN[], $15::TEXT[], $16::BIGINT[], $17::UUID[], $18::UUID[])
          ON CONFLICT (order_id) DO NOTHING",
    );
    let result = trades
        .bind(query)
        .bind(&equipped)
        .bind(&spine_paths)
        .bind(&required_blocks)
        .bind(&non_fungible_ids)
        .bind(&tradable_ids)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

async fn insert_shop_materials(
    conn: &mut PgConnection,
    rows: &[&ShopHistoryMaterialRow],
) -> Result<u64, DbError> {
    let mut trades = TradeColumns::default();
    for row in rows {
        trades.push(&row.trade);
    }

    let query = sqlx::query(
        r"INSERT INTO shop_history_materials (order_id, block_index, item_id, seller_avatar_address, buyer_avatar_address, price, item_type, item_sub_type, sheet_id, grade, elemental_type, item_count, timestamp)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::TEXT[], $5::TEXT[], $6::NUMERIC[], $7::TEXT[], $8::TEXT[], $9::INT[], $10::INT[], $11::TEXT[], $12::INT[], $13::TIMESTAMPTZ[])
          ON CONFLICT (order_id) DO NOTHING",
    );
    let result = trades.bind(query).execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

async fn insert_shop_consumables(
    conn: &mut PgConnection,
    rows: &[&ShopHistoryConsumableRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut trades = TradeColumns::default();
    let mut buff_skills = Vec::with_capacity(len);
    let mut skills = Vec::with_capacity(len);
    let mut required_blocks = Vec::with_capacity(len);
    let mut non_fungible_ids = Vec::with_capacity(len);
    let mut tradable_ids = Vec::with_capacity(len);
    let mut main_stats = Vec::with_capacity(len);

    for row in rows {
        trades.push(&row.trade);
        buff_skills.push(int(row.buff_skill_count));
        skills.push(int(row.skills_count));
        required_blocks.push(bigint(row.required_block_index));
        non_fungible_ids.push(row.non_fungible_id.into_inner());
        tradable_ids.push(row.tradable_id.into_inner());
        main_stats.push(row.main_stat.as_str().to_owned());
    }

    let query = sqlx::query(
        r"INSERT INTO shop_history_consumables (order_id, block_index, item_id, seller_avatar_address, buyer_avatar_address, price, item_type, item_sub_type, sheet_id, grade, elemental_type, item_count, timestamp, buff_skill_count, skills_count, required_block_index, non_fungible_id, tradable_id, main_stat)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::TEXT[], $5::TEXT[], $6::NUMERIC[], $7::TEXT[], $8::TEXT[], $9::INT[], $10::INT[], $11::TEXT[], $12::INT[], $13::TIMESTAMPTZ[], $14::INT[], $15::INT[], $16::BIGINT[], $17::UUID[], $18::UUID[], $19::TEXT[])
          ON CONFLICT (order_id) DO NOTHING",
    );
    let result = trades
        .bind(query)
        .bind(&buff_skills)
        .bind(&skills)
        .bind(&required_blocks)
        .bind(&non_fungible_ids)
        .bind(&tradable_ids)
        .bind(&main_stats)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

// =============================================================================
// Equipment
// =============================================================================

async fn insert_equipments(
    conn: &mut PgConnection,
    rows: &[&EquipmentRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut item_ids = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut avatars = Vec::with_capacity(len);
    let mut equipment_ids = Vec::with_capacity(len);
    let mut cps = Vec::with_capacity(len);
    let mut levels = Vec::with_capacity(len);
    let mut sub_types = Vec::with_capacity(len);

    for row in rows {
        item_ids.push(row.item_id.into_inner());
        agents.push(hex(row.agent_address));
        avatars.push(hex(row.avatar_address));
        equipment_ids.push(row.equipment_id);
        cps.push(row.cp);
        levels.push(row.level);
        sub_types.push(row.item_sub_type.as_str().to_owned());
    }

    let result = sqlx::query(
        r"INSERT INTO equipments (item_id, agent_address, avatar_address, equipment_id, cp, level, item_sub_type)
          SELECT * FROM UNNEST($1::UUID[], $2::TEXT[], $3::TEXT[], $4::INT[], $5::INT[], $6::INT[], $7::TEXT[])
          ON CONFLICT (item_id) DO UPDATE SET
              agent_address = EXCLUDED.agent_address,
              avatar_address = EXCLUDED.avatar_address,
              equipment_id = EXCLUDED.equipment_id,
              cp = EXCLUDED.cp,
              level = EXCLUDED.level,
              item_sub_type = EXCLUDED.item_sub_type",
    )
    .bind(&item_ids)
    .bind(&agents)
    .bind(&avatars)
    .bind(&equipment_ids)
    .bind(&cps)
    .bind(&levels)
    .bind(&sub_types)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

// =============================================================================
// Staking
// =============================================================================

async fn insert_stakings(conn: &mut PgConnection, rows: &[&StakeRow]) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut previous = Vec::with_capacity(len);
    let mut new_amounts = Vec::with_capacity(len);
    let mut remaining = Vec::with_capacity(len);
    let mut prev_starts = Vec::with_capacity(len);
    let mut new_starts = Vec::with_capacity(len);
    let mut timestamps = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        blocks.push(bigint(row.block_index));
        agents.push(hex(row.agent_address));
        previous.push(row.previous_amount);
        new_amounts.push(row.new_amount);
        remaining.push(row.remaining_ncg);
        prev_starts.push(bigint(row.prev_stake_start_block_index));
        new_starts.push(bigint(row.new_stake_start_block_index));
        timestamps.push(row.timestamp);
    }

    let result = sqlx::query(
        r"INSERT INTO stakings (id, block_index, agent_address, previous_amount, new_amount, remaining_ncg, prev_stake_start_block_index, new_stake_start_block_index, timestamp)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::NUMERIC[], $5::NUMERIC[], $6::NUMERIC[], $7::BIGINT[], $8::BIGINT[], $9::TIMESTAMPTZ[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&blocks)
    .bind(&agents)
    .bind(&previous)
    .bind(&new_amounts)
    .bind(&remaining)
    .bind(&prev_starts)
    .bind(&new_starts)
    .bind(&timestamps)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn insert_claim_stake_rewards(
    conn: &mut PgConnection,
    rows: &[&ClaimStakeRewardRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut avatars = Vec::with_capacity(len);
    let mut hourglasses = Vec::with_capacity(len);
    let mut ap_potions = Vec::with_capacity(len);
    let mut starts = Vec::with_capacity(len);
    let mut ends = Vec::with_capacity(len);
    let mut timestamps = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        blocks.push(bigint(row.block_index));
        agents.push(hex(row.agent_address));
        avatars.push(hex(row.claim_reward_avatar_address));
        hourglasses.push(row.hourglass_count);
        ap_potions.push(row.ap_potion_count);
        starts.push(bigint(row.claim_stake_start_block_index));
        ends.push(bigint(row.claim_stake_end_block_index));
        timestamps.push(row.timestamp);
    }

    let result = sqlx::query(
        r"INSERT INTO claim_stake_rewards (id, block_index, agent_address, claim_reward_avatar_address, hourglass_count, ap_potion_count, claim_stake_start_block_index, claim_stake_end_block_index, timestamp)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::TEXT[], $5::BIGINT[], $6::BIGINT[], $7::BIGINT[], $8::BIGINT[], $9::TIMESTAMPTZ[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&blocks)
    .bind(&agents)
    .bind(&avatars)
    .bind(&hourglasses)
    .bind(&ap_potions)
    .bind(&starts)
    .bind(&ends)
    .bind(&timestamps)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn insert_migrations(
    conn: &mut PgConnection,
    rows: &[&MigrateMonsterCollectionRow],
) -> Result<u64, DbError> {
    let len = rows.len();
    let mut ids = Vec::with_capacity(len);
    let mut blocks = Vec::with_capacity(len);
    let mut agents = Vec::with_capacity(len);
    let mut amounts = Vec::with_capacity(len);
    let mut migration_starts = Vec::with_capacity(len);
    let mut stake_starts = Vec::with_capacity(len);
    let mut timestamps = Vec::with_capacity(len);

    for row in rows {
        ids.push(row.id.into_inner());
        blocks.push(bigint(row.block_index));
        agents.push(hex(row.agent_address));
        amounts.push(row.migration_amount);
        migration_starts.push(bigint(row.migration_start_block_index));
        stake_starts.push(bigint(row.stake_start_block_index));
        timestamps.push(row.timestamp);
    }

    let result = sqlx::query(
        r"INSERT INTO migrate_monster_collections (id, block_index, agent_address, migration_amount, migration_start_block_index, stake_start_block_index, timestamp)
          SELECT * FROM UNNEST($1::UUID[], $2::BIGINT[], $3::TEXT[], $4::NUMERIC[], $5::BIGINT[], $6::BIGINT[], $7::TIMESTAMPTZ[])
          ON CONFLICT (id) DO NOTHING",
    )
    .bind(&ids)
    .bind(&blocks)
    .bind(&agents)
    .bind(&amounts)
    .bind(&migration_starts)
    .bind(&stake_starts)
    .bind(&timestamps)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
