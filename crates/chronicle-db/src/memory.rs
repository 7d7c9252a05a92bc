//! In-memory [`RecordStore`] used by pipeline tests and dry runs.
//!
//! Mirrors the `PostgreSQL` store's conflict rules (upsert for avatars and
//! equipment, first write wins elsewhere) and its foreign keys, so a flush
//! that writes a child before its parent fails here as it would there.
//! Individual kinds can be made to fail to exercise retry paths.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use chronicle_types::{Address, Record, RecordKind};

use crate::error::DbError;
use crate::store::RecordStore;

/// One call observed by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// A batch write.
    Write {
        /// Kind written.
        kind: RecordKind,
        /// Records in the batch.
        count: usize,
    },
    /// A single-row delete.
    Delete {
        /// Kind deleted from.
        kind: RecordKind,
        /// Key deleted.
        key: String,
    },
}

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<RecordKind, BTreeMap<String, Record>>,
    calls: Vec<StoreCall>,
    failing: BTreeSet<RecordKind>,
}

/// A [`RecordStore`] holding rows in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, DbError> {
        self.inner
            .lock()
            .map_err(|_poisoned| DbError::Memory("store mutex poisoned".to_owned()))
    }

    /// Make every later write of `kind` fail until [`MemoryStore::heal`].
    pub fn fail_kind(&self, kind: RecordKind) {
        if let Ok(mut tables) = self.lock() {
            tables.failing.insert(kind);
        }
    }

    /// Let writes of `kind` succeed again.
    pub fn heal(&self, kind: RecordKind) {
        if let Ok(mut tables) = self.lock() {
            tables.failing.remove(&kind);
        }
    }

    /// Stored rows of one kind, ordered by key.
    pub fn rows(&self, kind: RecordKind) -> Vec<Record> {
        self.lock()
            .map(|tables| {
                tables
                    .rows
                    .get(&kind)
                    .map(|table| table.values().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// The stored row of `kind` with `key`.
    pub fn get(&self, kind: RecordKind, key: &str) -> Option<Record> {
        self.lock()
            .ok()
            .and_then(|tables| tables.rows.get(&kind).and_then(|t| t.get(key)).cloned())
    }

    /// Number of stored rows of one kind.
    pub fn count(&self, kind: RecordKind) -> usize {
        self.lock()
            .map(|tables| tables.rows.get(&kind).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock()
            .map(|tables| tables.calls.clone())
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryStore {
    async fn write_batch(&self, kind: RecordKind, records: &[Record]) -> Result<u64, DbError> {
        let mut tables = self.lock()?;
        tables.calls.push(StoreCall::Write {
            kind,
            count: records.len(),
        });
        if tables.failing.contains(&kind) {
            return Err(DbError::Memory(format!("writes to {kind} are failing")));
        }

        // Validate the whole batch before touching the table.
        for record in records {
            if record.kind() != kind {
                return Err(DbError::KindMismatch {
                    expected: kind,
                    found: record.kind(),
                });
            }
            for (parent, key) in parent_keys(record) {
                let present = tables
                    .rows
                    .get(&parent)
                    .is_some_and(|table| table.contains_key(&key));
                if !present {
                    return Err(DbError::Memory(format!(
                        "{kind} row {} references missing {parent} {key}",
                        record.key()
                    )));
                }
            }
        }

        let replace = matches!(kind, RecordKind::Avatar | RecordKind::Equipment);
        let table = tables.rows.entry(kind).or_default();
        let mut written: u64 = 0;
        for record in records {
            let key = record.key();
            if replace || !table.contains_key(&key) {
                table.insert(key, record.clone());
                written = written.saturating_add(1);
            }
        }
        Ok(written)
    }

    async fn delete(&self, kind: RecordKind, key: &str) -> Result<u64, DbError> {
        let mut tables = self.lock()?;
        tables.calls.push(StoreCall::Delete {
            kind,
            key: key.to_owned(),
        });
        if !kind.supports_delete() {
            return Err(DbError::UnsupportedDelete(kind));
        }
        let removed = tables
            .rows
            .get_mut(&kind)
            .and_then(|table| table.remove(key));
        Ok(u64::from(removed.is_some()))
    }
}

/// Parent rows a record references, as `(kind, key)` pairs.
fn parent_keys(record: &Record) -> Vec<(RecordKind, String)> {
    let agent = |a: &Address| (RecordKind::Agent, a.to_hex());
    let avatar = |a: &Address| (RecordKind::Avatar, a.to_hex());
    match record {
        Record::Avatar(r) => vec![agent(&r.agent_address)],
        Record::HackAndSlash(r) => vec![agent(&r.agent_address), avatar(&r.avatar_address)],
        Record::CombinationConsumable(r) => {
            vec![agent(&r.agent_address), avatar(&r.avatar_address)]
        }
        Record::CombinationEquipment(r) => {
            vec![agent(&r.agent_address), avatar(&r.avatar_address)]
        }
        Record::ItemEnhancement(r) => vec![agent(&r.agent_address), avatar(&r.avatar_address)],
        Record::Stake(r) => vec![agent(&r.agent_address)],
        Record::ClaimStakeReward(r) => vec![
            agent(&r.agent_address),
            avatar(&r.claim_reward_avatar_address),
        ],
        Record::MigrateMonsterCollection(r) => vec![agent(&r.agent_address)],
        Record::Agent(_)
        | Record::ShopHistoryEquipment(_)
        | Record::ShopHistoryCostume(_)
        | Record::ShopHistoryMaterial(_)
        | Record::ShopHistoryConsumable(_)
        | Record::Equipment(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::{ActionId, AgentRow, HackAndSlashRow};

    fn agent(byte: u8) -> Record {
        Record::Agent(AgentRow {
            address: Address::new([byte; 20]),
        })
    }

    fn battle(agent_byte: u8, avatar_byte: u8) -> Record {
        Record::HackAndSlash(HackAndSlashRow {
            id: ActionId::new(),
            agent_address: Address::new([agent_byte; 20]),
            avatar_address: Address::new([avatar_byte; 20]),
            stage_id: 1,
            cleared: true,
            mimisbrunnr: false,
            block_index: 3,
        })
    }

    #[tokio::test]
    async fn child_without_parent_is_rejected() {
        let store = MemoryStore::new();
        let result = store
            .write_batch(RecordKind::HackAndSlash, &[battle(1, 2)])
            .await;
        assert!(matches!(result, Err(DbError::Memory(_))));
        assert_eq!(store.count(RecordKind::HackAndSlash), 0);
    }

    #[tokio::test]
    async fn agents_keep_first_write() {
        let store = MemoryStore::new();
        let first = store.write_batch(RecordKind::Agent, &[agent(1)]).await;
        let again = store.write_batch(RecordKind::Agent, &[agent(1)]).await;
        assert_eq!(first.ok(), Some(1));
        assert_eq!(again.ok(), Some(0));
        assert_eq!(store.count(RecordKind::Agent), 1);
    }

    #[tokio::test]
    async fn failing_kind_records_the_call() {
        let store = MemoryStore::new();
        store.fail_kind(RecordKind::Agent);
        assert!(store.write_batch(RecordKind::Agent, &[agent(1)]).await.is_err());
        store.heal(RecordKind::Agent);
        assert!(store.write_batch(RecordKind::Agent, &[agent(1)]).await.is_ok());
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Write {
                    kind: RecordKind::Agent,
                    count: 1
                },
                StoreCall::Write {
                    kind: RecordKind::Agent,
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn delete_rejects_parent_kinds() {
        let store = MemoryStore::new();
        let result = store.delete(RecordKind::Avatar, "00").await;
        assert!(matches!(
            result,
            Err(DbError::UnsupportedDelete(RecordKind::Avatar))
        ));
    }

    #[tokio::test]
    async fn delete_of_absent_row_removes_nothing() {
        let store = MemoryStore::new();
        let key = ActionId::new().to_string();
        let result = store.delete(RecordKind::HackAndSlash, &key).await;
        assert_eq!(result.ok(), Some(0));
    }
}
