use crate::domain::pagination::{Page, paginate};
use crate::domain::ports::{Filter, Identifiable, PaginatedStore};
use crate::error::{LoanError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for loan records, keyed by insertion sequence.
pub const CF_LOANS: &str = "loans";
/// Column Family mapping loan ids to their insertion sequence.
pub const CF_LOANS_BY_ID: &str = "loans_by_id";
/// Column Family for payment records, keyed by insertion sequence.
pub const CF_PAYMENTS: &str = "loan_payments";
/// Column Family mapping payment ids to their insertion sequence.
pub const CF_PAYMENTS_BY_ID: &str = "loan_payments_by_id";

impl From<rocksdb::Error> for LoanError {
    fn from(e: rocksdb::Error) -> Self {
        LoanError::Storage(e.to_string())
    }
}

/// Opens or creates the RocksDB instance backing both entity collections.
///
/// # Arguments
///
/// * `path` - The filesystem path where the database will be stored.
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Arc<DB>> {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);

    let descriptors = [CF_LOANS, CF_LOANS_BY_ID, CF_PAYMENTS, CF_PAYMENTS_BY_ID]
        .into_iter()
        .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

    let db = DB::open_cf_descriptors(&opts, path, descriptors)?;
    Ok(Arc::new(db))
}

/// A persistent store for one entity type.
///
/// Records live in `records_cf` as JSON under a big-endian sequence number,
/// so iteration order is insertion order. `index_cf` maps each entity id to
/// its sequence number for lookups and duplicate detection.
///
/// The mutex holds the next sequence number and serializes `add`.
pub struct RocksDbStore<T> {
    db: Arc<DB>,
    records_cf: &'static str,
    index_cf: &'static str,
    next_seq: Mutex<u64>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> RocksDbStore<T> {
    pub fn new(db: Arc<DB>, records_cf: &'static str, index_cf: &'static str) -> Result<Self> {
        let next_seq = {
            let cf = column_family(&db, records_cf)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(entry) => {
                    let (key, _) = entry?;
                    decode_seq(&key)? + 1
                }
                None => 0,
            }
        };

        Ok(Self {
            db,
            records_cf,
            index_cf,
            next_seq: Mutex::new(next_seq),
            _entity: PhantomData,
        })
    }

    fn records(&self) -> Result<&ColumnFamily> {
        column_family(&self.db, self.records_cf)
    }

    fn index(&self) -> Result<&ColumnFamily> {
        column_family(&self.db, self.index_cf)
    }
}

fn column_family<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| LoanError::Storage(format!("{name} column family not found")))
}

fn decode_seq(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LoanError::Storage("malformed sequence key".to_string()))?;
    Ok(u64::from_be_bytes(raw))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| LoanError::Storage(format!("Deserialization error: {}", e)))
}

#[async_trait]
impl<T> PaginatedStore<T> for RocksDbStore<T>
where
    T: Identifiable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn add(&self, item: T) -> Result<T> {
        let mut next_seq = self.next_seq.lock().await;
        let id_key = item.id().to_be_bytes();

        let index = self.index()?;
        if self.db.get_pinned_cf(index, id_key)?.is_some() {
            return Err(LoanError::DuplicateId(item.id()));
        }

        let value = serde_json::to_vec(&item)
            .map_err(|e| LoanError::Storage(format!("Serialization error: {}", e)))?;
        let seq_key = next_seq.to_be_bytes();

        let mut batch = rocksdb::WriteBatch::default();
        batch.put_cf(self.records()?, seq_key, value);
        batch.put_cf(index, id_key, seq_key);
        self.db.write(batch)?;

        *next_seq += 1;
        Ok(item)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<T>> {
        let Some(seq_key) = self.db.get_cf(self.index()?, id.to_be_bytes())? else {
            return Ok(None);
        };

        match self.db.get_pinned_cf(self.records()?, &seq_key)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Err(LoanError::Storage(format!(
                "index entry for id {id} points to a missing record"
            ))),
        }
    }

    async fn get_all(
        &self,
        cursor: Option<i64>,
        limit: Option<i64>,
        predicate: Option<&Filter<T>>,
    ) -> Result<Page<T>> {
        let mut items = Vec::new();
        for entry in self.db.iterator_cf(self.records()?, IteratorMode::Start) {
            let (_key, value) = entry?;
            let item: T = decode(&value)?;
            if predicate.is_none_or(|predicate| predicate(&item)) {
                items.push(item);
            }
        }

        let filtered: Vec<&T> = items.iter().collect();
        Ok(paginate(&filtered, cursor, limit))
    }
}
