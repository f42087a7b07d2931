use chrono::Utc;
use facdoc_core::{Error, Filter, Listing, ListingId, ListingStore, NewListing, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use crate::lmdb_storage::LmdbStorage;

/// In-memory listing table and its id counter
struct ListingTable {
    rows: BTreeMap<ListingId, Listing>,
    next_id: ListingId,
}

/// Manages listings and their persistence
///
/// Reads are served from memory. When opened on a data directory every
/// mutation is committed to LMDB before the in-memory table changes.
pub struct StorageManager {
    table: RwLock<ListingTable>,
    lmdb: Option<Arc<LmdbStorage>>,
}

impl StorageManager {
    /// Volatile store, used by tests and `--in-memory` runs
    pub fn in_memory() -> Self {
        Self {
            table: RwLock::new(ListingTable {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
            lmdb: None,
        }
    }

    /// Open (or create) a persistent store under `data_dir`
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let lmdb_path = data_dir.join("lmdb");
        let lmdb = LmdbStorage::new(&lmdb_path)
            .map_err(|e| Error::Storage(e.to_string()))?;

        let mut rows = BTreeMap::new();
        for (id, data) in lmdb.list_listings().map_err(|e| Error::Storage(e.to_string()))? {
            let listing = serde_json::from_slice::<Listing>(&data).map_err(|e| {
                Error::Serialization(format!("listing {} is unreadable: {}", id, e))
            })?;
            rows.insert(id, listing);
        }

        let stored_next = lmdb.next_id().map_err(|e| Error::Storage(e.to_string()))?;
        let after_max = rows.keys().next_back().map(|id| id + 1).unwrap_or(1);
        let next_id = stored_next.unwrap_or(1).max(after_max);

        info!(listings = rows.len(), next_id, path = ?lmdb_path, "listing store loaded");

        Ok(Self {
            table: RwLock::new(ListingTable { rows, next_id }),
            lmdb: Some(Arc::new(lmdb)),
        })
    }

    #[inline]
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.lmdb.is_some()
    }

    /// Force buffered writes to disk
    pub fn flush(&self) -> Result<()> {
        if let Some(lmdb) = &self.lmdb {
            lmdb.sync().map_err(|e| Error::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

impl ListingStore for StorageManager {
    fn insert(&self, new: NewListing) -> Result<Listing> {
        let new = new.validate()?;
        let mut table = self.table.write();

        let id = table.next_id;
        let listing = Listing::create(id, new, Utc::now());

        if let Some(lmdb) = &self.lmdb {
            let data = serde_json::to_vec(&listing)?;
            lmdb.insert_listing(id, &data, id + 1)
                .map_err(|e| Error::Storage(e.to_string()))?;
        }

        table.next_id = id + 1;
        table.rows.insert(id, listing.clone());
        debug!(id, "listing inserted");
        Ok(listing)
    }

    fn get_by_id(&self, id: ListingId) -> Result<Listing> {
        self.table
            .read()
            .rows
            .get(&id)
            .cloned()
            .ok_or(Error::ListingNotFound(id))
    }

    fn get_all_except(&self, id: ListingId) -> Result<Vec<Listing>> {
        Ok(self
            .table
            .read()
            .rows
            .values()
            .filter(|listing| listing.id != id)
            .cloned()
            .collect())
    }

    fn search(&self, filter: &dyn Filter) -> Result<Vec<Listing>> {
        let mut results: Vec<Listing> = self
            .table
            .read()
            .rows
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect();

        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(results)
    }

    fn delete(&self, id: ListingId) -> Result<Listing> {
        let mut table = self.table.write();
        if !table.rows.contains_key(&id) {
            return Err(Error::ListingNotFound(id));
        }

        if let Some(lmdb) = &self.lmdb {
            lmdb.delete_listing(id)
                .map_err(|e| Error::Storage(e.to_string()))?;
        }

        let removed = table.rows.remove(&id).ok_or(Error::ListingNotFound(id))?;
        debug!(id, "listing deleted");
        Ok(removed)
    }

    fn count(&self) -> usize {
        self.table.read().rows.len()
    }
}
