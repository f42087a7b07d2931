// LMDB-backed listing persistence
use anyhow::Result;
use heed::byteorder::BE;
use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

const DB_LISTINGS: &str = "listings";
const DB_META: &str = "meta";
const KEY_NEXT_ID: &str = "next_id";

pub struct LmdbStorage {
    env: Arc<Env>,
    listings_db: Database<U64<BE>, Bytes>,
    meta_db: Database<Str, U64<BE>>,
}

impl LmdbStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        let env = Arc::new(
            unsafe {
                EnvOpenOptions::new()
                    .map_size(1024 * 1024 * 1024) // 1GB
                    .max_dbs(4)
                    .open(path)?
            }
        );

        let mut wtxn = env.write_txn()?;

        let listings_db = env
            .create_database(&mut wtxn, Some(DB_LISTINGS))?;

        let meta_db = env
            .create_database(&mut wtxn, Some(DB_META))?;

        wtxn.commit()?;

        Ok(Self {
            env,
            listings_db,
            meta_db,
        })
    }

    /// Write a listing and the id counter in one transaction
    pub fn insert_listing(&self, id: u64, data: &[u8], next_id: u64) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.listings_db.put(&mut wtxn, &id, data)?;
        self.meta_db.put(&mut wtxn, KEY_NEXT_ID, &next_id)?;
        wtxn.commit()?;
        Ok(())
    }

    pub fn delete_listing(&self, id: u64) -> Result<bool> {
        let mut wtxn = self.env.write_txn()?;
        let existed = self.listings_db.delete(&mut wtxn, &id)?;
        wtxn.commit()?;
        Ok(existed)
    }

    /// All stored listings in ascending id order
    pub fn list_listings(&self) -> Result<Vec<(u64, Vec<u8>)>> {
        let rtxn = self.env.read_txn()?;
        let mut listings = Vec::new();
        for result in self.listings_db.iter(&rtxn)? {
            let (id, data) = result?;
            listings.push((id, data.to_vec()));
        }
        Ok(listings)
    }

    pub fn next_id(&self) -> Result<Option<u64>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.meta_db.get(&rtxn, KEY_NEXT_ID)?)
    }

    /// Flush buffers to disk
    pub fn sync(&self) -> Result<()> {
        self.env.force_sync()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LmdbStorage::new(dir.path()).unwrap();

        storage.insert_listing(1, b"{\"a\":1}", 2).unwrap();
        assert_eq!(storage.list_listings().unwrap(), vec![(1, b"{\"a\":1}".to_vec())]);
        assert_eq!(storage.next_id().unwrap(), Some(2));

        assert!(storage.delete_listing(1).unwrap());
        assert!(!storage.delete_listing(1).unwrap());
        assert!(storage.list_listings().unwrap().is_empty());
        assert_eq!(storage.next_id().unwrap(), Some(2));
    }

    #[test]
    fn test_list_in_id_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LmdbStorage::new(dir.path()).unwrap();

        for id in [300u64, 2, 70] {
            storage.insert_listing(id, id.to_string().as_bytes(), id + 1).unwrap();
        }

        let ids: Vec<u64> = storage.list_listings().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 70, 300]);
    }
}
