pub mod manager;
pub mod lmdb_storage;

pub use manager::StorageManager;
pub use lmdb_storage::LmdbStorage;
