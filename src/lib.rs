//! # facdoc
//!
//! Factory property listing service with weighted similar-listing
//! recommendations.
//!
//! A brokerage registers factory offers and requests (sale, purchase,
//! lease) and, for any listing, asks which other listings resemble it.
//! Candidates are scored on ten weighted factors (industry, area, price,
//! region and so on, 128 points in total) and the best matches are
//! returned with a per-factor breakdown.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! facdoc hash-password 'shared secret'
//! FACDOC_PASSWORD_HASH='<bcrypt hash>' facdoc --port 5000 --static-dir ./public
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use facdoc::prelude::*;
//!
//! let store = StorageManager::in_memory();
//! let base = store.get_by_id(1).unwrap();
//! let candidates = store.get_all_except(base.id).unwrap();
//!
//! for rec in Recommender::default().recommend(&base, candidates) {
//!     println!("{} {} {}", rec.listing.company_name, rec.score, rec.breakdown);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `facdoc-core` - Listing records, search filters and the store contract
//! - `facdoc-similarity` - Factor scoring, ranking and result statistics
//! - `facdoc-storage` - In-memory table backed by LMDB
//! - `facdoc-api` - REST API and the shared-password gate

pub use facdoc_core::{
    Error, Filter, FilterCondition, Listing, ListingFilter, ListingId, ListingStore, NewListing,
    Result, SearchParams, TransactionType,
};

pub use facdoc_similarity::{
    score, Factor, Recommendation, RecommendationResponse, Recommender, ScoreCard,
    SimilarityStats,
};

pub use facdoc_storage::StorageManager;

pub use facdoc_api::{ApiConfig, AppState, PasswordGate, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, Factor, Filter, Listing, ListingId, ListingStore, NewListing, Recommender,
        Result, SearchParams, StorageManager, TransactionType,
    };
}
