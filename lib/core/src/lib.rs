//! # facdoc Core
//!
//! Core library for the facdoc listing service.
//!
//! This crate provides the shared data model and contracts:
//!
//! - [`Listing`] - A stored factory property offer or request
//! - [`NewListing`] - Validated creation payload
//! - [`SearchParams`] / [`ListingFilter`] - Listing search conditions
//! - [`ListingStore`] - The store contract used by the API and engine callers
//!
//! ## Example
//!
//! ```rust
//! use facdoc_core::{Filter, SearchParams, TransactionType};
//!
//! let params = SearchParams {
//!     transaction_type: Some(TransactionType::Sale),
//!     min_area: Some(500.0),
//!     ..Default::default()
//! };
//! let filter = params.to_filter();
//! # let _ = &filter as &dyn Filter;
//! ```

pub mod error;
pub mod filter;
pub mod listing;
pub mod serde_utils;
pub mod store;

pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, ListingFilter, NumericField, SearchParams, TextField};
pub use listing::{price_per_sqm, Listing, ListingId, NewListing, TransactionType};
pub use store::ListingStore;
