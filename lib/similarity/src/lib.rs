//! # facdoc Similarity
//!
//! Weighted "similar listings" recommendation engine.
//!
//! Given a base listing and every other listing, each candidate earns the
//! full weight of every factor it satisfies:
//!
//! | Factor | Weight | Condition |
//! |---|---|---|
//! | Industry | 35 | same non-empty industry |
//! | Area | 25 | relative area difference < 30% |
//! | Price | 20 | relative price difference < 30% |
//! | Region | 15 | address contains the base address's first token |
//! | Transaction type | 10 | same transaction type |
//! | Floors | 8 | floor counts within 2 (absent counts as 0) |
//! | Hoists | 5 | same hoist count, present on the candidate |
//! | Electrical power | 5 | relative power difference < 20% |
//! | Trucks | 3 | same truck count, present on the candidate |
//! | Product | 2 | product contains the non-empty base product |
//!
//! Candidates are ranked by score with ties kept in input order and the
//! top results are returned with a readable breakdown.
//!
//! ## Example
//!
//! ```rust,ignore
//! use facdoc_similarity::{Recommender, RecommendationResponse};
//!
//! let candidates = store.get_all_except(base.id)?;
//! let candidates_count = candidates.len();
//! let recommendations = Recommender::default().recommend(&base, candidates);
//! let response = RecommendationResponse::new(base, recommendations, candidates_count);
//! ```
//!
//! The engine is a pure function of its inputs: no I/O, no shared state.

pub mod distance;
pub mod explain;
pub mod factor;
pub mod rerank;

pub use explain::{RecommendationResponse, SimilarityStats};
pub use factor::{Factor, MAX_SCORE};
pub use rerank::{score, Recommendation, Recommender, ScoreCard, DEFAULT_LIMIT};
