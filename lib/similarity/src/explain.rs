//! Explainability for recommendation results
//!
//! Output structures that summarize a ranking and carry the base listing
//! alongside its recommendations.

use facdoc_core::Listing;
use serde::Serialize;

use crate::factor::Factor;
use crate::rerank::Recommendation;

/// Summary statistics for one recommendation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Average score of results
    pub avg_score: f32,
    /// Score of best result
    pub best_score: u32,
    /// Heaviest factor matched by the best result
    pub top_contributing_factor: Option<Factor>,
}

impl SimilarityStats {
    /// Compute stats from ranked results
    pub fn compute(results: &[Recommendation], candidates_count: usize) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0,
                top_contributing_factor: None,
            };
        };

        let total: u32 = results.iter().map(|r| r.score).sum();
        let avg_score = total as f32 / results.len() as f32;

        let top_contributing_factor = best.matched.iter().copied().max_by_key(|f| f.weight());

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_factor,
        }
    }
}

/// Response body of the recommendations endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub base_listing: Listing,
    pub recommendations: Vec<Recommendation>,
    pub stats: SimilarityStats,
}

impl RecommendationResponse {
    pub fn new(base_listing: Listing, recommendations: Vec<Recommendation>, candidates_count: usize) -> Self {
        let stats = SimilarityStats::compute(&recommendations, candidates_count);
        Self {
            base_listing,
            recommendations,
            stats,
        }
    }
}
