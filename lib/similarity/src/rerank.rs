//! Scoring and ranking of candidate listings
//!
//! Computes a weighted factor score for every candidate against a base
//! listing, then orders candidates by score with ties kept in input order.

use facdoc_core::Listing;
use serde::Serialize;
use tracing::debug;

use crate::factor::Factor;

/// Number of recommendations returned per request
pub const DEFAULT_LIMIT: usize = 5;

/// Score of one candidate with the factors that earned it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub score: u32,
    /// Matched factors in breakdown order
    pub matched: Vec<Factor>,
}

impl ScoreCard {
    /// Human-readable breakdown, e.g. `업종일치(35) 지역일치(15)`
    pub fn breakdown(&self) -> String {
        self.matched
            .iter()
            .map(|f| format!("{}({})", f.label(), f.weight()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_matched(&self, factor: Factor) -> bool {
        self.matched.contains(&factor)
    }
}

/// Score `candidate` against `base`
pub fn score(base: &Listing, candidate: &Listing) -> ScoreCard {
    let matched: Vec<Factor> = Factor::ALL
        .into_iter()
        .filter(|factor| factor.matches(base, candidate))
        .collect();
    let score: u32 = matched.iter().map(|f| f.weight()).sum();
    ScoreCard { score, matched }
}

/// A ranked candidate listing
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub listing: Listing,
    #[serde(rename = "similarity_score")]
    pub score: u32,
    #[serde(rename = "score_details")]
    pub breakdown: String,
    #[serde(rename = "matched_factors")]
    pub matched: Vec<Factor>,
}

impl Recommendation {
    fn new(listing: Listing, card: ScoreCard) -> Self {
        Self {
            breakdown: card.breakdown(),
            score: card.score,
            matched: card.matched,
            listing,
        }
    }
}

/// Ranks candidates by similarity to a base listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommender {
    limit: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl Recommender {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Score, rank and truncate candidates
    ///
    /// # Arguments
    /// * `base` - The listing recommendations are made for
    /// * `candidates` - Every other listing; a candidate sharing the base id is skipped
    ///
    /// # Returns
    /// At most `limit` recommendations, highest score first. Equal scores
    /// keep their relative order from `candidates`.
    pub fn recommend(&self, base: &Listing, candidates: Vec<Listing>) -> Vec<Recommendation> {
        let candidates_count = candidates.len();
        let mut results: Vec<Recommendation> = candidates
            .into_iter()
            .filter(|candidate| candidate.id != base.id)
            .map(|candidate| {
                let card = score(base, &candidate);
                Recommendation::new(candidate, card)
            })
            .collect();

        // Stable sort keeps input order among ties
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(self.limit);

        debug!(
            base_id = base.id,
            candidates = candidates_count,
            returned = results.len(),
            "ranked similar listings"
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::MAX_SCORE;
    use chrono::{TimeZone, Utc};
    use facdoc_core::TransactionType;

    fn create_test_listing(id: u64) -> Listing {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        Listing {
            id,
            transaction_type: TransactionType::Sale,
            company_name: format!("회사{}", id),
            client_position: None,
            client_name: "김철수".to_string(),
            client_contact: "010-1234-5678".to_string(),
            factory_industry: Some("금속가공".to_string()),
            factory_product: None,
            property_address: "경기도 화성시 팔탄면".to_string(),
            property_area: 1000.0,
            building_floors: None,
            hoist_count: None,
            electrical_power: None,
            truck_count: None,
            desired_move_in_date: None,
            price: 500_000_000.0,
            price_per_sqm: 500_000.0,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Candidate sharing nothing with the default base listing
    fn create_unrelated_listing(id: u64) -> Listing {
        Listing {
            transaction_type: TransactionType::LeaseRequest,
            factory_industry: Some("식품".to_string()),
            property_address: "부산광역시 강서구".to_string(),
            property_area: 10_000.0,
            price: 5_000_000_000.0,
            building_floors: Some(10),
            electrical_power: Some(1000.0),
            ..create_test_listing(id)
        }
    }

    #[test]
    fn test_reference_example_scores_105() {
        let base = create_test_listing(1);
        let candidate = Listing {
            property_area: 1050.0,
            price: 600_000_000.0,
            property_address: "경기도 평택시".to_string(),
            building_floors: Some(9),
            electrical_power: Some(500.0),
            ..create_test_listing(2)
        };

        let card = score(&base, &candidate);
        assert_eq!(card.score, 105);
        assert_eq!(
            card.matched,
            vec![
                Factor::Industry,
                Factor::Area,
                Factor::Price,
                Factor::Region,
                Factor::TransactionType
            ]
        );
        assert_eq!(
            card.breakdown(),
            "업종일치(35) 면적유사(25) 가격유사(20) 지역일치(15) 거래일치(10)"
        );
    }

    #[test]
    fn test_perfect_match_reaches_max_score() {
        let base = Listing {
            factory_product: Some("볼트".to_string()),
            building_floors: Some(2),
            hoist_count: Some(1),
            electrical_power: Some(300.0),
            truck_count: Some(4),
            ..create_test_listing(1)
        };
        let candidate = Listing {
            factory_product: Some("자동차 볼트".to_string()),
            ..base.clone()
        };
        let candidate = Listing { id: 2, ..candidate };

        let card = score(&base, &candidate);
        assert_eq!(card.score, MAX_SCORE);
        assert_eq!(card.matched, Factor::ALL.to_vec());
    }

    #[test]
    fn test_unrelated_candidate_scores_zero() {
        let base = create_test_listing(1);
        let card = score(&base, &create_unrelated_listing(2));
        assert_eq!(card.score, 0);
        assert!(card.matched.is_empty());
        assert_eq!(card.breakdown(), "");
    }

    #[test]
    fn test_empty_industry_never_matches() {
        let base = Listing { factory_industry: Some(String::new()), ..create_test_listing(1) };
        let candidate = Listing { factory_industry: Some(String::new()), ..create_test_listing(2) };
        assert!(!score(&base, &candidate).is_matched(Factor::Industry));

        let base = Listing { factory_industry: None, ..create_test_listing(1) };
        let candidate = Listing { factory_industry: None, ..create_test_listing(2) };
        assert!(!score(&base, &candidate).is_matched(Factor::Industry));
    }

    #[test]
    fn test_zero_base_area_never_earns_area_credit() {
        let base = Listing { property_area: 0.0, ..create_test_listing(1) };
        let candidate = Listing { property_area: 0.0, ..create_test_listing(2) };
        assert!(!score(&base, &candidate).is_matched(Factor::Area));
    }

    #[test]
    fn test_zero_base_price_never_earns_price_credit() {
        let base = Listing { price: 0.0, ..create_test_listing(1) };
        let candidate = Listing { price: 0.0, ..create_test_listing(2) };
        assert!(!score(&base, &candidate).is_matched(Factor::Price));
    }

    #[test]
    fn test_area_threshold_is_strict() {
        let base = create_test_listing(1);
        let at_limit = Listing { property_area: 1300.0, ..create_test_listing(2) };
        let inside = Listing { property_area: 1299.0, ..create_test_listing(3) };
        assert!(!score(&base, &at_limit).is_matched(Factor::Area));
        assert!(score(&base, &inside).is_matched(Factor::Area));
    }

    #[test]
    fn test_region_uses_first_address_token() {
        let base = create_test_listing(1);
        let contains = Listing {
            property_address: "(우) 경기도 안산시".to_string(),
            ..create_test_listing(2)
        };
        let other = Listing {
            property_address: "충청남도 아산시".to_string(),
            ..create_test_listing(3)
        };
        assert!(score(&base, &contains).is_matched(Factor::Region));
        assert!(!score(&base, &other).is_matched(Factor::Region));
    }

    #[test]
    fn test_absent_floors_count_as_zero() {
        let base = create_test_listing(1);
        let low = Listing { building_floors: Some(2), ..create_test_listing(2) };
        let high = Listing { building_floors: Some(3), ..create_test_listing(3) };
        let absent = create_test_listing(4);

        assert!(score(&base, &low).is_matched(Factor::Floors));
        assert!(!score(&base, &high).is_matched(Factor::Floors));
        assert!(score(&base, &absent).is_matched(Factor::Floors));
    }

    #[test]
    fn test_absent_counts_never_match() {
        let base = create_test_listing(1);
        let candidate = create_test_listing(2);
        let card = score(&base, &candidate);
        assert!(!card.is_matched(Factor::HoistCount));
        assert!(!card.is_matched(Factor::TruckCount));

        let base = Listing { hoist_count: Some(2), truck_count: Some(1), ..create_test_listing(1) };
        let candidate = Listing { hoist_count: Some(2), truck_count: Some(1), ..create_test_listing(2) };
        let card = score(&base, &candidate);
        assert!(card.is_matched(Factor::HoistCount));
        assert!(card.is_matched(Factor::TruckCount));
    }

    #[test]
    fn test_electrical_power_similarity() {
        let base = Listing { electrical_power: Some(500.0), ..create_test_listing(1) };
        let close = Listing { electrical_power: Some(590.0), ..create_test_listing(2) };
        let far = Listing { electrical_power: Some(600.0), ..create_test_listing(3) };
        let absent = create_test_listing(4);

        assert!(score(&base, &close).is_matched(Factor::ElectricalPower));
        assert!(!score(&base, &far).is_matched(Factor::ElectricalPower));
        assert!(!score(&base, &absent).is_matched(Factor::ElectricalPower));
    }

    #[test]
    fn test_electrical_power_absent_base_divides_by_one() {
        let base = create_test_listing(1);
        let absent = create_test_listing(2);
        let tiny = Listing { electrical_power: Some(0.1), ..create_test_listing(3) };
        let large = Listing { electrical_power: Some(50.0), ..create_test_listing(4) };

        assert!(score(&base, &absent).is_matched(Factor::ElectricalPower));
        assert!(score(&base, &tiny).is_matched(Factor::ElectricalPower));
        assert!(!score(&base, &large).is_matched(Factor::ElectricalPower));
    }

    #[test]
    fn test_electrical_power_zero_base_never_matches() {
        let base = Listing { electrical_power: Some(0.0), ..create_test_listing(1) };
        let candidate = Listing { electrical_power: Some(0.0), ..create_test_listing(2) };
        assert!(!score(&base, &candidate).is_matched(Factor::ElectricalPower));
    }

    #[test]
    fn test_product_keyword_requires_base_product() {
        let base = Listing { factory_product: Some("볼트".to_string()), ..create_test_listing(1) };
        let candidate = Listing {
            factory_product: Some("볼트, 너트".to_string()),
            ..create_test_listing(2)
        };
        assert!(score(&base, &candidate).is_matched(Factor::Product));

        let base = Listing { factory_product: Some(String::new()), ..create_test_listing(1) };
        assert!(!score(&base, &candidate).is_matched(Factor::Product));
    }

    #[test]
    fn test_recommend_sorts_by_score_descending() {
        let base = create_test_listing(1);
        let candidates = vec![
            create_unrelated_listing(2),
            Listing { factory_industry: None, ..create_test_listing(3) },
            create_test_listing(4),
        ];

        let results = Recommender::default().recommend(&base, candidates);

        let ids: Vec<u64> = results.iter().map(|r| r.listing.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_recommend_keeps_input_order_for_ties() {
        let base = create_test_listing(1);
        let candidates = vec![
            create_unrelated_listing(9),
            create_test_listing(7),
            create_unrelated_listing(3),
            create_test_listing(5),
            create_unrelated_listing(8),
        ];

        let results = Recommender::default().recommend(&base, candidates);

        let ids: Vec<u64> = results.iter().map(|r| r.listing.id).collect();
        assert_eq!(ids, vec![7, 5, 9, 3, 8]);
    }

    #[test]
    fn test_recommend_truncates_to_limit() {
        let base = create_test_listing(1);
        let candidates: Vec<Listing> = (2..20).map(create_test_listing).collect();

        let results = Recommender::default().recommend(&base, candidates.clone());
        assert_eq!(results.len(), DEFAULT_LIMIT);

        let results = Recommender::new(2).recommend(&base, candidates);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_recommend_returns_all_when_fewer_than_limit() {
        let base = create_test_listing(1);
        let candidates = vec![create_test_listing(2), create_test_listing(3), create_test_listing(4)];
        assert_eq!(Recommender::new(5).recommend(&base, candidates).len(), 3);
    }

    #[test]
    fn test_recommend_empty_candidates() {
        let base = create_test_listing(1);
        assert!(Recommender::default().recommend(&base, Vec::new()).is_empty());
    }

    #[test]
    fn test_recommend_skips_base_id_but_keeps_identical_copies() {
        let base = create_test_listing(1);
        let candidates = vec![base.clone(), create_test_listing(2)];

        let results = Recommender::default().recommend(&base, candidates);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].listing.id, 2);
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let base = create_test_listing(1);
        let candidates = vec![
            create_unrelated_listing(2),
            create_test_listing(3),
            Listing { property_area: 2000.0, ..create_test_listing(4) },
        ];
        let recommender = Recommender::default();

        let first: Vec<(u64, u32, String)> = recommender
            .recommend(&base, candidates.clone())
            .into_iter()
            .map(|r| (r.listing.id, r.score, r.breakdown))
            .collect();
        let second: Vec<(u64, u32, String)> = recommender
            .recommend(&base, candidates)
            .into_iter()
            .map(|r| (r.listing.id, r.score, r.breakdown))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scores_stay_within_bounds() {
        let base = create_test_listing(1);
        let candidates: Vec<Listing> = (2..40)
            .map(|id| Listing {
                property_area: 100.0 * id as f64,
                price: 25_000_000.0 * id as f64,
                building_floors: Some((id % 6) as u32),
                hoist_count: if id % 2 == 0 { Some(1) } else { None },
                ..create_test_listing(id)
            })
            .collect();

        for rec in Recommender::new(usize::MAX).recommend(&base, candidates) {
            assert!(rec.score <= MAX_SCORE);
            let recomputed: u32 = rec.matched.iter().map(|f| f.weight()).sum();
            assert_eq!(rec.score, recomputed);
        }
    }

    #[test]
    fn test_recommendation_serializes_flat() {
        let base = create_test_listing(1);
        let results = Recommender::default().recommend(&base, vec![create_test_listing(2)]);
        let json = serde_json::to_value(&results[0]).unwrap();

        assert_eq!(json["id"], 2);
        assert_eq!(json["transaction_type"], "매도");
        assert!(json["similarity_score"].is_u64());
        assert!(json["score_details"].as_str().unwrap().starts_with("업종일치(35)"));
        assert_eq!(json["matched_factors"][0], "industry");
    }
}
