//! Similarity factors
//!
//! Each factor awards its full weight when its condition holds and nothing
//! otherwise. The declaration order of [`Factor`] is the order used for
//! score breakdowns.

use facdoc_core::Listing;
use serde::Serialize;

use crate::distance::{
    contains_nonempty, equal_nonempty, present_and_equal, ratio_below, region_token,
    relative_difference_within, within_absolute,
};

/// Relative area difference that still counts as similar
pub const AREA_TOLERANCE: f64 = 0.30;
/// Relative price difference that still counts as similar
pub const PRICE_TOLERANCE: f64 = 0.30;
/// Relative electrical power difference that still counts as similar
pub const POWER_TOLERANCE: f64 = 0.20;
/// Floor count difference that still counts as similar
pub const FLOOR_TOLERANCE: u32 = 2;

/// Highest score a candidate can reach
pub const MAX_SCORE: u32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Industry,
    Area,
    Price,
    Region,
    TransactionType,
    Floors,
    HoistCount,
    ElectricalPower,
    TruckCount,
    Product,
}

impl Factor {
    /// All factors in breakdown order
    pub const ALL: [Factor; 10] = [
        Factor::Industry,
        Factor::Area,
        Factor::Price,
        Factor::Region,
        Factor::TransactionType,
        Factor::Floors,
        Factor::HoistCount,
        Factor::ElectricalPower,
        Factor::TruckCount,
        Factor::Product,
    ];

    pub const fn weight(self) -> u32 {
        match self {
            Factor::Industry => 35,
            Factor::Area => 25,
            Factor::Price => 20,
            Factor::Region => 15,
            Factor::TransactionType => 10,
            Factor::Floors => 8,
            Factor::HoistCount => 5,
            Factor::ElectricalPower => 5,
            Factor::TruckCount => 3,
            Factor::Product => 2,
        }
    }

    /// Label shown in score breakdowns
    pub const fn label(self) -> &'static str {
        match self {
            Factor::Industry => "업종일치",
            Factor::Area => "면적유사",
            Factor::Price => "가격유사",
            Factor::Region => "지역일치",
            Factor::TransactionType => "거래일치",
            Factor::Floors => "층수유사",
            Factor::HoistCount => "호이스트일치",
            Factor::ElectricalPower => "전기유사",
            Factor::TruckCount => "트럭일치",
            Factor::Product => "품목일치",
        }
    }

    /// Whether `candidate` earns this factor relative to `base`
    pub fn matches(self, base: &Listing, candidate: &Listing) -> bool {
        match self {
            Factor::Industry => equal_nonempty(
                base.factory_industry.as_deref(),
                candidate.factory_industry.as_deref(),
            ),
            Factor::Area => relative_difference_within(
                candidate.property_area,
                base.property_area,
                AREA_TOLERANCE,
            ),
            Factor::Price => {
                relative_difference_within(candidate.price, base.price, PRICE_TOLERANCE)
            }
            Factor::Region => region_token(&base.property_address)
                .map(|token| candidate.property_address.contains(token))
                .unwrap_or(false),
            Factor::TransactionType => candidate.transaction_type == base.transaction_type,
            Factor::Floors => within_absolute(
                candidate.building_floors.unwrap_or(0),
                base.building_floors.unwrap_or(0),
                FLOOR_TOLERANCE,
            ),
            Factor::HoistCount => present_and_equal(candidate.hoist_count, base.hoist_count),
            Factor::ElectricalPower => {
                // Absent power on the base side divides by 1; a recorded 0 kW earns nothing.
                ratio_below(
                    candidate.electrical_power.unwrap_or(0.0) - base.electrical_power.unwrap_or(0.0),
                    base.electrical_power.unwrap_or(1.0),
                    POWER_TOLERANCE,
                )
            }
            Factor::TruckCount => present_and_equal(candidate.truck_count, base.truck_count),
            Factor::Product => contains_nonempty(
                candidate.factory_product.as_deref(),
                base.factory_product.as_deref(),
            ),
        }
    }
}
