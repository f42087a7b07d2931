// Listing search filters
use serde::Deserialize;

use crate::listing::{Listing, TransactionType};
use crate::serde_utils::{empty_as_none, trimmed_text};

pub trait Filter {
    fn matches(&self, listing: &Listing) -> bool;
}

/// Free-text listing fields a filter can search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    CompanyName,
    ClientName,
    PropertyAddress,
    FactoryIndustry,
    FactoryProduct,
}

impl TextField {
    fn value<'a>(&self, listing: &'a Listing) -> Option<&'a str> {
        match self {
            TextField::CompanyName => Some(listing.company_name.as_str()),
            TextField::ClientName => Some(listing.client_name.as_str()),
            TextField::PropertyAddress => Some(listing.property_address.as_str()),
            TextField::FactoryIndustry => listing.factory_industry.as_deref(),
            TextField::FactoryProduct => listing.factory_product.as_deref(),
        }
    }
}

/// Numeric listing fields a filter can compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    PropertyArea,
    Price,
    BuildingFloors,
    HoistCount,
    ElectricalPower,
    TruckCount,
}

impl NumericField {
    fn value(&self, listing: &Listing) -> Option<f64> {
        match self {
            NumericField::PropertyArea => Some(listing.property_area),
            NumericField::Price => Some(listing.price),
            NumericField::BuildingFloors => listing.building_floors.map(f64::from),
            NumericField::HoistCount => listing.hoist_count.map(f64::from),
            NumericField::ElectricalPower => listing.electrical_power,
            NumericField::TruckCount => listing.truck_count.map(f64::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Case-insensitive (ASCII) substring match, like SQL `LIKE '%value%'`
    Contains { field: TextField, value: String },
    TransactionType(TransactionType),
    Equals { field: NumericField, value: f64 },
    GreaterEqual { field: NumericField, value: f64 },
    LessEqual { field: NumericField, value: f64 },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
}

pub struct ListingFilter {
    condition: FilterCondition,
}

impl ListingFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// Filter that accepts every listing
    pub fn all() -> Self {
        Self::new(FilterCondition::And(Vec::new()))
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    // Absent fields never satisfy a condition, mirroring SQL NULL comparisons.
    fn matches_condition(condition: &FilterCondition, listing: &Listing) -> bool {
        match condition {
            FilterCondition::Contains { field, value } => field
                .value(listing)
                .map(|v| contains_ignore_ascii_case(v, value))
                .unwrap_or(false),
            FilterCondition::TransactionType(tt) => listing.transaction_type == *tt,
            FilterCondition::Equals { field, value } => field
                .value(listing)
                .map(|v| v == *value)
                .unwrap_or(false),
            FilterCondition::GreaterEqual { field, value } => field
                .value(listing)
                .map(|v| v >= *value)
                .unwrap_or(false),
            FilterCondition::LessEqual { field, value } => field
                .value(listing)
                .map(|v| v <= *value)
                .unwrap_or(false),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, listing))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, listing))
            }
        }
    }
}

impl Filter for ListingFilter {
    fn matches(&self, listing: &Listing) -> bool {
        Self::matches_condition(&self.condition, listing)
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Search parameters accepted by the listing search endpoint.
///
/// Every field is optional and blank values are ignored, so the struct
/// deserializes directly from a query string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchParams {
    /// Keyword matched against company, client, address, industry and product
    #[serde(default, deserialize_with = "trimmed_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub property_address: Option<String>,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub factory_industry: Option<String>,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub factory_product: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_area: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_area: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_floors: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_floors: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub hoist_count: Option<u32>,
    /// Minimum electrical power in kW
    #[serde(default, deserialize_with = "empty_as_none")]
    pub electrical_power: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub truck_count: Option<u32>,
}

impl SearchParams {
    /// Combine every given parameter into a single AND condition
    pub fn to_condition(&self) -> FilterCondition {
        let mut conditions = Vec::new();

        if let Some(keyword) = &self.search {
            conditions.push(FilterCondition::Or(
                [
                    TextField::CompanyName,
                    TextField::ClientName,
                    TextField::PropertyAddress,
                    TextField::FactoryIndustry,
                    TextField::FactoryProduct,
                ]
                .into_iter()
                .map(|field| FilterCondition::Contains { field, value: keyword.clone() })
                .collect(),
            ));
        }

        if let Some(tt) = self.transaction_type {
            conditions.push(FilterCondition::TransactionType(tt));
        }

        for (field, value) in [
            (TextField::CompanyName, &self.company_name),
            (TextField::ClientName, &self.client_name),
            (TextField::PropertyAddress, &self.property_address),
            (TextField::FactoryIndustry, &self.factory_industry),
            (TextField::FactoryProduct, &self.factory_product),
        ] {
            if let Some(value) = value {
                conditions.push(FilterCondition::Contains { field, value: value.clone() });
            }
        }

        let bounds = [
            (NumericField::PropertyArea, self.min_area, self.max_area),
            (NumericField::Price, self.min_price, self.max_price),
            (
                NumericField::BuildingFloors,
                self.min_floors.map(f64::from),
                self.max_floors.map(f64::from),
            ),
        ];
        for (field, min, max) in bounds {
            if let Some(value) = min {
                conditions.push(FilterCondition::GreaterEqual { field, value });
            }
            if let Some(value) = max {
                conditions.push(FilterCondition::LessEqual { field, value });
            }
        }

        if let Some(count) = self.hoist_count {
            conditions.push(FilterCondition::Equals {
                field: NumericField::HoistCount,
                value: f64::from(count),
            });
        }
        if let Some(power) = self.electrical_power {
            conditions.push(FilterCondition::GreaterEqual {
                field: NumericField::ElectricalPower,
                value: power,
            });
        }
        if let Some(count) = self.truck_count {
            conditions.push(FilterCondition::Equals {
                field: NumericField::TruckCount,
                value: f64::from(count),
            });
        }

        FilterCondition::And(conditions)
    }

    pub fn to_filter(&self) -> ListingFilter {
        ListingFilter::new(self.to_condition())
    }
}
