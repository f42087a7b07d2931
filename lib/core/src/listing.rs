//! Listing records
//!
//! A [`Listing`] is a factory property offer or request registered by the
//! brokerage. Listings are created from a [`NewListing`] payload, never
//! edited in place, and hard-deleted by id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::serde_utils::{empty_as_none, trimmed_text};

/// Store-assigned listing identifier
pub type ListingId = u64;

/// Kind of deal a listing describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Owner offers the property for sale
    #[serde(rename = "매도", alias = "sale")]
    Sale,
    /// Client is looking to buy
    #[serde(rename = "매수", alias = "purchase")]
    Purchase,
    /// Owner offers the property for lease
    #[serde(rename = "임대", alias = "lease_offer")]
    LeaseOffer,
    /// Client is looking to lease
    #[serde(rename = "임차", alias = "lease_request")]
    LeaseRequest,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Sale,
        TransactionType::Purchase,
        TransactionType::LeaseOffer,
        TransactionType::LeaseRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "매도",
            TransactionType::Purchase => "매수",
            TransactionType::LeaseOffer => "임대",
            TransactionType::LeaseRequest => "임차",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "매도" | "sale" => Ok(TransactionType::Sale),
            "매수" | "purchase" => Ok(TransactionType::Purchase),
            "임대" | "lease_offer" => Ok(TransactionType::LeaseOffer),
            "임차" | "lease_request" => Ok(TransactionType::LeaseRequest),
            other => Err(Error::InvalidListing(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Price per square meter, zero when the area is not positive
#[inline]
pub fn price_per_sqm(price: f64, area: f64) -> f64 {
    if area > 0.0 {
        price / area
    } else {
        0.0
    }
}

/// Payload for registering a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub transaction_type: TransactionType,
    pub company_name: String,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub client_position: Option<String>,
    pub client_name: String,
    pub client_contact: String,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub factory_industry: Option<String>,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub factory_product: Option<String>,
    pub property_address: String,
    /// Square meters
    pub property_area: f64,
    #[serde(default)]
    pub building_floors: Option<u32>,
    #[serde(default)]
    pub hoist_count: Option<u32>,
    /// Kilowatts
    #[serde(default)]
    pub electrical_power: Option<f64>,
    #[serde(default)]
    pub truck_count: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub desired_move_in_date: Option<NaiveDate>,
    pub price: f64,
    #[serde(default, deserialize_with = "trimmed_text")]
    pub remarks: Option<String>,
}

impl NewListing {
    /// Check and normalize the payload.
    ///
    /// Required text is trimmed and must be non-empty. Blank optional text
    /// becomes `None`. Area, price and electrical power must be finite and
    /// non-negative.
    pub fn validate(mut self) -> Result<Self> {
        for (name, value) in [
            ("company_name", &mut self.company_name),
            ("client_name", &mut self.client_name),
            ("client_contact", &mut self.client_contact),
            ("property_address", &mut self.property_address),
        ] {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidListing(format!("{} is required", name)));
            }
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        for field in [
            &mut self.client_position,
            &mut self.factory_industry,
            &mut self.factory_product,
            &mut self.remarks,
        ] {
            *field = field
                .take()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }

        check_amount("property_area", self.property_area)?;
        check_amount("price", self.price)?;
        if let Some(power) = self.electrical_power {
            check_amount("electrical_power", power)?;
        }

        Ok(self)
    }
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidListing(format!("{} must be a finite number", name)));
    }
    if value < 0.0 {
        return Err(Error::InvalidListing(format!("{} cannot be negative", name)));
    }
    Ok(())
}

/// A stored listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub transaction_type: TransactionType,
    pub company_name: String,
    pub client_position: Option<String>,
    pub client_name: String,
    pub client_contact: String,
    pub factory_industry: Option<String>,
    pub factory_product: Option<String>,
    pub property_address: String,
    pub property_area: f64,
    pub building_floors: Option<u32>,
    pub hoist_count: Option<u32>,
    pub electrical_power: Option<f64>,
    pub truck_count: Option<u32>,
    pub desired_move_in_date: Option<NaiveDate>,
    pub price: f64,
    /// Derived from `price` and `property_area` at creation
    pub price_per_sqm: f64,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Build the stored record for an already validated payload
    pub fn create(id: ListingId, new: NewListing, now: DateTime<Utc>) -> Self {
        Self {
            id,
            transaction_type: new.transaction_type,
            company_name: new.company_name,
            client_position: new.client_position,
            client_name: new.client_name,
            client_contact: new.client_contact,
            factory_industry: new.factory_industry,
            factory_product: new.factory_product,
            property_address: new.property_address,
            property_area: new.property_area,
            building_floors: new.building_floors,
            hoist_count: new.hoist_count,
            electrical_power: new.electrical_power,
            truck_count: new.truck_count,
            desired_move_in_date: new.desired_move_in_date,
            price_per_sqm: price_per_sqm(new.price, new.property_area),
            price: new.price,
            remarks: new.remarks,
            created_at: now,
            updated_at: now,
        }
    }
}
