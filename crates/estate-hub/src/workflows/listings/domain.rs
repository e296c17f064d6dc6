use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::matching::{Matchable, PropertyAttributes, RequirementInput};

/// Identifier wrapper for listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    Rent,
    Sale,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Rented,
    Sold,
}

/// A listing as stored. `deleted_at` marks a soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub owner: UserId,
    pub title: String,
    pub price: f64,
    pub deal_type: DealType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: PropertyStatus,
    #[serde(default)]
    pub requirements: RequirementInput,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Property {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl Matchable for Property {
    fn listing_id(&self) -> &str {
        self.id.as_str()
    }

    fn requirements(&self) -> &RequirementInput {
        &self.requirements
    }

    fn attributes(&self) -> PropertyAttributes {
        PropertyAttributes {
            price: Some(self.price),
            area_sqm: self.area_sqm,
            bedrooms: self.bedrooms.map(f64::from),
            bathrooms: self.bathrooms.map(f64::from),
        }
    }
}

/// Owner-supplied payload for a new listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub price: f64,
    pub deal_type: DealType,
    #[serde(default)]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub requirements: RequirementInput,
}

/// A (user, property) membership pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user: UserId,
    pub property_id: PropertyId,
    pub created_at: DateTime<Utc>,
}

/// What a property removal touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionSummary {
    pub property_id: PropertyId,
    pub removed_favorites: usize,
    pub cancelled_appointments: usize,
    pub notified_users: Vec<UserId>,
}
