use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::requirements::{normalize_scalar, RequirementInput};

/// Flat preference map kept by a client (`maxPrice`, `minSqm`, amenity flags, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientPreferences(Map<String, Value>);

impl ClientPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric view of a preference after scalar coercion; `None` when absent or non-numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0
            .get(key)
            .map(normalize_scalar)
            .and_then(|value| value.as_f64())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Raw listing attributes checked by the hard numeric constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyAttributes {
    pub price: Option<f64>,
    pub area_sqm: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
}

/// Anything the visibility filter can score.
pub trait Matchable {
    fn listing_id(&self) -> &str;
    fn requirements(&self) -> &RequirementInput;
    fn attributes(&self) -> PropertyAttributes;
}

/// Outcome of scoring one listing for one client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchVerdict {
    pub score: f64,
    pub hard_fails: Vec<String>,
    pub soft_matched: usize,
    pub soft_total: usize,
    pub visible: bool,
}
