use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

/// Weight of an owner requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// A mismatch disqualifies the listing.
    High,
    /// A mismatch only lowers the soft score.
    #[default]
    Low,
}

impl Importance {
    /// Only the literal string `high` (any case) is high importance.
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some(raw) if raw.eq_ignore_ascii_case("high") => Self::High,
            _ => Self::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Canonical requirement shape consumed by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub value: Value,
    pub importance: Importance,
}

/// Requirements as supplied by an owner: either a list of `{name, value, importance}` objects or a
/// flat key/value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementInput {
    List(Vec<Value>),
    Map(Map<String, Value>),
}

impl Default for RequirementInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl RequirementInput {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(entries) => entries.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }
}

impl From<Vec<Requirement>> for RequirementInput {
    fn from(requirements: Vec<Requirement>) -> Self {
        Self::List(
            requirements
                .into_iter()
                .map(|requirement| {
                    json!({
                        "name": requirement.name,
                        "value": requirement.value,
                        "importance": requirement.importance.label(),
                    })
                })
                .collect(),
        )
    }
}

/// Case-insensitive map from requirement names to client preference keys.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

const STANDARD_ALIASES: &[(&str, &str)] = &[
    ("hasElevator", "elevator"),
    ("elevatorAccess", "elevator"),
    ("hasParking", "parking"),
    ("parkingSpot", "parking"),
    ("hasBalcony", "balcony"),
    ("hasGarden", "garden"),
    ("petsAllowed", "pets"),
    ("allowsPets", "pets"),
    ("petFriendly", "pets"),
    ("isFurnished", "furnished"),
    ("smokingAllowed", "smoking"),
    ("rentMax", "maxPrice"),
    ("saleMax", "maxPrice"),
    ("maxRent", "maxPrice"),
    ("budget", "maxPrice"),
    ("bedrooms", "minBedrooms"),
    ("rooms", "minBedrooms"),
    ("bathrooms", "minBathrooms"),
    ("sqm", "minSqm"),
    ("area", "minSqm"),
    ("minArea", "minSqm"),
    ("family", "familyStatus"),
    ("familyType", "familyStatus"),
];

impl AliasTable {
    /// The marketplace's built-in alias set.
    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_ALIASES.iter().copied())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(alias, key)| (alias.as_ref().to_lowercase(), key.into()))
            .collect();
        Self { entries }
    }

    /// Unknown names resolve to themselves.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Single entry point turning either requirement shape into canonical [`Requirement`]s.
#[derive(Debug, Clone)]
pub struct RequirementNormalizer {
    aliases: Arc<AliasTable>,
}

impl Default for RequirementNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(AliasTable::standard()))
    }
}

impl RequirementNormalizer {
    pub fn new(aliases: Arc<AliasTable>) -> Self {
        Self { aliases }
    }

    /// Malformed entries (no usable name, no `value` key) are dropped.
    pub fn normalize(&self, input: &RequirementInput) -> Vec<Requirement> {
        match input {
            RequirementInput::List(entries) => {
                entries.iter().filter_map(requirement_from).collect()
            }
            RequirementInput::Map(entries) => entries
                .iter()
                .filter(|(name, _)| !name.trim().is_empty())
                .map(|(name, value)| Requirement {
                    name: name.clone(),
                    value: value.clone(),
                    importance: Importance::Low,
                })
                .collect(),
        }
    }

    pub fn resolve_client_key(&self, name: &str) -> String {
        self.aliases.resolve(name).to_string()
    }
}

fn requirement_from(entry: &Value) -> Option<Requirement> {
    let object = entry.as_object()?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())?;
    let value = object.get("value")?;

    Some(Requirement {
        name: name.to_string(),
        value: value.clone(),
        importance: Importance::from_value(object.get("importance")),
    })
}

/// Coerce string inputs so values from typed payloads and admin-entered text compare equal.
///
/// Strings are trimmed; `"true"`/`"false"` become booleans, numeric text becomes a number, and
/// anything else is lower-cased. The empty string stays an empty string. Non-strings pass through.
pub fn normalize_scalar(value: &Value) -> Value {
    let Value::String(raw) = value else {
        return value.clone();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::String(String::new());
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Some(number) = parse_number(trimmed) {
        return Value::Number(number);
    }

    Value::String(trimmed.to_lowercase())
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(integer) = raw.parse::<i64>() {
        return Some(Number::from(integer));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}
