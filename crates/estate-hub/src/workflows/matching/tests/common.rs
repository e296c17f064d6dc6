use serde_json::{json, Value};

use crate::workflows::matching::{
    MatchScorer, Matchable, PropertyAttributes, RequirementInput, RequirementNormalizer,
};

/// Minimal listing used to drive the scorer and filter without the listings workflow.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Listing {
    pub(super) id: String,
    pub(super) requirements: RequirementInput,
    pub(super) attributes: PropertyAttributes,
}

impl Matchable for Listing {
    fn listing_id(&self) -> &str {
        &self.id
    }

    fn requirements(&self) -> &RequirementInput {
        &self.requirements
    }

    fn attributes(&self) -> PropertyAttributes {
        self.attributes
    }
}

pub(super) fn listing(id: &str, requirements: Value) -> Listing {
    Listing {
        id: id.to_string(),
        requirements: serde_json::from_value(requirements).expect("requirements parse"),
        attributes: PropertyAttributes {
            price: Some(1200.0),
            area_sqm: Some(70.0),
            bedrooms: Some(2.0),
            bathrooms: Some(1.0),
        },
    }
}

pub(super) fn requirement(name: &str, value: Value, importance: &str) -> Value {
    json!({ "name": name, "value": value, "importance": importance })
}

pub(super) fn normalizer() -> RequirementNormalizer {
    RequirementNormalizer::default()
}

pub(super) fn scorer() -> MatchScorer {
    MatchScorer::new(normalizer())
}
