use serde_json::Value;

use super::domain::{ClientPreferences, MatchVerdict, PropertyAttributes};
use super::requirements::{normalize_scalar, Importance, RequirementInput, RequirementNormalizer};

/// Minimum soft score for a listing without hard failures to be shown.
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
enum Measure {
    Price,
    Area,
    Bedrooms,
    Bathrooms,
}

impl Measure {
    fn read(self, attributes: &PropertyAttributes) -> Option<f64> {
        match self {
            Self::Price => attributes.price,
            Self::Area => attributes.area_sqm,
            Self::Bedrooms => attributes.bedrooms,
            Self::Bathrooms => attributes.bathrooms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    /// The client preference is a ceiling for the listing value.
    Ceiling,
    /// The client preference is a floor for the listing value.
    Floor,
}

struct HardConstraint {
    preference: &'static str,
    tag: &'static str,
    measure: Measure,
    bound: Bound,
}

const HARD_CONSTRAINTS: [HardConstraint; 4] = [
    HardConstraint {
        preference: "maxPrice",
        tag: "budget",
        measure: Measure::Price,
        bound: Bound::Ceiling,
    },
    HardConstraint {
        preference: "minSqm",
        tag: "sqm",
        measure: Measure::Area,
        bound: Bound::Floor,
    },
    HardConstraint {
        preference: "minBedrooms",
        tag: "bedrooms",
        measure: Measure::Bedrooms,
        bound: Bound::Floor,
    },
    HardConstraint {
        preference: "minBathrooms",
        tag: "bathrooms",
        measure: Measure::Bathrooms,
        bound: Bound::Floor,
    },
];

/// Rule-based compatibility scorer.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    normalizer: RequirementNormalizer,
}

impl MatchScorer {
    pub fn new(normalizer: RequirementNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &RequirementNormalizer {
        &self.normalizer
    }

    pub fn score(
        &self,
        preferences: &ClientPreferences,
        requirements: &RequirementInput,
        attributes: &PropertyAttributes,
    ) -> MatchVerdict {
        let mut hard_fails = numeric_hard_fails(preferences, attributes);
        let mut soft_matched = 0;
        let mut soft_total = 0;

        for requirement in self.normalizer.normalize(requirements) {
            let key = self.normalizer.resolve_client_key(&requirement.name);
            let matched = requirement_matches(&requirement.value, preferences.get(&key));

            match requirement.importance {
                Importance::High => {
                    if !matched {
                        hard_fails.push(requirement.name);
                    }
                }
                Importance::Low => {
                    soft_total += 1;
                    if matched {
                        soft_matched += 1;
                    }
                }
            }
        }

        let score = if !hard_fails.is_empty() {
            0.0
        } else if soft_total > 0 {
            soft_matched as f64 / soft_total as f64
        } else {
            1.0
        };
        let visible = hard_fails.is_empty() && score >= VISIBILITY_THRESHOLD;

        MatchVerdict {
            score,
            hard_fails,
            soft_matched,
            soft_total,
            visible,
        }
    }
}

/// Missing data on either side skips the check.
fn numeric_hard_fails(
    preferences: &ClientPreferences,
    attributes: &PropertyAttributes,
) -> Vec<String> {
    HARD_CONSTRAINTS
        .iter()
        .filter(|constraint| {
            let (Some(wanted), Some(actual)) = (
                preferences.number(constraint.preference),
                constraint.measure.read(attributes),
            ) else {
                return false;
            };

            match constraint.bound {
                Bound::Ceiling => actual > wanted,
                Bound::Floor => actual < wanted,
            }
        })
        .map(|constraint| constraint.tag.to_string())
        .collect()
}

pub(crate) fn requirement_matches(required: &Value, client: Option<&Value>) -> bool {
    let required = normalize_scalar(required);
    let client = client.map(normalize_scalar);

    match required {
        // No opinion is compatible with a boolean requirement; only the opposite flag fails.
        Value::Bool(flag) => client != Some(Value::Bool(!flag)),
        required => match client {
            None | Some(Value::Null) => false,
            Some(Value::String(ref text)) if text.is_empty() => false,
            Some(client) => values_equal(&required, &client),
        },
    }
}

fn values_equal(required: &Value, client: &Value) -> bool {
    match (required.as_f64(), client.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => required == client,
    }
}
