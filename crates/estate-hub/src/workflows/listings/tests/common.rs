use serde_json::{json, Value};

use crate::identity::Actor;
use crate::workflows::appointments::{Appointment, ProposeRequest};
use crate::workflows::fixtures::Harness;
use crate::workflows::listings::Property;
use crate::workflows::matching::ClientPreferences;

pub(super) fn owner() -> Actor {
    Actor::owner("owner-1")
}

pub(super) fn requirement(name: &str, value: Value, importance: &str) -> Value {
    json!({ "name": name, "value": value, "importance": importance })
}

/// Three listings: pets required, a couple-only flat, and an unconstrained studio.
pub(super) fn seeded(harness: &Harness) -> Vec<Property> {
    vec![
        harness.publish(
            &owner(),
            "Garden flat",
            900.0,
            json!([requirement("petsAllowed", json!(true), "high")]),
        ),
        harness.publish(
            &owner(),
            "Penthouse",
            2400.0,
            json!([requirement("familyStatus", json!("couple"), "high")]),
        ),
        harness.publish(&owner(), "Studio", 550.0, json!({ "furnished": "yes" })),
    ]
}

pub(super) fn save_preferences(harness: &Harness, client: &Actor, preferences: ClientPreferences) {
    harness
        .market
        .listings
        .save_preferences(client, preferences)
        .expect("preferences saved");
}

pub(super) fn propose(
    harness: &Harness,
    property: &Property,
    tenant: &Actor,
    slot: &str,
) -> Appointment {
    harness
        .market
        .appointments
        .propose(
            &owner(),
            ProposeRequest {
                property_id: property.id.clone(),
                tenant_id: tenant.id.clone(),
                available_slots: vec![slot.to_string()],
            },
        )
        .expect("proposal accepted")
}

pub(super) fn titles(properties: &[Property]) -> Vec<&str> {
    properties
        .iter()
        .map(|property| property.title.as_str())
        .collect()
}
