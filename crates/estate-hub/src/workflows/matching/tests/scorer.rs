use serde_json::json;

use super::common::*;
use crate::workflows::matching::{ClientPreferences, Matchable, PropertyAttributes};

fn prefs() -> ClientPreferences {
    ClientPreferences::new()
}

#[test]
fn empty_requirements_and_no_minimums_pass_vacuously() {
    let listing = listing("prop-1", json!([]));
    let verdict = scorer().score(&prefs(), listing.requirements(), &listing.attributes());

    assert_eq!(verdict.score, 1.0);
    assert!(verdict.hard_fails.is_empty());
    assert_eq!(verdict.soft_total, 0);
    assert!(verdict.visible);
}

#[test]
fn budget_and_size_minimums_fail_hard() {
    let listing = listing("prop-1", json!([]));
    let client = prefs()
        .with("maxPrice", 1000)
        .with("minSqm", "80")
        .with("minBedrooms", 3)
        .with("minBathrooms", 2);

    let verdict = scorer().score(&client, listing.requirements(), &listing.attributes());

    assert_eq!(
        verdict.hard_fails,
        vec!["budget", "sqm", "bedrooms", "bathrooms"]
    );
    assert_eq!(verdict.score, 0.0);
    assert!(!verdict.visible);
}

#[test]
fn numeric_checks_are_skipped_when_either_side_is_missing() {
    let mut listing = listing("prop-1", json!([]));
    listing.attributes = PropertyAttributes {
        price: Some(1200.0),
        ..PropertyAttributes::default()
    };
    let client = prefs()
        .with("minSqm", 200)
        .with("minBedrooms", 5)
        .with("maxPrice", "flexible");

    let verdict = scorer().score(&client, listing.requirements(), &listing.attributes());
    assert!(verdict.hard_fails.is_empty());
    assert!(verdict.visible);
}

#[test]
fn boundary_values_satisfy_numeric_constraints() {
    let listing = listing("prop-1", json!([]));
    let client = prefs()
        .with("maxPrice", 1200)
        .with("minSqm", 70)
        .with("minBedrooms", 2)
        .with("minBathrooms", 1);

    let verdict = scorer().score(&client, listing.requirements(), &listing.attributes());
    assert!(verdict.hard_fails.is_empty());
}

#[test]
fn high_importance_mismatch_dominates_soft_matches() {
    let listing = listing(
        "prop-1",
        json!([
            requirement("familyStatus", json!("couple"), "high"),
            requirement("pets", json!(true), "low"),
            requirement("furnished", json!(true), "low"),
            requirement("parking", json!(true), "low"),
        ]),
    );
    let client = prefs()
        .with("familyStatus", "single")
        .with("pets", true)
        .with("furnished", true)
        .with("parking", true);

    let verdict = scorer().score(&client, listing.requirements(), &listing.attributes());

    assert_eq!(verdict.hard_fails, vec!["familyStatus"]);
    assert_eq!(verdict.soft_matched, 3);
    assert_eq!(verdict.soft_total, 3);
    assert_eq!(verdict.score, 0.0);
    assert!(!verdict.visible);
}

#[test]
fn boolean_requirements_accept_absent_opinions() {
    let listing = listing(
        "prop-1",
        json!([
            requirement("hasElevator", json!(true), "high"),
            requirement("smoking", json!("false"), "high"),
        ]),
    );

    let silent = scorer().score(&prefs(), listing.requirements(), &listing.attributes());
    assert!(silent.hard_fails.is_empty());

    let opposed = prefs().with("elevator", false).with("smoking", "TRUE");
    let verdict = scorer().score(&opposed, listing.requirements(), &listing.attributes());
    assert_eq!(verdict.hard_fails, vec!["hasElevator", "smoking"]);
}

#[test]
fn concrete_requirements_need_an_explicit_preference() {
    let listing = listing(
        "prop-1",
        json!([requirement("familyStatus", json!("Family"), "high")]),
    );

    let absent = scorer().score(&prefs(), listing.requirements(), &listing.attributes());
    assert_eq!(absent.hard_fails, vec!["familyStatus"]);

    let blank = prefs().with("familyStatus", "  ");
    let verdict = scorer().score(&blank, listing.requirements(), &listing.attributes());
    assert_eq!(verdict.hard_fails, vec!["familyStatus"]);

    let matching = prefs().with("familyStatus", " family ");
    let verdict = scorer().score(&matching, listing.requirements(), &listing.attributes());
    assert!(verdict.hard_fails.is_empty());
}

#[test]
fn numeric_requirements_compare_across_representations() {
    let listing = listing(
        "prop-1",
        json!([requirement("bedrooms", json!("2"), "high")]),
    );
    let client = prefs().with("minBedrooms", 2.0);

    let verdict = scorer().score(&client, listing.requirements(), &listing.attributes());
    assert!(verdict.hard_fails.is_empty());
}

#[test]
fn unresolvable_names_fall_back_to_the_literal_key() {
    let listing = listing(
        "prop-1",
        json!([requirement("wineCellar", json!("yes"), "low")]),
    );

    let absent = scorer().score(&prefs(), listing.requirements(), &listing.attributes());
    assert_eq!((absent.soft_matched, absent.soft_total), (0, 1));

    let present = prefs().with("wineCellar", "YES");
    let verdict = scorer().score(&present, listing.requirements(), &listing.attributes());
    assert_eq!((verdict.soft_matched, verdict.soft_total), (1, 1));
}

#[test]
fn half_of_soft_requirements_is_the_visibility_boundary() {
    let listing = listing(
        "prop-1",
        json!([
            requirement("pets", json!("allowed"), "low"),
            requirement("furnished", json!("yes"), "low"),
            requirement("parking", json!("garage"), "low"),
            requirement("garden", json!("private"), "low"),
        ]),
    );

    let two_of_four = prefs().with("pets", "allowed").with("furnished", "yes");
    let verdict = scorer().score(&two_of_four, listing.requirements(), &listing.attributes());
    assert_eq!((verdict.soft_matched, verdict.soft_total), (2, 4));
    assert_eq!(verdict.score, 0.5);
    assert!(verdict.visible);

    let one_of_four = prefs().with("pets", "allowed");
    let verdict = scorer().score(&one_of_four, listing.requirements(), &listing.attributes());
    assert_eq!(verdict.score, 0.25);
    assert!(!verdict.visible);
}

#[test]
fn flat_map_requirements_score_as_soft() {
    let listing = listing("prop-1", json!({ "hasParking": true, "familyStatus": "couple" }));
    let client = prefs().with("parking", false).with("familyStatus", "couple");

    let verdict = scorer().score(&client, listing.requirements(), &listing.attributes());
    assert!(verdict.hard_fails.is_empty());
    assert_eq!((verdict.soft_matched, verdict.soft_total), (1, 2));
    assert!(verdict.visible);
}
