//! Tenant/property compatibility matching.
//!
//! Owners attach requirements to a listing, clients keep a flat preference map, and the
//! [`MatchScorer`] turns both into a verdict. [`VisibilityFilter`] applies that verdict across the
//! catalog for a requesting client.

pub mod domain;
pub mod requirements;
pub mod scorer;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use domain::{ClientPreferences, MatchVerdict, Matchable, PropertyAttributes};
pub use requirements::{
    normalize_scalar, AliasTable, Importance, Requirement, RequirementInput, RequirementNormalizer,
};
pub use scorer::{MatchScorer, VISIBILITY_THRESHOLD};
pub use visibility::{Audience, PriceRange, VisibilityFilter};
