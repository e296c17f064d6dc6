//! Property catalog: listing visibility, favorites, client preferences, and removal cascades.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    DealType, DeletionSummary, Favorite, NewProperty, Property, PropertyId, PropertyStatus,
};
pub use repository::{FavoriteRepository, ProfileRepository, PropertyRepository};
pub use router::listing_router;
pub use service::ListingService;
