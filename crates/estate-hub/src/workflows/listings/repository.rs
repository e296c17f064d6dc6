use crate::error::RepositoryError;
use crate::identity::UserId;
use crate::workflows::matching::ClientPreferences;

use super::domain::{Favorite, Property, PropertyId};

/// Listing storage. `list_active` preserves catalog (insertion) order.
pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn list_active(&self) -> Result<Vec<Property>, RepositoryError>;
}

pub trait FavoriteRepository: Send + Sync {
    /// Returns `false` when the pair already existed.
    fn add(&self, favorite: Favorite) -> Result<bool, RepositoryError>;
    /// Returns `false` when there was nothing to remove.
    fn remove(&self, user: &UserId, property_id: &PropertyId) -> Result<bool, RepositoryError>;
    fn for_user(&self, user: &UserId) -> Result<Vec<Favorite>, RepositoryError>;
    /// Remove every favorite of a property, returning what was removed.
    fn remove_for_property(&self, property_id: &PropertyId)
        -> Result<Vec<Favorite>, RepositoryError>;
}

/// Client preference maps keyed by user.
pub trait ProfileRepository: Send + Sync {
    fn preferences(&self, user: &UserId) -> Result<Option<ClientPreferences>, RepositoryError>;
    fn save_preferences(
        &self,
        user: &UserId,
        preferences: ClientPreferences,
    ) -> Result<(), RepositoryError>;
}
