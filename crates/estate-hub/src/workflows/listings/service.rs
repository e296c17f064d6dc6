use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::ServiceError;
use crate::identity::{Actor, Role, UserId};
use crate::workflows::appointments::AppointmentService;
use crate::workflows::matching::{
    Audience, ClientPreferences, Matchable, MatchVerdict, PriceRange, RequirementInput,
    VisibilityFilter,
};
use crate::workflows::notifications::dispatcher::best_effort;
use crate::workflows::notifications::{NotificationDispatcher, NotificationKind};

use super::domain::{DeletionSummary, Favorite, NewProperty, Property, PropertyId, PropertyStatus};
use super::repository::{FavoriteRepository, ProfileRepository, PropertyRepository};

static PROPERTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_property_id() -> PropertyId {
    let id = PROPERTY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PropertyId(format!("prop-{id:06}"))
}

/// Catalog operations: publishing, browsing, favorites, preferences, and removal.
pub struct ListingService {
    properties: Arc<dyn PropertyRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    profiles: Arc<dyn ProfileRepository>,
    appointments: Arc<AppointmentService>,
    dispatcher: Arc<NotificationDispatcher>,
    visibility: VisibilityFilter,
}

impl ListingService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        profiles: Arc<dyn ProfileRepository>,
        appointments: Arc<AppointmentService>,
        dispatcher: Arc<NotificationDispatcher>,
        visibility: VisibilityFilter,
    ) -> Self {
        Self {
            properties,
            favorites,
            profiles,
            appointments,
            dispatcher,
            visibility,
        }
    }

    pub fn create(&self, actor: &Actor, input: NewProperty) -> Result<Property, ServiceError> {
        if actor.role != Role::Owner {
            return Err(ServiceError::forbidden("Only owners can publish properties"));
        }
        if input.title.trim().is_empty() {
            return Err(ServiceError::bad_request("A title is required"));
        }
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(ServiceError::bad_request("Price must be a non-negative number"));
        }
        if input.area_sqm.is_some_and(|area| !area.is_finite() || area < 0.0) {
            return Err(ServiceError::bad_request("Area must be a non-negative number"));
        }

        let requirements = RequirementInput::from(
            self.visibility
                .scorer()
                .normalizer()
                .normalize(&input.requirements),
        );
        let property = Property {
            id: next_property_id(),
            owner: actor.id.clone(),
            title: input.title.trim().to_string(),
            price: input.price,
            deal_type: input.deal_type,
            area_sqm: input.area_sqm,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            location: input.location,
            status: PropertyStatus::Available,
            requirements,
            created_at: Utc::now(),
            deleted_at: None,
        };
        let stored = self.properties.insert(property)?;

        info!(property = %stored.id, owner = %stored.owner, "property published");
        Ok(stored)
    }

    pub fn get(&self, id: &PropertyId) -> Result<Property, ServiceError> {
        self.properties
            .fetch(id)?
            .filter(Property::is_active)
            .ok_or_else(|| ServiceError::not_found("Property not found"))
    }

    /// Clients see only listings they match; everyone else gets the price-filtered catalog.
    pub fn list(
        &self,
        actor: Option<&Actor>,
        range: &PriceRange,
    ) -> Result<Vec<Property>, ServiceError> {
        let catalog = self.properties.list_active()?;

        match actor.filter(|actor| actor.is_client()) {
            Some(client) => {
                let preferences = self.stored_preferences(&client.id)?;
                Ok(self
                    .visibility
                    .visible_catalog(Audience::Client(&preferences), catalog, range))
            }
            None => Ok(self.visibility.visible_catalog(Audience::Public, catalog, range)),
        }
    }

    /// Full scoring breakdown of one listing for the requesting client.
    pub fn match_report(
        &self,
        actor: &Actor,
        id: &PropertyId,
    ) -> Result<MatchVerdict, ServiceError> {
        if !actor.is_client() {
            return Err(ServiceError::forbidden("Only clients have match reports"));
        }
        let property = self.get(id)?;
        let preferences = self.stored_preferences(&actor.id)?;

        Ok(self.visibility.scorer().score(
            &preferences,
            property.requirements(),
            &property.attributes(),
        ))
    }

    pub fn preferences(&self, actor: &Actor) -> Result<ClientPreferences, ServiceError> {
        if !actor.is_client() {
            return Err(ServiceError::forbidden("Only clients keep preferences"));
        }
        self.stored_preferences(&actor.id)
    }

    pub fn save_preferences(
        &self,
        actor: &Actor,
        preferences: ClientPreferences,
    ) -> Result<ClientPreferences, ServiceError> {
        if !actor.is_client() {
            return Err(ServiceError::forbidden("Only clients keep preferences"));
        }
        self.profiles
            .save_preferences(&actor.id, preferences.clone())?;
        Ok(preferences)
    }

    /// Idempotent. Only a newly added favorite notifies the owner.
    pub fn add_favorite(&self, actor: &Actor, id: &PropertyId) -> Result<Favorite, ServiceError> {
        let property = self.get(id)?;
        let favorite = Favorite {
            user: actor.id.clone(),
            property_id: property.id.clone(),
            created_at: Utc::now(),
        };

        let added = self.favorites.add(favorite.clone())?;
        if added && property.owner != actor.id {
            best_effort(
                "notify owner of favorite",
                self.dispatcher.notify(
                    &property.owner,
                    Some(&actor.id),
                    NotificationKind::Favorite,
                    property.id.as_str(),
                    Some(format!("Someone saved \"{}\" to their favorites", property.title)),
                ),
            );
        }

        Ok(favorite)
    }

    pub fn remove_favorite(&self, actor: &Actor, id: &PropertyId) -> Result<bool, ServiceError> {
        Ok(self.favorites.remove(&actor.id, id)?)
    }

    /// The actor's favorited listings that are still published.
    pub fn favorites(&self, actor: &Actor) -> Result<Vec<Property>, ServiceError> {
        let mut favorited = Vec::new();
        for favorite in self.favorites.for_user(&actor.id)? {
            if let Some(property) = self
                .properties
                .fetch(&favorite.property_id)?
                .filter(Property::is_active)
            {
                favorited.push(property);
            }
        }
        Ok(favorited)
    }

    /// Soft-delete a listing and cascade to its favorites and appointments.
    ///
    /// Affected users (favoriters plus tenants of appointments that were not already cancelled,
    /// minus the owner) each get a `property_removed` notification.
    pub fn delete(&self, actor: &Actor, id: &PropertyId) -> Result<DeletionSummary, ServiceError> {
        let mut property = self.get(id)?;
        if property.owner != actor.id && actor.role != Role::Admin {
            return Err(ServiceError::forbidden(
                "Only the property owner can remove this property",
            ));
        }

        property.deleted_at = Some(Utc::now());
        self.properties.update(property.clone())?;

        let removed = self.favorites.remove_for_property(&property.id)?;
        let cascade = self.appointments.cancel_for_property(&property)?;

        let mut recipients: BTreeSet<UserId> =
            removed.iter().map(|favorite| favorite.user.clone()).collect();
        recipients.extend(cascade.affected_tenants);
        recipients.remove(&property.owner);

        let message = format!("The property \"{}\" has been removed", property.title);
        for recipient in &recipients {
            best_effort(
                "notify user of property removal",
                self.dispatcher.notify(
                    recipient,
                    Some(&actor.id),
                    NotificationKind::PropertyRemoved,
                    property.id.as_str(),
                    Some(message.clone()),
                ),
            );
        }

        let summary = DeletionSummary {
            property_id: property.id,
            removed_favorites: removed.len(),
            cancelled_appointments: cascade.cancelled.len(),
            notified_users: recipients.into_iter().collect(),
        };

        info!(
            property = %summary.property_id,
            favorites = summary.removed_favorites,
            appointments = summary.cancelled_appointments,
            notified = summary.notified_users.len(),
            "property removed"
        );
        Ok(summary)
    }

    fn stored_preferences(&self, user: &UserId) -> Result<ClientPreferences, ServiceError> {
        Ok(self.profiles.preferences(user)?.unwrap_or_default())
    }
}
