//! Wiring of the marketplace workflows over a shared store and live channel.

use std::sync::Arc;

use axum::Router;

use crate::workflows::appointments::{appointment_router, AppointmentService};
use crate::workflows::listings::{listing_router, ListingService};
use crate::workflows::matching::VisibilityFilter;
use crate::workflows::memory::InMemoryStore;
use crate::workflows::notifications::{
    notification_router, LiveChannel, NotificationDispatcher, NotificationService,
};

/// The assembled workflow services.
#[derive(Clone)]
pub struct Marketplace {
    pub listings: Arc<ListingService>,
    pub appointments: Arc<AppointmentService>,
    pub notifications: Arc<NotificationService>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl Marketplace {
    pub fn in_memory(store: &InMemoryStore, live: Arc<dyn LiveChannel>) -> Self {
        let store = Arc::new(store.clone());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            live,
        ));
        let appointments = Arc::new(AppointmentService::new(
            store.clone(),
            store.clone(),
            dispatcher.clone(),
        ));
        let listings = Arc::new(ListingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            appointments.clone(),
            dispatcher.clone(),
            VisibilityFilter::default(),
        ));
        let notifications = Arc::new(NotificationService::new(store));

        Self {
            listings,
            appointments,
            notifications,
            dispatcher,
        }
    }

    /// Every workflow route, merged.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(listing_router(self.listings.clone()))
            .merge(appointment_router(self.appointments.clone()))
            .merge(notification_router(self.notifications.clone()))
    }
}
