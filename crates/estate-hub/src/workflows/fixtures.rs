//! Shared scaffolding for the workflow test suites.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::identity::{Actor, UserId, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::marketplace::Marketplace;
use crate::workflows::listings::{DealType, NewProperty, Property};
use crate::workflows::memory::{InMemoryStore, RecordingLiveChannel};
use crate::workflows::notifications::{Notification, NotificationKind, NotificationRepository};

pub(crate) const FIRST_SLOT: &str = "2026-05-04T10:00:00Z";
pub(crate) const SECOND_SLOT: &str = "2026-05-05T15:30:00Z";

pub(crate) struct Harness {
    pub(crate) store: InMemoryStore,
    pub(crate) live: RecordingLiveChannel,
    pub(crate) market: Marketplace,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_live(RecordingLiveChannel::new())
    }

    pub(crate) fn with_live(live: RecordingLiveChannel) -> Self {
        let store = InMemoryStore::new();
        let market = Marketplace::in_memory(&store, Arc::new(live.clone()));
        Self {
            store,
            live,
            market,
        }
    }

    pub(crate) fn publish(
        &self,
        owner: &Actor,
        title: &str,
        price: f64,
        requirements: Value,
    ) -> Property {
        self.market
            .listings
            .create(owner, new_property(title, price, requirements))
            .expect("property published")
    }

    pub(crate) fn notifications_for(&self, user: &str) -> Vec<Notification> {
        NotificationRepository::for_recipient(&self.store, &UserId::new(user))
            .expect("notifications readable")
    }

    pub(crate) fn notifications_of_kind(
        &self,
        user: &str,
        kind: NotificationKind,
    ) -> Vec<Notification> {
        self.notifications_for(user)
            .into_iter()
            .filter(|notification| notification.kind == kind)
            .collect()
    }
}

pub(crate) fn new_property(title: &str, price: f64, requirements: Value) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        price,
        deal_type: DealType::Rent,
        area_sqm: Some(72.0),
        bedrooms: Some(2),
        bathrooms: Some(1),
        location: Some("Thessaloniki".to_string()),
        requirements: serde_json::from_value(requirements).expect("requirements parse"),
    }
}

pub(crate) fn request_as(
    actor: Option<&Actor>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder
            .header(USER_ID_HEADER, actor.id.as_str())
            .header(USER_ROLE_HEADER, actor.role.label());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("body serializes")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
