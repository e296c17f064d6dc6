use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::ServiceError;
use crate::identity::Actor;
use crate::workflows::matching::{ClientPreferences, MatchVerdict, PriceRange};

use super::domain::{DeletionSummary, NewProperty, Property, PropertyId};
use super::service::ListingService;

/// Router exposing the catalog, favorites, and client preferences.
pub fn listing_router(service: Arc<ListingService>) -> Router {
    Router::new()
        .route("/api/properties", get(list_handler).post(create_handler))
        .route(
            "/api/properties/:property_id",
            get(detail_handler).delete(delete_handler),
        )
        .route("/api/properties/:property_id/match", get(match_handler))
        .route(
            "/api/properties/:property_id/favorite",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route("/api/favorites", get(favorites_handler))
        .route(
            "/api/users/me/preferences",
            get(preferences_handler).put(save_preferences_handler),
        )
        .with_state(service)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<ListingService>>,
    actor: Option<Actor>,
    Query(range): Query<PriceRange>,
) -> Result<Json<Vec<Property>>, ServiceError> {
    service.list(actor.as_ref(), &range).map(Json)
}

pub(crate) async fn create_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
    Json(input): Json<NewProperty>,
) -> Result<impl IntoResponse, ServiceError> {
    let property = service.create(&actor, input)?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub(crate) async fn detail_handler(
    State(service): State<Arc<ListingService>>,
    Path(property_id): Path<String>,
) -> Result<Json<Property>, ServiceError> {
    service.get(&PropertyId(property_id)).map(Json)
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
    Path(property_id): Path<String>,
) -> Result<Json<DeletionSummary>, ServiceError> {
    service.delete(&actor, &PropertyId(property_id)).map(Json)
}

pub(crate) async fn match_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
    Path(property_id): Path<String>,
) -> Result<Json<MatchVerdict>, ServiceError> {
    service
        .match_report(&actor, &PropertyId(property_id))
        .map(Json)
}

pub(crate) async fn add_favorite_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let favorite = service.add_favorite(&actor, &PropertyId(property_id))?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub(crate) async fn remove_favorite_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let removed = service.remove_favorite(&actor, &PropertyId(property_id))?;
    Ok(Json(json!({ "removed": removed })))
}

pub(crate) async fn favorites_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
) -> Result<Json<Vec<Property>>, ServiceError> {
    service.favorites(&actor).map(Json)
}

pub(crate) async fn preferences_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
) -> Result<Json<ClientPreferences>, ServiceError> {
    service.preferences(&actor).map(Json)
}

pub(crate) async fn save_preferences_handler(
    State(service): State<Arc<ListingService>>,
    actor: Actor,
    Json(preferences): Json<ClientPreferences>,
) -> Result<Json<ClientPreferences>, ServiceError> {
    service.save_preferences(&actor, preferences).map(Json)
}
