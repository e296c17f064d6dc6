use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch},
    Json, Router,
};
use serde_json::json;

use crate::error::ServiceError;
use crate::identity::Actor;

use super::domain::{Notification, NotificationId};
use super::service::NotificationService;

/// Router exposing the notification feed.
pub fn notification_router(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notifications", get(list_handler))
        .route("/api/notifications/read-all", patch(read_all_handler))
        .route("/api/notifications/:notification_id/read", patch(read_handler))
        .route("/api/notifications/:notification_id", delete(delete_handler))
        .with_state(service)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<NotificationService>>,
    actor: Actor,
) -> Result<Json<Vec<Notification>>, ServiceError> {
    service.list(&actor).map(Json)
}

pub(crate) async fn read_handler(
    State(service): State<Arc<NotificationService>>,
    actor: Actor,
    Path(notification_id): Path<String>,
) -> Result<Json<Notification>, ServiceError> {
    service
        .mark_read(&actor, &NotificationId(notification_id))
        .map(Json)
}

pub(crate) async fn read_all_handler(
    State(service): State<Arc<NotificationService>>,
    actor: Actor,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = service.mark_all_read(&actor)?;
    Ok(Json(json!({ "updated": updated })))
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<NotificationService>>,
    actor: Actor,
    Path(notification_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    service.delete(&actor, &NotificationId(notification_id))?;
    Ok(StatusCode::NO_CONTENT)
}
