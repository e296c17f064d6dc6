use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;
use crate::identity::Actor;

use super::domain::{Appointment, AppointmentId};
use super::service::{AppointmentService, ProposeRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmBody {
    #[serde(default)]
    pub selected_slot: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(default)]
    pub status: String,
}

/// Router exposing the appointment negotiation endpoints.
pub fn appointment_router(service: Arc<AppointmentService>) -> Router {
    Router::new()
        .route("/api/appointments", get(list_handler))
        .route("/api/appointments/propose", post(propose_handler))
        .route("/api/appointments/confirm/:appointment_id", put(confirm_handler))
        .route("/api/appointments/:appointment_id", patch(status_handler))
        .with_state(service)
}

pub(crate) async fn propose_handler(
    State(service): State<Arc<AppointmentService>>,
    actor: Actor,
    Json(request): Json<ProposeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let appointment = service.propose(&actor, request)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment proposed",
            "appointment": appointment,
        })),
    ))
}

pub(crate) async fn confirm_handler(
    State(service): State<Arc<AppointmentService>>,
    actor: Actor,
    Path(appointment_id): Path<String>,
    Json(body): Json<ConfirmBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let appointment = service.confirm(
        &actor,
        &AppointmentId(appointment_id),
        &body.selected_slot,
    )?;
    Ok(Json(json!({
        "message": "Appointment confirmed",
        "appointment": appointment,
    })))
}

pub(crate) async fn status_handler(
    State(service): State<Arc<AppointmentService>>,
    actor: Actor,
    Path(appointment_id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Appointment>, ServiceError> {
    service
        .update_status(&actor, &AppointmentId(appointment_id), &body.status)
        .map(Json)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<AppointmentService>>,
    actor: Actor,
) -> Result<Json<Vec<Appointment>>, ServiceError> {
    service.list_for(&actor).map(Json)
}
