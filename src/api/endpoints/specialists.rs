//! Specialist endpoints.
//!
//! - `GET    /especialistas`            : active, ordered
//! - `GET    /especialistas/inactivos`  : soft-deleted
//! - `POST   /especialistas`            : create
//! - `GET    /especialistas/:id`        : detail
//! - `PUT    /especialistas/:id`        : partial update
//! - `DELETE /especialistas/:id`        : soft delete
//! - `POST   /especialistas/:id/restore`: restore
//! - `DELETE /especialistas/:id/force`  : hard delete

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MessageResponse};
use crate::models::{ListOrder, Specialist, SpecialistPayload};

pub const DEACTIVATED_MESSAGE: &str = "Especialista marcado como inactivo";
pub const RESTORED_MESSAGE: &str = "Especialista restaurado correctamente";
pub const DELETED_MESSAGE: &str = "Especialista eliminado permanentemente";

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    pub direction: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid specialist ID: {e}")))
}

/// `GET /especialistas?orderBy=&direction=`
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Specialist>>, ApiError> {
    let Query(query) = query?;
    let order = ListOrder::parse(query.order_by.as_deref(), query.direction.as_deref())?;
    Ok(Json(ctx.specialists.list_active(&order)?))
}

/// `GET /especialistas/inactivos`
pub async fn inactive(State(ctx): State<ApiContext>) -> Result<Json<Vec<Specialist>>, ApiError> {
    Ok(Json(ctx.specialists.list_inactive()?))
}

/// `POST /especialistas`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SpecialistPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Specialist>), ApiError> {
    let Json(payload) = payload?;
    let created = ctx.specialists.create(payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /especialistas/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Specialist>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ctx.specialists.get(&id)?))
}

/// `PUT /especialistas/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<SpecialistPayload>, JsonRejection>,
) -> Result<Json<Specialist>, ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    Ok(Json(ctx.specialists.update(&id, payload)?))
}

/// `DELETE /especialistas/:id`
pub async fn soft_delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    ctx.specialists.soft_delete(&id)?;
    Ok(Json(MessageResponse {
        message: DEACTIVATED_MESSAGE,
    }))
}

/// `POST /especialistas/:id/restore`
pub async fn restore(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    ctx.specialists.restore(&id)?;
    Ok(Json(MessageResponse {
        message: RESTORED_MESSAGE,
    }))
}

/// `DELETE /especialistas/:id/force`
pub async fn force_delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    ctx.specialists.hard_delete(&id)?;
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE,
    }))
}
