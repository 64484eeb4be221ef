use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::AuthenticatedActor,
    commands::movements::record_movement_command::RecordMovementCommand,
    entities::lot::LotStatus,
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordMovementRequest {
    /// transfer, dispatch, return or correction
    pub movement_type: String,
    #[validate(length(min = 1, max = 120))]
    pub destination_location: String,
    #[validate(range(min = 0.0001))]
    pub weight_kg: Option<f64>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Opaque client details recorded on the audit sub-event
    pub client_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateLotStatusRequest {
    /// approved or rejected
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListLotsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// List lots
#[utoipa::path(
    get,
    path = "/api/v1/lots",
    responses((status = 200, description = "Lots listed")),
    tag = "lots"
)]
pub async fn list_lots(
    State(state): State<AppState>,
    Query(query): Query<ListLotsQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let default_pagination = PaginationParams::default();
    let pagination = PaginationParams {
        page: query.page.unwrap_or(default_pagination.page),
        per_page: query.per_page.unwrap_or(default_pagination.per_page),
    };

    let (lots, total) = state
        .services
        .lots
        .list_lots(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        lots,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a lot by ID
#[utoipa::path(
    get,
    path = "/api/v1/lots/{id}",
    params(("id" = Uuid, Path, description = "Lot ID")),
    responses(
        (status = 200, description = "Lot fetched"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lot = state
        .services
        .lots
        .get_lot(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(lot))
}

/// Current location of a lot, derived from its movement ledger
#[utoipa::path(
    get,
    path = "/api/v1/lots/{id}/location",
    params(("id" = Uuid, Path, description = "Lot ID")),
    responses(
        (status = 200, description = "Current location resolved"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn get_lot_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let location = state
        .services
        .lots
        .current_location(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "lot_id": id,
        "location": location,
    })))
}

/// Movement history of a lot, newest first
#[utoipa::path(
    get,
    path = "/api/v1/lots/{id}/movements",
    params(("id" = Uuid, Path, description = "Lot ID")),
    responses(
        (status = 200, description = "Movement history fetched"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn get_lot_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let movements = state
        .services
        .lots
        .movement_history(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(movements))
}

/// Record a movement of a lot to a new location
#[utoipa::path(
    post,
    path = "/api/v1/lots/{id}/movements",
    params(("id" = Uuid, Path, description = "Lot ID")),
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement recorded"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn record_lot_movement(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordMovementRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RecordMovementCommand {
        lot_id: id,
        movement_type: payload.movement_type,
        destination_location: payload.destination_location,
        performed_by: actor.id,
        weight_kg: payload.weight_kg,
        notes: payload.notes,
        client_metadata: payload.client_metadata,
    };

    let result = state
        .services
        .lots
        .record_movement(command)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(result))
}

/// Record the inspection decision on an open lot
#[utoipa::path(
    post,
    path = "/api/v1/lots/{id}/status",
    params(("id" = Uuid, Path, description = "Lot ID")),
    request_body = UpdateLotStatusRequest,
    responses(
        (status = 200, description = "Lot status updated"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Lot is not open", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn update_lot_status(
    State(state): State<AppState>,
    _actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLotStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = LotStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::ValidationError(format!(
            "Unknown lot status '{}': expected approved or rejected",
            payload.status
        ))
    })?;

    let lot = state
        .services
        .lots
        .set_status(id, status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(lot))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lots))
        .route("/:id", get(get_lot))
        .route("/:id/location", get(get_lot_location))
        .route(
            "/:id/movements",
            get(get_lot_movements).post(record_lot_movement),
        )
        .route("/:id/status", post(update_lot_status))
}
