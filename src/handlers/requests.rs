use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthenticatedActor,
    commands::requests::{
        approve_request_command::ApproveRequestCommand,
        create_request_command::{CreatePurchaseRequestCommand, RequestItemInput},
        delete_request_command::DeleteRequestCommand,
        receive_request_command::ReceiveRequestCommand,
        reject_request_command::RejectRequestCommand,
    },
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseRequestRequest {
    pub supplier_id: Uuid,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<PurchaseRequestItemRequest>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[serde(default)]
    pub pickup_requested: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PurchaseRequestItemRequest {
    pub material_type_id: Uuid,
    #[validate(range(min = 0.0001))]
    pub weight_kg: f64,
    /// light, medium or heavy
    pub classification: String,
    pub suggested_classification: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RejectPurchaseRequestRequest {
    #[validate(length(min = 1, max = 500, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListRequestsQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// Submit a purchase request with weighed items
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests",
    request_body = CreatePurchaseRequestRequest,
    responses(
        (status = 201, description = "Purchase request submitted"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 422, description = "Catalog not configured for an item", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn create_purchase_request(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Json(payload): Json<CreatePurchaseRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreatePurchaseRequestCommand {
        requester_id: actor.id,
        supplier_id: payload.supplier_id,
        items: payload
            .items
            .into_iter()
            .map(|item| RequestItemInput {
                material_type_id: item.material_type_id,
                weight_kg: item.weight_kg,
                classification: item.classification,
                suggested_classification: item.suggested_classification,
            })
            .collect(),
        notes: payload.notes,
        pickup_requested: payload.pickup_requested,
    };

    let result = state
        .services
        .requests
        .create_request(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase request created: {}", result.id);

    Ok(created_response(result))
}

/// Get a purchase request with its items
#[utoipa::path(
    get,
    path = "/api/v1/purchase-requests/{id}",
    params(("id" = Uuid, Path, description = "Purchase request ID")),
    responses(
        (status = 200, description = "Purchase request fetched"),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn get_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (request, items) = state
        .services
        .requests
        .get_request(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "request": request,
        "items": items,
    })))
}

/// List purchase requests
#[utoipa::path(
    get,
    path = "/api/v1/purchase-requests",
    responses((status = 200, description = "Purchase requests listed")),
    tag = "purchase-requests"
)]
pub async fn list_purchase_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let default_pagination = PaginationParams::default();
    let pagination = PaginationParams {
        page: query.page.unwrap_or(default_pagination.page),
        per_page: query.per_page.unwrap_or(default_pagination.per_page),
    };

    let (requests, total) = state
        .services
        .requests
        .list_requests(query.status, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        requests,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Approve a pending purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/approve",
    params(("id" = Uuid, Path, description = "Purchase request ID")),
    responses(
        (status = 200, description = "Purchase request approved"),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Request is not pending", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn approve_purchase_request(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let command = ApproveRequestCommand {
        id,
        approver_id: actor.id,
    };

    let result = state
        .services
        .requests
        .approve_request(command)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(result))
}

/// Reject a pending purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/reject",
    params(("id" = Uuid, Path, description = "Purchase request ID")),
    request_body = RejectPurchaseRequestRequest,
    responses(
        (status = 200, description = "Purchase request rejected"),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Request is not pending", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn reject_purchase_request(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPurchaseRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RejectRequestCommand {
        id,
        approver_id: actor.id,
        reason: payload.reason,
    };

    let result = state
        .services
        .requests
        .reject_request(command)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(result))
}

/// Receive an approved purchase request into inventory
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/receive",
    params(("id" = Uuid, Path, description = "Purchase request ID")),
    responses(
        (status = 201, description = "Lot created from request"),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Request not approved or already received", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn receive_purchase_request(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let command = ReceiveRequestCommand {
        id,
        receiver_id: actor.id,
    };

    let result = state
        .services
        .requests
        .receive_request(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase request {} received as lot {}", id, result.lot_number);

    Ok(created_response(result))
}

/// Delete a pending purchase request and its items
#[utoipa::path(
    delete,
    path = "/api/v1/purchase-requests/{id}",
    params(("id" = Uuid, Path, description = "Purchase request ID")),
    responses(
        (status = 204, description = "Purchase request deleted"),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Request already decided", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn delete_purchase_request(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let command = DeleteRequestCommand {
        id,
        actor_id: actor.id,
    };

    state
        .services
        .requests
        .delete_request(command)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_purchase_requests).post(create_purchase_request),
        )
        .route(
            "/:id",
            get(get_purchase_request).delete(delete_purchase_request),
        )
        .route("/:id/approve", post(approve_purchase_request))
        .route("/:id/reject", post(reject_purchase_request))
        .route("/:id/receive", post(receive_purchase_request))
}
