use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    auth::AuthenticatedActor,
    entities::Classification,
    errors::ApiError,
    services::catalog::{NewMaterialType, NewSupplier, RatingStars},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{get, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub document: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMaterialTypeRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    pub base_classification: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpsertRatingConfigurationRequest {
    pub light_stars: i16,
    pub medium_stars: i16,
    pub heavy_stars: i16,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpsertPriceConfigurationRequest {
    pub price_per_kg: f64,
}

// Handler functions

/// Register a supplier
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    _actor: AuthenticatedActor,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .catalog
        .create_supplier(NewSupplier {
            name: payload.name,
            document: payload.document,
            email: payload.email,
            phone: payload.phone,
            street: payload.street,
            city: payload.city,
            state: payload.state,
            postal_code: payload.postal_code,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(supplier))
}

/// List suppliers
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    responses((status = 200, description = "Suppliers listed")),
    tag = "catalog"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let suppliers = state
        .services
        .catalog
        .list_suppliers()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(suppliers))
}

/// Get a supplier by ID
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier fetched"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let supplier = state
        .services
        .catalog
        .get_supplier(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

/// Register a material type
#[utoipa::path(
    post,
    path = "/api/v1/material-types",
    request_body = CreateMaterialTypeRequest,
    responses(
        (status = 201, description = "Material type created"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_material_type(
    State(state): State<AppState>,
    _actor: AuthenticatedActor,
    Json(payload): Json<CreateMaterialTypeRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let material = state
        .services
        .catalog
        .create_material_type(NewMaterialType {
            name: payload.name,
            code: payload.code,
            base_classification: payload.base_classification,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(material))
}

/// List material types
#[utoipa::path(
    get,
    path = "/api/v1/material-types",
    responses((status = 200, description = "Material types listed")),
    tag = "catalog"
)]
pub async fn list_material_types(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let materials = state
        .services
        .catalog
        .list_material_types()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(materials))
}

/// Create or replace the rating table for a (supplier, material) pair
#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{supplier_id}/materials/{material_type_id}/rating-configuration",
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID"),
        ("material_type_id" = Uuid, Path, description = "Material type ID")
    ),
    request_body = UpsertRatingConfigurationRequest,
    responses(
        (status = 200, description = "Rating configuration stored"),
        (status = 400, description = "Star rating out of range", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn upsert_rating_configuration(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path((supplier_id, material_type_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpsertRatingConfigurationRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let config = state
        .services
        .catalog
        .upsert_rating_configuration(
            supplier_id,
            material_type_id,
            RatingStars {
                light: payload.light_stars,
                medium: payload.medium_stars,
                heavy: payload.heavy_stars,
            },
            actor.id,
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(config))
}

/// Get the rating table for a (supplier, material) pair
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{supplier_id}/materials/{material_type_id}/rating-configuration",
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID"),
        ("material_type_id" = Uuid, Path, description = "Material type ID")
    ),
    responses(
        (status = 200, description = "Rating configuration fetched"),
        (status = 422, description = "Pair not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_rating_configuration(
    State(state): State<AppState>,
    Path((supplier_id, material_type_id)): Path<(Uuid, Uuid)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let config = state
        .services
        .catalog
        .get_rating_configuration(supplier_id, material_type_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(config))
}

/// Create or replace the price for a (material, classification) pair
#[utoipa::path(
    put,
    path = "/api/v1/material-types/{id}/price-configurations/{classification}",
    params(
        ("id" = Uuid, Path, description = "Material type ID"),
        ("classification" = String, Path, description = "light, medium or heavy")
    ),
    request_body = UpsertPriceConfigurationRequest,
    responses(
        (status = 200, description = "Price configuration stored"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn upsert_price_configuration(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path((id, classification)): Path<(Uuid, String)>,
    Json(payload): Json<UpsertPriceConfigurationRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let classification = Classification::parse(&classification).ok_or_else(|| {
        ApiError::ValidationError(format!(
            "Unknown classification '{}': expected light, medium or heavy",
            classification
        ))
    })?;

    let price_per_kg = Decimal::from_f64_retain(payload.price_per_kg).ok_or_else(|| {
        ApiError::ValidationError(format!("Invalid price value {}", payload.price_per_kg))
    })?;

    let config = state
        .services
        .catalog
        .upsert_price_configuration(id, classification, price_per_kg, actor.id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(config))
}

/// List price configurations for a material type
#[utoipa::path(
    get,
    path = "/api/v1/material-types/{id}/price-configurations",
    params(("id" = Uuid, Path, description = "Material type ID")),
    responses((status = 200, description = "Price configurations listed")),
    tag = "catalog"
)]
pub async fn list_price_configurations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let configs = state
        .services
        .catalog
        .list_price_configurations(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(configs))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/:id", get(get_supplier))
        .route(
            "/suppliers/:supplier_id/materials/:material_type_id/rating-configuration",
            put(upsert_rating_configuration).get(get_rating_configuration),
        )
        .route(
            "/material-types",
            get(list_material_types).post(create_material_type),
        )
        .route(
            "/material-types/:id/price-configurations",
            get(list_price_configurations),
        )
        .route(
            "/material-types/:id/price-configurations/:classification",
            put(upsert_price_configuration),
        )
}
