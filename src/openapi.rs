use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scrapyard API",
        description = "Purchase intake, classification-based pricing and lot tracking for scrap material yards",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        handlers::requests::create_purchase_request,
        handlers::requests::get_purchase_request,
        handlers::requests::list_purchase_requests,
        handlers::requests::approve_purchase_request,
        handlers::requests::reject_purchase_request,
        handlers::requests::receive_purchase_request,
        handlers::requests::delete_purchase_request,
        handlers::lots::list_lots,
        handlers::lots::get_lot,
        handlers::lots::get_lot_location,
        handlers::lots::get_lot_movements,
        handlers::lots::record_lot_movement,
        handlers::lots::update_lot_status,
        handlers::catalog::create_supplier,
        handlers::catalog::list_suppliers,
        handlers::catalog::get_supplier,
        handlers::catalog::create_material_type,
        handlers::catalog::list_material_types,
        handlers::catalog::upsert_rating_configuration,
        handlers::catalog::get_rating_configuration,
        handlers::catalog::upsert_price_configuration,
        handlers::catalog::list_price_configurations,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        handlers::requests::CreatePurchaseRequestRequest,
        handlers::requests::PurchaseRequestItemRequest,
        handlers::requests::RejectPurchaseRequestRequest,
        handlers::lots::RecordMovementRequest,
        handlers::lots::UpdateLotStatusRequest,
        handlers::catalog::CreateSupplierRequest,
        handlers::catalog::CreateMaterialTypeRequest,
        handlers::catalog::UpsertRatingConfigurationRequest,
        handlers::catalog::UpsertPriceConfigurationRequest,
    )),
    tags(
        (name = "purchase-requests", description = "Purchase request lifecycle"),
        (name = "lots", description = "Lots and the movement ledger"),
        (name = "catalog", description = "Reference catalog administration"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
