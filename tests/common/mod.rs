use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scrapyard_api::{
    db::{establish_connection, run_migrations, DbPool},
    entities::Classification,
    events::{Event, EventSender},
    services::{
        catalog::{CatalogService, NewMaterialType, NewSupplier, RatingStars},
        lots::LotService,
        requests::RequestService,
    },
};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct TestContext {
    pub db: Arc<DbPool>,
    pub requests: RequestService,
    pub lots: LotService,
    pub catalog: CatalogService,
    /// Keeps the event channel open so post-commit sends succeed
    #[allow(dead_code)]
    pub event_rx: mpsc::Receiver<Event>,
}

/// Connects to a named in-memory database (shared across the pool's
/// connections within this process), runs migrations and builds services.
pub async fn setup(db_name: &str) -> TestContext {
    let url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);
    let db = Arc::new(
        establish_connection(&url)
            .await
            .expect("Failed to connect to test database"),
    );
    run_migrations(db.as_ref())
        .await
        .expect("Failed to run migrations");

    let (tx, event_rx) = mpsc::channel(100);
    let event_sender = Arc::new(EventSender::new(tx));

    TestContext {
        requests: RequestService::new(db.clone(), event_sender.clone()),
        lots: LotService::new(db.clone(), event_sender),
        catalog: CatalogService::new(db.clone()),
        db,
        event_rx,
    }
}

pub struct SeededCatalog {
    pub supplier_id: Uuid,
    pub material_type_id: Uuid,
}

/// Seeds one supplier and one material with the reference configuration used
/// throughout the tests: stars {light: 1, medium: 3, heavy: 5} and prices
/// {light: 2.00, medium: 5.00, heavy: 9.00} per kg.
pub async fn seed_catalog(ctx: &TestContext) -> SeededCatalog {
    seed_catalog_with_prices(ctx, dec!(2.00), dec!(5.00), dec!(9.00)).await
}

pub async fn seed_catalog_with_prices(
    ctx: &TestContext,
    light: Decimal,
    medium: Decimal,
    heavy: Decimal,
) -> SeededCatalog {
    let admin = Uuid::new_v4();

    let supplier = ctx
        .catalog
        .create_supplier(new_supplier("Ferro Velho Norte"))
        .await
        .expect("Failed to create supplier");

    let material = ctx
        .catalog
        .create_material_type(NewMaterialType {
            name: "Copper scrap".to_string(),
            code: format!("CU-{}", Uuid::new_v4().simple()),
            base_classification: Some("medium".to_string()),
        })
        .await
        .expect("Failed to create material type");

    ctx.catalog
        .upsert_rating_configuration(
            supplier.id,
            material.id,
            RatingStars {
                light: 1,
                medium: 3,
                heavy: 5,
            },
            admin,
        )
        .await
        .expect("Failed to create rating configuration");

    for (classification, price) in [
        (Classification::Light, light),
        (Classification::Medium, medium),
        (Classification::Heavy, heavy),
    ] {
        ctx.catalog
            .upsert_price_configuration(material.id, classification, price, admin)
            .await
            .expect("Failed to create price configuration");
    }

    SeededCatalog {
        supplier_id: supplier.id,
        material_type_id: material.id,
    }
}

pub fn new_supplier(name: &str) -> NewSupplier {
    NewSupplier {
        name: name.to_string(),
        document: format!("DOC-{}", Uuid::new_v4().simple()),
        email: None,
        phone: None,
        street: None,
        city: None,
        state: None,
        postal_code: None,
    }
}
