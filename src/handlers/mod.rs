pub mod catalog;
pub mod common;
pub mod lots;
pub mod requests;

use crate::{
    db::DbPool,
    events::EventSender,
    services::{catalog::CatalogService, lots::LotService, requests::RequestService},
    AppState,
};
use axum::Router;
use std::sync::Arc;

/// Services shared by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub requests: Arc<RequestService>,
    pub lots: Arc<LotService>,
    pub catalog: Arc<CatalogService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            requests: Arc::new(RequestService::new(db.clone(), event_sender.clone())),
            lots: Arc::new(LotService::new(db.clone(), event_sender)),
            catalog: Arc::new(CatalogService::new(db)),
        }
    }
}

/// Versioned API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/purchase-requests", requests::routes())
        .nest("/lots", lots::routes())
        .merge(catalog::routes())
}
