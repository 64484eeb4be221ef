//! Scrapyard API Library
//!
//! Purchase intake of scrap material: requesters submit weighed items,
//! pricing is resolved from the supplier rating and material price tables,
//! approvers confirm or reject the batch, and received batches become lots
//! tracked through physical locations via an append-only movement ledger.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Versioned API router, mounted under /api/v1
pub fn api_v1_routes() -> Router<AppState> {
    handlers::routes()
}

/// Liveness probe
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health routes, mounted at the server root
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
