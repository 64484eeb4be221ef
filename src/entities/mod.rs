//! Database entities (SeaORM models)

pub mod classification;
pub mod lot;
pub mod lot_movement;
pub mod material_type;
pub mod price_configuration;
pub mod purchase_request;
pub mod rating_configuration;
pub mod request_item;
pub mod supplier;

pub use classification::Classification;
