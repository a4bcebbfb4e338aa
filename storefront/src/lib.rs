// vitrina/storefront/src/lib.rs

//! Storefront catalog service: public product listing, a password-gated
//! admin surface, and the upload/delete sagas in front of the object and
//! catalog stores.

pub mod config;
pub mod errors;
pub mod models;
pub mod sagas;
pub mod services;
pub mod state;
pub mod stores;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
