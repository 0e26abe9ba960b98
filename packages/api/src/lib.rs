//! HTTP surface and scheduling around the ingestion pipeline.

pub mod app;
pub mod config;
pub mod routes;
pub mod scheduler;

pub use app::{build_app, AppState};
pub use config::Config;
