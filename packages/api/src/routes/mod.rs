mod health;
mod ingest;

pub use health::health_handler;
pub use ingest::{ingest_cases_handler, ingest_catalog_handler, ingest_news_handler};
