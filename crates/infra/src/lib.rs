//! Infrastructure layer: sales stores, Postgres wiring, configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{
    InMemorySalesStore, PostgresSalesStore, RecordCounts, SalesRepository, StoreError, StoreResult,
};
