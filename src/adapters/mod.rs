// Adapters layer: concrete implementations for external systems (storage, query tool).

pub mod bigquery;
pub mod storage;

pub use bigquery::BigQueryRunner;
pub use storage::LocalStorage;
