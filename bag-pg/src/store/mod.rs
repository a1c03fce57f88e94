//! Stockage PostgreSQL des verblijfsobjecten

pub mod pool;
pub mod queries;
pub mod schema;
pub mod upsert;

pub use pool::{create_pool, test_connection, DatabaseConfig, SslMode, DATABASE_URL_ENV};
pub use queries::{
    list_municipalities, search_residential, verify, MunicipalityCount, SearchHit,
    VerificationReport,
};
pub use schema::{ensure_schema, SchemaStatus, BUILDING_TABLE, RECORD_TABLE};
pub use upsert::{upsert, ConflictPolicy};
