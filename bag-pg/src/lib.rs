//! # bag-pg
//!
//! Import des verblijfsobjecten de la BAG (PDOK WFS) dans PostgreSQL.
//!
//! ## Features
//!
//! - Import idempotent : écrasement partiel sur conflit pour le flux, jamais
//!   pour les données de référence
//! - Pool de connexions avec TLS optionnel
//! - Rapport d'import et requêtes de vérification
//! - Export GeoJSON standalone et recherche par commune
//!
//! ## Usage CLI
//!
//! ```bash
//! # Import PDOK vers PostgreSQL (DATABASE_URL lu dans l'environnement ou .env)
//! bag-pg
//! bag-pg --min-area 500 --report ./import.json
//! bag-pg --no-fetch
//!
//! # Export GeoJSON (sans base de données)
//! bag-pg to-geojson --place Rotterdam --output ./rotterdam.geojson
//!
//! # Recherche
//! bag-pg search --municipality Amsterdam --min-area 1000
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod report;
pub mod seed;
pub mod store;

pub use config::Config;
pub use report::{ImportReport, ImportStatus};
pub use store::{create_pool, upsert, ConflictPolicy, DatabaseConfig};
