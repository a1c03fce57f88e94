//! # bag-wfs
//!
//! Lecture des verblijfsobjecten de la BAG (registre néerlandais des adresses
//! et bâtiments) via le WFS PDOK.
//!
//! ## Features
//!
//! - Requêtes `GetFeature` WFS 2.0.0 filtrées en CQL côté serveur
//! - Parsing tolérant : une feature invalide est écartée, le lot continue
//! - Conversion RD New (EPSG:28992) → WGS84 par polynôme, sans dépendance
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bag_wfs::{parse_all, FieldMapping, WfsClient, WfsConfig};
//!
//! let client = WfsClient::new(WfsConfig::default())?;
//! let features = client.fetch_large_units(200, 50_000).await;
//! let result = parse_all(&features, &FieldMapping::default());
//!
//! for record in &result.records {
//!     println!("{} {} m² ({}, {})", record.id(), record.area, record.latitude(), record.longitude());
//! }
//! ```

pub mod error;
pub mod parser;
pub mod rd;
pub mod types;
pub mod wfs;

pub use error::BagError;
pub use parser::{parse, parse_all, parse_with, FieldMapping, MunicipalitySource, ParseResult};
pub use rd::{to_geodetic, Geodetic};
pub use types::{Building, FeatureCollection, NormalizedRecord, RawFeature, RESIDENTIAL_USAGE};
pub use wfs::{FeatureQuery, WfsClient, WfsConfig};
