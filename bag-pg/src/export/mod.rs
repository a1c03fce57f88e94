//! Export des verblijfsobjecten hors base

pub mod geojson;

pub use self::geojson::{hits_to_collection, records_to_collection, write_collection};
