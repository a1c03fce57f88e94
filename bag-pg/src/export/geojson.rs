//! Export GeoJSON (EPSG:4326) des verblijfsobjecten

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bag_wfs::NormalizedRecord;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

use crate::store::SearchHit;

/// Construit une feature Point `[lon, lat]` dont les propriétés sont les attributs sérialisés
fn point_feature<T: Serialize>(id: &str, geometry: Value, attributes: &T) -> Result<Feature> {
    let properties: JsonObject = match serde_json::to_value(attributes)? {
        serde_json::Value::Object(map) => map,
        _ => anyhow::bail!("Attributes of {} are not an object", id),
    };

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: Some(geojson::feature::Id::String(id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Collection de points à partir d'enregistrements normalisés
pub fn records_to_collection(records: &[NormalizedRecord]) -> Result<FeatureCollection> {
    let features = records
        .iter()
        .map(|r| point_feature(r.id(), Value::from(&r.point()), r))
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Collection de points à partir de résultats de recherche
pub fn hits_to_collection(hits: &[SearchHit]) -> Result<FeatureCollection> {
    let features = hits
        .iter()
        .map(|h| point_feature(&h.id, Value::Point(vec![h.longitude, h.latitude]), h))
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Écrit une collection dans un fichier
pub fn write_collection(collection: &FeatureCollection, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;

    Ok(())
}
