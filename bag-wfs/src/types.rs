//! Types de données pour le crate bag-wfs

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::rd::{self, Geodetic};

/// Valeur de `gebruiksdoel` désignant un logement
pub const RESIDENTIAL_USAGE: &str = "woonfunctie";

/// Réponse brute du WFS (`outputFormat=json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

/// Une feature telle que reçue du service, non typée
///
/// Le typage des propriétés est fait par le parser, feature par feature, pour
/// qu'une feature mal formée n'invalide pas toute la collection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFeature {
    /// Propriétés plates (`identificatie`, `oppervlakte`, ...)
    #[serde(default)]
    pub properties: serde_json::Value,

    /// Descripteur de géométrie (`{"type": ..., "coordinates": ...}`)
    #[serde(default)]
    pub geometry: serde_json::Value,
}

impl RawFeature {
    /// Valeur textuelle d'une propriété, si présente et de type chaîne
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Verblijfsobject normalisé, unité écrite en base
///
/// `id` et la position projetée ne sont modifiables qu'au travers du
/// constructeur et de [`NormalizedRecord::set_position`], qui recalculent
/// toujours latitude et longitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    id: String,
    pub usage_purpose: String,
    /// Surface en m², toujours >= 0
    pub area: i32,
    x: f64,
    y: f64,
    lat: f64,
    lon: f64,
    pub building_id: String,
    /// Approximation : voir [`crate::parser::MunicipalitySource`]
    pub municipality: String,
    pub locality: String,
    pub street_name: String,
    pub house_number: String,
    pub postal_code: String,
    pub status: String,
}

impl NormalizedRecord {
    /// Crée un enregistrement à la position RD donnée, attributs vides
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        let Geodetic { latitude, longitude } = rd::to_geodetic(x, y);
        Self {
            id: id.into(),
            usage_purpose: String::new(),
            area: 0,
            x,
            y,
            lat: latitude,
            lon: longitude,
            building_id: String::new(),
            municipality: String::new(),
            locality: String::new(),
            street_name: String::new(),
            house_number: String::new(),
            postal_code: String::new(),
            status: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Coordonnées RD (EPSG:28992)
    pub fn projected(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }

    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Position WGS84 (x = longitude, y = latitude)
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }

    /// Déplace l'enregistrement et recalcule lat/lon
    pub fn set_position(&mut self, x: f64, y: f64) {
        let geodetic = rd::to_geodetic(x, y);
        self.x = x;
        self.y = y;
        self.lat = geodetic.latitude;
        self.lon = geodetic.longitude;
    }

    /// Vrai si l'objet est un logement
    pub fn is_residential(&self) -> bool {
        self.usage_purpose == RESIDENTIAL_USAGE
    }
}

/// Pand (bâtiment), entité déclarée mais non alimentée par l'import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Building {
    pub id: String,
    pub construction_year: Option<i32>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_derives_geodetic() {
        let record = NormalizedRecord::new("X", 155000.0, 463000.0);
        assert_eq!(record.id(), "X");
        assert_eq!(record.latitude(), 52.15517440);
        assert_eq!(record.longitude(), 5.38720621);
        assert_eq!(record.area, 0);
    }

    #[test]
    fn test_set_position_recomputes() {
        let mut record = NormalizedRecord::new("X", 155000.0, 463000.0);
        record.set_position(92500.0, 437000.0);

        assert_eq!(record.projected(), (92500.0, 437000.0));
        let expected = rd::to_geodetic(92500.0, 437000.0);
        assert_eq!(record.latitude(), expected.latitude);
        assert_eq!(record.longitude(), expected.longitude);
    }

    #[test]
    fn test_collection_tolerates_missing_members() {
        let json = r#"{"type":"FeatureCollection","features":[{"type":"Feature"}]}"#;
        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert!(collection.features[0].properties.is_null());
        assert!(collection.features[0].geometry.is_null());

        let empty: FeatureCollection = serde_json::from_str("{}").unwrap();
        assert!(empty.features.is_empty());
    }

    #[test]
    fn test_is_residential() {
        let mut record = NormalizedRecord::new("X", 0.0, 0.0);
        assert!(!record.is_residential());
        record.usage_purpose = RESIDENTIAL_USAGE.to_string();
        assert!(record.is_residential());
    }
}
