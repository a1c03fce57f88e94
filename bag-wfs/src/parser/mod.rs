//! Parsing des features PDOK en enregistrements normalisés

mod geometry;
mod mapping;
mod properties;

pub use geometry::first_coordinate_pair;
pub use mapping::{FieldDefaults, FieldMapping, MunicipalitySource};
pub use properties::BagProperties;

use tracing::{debug, warn};

use crate::{BagError, NormalizedRecord, RawFeature};

/// Identifiant utilisé dans les messages quand `identificatie` est illisible
pub const UNKNOWN_ID: &str = "<unknown>";

/// Largeurs maximales des colonnes texte de `verblijfsobject`, en caractères
pub mod widths {
    pub const ID: usize = 50;
    pub const USAGE_PURPOSE: usize = 100;
    pub const BUILDING_ID: usize = 50;
    pub const MUNICIPALITY: usize = 100;
    pub const LOCALITY: usize = 100;
    pub const STREET_NAME: usize = 200;
    pub const HOUSE_NUMBER: usize = 20;
    pub const POSTAL_CODE: usize = 10;
    pub const STATUS: usize = 100;
}

/// Résultat du parsing d'un lot de features
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Enregistrements valides, dans l'ordre de la collection
    pub records: Vec<NormalizedRecord>,

    /// Features écartées (non fatales)
    pub errors: Vec<BagError>,
}

/// Parse une feature avec la politique par défaut
pub fn parse(raw: &RawFeature) -> Result<NormalizedRecord, BagError> {
    parse_with(raw, &FieldMapping::default())
}

/// Parse une feature avec une politique de correspondance explicite
///
/// Latitude et longitude sont toujours recalculées depuis les coordonnées RD.
pub fn parse_with(raw: &RawFeature, mapping: &FieldMapping) -> Result<NormalizedRecord, BagError> {
    let context_id = raw
        .property_str("identificatie")
        .unwrap_or(UNKNOWN_ID)
        .to_string();

    let props = BagProperties::from_value(&raw.properties)
        .map_err(|e| BagError::invalid_feature(&context_id, e.to_string()))?;

    let id = match props.identificatie.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => return Err(BagError::invalid_feature(context_id, "missing identificatie")),
    };

    let area = match props.oppervlakte {
        None => mapping.defaults.area,
        Some(value) => i32::try_from(value)
            .ok()
            .filter(|a| *a >= 0)
            .ok_or_else(|| {
                BagError::invalid_feature(&id, format!("oppervlakte out of range: {value}"))
            })?,
    };

    let (x, y) = first_coordinate_pair(&id, &raw.geometry)?;

    let mut record = NormalizedRecord::new(id, x, y);
    record.usage_purpose = mapping.usage_purpose(&props);
    record.area = area;
    record.building_id = mapping.text(&props.pandidentificatie);
    record.municipality = mapping.municipality(&props);
    record.locality = mapping.locality(&props);
    record.street_name = mapping.text(&props.openbareruimte);
    record.house_number = mapping.text(&props.huisnummer);
    record.postal_code = mapping.text(&props.postcode);
    record.status = mapping.text(&props.status);

    check_widths(&record)?;
    Ok(record)
}

/// Rejette un enregistrement dont un attribut ne tient pas dans sa colonne
fn check_widths(record: &NormalizedRecord) -> Result<(), BagError> {
    let fields = [
        ("identificatie", record.id(), widths::ID),
        ("gebruiksdoel", record.usage_purpose.as_str(), widths::USAGE_PURPOSE),
        ("pandidentificatie", record.building_id.as_str(), widths::BUILDING_ID),
        ("gemeente", record.municipality.as_str(), widths::MUNICIPALITY),
        ("woonplaats", record.locality.as_str(), widths::LOCALITY),
        ("openbareruimte", record.street_name.as_str(), widths::STREET_NAME),
        ("huisnummer", record.house_number.as_str(), widths::HOUSE_NUMBER),
        ("postcode", record.postal_code.as_str(), widths::POSTAL_CODE),
        ("status", record.status.as_str(), widths::STATUS),
    ];

    for (name, value, max) in fields {
        if value.chars().count() > max {
            return Err(BagError::invalid_feature(
                record.id(),
                format!("{name} exceeds {max} chars"),
            ));
        }
    }
    Ok(())
}

/// Parse un lot ; une feature invalide est journalisée et écartée
pub fn parse_all(features: &[RawFeature], mapping: &FieldMapping) -> ParseResult {
    let mut result = ParseResult {
        records: Vec::with_capacity(features.len()),
        errors: Vec::new(),
    };

    for raw in features {
        match parse_with(raw, mapping) {
            Ok(record) => result.records.push(record),
            Err(e) => {
                warn!(error = %e, "Skipping feature");
                result.errors.push(e);
            }
        }
    }

    debug!(
        parsed = result.records.len(),
        skipped = result.errors.len(),
        "Parsed feature batch"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rd;
    use serde_json::json;

    fn feature(properties: serde_json::Value, geometry: serde_json::Value) -> RawFeature {
        RawFeature {
            properties,
            geometry,
        }
    }

    #[test]
    fn test_parse_full_feature() {
        let raw = feature(
            json!({
                "identificatie": "0599010000000001",
                "gebruiksdoel": "woonfunctie",
                "oppervlakte": 1200,
                "woonplaats": "Rotterdam",
                "openbareruimte": "Coolsingel",
                "huisnummer": 1,
                "postcode": "3011AD",
                "status": "Verblijfsobject in gebruik",
                "pandidentificatie": "0599100000000001"
            }),
            json!({"type": "Point", "coordinates": [92500.0, 437000.0]}),
        );

        let record = parse(&raw).unwrap();
        assert_eq!(record.id(), "0599010000000001");
        assert_eq!(record.usage_purpose, "woonfunctie");
        assert_eq!(record.area, 1200);
        assert_eq!(record.projected(), (92500.0, 437000.0));
        assert_eq!(record.municipality, "Rotterdam");
        assert_eq!(record.locality, "Rotterdam");
        assert_eq!(record.street_name, "Coolsingel");
        assert_eq!(record.house_number, "1");
        assert_eq!(record.postal_code, "3011AD");
        assert_eq!(record.building_id, "0599100000000001");
        assert!(record.is_residential());

        let expected = rd::to_geodetic(92500.0, 437000.0);
        assert_eq!(record.latitude(), expected.latitude);
        assert_eq!(record.longitude(), expected.longitude);
    }

    #[test]
    fn test_missing_area_defaults_to_zero() {
        let raw = feature(
            json!({"identificatie": "X"}),
            json!({"type": "Point", "coordinates": [155000.0, 463000.0]}),
        );

        let record = parse(&raw).unwrap();
        assert_eq!(record.id(), "X");
        assert_eq!(record.area, 0);
        assert_eq!(record.usage_purpose, "unknown");
        assert_eq!(record.locality, "Unknown");
        assert_eq!(record.municipality, "Unknown");
        assert_eq!(record.street_name, "");
        assert_eq!(record.postal_code, "");
        assert_eq!(record.status, "");
    }

    #[test]
    fn test_ring_uses_first_pair() {
        let raw = feature(
            json!({"identificatie": "X"}),
            json!({"coordinates": [[121000.0, 487000.0], [92500.0, 437000.0]]}),
        );
        let record = parse(&raw).unwrap();
        assert_eq!(record.projected(), (121000.0, 487000.0));
    }

    #[test]
    fn test_upstream_lat_lon_ignored() {
        let raw = feature(
            json!({"identificatie": "X", "lat": 0.0, "lon": 0.0}),
            json!({"coordinates": [155000.0, 463000.0]}),
        );
        let record = parse(&raw).unwrap();
        assert_eq!(record.latitude(), rd::PHI0);
        assert_eq!(record.longitude(), rd::LAM0);
    }

    #[test]
    fn test_rejected_features() {
        // Pas d'identifiant
        assert!(parse(&feature(json!({"oppervlakte": 10}), serde_json::Value::Null)).is_err());
        assert!(parse(&feature(json!({"identificatie": ""}), serde_json::Value::Null)).is_err());

        // Surface négative ou mal typée
        let err = parse(&feature(
            json!({"identificatie": "X", "oppervlakte": -5}),
            serde_json::Value::Null,
        ))
        .unwrap_err();
        assert_eq!(err.feature_id(), Some("X"));
        assert!(parse(&feature(
            json!({"identificatie": "X", "oppervlakte": "groot"}),
            serde_json::Value::Null,
        ))
        .is_err());
    }

    #[test]
    fn test_parse_all_skips_bad_features() {
        let features = vec![
            feature(json!({"identificatie": "A"}), json!({"coordinates": [1.0, 2.0]})),
            feature(json!({"identificatie": "B"}), json!({"coordinates": []})),
            feature(json!({"identificatie": "C"}), json!({"coordinates": [3.0, 4.0]})),
        ];

        let result = parse_all(&features, &FieldMapping::default());
        let ids: Vec<&str> = result.records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].feature_id(), Some("B"));
    }

    #[test]
    fn test_custom_defaults() {
        let mapping = FieldMapping {
            defaults: FieldDefaults {
                usage_purpose: "onbekend".into(),
                locality: "Onbekend".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let record = parse_with(&feature(json!({"identificatie": "X"}), serde_json::Value::Null), &mapping)
            .unwrap();
        assert_eq!(record.usage_purpose, "onbekend");
        assert_eq!(record.municipality, "Onbekend");
    }

    #[test]
    fn test_overlong_values_rejected() {
        let point = json!({"coordinates": [92500.0, 437000.0]});

        let err = parse(&feature(
            json!({"identificatie": "X", "postcode": "3011 AD-EXTRA"}),
            point.clone(),
        ))
        .unwrap_err();
        assert_eq!(err.feature_id(), Some("X"));
        assert!(err.to_string().contains("postcode exceeds 10 chars"));

        let long_id = "0".repeat(51);
        let err = parse(&feature(json!({"identificatie": long_id}), point.clone())).unwrap_err();
        assert!(err.to_string().contains("identificatie exceeds 50 chars"));

        // Limite en caractères, pas en octets
        let record = parse(&feature(
            json!({"identificatie": "X", "postcode": "éééééééééé", "huisnummer": "1".repeat(20)}),
            point,
        ))
        .unwrap();
        assert_eq!(record.postal_code.chars().count(), 10);
    }

    #[test]
    fn test_parse_all_skips_overlong_feature() {
        let features = vec![
            feature(
                json!({"identificatie": "A", "openbareruimte": "s".repeat(201)}),
                json!({"coordinates": [1.0, 2.0]}),
            ),
            feature(json!({"identificatie": "B"}), json!({"coordinates": [3.0, 4.0]})),
        ];

        let result = parse_all(&features, &FieldMapping::default());
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].id(), "B");
        assert_eq!(result.errors[0].feature_id(), Some("A"));
    }

    #[test]
    fn test_integral_float_area_accepted() {
        let record = parse(&feature(
            json!({"identificatie": "X", "oppervlakte": 1200.0}),
            serde_json::Value::Null,
        ))
        .unwrap();
        assert_eq!(record.area, 1200);

        assert!(parse(&feature(
            json!({"identificatie": "X", "oppervlakte": 1200.5}),
            serde_json::Value::Null,
        ))
        .is_err());
    }
}
