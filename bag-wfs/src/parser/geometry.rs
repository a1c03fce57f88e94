//! Lecture de la paire de coordonnées d'une géométrie GeoJSON

use serde_json::Value;

use crate::BagError;

/// Extrait la première paire (x, y) de `geometry.coordinates`
///
/// - géométrie ou `coordinates` absents : (0, 0)
/// - `[x, y]` : lu tel quel
/// - `[[x, y], ...]` (anneau, ligne) : première paire
///
/// Un seul niveau d'imbrication est déballé ; au-delà, ou si le tableau est
/// vide ou non numérique, la feature est invalide.
pub fn first_coordinate_pair(id: &str, geometry: &Value) -> Result<(f64, f64), BagError> {
    let coords = match geometry.get("coordinates") {
        None | Some(Value::Null) => return Ok((0.0, 0.0)),
        Some(c) => c,
    };

    let outer = coords
        .as_array()
        .ok_or_else(|| BagError::invalid_geometry(id, "coordinates is not an array"))?;
    let first = outer
        .first()
        .ok_or_else(|| BagError::invalid_geometry(id, "empty coordinates"))?;

    let pair = match first {
        Value::Array(inner) => inner,
        _ => outer,
    };

    let x = ordinate(id, pair.first())?;
    let y = ordinate(id, pair.get(1))?;
    Ok((x, y))
}

fn ordinate(id: &str, value: Option<&Value>) -> Result<f64, BagError> {
    match value {
        None => Ok(0.0),
        Some(v) => v.as_f64().ok_or_else(|| {
            BagError::invalid_geometry(id, format!("non-numeric ordinate {v}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point() {
        let geom = json!({"type": "Point", "coordinates": [92500.0, 437000.0]});
        assert_eq!(first_coordinate_pair("X", &geom).unwrap(), (92500.0, 437000.0));
    }

    #[test]
    fn test_ring_takes_first_pair() {
        let geom = json!({
            "type": "LineString",
            "coordinates": [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]
        });
        assert_eq!(first_coordinate_pair("X", &geom).unwrap(), (1.0, 2.0));
    }

    #[test]
    fn test_missing_geometry_defaults_to_zero() {
        assert_eq!(first_coordinate_pair("X", &Value::Null).unwrap(), (0.0, 0.0));
        assert_eq!(
            first_coordinate_pair("X", &json!({"type": "Point"})).unwrap(),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_integer_coordinates() {
        let geom = json!({"type": "Point", "coordinates": [121000, 487000]});
        assert_eq!(first_coordinate_pair("X", &geom).unwrap(), (121000.0, 487000.0));
    }

    #[test]
    fn test_invalid_coordinates() {
        let empty = json!({"coordinates": []});
        assert!(first_coordinate_pair("X", &empty).is_err());

        let polygon = json!({"coordinates": [[[1.0, 2.0], [3.0, 4.0]]]});
        let err = first_coordinate_pair("X", &polygon).unwrap_err();
        assert_eq!(err.feature_id(), Some("X"));

        let text = json!({"coordinates": ["a", "b"]});
        assert!(first_coordinate_pair("X", &text).is_err());

        let scalar = json!({"coordinates": 12});
        assert!(first_coordinate_pair("X", &scalar).is_err());
    }
}
