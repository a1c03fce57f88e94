//! Propriétés typées d'un verblijfsobject PDOK

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Propriétés lues dans une feature `bag:verblijfsobject`
///
/// Chaque champ est optionnel ; les valeurs par défaut sont appliquées par
/// [`super::FieldMapping`], jamais ici.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BagProperties {
    #[serde(default, deserialize_with = "scalar_string")]
    pub identificatie: Option<String>,
    #[serde(default)]
    pub gebruiksdoel: Option<String>,
    #[serde(default, deserialize_with = "integral_number")]
    pub oppervlakte: Option<i64>,
    #[serde(default)]
    pub woonplaats: Option<String>,
    #[serde(default)]
    pub openbareruimte: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub huisnummer: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub pandidentificatie: Option<String>,
}

impl BagProperties {
    /// Type les propriétés brutes ; `null` vaut un sac vide
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(value)
    }
}

/// Accepte une chaîne ou un nombre (`huisnummer: 12` comme `"12"`)
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Accepte un entier ou un flottant sans partie fractionnaire (`1200.0`)
fn integral_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected integer, got {other}"
            )))
        }
    };

    if let Some(i) = number.as_i64() {
        return Ok(Some(i));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(serde::de::Error::custom(format!(
            "expected integer, got {number}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_as_strings() {
        let props = BagProperties::from_value(&json!({
            "identificatie": "0599010000000001",
            "huisnummer": 12,
            "pandidentificatie": 599100000000001u64
        }))
        .unwrap();

        assert_eq!(props.identificatie.as_deref(), Some("0599010000000001"));
        assert_eq!(props.huisnummer.as_deref(), Some("12"));
        assert_eq!(props.pandidentificatie.as_deref(), Some("599100000000001"));
        assert_eq!(props.oppervlakte, None);
    }

    #[test]
    fn test_null_bag_is_empty() {
        let props = BagProperties::from_value(&Value::Null).unwrap();
        assert_eq!(props, BagProperties::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let props = BagProperties::from_value(&json!({
            "identificatie": "X",
            "rdf_seealso": "http://bag.basisregistraties.overheid.nl/..."
        }))
        .unwrap();
        assert_eq!(props.identificatie.as_deref(), Some("X"));
    }

    #[test]
    fn test_integral_float_area() {
        let props = BagProperties::from_value(&json!({ "oppervlakte": 1200.0 })).unwrap();
        assert_eq!(props.oppervlakte, Some(1200));

        let props = BagProperties::from_value(&json!({ "oppervlakte": null })).unwrap();
        assert_eq!(props.oppervlakte, None);

        assert!(BagProperties::from_value(&json!({ "oppervlakte": 1200.5 })).is_err());
        assert!(BagProperties::from_value(&json!({ "oppervlakte": 1e30 })).is_err());
    }

    #[test]
    fn test_mistyped_values_rejected() {
        assert!(BagProperties::from_value(&json!({ "oppervlakte": "groot" })).is_err());
        assert!(BagProperties::from_value(&json!({ "huisnummer": [1, 2] })).is_err());
        assert!(BagProperties::from_value(&json!("not an object")).is_err());
    }
}
