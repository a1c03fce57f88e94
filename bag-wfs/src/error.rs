//! Types d'erreurs pour le crate bag-wfs

use thiserror::Error;

use crate::parser::UNKNOWN_ID;

/// Erreurs pouvant survenir lors de l'interrogation du WFS ou du parsing d'une feature
#[derive(Debug, Error)]
pub enum BagError {
    /// Erreur de transport (connexion, timeout, lecture du corps)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Le service a répondu avec un statut non-2xx
    #[error("WFS responded with status {status}: {url}")]
    Status { status: u16, url: String },

    /// Le corps de la réponse n'est pas une FeatureCollection
    #[error("Invalid feature collection: {0}")]
    Decode(String),

    /// Attribut absent ou mal typé dans les propriétés
    #[error("Invalid feature {id}: {reason}")]
    InvalidFeature { id: String, reason: String },

    /// Coordonnées absentes, vides ou imbriquées trop profondément
    #[error("Invalid geometry for {id}: {reason}")]
    InvalidGeometry { id: String, reason: String },
}

impl BagError {
    /// Crée une erreur de feature invalide avec contexte
    pub fn invalid_feature(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Identifiant de la feature concernée, si l'erreur porte sur une feature
    /// dont l'identifiant est connu
    pub fn feature_id(&self) -> Option<&str> {
        match self {
            Self::InvalidFeature { id, .. } | Self::InvalidGeometry { id, .. } => {
                Some(id.as_str()).filter(|id| !id.is_empty() && *id != UNKNOWN_ID)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_id() {
        let err = BagError::invalid_geometry("0599010000000001", "empty coordinates");
        assert_eq!(err.feature_id(), Some("0599010000000001"));
        assert!(err.to_string().contains("empty coordinates"));

        let err = BagError::Decode("missing features".into());
        assert_eq!(err.feature_id(), None);
    }

    #[test]
    fn test_unknown_feature_id() {
        let raw = crate::RawFeature {
            properties: serde_json::json!({ "oppervlakte": 10 }),
            geometry: serde_json::Value::Null,
        };
        let err = crate::parse(&raw).unwrap_err();
        assert_eq!(err.feature_id(), None);
        assert!(err.to_string().contains("missing identificatie"));

        assert_eq!(BagError::invalid_feature("", "empty").feature_id(), None);
    }
}
