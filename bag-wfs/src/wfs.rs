//! Client du service WFS PDOK (protocole WFS 2.0.0, sortie GeoJSON)
//!
//! Les deux requêtes publiques ne propagent jamais d'erreur : un échec
//! réseau, un statut non-2xx ou un corps illisible sont journalisés et
//! donnent une liste vide. Une liste vide signifie donc « pas de données
//! disponibles », pas « aucune correspondance ».

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{BagError, FeatureCollection, RawFeature, RESIDENTIAL_USAGE};

/// Endpoint WFS BAG de PDOK
pub const PDOK_WFS_URL: &str = "https://service.pdok.nl/lv/bag/wfs/v2_0";

/// Type de feature interrogé
pub const VERBLIJFSOBJECT_TYPE: &str = "bag:verblijfsobject";

/// Configuration du client WFS
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WfsConfig {
    /// URL de base du service
    pub url: String,
    /// Valeur de `typeName`
    pub type_name: String,
    /// Timeout de la requête « grandes unités » (gros volume)
    pub bulk_timeout_secs: u64,
    /// Timeout de la requête par woonplaats
    pub place_timeout_secs: u64,
}

impl Default for WfsConfig {
    fn default() -> Self {
        Self {
            url: PDOK_WFS_URL.into(),
            type_name: VERBLIJFSOBJECT_TYPE.into(),
            bulk_timeout_secs: 300,
            place_timeout_secs: 120,
        }
    }
}

/// Requête `GetFeature` paramétrée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureQuery {
    /// Nombre maximal de features (`count`)
    pub count: u32,
    /// Prédicat CQL évalué côté serveur
    pub cql_filter: String,
    pub timeout: Duration,
}

impl FeatureQuery {
    /// Logements d'au moins `min_area` m²
    pub fn large_units(min_area: u32, max_results: u32, timeout: Duration) -> Self {
        Self {
            count: max_results,
            cql_filter: format!("oppervlakte>={min_area} AND gebruiksdoel='{RESIDENTIAL_USAGE}'"),
            timeout,
        }
    }

    /// Tous usages confondus, d'au moins `min_area` m²
    pub fn min_area(min_area: u32, limit: u32, timeout: Duration) -> Self {
        Self {
            count: limit,
            cql_filter: format!("oppervlakte>={min_area}"),
            timeout,
        }
    }

    /// Paramètres de query string, dans l'ordre du protocole
    pub fn params(&self, type_name: &str) -> Vec<(&'static str, String)> {
        vec![
            ("service", "WFS".to_string()),
            ("version", "2.0.0".to_string()),
            ("request", "GetFeature".to_string()),
            ("typeName", type_name.to_string()),
            ("outputFormat", "json".to_string()),
            ("count", self.count.to_string()),
            ("CQL_FILTER", self.cql_filter.clone()),
        ]
    }
}

/// Client WFS
#[derive(Debug, Clone)]
pub struct WfsClient {
    http: reqwest::Client,
    config: WfsConfig,
}

impl WfsClient {
    /// Crée un client
    ///
    /// # Errors
    /// Retourne une erreur si le client HTTP (TLS) ne peut pas être construit.
    pub fn new(config: WfsConfig) -> Result<Self, BagError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bag-wfs/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WfsConfig {
        &self.config
    }

    /// Exécute une requête et retourne les features brutes
    ///
    /// # Errors
    /// [`BagError::Http`] (transport, timeout), [`BagError::Status`] (non-2xx),
    /// [`BagError::Decode`] (corps non conforme).
    pub async fn get_features(&self, query: &FeatureQuery) -> Result<Vec<RawFeature>, BagError> {
        let params = query.params(&self.config.type_name);
        debug!(url = %self.config.url, filter = %query.cql_filter, count = query.count, "GetFeature");

        let response = self
            .http
            .get(&self.config.url)
            .query(&params)
            .timeout(query.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BagError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let collection: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| BagError::Decode(e.to_string()))?;

        Ok(collection.features)
    }

    /// Logements d'au moins `min_area` m², au plus `max_results`
    pub async fn fetch_large_units(&self, min_area: u32, max_results: u32) -> Vec<RawFeature> {
        let query = FeatureQuery::large_units(
            min_area,
            max_results,
            Duration::from_secs(self.config.bulk_timeout_secs),
        );
        info!(min_area, max_results, "Fetching large residential units from WFS");

        match self.get_features(&query).await {
            Ok(features) => {
                info!(count = features.len(), "Fetched verblijfsobjecten");
                features
            }
            Err(e) => {
                warn!(error = %e, "WFS fetch failed, continuing without feed data");
                Vec::new()
            }
        }
    }

    /// Objets d'au moins `min_area` m² dont la woonplaats contient `place`
    ///
    /// Le WFS ne filtre pas de façon fiable sur la woonplaats : le filtre
    /// serveur porte sur la surface seule, la woonplaats est filtrée ici
    /// (sans casse). Une `place` vide ne filtre rien.
    pub async fn fetch_for_place(&self, place: &str, min_area: u32, limit: u32) -> Vec<RawFeature> {
        let query = FeatureQuery::min_area(
            min_area,
            limit,
            Duration::from_secs(self.config.place_timeout_secs),
        );
        info!(place = %place, min_area, limit, "Fetching verblijfsobjecten for place");

        match self.get_features(&query).await {
            Ok(features) => {
                let total = features.len();
                let kept: Vec<RawFeature> = features
                    .into_iter()
                    .filter(|f| matches_place(f, place))
                    .collect();
                info!(place = %place, fetched = total, kept = kept.len(), "Fetched verblijfsobjecten");
                kept
            }
            Err(e) => {
                warn!(place = %place, error = %e, "WFS fetch failed, continuing without feed data");
                Vec::new()
            }
        }
    }
}

/// Vrai si la woonplaats de la feature contient `place` (insensible à la casse)
pub fn matches_place(feature: &RawFeature, place: &str) -> bool {
    if place.is_empty() {
        return true;
    }
    let needle = place.to_lowercase();
    feature
        .property_str("woonplaats")
        .is_some_and(|w| w.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_keeps_config() {
        let config = WfsConfig {
            url: "http://localhost:8080/wfs".into(),
            ..Default::default()
        };
        let client = WfsClient::new(config.clone()).unwrap();
        assert_eq!(client.config(), &config);
        assert_eq!(client.config().bulk_timeout_secs, 300);
    }

    #[test]
    fn test_large_units_params() {
        let query = FeatureQuery::large_units(200, 50000, Duration::from_secs(300));
        let params = query.params(VERBLIJFSOBJECT_TYPE);

        assert_eq!(
            params,
            vec![
                ("service", "WFS".to_string()),
                ("version", "2.0.0".to_string()),
                ("request", "GetFeature".to_string()),
                ("typeName", "bag:verblijfsobject".to_string()),
                ("outputFormat", "json".to_string()),
                ("count", "50000".to_string()),
                (
                    "CQL_FILTER",
                    "oppervlakte>=200 AND gebruiksdoel='woonfunctie'".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_min_area_filter() {
        let query = FeatureQuery::min_area(100, 10000, Duration::from_secs(120));
        assert_eq!(query.cql_filter, "oppervlakte>=100");
        assert_eq!(query.count, 10000);
    }

    #[test]
    fn test_default_timeouts() {
        let config = WfsConfig::default();
        assert!(config.bulk_timeout_secs > config.place_timeout_secs);
        assert_eq!(config.url, PDOK_WFS_URL);
    }

    #[test]
    fn test_matches_place() {
        let feature = RawFeature {
            properties: json!({"woonplaats": "Rotterdam"}),
            geometry: serde_json::Value::Null,
        };
        assert!(matches_place(&feature, "rotter"));
        assert!(matches_place(&feature, "ROTTERDAM"));
        assert!(matches_place(&feature, ""));
        assert!(!matches_place(&feature, "Amsterdam"));

        let anonymous = RawFeature::default();
        assert!(!matches_place(&anonymous, "Rotterdam"));
        assert!(matches_place(&anonymous, ""));
    }
}
