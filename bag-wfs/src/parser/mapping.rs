//! Politique de correspondance champs PDOK → enregistrement normalisé
//!
//! Toutes les valeurs par défaut appliquées aux attributs absents sont
//! regroupées ici, de même que la règle de déduction de la commune.

use super::properties::BagProperties;

/// Origine de la valeur `gemeente`
///
/// Le WFS n'expose pas la commune : la woonplaats est reprise telle quelle.
/// Une woonplaats à cheval sur plusieurs communes donne donc une commune
/// potentiellement fausse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum MunicipalitySource {
    /// `gemeente` = `woonplaats`
    #[default]
    LocalityProxy,
}

/// Valeurs par défaut des attributs absents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefaults {
    pub usage_purpose: String,
    pub area: i32,
    pub locality: String,
    /// Rue, numéro, code postal, statut, pand
    pub text: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            usage_purpose: "unknown".into(),
            area: 0,
            locality: "Unknown".into(),
            text: String::new(),
        }
    }
}

/// Politique complète appliquée par le parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pub defaults: FieldDefaults,
    pub municipality: MunicipalitySource,
}

impl FieldMapping {
    pub fn usage_purpose(&self, props: &BagProperties) -> String {
        props
            .gebruiksdoel
            .clone()
            .unwrap_or_else(|| self.defaults.usage_purpose.clone())
    }

    pub fn locality(&self, props: &BagProperties) -> String {
        props
            .woonplaats
            .clone()
            .unwrap_or_else(|| self.defaults.locality.clone())
    }

    /// Commune déduite selon [`MunicipalitySource`]
    pub fn municipality(&self, props: &BagProperties) -> String {
        match self.municipality {
            MunicipalitySource::LocalityProxy => self.locality(props),
        }
    }

    pub fn text(&self, value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| self.defaults.text.clone())
    }
}
