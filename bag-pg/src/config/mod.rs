//! Configuration du pipeline d'import

use std::path::Path;

use anyhow::{Context, Result};
use bag_wfs::WfsConfig;
use serde::{Deserialize, Serialize};

/// Variable d'environnement surchargeant l'URL du WFS
pub const WFS_URL_ENV: &str = "BAG_WFS_URL";

/// Configuration principale
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Service WFS interrogé
    pub wfs: WfsConfig,

    /// Paramètres de la requête et de l'écriture
    pub import: ImportSettings,

    /// Paramètres du rapport de vérification
    pub verify: VerifySettings,
}

/// Paramètres d'import
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Surface minimale (m²) des logements demandés au WFS
    pub min_area: u32,

    /// Nombre maximal de features demandées
    pub max_results: u32,

    /// Nombre de lignes par instruction INSERT multi-valeurs
    pub batch_size: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            min_area: 200,
            max_results: 50_000,
            batch_size: 1000,
        }
    }
}

/// Paramètres du rapport de vérification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerifySettings {
    /// Nombre de communes listées
    pub top_municipalities: i64,

    /// Seuil (m²) des « très grands » logements
    pub large_area: i32,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            top_municipalities: 10,
            large_area: 1000,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: default", preset),
        }
    }

    /// Preset nommé ou chemin vers un fichier JSON
    pub fn resolve(spec: Option<&str>) -> Result<Self> {
        match spec {
            None | Some("default") => Self::from_preset("default"),
            Some(path) => Self::load(Path::new(path)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Applique les surcharges d'environnement (`BAG_WFS_URL`)
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(WFS_URL_ENV) {
            if !url.trim().is_empty() {
                self.wfs.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.import.batch_size == 0 {
            anyhow::bail!("import.batch_size must be > 0");
        }
        // 14 paramètres par ligne, limite PostgreSQL de 65535 paramètres
        if self.import.batch_size > 4000 {
            anyhow::bail!(
                "import.batch_size {} exceeds 4000 rows per statement",
                self.import.batch_size
            );
        }
        if self.verify.top_municipalities <= 0 {
            anyhow::bail!("verify.top_municipalities must be > 0");
        }
        Ok(())
    }
}
