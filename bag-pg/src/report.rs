//! Rapport d'import
//!
//! Collecte les compteurs d'un run (features récupérées, analysées, écartées,
//! lignes écrites) et les affiche ou les sauvegarde en JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use bag_wfs::BagError;
use serde::Serialize;

use crate::store::VerificationReport;

/// Statut global de l'import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportStatus {
    /// Toutes les features récupérées ont été écrites
    Success,
    /// Certaines features ont été écartées à l'analyse
    PartialSuccess,
    /// Flux vide, indisponible ou non interrogé : seules les données de référence sont écrites
    NoFeedData,
}

/// Feature écartée à l'analyse
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFeature {
    /// Identifiant de la feature s'il est connu
    pub id: Option<String>,
    pub reason: String,
}

impl From<&BagError> for SkippedFeature {
    fn from(err: &BagError) -> Self {
        Self {
            id: err.feature_id().map(str::to_string),
            reason: err.to_string(),
        }
    }
}

/// Rapport complet d'import
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Durée de l'import
    pub duration_secs: f64,
    /// Statut global
    pub status: ImportStatus,

    /// Le flux a-t-il été interrogé
    pub fetch_enabled: bool,
    /// Features reçues du flux
    pub features_fetched: usize,
    /// Enregistrements normalisés
    pub records_parsed: usize,
    /// Lignes insérées ou mises à jour depuis le flux
    pub rows_upserted: u64,
    /// Lignes de référence nouvellement insérées
    pub seed_rows_inserted: u64,

    pub skipped: Vec<SkippedFeature>,

    /// Résultat des requêtes de vérification
    pub verification: Option<VerificationReport>,
}

impl Default for ImportReport {
    fn default() -> Self {
        Self {
            duration_secs: 0.0,
            status: ImportStatus::NoFeedData,
            fetch_enabled: true,
            features_fetched: 0,
            records_parsed: 0,
            rows_upserted: 0,
            seed_rows_inserted: 0,
            skipped: Vec::new(),
            verification: None,
        }
    }
}

impl ImportReport {
    pub fn new(fetch_enabled: bool) -> Self {
        Self {
            fetch_enabled,
            ..Default::default()
        }
    }

    /// Enregistre une feature écartée
    pub fn record_skip(&mut self, err: &BagError) {
        self.skipped.push(SkippedFeature::from(err));
    }

    /// Définit la durée de l'import
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final à partir des compteurs
    pub fn finalize(&mut self) {
        self.status = if self.features_fetched == 0 {
            ImportStatus::NoFeedData
        } else if self.skipped.is_empty() {
            ImportStatus::Success
        } else {
            ImportStatus::PartialSuccess
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("BAG IMPORT REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        if self.fetch_enabled {
            println!(
                "Feed: {} fetched, {} parsed, {} skipped",
                self.features_fetched,
                self.records_parsed,
                self.skipped.len()
            );
        } else {
            println!("Feed: not queried");
        }
        println!(
            "Rows: {} upserted from feed, {} sample rows inserted",
            self.rows_upserted, self.seed_rows_inserted
        );

        if !self.skipped.is_empty() {
            println!("\n--- SKIPPED ({}) ---", self.skipped.len());
            for s in self.skipped.iter().take(20) {
                match &s.id {
                    Some(id) => println!("  [{}] {}", id, s.reason),
                    None => println!("  {}", s.reason),
                }
            }
            if self.skipped.len() > 20 {
                println!("  ... and {} more", self.skipped.len() - 20);
            }
        }

        if let Some(ref verification) = self.verification {
            verification.display();
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{:?}: {} fetched, {} upserted, {} skipped, {} sample rows",
            self.status,
            self.features_fetched,
            self.rows_upserted,
            self.skipped.len(),
            self.seed_rows_inserted
        )
    }
}
