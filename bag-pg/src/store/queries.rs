//! Requêtes de lecture : vérification post-import et recherche

use anyhow::{Context, Result};
use bag_wfs::RESIDENTIAL_USAGE;
use deadpool_postgres::Pool;
use serde::Serialize;
use tracing::debug;

use crate::config::VerifySettings;

/// Nombre maximal de résultats d'une recherche
pub const SEARCH_LIMIT: i64 = 1000;

/// Résultat de la vérification d'un import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerificationReport {
    /// Nombre total de lignes dans la table
    pub total_records: i64,
    /// Communes par nombre de logements, décroissant
    pub top_municipalities: Vec<MunicipalityCount>,
    /// Seuil de surface utilisé pour `large_residential`
    pub large_area: i32,
    /// Logements dont la surface est >= `large_area`
    pub large_residential: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalityCount {
    /// `None` pour les lignes sans commune
    pub municipality: Option<String>,
    pub count: i64,
}

/// Ligne retournée par [`search_residential`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub area: i32,
    pub municipality: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Compte toutes les lignes de `verblijfsobject`
pub async fn count_records(pool: &Pool) -> Result<i64> {
    let client = pool.get().await.context("Failed to get connection from pool")?;
    let row = client
        .query_one("SELECT COUNT(*) FROM verblijfsobject", &[])
        .await
        .context("Failed to count records")?;
    Ok(row.get(0))
}

/// Communes ayant le plus de logements
pub async fn top_municipalities(pool: &Pool, limit: i64) -> Result<Vec<MunicipalityCount>> {
    let client = pool.get().await.context("Failed to get connection from pool")?;
    let rows = client
        .query(
            "SELECT gemeente, COUNT(*) AS aantal
             FROM verblijfsobject
             WHERE gebruiksdoel = $1
             GROUP BY gemeente
             ORDER BY aantal DESC, gemeente ASC
             LIMIT $2",
            &[&RESIDENTIAL_USAGE, &limit],
        )
        .await
        .context("Failed to query top municipalities")?;

    Ok(rows
        .iter()
        .map(|row| MunicipalityCount {
            municipality: row.get(0),
            count: row.get(1),
        })
        .collect())
}

/// Logements dont la surface atteint `min_area`
pub async fn count_large_residential(pool: &Pool, min_area: i32) -> Result<i64> {
    let client = pool.get().await.context("Failed to get connection from pool")?;
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM verblijfsobject WHERE gebruiksdoel = $1 AND oppervlakte >= $2",
            &[&RESIDENTIAL_USAGE, &min_area],
        )
        .await
        .context("Failed to count large residential units")?;
    Ok(row.get(0))
}

/// Exécute les trois requêtes de vérification
pub async fn verify(pool: &Pool, settings: &VerifySettings) -> Result<VerificationReport> {
    let total_records = count_records(pool).await?;
    let top_municipalities = top_municipalities(pool, settings.top_municipalities).await?;
    let large_residential = count_large_residential(pool, settings.large_area).await?;

    debug!(
        total = total_records,
        large = large_residential,
        "Verification queries done"
    );

    Ok(VerificationReport {
        total_records,
        top_municipalities,
        large_area: settings.large_area,
        large_residential,
    })
}

/// Logements d'une commune avec une surface >= `min_area`, les plus grands d'abord
pub async fn search_residential(
    pool: &Pool,
    municipality: &str,
    min_area: i32,
) -> Result<Vec<SearchHit>> {
    let client = pool.get().await.context("Failed to get connection from pool")?;
    let rows = client
        .query(
            "SELECT id, COALESCE(oppervlakte, 0), COALESCE(gemeente, ''),
                    COALESCE(lat, 0), COALESCE(lon, 0)
             FROM verblijfsobject
             WHERE gebruiksdoel = $1 AND gemeente = $2 AND oppervlakte >= $3
             ORDER BY oppervlakte DESC
             LIMIT $4",
            &[&RESIDENTIAL_USAGE, &municipality, &min_area, &SEARCH_LIMIT],
        )
        .await
        .with_context(|| format!("Failed to search residential units in {municipality}"))?;

    Ok(rows
        .iter()
        .map(|row| SearchHit {
            id: row.get(0),
            area: row.get(1),
            municipality: row.get(2),
            latitude: row.get(3),
            longitude: row.get(4),
        })
        .collect())
}

/// Communes distinctes ayant au moins un logement, triées
pub async fn list_municipalities(pool: &Pool) -> Result<Vec<String>> {
    let client = pool.get().await.context("Failed to get connection from pool")?;
    let rows = client
        .query(
            "SELECT DISTINCT gemeente
             FROM verblijfsobject
             WHERE gebruiksdoel = $1 AND gemeente IS NOT NULL
             ORDER BY gemeente ASC",
            &[&RESIDENTIAL_USAGE],
        )
        .await
        .context("Failed to list municipalities")?;

    Ok(rows.iter().map(|row| row.get(0)).collect())
}

impl VerificationReport {
    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n--- VERIFICATION ---");
        println!("Total records: {}", self.total_records);

        println!("\nTop {} municipalities:", self.top_municipalities.len());
        for entry in &self.top_municipalities {
            println!(
                "  - {}: {} residential units",
                entry.municipality.as_deref().unwrap_or("(none)"),
                entry.count
            );
        }

        println!(
            "\nResidential units >= {} m2: {}",
            self.large_area, self.large_residential
        );
    }
}
