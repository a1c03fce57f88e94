//! Enchaînement d'un import complet
//!
//! schéma → flux → analyse → écriture → données de référence → vérification.
//! Tout est séquentiel : l'analyse ne démarre qu'une fois le flux reçu en
//! entier, et le lot analysé est écrit en un seul appel.

use std::time::Instant;

use anyhow::Result;
use bag_wfs::{parse_all, FieldMapping, WfsClient};
use deadpool_postgres::Pool;
use tracing::{info, warn};

use crate::config::Config;
use crate::report::ImportReport;
use crate::seed;
use crate::store::{ensure_schema, queries, upsert, ConflictPolicy};

/// Exécute l'import
///
/// Les erreurs du flux et les features invalides sont absorbées dans le
/// rapport ; seules les erreurs de base de données remontent.
pub async fn run(
    pool: &Pool,
    client: &WfsClient,
    config: &Config,
    fetch: bool,
) -> Result<ImportReport> {
    let started_at = Instant::now();
    let mut report = ImportReport::new(fetch);

    let schema = ensure_schema(pool).await?;
    info!(postgis = schema.postgis, "Schema ready");

    if fetch {
        let settings = &config.import;
        let features = client
            .fetch_large_units(settings.min_area, settings.max_results)
            .await;
        report.features_fetched = features.len();

        if features.is_empty() {
            warn!("No features received from the feed, continuing with sample data only");
        } else {
            let parsed = parse_all(&features, &FieldMapping::default());
            for err in &parsed.errors {
                report.record_skip(err);
            }
            report.records_parsed = parsed.records.len();

            report.rows_upserted = upsert(
                pool,
                &parsed.records,
                ConflictPolicy::OverwriteSubset,
                settings.batch_size,
            )
            .await?;
        }
    } else {
        info!("Feed fetch disabled");
    }

    report.seed_rows_inserted = seed::seed(pool, config.import.batch_size).await?;
    report.verification = Some(queries::verify(pool, &config.verify).await?);

    report.set_duration(started_at.elapsed());
    report.finalize();

    info!(
        status = ?report.status,
        fetched = report.features_fetched,
        upserted = report.rows_upserted,
        skipped = report.skipped.len(),
        duration_secs = report.duration_secs,
        "Import complete"
    );
    Ok(report)
}
