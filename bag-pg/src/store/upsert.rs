//! Écriture idempotente des verblijfsobjecten
//!
//! Une seule primitive, [`upsert`], paramétrée par la politique de conflit :
//! - [`ConflictPolicy::OverwriteSubset`] (import du flux) : sur collision de
//!   clé, seules les colonnes de [`OVERWRITE_COLUMNS`] sont remplacées ;
//!   rue, numéro, code postal, statut, pand et woonplaats gardent leur valeur
//!   de première insertion.
//! - [`ConflictPolicy::SkipIfExists`] (données d'exemple) : la ligne
//!   existante est conservée telle quelle.

use std::collections::HashMap;

use anyhow::{Context, Result};
use bag_wfs::NormalizedRecord;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use tracing::{debug, info};

use super::schema::RECORD_TABLE;

/// Colonnes écrites, dans l'ordre des paramètres
pub const COLUMNS: [&str; 14] = [
    "id",
    "gebruiksdoel",
    "oppervlakte",
    "x",
    "y",
    "lat",
    "lon",
    "pand_id",
    "gemeente",
    "woonplaats",
    "straatnaam",
    "huisnummer",
    "postcode",
    "status",
];

/// Colonnes remplacées sur conflit par [`ConflictPolicy::OverwriteSubset`]
pub const OVERWRITE_COLUMNS: [&str; 7] = [
    "gebruiksdoel",
    "oppervlakte",
    "x",
    "y",
    "lat",
    "lon",
    "gemeente",
];

/// Politique appliquée sur collision de clé primaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// `DO UPDATE SET` sur [`OVERWRITE_COLUMNS`] uniquement
    OverwriteSubset,
    /// `DO NOTHING`
    SkipIfExists,
}

impl ConflictPolicy {
    /// Clause `ON CONFLICT` correspondante
    pub fn on_conflict_sql(self) -> String {
        match self {
            Self::OverwriteSubset => {
                let sets: Vec<String> = OVERWRITE_COLUMNS
                    .iter()
                    .map(|c| format!("{c} = EXCLUDED.{c}"))
                    .collect();
                format!("ON CONFLICT (id) DO UPDATE SET {}", sets.join(", "))
            }
            Self::SkipIfExists => "ON CONFLICT (id) DO NOTHING".to_string(),
        }
    }
}

/// INSERT multi-lignes pour `rows` lignes
pub fn insert_sql(rows: usize, policy: ConflictPolicy) -> String {
    let width = COLUMNS.len();
    let values: Vec<String> = (0..rows)
        .map(|row| {
            let placeholders: Vec<String> = (1..=width)
                .map(|col| format!("${}", row * width + col))
                .collect();
            format!("({})", placeholders.join(", "))
        })
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES {} {}",
        RECORD_TABLE,
        COLUMNS.join(", "),
        values.join(", "),
        policy.on_conflict_sql()
    )
}

/// Dédoublonne par `id`, la dernière occurrence l'emporte à la place de la première
///
/// PostgreSQL refuse qu'un même INSERT ... DO UPDATE touche deux fois la même ligne.
pub fn dedup_by_id(records: &[NormalizedRecord]) -> Vec<&NormalizedRecord> {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<&NormalizedRecord> = Vec::with_capacity(records.len());

    for record in records {
        match position.get(record.id()) {
            Some(&idx) => unique[idx] = record,
            None => {
                position.insert(record.id(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

/// Valeurs dérivées d'une ligne, possédées pour être référencées comme paramètres
struct RowParams<'a> {
    record: &'a NormalizedRecord,
    id: &'a str,
    x: f64,
    y: f64,
    lat: f64,
    lon: f64,
}

impl<'a> RowParams<'a> {
    fn new(record: &'a NormalizedRecord) -> Self {
        let (x, y) = record.projected();
        Self {
            record,
            id: record.id(),
            x,
            y,
            lat: record.latitude(),
            lon: record.longitude(),
        }
    }

    fn push_params<'p>(&'p self, params: &mut Vec<&'p (dyn ToSql + Sync)>) {
        let r = self.record;
        params.push(&self.id);
        params.push(&r.usage_purpose);
        params.push(&r.area);
        params.push(&self.x);
        params.push(&self.y);
        params.push(&self.lat);
        params.push(&self.lon);
        params.push(&r.building_id);
        params.push(&r.municipality);
        params.push(&r.locality);
        params.push(&r.street_name);
        params.push(&r.house_number);
        params.push(&r.postal_code);
        params.push(&r.status);
    }
}

/// Écrit un lot d'enregistrements dans une seule transaction
///
/// Retourne le nombre de lignes affectées selon PostgreSQL : insérées ou
/// mises à jour pour `OverwriteSubset`, insérées seulement pour `SkipIfExists`.
/// Un lot vide retourne 0 sans toucher à la base.
pub async fn upsert(
    pool: &Pool,
    records: &[NormalizedRecord],
    policy: ConflictPolicy,
    batch_size: usize,
) -> Result<u64> {
    if records.is_empty() {
        debug!("No records to write");
        return Ok(0);
    }

    let unique = dedup_by_id(records);
    if unique.len() < records.len() {
        debug!(
            duplicates = records.len() - unique.len(),
            "Collapsed duplicate ids in batch"
        );
    }

    let mut client = pool.get().await.context("Failed to get connection from pool")?;
    let tx = client
        .transaction()
        .await
        .context("Failed to begin transaction")?;

    let mut affected: u64 = 0;
    for chunk in unique.chunks(batch_size.max(1)) {
        let rows: Vec<RowParams<'_>> = chunk.iter().map(|r| RowParams::new(*r)).collect();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(rows.len() * COLUMNS.len());
        for row in &rows {
            row.push_params(&mut params);
        }

        let sql = insert_sql(rows.len(), policy);
        affected += tx
            .execute(sql.as_str(), &params)
            .await
            .with_context(|| format!("Failed to write {} rows into {}", rows.len(), RECORD_TABLE))?;
    }

    tx.commit().await.context("Failed to commit transaction")?;

    info!(
        records = unique.len(),
        affected = affected,
        policy = ?policy,
        "Records written"
    );
    Ok(affected)
}
