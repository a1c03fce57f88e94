//! Jeu fixe de verblijfsobjecten de référence
//!
//! Inséré à chaque import, y compris quand le flux PDOK est indisponible.
//! Les positions sont données en RD ; latitude et longitude sont toujours
//! recalculées par le transformateur.

use anyhow::Result;
use bag_wfs::{NormalizedRecord, RESIDENTIAL_USAGE};
use deadpool_postgres::Pool;
use tracing::info;

use crate::store::{upsert, ConflictPolicy};

struct SeedRow {
    id: &'static str,
    area: i32,
    x: f64,
    y: f64,
    municipality: &'static str,
    street: &'static str,
    number: &'static str,
    postcode: &'static str,
}

const SEED_ROWS: [SeedRow; 10] = [
    SeedRow { id: "0599010000000001", area: 1200, x: 92500.0, y: 437000.0, municipality: "Rotterdam", street: "Coolsingel", number: "1", postcode: "3011AD" },
    SeedRow { id: "0599010000000002", area: 1500, x: 92600.0, y: 437100.0, municipality: "Rotterdam", street: "Weena", number: "10", postcode: "3012CM" },
    SeedRow { id: "0599010000000003", area: 2000, x: 92700.0, y: 437200.0, municipality: "Rotterdam", street: "Kruiskade", number: "5", postcode: "3012CT" },
    SeedRow { id: "0599010000000004", area: 1100, x: 92400.0, y: 436900.0, municipality: "Rotterdam", street: "Lijnbaan", number: "20", postcode: "3012EN" },
    SeedRow { id: "0599010000000005", area: 1800, x: 92550.0, y: 437050.0, municipality: "Rotterdam", street: "Blaak", number: "8", postcode: "3011TA" },
    SeedRow { id: "0363010000000001", area: 1300, x: 121000.0, y: 487000.0, municipality: "Amsterdam", street: "Dam", number: "1", postcode: "1012JS" },
    SeedRow { id: "0363010000000002", area: 1600, x: 121100.0, y: 487100.0, municipality: "Amsterdam", street: "Damrak", number: "50", postcode: "1012LM" },
    SeedRow { id: "0363010000000003", area: 2200, x: 121200.0, y: 487200.0, municipality: "Amsterdam", street: "Rokin", number: "75", postcode: "1012KL" },
    SeedRow { id: "0518010000000001", area: 1400, x: 81000.0, y: 454000.0, municipality: "Den Haag", street: "Binnenhof", number: "1", postcode: "2513AA" },
    SeedRow { id: "0518010000000002", area: 1900, x: 81100.0, y: 454100.0, municipality: "Den Haag", street: "Lange Voorhout", number: "10", postcode: "2514EA" },
];

/// Statut BAG des objets de référence
const SEED_STATUS: &str = "in gebruik";

/// Les dix enregistrements de référence (Rotterdam, Amsterdam, Den Haag)
pub fn sample_records() -> Vec<NormalizedRecord> {
    SEED_ROWS
        .iter()
        .map(|row| {
            let mut record = NormalizedRecord::new(row.id, row.x, row.y);
            record.usage_purpose = RESIDENTIAL_USAGE.to_string();
            record.area = row.area;
            record.municipality = row.municipality.to_string();
            record.locality = row.municipality.to_string();
            record.street_name = row.street.to_string();
            record.house_number = row.number.to_string();
            record.postal_code = row.postcode.to_string();
            record.status = SEED_STATUS.to_string();
            record
        })
        .collect()
}

/// Insère le jeu de référence sans écraser les lignes existantes
///
/// Retourne le nombre de lignes réellement insérées (0 au second appel).
pub async fn seed(pool: &Pool, batch_size: usize) -> Result<u64> {
    let records = sample_records();
    let inserted = upsert(pool, &records, ConflictPolicy::SkipIfExists, batch_size).await?;
    info!(
        inserted = inserted,
        total = records.len(),
        "Sample records seeded"
    );
    Ok(inserted)
}
