//! Création des tables `verblijfsobject` et `pand`

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use tracing::{info, warn};

/// Table des verblijfsobjecten normalisés
pub const RECORD_TABLE: &str = "verblijfsobject";

/// Table des panden (réservée, non alimentée)
pub const BUILDING_TABLE: &str = "pand";

const RECORD_DDL: &str = r#"
    DROP TABLE IF EXISTS verblijfsobject CASCADE;
    CREATE TABLE verblijfsobject (
        id VARCHAR(50) PRIMARY KEY,
        gebruiksdoel VARCHAR(100),
        oppervlakte INTEGER,
        x DOUBLE PRECISION,
        y DOUBLE PRECISION,
        lat DOUBLE PRECISION,
        lon DOUBLE PRECISION,
        pand_id VARCHAR(50),
        gemeente VARCHAR(100),
        woonplaats VARCHAR(100),
        straatnaam VARCHAR(200),
        huisnummer VARCHAR(20),
        postcode VARCHAR(10),
        status VARCHAR(100),
        created_at TIMESTAMP DEFAULT NOW()
    );

    CREATE INDEX idx_verblijfsobject_gemeente ON verblijfsobject (gemeente);
    CREATE INDEX idx_verblijfsobject_gebruiksdoel ON verblijfsobject (gebruiksdoel);
    CREATE INDEX idx_verblijfsobject_oppervlakte ON verblijfsobject (oppervlakte);
"#;

const BUILDING_DDL: &str = r#"
    DROP TABLE IF EXISTS pand CASCADE;
    CREATE TABLE pand (
        id VARCHAR(50) PRIMARY KEY,
        bouwjaar INTEGER,
        status VARCHAR(100),
        created_at TIMESTAMP DEFAULT NOW()
    );
"#;

/// État du schéma après création
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    /// PostGIS disponible (information seulement : aucune colonne géométrique)
    pub postgis: bool,
}

/// (Re)crée les tables et leurs index, en supprimant les tables existantes
///
/// L'extension PostGIS est activée si possible ; son absence n'est pas une
/// erreur, lat/lon restent des colonnes numériques.
pub async fn ensure_schema(pool: &Pool) -> Result<SchemaStatus> {
    let client = pool.get().await.context("Failed to get connection from pool")?;

    let postgis = match client
        .batch_execute("CREATE EXTENSION IF NOT EXISTS postgis")
        .await
    {
        Ok(()) => {
            info!("PostGIS extension available");
            true
        }
        Err(e) => {
            warn!("PostGIS not available, using plain lat/lon columns: {e}");
            false
        }
    };

    client
        .batch_execute(RECORD_DDL)
        .await
        .with_context(|| format!("Failed to create table {}", RECORD_TABLE))?;
    info!("Created table {}", RECORD_TABLE);

    client
        .batch_execute(BUILDING_DDL)
        .await
        .with_context(|| format!("Failed to create table {}", BUILDING_TABLE))?;
    info!("Created table {}", BUILDING_TABLE);

    Ok(SchemaStatus { postgis })
}
