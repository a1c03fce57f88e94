//! Définition et implémentation des commandes CLI
//!
//! - commande par défaut : import PDOK → PostgreSQL
//! - `to-geojson` : PDOK → GeoJSON (sans DB)
//! - `search` : lecture de la table importée

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bag_wfs::{parse_all, FieldMapping, WfsClient};
use clap::{Args, Subcommand};
use deadpool_postgres::Pool;
use tracing::{info, warn};

use crate::config::Config;
use crate::export;
use crate::pipeline;
use crate::store::{self, DatabaseConfig};

/// Connexion PostgreSQL
#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// PostgreSQL connection string (défaut : env DATABASE_URL, sinon saisie)
    #[arg(long)]
    pub database_url: Option<String>,

    /// SSL mode: disable, prefer, require (défaut : env PGSSLMODE / sslmode de l'URL)
    #[arg(long)]
    pub ssl: Option<String>,
}

/// Arguments de l'import (commande par défaut)
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Config preset name (default) or path to a JSON config
    #[arg(long)]
    pub config: Option<String>,

    /// Minimum floor area in m² requested from the feed
    #[arg(long)]
    pub min_area: Option<u32>,

    /// Maximum number of features requested from the feed
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Skip the feed and only write the sample records
    #[arg(long)]
    pub no_fetch: bool,

    /// Save the import report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the residential units of a place and write them as GeoJSON (no database required)
    ToGeojson {
        /// Place name (woonplaats), matched case-insensitively; empty keeps everything
        #[arg(short, long, default_value = "")]
        place: String,

        /// Minimum floor area in m²
        #[arg(long, default_value_t = 200)]
        min_area: u32,

        /// Maximum number of features requested from the feed
        #[arg(long, default_value_t = 10_000)]
        limit: u32,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Config preset name (default) or path to a JSON config
        #[arg(long)]
        config: Option<String>,
    },

    /// Search imported residential units, or list municipalities when none is given
    Search {
        #[command(flatten)]
        db: DbArgs,

        /// Municipality (gemeente) to search
        #[arg(short, long)]
        municipality: Option<String>,

        /// Minimum floor area in m²
        #[arg(long, default_value_t = 0)]
        min_area: i32,

        /// Write the results as GeoJSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(spec: Option<&str>) -> Result<Config> {
    let mut config = Config::resolve(spec)?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

async fn connect(db: &DbArgs) -> Result<Pool> {
    let db_config = DatabaseConfig::resolve(db.database_url.clone(), db.ssl.as_deref())?;
    info!(
        database = %db_config.display_url(),
        ssl = ?db_config.ssl_mode,
        "Connecting to PostgreSQL"
    );

    let pool = store::create_pool(&db_config).await?;
    store::test_connection(&pool)
        .await
        .context("Database connection failed")?;
    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Exécute l'import
pub async fn cmd_import(args: &ImportArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(min_area) = args.min_area {
        config.import.min_area = min_area;
    }
    if let Some(max_results) = args.max_results {
        config.import.max_results = max_results;
    }

    let client = WfsClient::new(config.wfs.clone())?;
    info!(
        wfs = %client.config().url,
        min_area = config.import.min_area,
        max_results = config.import.max_results,
        fetch = !args.no_fetch,
        "Starting import"
    );

    let pool = connect(&args.db).await?;

    let report = pipeline::run(&pool, &client, &config, !args.no_fetch).await?;
    report.display();

    if let Some(ref path) = args.report {
        report.save_to_file(path)?;
        info!(path = %path.display(), "Report saved");
    }

    info!("{}", report.summary());
    pool.close();
    Ok(())
}

/// Exporte en GeoJSON les logements d'une localité
pub async fn cmd_export(
    place: &str,
    min_area: u32,
    limit: u32,
    output: &Path,
    config: Option<&str>,
) -> Result<()> {
    let config = load_config(config)?;
    let client = WfsClient::new(config.wfs.clone())?;
    info!(wfs = %client.config().url, place = %place, "Fetching for GeoJSON export");

    let features = client.fetch_for_place(place, min_area, limit).await;
    let parsed = parse_all(&features, &FieldMapping::default());
    if features.is_empty() {
        warn!(place = %place, "No features received from the feed");
    }

    let collection = export::records_to_collection(&parsed.records)?;
    export::write_collection(&collection, output)?;

    println!(
        "{} features written to {} ({} skipped)",
        parsed.records.len(),
        output.display(),
        parsed.errors.len()
    );
    Ok(())
}

/// Recherche dans la table importée
pub async fn cmd_search(
    db: &DbArgs,
    municipality: Option<&str>,
    min_area: i32,
    output: Option<&Path>,
) -> Result<()> {
    let pool = connect(db).await?;

    let Some(municipality) = municipality else {
        let names = store::list_municipalities(&pool).await?;
        println!("{} municipalities:", names.len());
        for name in &names {
            println!("  {}", name);
        }
        pool.close();
        return Ok(());
    };

    let hits = store::search_residential(&pool, municipality, min_area).await?;
    println!(
        "{} residential units in {} with area >= {} m2",
        hits.len(),
        municipality,
        min_area
    );
    for hit in hits.iter().take(20) {
        println!(
            "  {} {} m2 ({:.6}, {:.6})",
            hit.id, hit.area, hit.latitude, hit.longitude
        );
    }
    if hits.len() > 20 {
        println!("  ... and {} more", hits.len() - 20);
    }

    if let Some(path) = output {
        let collection = export::hits_to_collection(&hits)?;
        export::write_collection(&collection, path)?;
        info!(path = %path.display(), count = hits.len(), "Search results written");
    }

    pool.close();
    Ok(())
}
