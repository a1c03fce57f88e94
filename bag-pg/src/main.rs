//! Point d'entrée CLI pour bag-pg

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use bag_pg::cli::{self, Commands, ImportArgs};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Importer les verblijfsobjecten de la BAG (PDOK) dans PostgreSQL
#[derive(Parser)]
#[command(name = "bag-pg")]
#[command(author, version)]
#[command(about = "Import BAG residential units from the PDOK WFS into PostgreSQL (default) or GeoJSON")]
#[command(long_about = "Fetches large BAG verblijfsobjecten from the PDOK WFS, converts RD coordinates to WGS84 and upserts them into PostgreSQL, then seeds sample records and prints a verification report.\n\nUse 'to-geojson' to export without a database and 'search' to query an imported table.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut : import vers PostgreSQL)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments de l'import (commande par défaut)
    #[command(flatten)]
    import: ImportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::ToGeojson {
            place,
            min_area,
            limit,
            output,
            config,
        }) => {
            info!(place = %place, output = %output.display(), "Export vers GeoJSON");
            cli::cmd_export(&place, min_area, limit, &output, config.as_deref()).await?;
        }
        Some(Commands::Search {
            db,
            municipality,
            min_area,
            output,
        }) => {
            cli::cmd_search(&db, municipality.as_deref(), min_area, output.as_deref()).await?;
        }
        None => {
            cli::cmd_import(&cli.import).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
