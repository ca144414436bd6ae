//! datamodel CLI - Render a model catalog to a schema document
//!
//! Usage:
//!   datamodel schema <catalog.json> [--config <file>] [--pretty]
//!   datamodel endpoints <catalog.json>
//!   datamodel check <catalog.json>
//!
//! Examples:
//!   datamodel schema models.json --pretty
//!   RUST_LOG=debug datamodel check models.json

use clap::{Parser, Subcommand};
use datamodel::compose::{SchemaRegistry, Snapshot};
use datamodel::config::Settings;
use datamodel::metadata::Catalog;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "datamodel")]
#[command(about = "Reflect model metadata into a JSON schema document")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to DATAMODEL_CONFIG, ./datamodel.toml, ~/.config/datamodel)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema document
    Schema {
        /// Path to the catalog (falls back to the `catalog` setting)
        catalog: Option<PathBuf>,

        /// Indent the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List operation invocation routes
    Endpoints {
        /// Path to the catalog (falls back to the `catalog` setting)
        catalog: Option<PathBuf>,
    },

    /// Compose the schema and report what it contains
    Check {
        /// Path to the catalog (falls back to the `catalog` setting)
        catalog: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Schema { catalog, pretty } => cmd_schema(settings, catalog, pretty),
        Commands::Endpoints { catalog } => cmd_endpoints(settings, catalog),
        Commands::Check { catalog } => cmd_check(settings, catalog),
    }
}

fn load(settings: Settings, catalog: Option<PathBuf>) -> Result<Arc<Snapshot>, String> {
    let path = match catalog {
        Some(path) => path,
        None => settings
            .catalog_path()
            .map_err(|e| e.to_string())?
            .ok_or("no catalog given and no `catalog` setting configured")?,
    };

    let catalog = Catalog::from_file(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let registry = SchemaRegistry::new(settings);
    registry.register_catalog(&catalog).map_err(|e| e.to_string())
}

fn cmd_schema(settings: Settings, catalog: Option<PathBuf>, pretty: bool) -> ExitCode {
    let pretty = pretty || settings.output.pretty;
    let snapshot = match load(settings, catalog) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if pretty {
        match snapshot.schema().to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => return fail(&e.to_string()),
        }
    } else {
        println!("{}", snapshot.document());
    }
    ExitCode::SUCCESS
}

fn cmd_endpoints(settings: Settings, catalog: Option<PathBuf>) -> ExitCode {
    let snapshot = match load(settings, catalog) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    for endpoint in snapshot.endpoints().iter() {
        let d = &endpoint.descriptor;
        println!(
            "POST {}  ({}; args={:?} kwargs={:?})",
            endpoint.route(),
            endpoint.model,
            d.args,
            d.kwargs
        );
    }
    ExitCode::SUCCESS
}

fn cmd_check(settings: Settings, catalog: Option<PathBuf>) -> ExitCode {
    let snapshot = match load(settings, catalog) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    println!("✓ {} models", snapshot.schema().len());
    for (name, model) in snapshot.schema().iter() {
        let role = match &model.polymorphic {
            Some(p) if p.parent.is_some() => format!(" (inherits {})", p.parent.as_deref().unwrap_or("")),
            Some(p) if !p.identities.is_empty() => format!(" (polymorphic on {})", p.on.as_deref().unwrap_or("")),
            _ => String::new(),
        };
        println!(
            "  {}: {} attributes, {} relations, {} methods{}",
            name,
            model.attributes.len(),
            model.relations.len(),
            model.methods.len(),
            role
        );
    }
    println!("  {} endpoints, etag {}", snapshot.endpoints().len(), snapshot.etag());
    ExitCode::SUCCESS
}

fn fail(message: &str) -> ExitCode {
    error!("{}", message);
    eprintln!("Error: {}", message);
    ExitCode::FAILURE
}
