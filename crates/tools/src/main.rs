use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect the space program registry and world boundaries")]
struct Args {
    /// Registry JSON to use instead of the built-in table
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Feature property holding the country name
    #[arg(long, global = true, default_value = formats::DEFAULT_NAME_PROPERTY)]
    name_property: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look a country name up in the registry
    Lookup { name: String },

    /// Summarize a GeoJSON boundary file against the registry
    Inspect { geojson: PathBuf },

    /// Compute the view a click on a country zooms to
    Zoom { geojson: PathBuf, name: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let registry = tools::load_registry(args.registry.as_deref())?;

    match args.command {
        Command::Lookup { name } => print_json(&tools::lookup(&registry, &name)),
        Command::Inspect { geojson } => {
            let dataset = tools::load_dataset(&geojson, &args.name_property)?;
            print_json(&tools::inspect(&registry, &dataset))
        }
        Command::Zoom { geojson, name } => {
            let payload = std::fs::read_to_string(&geojson)
                .map_err(|e| format!("read {}: {e}", geojson.display()))?;
            let report = tools::zoom(Arc::new(registry), &payload, &args.name_property, &name)?;
            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
