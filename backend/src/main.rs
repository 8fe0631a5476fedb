//! Dataexport CLI - export data-element values to CSV
//!
//! # Commands
//!
//! ```bash
//! dataexport export --dataset data.json --request beds.json   # Write the CSV export
//! dataexport headers --dataset data.json                      # Show the column schema
//! dataexport locations --dataset data.json --request beds.json # Show selected data locations
//! ```
//!
//! Settings are read from the environment (and `.env`), see [`dataexport::config`].
//! Set `RUST_LOG=debug` for per-run details.

use clap::{Parser, Subcommand};
use dataexport::{
    export_data_headers, filter_data_locations, DataElementExporter, DataExport, ExportConfig,
    LocationService, MemoryDataset,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dataexport")]
#[command(about = "Export data-element values per location and period to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an export and print the written file
    Export {
        /// Dataset JSON file (locations, periods, data elements, values)
        #[arg(short, long)]
        dataset: PathBuf,

        /// Export request JSON file
        #[arg(short, long)]
        request: PathBuf,

        /// Directory for the export file (default: system temp dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Language used for display names
        #[arg(short, long)]
        language: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the header row for a dataset's hierarchy
    Headers {
        /// Dataset JSON file
        #[arg(short, long)]
        dataset: PathBuf,
    },

    /// Print the data locations an export request selects
    Locations {
        /// Dataset JSON file
        #[arg(short, long)]
        dataset: PathBuf,

        /// Export request JSON file
        #[arg(short, long)]
        request: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            dataset,
            request,
            output_dir,
            language,
            json,
        } => cmd_export(&dataset, &request, output_dir, language, json),

        Commands::Headers { dataset } => cmd_headers(&dataset),

        Commands::Locations { dataset, request } => cmd_locations(&dataset, &request),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_export(
    dataset_path: &Path,
    request_path: &Path,
    output_dir: Option<PathBuf>,
    language: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ExportConfig::from_env()?;
    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(language) = language {
        config = config.with_language(language)?;
    }

    let dataset = MemoryDataset::from_path(dataset_path)?;
    let request = read_request(request_path)?;

    let exporter = DataElementExporter::new(&dataset, &dataset, config);
    let summary = exporter.export_data(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!("   Locations: {}", summary.locations);
        eprintln!("   Periods: {}", summary.periods);
        eprintln!("   Data elements: {}", summary.data_elements);
        eprintln!("   Values: {}", summary.values_found);
        eprintln!("   Rows: {}", summary.rows_written);
        println!("{}", summary.path.display());
    }

    Ok(())
}

fn cmd_headers(dataset_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = MemoryDataset::from_path(dataset_path)?;
    let headers = export_data_headers(&dataset.list_levels());
    println!("{}", headers.join(","));
    Ok(())
}

fn cmd_locations(dataset_path: &Path, request_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = MemoryDataset::from_path(dataset_path)?;
    let request = read_request(request_path)?;

    let locations = filter_data_locations(&dataset, &request.type_codes, &request.location_codes);
    eprintln!("{} data locations", locations.len());
    for location in locations {
        println!("{}", location.code);
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<DataExport, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
