//! cityscope CLI - Debug tool for proximity and region selection
//!
//! Usage:
//!   cityscope-cli near <city> [--radius <km>] [--catalog <file.json>]
//!   cityscope-cli within <lat1> <lng1> <lat2> <lng2>
//!   cityscope-cli regional <name>
//!   cityscope-cli regionals
//!   cityscope-cli cities
//!
//! Without `--catalog` the built-in fallback cities are used. With the
//! `http` feature, `--fetch` loads the catalog from IBGE + Nominatim.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cityscope::{
    data, proximity::near_with_distance, CatalogError, City, CityCatalog, GeoPoint, OptionExt,
    Result, SelectionConfig, SelectionController,
};

#[derive(Parser)]
#[command(name = "cityscope-cli")]
#[command(about = "Debug tool for city proximity and region selection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with an array of city records
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// JSON file with a SelectionConfig
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fetch the catalog from IBGE + Nominatim (slow)
    #[cfg(feature = "http")]
    #[arg(long, global = true)]
    fetch: bool,

    /// Directory for the fetched catalog cache
    #[cfg(feature = "http")]
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List cities within the radius of a city
    Near {
        /// City name (exact, case-sensitive)
        city: String,

        /// Radius in kilometers (overrides the config)
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// List cities inside a rectangle given by two corners
    #[command(allow_negative_numbers = true)]
    Within {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
    },

    /// Select a regional center and list the cities near its base city
    Regional {
        /// Regional name, e.g. "Juiz de Fora"
        name: String,
    },

    /// List the regional centers and how many cities each one covers
    Regionals,

    /// List every city in the catalog
    Cities,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Commands::Near {
        radius: Some(radius),
        ..
    } = &cli.command
    {
        config.radius_km = *radius;
    }

    let catalog = load_catalog(&cli, &config)?;
    let mut controller = SelectionController::new(catalog, config);

    match cli.command {
        Commands::Near { city, .. } => {
            let city = controller.catalog().find_by_name(&city).ok_or_missing(&city)?.clone();
            controller.select_city(city);
            print_selection(&controller);
        }
        Commands::Within {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            controller.begin_draw();
            controller.map_clicked(GeoPoint::new(lat1, lng1));
            controller.map_clicked(GeoPoint::new(lat2, lng2));
            print_selection(&controller);
        }
        Commands::Regional { name } => {
            if !controller.select_regional_by_name(&name) {
                return Err(CatalogError::CityNotFound(name));
            }
            print_selection(&controller);
        }
        Commands::Regionals => print_regionals(&controller),
        Commands::Cities => {
            println!("\n{}", "=".repeat(60));
            println!("CATALOG: {} cities", controller.catalog().len());
            println!("{}", "=".repeat(60));
            for city in controller.catalog().all() {
                print_city(city);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SelectionConfig> {
    match path {
        Some(path) => {
            let text = read_file(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(SelectionConfig::default()),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| CatalogError::Malformed(format!("{}: {}", path.display(), e)))
}

fn load_catalog(cli: &Cli, config: &SelectionConfig) -> Result<CityCatalog> {
    #[cfg(feature = "http")]
    if cli.fetch {
        return fetch_catalog(cli.cache_dir.as_deref(), config);
    }

    match &cli.catalog {
        Some(path) => {
            println!("Loading catalog from: {}", path.display());
            let text = read_file(path)?;
            let catalog = CityCatalog::from_json(&text, &config.state_bounds)?;
            let report = catalog.report();
            println!(
                "  [OK] {} cities ({} invalid, {} out of bounds, {} duplicates)",
                report.accepted,
                report.rejected_invalid,
                report.rejected_out_of_bounds,
                report.duplicates
            );
            Ok(catalog)
        }
        None => {
            println!("No catalog given, using the built-in fallback cities");
            CityCatalog::load(data::fallback_cities(), &config.state_bounds)
        }
    }
}

#[cfg(feature = "http")]
fn fetch_catalog(cache_dir: Option<&Path>, config: &SelectionConfig) -> Result<CityCatalog> {
    use cityscope::{CatalogLoader, IbgeSource, JsonFileCache};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CatalogError::Network(e.to_string()))?;

    let mut loader = CatalogLoader::new(IbgeSource::new()?, config.state_bounds);
    if let Some(dir) = cache_dir {
        loader = loader.with_cache(JsonFileCache::new(dir));
    }

    let outcome = runtime.block_on(loader.load())?;
    if let Some(message) = loader.last_error() {
        println!("  [WARN] {}", message);
    }
    println!("  Catalog origin: {:?}", outcome.origin());
    outcome
        .into_catalog()
        .ok_or_else(|| CatalogError::Network("load already in progress".to_string()))
}

fn print_city(city: &City) {
    let population = city
        .population_label()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    match &city.microregion {
        Some(micro) => println!("  {:<32} {:>10}  ({})", city.name, population, micro),
        None => println!("  {:<32} {:>10}", city.name, population),
    }
}

fn print_selection(controller: &SelectionController) {
    println!("\n{}", "=".repeat(60));
    println!("{}", controller.panel_title().to_uppercase());
    println!("{}", "=".repeat(60));

    if let Some(city) = controller.selection().city() {
        println!(
            "Selected city: {} (radius {}km)",
            city.name,
            controller.config().radius_km
        );
        let hits = near_with_distance(
            controller.catalog(),
            &city.position(),
            controller.config().radius_km,
            Some(&city.name),
        );
        for (city, distance) in &hits {
            println!("  {:<32} {:>8.1}km", city.name, distance / 1000.0);
        }
        println!("\nNearby cities found: {}", hits.len());
        return;
    }

    if let Some(rect) = controller.selection().rectangle() {
        println!(
            "Selected area: [{:.4}, {:.4}] to [{:.4}, {:.4}]",
            rect.south, rect.west, rect.north, rect.east
        );
    }

    let results = controller.results();
    for city in &results {
        print_city(city);
    }
    println!("\nCities found: {}", results.len());
}

fn print_regionals(controller: &SelectionController) {
    println!("\n{}", "=".repeat(60));
    println!("REGIONAL CENTERS");
    println!("{}", "=".repeat(60));

    for regional in controller.regionals() {
        let covered = regional.covered_cities(controller.catalog());
        let base = if controller
            .catalog()
            .find_by_name(&regional.base_city_name)
            .is_some()
        {
            "base in catalog"
        } else {
            "base missing"
        };
        println!(
            "  {:<24} {:>3} cities within {}km ({})",
            regional.name,
            covered.len(),
            regional.radius_km,
            base
        );
    }
}
