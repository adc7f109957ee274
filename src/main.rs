//! # Butterfly-extract CLI
//!
//! Command-line interface for the butterfly-extract library.
//! Extracts a road graph from an OpenStreetMap PBF file and converts road
//! graphs to and from GeoJSON.

use anyhow::{Context, Result};
use butterfly_extract::{
    collect_ways, geojson_to_roads, roads_to_geojson, Document, ExtractOptions, PbfSource,
};
use clap::{ArgAction, Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

mod cli;

use cli::ProgressManager;

/// Command-line interface for butterfly-extract
#[derive(Parser)]
#[command(name = "butterfly-extract")]
#[command(about = "Road graph extraction and simplification from OpenStreetMap data")]
#[command(long_about = "Builds a compact road graph from OpenStreetMap data:
  butterfly-extract extract belgium.osm.pbf belgium.json             # Extract and simplify
  butterfly-extract extract belgium.osm.pbf raw.json --simplify=false
  butterfly-extract geojson belgium.json belgium.geojson --viad      # Road graph to GeoJSON
  butterfly-extract geojson belgium.geojson belgium.json             # GeoJSON back to road graph

Logging goes to stderr; set RUST_LOG=debug for per-pass details.")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the road graph of an .osm.pbf file
    Extract {
        /// Input OpenStreetMap PBF file
        input: PathBuf,

        /// Output road graph (JSON)
        output: PathBuf,

        /// Contract chains of degree-2 nodes
        #[arg(
            long,
            default_value_t = true,
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = "true",
            action = ArgAction::Set
        )]
        simplify: bool,
    },

    /// Convert a road graph to GeoJSON, or GeoJSON back to a road graph
    Geojson {
        /// Input road graph or GeoJSON FeatureCollection
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Draw contracted roads through their discriminator node
        #[arg(
            long,
            default_value_t = false,
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = "true",
            action = ArgAction::Set
        )]
        viad: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        eprintln!("🦋 Butterfly-extract v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    match cli.command {
        Commands::Extract {
            input,
            output,
            simplify,
        } => extract_to_file(&input, &output, &ExtractOptions { simplify }),
        Commands::Geojson {
            input,
            output,
            viad,
        } => convert(&input, &output, viad),
    }
}

/// Run the extraction pipeline, writing the graph only once it is complete
fn extract_to_file(input: &Path, output: &Path, options: &ExtractOptions) -> Result<()> {
    let mut source = PbfSource::new(input)
        .with_context(|| format!("Cannot read input {}", input.display()))?;

    let ways = ProgressManager::stage("📖 Reading ways", || collect_ways(&mut source))
        .context("Way pass failed")?;
    let nodes = ProgressManager::stage("📍 Resolving node coordinates", || {
        ways.resolve_nodes(&mut source)
    })
    .context("Node pass failed")?;

    let message = if options.simplify {
        "🔗 Building and simplifying graph"
    } else {
        "🔗 Building graph"
    };
    let graph = ProgressManager::stage(message, || nodes.build(options))
        .context("Graph construction failed")?;

    graph
        .save(output)
        .with_context(|| format!("Cannot write {}", output.display()))?;

    info!(
        "📁 Saved {} roads and {} nodes to {}",
        graph.roads.len(),
        graph.nodes.len(),
        output.display()
    );
    Ok(())
}

/// Convert in whichever direction the input calls for
fn convert(input: &Path, output: &Path, via_discriminator: bool) -> Result<()> {
    let document = Document::load(input)
        .with_context(|| format!("Cannot read input {}", input.display()))?;

    match document {
        Document::RoadGraph(graph) => {
            let collection = roads_to_geojson(&graph, via_discriminator)
                .context("Cannot convert road graph to GeoJSON")?;
            let bytes = serde_json::to_vec(&collection)?;
            std::fs::write(output, bytes)
                .with_context(|| format!("Cannot write {}", output.display()))?;
            info!(
                "📁 Saved {} features to {}",
                collection.features.len(),
                output.display()
            );
        }
        Document::Geo(collection) => {
            if via_discriminator {
                warn!("--viad only applies to road graph input, ignoring it");
            }
            let graph =
                geojson_to_roads(collection).context("Cannot convert GeoJSON to road graph")?;
            graph
                .save(output)
                .with_context(|| format!("Cannot write {}", output.display()))?;
            info!(
                "📁 Saved {} roads and {} nodes to {}",
                graph.roads.len(),
                graph.nodes.len(),
                output.display()
            );
        }
    }
    Ok(())
}
