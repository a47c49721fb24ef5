//! netshape CLI
//!
//! Moves networks between a network model store and GeoJSON layers.
//!
//! # Commands
//!
//! - `import` - Build a network from link (and node) layers and save it
//! - `export` - Write a stored network as one layer per entity class
//! - `tree` - List projects, networks and scenarios

mod commands;

use clap::{Parser, Subcommand};
use netshape_app::{ExportOptions, ImportOptions};
use netshape_core::{MatchPolicy, NetworkId, ProjectId, ScenarioId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// netshape network import and export tools.
#[derive(Parser)]
#[command(name = "netshape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the network store file
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import link and node layers as a new network
    Import {
        /// Link layer files
        #[arg(short, long, num_args = 1.., required = true)]
        links: Vec<PathBuf>,

        /// Node layer files; link endpoints must match these nodes
        #[arg(short, long, num_args = 1..)]
        nodes: Vec<PathBuf>,

        /// Name of the new network
        #[arg(long)]
        network_name: Option<String>,

        /// Name of the project created for the network
        #[arg(long, conflicts_with = "project_id")]
        project_name: Option<String>,

        /// Existing project to store the network in
        #[arg(long)]
        project_id: Option<i64>,

        /// Lowest precision (decimals) for endpoint matching
        #[arg(long, default_value = "1")]
        min_decimals: u32,

        /// Build the network without saving it
        #[arg(short, long)]
        dry_run: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Export a network scenario as GeoJSON layers
    Export {
        /// Network to export
        #[arg(long)]
        network_id: i64,

        /// Scenario whose values are exported
        #[arg(long)]
        scenario_id: i64,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Replace existing layer files
        #[arg(long)]
        overwrite: bool,

        /// Maximum field name length
        #[arg(long, default_value = "10")]
        field_name_limit: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List projects, networks and scenarios
    Tree {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Import {
            links,
            nodes,
            network_name,
            project_name,
            project_id,
            min_decimals,
            dry_run,
            format,
        } => {
            let store = cli.store.ok_or("Store path required for import")?;
            let mut options = ImportOptions::new()
                .match_policy(MatchPolicy::new().min_decimals(min_decimals));
            if let Some(name) = network_name {
                options = options.network_name(name);
            }
            if let Some(name) = project_name {
                options = options.project_name(name);
            }
            if let Some(id) = project_id {
                options = options.project_id(ProjectId::new(id));
            }
            if dry_run {
                options = options.dry_run();
            }
            commands::import::run(&store, &nodes, &links, options, &format)?;
        }
        Commands::Export {
            network_id,
            scenario_id,
            output,
            overwrite,
            field_name_limit,
            format,
        } => {
            let store = cli.store.ok_or("Store path required for export")?;
            let options = ExportOptions::new().overwrite(overwrite).schema(
                netshape_core::SchemaConfig::new().field_name_limit(field_name_limit),
            );
            commands::export::run(
                &store,
                NetworkId::new(network_id),
                ScenarioId::new(scenario_id),
                &output,
                options,
                &format,
            )?;
        }
        Commands::Tree { no_color } => {
            let store = cli.store.ok_or("Store path required for tree")?;
            commands::tree::run(&store, !no_color)?;
        }
        Commands::Version => {
            println!("netshape CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("netshape core v{}", netshape_core::VERSION);
        }
    }

    Ok(())
}
