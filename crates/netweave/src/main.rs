mod commands;
mod regions;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netweave")]
#[command(about = "Plan multi-AZ VPC network topologies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the network topology and show the resulting entities
    Plan {
        #[command(flatten)]
        input: TopologyInput,

        /// Emit the action plan as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and zone availability
    Validate {
        #[command(flatten)]
        input: TopologyInput,
    },
    /// Show identifiers recorded for the applied topology
    Outputs {
        #[command(flatten)]
        input: TopologyInput,
    },
    /// Show version information
    Version,
}

/// Configuration sources shared by every subcommand
#[derive(Args)]
struct TopologyInput {
    /// Cluster name used as the resource name prefix
    #[arg(short = 'c', long, env = "NETWEAVE_CLUSTER")]
    cluster_name: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// VPC CIDR block (default 10.0.0.0/16)
    #[arg(long)]
    vpc_cidr: Option<String>,

    /// Number of availability zones to span (default 3)
    #[arg(short = 'z', long)]
    zones: Option<u32>,

    /// Region whose built-in zone list to use
    #[arg(short = 'r', long, env = "NETWEAVE_REGION", default_value = "us-east-1")]
    region: String,

    /// Override the environment's available zones (comma separated)
    #[arg(long, env = "NETWEAVE_AVAILABLE_ZONES", value_delimiter = ',')]
    available_zones: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Plan { input, json } => {
            let config = commands::resolve_config(&input)?;
            let catalog = commands::resolve_zones(&input)?;
            commands::plan::handle(&config, &catalog, json).await
        }
        Commands::Validate { input } => {
            let config = commands::resolve_config(&input)?;
            let catalog = commands::resolve_zones(&input)?;
            commands::validate::handle(&config, &catalog).await
        }
        Commands::Outputs { input } => {
            let config = commands::resolve_config(&input)?;
            let catalog = commands::resolve_zones(&input)?;
            commands::outputs::handle(&config, &catalog).await
        }
        Commands::Version => {
            println!("netweave {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
