//! `affinity`: build the reader-affinity graph from a JSON snapshot and run one query.

use affinity_service::{AffinityConfig, AffinityService, JsonFileReaderSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "affinity")]
#[command(version)]
#[command(about = "Query the reader-affinity graph", long_about = None)]
struct Cli {
    /// JSON array of reader records (overrides AFFINITY_READERS)
    #[arg(short, long, global = true)]
    readers: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Lowest-cost connection path between two readers
    Path {
        from: String,
        to: String,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Readers within a number of hops
    Within {
        user: String,
        #[arg(long)]
        hops: Option<usize>,
    },

    /// Indirect friend suggestions with hop distance
    Suggest {
        user: String,
        #[arg(long)]
        hops: Option<usize>,
    },

    /// Friends of friends ranked by two-hop affinity
    Fof {
        user: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Strongest direct connections of a reader
    Top {
        user: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Readers with the most friends
    MostFriends {
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Connected groups of readers
    Clusters,

    /// Graph counts
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = AffinityConfig::from_env();
    if let Some(path) = cli.readers {
        config.readers_path = Some(path);
    }
    let path = config
        .readers_path
        .clone()
        .ok_or("no reader snapshot: pass --readers or set AFFINITY_READERS")?;

    tracing::debug!(path = %path.display(), "loading readers");
    let service = AffinityService::connect(JsonFileReaderSource::new(&path), config).await?;
    let output = commands::run(&service, cli.command).await?;
    println!("{}", output);
    Ok(())
}
