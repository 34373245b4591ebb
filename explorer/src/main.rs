//! HoS People Explorer command line entry point
//!
//! Loads the people, graph and stats datasets from a directory or a base URL
//! and prints one view per invocation.

use clap::{Parser, Subcommand};
use hos_data::{
    CategoryFilter, ConnectionMeasure, IntegrityMode, NetworkFilter, PersonFilter, SortField,
    SortOrder, SortState,
};
use hos_explorer::{render, Explorer, ExplorerConfig, ExplorerResult, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "hos-explorer")]
#[command(about = "Browse the History of Science people datasets")]
#[command(version)]
struct Args {
    /// Directory containing people.json, graph.json and stats.json
    #[arg(long, env = "HOS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL serving the datasets (takes precedence over --data-dir)
    #[arg(long, env = "HOS_BASE_URL")]
    base_url: Option<String>,

    /// Reject inconsistent datasets instead of repairing them
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Free-text search over names, descriptions and roles
    Search { query: String },

    /// Show one person
    Person { id: String },

    /// Filterable, sortable table of everyone
    Directory {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        journal: Option<String>,
        #[arg(long)]
        award: Option<String>,
        /// `name` or `roles`
        #[arg(long, default_value = "name")]
        sort: SortField,
        #[arg(long)]
        desc: bool,
    },

    /// Co-occurrence network
    Network {
        /// `org:<name>`, `journal:<name>` or `award:<name>`
        #[arg(long)]
        filter: Option<CategoryFilter>,
        #[arg(long, default_value_t = 1)]
        min_connections: u64,
        /// `weight` (sum of link weights) or `links`
        #[arg(long, default_value = "weight")]
        measure: ConnectionMeasure,
    },

    /// Totals, timeline and rankings
    Stats,

    /// Rebuild graph.json and stats.json from people.json
    Derive {
        #[arg(long, short)]
        out: PathBuf,
    },

    /// Cross-check the datasets
    Check,
}

async fn run(explorer: &Explorer, command: Command, format: OutputFormat) -> ExplorerResult<String> {
    match command {
        Command::Search { query } => render(&explorer.search(&query).await?, format),
        Command::Person { id } => render(&explorer.person_detail(&id).await?, format),
        Command::Directory {
            text,
            org,
            journal,
            award,
            sort,
            desc,
        } => {
            let filter = PersonFilter {
                text,
                organization: org,
                journal,
                award,
            };
            let order = if desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            render(
                &explorer.directory(&filter, SortState::new(sort, order)).await?,
                format,
            )
        }
        Command::Network {
            filter,
            min_connections,
            measure,
        } => {
            let mut network = NetworkFilter::default()
                .with_min_connections(min_connections)
                .with_measure(measure);
            network.category = filter;
            render(&explorer.network(&network).await?, format)
        }
        Command::Stats => render(&explorer.dashboard().await?, format),
        Command::Derive { out } => render(&explorer.derive_datasets(&out).await?, format),
        Command::Check => render(&explorer.check().await?, format),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hos_explorer=info,hos_data=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let integrity = if args.strict {
        IntegrityMode::Strict
    } else {
        IntegrityMode::Repair
    };
    let config = ExplorerConfig::from_parts(args.data_dir, args.base_url)
        .with_integrity(integrity)
        .with_format(args.format);
    tracing::debug!("Data location: {:?}", config.location);

    let explorer = match Explorer::from_config(&config) {
        Ok(explorer) => explorer,
        Err(e) => {
            tracing::error!("Failed to start explorer: {}", e);
            std::process::exit(1);
        }
    };

    match run(&explorer, args.command, args.format).await {
        Ok(output) => print!("{output}"),
        Err(e) if e.is_placeholder() => println!("{e}"),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
