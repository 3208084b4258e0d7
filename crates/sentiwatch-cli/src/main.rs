mod jobs;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sentiwatch-cli")]
#[command(about = "Run sentiwatch pipeline jobs by hand")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover videos, fetch their comments, classify and persist new ones
    Crawl {
        /// Override the configured search query
        #[arg(long)]
        query: Option<String>,

        /// Override the configured maximum number of discovered videos
        #[arg(long)]
        max_videos: Option<u32>,

        /// Override the configured comment fetch target
        #[arg(long)]
        target: Option<usize>,

        /// Print the run parameters without fetching or writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Run one anomaly detection pass over the stored comments
    Check {
        /// Compute the decision but skip alert delivery
        #[arg(long)]
        no_notify: bool,
    },
    /// Delete comments older than the retention horizon
    Purge,
    /// Classify a single text and print its sentiment
    Analyze {
        /// The text to classify
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = sentiwatch_core::load_app_config()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            query,
            max_videos,
            target,
            dry_run,
        } => jobs::run_crawl(&config, query, max_videos, target, dry_run).await,
        Commands::Check { no_notify } => jobs::run_check(&config, no_notify).await,
        Commands::Purge => jobs::run_purge(&config).await,
        Commands::Analyze { text } => jobs::run_analyze(&config, &text).await,
    }
}
