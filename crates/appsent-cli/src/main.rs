mod report;

use appsent_sentiment::ReviewPipeline;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "appsent-cli")]
#[command(about = "App store review sentiment from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score the newest reviews of an app and print the sentiment report
    Report {
        /// App name to search for
        app_name: String,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print app titles matching a partial name, one per line
    Suggest {
        /// Partial app name
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = appsent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = ReviewPipeline::from_app_config(&config)?;

    match cli.command {
        Commands::Report { app_name, json } => {
            report::run_report(&pipeline, &app_name, json).await?;
        }
        Commands::Suggest { query } => {
            report::run_suggest(&pipeline, &query).await?;
        }
    }

    Ok(())
}
