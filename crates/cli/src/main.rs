//! Usage Metrics Aggregator CLI
//!
//! A command-line tool for seeding demo data, triggering aggregation
//! runs and inspecting the resulting report views.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{aggregate, reports, seed};

/// Usage Metrics Aggregator CLI
#[derive(Parser)]
#[command(name = "uma")]
#[command(author, version, about = "CLI for the Usage Metrics Aggregator", long_about = None)]
pub struct Cli {
    /// Aggregator endpoint URL (can also be set via UMA_API_URL env var)
    #[arg(long, env = "UMA_API_URL", default_value = "http://localhost:9090")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Aggregation window accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Hour,
    Day,
    Week,
    Month,
}

impl WindowArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowArg::Hour => "hour",
            WindowArg::Day => "day",
            WindowArg::Week => "week",
            WindowArg::Month => "month",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the aggregator with the demo fixture dataset
    Seed,

    /// Trigger an aggregation run for an account
    Aggregate {
        /// Account to aggregate
        #[arg(long, short)]
        account: String,

        /// Aggregation window
        #[arg(long, short, value_enum, default_value = "hour")]
        window: WindowArg,
    },

    /// Show the current report view for one namespace
    Report {
        /// Account the namespace belongs to
        #[arg(long, short)]
        account: String,

        /// Namespace to show
        #[arg(long, short)]
        namespace: String,

        /// Aggregation window
        #[arg(long, short, value_enum, default_value = "hour")]
        window: WindowArg,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Seed => seed::run(&client).await,
        Commands::Aggregate { account, window } => {
            aggregate::run(&client, &account, window).await
        }
        Commands::Report {
            account,
            namespace,
            window,
        } => reports::show(&client, &account, &namespace, window, cli.format).await,
    }
}
