use anyhow::{Context, Result};
use aurora_cost::config::{self, Config};
use aurora_cost::exit_codes::exit_code_for_anyhow;
use aurora_cost::model::ComparisonRequest;
use aurora_cost::{output, workflow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aurora-cost")]
#[command(
    about = "Compare Aurora Standard and I/O-Optimized monthly cost",
    long_about = "aurora-cost prices an Aurora cluster under both billing modes.\n\nIt uses:\n  - On-demand instance, storage and I/O prices from the AWS Price List API\n  - The latest volume size and 30 days of read/write I/O from CloudWatch\n\nThe target account is reached by assuming a read-only role."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare billing modes for one cluster
    ///
    /// Examples:
    ///   aurora-cost compare --account-id 123456789012 --region us-east-1 --cluster orders
    ///   aurora-cost compare --request request.json --output json
    Compare {
        /// Account that owns the cluster
        #[arg(long, required_unless_present = "request")]
        account_id: Option<String>,
        /// Region of the cluster (e.g., us-east-1)
        #[arg(long, env = "AWS_REGION", required_unless_present = "request")]
        region: Option<String>,
        /// DB cluster identifier
        #[arg(long, required_unless_present = "request")]
        cluster: Option<String>,
        /// JSON file with {"account_id", "region", "cluster"}
        #[arg(long, conflicts_with_all = ["account_id", "cluster"])]
        request: Option<PathBuf>,
    },
    /// Write a config file with the default settings
    Init {
        /// Path of the config file to write
        #[arg(short, long, default_value = ".aurora-cost.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(exit_code_for_anyhow(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare {
            account_id,
            region,
            cluster,
            request,
        } => {
            let config = Config::load(cli.config.as_deref())?;

            let request = match request {
                Some(path) => ComparisonRequest::from_json_file(&path)
                    .with_context(|| format!("Failed to read request: {}", path.display()))?,
                None => ComparisonRequest::new(
                    account_id.context("--account-id is required")?,
                    region.context("--region is required")?,
                    cluster.context("--cluster is required")?,
                ),
            };

            let comparison = workflow::run_comparison(&request, &config)
                .await
                .with_context(|| format!("Cost comparison failed for cluster {}", request.cluster))?;

            if cli.output == "json" {
                println!("{}", output::render_json(&comparison)?);
            } else {
                print!("{}", output::render_text(&comparison));
            }
        }
        Commands::Init { path } => {
            config::init_config(&path)?;
        }
    }

    Ok(())
}
