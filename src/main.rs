//! Listings Feed - Main Entry Point
//!
//! Submits a batch of listing updates from a JSON file as one feed and
//! optionally waits for the platform to process it.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use listings_feed::config::load_config;
use listings_feed::{
    AppConfig, FeedPayloadBuilder, FeedSubmissionOrchestrator, FeedsRestClient, PollPolicy,
    ProductUpdate, RequestContext,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Access token; overrides configuration
    #[arg(long, env = "SPAPI_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit product updates from a JSON array file
    Submit {
        /// File containing the product updates
        #[arg(short, long)]
        products: PathBuf,

        /// Comma-separated marketplace ids; defaults to configuration
        #[arg(long)]
        marketplaces: Option<String>,

        /// Poll until the feed finishes processing
        #[arg(long)]
        wait: bool,
    },
    /// Show a feed's processing status
    Status {
        feed_id: String,
    },
    /// Cancel a feed that has not started processing
    Cancel {
        feed_id: String,
    },
}

fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn read_products(path: &PathBuf) -> Result<Vec<ProductUpdate>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let products: Vec<ProductUpdate> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(products)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config: AppConfig = load_config(Some(&args.config))?;

    let log_level = args.log_level.clone().unwrap_or_else(|| config.settings.log_level.clone());
    init_logging(&log_level)?;

    info!("Configuration file: {}", args.config);

    let token = match args.access_token.clone().or_else(|| config.spapi.access_token.clone()) {
        Some(token) => token,
        None => bail!("no access token: pass --access-token or set SPAPI_ACCESS_TOKEN"),
    };
    let ctx = RequestContext::new(token)?;

    let client = FeedsRestClient::with_timeout(
        &config.spapi.base_url()?,
        Duration::from_secs(config.settings.request_timeout_seconds),
    )?;
    // The status/cancel commands never build a payload, so the seller id may be unset
    let builder = FeedPayloadBuilder::new(config.spapi.seller_id.clone());
    let orchestrator = FeedSubmissionOrchestrator::new(client, builder)
        .with_poll_policy(PollPolicy::from(&config.poll));

    match args.command {
        Command::Submit {
            products,
            marketplaces,
            wait,
        } => {
            config.spapi.require_seller_id()?;
            let products = read_products(&products)?;
            let marketplace_ids: Vec<String> = match marketplaces {
                Some(list) => list.split(',').map(|m| m.trim().to_string()).collect(),
                None => config.spapi.marketplace_ids.clone(),
            };

            info!("Submitting {} product updates", products.len());
            let submission = orchestrator.submit(&ctx, &products, &marketplace_ids).await?;
            println!("Feed submitted: {}", submission.feed_id);

            if wait {
                let (cancel_tx, cancel_rx) = watch::channel(false);
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("Received interrupt, stopping the wait");
                        let _ = cancel_tx.send(true);
                    }
                });

                let feed = orchestrator
                    .wait_for_completion(&ctx, &submission.feed_id, cancel_rx)
                    .await?;
                println!("Feed {} finished: {}", feed.feed_id, feed.processing_status);

                if let Some(report) = orchestrator.processing_report(&ctx, &feed).await? {
                    println!("Processing report: {}", report.url);
                }
            }
        }
        Command::Status { feed_id } => {
            let feed = orchestrator.get_feed(&ctx, &feed_id).await?;
            println!("Feed {}: {}", feed.feed_id, feed.processing_status);
            if let Some(document_id) = &feed.result_feed_document_id {
                println!("Result document: {}", document_id);
            }
        }
        Command::Cancel { feed_id } => {
            orchestrator.cancel_feed(&ctx, &feed_id).await?;
            println!("Feed {} cancelled", feed_id);
        }
    }

    Ok(())
}
