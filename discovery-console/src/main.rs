mod output;
mod repl;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use prospect_research::{
    CachedResearchService, HttpResearchService, ResearchController, ResearchService,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BASE_URL_ENV: &str = "RESEARCH_SERVICE_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const CACHE_TTL_HOURS: i64 = 24;

#[derive(Parser, Debug)]
#[command(
    name = "discovery-console",
    about = "Explore potential buyers for a pharma company website",
    version
)]
struct Cli {
    /// Company website to research; omit to start an interactive session
    website: Option<String>,

    /// Research service root (falls back to RESEARCH_SERVICE_URL, then
    /// http://localhost:8000)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Product-category hint sent with every request (repeatable)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Skip the research-service status probe at startup
    #[arg(long)]
    skip_probe: bool,

    /// Bypass the in-process result cache
    #[arg(long)]
    no_cache: bool,

    /// Print the research result as raw JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Focus one prospect id after a successful run
    #[arg(long)]
    select: Option<String>,
}

/// Initialize tracing based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "discovery_console=info,prospect_research=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var(BASE_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout = cli.timeout_secs.map(Duration::from_secs);

    let http = HttpResearchService::with_timeout(&base_url, timeout)?;
    let service: Arc<dyn ResearchService> = if cli.no_cache {
        Arc::new(http)
    } else {
        Arc::new(CachedResearchService::new(
            Arc::new(http),
            chrono::Duration::hours(CACHE_TTL_HOURS),
        ))
    };

    if !cli.skip_probe {
        probe_service(service.as_ref(), &base_url).await;
    }

    let mut controller = ResearchController::new(service.clone());
    if !cli.products.is_empty() {
        controller = controller.with_products(cli.products.clone());
    }

    match &cli.website {
        Some(website) => run_once(&controller, website, &cli).await,
        None => repl::run(&controller, service).await,
    }
}

/// Report whether the service answers with mock or live research. Purely
/// informational; failures do not stop the session.
async fn probe_service(service: &dyn ResearchService, base_url: &str) {
    match service.status().await {
        Ok(status) => info!(mode = %status.mode, "research service reachable at {base_url}"),
        Err(err) => warn!(error = %err, "research service status probe failed"),
    }
}

/// Single research run: submit, render, optionally focus one prospect.
async fn run_once(
    controller: &ResearchController,
    website: &str,
    cli: &Cli,
) -> anyhow::Result<()> {
    if let Err(err) = controller.submit(website).await {
        anyhow::bail!("research failed: {err}");
    }
    let Some(result) = controller.result() else {
        anyhow::bail!("research finished without a stored result");
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    output::print_result(&result, controller.completed_at());
    if let Some(raw) = &cli.select {
        controller.select_buyer(raw.as_str());
        match controller.selected_buyer() {
            Some(buyer) => output::print_buyer_detail(&buyer),
            None => println!("no prospect with id '{raw}'"),
        }
    }
    Ok(())
}
