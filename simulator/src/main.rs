//! CoreBank Simulator
//!
//! Drives concurrent transfer traffic against the ledger and verifies the
//! conservation properties afterwards.

use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod controller;
mod metrics;
mod scenario;

use config::SimulationConfig;
use controller::SimulationController;
use scenario::Scenario;

/// CoreBank Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "Concurrent load and conservation harness for the CoreBank ledger")]
struct Args {
    /// Number of accounts to seed
    #[arg(short, long, default_value = "8")]
    accounts: usize,

    /// Total transfers to attempt
    #[arg(short, long, default_value = "10000")]
    transfers: usize,

    /// Concurrent workers
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Opening balance per seeded account
    #[arg(long, default_value = "100000")]
    initial_balance: String,

    /// Largest single transfer amount
    #[arg(long, default_value = "1000")]
    max_amount: u64,

    /// Scenario to run
    #[arg(short, long, default_value = "random-traffic")]
    scenario: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)?;

    let config = SimulationConfig {
        accounts: args.accounts,
        transfers: args.transfers,
        workers: args.workers,
        initial_balance: args
            .initial_balance
            .parse::<Decimal>()
            .map_err(|e| anyhow::anyhow!("invalid initial balance: {}", e))?,
        max_amount: args.max_amount,
        seed: args.seed,
    };
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!("Starting CoreBank Simulator");
    info!("Scenario: {} ({})", scenario.name(), scenario.description());

    let mut controller = SimulationController::new(config);
    controller.run(scenario).await?;

    let metrics = controller.metrics();
    info!("Simulation complete");
    info!("Total transfers: {}", metrics.total_transfers);
    info!("Committed: {}", metrics.succeeded);
    info!("Overdraft rejections: {}", metrics.insufficient_funds);
    info!("Other failures: {}", metrics.failed_other);
    info!(
        "Latency: avg {}µs, p50 {}µs, p99 {}µs",
        metrics.average_latency_us(),
        metrics.p50_latency_us(),
        metrics.p99_latency_us()
    );
    info!("Success rate: {:.2}%", metrics.success_rate() * 100.0);

    Ok(())
}
