//! Simulation controller.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::{info, warn};

use corebank_common::{AccountId, LedgerError};
use corebank_coordinator::TransferCoordinator;
use corebank_ledger::{Account, LedgerStore};

use crate::config::SimulationConfig;
use crate::metrics::SimulationMetrics;
use crate::scenario::Scenario;

/// Drives concurrent transfer traffic against a fresh ledger and verifies
/// the conservation properties afterwards.
pub struct SimulationController {
    /// Simulation parameters.
    config: SimulationConfig,
    /// Coordinator over the ledger under test.
    coordinator: Arc<TransferCoordinator>,
    /// Metrics merged from all workers.
    metrics: SimulationMetrics,
}

impl SimulationController {
    /// Create a controller with a fresh ledger.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            coordinator: Arc::new(TransferCoordinator::new(Arc::new(LedgerStore::new()))),
            metrics: SimulationMetrics::new(),
        }
    }

    /// Seed accounts for the scenario, drive it to completion, and verify
    /// conservation. Fails if a scenario property is violated.
    pub async fn run(&mut self, scenario: Scenario) -> anyhow::Result<()> {
        info!(
            scenario = scenario.name(),
            transfers = self.config.transfers,
            workers = self.config.workers,
            "Running scenario"
        );
        match scenario {
            Scenario::RandomTraffic => self.run_random_traffic().await,
            Scenario::HotSource => self.run_hot_source().await,
            Scenario::DisjointPairs => self.run_disjoint_pairs().await,
        }
    }

    /// Metrics for the completed run.
    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    /// The coordinator driving the ledger under test.
    pub fn coordinator(&self) -> &Arc<TransferCoordinator> {
        &self.coordinator
    }

    async fn run_random_traffic(&mut self) -> anyhow::Result<()> {
        let ids: Arc<Vec<AccountId>> = Arc::new(
            (0..self.config.accounts)
                .map(|i| AccountId::new(format!("acct-{i:04}")))
                .collect(),
        );
        for id in ids.iter() {
            self.coordinator
                .create_account(Account::with_balance(id.clone(), self.config.initial_balance))?;
        }
        let expected_total =
            self.config.initial_balance * Decimal::from(self.config.accounts as u64);
        info!(accounts = self.config.accounts, "Seeded accounts");

        let mut handles = Vec::with_capacity(self.config.workers);
        for (worker, count) in split_evenly(self.config.transfers, self.config.workers)
            .into_iter()
            .enumerate()
        {
            let coordinator = Arc::clone(&self.coordinator);
            let ids = Arc::clone(&ids);
            let max_amount = self.config.max_amount;
            let mut rng = worker_rng(self.config.seed, worker as u64);

            handles.push(tokio::spawn(async move {
                let mut metrics = SimulationMetrics::new();
                for _ in 0..count {
                    let from_idx = rng.gen_range(0..ids.len());
                    let mut to_idx = rng.gen_range(0..ids.len());
                    while to_idx == from_idx {
                        to_idx = rng.gen_range(0..ids.len());
                    }
                    let amount = Decimal::from(rng.gen_range(1..=max_amount));
                    execute_transfer(
                        &coordinator,
                        &ids[from_idx],
                        &ids[to_idx],
                        amount,
                        &mut metrics,
                    );
                }
                metrics
            }));
        }

        self.collect(handles).await?;
        self.verify_total(expected_total)
    }

    async fn run_hot_source(&mut self) -> anyhow::Result<()> {
        let source = AccountId::new("hot-source");
        let amount = Decimal::from(self.config.max_amount);
        let demand = amount * Decimal::from(self.config.transfers as u64);
        // One transfer's worth short of the total demand, so at least one
        // worker must be rejected.
        let initial = demand - Decimal::ONE;

        self.coordinator
            .create_account(Account::with_balance(source.clone(), initial))?;
        for worker in 0..self.config.workers {
            self.coordinator
                .create_account(Account::new(format!("sink-{worker:02}")))?;
        }

        let mut handles = Vec::with_capacity(self.config.workers);
        for (worker, count) in split_evenly(self.config.transfers, self.config.workers)
            .into_iter()
            .enumerate()
        {
            let coordinator = Arc::clone(&self.coordinator);
            let source = source.clone();
            let sink = AccountId::new(format!("sink-{worker:02}"));

            handles.push(tokio::spawn(async move {
                let mut metrics = SimulationMetrics::new();
                for _ in 0..count {
                    execute_transfer(&coordinator, &source, &sink, amount, &mut metrics);
                }
                metrics
            }));
        }

        self.collect(handles).await?;

        if self.metrics.insufficient_funds == 0 {
            anyhow::bail!("expected at least one overdraft rejection");
        }
        let final_balance = self
            .coordinator
            .get_account(&source)
            .map(|account| account.balance)
            .unwrap_or(Decimal::ZERO);
        if final_balance < Decimal::ZERO {
            anyhow::bail!("source account went negative: {}", final_balance);
        }
        self.verify_total(initial)
    }

    async fn run_disjoint_pairs(&mut self) -> anyhow::Result<()> {
        let counts = split_evenly(self.config.transfers, self.config.workers);
        let per_worker_max = counts.iter().copied().max().unwrap_or(0);
        if self.config.initial_balance < Decimal::from(per_worker_max as u64) {
            anyhow::bail!(
                "initial balance {} cannot fund {} unit transfers per worker",
                self.config.initial_balance,
                per_worker_max
            );
        }

        for worker in 0..self.config.workers {
            self.coordinator.create_account(Account::with_balance(
                format!("src-{worker:02}"),
                self.config.initial_balance,
            ))?;
            self.coordinator.create_account(Account::with_balance(
                format!("dst-{worker:02}"),
                self.config.initial_balance,
            ))?;
        }
        let expected_total =
            self.config.initial_balance * Decimal::from(2 * self.config.workers as u64);

        let mut handles = Vec::with_capacity(self.config.workers);
        for (worker, count) in counts.iter().copied().enumerate() {
            let coordinator = Arc::clone(&self.coordinator);
            let from = AccountId::new(format!("src-{worker:02}"));
            let to = AccountId::new(format!("dst-{worker:02}"));

            handles.push(tokio::spawn(async move {
                let mut metrics = SimulationMetrics::new();
                for _ in 0..count {
                    execute_transfer(&coordinator, &from, &to, Decimal::ONE, &mut metrics);
                }
                metrics
            }));
        }

        self.collect(handles).await?;

        if self.metrics.failed() != 0 {
            anyhow::bail!(
                "disjoint transfers should all succeed, {} failed",
                self.metrics.failed()
            );
        }
        for (worker, count) in counts.iter().copied().enumerate() {
            let moved = Decimal::from(count as u64);
            let src = self
                .coordinator
                .get_account(&AccountId::new(format!("src-{worker:02}")))
                .map(|account| account.balance);
            let dst = self
                .coordinator
                .get_account(&AccountId::new(format!("dst-{worker:02}")))
                .map(|account| account.balance);
            if src != Some(self.config.initial_balance - moved)
                || dst != Some(self.config.initial_balance + moved)
            {
                anyhow::bail!("pair {} did not conserve its total", worker);
            }
        }
        self.verify_total(expected_total)
    }

    async fn collect(
        &mut self,
        handles: Vec<tokio::task::JoinHandle<SimulationMetrics>>,
    ) -> anyhow::Result<()> {
        for result in futures::future::join_all(handles).await {
            let worker_metrics = result?;
            self.metrics.merge(&worker_metrics);
        }
        Ok(())
    }

    fn verify_total(&self, expected: Decimal) -> anyhow::Result<()> {
        let actual = self.coordinator.store().total_balance();
        if actual != expected {
            anyhow::bail!(
                "conservation violated: expected total {}, found {}",
                expected,
                actual
            );
        }
        info!(total = %actual, "Conservation verified");
        Ok(())
    }
}

/// Run one transfer and record its outcome.
fn execute_transfer(
    coordinator: &TransferCoordinator,
    from: &AccountId,
    to: &AccountId,
    amount: Decimal,
    metrics: &mut SimulationMetrics,
) {
    let started = Instant::now();
    match coordinator.transfer(from, to, amount) {
        Ok(_) => metrics.record_success(started.elapsed().as_micros() as u64),
        Err(LedgerError::InsufficientFunds(_)) => metrics.record_overdraft(),
        Err(error) => {
            warn!(error = %error, from = %from, to = %to, "Transfer rejected");
            metrics.record_error();
        }
    }
}

/// Split `total` work items across `workers`, remainder to the first few.
fn split_evenly(total: usize, workers: usize) -> Vec<usize> {
    let base = total / workers;
    let remainder = total % workers;
    (0..workers)
        .map(|worker| base + usize::from(worker < remainder))
        .collect()
}

/// Per-worker RNG, derived from the base seed when one is given.
fn worker_rng(seed: Option<u64>, worker: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker)),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            accounts: 4,
            transfers: 200,
            workers: 4,
            initial_balance: Decimal::from(1_000),
            max_amount: 50,
            seed: Some(42),
        }
    }

    #[test]
    fn test_split_evenly_distributes_remainder() {
        assert_eq!(split_evenly(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(split_evenly(8, 4), vec![2, 2, 2, 2]);
        assert_eq!(split_evenly(1, 4), vec![1, 0, 0, 0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_random_traffic_conserves_total() {
        let mut controller = SimulationController::new(test_config());
        controller.run(Scenario::RandomTraffic).await.unwrap();

        assert_eq!(controller.metrics().total_transfers, 200);
        assert_eq!(controller.metrics().failed_other, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_hot_source_rejects_at_least_one_overdraft() {
        let mut controller = SimulationController::new(test_config());
        controller.run(Scenario::HotSource).await.unwrap();

        assert!(controller.metrics().insufficient_funds >= 1);
        let balance = controller
            .coordinator()
            .get_account(&AccountId::new("hot-source"))
            .unwrap()
            .balance;
        assert!(balance >= Decimal::ZERO);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_disjoint_pairs_all_succeed() {
        let mut controller = SimulationController::new(test_config());
        controller.run(Scenario::DisjointPairs).await.unwrap();

        assert_eq!(controller.metrics().succeeded, 200);
        assert_eq!(controller.metrics().failed(), 0);
    }
}
