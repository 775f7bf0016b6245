//! Simulation configuration.

use rust_decimal::Decimal;

/// Validated simulation parameters.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of accounts to seed.
    pub accounts: usize,
    /// Total transfers to attempt.
    pub transfers: usize,
    /// Concurrent workers.
    pub workers: usize,
    /// Opening balance per seeded account.
    pub initial_balance: Decimal,
    /// Largest single transfer amount.
    pub max_amount: u64,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.accounts < 2 {
            return Err("at least two accounts are required".to_string());
        }
        if self.transfers == 0 {
            return Err("transfer count cannot be 0".to_string());
        }
        if self.workers == 0 {
            return Err("worker count cannot be 0".to_string());
        }
        if self.initial_balance < Decimal::ZERO {
            return Err("initial balance cannot be negative".to_string());
        }
        if self.max_amount == 0 {
            return Err("max amount cannot be 0".to_string());
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            accounts: 8,
            transfers: 10_000,
            workers: 4,
            initial_balance: Decimal::from(100_000),
            max_amount: 1_000,
            seed: None,
        }
    }
}
