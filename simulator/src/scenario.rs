//! Simulation scenarios.

/// A named traffic pattern driven against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Random amounts between random distinct pairs; the seeded total must
    /// be conserved.
    RandomTraffic,
    /// Every worker drains one source seeded short of the total demand; at
    /// least one overdraft rejection is expected and the source must never
    /// go negative.
    HotSource,
    /// Each worker owns a private account pair; every transfer succeeds
    /// and each pair conserves its own total.
    DisjointPairs,
}

impl Scenario {
    /// Load a scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "random-traffic" => Ok(Self::RandomTraffic),
            "hot-source" => Ok(Self::HotSource),
            "disjoint-pairs" => Ok(Self::DisjointPairs),
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// Scenario name as accepted by [`load`](Self::load).
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomTraffic => "random-traffic",
            Self::HotSource => "hot-source",
            Self::DisjointPairs => "disjoint-pairs",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RandomTraffic => "random transfers between random account pairs",
            Self::HotSource => "all workers draining a single underfunded source",
            Self::DisjointPairs => "independent transfers over disjoint account pairs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_by_name() {
        assert_eq!(Scenario::load("random-traffic").unwrap(), Scenario::RandomTraffic);
        assert_eq!(Scenario::load("hot-source").unwrap(), Scenario::HotSource);
        assert_eq!(Scenario::load("disjoint-pairs").unwrap(), Scenario::DisjointPairs);
    }

    #[test]
    fn test_unknown_scenario_is_rejected() {
        assert!(Scenario::load("does-not-exist").is_err());
    }

    #[test]
    fn test_name_round_trips() {
        for scenario in [
            Scenario::RandomTraffic,
            Scenario::HotSource,
            Scenario::DisjointPairs,
        ] {
            assert_eq!(Scenario::load(scenario.name()).unwrap(), scenario);
        }
    }
}
