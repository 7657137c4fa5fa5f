//! Monte-Carlo estimation over many seeded runs
//!
//! Runs share one immutable [`Network`]; each owns its state table, so they
//! execute in parallel. Per-run results are collected in seed order before
//! summation, keeping the summary independent of thread scheduling.

use super::event::NullSink;
use super::propagation::{validate_scenario, EngineResult, Simulator};
use super::results::SimulationResult;
use crate::config::{AttackScenario, ConfigError};
use crate::network::{DeviceName, Network};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Aggregate statistics over a batch of runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub base_seed: u64,
    pub mean_affected_devices: f64,
    pub mean_propagation_rate: f64,
    pub mean_risk_increase: f64,
    pub mean_attack_duration: f64,
    pub mean_resilience_score: f64,
    /// Fraction of runs in which each device ended compromised
    pub compromise_frequency: IndexMap<DeviceName, f64>,
}

impl BatchSummary {
    fn from_results(network: &Network, base_seed: u64, results: &[SimulationResult]) -> Self {
        let runs = results.len();
        let n = runs as f64;
        let mean_of = |f: fn(&SimulationResult) -> f64| results.iter().map(f).sum::<f64>() / n;

        let compromise_frequency = network
            .devices()
            .iter()
            .map(|device| {
                let hits = results
                    .iter()
                    .filter(|r| r.is_compromised(device.name().as_str()))
                    .count();
                (device.name().clone(), hits as f64 / n)
            })
            .collect();

        BatchSummary {
            runs,
            base_seed,
            mean_affected_devices: mean_of(|r: &SimulationResult| r.affected_devices as f64),
            mean_propagation_rate: mean_of(|r: &SimulationResult| r.propagation_rate),
            mean_risk_increase: mean_of(|r: &SimulationResult| r.risk_increase),
            mean_attack_duration: mean_of(|r: &SimulationResult| r.attack_duration),
            mean_resilience_score: mean_of(|r: &SimulationResult| r.network_resilience_score),
            compromise_frequency,
        }
    }
}

impl Simulator {
    /// Run `runs` independent simulations seeded `seed, seed + 1, ...`
    pub fn simulate_batch(
        &self,
        network: &Network,
        scenario: &AttackScenario,
        runs: usize,
    ) -> EngineResult<BatchSummary> {
        if runs == 0 {
            return Err(ConfigError::InvalidParameter { name: "runs", value: 0.0 }.into());
        }
        self.config().validate()?;
        validate_scenario(network, scenario)?;

        let base_seed = self.config().seed;
        info!("Starting batch of {} runs from seed {}", runs, base_seed);

        let results = (0..runs as u64)
            .into_par_iter()
            .map(|i| self.simulate_seeded(network, scenario, base_seed.wrapping_add(i), &mut NullSink))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(BatchSummary::from_results(network, base_seed, &results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NetworkDefinition, SimulationConfig};

    #[test]
    fn test_batch_is_deterministic() {
        let network = NetworkDefinition::sample_factory().build().unwrap();
        let scenario = AttackScenario::new(["IoT Sensor 1"], "sensor foothold");
        let simulator = Simulator::new(SimulationConfig::with_seed(11));

        let first = simulator.simulate_batch(&network, &scenario, 32).unwrap();
        let second = simulator.simulate_batch(&network, &scenario, 32).unwrap();
        assert_eq!(first, second);

        assert_eq!(first.runs, 32);
        assert_eq!(first.compromise_frequency["IoT Sensor 1"], 1.0);
        // Nothing points at the second sensor
        assert_eq!(first.compromise_frequency["IoT Sensor 2"], 0.0);
        assert!(first.mean_affected_devices >= 1.0);
        assert!((0.0..=1.0).contains(&first.mean_resilience_score));
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let network = NetworkDefinition::sample_factory().build().unwrap();
        let scenario = AttackScenario::new(["Edge Gateway"], "");
        let summary = Simulator::new(SimulationConfig::with_seed(3))
            .simulate_batch(&network, &scenario, 2)
            .unwrap();

        let a = Simulator::new(SimulationConfig::with_seed(3)).simulate(&network, &scenario).unwrap();
        let b = Simulator::new(SimulationConfig::with_seed(4)).simulate(&network, &scenario).unwrap();
        let expected = (a.affected_devices + b.affected_devices) as f64 / 2.0;
        assert!((summary.mean_affected_devices - expected).abs() < 1e-12);
    }

    #[test]
    fn test_batch_rejects_zero_runs_and_bad_scenario() {
        let network = NetworkDefinition::sample_factory().build().unwrap();
        let simulator = Simulator::default();

        let err = simulator
            .simulate_batch(&network, &AttackScenario::new(["Edge Gateway"], ""), 0)
            .unwrap_err();
        assert!(matches!(err, crate::engine::SimulationError::InvalidConfig(_)));

        let err = simulator
            .simulate_batch(&network, &AttackScenario::new(["Nope"], ""), 4)
            .unwrap_err();
        assert!(err.is_invalid_scenario());
    }
}
