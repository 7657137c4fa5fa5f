//! Simulation result record and metric aggregation

use crate::config::AttackScenario;
use crate::network::{DeviceName, DeviceState, DeviceStates};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a device came to be compromised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationMethod {
    #[serde(rename = "Initial Attack")]
    InitialAttack,
    #[serde(rename = "Lateral Movement")]
    LateralMovement,
}

impl PropagationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropagationMethod::InitialAttack => "Initial Attack",
            PropagationMethod::LateralMovement => "Lateral Movement",
        }
    }
}

/// One successful compromise along a dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationStep {
    pub source: DeviceName,
    pub target: DeviceName,
    pub time: f64,
    pub success_probability: f64,
    pub method: PropagationMethod,
}

/// One compromise event on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub device: DeviceName,
    pub time: f64,
    pub risk: f64,
    pub attack_vector: String,
}

/// Immutable outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub attack_scenario: AttackScenario,
    /// Seed of the engine-owned generator, if the engine created it
    pub seed: Option<u64>,
    pub total_devices: usize,
    pub affected_devices: usize,
    pub propagation_rate: f64,
    pub initial_risk_score: f64,
    pub overall_risk_score: f64,
    /// `overall_risk_score - initial_risk_score`, floored at 0
    pub risk_increase: f64,
    pub attack_duration: f64,
    /// Timeline sorted by compromise time, discovery order on ties
    pub attack_path: Vec<TimelineEntry>,
    pub propagation_steps: Vec<PropagationStep>,
    pub critical_devices_compromised: Vec<DeviceName>,
    pub network_resilience_score: f64,
    /// Timeline in discovery order
    pub compromise_timeline: Vec<TimelineEntry>,
    pub device_states: IndexMap<DeviceName, DeviceState>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

impl SimulationResult {
    /// Aggregate metrics from the final state table and the recorded run
    pub(crate) fn from_run(
        scenario: &AttackScenario,
        states: &DeviceStates<'_>,
        timeline: Vec<TimelineEntry>,
        propagation_steps: Vec<PropagationStep>,
        critical_risk_threshold: f64,
    ) -> Self {
        let network = states.network();
        let total_devices = network.device_count();
        let affected_devices = states.compromised_count();

        let propagation_rate = if total_devices > 0 {
            affected_devices as f64 / total_devices as f64
        } else {
            0.0
        };

        let initial_risk_score = mean(network.devices().iter().map(|d| d.risk_score())).unwrap_or(0.0);

        let compromised_mean = mean(
            network
                .devices()
                .iter()
                .zip(states.iter())
                .filter(|(_, (_, state))| state.compromised)
                .map(|(device, _)| device.risk_score()),
        );
        let (overall_risk_score, risk_increase) = match compromised_mean {
            Some(m) => {
                let post = m * propagation_rate;
                (post, (post - initial_risk_score).max(0.0))
            }
            None => (initial_risk_score, 0.0),
        };

        let attack_duration = timeline.iter().map(|e| e.time).fold(0.0, f64::max);

        let mut attack_path = timeline.clone();
        attack_path.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut critical_devices_compromised = Vec::new();
        let mut critical_total = 0usize;
        let mut critical_intact = 0usize;
        for (device, (_, state)) in network.devices().iter().zip(states.iter()) {
            if device.risk_score() <= critical_risk_threshold {
                continue;
            }
            critical_total += 1;
            if state.compromised {
                critical_devices_compromised.push(device.name().clone());
            } else {
                critical_intact += 1;
            }
        }
        let network_resilience_score = if critical_total == 0 {
            1.0
        } else {
            critical_intact as f64 / critical_total as f64
        };

        SimulationResult {
            attack_scenario: scenario.clone(),
            seed: None,
            total_devices,
            affected_devices,
            propagation_rate,
            initial_risk_score,
            overall_risk_score,
            risk_increase,
            attack_duration,
            attack_path,
            propagation_steps,
            critical_devices_compromised,
            network_resilience_score,
            compromise_timeline: timeline,
            device_states: states.snapshot(),
        }
    }

    /// Whether the named device ended the run compromised
    pub fn is_compromised(&self, device: &str) -> bool {
        self.device_states
            .get(device)
            .map(|s| s.compromised)
            .unwrap_or(false)
    }

    /// Human-readable summary report
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cybersecurity Simulation Report")?;
        writeln!(f, "{}", "=".repeat(40))?;
        writeln!(f, "Attack Description: {}", self.attack_scenario.description)?;
        writeln!(f)?;
        writeln!(f, "Total Devices: {}", self.total_devices)?;
        writeln!(f, "Affected Devices: {}", self.affected_devices)?;
        writeln!(f, "Propagation Rate: {:.2}", self.propagation_rate)?;
        writeln!(f, "Risk Increase: {:.2}", self.risk_increase)?;
        writeln!(f, "Attack Duration: {:.2}s", self.attack_duration)?;
        writeln!(f)?;
        writeln!(f, "Attack Timeline:")?;
        for step in &self.attack_path {
            writeln!(f, "- {} | Risk: {:.2} | Time: {:.1}s", step.device, step.risk, step.time)?;
        }
        writeln!(f)?;
        writeln!(f, "Critical Devices Compromised:")?;
        for device in &self.critical_devices_compromised {
            writeln!(f, "- {}", device)?;
        }
        writeln!(f)?;
        writeln!(f, "Resilience Score: {:.2}", self.network_resilience_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Dependency, Network};

    fn entry(device: &str, time: f64, risk: f64) -> TimelineEntry {
        TimelineEntry {
            device: device.into(),
            time,
            risk,
            attack_vector: "Initial Attack".to_string(),
        }
    }

    #[test]
    fn test_metrics_from_states() {
        let network = Network::build(
            [("A", 0.9), ("B", 0.8), ("C", 0.2), ("D", 0.1)],
            [Dependency::new("A", "B")],
        )
        .unwrap();
        let mut states = network.new_states();
        states.mark_compromised("A", 0.0, "Initial Attack").unwrap();
        states.mark_compromised("C", 0.0, "Initial Attack").unwrap();

        let timeline = vec![entry("A", 0.0, 0.9), entry("C", 0.0, 0.2)];
        let scenario = AttackScenario::new(["A", "C"], "two footholds");
        let result = SimulationResult::from_run(&scenario, &states, timeline, Vec::new(), 0.7);

        assert_eq!(result.total_devices, 4);
        assert_eq!(result.affected_devices, 2);
        assert_eq!(result.propagation_rate, 0.5);
        assert!((result.initial_risk_score - 0.5).abs() < 1e-12);
        // mean(0.9, 0.2) * 0.5
        assert!((result.overall_risk_score - 0.275).abs() < 1e-12);
        // Post-attack risk below the baseline is not an increase
        assert_eq!(result.risk_increase, 0.0);
        assert_eq!(result.attack_duration, 0.0);
        assert_eq!(result.critical_devices_compromised, vec![DeviceName::new("A")]);
        assert_eq!(result.network_resilience_score, 0.5);
        assert!(result.is_compromised("C"));
        assert!(!result.is_compromised("D"));
    }

    #[test]
    fn test_attack_path_is_stable_sorted() {
        let network = Network::build([("A", 0.5), ("B", 0.5), ("C", 0.5)], Vec::<Dependency>::new()).unwrap();
        let states = network.new_states();
        let timeline = vec![entry("A", 0.0, 0.5), entry("C", 4.0, 0.5), entry("B", 4.0, 0.5), entry("D", 2.0, 0.5)];
        let result = SimulationResult::from_run(&AttackScenario::default(), &states, timeline, Vec::new(), 0.7);

        let order: Vec<&str> = result.attack_path.iter().map(|e| e.device.as_str()).collect();
        assert_eq!(order, vec!["A", "D", "C", "B"]);
        assert_eq!(result.attack_duration, 4.0);
        assert_eq!(result.compromise_timeline[1].device.as_str(), "C");
    }

    #[test]
    fn test_no_compromise_keeps_baseline_risk() {
        let network = Network::build([("A", 0.4), ("B", 0.6)], Vec::<Dependency>::new()).unwrap();
        let states = network.new_states();
        let result = SimulationResult::from_run(&AttackScenario::default(), &states, Vec::new(), Vec::new(), 0.7);

        assert_eq!(result.affected_devices, 0);
        assert!((result.overall_risk_score - 0.5).abs() < 1e-12);
        assert_eq!(result.risk_increase, 0.0);
        assert_eq!(result.network_resilience_score, 1.0);
    }

    #[test]
    fn test_report_lists_timeline() {
        let network = Network::build([("A", 0.9)], Vec::<Dependency>::new()).unwrap();
        let mut states = network.new_states();
        states.mark_compromised("A", 0.0, "Initial Attack").unwrap();
        let scenario = AttackScenario::new(["A"], "USB drop");
        let result = SimulationResult::from_run(&scenario, &states, vec![entry("A", 0.0, 0.9)], Vec::new(), 0.7);

        let report = result.report();
        assert!(report.contains("Attack Description: USB drop"));
        assert!(report.contains("- A | Risk: 0.90 | Time: 0.0s"));
        assert!(report.contains("Resilience Score: 0.00"));
        assert!(report.ends_with("Resilience Score: 0.00\n"));
        assert_eq!(report, format!("{}", result));
    }

    #[test]
    fn test_method_wire_names() {
        let json = serde_json::to_string(&PropagationMethod::LateralMovement).unwrap();
        assert_eq!(json, "\"Lateral Movement\"");
        assert_eq!(PropagationMethod::InitialAttack.as_str(), "Initial Attack");
    }
}
