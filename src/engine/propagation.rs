//! Probabilistic breadth-first attack propagation
//!
//! A run is strictly sequential: every success probability depends on the
//! compromise state left behind by earlier draws, and all draws come from a
//! single generator.

use super::event::{EventSink, NullSink, SimulationEvent};
use super::results::{PropagationMethod, PropagationStep, SimulationResult, TimelineEntry};
use crate::config::{AttackScenario, ConfigError, SimulationConfig};
use crate::network::{DeviceIdx, DeviceName, DeviceStates, Network, NetworkError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Source label of entry-point compromises
pub const INITIAL_ATTACK: &str = "Initial Attack";

/// Errors that can occur when starting a simulation
#[derive(Error, Debug, PartialEq)]
pub enum SimulationError {
    #[error("Invalid scenario: no entry points given")]
    NoEntryPoints,

    #[error("Invalid scenario: entry point {0} is not in the network")]
    UnknownEntryPoint(DeviceName),

    #[error("Invalid simulation config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl SimulationError {
    /// True for rejected scenarios (empty or unknown entry points)
    pub fn is_invalid_scenario(&self) -> bool {
        matches!(
            self,
            SimulationError::NoEntryPoints | SimulationError::UnknownEntryPoint(_)
        )
    }
}

pub type EngineResult<T> = Result<T, SimulationError>;

/// Attack propagation simulator
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one simulation with a generator seeded from the config.
    ///
    /// Seeded runs on identical inputs produce identical results.
    pub fn simulate(&self, network: &Network, scenario: &AttackScenario) -> EngineResult<SimulationResult> {
        self.simulate_observed(network, scenario, &mut NullSink)
    }

    /// Like [`simulate`](Self::simulate), delivering progress events to `sink`
    pub fn simulate_observed<S>(
        &self,
        network: &Network,
        scenario: &AttackScenario,
        sink: &mut S,
    ) -> EngineResult<SimulationResult>
    where
        S: EventSink + ?Sized,
    {
        self.simulate_seeded(network, scenario, self.config.seed, sink)
    }

    pub(crate) fn simulate_seeded<S>(
        &self,
        network: &Network,
        scenario: &AttackScenario,
        seed: u64,
        sink: &mut S,
    ) -> EngineResult<SimulationResult>
    where
        S: EventSink + ?Sized,
    {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut result = self.simulate_with(network, scenario, &mut rng, sink)?;
        result.seed = Some(seed);
        Ok(result)
    }

    /// Run one simulation with a caller-supplied generator and a fresh state table
    pub fn simulate_with<R, S>(
        &self,
        network: &Network,
        scenario: &AttackScenario,
        rng: &mut R,
        sink: &mut S,
    ) -> EngineResult<SimulationResult>
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        let mut states = network.new_states();
        self.run(&mut states, scenario, rng, sink)
    }

    /// Run one simulation against a caller-owned state table.
    ///
    /// Inputs are validated before `states` is touched; on error the table is
    /// left exactly as it was. On success the table holds the final state.
    pub fn run<R, S>(
        &self,
        states: &mut DeviceStates<'_>,
        scenario: &AttackScenario,
        rng: &mut R,
        sink: &mut S,
    ) -> EngineResult<SimulationResult>
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        self.config.validate()?;
        let network = states.network();
        let entries = validate_scenario(network, scenario)?;
        let model = &self.config.model;

        info!(
            "Starting attack simulation: {} ({} entry points, {} devices)",
            scenario.description,
            entries.len(),
            network.device_count()
        );
        sink.on_event(&SimulationEvent::Started {
            description: scenario.description.clone(),
        });

        states.reset();
        let mut timeline = Vec::with_capacity(network.device_count());
        let mut steps = Vec::new();
        let mut queue: VecDeque<(DeviceIdx, f64)> = VecDeque::with_capacity(network.device_count());

        for idx in entries {
            let device = network.device_at(idx);
            states.mark_index(idx, 0.0, INITIAL_ATTACK.to_string());
            timeline.push(TimelineEntry {
                device: device.name().clone(),
                time: 0.0,
                risk: device.risk_score(),
                attack_vector: INITIAL_ATTACK.to_string(),
            });
            queue.push_back((idx, 0.0));
            sink.on_event(&SimulationEvent::InitialCompromise {
                device: device.name().clone(),
            });
        }

        while let Some((current, current_time)) = queue.pop_front() {
            let source = network.device_at(current);

            for &(target, weight) in network.out_edges(current) {
                if states.is_compromised_index(target) {
                    continue;
                }

                let target_device = network.device_at(target);
                let probability = model.attack_probability(
                    target_device.risk_score(),
                    weight,
                    current_time,
                    states.compromised_predecessors(target),
                );

                if rng.gen::<f64>() >= probability {
                    trace!("Attempt {} -> {} failed (p={:.3})", source.name(), target_device.name(), probability);
                    continue;
                }

                let delay = model.propagation_delay(weight, target_device.security_level(), rng);
                let new_time = current_time + delay;
                let attack_vector = format!("Lateral movement from {}", source.name());

                states.mark_index(target, new_time, attack_vector.clone());
                timeline.push(TimelineEntry {
                    device: target_device.name().clone(),
                    time: new_time,
                    risk: target_device.risk_score(),
                    attack_vector,
                });
                queue.push_back((target, new_time));
                steps.push(PropagationStep {
                    source: source.name().clone(),
                    target: target_device.name().clone(),
                    time: new_time,
                    success_probability: probability,
                    method: PropagationMethod::LateralMovement,
                });

                debug!(
                    "Propagation: {} -> {} at t={:.1} (p={:.3})",
                    source.name(),
                    target_device.name(),
                    new_time,
                    probability
                );
                sink.on_event(&SimulationEvent::Propagation {
                    source: source.name().clone(),
                    target: target_device.name().clone(),
                    time: new_time,
                    probability,
                });
            }
        }

        let result = SimulationResult::from_run(
            scenario,
            states,
            timeline,
            steps,
            self.config.critical_risk_threshold,
        );

        info!(
            "Simulation completed: {}/{} devices compromised, duration {:.1}s",
            result.affected_devices, result.total_devices, result.attack_duration
        );
        sink.on_event(&SimulationEvent::Completed {
            affected_devices: result.affected_devices,
        });

        Ok(result)
    }
}

/// Resolve entry points to indices, dropping repeats while keeping order
pub(crate) fn validate_scenario(network: &Network, scenario: &AttackScenario) -> EngineResult<Vec<DeviceIdx>> {
    if scenario.entry_points.is_empty() {
        return Err(SimulationError::NoEntryPoints);
    }

    let mut entries: Vec<DeviceIdx> = Vec::with_capacity(scenario.entry_points.len());
    for name in &scenario.entry_points {
        let idx = network
            .index_of(name.as_str())
            .ok_or_else(|| SimulationError::UnknownEntryPoint(name.clone()))?;
        if !entries.contains(&idx) {
            entries.push(idx);
        }
    }
    Ok(entries)
}
