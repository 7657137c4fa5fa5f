//! Per-run compromise state
//!
//! Implements REQ-NET-004: the mutable state of a simulation run lives in a
//! table owned by the run, indexed like the [`Network`] arena it borrows.
//! Any number of tables may share one topology.

use super::store::{Network, NetworkError, NetworkResult};
use super::types::{DeviceIdx, DeviceName};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Compromise state of a single device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub compromised: bool,
    /// Simulation time of compromise; `None` until compromised
    pub compromise_time: Option<f64>,
    /// Provenance label; `None` until compromised
    pub attack_source: Option<String>,
    pub security_level: f64,
}

impl DeviceState {
    fn baseline(security_level: f64) -> Self {
        DeviceState {
            compromised: false,
            compromise_time: None,
            attack_source: None,
            security_level,
        }
    }
}

/// State table for one simulation run over a borrowed [`Network`]
#[derive(Debug, Clone)]
pub struct DeviceStates<'a> {
    network: &'a Network,
    states: Vec<DeviceState>,
}

impl<'a> DeviceStates<'a> {
    pub fn new(network: &'a Network) -> Self {
        let states = network
            .devices()
            .iter()
            .map(|d| DeviceState::baseline(d.security_level()))
            .collect();
        DeviceStates { network, states }
    }

    /// The topology this table tracks
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Return every device to the uncompromised baseline. Idempotent.
    pub fn reset(&mut self) {
        for (state, device) in self.states.iter_mut().zip(self.network.devices()) {
            *state = DeviceState::baseline(device.security_level());
        }
    }

    /// Record a compromise. Callers mark each device at most once per run.
    pub fn mark_compromised(
        &mut self,
        name: &str,
        time: f64,
        attack_source: impl Into<String>,
    ) -> NetworkResult<()> {
        let idx = self
            .network
            .index_of(name)
            .ok_or_else(|| NetworkError::UnknownDevice(DeviceName::new(name)))?;
        self.mark_index(idx, time, attack_source.into());
        Ok(())
    }

    pub(crate) fn mark_index(&mut self, idx: DeviceIdx, time: f64, attack_source: String) {
        let state = &mut self.states[idx];
        state.compromised = true;
        state.compromise_time = Some(time);
        state.attack_source = Some(attack_source);
    }

    /// Whether the named device is compromised; `None` for unknown devices
    pub fn is_compromised(&self, name: &str) -> Option<bool> {
        self.state(name).map(|s| s.compromised)
    }

    pub(crate) fn is_compromised_index(&self, idx: DeviceIdx) -> bool {
        self.states[idx].compromised
    }

    /// Current state of the named device
    pub fn state(&self, name: &str) -> Option<&DeviceState> {
        self.network.index_of(name).map(|idx| &self.states[idx])
    }

    /// Number of compromised devices
    pub fn compromised_count(&self) -> usize {
        self.states.iter().filter(|s| s.compromised).count()
    }

    /// Count of compromised devices with a dependency pointing at `idx`
    pub(crate) fn compromised_predecessors(&self, idx: DeviceIdx) -> usize {
        self.network
            .in_edges(idx)
            .iter()
            .filter(|&&p| self.states[p].compromised)
            .count()
    }

    /// Iterate `(device, state)` pairs in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&'a DeviceName, &DeviceState)> + '_ {
        self.network
            .devices()
            .iter()
            .map(|d| d.name())
            .zip(self.states.iter())
    }

    /// Owned copy of the table keyed by device name
    pub fn snapshot(&self) -> IndexMap<DeviceName, DeviceState> {
        self.iter()
            .map(|(name, state)| (name.clone(), state.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Dependency;

    fn pair() -> Network {
        Network::build([("A", 0.9), ("B", 0.1)], [Dependency::with_weight("A", "B", 2.0)]).unwrap()
    }

    #[test]
    fn test_mark_and_query() {
        let network = pair();
        let mut states = network.new_states();

        assert_eq!(states.is_compromised("A"), Some(false));
        states.mark_compromised("A", 0.0, "Initial Attack").unwrap();

        let a = states.state("A").unwrap();
        assert!(a.compromised);
        assert_eq!(a.compromise_time, Some(0.0));
        assert_eq!(a.attack_source.as_deref(), Some("Initial Attack"));
        assert_eq!(states.compromised_count(), 1);
        assert_eq!(states.compromised_predecessors(1), 1);
    }

    #[test]
    fn test_mark_unknown_device() {
        let network = pair();
        let mut states = network.new_states();
        let err = states.mark_compromised("Z", 1.0, "x").unwrap_err();
        assert_eq!(err, NetworkError::UnknownDevice(DeviceName::new("Z")));
        assert_eq!(states.compromised_count(), 0);
        assert_eq!(states.is_compromised("Z"), None);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let network = pair();
        let mut states = network.new_states();
        states.mark_compromised("B", 4.2, "Lateral movement from A").unwrap();

        states.reset();
        let once = states.snapshot();
        states.reset();
        let twice = states.snapshot();

        assert_eq!(once, twice);
        assert_eq!(once, network.new_states().snapshot());
        assert!((once["B"].security_level - 0.9).abs() < 1e-12);
        assert_eq!(network.device_count(), 2);
        assert_eq!(network.dependency_count(), 1);
    }

    #[test]
    fn test_tables_share_topology() {
        let network = pair();
        let mut first = network.new_states();
        let second = network.new_states();

        first.mark_compromised("A", 0.0, "Initial Attack").unwrap();
        assert_eq!(first.is_compromised("A"), Some(true));
        assert_eq!(second.is_compromised("A"), Some(false));
    }
}
