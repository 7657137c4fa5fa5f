//! In-memory network topology
//!
//! Implements:
//! - REQ-NET-001: Devices with validated risk scores
//! - REQ-NET-002: Directed, weighted dependencies
//! - REQ-NET-003: Rejection of dangling edges and out-of-range inputs

use super::device::{Dependency, Device};
use super::state::DeviceStates;
use super::types::{DeviceIdx, DeviceName};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while building or addressing a network
#[derive(Error, Debug, PartialEq)]
pub enum NetworkError {
    #[error("Configuration error: dependency {from} -> {to} references unknown device {missing}")]
    UnknownEndpoint {
        from: DeviceName,
        to: DeviceName,
        missing: DeviceName,
    },

    #[error("Configuration error: device {device} has risk score {score} outside [0, 1]")]
    RiskScoreOutOfRange { device: DeviceName, score: f64 },

    #[error("Configuration error: dependency {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        from: DeviceName,
        to: DeviceName,
        weight: f64,
    },

    #[error("Configuration error: device {0} is defined more than once")]
    DuplicateDevice(DeviceName),

    #[error("Device {0} not found")]
    UnknownDevice(DeviceName),
}

impl NetworkError {
    /// True for malformed network definitions, false for lookups of absent devices
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, NetworkError::UnknownDevice(_))
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Immutable device/dependency graph
///
/// Devices live in an arena indexed by [`DeviceIdx`] in definition order:
/// - devices: DeviceIdx -> Device
/// - outgoing: DeviceIdx -> [(target, weight)]
/// - incoming: DeviceIdx -> [source]
/// - name_index: DeviceName -> DeviceIdx
///
/// Compromise state is not stored here; see [`DeviceStates`].
#[derive(Debug, Clone)]
pub struct Network {
    devices: Vec<Device>,
    outgoing: Vec<Vec<(DeviceIdx, f64)>>,
    incoming: Vec<Vec<DeviceIdx>>,
    name_index: FxHashMap<DeviceName, DeviceIdx>,
    dependency_count: usize,
}

impl Network {
    /// Build a network from `(name, risk_score)` pairs and dependency records.
    ///
    /// Device order is preserved and determines every derived ordering
    /// (successor iteration, result snapshots). A dependency repeated for the
    /// same ordered pair keeps a single edge carrying the last weight.
    pub fn build<I, N, D>(devices: I, dependencies: D) -> NetworkResult<Self>
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<DeviceName>,
        D: IntoIterator<Item = Dependency>,
    {
        let mut network = Network {
            devices: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            name_index: FxHashMap::default(),
            dependency_count: 0,
        };

        for (name, risk_score) in devices {
            let name = name.into();
            if !(0.0..=1.0).contains(&risk_score) {
                return Err(NetworkError::RiskScoreOutOfRange {
                    device: name,
                    score: risk_score,
                });
            }
            if network.name_index.contains_key(&name) {
                return Err(NetworkError::DuplicateDevice(name));
            }

            let idx = network.devices.len();
            network.name_index.insert(name.clone(), idx);
            network.devices.push(Device::new(name, risk_score));
            network.outgoing.push(Vec::new());
            network.incoming.push(Vec::new());
        }

        for dependency in dependencies {
            network.add_dependency(dependency)?;
        }

        Ok(network)
    }

    fn add_dependency(&mut self, dependency: Dependency) -> NetworkResult<()> {
        let Dependency { from, to, weight } = dependency;

        if !weight.is_finite() || weight <= 0.0 {
            return Err(NetworkError::InvalidWeight { from, to, weight });
        }

        let from_idx = match self.name_index.get(&from) {
            Some(&idx) => idx,
            None => {
                let missing = from.clone();
                return Err(NetworkError::UnknownEndpoint { from, to, missing });
            }
        };
        let to_idx = match self.name_index.get(&to) {
            Some(&idx) => idx,
            None => {
                let missing = to.clone();
                return Err(NetworkError::UnknownEndpoint { from, to, missing });
            }
        };

        if let Some(edge) = self.outgoing[from_idx].iter_mut().find(|(t, _)| *t == to_idx) {
            warn!("Duplicate dependency {} -> {}: weight {} replaces {}", from, to, weight, edge.1);
            edge.1 = weight;
            return Ok(());
        }

        self.outgoing[from_idx].push((to_idx, weight));
        self.incoming[to_idx].push(from_idx);
        self.dependency_count += 1;
        Ok(())
    }

    /// Number of devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Number of distinct directed dependencies
    pub fn dependency_count(&self) -> usize {
        self.dependency_count
    }

    /// All devices in definition order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Iterate all dependencies, grouped by source in definition order
    pub fn dependencies(&self) -> impl Iterator<Item = Dependency> + '_ {
        self.outgoing.iter().enumerate().flat_map(move |(from, edges)| {
            edges.iter().map(move |&(to, weight)| {
                Dependency::with_weight(
                    self.devices[from].name().clone(),
                    self.devices[to].name().clone(),
                    weight,
                )
            })
        })
    }

    /// Look up a device by name
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.index_of(name).map(|idx| &self.devices[idx])
    }

    /// Whether a device with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Dense index of a device
    pub fn index_of(&self, name: &str) -> Option<DeviceIdx> {
        self.name_index.get(name).copied()
    }

    fn require(&self, name: &str) -> NetworkResult<DeviceIdx> {
        self.index_of(name)
            .ok_or_else(|| NetworkError::UnknownDevice(DeviceName::new(name)))
    }

    /// Devices reachable over one outgoing dependency
    pub fn successors(&self, name: &str) -> NetworkResult<Vec<&DeviceName>> {
        let idx = self.require(name)?;
        Ok(self.outgoing[idx]
            .iter()
            .map(|&(to, _)| self.devices[to].name())
            .collect())
    }

    /// Devices with a dependency pointing at this one
    pub fn predecessors(&self, name: &str) -> NetworkResult<Vec<&DeviceName>> {
        let idx = self.require(name)?;
        Ok(self.incoming[idx]
            .iter()
            .map(|&from| self.devices[from].name())
            .collect())
    }

    /// Weight of the dependency `from -> to`, if present
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<f64> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        self.outgoing[from_idx]
            .iter()
            .find(|(t, _)| *t == to_idx)
            .map(|&(_, w)| w)
    }

    /// Create a fresh per-run state table with every device uncompromised
    pub fn new_states(&self) -> DeviceStates<'_> {
        DeviceStates::new(self)
    }

    pub(crate) fn device_at(&self, idx: DeviceIdx) -> &Device {
        &self.devices[idx]
    }

    pub(crate) fn out_edges(&self, idx: DeviceIdx) -> &[(DeviceIdx, f64)] {
        &self.outgoing[idx]
    }

    pub(crate) fn in_edges(&self, idx: DeviceIdx) -> &[DeviceIdx] {
        &self.incoming[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant() -> Network {
        Network::build(
            [("Sensor", 0.3), ("Gateway", 0.5), ("SCADA", 0.7)],
            [
                Dependency::new("Sensor", "Gateway"),
                Dependency::with_weight("Gateway", "SCADA", 1.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_build_and_traverse() {
        let network = plant();
        assert_eq!(network.device_count(), 3);
        assert_eq!(network.dependency_count(), 2);

        let succ = network.successors("Gateway").unwrap();
        assert_eq!(succ, vec![&DeviceName::new("SCADA")]);

        let pred = network.predecessors("Gateway").unwrap();
        assert_eq!(pred, vec![&DeviceName::new("Sensor")]);

        assert!(network.successors("SCADA").unwrap().is_empty());
        assert_eq!(network.edge_weight("Gateway", "SCADA"), Some(1.5));
        assert_eq!(network.edge_weight("SCADA", "Gateway"), None);
    }

    #[test]
    fn test_unknown_device_lookup() {
        let network = plant();
        let err = network.successors("Robot").unwrap_err();
        assert_eq!(err, NetworkError::UnknownDevice(DeviceName::new("Robot")));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let err = Network::build(
            [("A", 0.5)],
            [Dependency::new("A", "B")],
        )
        .unwrap_err();

        assert_eq!(
            err,
            NetworkError::UnknownEndpoint {
                from: DeviceName::new("A"),
                to: DeviceName::new("B"),
                missing: DeviceName::new("B"),
            }
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_rejects_out_of_range_risk() {
        let err = Network::build([("A", 1.2)], Vec::<Dependency>::new()).unwrap_err();
        assert!(matches!(err, NetworkError::RiskScoreOutOfRange { .. }));

        let err = Network::build([("A", f64::NAN)], Vec::<Dependency>::new()).unwrap_err();
        assert!(matches!(err, NetworkError::RiskScoreOutOfRange { .. }));

        let err = Network::build([("A", -0.1)], Vec::<Dependency>::new()).unwrap_err();
        assert!(matches!(err, NetworkError::RiskScoreOutOfRange { .. }));
    }

    #[test]
    fn test_rejects_bad_weight_and_duplicates() {
        let err = Network::build(
            [("A", 0.5), ("B", 0.5)],
            [Dependency::with_weight("A", "B", 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidWeight { .. }));

        let err = Network::build([("A", 0.5), ("A", 0.2)], Vec::<Dependency>::new()).unwrap_err();
        assert_eq!(err, NetworkError::DuplicateDevice(DeviceName::new("A")));
    }

    #[test]
    fn test_duplicate_dependency_keeps_last_weight() {
        let network = Network::build(
            [("A", 0.5), ("B", 0.5)],
            [
                Dependency::with_weight("A", "B", 1.0),
                Dependency::with_weight("A", "B", 3.0),
            ],
        )
        .unwrap();

        assert_eq!(network.dependency_count(), 1);
        assert_eq!(network.edge_weight("A", "B"), Some(3.0));
        assert_eq!(network.predecessors("B").unwrap().len(), 1);
    }

    #[test]
    fn test_dependencies_iterates_edges() {
        let network = plant();
        let deps: Vec<_> = network.dependencies().collect();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1], Dependency::with_weight("Gateway", "SCADA", 1.5));
    }
}
