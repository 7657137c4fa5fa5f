//! Input records and tunable parameters
//!
//! - [`NetworkDefinition`] / [`DependencyRecord`]: the network input contract
//! - [`AttackScenario`]: entry points plus a free-text description
//! - [`SimulationConfig`] / [`PropagationModel`] / [`AnalysisConfig`]: seed and
//!   formula constants, loadable from YAML

use crate::network::{Dependency, DeviceName, Network, NetworkResult, DEFAULT_DEPENDENCY_WEIGHT};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_weight() -> f64 {
    DEFAULT_DEPENDENCY_WEIGHT
}

/// One dependency record of a network definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub from: String,
    pub to: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl From<&DependencyRecord> for Dependency {
    fn from(record: &DependencyRecord) -> Self {
        Dependency::with_weight(record.from.as_str(), record.to.as_str(), record.weight)
    }
}

/// Declarative network definition: device risk scores plus dependencies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub devices: IndexMap<String, f64>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

impl NetworkDefinition {
    /// Parse a JSON document of the form `{"devices": {..}, "dependencies": [..]}`
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Validate and build the topology
    pub fn build(&self) -> NetworkResult<Network> {
        Network::from_definition(self)
    }

    /// Eight-device smart-factory network used for demos
    pub fn sample_factory() -> Self {
        let devices = [
            ("IoT Sensor 1", 0.3),
            ("IoT Sensor 2", 0.4),
            ("Edge Gateway", 0.5),
            ("SCADA Server", 0.7),
            ("PLC Controller", 0.6),
            ("Industrial Robot", 0.8),
            ("Quality Control", 0.4),
            ("Manufacturing Database", 0.9),
        ];
        let dependencies = [
            ("IoT Sensor 1", "Edge Gateway", 1.0),
            ("IoT Sensor 2", "Edge Gateway", 1.0),
            ("Edge Gateway", "SCADA Server", 1.5),
            ("SCADA Server", "PLC Controller", 2.0),
            ("PLC Controller", "Industrial Robot", 1.8),
            ("Industrial Robot", "Quality Control", 1.2),
            ("SCADA Server", "Manufacturing Database", 2.5),
        ];

        NetworkDefinition {
            devices: devices
                .iter()
                .map(|&(name, risk)| (name.to_string(), risk))
                .collect(),
            dependencies: dependencies
                .iter()
                .map(|&(from, to, weight)| DependencyRecord {
                    from: from.to_string(),
                    to: to.to_string(),
                    weight,
                })
                .collect(),
        }
    }
}

impl Network {
    /// Build a network from its declarative definition
    pub fn from_definition(definition: &NetworkDefinition) -> NetworkResult<Self> {
        Network::build(
            definition
                .devices
                .iter()
                .map(|(name, &risk)| (name.as_str(), risk)),
            definition.dependencies.iter().map(Dependency::from),
        )
    }
}

/// Attack scenario: initially compromised devices plus a description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackScenario {
    #[serde(rename = "attack_entry")]
    pub entry_points: Vec<DeviceName>,
    #[serde(default)]
    pub description: String,
}

impl AttackScenario {
    pub fn new<I, N>(entry_points: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<DeviceName>,
    {
        AttackScenario {
            entry_points: entry_points.into_iter().map(Into::into).collect(),
            description: description.into(),
        }
    }
}

/// Constants of the success-probability and delay formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationModel {
    /// Upper bound on any single attempt's success probability
    pub probability_cap: f64,
    /// Edge weight at which the weight factor saturates at 1.0
    pub weight_saturation: f64,
    /// Simulation time over which attacks lose effectiveness
    pub time_decay_horizon: f64,
    /// Floor of the time-decay factor
    pub min_time_decay: f64,
    /// Probability boost per compromised predecessor of the target
    pub network_effect_per_predecessor: f64,
    /// Delay numerator before dividing by edge weight
    pub base_delay: f64,
    /// Edge weight floor used in the delay divisor
    pub min_delay_weight: f64,
    /// Relative jitter applied to the base delay, drawn from [-v, v]
    pub delay_variation: f64,
    /// Minimum propagation delay
    pub min_delay: f64,
}

impl Default for PropagationModel {
    fn default() -> Self {
        Self {
            probability_cap: 0.95,
            weight_saturation: 2.0,
            time_decay_horizon: 100.0,
            min_time_decay: 0.1,
            network_effect_per_predecessor: 0.2,
            base_delay: 5.0,
            min_delay_weight: 0.1,
            delay_variation: 0.3,
            min_delay: 1.0,
        }
    }
}

impl PropagationModel {
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("probability_cap", self.probability_cap, 0.0, 1.0)?;
        check_positive("weight_saturation", self.weight_saturation)?;
        check_positive("time_decay_horizon", self.time_decay_horizon)?;
        check_range("min_time_decay", self.min_time_decay, 0.0, 1.0)?;
        check_range("network_effect_per_predecessor", self.network_effect_per_predecessor, 0.0, f64::MAX)?;
        check_positive("base_delay", self.base_delay)?;
        check_positive("min_delay_weight", self.min_delay_weight)?;
        check_range("delay_variation", self.delay_variation, 0.0, 1.0)?;
        check_range("min_delay", self.min_delay, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the run's random generator
    pub seed: u64,
    /// Risk score above which a device counts as critical
    pub critical_risk_threshold: f64,
    pub model: PropagationModel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            critical_risk_threshold: 0.7,
            model: PropagationModel::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_range("critical_risk_threshold", self.critical_risk_threshold, 0.0, 1.0)?;
        self.model.validate()
    }
}

/// Vulnerability analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Risk score above which a device counts as high-risk
    pub high_risk_threshold: f64,
    /// Maximum number of critical paths reported
    pub max_critical_paths: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: 0.6,
            max_critical_paths: 5,
        }
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreachsimConfig {
    pub simulation: SimulationConfig,
    pub analysis: AnalysisConfig,
}

impl BreachsimConfig {
    /// Parse and validate a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: BreachsimConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        config.simulation.validate()?;
        check_range("high_risk_threshold", config.analysis.high_risk_threshold, 0.0, 1.0)?;
        Ok(config)
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
