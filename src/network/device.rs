//! Device (node) and dependency (edge) records

use super::types::DeviceName;
use serde::{Deserialize, Serialize};

/// Weight used when a dependency record omits one
pub const DEFAULT_DEPENDENCY_WEIGHT: f64 = 1.0;

/// A networked asset with a static risk score in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    name: DeviceName,
    risk_score: f64,
}

impl Device {
    /// Create a device. Range checks happen in [`Network::build`](super::Network::build).
    pub fn new(name: impl Into<DeviceName>, risk_score: f64) -> Self {
        Device {
            name: name.into(),
            risk_score,
        }
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    /// Derived defensive strength: `1 - risk_score`
    pub fn security_level(&self) -> f64 {
        1.0 - self.risk_score
    }
}

/// Directed lateral-movement path `from -> to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: DeviceName,
    pub to: DeviceName,
    pub weight: f64,
}

impl Dependency {
    pub fn new(from: impl Into<DeviceName>, to: impl Into<DeviceName>) -> Self {
        Self::with_weight(from, to, DEFAULT_DEPENDENCY_WEIGHT)
    }

    pub fn with_weight(
        from: impl Into<DeviceName>,
        to: impl Into<DeviceName>,
        weight: f64,
    ) -> Self {
        Dependency {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}
