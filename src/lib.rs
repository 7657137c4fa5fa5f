//! Breachsim Attack Propagation Engine
//!
//! Estimates how a cyber-attack spreads through an industrial network of
//! interdependent devices: which devices fall, how fast, and with what
//! aggregate risk impact.
//!
//! # Architecture
//!
//! - Immutable topology ([`Network`]) separate from per-run state ([`DeviceStates`])
//! - Single sequential random generator per run, seeded explicitly
//! - Progress reported through an injected [`EventSink`], never a global log
//! - Graph analytics delegated to `breachsim-graph-algorithms`
//!
//! # Requirements Implemented
//!
//! - ✅ REQ-NET-001: Devices with validated risk scores
//! - ✅ REQ-NET-002: Directed, weighted dependencies
//! - ✅ REQ-NET-003: Eager rejection of malformed definitions
//! - ✅ REQ-NET-004: Per-run state tables over a shared topology
//! - ✅ REQ-SIM-001: Probabilistic breadth-first propagation
//! - ✅ REQ-SIM-002: Reproducible seeded runs
//! - ✅ REQ-SIM-003: Typed progress events
//! - ✅ REQ-SIM-004: Risk, propagation and resilience metrics
//! - ✅ REQ-SIM-005: Parallel Monte-Carlo batches
//! - ✅ REQ-ANA-001: Betweenness, closeness and degree centrality
//! - ✅ REQ-ANA-002: Critical paths between high-risk devices
//! - ✅ REQ-ANA-003: Topology metrics (density, clustering, connectivity, distances)
//!
//! ## Example Usage
//!
//! ```rust
//! use breachsim::{AttackScenario, NetworkDefinition, SimulationConfig, Simulator};
//!
//! let network = NetworkDefinition::sample_factory().build().unwrap();
//! let scenario = AttackScenario::new(["IoT Sensor 1"], "Compromised sensor firmware");
//!
//! let simulator = Simulator::new(SimulationConfig::with_seed(7));
//! let result = simulator.simulate(&network, &scenario).unwrap();
//!
//! assert!(result.affected_devices >= 1);
//! assert!((0.0..=1.0).contains(&result.network_resilience_score));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod network;

// Re-export main types for convenience
pub use network::{
    Dependency, Device, DeviceName, DeviceState, DeviceStates, Network, NetworkError,
    NetworkResult,
};

pub use config::{
    AnalysisConfig, AttackScenario, BreachsimConfig, ConfigError, ConfigResult,
    DependencyRecord, NetworkDefinition, PropagationModel, SimulationConfig,
};

pub use engine::{
    BatchSummary, EngineResult, EventSink, NullSink, PropagationMethod, PropagationStep,
    SimulationError, SimulationEvent, SimulationResult, Simulator, TimelineEntry, TracingSink,
};

pub use analysis::{
    build_view, network_metrics, vulnerability_analysis, CentralityReport, NetworkMetrics,
    VulnerabilityReport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
