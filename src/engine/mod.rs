//! Attack propagation engine
//!
//! Implements:
//! - REQ-SIM-001: Probabilistic breadth-first propagation from entry points
//! - REQ-SIM-002: Seeded, reproducible randomness threaded through every draw
//! - REQ-SIM-003: Typed progress events delivered to an injected sink
//! - REQ-SIM-004: Aggregate risk, propagation and resilience metrics
//! - REQ-SIM-005: Parallel Monte-Carlo estimation over a shared topology

pub mod batch;
pub mod event;
pub mod probability;
pub mod propagation;
pub mod results;

pub use batch::BatchSummary;
pub use event::{EventSink, NullSink, SimulationEvent, TracingSink};
pub use propagation::{EngineResult, SimulationError, Simulator};
pub use results::{PropagationMethod, PropagationStep, SimulationResult, TimelineEntry};
