//! Industrial network model
//!
//! This module implements the device/dependency graph with:
//! - Devices keyed by unique name, each carrying a static risk score (REQ-NET-001)
//! - Directed, weighted dependencies between devices (REQ-NET-002)
//! - Eager validation of network definitions (REQ-NET-003)
//! - Per-run compromise state kept apart from the immutable topology (REQ-NET-004)

pub mod device;
pub mod state;
pub mod store;
pub mod types;

// Re-export main types
pub use device::{Dependency, Device, DEFAULT_DEPENDENCY_WEIGHT};
pub use state::{DeviceState, DeviceStates};
pub use store::{Network, NetworkError, NetworkResult};
pub use types::{DeviceIdx, DeviceName};
