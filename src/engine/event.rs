//! Simulation progress events
//!
//! Events are observational only: a sink can never influence a run.

use crate::network::DeviceName;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    Started {
        description: String,
    },
    InitialCompromise {
        device: DeviceName,
    },
    Propagation {
        source: DeviceName,
        target: DeviceName,
        time: f64,
        probability: f64,
    },
    Completed {
        affected_devices: usize,
    },
}

impl fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationEvent::Started { description } => {
                write!(f, "Starting attack simulation: {}", description)
            }
            SimulationEvent::InitialCompromise { device } => {
                write!(f, "Initial compromise: {}", device)
            }
            SimulationEvent::Propagation { source, target, time, .. } => {
                write!(f, "Propagation: {} → {} (t={:.1}s)", source, target, time)
            }
            SimulationEvent::Completed { affected_devices } => {
                write!(f, "Simulation completed. {} devices compromised.", affected_devices)
            }
        }
    }
}

/// Receiver of progress events
pub trait EventSink {
    fn on_event(&mut self, event: &SimulationEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &SimulationEvent) {}
}

/// Forwards events to `tracing` at INFO level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&mut self, event: &SimulationEvent) {
        info!("{}", event);
    }
}

/// Collects events in order
impl EventSink for Vec<SimulationEvent> {
    fn on_event(&mut self, event: &SimulationEvent) {
        self.push(event.clone());
    }
}
