//! Core type definitions for the network model

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Dense index of a device inside a [`Network`](super::Network)
pub type DeviceIdx = usize;

/// Unique device name (e.g., "SCADA Server", "PLC Controller")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DeviceName(String);

impl DeviceName {
    pub fn new(name: impl Into<String>) -> Self {
        DeviceName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeviceName {
    fn from(s: String) -> Self {
        DeviceName(s)
    }
}

impl From<&str> for DeviceName {
    fn from(s: &str) -> Self {
        DeviceName(s.to_string())
    }
}

impl Borrow<str> for DeviceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
