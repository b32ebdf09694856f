use crate::domain::model::Port;
use crate::utils::error::{CongestionError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use std::collections::HashSet;

/// Ordered, immutable set of ports. Order decides the order of output rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PortRegistry {
    ports: Vec<Port>,
}

impl PortRegistry {
    pub fn new(ports: Vec<Port>) -> Result<Self> {
        if ports.is_empty() {
            return Err(CongestionError::ConfigError {
                message: "Port registry needs at least one port".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(ports.len());
        for port in &ports {
            validate_non_empty_string("ports.name", &port.name)?;
            validate_range(&format!("ports.{}.lat", port.name), port.lat, -90.0, 90.0)?;
            validate_range(&format!("ports.{}.lon", port.name), port.lon, -180.0, 180.0)?;
            if !seen.insert(port.name.as_str()) {
                return Err(CongestionError::DuplicatePort {
                    name: port.name.clone(),
                });
            }
        }

        Ok(Self { ports })
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }
}

impl Default for PortRegistry {
    /// Major U.S. container ports.
    fn default() -> Self {
        Self {
            ports: vec![
                Port::new("Port of Los Angeles", 33.738, -118.272),
                Port::new("Port of New York", 40.668, -74.045),
                Port::new("Port of Houston", 29.730, -95.265),
                Port::new("Port of Miami", 25.778, -80.179),
                Port::new("Port of Seattle", 47.60, -122.34),
                Port::new("Port of Savannah", 32.08, -81.10),
            ],
        }
    }
}
