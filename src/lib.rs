pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    congestion::{aggregate, port_totals, CongestionTally},
    engine::CongestionEngine,
    geo::haversine_km,
    pipeline::CongestionPipeline,
    proximity::within_radius,
    registry::PortRegistry,
};
pub use crate::domain::model::{CongestionRow, NavStatus, Port, VesselRecord, VesselStatus};
pub use crate::utils::error::{CongestionError, Result};
