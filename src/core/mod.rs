pub mod congestion;
pub mod engine;
pub mod geo;
pub mod ingest;
pub mod pipeline;
pub mod proximity;
pub mod registry;

pub use crate::domain::model::{CongestionReport, VesselDataset};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
