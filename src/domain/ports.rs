use crate::domain::model::{CongestionReport, VesselDataset};
use crate::domain::filter::StatusFilter;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Policy for rows whose coordinates, status or speed are present but unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum InvalidRecordPolicy {
    #[default]
    Fail,
    Drop,
}

pub trait ConfigProvider: Send + Sync {
    fn input(&self) -> &str;
    fn radius_km(&self) -> f64;
    fn max_rows(&self) -> usize;
    fn invalid_record_policy(&self) -> InvalidRecordPolicy;
    fn status_filter(&self) -> StatusFilter;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<VesselDataset>;
    async fn transform(&self, data: VesselDataset) -> Result<CongestionReport>;
    async fn load(&self, report: CongestionReport) -> Result<String>;
}
