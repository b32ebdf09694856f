pub mod cli;
pub mod toml_config;

use crate::core::geo::MAX_RADIUS_KM;
use crate::core::ConfigProvider;
use crate::utils::error::{CongestionError, Result};
use crate::utils::validation::{
    validate_input, validate_output_formats, validate_path, validate_positive_number,
    validate_range,
};

#[cfg(feature = "cli")]
use crate::domain::filter::{parse_status_token, StatusFilter};
#[cfg(feature = "cli")]
use crate::domain::model::VesselStatus;
#[cfg(feature = "cli")]
use crate::domain::ports::InvalidRecordPolicy;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// 所有設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_input("input", config.input())?;
    validate_range("radius_km", config.radius_km(), 0.0, MAX_RADIUS_KM)?;
    validate_positive_number("max_rows", config.max_rows(), 1)?;
    validate_path("output_path", config.output_path())?;
    validate_output_formats("output_formats", config.output_formats(), &OUTPUT_FORMATS)?;
    if config.status_filter().rejects_everything() {
        return Err(CongestionError::InvalidConfigValueError {
            field: "statuses".to_string(),
            value: "15".to_string(),
            reason: "Excluding status 15 leaves no status selected".to_string(),
        });
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "port-congestion")]
#[command(about = "Count vessels near major ports, grouped by AIS navigational status")]
pub struct CliConfig {
    /// Vessel CSV file or http(s) URL
    #[arg(short, long, default_value = "data/vessels.csv")]
    pub input: String,

    #[arg(short, long, default_value_t = 20.0)]
    pub radius_km: f64,

    #[arg(long, default_value_t = 5000)]
    pub max_rows: usize,

    /// Status codes to keep, e.g. `0,1,5,unknown`. Empty keeps everything.
    #[arg(long, value_delimiter = ',', value_parser = parse_status_token)]
    pub statuses: Vec<VesselStatus>,

    /// Ignore vessels reporting status 15 (undefined)
    #[arg(long)]
    pub exclude_undefined: bool,

    #[arg(long, value_enum, default_value_t = InvalidRecordPolicy::Fail)]
    pub on_invalid: InvalidRecordPolicy,

    #[arg(short, long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Bundle output files into a single ZIP archive
    #[arg(long)]
    pub compress: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input(&self) -> &str {
        &self.input
    }

    fn radius_km(&self) -> f64 {
        self.radius_km
    }

    fn max_rows(&self) -> usize {
        self.max_rows
    }

    fn invalid_record_policy(&self) -> InvalidRecordPolicy {
        self.on_invalid
    }

    fn status_filter(&self) -> StatusFilter {
        StatusFilter::from_selection(self.statuses.iter().copied().collect(), self.exclude_undefined)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress(&self) -> bool {
        self.compress
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
