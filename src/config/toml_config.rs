use crate::config::validate_provider;
use crate::core::registry::PortRegistry;
use crate::core::ConfigProvider;
use crate::domain::filter::StatusFilter;
use crate::domain::model::{NavStatus, Port, VesselStatus};
use crate::domain::ports::InvalidRecordPolicy;
use crate::utils::error::{CongestionError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub analysis: AnalysisConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub ports: Option<Vec<Port>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,
    pub description: Option<String>,
    pub radius_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input: String,
    pub max_rows: Option<usize>,
    #[serde(default)]
    pub on_invalid: InvalidRecordPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub statuses: Option<Vec<u8>>,
    pub include_unknown: Option<bool>,
    pub exclude_undefined: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

pub const DEFAULT_MAX_ROWS: usize = 5000;

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${AIS_DATA_URL})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            CongestionError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 自訂港口清單，未設定時使用預設六個港口；空清單視為錯誤
    pub fn port_registry(&self) -> Result<PortRegistry> {
        match &self.ports {
            Some(ports) => PortRegistry::new(ports.clone()),
            None => Ok(PortRegistry::default()),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_provider(self)?;

        if let Some(codes) = &self.filter.statuses {
            for &code in codes {
                if NavStatus::try_from(code).is_err() {
                    return Err(CongestionError::InvalidConfigValueError {
                        field: "filter.statuses".to_string(),
                        value: code.to_string(),
                        reason: "AIS status codes range from 0 to 15".to_string(),
                    });
                }
            }
        }

        self.port_registry()?;
        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input(&self) -> &str {
        &self.source.input
    }

    fn radius_km(&self) -> f64 {
        self.analysis.radius_km
    }

    fn max_rows(&self) -> usize {
        self.source.max_rows.unwrap_or(DEFAULT_MAX_ROWS)
    }

    fn invalid_record_policy(&self) -> InvalidRecordPolicy {
        self.source.on_invalid
    }

    fn status_filter(&self) -> StatusFilter {
        let mut selected: BTreeSet<VesselStatus> = self
            .filter
            .statuses
            .iter()
            .flatten()
            .filter_map(|&code| NavStatus::try_from(code).ok())
            .map(VesselStatus::Code)
            .collect();
        if !selected.is_empty() && self.filter.include_unknown.unwrap_or(false) {
            selected.insert(VesselStatus::Unknown);
        }

        StatusFilter::from_selection(selected, self.filter.exclude_undefined.unwrap_or(false))
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress(&self) -> bool {
        self.load.compress.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[analysis]
name = "us-ports"
radius_km = 25.0

[source]
input = "data/vessels.csv"
max_rows = 10000
on_invalid = "drop"

[filter]
statuses = [0, 1, 5]
include_unknown = true

[load]
output_path = "./output"
output_formats = ["csv", "json"]
compress = true
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.analysis.name, "us-ports");
        assert_eq!(config.radius_km(), 25.0);
        assert_eq!(config.max_rows(), 10000);
        assert_eq!(config.invalid_record_policy(), InvalidRecordPolicy::Drop);
        assert!(config.compress());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());

        let filter = config.status_filter();
        assert!(filter.allows(VesselStatus::Code(NavStatus::Moored)));
        assert!(filter.allows(VesselStatus::Unknown));
        assert!(!filter.allows(VesselStatus::Code(NavStatus::Aground)));
        assert_eq!(config.port_registry().unwrap(), PortRegistry::default());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = TomlConfig::from_toml_str(
            r#"
[analysis]
name = "minimal"
radius_km = 20

[source]
input = "vessels.csv"

[load]
output_path = "./output"
output_formats = ["csv"]
"#,
        )
        .unwrap();

        assert_eq!(config.max_rows(), DEFAULT_MAX_ROWS);
        assert_eq!(config.invalid_record_policy(), InvalidRecordPolicy::Fail);
        assert_eq!(config.status_filter(), StatusFilter::All);
        assert!(!config.compress());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PORT_CONGESTION_TEST_URL", "https://data.example.com/ais.csv");

        let config = TomlConfig::from_toml_str(
            r#"
[analysis]
name = "env"
radius_km = 10

[source]
input = "${PORT_CONGESTION_TEST_URL}"

[load]
output_path = "./output"
output_formats = ["json"]
"#,
        )
        .unwrap();
        assert_eq!(config.input(), "https://data.example.com/ais.csv");

        std::env::remove_var("PORT_CONGESTION_TEST_URL");
    }

    #[test]
    fn test_custom_ports() {
        let config = TomlConfig::from_toml_str(
            r#"
[analysis]
name = "pacific-northwest"
radius_km = 15

[source]
input = "vessels.csv"

[load]
output_path = "./output"
output_formats = ["csv"]

[[ports]]
name = "Port of Seattle"
lat = 47.60
lon = -122.34

[[ports]]
name = "Port of Tacoma"
lat = 47.27
lon = -122.41
"#,
        )
        .unwrap();

        let registry = config.port_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ports()[1].name, "Port of Tacoma");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.filter.statuses = Some(vec![0, 16]);
        assert!(config.validate().is_err());

        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.analysis.radius_km = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.ports = Some(vec![
            Port::new("Port of Miami", 25.778, -80.179),
            Port::new("Port of Miami", 25.778, -80.179),
        ]);
        assert!(matches!(
            config.validate(),
            Err(CongestionError::DuplicatePort { .. })
        ));
    }

    #[test]
    fn test_empty_port_list_rejected() {
        let content = format!("ports = []\n{}", BASIC);
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.ports, Some(vec![]));

        assert!(matches!(
            config.port_registry(),
            Err(CongestionError::ConfigError { .. })
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[analysis\nname = 1").unwrap_err();
        assert!(matches!(err, CongestionError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.analysis.name, "us-ports");
    }
}
