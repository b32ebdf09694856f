use anyhow::Result;
use port_congestion::core::ConfigProvider;
use port_congestion::{CongestionEngine, CongestionPipeline, LocalStorage, TomlConfig};
use tempfile::TempDir;

/// 自訂港口與狀態過濾
#[tokio::test]
async fn test_toml_pipeline_with_custom_ports_and_filter() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let input_path = format!("{}/puget_sound.csv", temp_path);
    tokio::fs::write(
        &input_path,
        "imo_number,name,timestamp,latitude,longitude,speed_kn,status\n\
         9001,ALKI,2024-05-01 06:00:00,47.601,-122.341,0.0,5\n\
         9002,BLAKE,2024-05-01 06:00:00,47.61,-122.35,0.0,1\n\
         9003,COLMAN,2024-05-01 06:00:00,47.27,-122.41,0.0,5\n\
         9004,DUWAMISH,2024-05-01 06:00:00,47.28,-122.42,0.0,15\n\
         9005,ELLIOTT,2024-05-01 06:00:00,47.26,-122.40,0.0,\n",
    )
    .await?;

    let config_content = format!(
        r#"
[analysis]
name = "puget-sound"
description = "Seattle and Tacoma anchorages"
radius_km = 5

[source]
input = "{input}"

[filter]
exclude_undefined = true

[load]
output_path = "{output}/out"
output_formats = ["json"]

[[ports]]
name = "Port of Seattle"
lat = 47.60
lon = -122.34

[[ports]]
name = "Port of Tacoma"
lat = 47.27
lon = -122.41
"#,
        input = input_path,
        output = temp_path
    );

    let config_path = format!("{}/congestion.toml", temp_path);
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    let registry = config.port_registry()?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CongestionPipeline::new(storage, config).with_registry(registry);

    let output = CongestionEngine::new(pipeline).run().await?;
    assert_eq!(output, format!("{}/out", temp_path));

    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&tokio::fs::read_to_string(format!("{}/out/congestion.json", temp_path)).await?)?;

    let keys: Vec<(String, serde_json::Value, u64)> = rows
        .iter()
        .map(|r| {
            (
                r["port"].as_str().unwrap().to_string(),
                r["vessel_status"].clone(),
                r["count"].as_u64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        keys,
        vec![
            ("Port of Seattle".to_string(), serde_json::json!(1), 1),
            ("Port of Seattle".to_string(), serde_json::json!(5), 1),
            ("Port of Tacoma".to_string(), serde_json::json!(5), 1),
            ("Port of Tacoma".to_string(), serde_json::Value::Null, 1),
        ]
    );

    let summary: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(format!("{}/out/summary.json", temp_path)).await?)?;
    assert_eq!(summary["port_totals"][1]["vessel_count"], 2);

    Ok(())
}

#[test]
fn test_toml_duplicate_ports_rejected() -> Result<()> {
    let config = TomlConfig::from_toml_str(
        r#"
[analysis]
name = "dup"
radius_km = 20

[source]
input = "vessels.csv"

[load]
output_path = "./output"
output_formats = ["csv"]

[[ports]]
name = "Port of Houston"
lat = 29.730
lon = -95.265

[[ports]]
name = "Port of Houston"
lat = 29.731
lon = -95.266
"#,
    )?;

    assert!(config.port_registry().is_err());
    Ok(())
}
