use crate::core::congestion::{aggregate, port_totals};
use crate::core::ingest::{parse_vessels, IngestOptions};
use crate::core::registry::PortRegistry;
use crate::core::{ConfigProvider, CongestionReport, Pipeline, Storage, VesselDataset};
use crate::domain::model::{CongestionRow, DatasetOverview};
use crate::utils::error::Result;
use crate::utils::validation::is_url;
use reqwest::Client;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const CONGESTION_FILE_STEM: &str = "congestion";
pub const SUMMARY_FILE: &str = "summary.json";
pub const BUNDLE_FILE: &str = "congestion_output.zip";

pub struct CongestionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    registry: PortRegistry,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> CongestionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            registry: PortRegistry::default(),
            client: Client::new(),
        }
    }

    pub fn with_registry(mut self, registry: PortRegistry) -> Self {
        self.registry = registry;
        self
    }

    async fn fetch_input(&self) -> Result<Vec<u8>> {
        let input = self.config.input();
        if is_url(input) {
            tracing::debug!("Downloading vessel CSV from: {}", input);
            let response = self.client.get(input).send().await?.error_for_status()?;
            tracing::debug!("HTTP response status: {}", response.status());
            Ok(response.bytes().await?.to_vec())
        } else {
            tracing::debug!("Reading vessel CSV from storage: {}", input);
            self.storage.read_file(input).await
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CongestionPipeline<S, C> {
    async fn extract(&self) -> Result<VesselDataset> {
        let raw = self.fetch_input().await?;
        tracing::debug!("Fetched {} bytes of vessel data", raw.len());

        let options = IngestOptions {
            max_rows: Some(self.config.max_rows()),
            policy: self.config.invalid_record_policy(),
        };
        let dataset = parse_vessels(&raw, &options)?;

        if dataset.dropped_incomplete > 0 || dataset.dropped_invalid > 0 {
            tracing::warn!(
                "⚠️ Dropped {} incomplete and {} invalid rows",
                dataset.dropped_incomplete,
                dataset.dropped_invalid
            );
        }

        Ok(dataset)
    }

    async fn transform(&self, data: VesselDataset) -> Result<CongestionReport> {
        let radius_km = self.config.radius_km();
        let filter = self.config.status_filter();

        let before = data.records.len();
        let vessels = filter.apply(data.records);
        tracing::debug!(
            "Status filter {:?} kept {} of {} records",
            filter,
            vessels.len(),
            before
        );

        let rows = aggregate(&vessels, &self.registry, radius_km);
        let port_totals = port_totals(&vessels, &self.registry, radius_km);
        let overview = DatasetOverview::from_records(&vessels, radius_km);

        if rows.is_empty() {
            tracing::info!(
                "No congestion detected within {} km of any port. Increase the radius or load more rows.",
                radius_km
            );
        }

        Ok(CongestionReport {
            overview,
            rows,
            port_totals,
        })
    }

    async fn load(&self, report: CongestionReport) -> Result<String> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        for format in self.config.output_formats() {
            let file_name = format!("{}.{}", CONGESTION_FILE_STEM, format);
            let data = match format.as_str() {
                "csv" => render_delimited(&report.rows, b',')?,
                "tsv" => render_delimited(&report.rows, b'\t')?,
                "json" => serde_json::to_vec_pretty(&report.rows)?,
                other => {
                    tracing::warn!("Skipping unsupported output format: {}", other);
                    continue;
                }
            };
            files.push((file_name, data));
        }

        if self.config.output_formats().iter().any(|f| f == "json") {
            let summary = serde_json::json!({
                "overview": report.overview,
                "port_totals": report.port_totals,
            });
            files.push((SUMMARY_FILE.to_string(), serde_json::to_vec_pretty(&summary)?));
        }

        if self.config.compress() {
            tracing::debug!("Creating ZIP bundle with {} files", files.len());
            let bundle = bundle_files(&files)?;
            self.storage.write_file(BUNDLE_FILE, &bundle).await?;
            return Ok(format!("{}/{}", self.config.output_path(), BUNDLE_FILE));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}

/// Congestion rows as CSV/TSV with `port,vessel_status,count,lat,lon` columns.
pub fn render_delimited(rows: &[CongestionRow], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    if rows.is_empty() {
        // 沒有資料時仍輸出表頭
        writer.write_record(["port", "vessel_status", "count", "lat", "lon"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

fn bundle_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
