use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct CongestionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CongestionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚢 Starting port congestion analysis");
        self.monitor.log_stats("Start");

        // Extract
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Loaded {} vessel records ({} incomplete, {} invalid dropped)",
            dataset.records.len(),
            dataset.dropped_incomplete,
            dataset.dropped_invalid
        );
        self.monitor.log_stats("Extract");

        // Transform
        let report = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "⚓ {} congestion rows across {} ports within {} km",
            report.rows.len(),
            report
                .port_totals
                .iter()
                .filter(|p| p.vessel_count > 0)
                .count(),
            report.overview.radius_km
        );
        for total in report.port_totals.iter().filter(|p| p.vessel_count > 0) {
            tracing::debug!("  {}: {} vessels", total.port, total.vessel_count);
        }
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("📁 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
