use anyhow::Context;
use clap::Parser;
use port_congestion::core::ConfigProvider;
use port_congestion::domain::filter::StatusFilter;
use port_congestion::utils::{logger, validation::Validate};
use port_congestion::{CongestionEngine, CongestionPipeline, LocalStorage, PortRegistry, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-congestion")]
#[command(about = "Port congestion analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "congestion.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override radius from config
    #[arg(long)]
    radius_km: Option<f64>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based congestion analysis");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(radius_km) = args.radius_km {
        config.analysis.radius_km = radius_km;
        tracing::info!("🔧 Radius overridden to: {} km", radius_km);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let registry = config.port_registry()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &registry, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CongestionPipeline::new(storage, config).with_registry(registry);
    let engine = CongestionEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Congestion analysis completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Congestion analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, registry: &PortRegistry, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Analysis: {}", config.analysis.name);
    if let Some(description) = &config.analysis.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input());
    println!("  Max Rows: {}", config.max_rows());
    println!("  Radius: {} km", config.radius_km());
    println!("  Invalid Rows: {:?}", config.invalid_record_policy());

    match config.status_filter() {
        StatusFilter::All => println!("  Statuses: all"),
        StatusFilter::ExcludeUndefined => println!("  Statuses: all except 15"),
        StatusFilter::Only(selected) => {
            let labels: Vec<String> = selected
                .iter()
                .map(|s| format!("{} ({})", s, s.label()))
                .collect();
            println!("  Statuses: {}", labels.join(", "));
        }
    }

    println!("  Ports:");
    for port in registry.ports() {
        println!("    {} ({:.3}, {:.3})", port.name, port.lat, port.lon);
    }

    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress() {
        println!("  Compression: ZIP");
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
