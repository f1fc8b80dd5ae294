use anyhow::Context;
use clap::Parser;
use interview_map_etl::core::{ConfigProvider, TimeRange};
use interview_map_etl::utils::{logger, validation::Validate};
use interview_map_etl::{
    BigQueryRunner, CliConfig, EtlEngine, InterviewPipeline, LocalStorage, TomlConfig,
};
use std::path::Path;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.monitor);
    tracing::info!("🚀 Starting interview-map-etl");

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if cli.dry_run {
        perform_dry_run(&config)?;
        return Ok(());
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.base_dir().to_string());
    let runner = BigQueryRunner::new(config.query_settings().clone());
    let pipeline = InterviewPipeline::new(storage, runner, config.coercion_policy());
    let engine = EtlEngine::new_with_monitoring(pipeline, cli.monitor);

    match engine.run(config.time_ranges()).await {
        Ok(report) => {
            for outcome in report.skipped() {
                tracing::debug!("Time range '{}' was skipped", outcome.name());
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("✗ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code().max(1));
        }
    }

    Ok(())
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📡 Query tool:");
    println!("  Command: {}", config.query_settings().command_line());
    println!("  On coercion error: {:?}", config.coercion_policy());
    println!();
    println!("💾 Base directory: {}", config.base_dir());

    for range in config.time_ranges() {
        describe_range(config.base_dir(), range)?;
    }

    println!();
    println!("✅ Dry run analysis complete. No queries were executed.");
    Ok(())
}

fn describe_range(base_dir: &str, range: &TimeRange) -> anyhow::Result<()> {
    let query_path = Path::new(base_dir).join(&range.query_file);
    let status = if query_path.exists() {
        let query = std::fs::read_to_string(&query_path)
            .with_context(|| format!("reading {}", query_path.display()))?;
        format!("{} lines", query.lines().count())
    } else {
        "✗ missing, will be skipped".to_string()
    };

    println!();
    println!("🗓️ {}", range.name);
    println!("  Query:  {} ({})", query_path.display(), status);
    println!("  Output: {}", Path::new(base_dir).join(&range.output_file).display());
    Ok(())
}
