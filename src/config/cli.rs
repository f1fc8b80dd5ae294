use crate::config::toml_config::TomlConfig;
use crate::core::CoercionPolicy;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "interview-map-etl")]
#[command(about = "Fetch interview location statistics from BigQuery and write map datasets")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the query files and receiving the JSON outputs
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Query tool executable
    #[arg(long)]
    pub bq_program: Option<String>,

    /// Maximum rows requested from the query tool
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Skip rows whose fields cannot be converted instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Only process the named time range (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Log CPU and memory usage after each time range
    #[arg(long)]
    pub monitor: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入 TOML (若有指定) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(base_dir) = &self.base_dir {
            config.output.base_dir = base_dir.clone();
        }
        if let Some(program) = &self.bq_program {
            config.query.program = program.clone();
        }
        if let Some(max_rows) = self.max_rows {
            config.query.max_rows = max_rows;
        }
        if self.lenient {
            config.error_handling.on_coercion_error = CoercionPolicy::Skip;
        }
        config.retain_ranges(&self.only)?;

        tracing::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}
