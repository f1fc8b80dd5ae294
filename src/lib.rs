pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{BigQueryRunner, LocalStorage};
pub use crate::app::pipelines::interview_pipeline::InterviewPipeline;
pub use crate::config::TomlConfig;
pub use crate::core::etl::{EtlEngine, RangeOutcome, RunReport};
pub use crate::utils::error::{EtlError, Result};
