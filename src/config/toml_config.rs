use crate::core::{CoercionPolicy, ConfigProvider, QuerySettings, TimeRange};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub error_handling: ErrorHandlingConfig,
    #[serde(default = "TimeRange::defaults")]
    pub time_ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 查詢檔與輸出 JSON 所在的目錄
    pub base_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHandlingConfig {
    pub on_coercion_error: CoercionPolicy,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            query: QuerySettings::default(),
            output: OutputConfig::default(),
            error_handling: ErrorHandlingConfig::default(),
            time_ranges: TimeRange::defaults(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GCP_PROJECT})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 只保留指定名稱的時間區間，維持原本順序
    pub fn retain_ranges(&mut self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        if let Some(unknown) = names
            .iter()
            .find(|name| !self.time_ranges.iter().any(|r| &r.name == *name))
        {
            return Err(EtlError::InvalidConfigValueError {
                field: "only".to_string(),
                value: unknown.clone(),
                reason: format!(
                    "Unknown time range. Known ranges: {}",
                    self.time_ranges
                        .iter()
                        .map(|r| r.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }

        self.time_ranges.retain(|r| names.contains(&r.name));
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("query.program", &self.query.program)?;
        validation::validate_positive_number("query.max_rows", self.query.max_rows, 1)?;
        validation::validate_path("output.base_dir", &self.output.base_dir)?;

        if self.time_ranges.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "time_ranges".to_string(),
            });
        }

        for range in &self.time_ranges {
            validation::validate_non_empty_string("time_ranges.name", &range.name)?;
            validation::validate_path("time_ranges.query_file", &range.query_file)?;
            validation::validate_path("time_ranges.output_file", &range.output_file)?;
            validation::validate_file_extension("time_ranges.query_file", &range.query_file, &["sql"])?;
            validation::validate_file_extension("time_ranges.output_file", &range.output_file, &["json"])?;
        }

        validation::validate_unique(
            "time_ranges.name",
            self.time_ranges.iter().map(|r| r.name.as_str()),
        )?;
        validation::validate_unique(
            "time_ranges.output_file",
            self.time_ranges.iter().map(|r| r.output_file.as_str()),
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_dir(&self) -> &str {
        &self.output.base_dir
    }

    fn query_settings(&self) -> &QuerySettings {
        &self.query
    }

    fn time_ranges(&self) -> &[TimeRange] {
        &self.time_ranges
    }

    fn coercion_policy(&self) -> CoercionPolicy {
        self.error_handling.on_coercion_error
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

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.query.program, "bq");
        assert_eq!(config.query.max_rows, 50000);
        assert_eq!(config.base_dir(), ".");
        assert_eq!(config.coercion_policy(), CoercionPolicy::Fail);
        let names: Vec<&str> = config.time_ranges().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Past 12 Months", "Past 10 Years", "All Time"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[query]
program = "/opt/google-cloud-sdk/bin/bq"
global_args = ["--project_id=storycorps-archive"]
max_rows = 1000

[output]
base_dir = "./public/data"

[error_handling]
on_coercion_error = "skip"

[[time_ranges]]
name = "Past 30 Days"
query_file = "query_30days.sql"
output_file = "interviews_30days.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.query.program, "/opt/google-cloud-sdk/bin/bq");
        assert_eq!(config.query.global_args, vec!["--project_id=storycorps-archive"]);
        assert_eq!(config.query.max_rows, 1000);
        assert!(!config.query.use_legacy_sql);
        assert_eq!(config.base_dir(), "./public/data");
        assert_eq!(config.coercion_policy(), CoercionPolicy::Skip);
        assert_eq!(config.time_ranges().len(), 1);
        assert_eq!(config.time_ranges()[0].output_file, "interviews_30days.json");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("INTERVIEW_MAP_TEST_PROJECT", "storycorps-test");

        let toml_content = r#"
[query]
global_args = ["--project_id=${INTERVIEW_MAP_TEST_PROJECT}", "--location=${INTERVIEW_MAP_UNSET_VAR}"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.query.global_args,
            vec![
                "--project_id=storycorps-test",
                "--location=${INTERVIEW_MAP_UNSET_VAR}"
            ]
        );

        std::env::remove_var("INTERVIEW_MAP_TEST_PROJECT");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[query\nprogram = ").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::default();
        config.query.max_rows = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.time_ranges.clear();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.time_ranges[1].output_file = "interviews_12months.json".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.time_ranges[0].query_file = "query_12months.txt".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.error_handling.on_coercion_error = CoercionPolicy::Skip;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retain_ranges() {
        let mut config = TomlConfig::default();
        config
            .retain_ranges(&["All Time".to_string(), "Past 12 Months".to_string()])
            .unwrap();

        let names: Vec<&str> = config.time_ranges.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Past 12 Months", "All Time"]);

        assert!(config.retain_ranges(&["Past Week".to_string()]).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nbase_dir = \"/srv/map\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_dir(), "/srv/map");
        assert_eq!(config.time_ranges().len(), 3);
    }
}
