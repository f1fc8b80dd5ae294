use serde::{Deserialize, Serialize};

/// 查詢工具回傳的一列，欄位型別未定 (通常是字串或數字)
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// 前端地圖使用的輸出單位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub city: String,
    pub state: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
    pub interview_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    pub records: Vec<LocationRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub name: String,
    pub query_file: String,
    pub output_file: String,
}

impl TimeRange {
    pub fn new(name: &str, query_file: &str, output_file: &str) -> Self {
        Self {
            name: name.to_string(),
            query_file: query_file.to_string(),
            output_file: output_file.to_string(),
        }
    }

    /// 三個固定的時間區間: 過去 12 個月、過去 10 年、全部
    pub fn defaults() -> Vec<TimeRange> {
        vec![
            TimeRange::new(
                "Past 12 Months",
                "query_12months.sql",
                "interviews_12months.json",
            ),
            TimeRange::new(
                "Past 10 Years",
                "query_10years.sql",
                "interviews_10years.json",
            ),
            TimeRange::new("All Time", "query_alltime.sql", "interviews_alltime.json"),
        ]
    }
}

/// 欄位存在但無法轉型時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub program: String,
    /// 放在 `query` 子命令之前的全域參數，例如 `--project_id=...`
    pub global_args: Vec<String>,
    pub max_rows: usize,
    pub use_legacy_sql: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            program: "bq".to_string(),
            global_args: Vec::new(),
            max_rows: 50_000,
            use_legacy_sql: false,
        }
    }
}

impl QuerySettings {
    pub fn command_args(&self) -> Vec<String> {
        let mut args = self.global_args.clone();
        args.push("query".to_string());
        args.push(format!("--use_legacy_sql={}", self.use_legacy_sql));
        args.push("--format=json".to_string());
        args.push(format!("--max_rows={}", self.max_rows));
        args
    }

    /// 用於 dry run 與日誌的完整命令列
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.command_args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_line() {
        let settings = QuerySettings::default();
        assert_eq!(
            settings.command_line(),
            "bq query --use_legacy_sql=false --format=json --max_rows=50000"
        );
    }

    #[test]
    fn test_global_args_precede_subcommand() {
        let settings = QuerySettings {
            global_args: vec!["--project_id=storycorps".to_string()],
            max_rows: 10,
            ..QuerySettings::default()
        };
        assert_eq!(
            settings.command_args(),
            vec![
                "--project_id=storycorps",
                "query",
                "--use_legacy_sql=false",
                "--format=json",
                "--max_rows=10",
            ]
        );
    }

    #[test]
    fn test_location_record_field_names() {
        let record = LocationRecord {
            city: "Austin".to_string(),
            state: "TX".to_string(),
            category: "Signature".to_string(),
            lat: 30.27,
            lon: -97.74,
            interview_count: 5,
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for field in ["city", "state", "category", "lat", "lon", "interview_count"] {
            assert!(keys.contains(&field), "missing field {}", field);
        }
        assert_eq!(keys.len(), 6);
    }
}
