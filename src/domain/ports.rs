use crate::domain::model::{CoercionPolicy, QuerySettings, RawRow, TimeRange, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 路徑皆相對於實作自己的根目錄
pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait QueryRunner: Send + Sync {
    fn run_query(&self, query: &str)
        -> impl std::future::Future<Output = Result<Vec<RawRow>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_dir(&self) -> &str;
    fn query_settings(&self) -> &QuerySettings;
    fn time_ranges(&self) -> &[TimeRange];
    fn coercion_policy(&self) -> CoercionPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, range: &TimeRange) -> Result<Vec<RawRow>>;
    async fn transform(&self, rows: Vec<RawRow>) -> Result<TransformResult>;
    async fn load(&self, range: &TimeRange, result: &TransformResult) -> Result<String>;
}
