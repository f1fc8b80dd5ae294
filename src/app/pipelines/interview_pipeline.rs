use crate::core::transform::transform_rows;
use crate::core::{
    CoercionPolicy, Pipeline, QueryRunner, RawRow, Storage, TimeRange, TransformResult,
};
use crate::utils::error::{EtlError, Result};

pub struct InterviewPipeline<S: Storage, Q: QueryRunner> {
    pub(crate) storage: S,
    pub(crate) runner: Q,
    pub(crate) policy: CoercionPolicy,
}

impl<S: Storage, Q: QueryRunner> InterviewPipeline<S, Q> {
    pub fn new(storage: S, runner: Q, policy: CoercionPolicy) -> Self {
        Self {
            storage,
            runner,
            policy,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, Q: QueryRunner> Pipeline for InterviewPipeline<S, Q> {
    async fn extract(&self, range: &TimeRange) -> Result<Vec<RawRow>> {
        if !self.storage.exists(&range.query_file).await {
            return Err(EtlError::QueryFileNotFound {
                path: range.query_file.clone(),
            });
        }

        println!("Reading query from {}...", range.query_file);
        let bytes = self.storage.read_file(&range.query_file).await?;
        let query = String::from_utf8_lossy(&bytes);

        println!("Executing BigQuery query...");
        let rows = self.runner.run_query(&query).await?;
        println!("✓ Retrieved {} rows from BigQuery", rows.len());

        Ok(rows)
    }

    async fn transform(&self, rows: Vec<RawRow>) -> Result<TransformResult> {
        println!("Transforming data...");
        let result = transform_rows(rows, self.policy)?;

        println!("✓ Transformed {} locations", result.records.len());
        if result.skipped > 0 {
            println!("  (Skipped {} rows with missing data)", result.skipped);
        }

        Ok(result)
    }

    async fn load(&self, range: &TimeRange, result: &TransformResult) -> Result<String> {
        println!("Writing data to {}...", range.output_file);

        // serde_json 的 pretty 輸出為兩格縮排
        let json = serde_json::to_string_pretty(&result.records)?;
        tracing::debug!("Writing {} bytes to {}", json.len(), range.output_file);
        self.storage
            .write_file(&range.output_file, json.as_bytes())
            .await?;

        println!(
            "✓ Saved {} locations to {}",
            result.records.len(),
            range.output_file
        );
        Ok(range.output_file.clone())
    }
}
