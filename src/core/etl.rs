use crate::core::summary::Summary;
use crate::core::{Pipeline, TimeRange};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum RangeOutcome {
    Completed {
        name: String,
        output_path: String,
        skipped_rows: usize,
        summary: Summary,
    },
    Skipped {
        name: String,
        reason: String,
    },
}

impl RangeOutcome {
    pub fn name(&self) -> &str {
        match self {
            RangeOutcome::Completed { name, .. } | RangeOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RangeOutcome::Completed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<RangeOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> impl Iterator<Item = &RangeOutcome> {
        self.outcomes.iter().filter(|o| o.is_completed())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &RangeOutcome> {
        self.outcomes.iter().filter(|o| !o.is_completed())
    }
}

/// 依序處理每個時間區間：查詢 → 轉換 → 寫檔 → 統計
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, enable_monitoring: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(enable_monitoring),
        }
    }

    /// 缺少查詢檔案的區間會被跳過，其他錯誤立即中止整個流程
    pub async fn run(&self, ranges: &[TimeRange]) -> Result<RunReport> {
        println!("{}", "=".repeat(RULE_WIDTH));
        println!("StoryCorps Interview Map Data Pipeline");
        println!("Generating data for ALL time ranges...");
        println!("{}", "=".repeat(RULE_WIDTH));

        let mut report = RunReport::default();
        for range in ranges {
            let outcome = self.run_range(range).await?;
            self.monitor.log_stats(&range.name);
            report.outcomes.push(outcome);
        }
        self.monitor.log_final_stats();

        println!("\n{}", "=".repeat(RULE_WIDTH));
        println!("✓ Pipeline completed successfully!");
        println!("✓ Generated all datasets:");
        for range in ranges {
            println!("  - {}", range.output_file);
        }
        println!("{}", "=".repeat(RULE_WIDTH));

        Ok(report)
    }

    pub async fn run_range(&self, range: &TimeRange) -> Result<RangeOutcome> {
        println!("\n{}", "=".repeat(RULE_WIDTH));
        println!("Processing {} data...", range.name);
        println!("{}", "=".repeat(RULE_WIDTH));
        tracing::info!("Processing time range '{}'", range.name);

        let rows = match self.pipeline.extract(range).await {
            Ok(rows) => rows,
            Err(e) if e.is_recoverable() => {
                tracing::debug!("Skipping '{}': {}", range.name, e);
                eprintln!("✗ {}", e);
                return Ok(RangeOutcome::Skipped {
                    name: range.name.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let result = self.pipeline.transform(rows).await?;
        let output_path = self.pipeline.load(range, &result).await?;

        let summary = Summary::from_records(&result.records);
        if !result.records.is_empty() {
            print!("{}", summary.render(&range.name));
        }

        tracing::info!(
            "✅ '{}' done: {} records, {} skipped",
            range.name,
            result.records.len(),
            result.skipped
        );

        Ok(RangeOutcome::Completed {
            name: range.name.clone(),
            output_path,
            skipped_rows: result.skipped,
            summary,
        })
    }
}
