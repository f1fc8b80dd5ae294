use crate::domain::model::{QuerySettings, RawRow};
use crate::domain::ports::QueryRunner;
use crate::utils::error::{EtlError, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 透過 `bq` CLI 執行查詢：查詢文字經 stdin 傳入，結果以 JSON 從 stdout 讀回
#[derive(Debug, Clone)]
pub struct BigQueryRunner {
    settings: QuerySettings,
}

impl BigQueryRunner {
    pub fn new(settings: QuerySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }
}

impl QueryRunner for BigQueryRunner {
    async fn run_query(&self, query: &str) -> Result<Vec<RawRow>> {
        let program = &self.settings.program;
        tracing::debug!("Running: {}", self.settings.command_line());

        let mut child = Command::new(program)
            .args(self.settings.command_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EtlError::QueryLaunchError {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let feed = async move {
            // stdin 在此區塊結束時關閉，子程序才會讀到 EOF
            if let Some(mut stdin) = stdin {
                stdin.write_all(query.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(EtlError::QueryExecutionError {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        // 子程序成功結束但沒讀完 stdin 時，BrokenPipe 不影響結果
        match fed {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        let rows = parse_query_output(&output.stdout)?;
        tracing::debug!("Query returned {} rows", rows.len());
        Ok(rows)
    }
}

/// 解析 `--format=json` 的輸出；空結果集時工具只會印出空白
pub fn parse_query_output(stdout: &[u8]) -> Result<Vec<RawRow>> {
    let text = std::str::from_utf8(stdout).map_err(|e| EtlError::QueryOutputError {
        message: format!("output is not valid UTF-8: {}", e),
    })?;

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str::<Vec<RawRow>>(text).map_err(|e| EtlError::QueryOutputError {
        message: e.to_string(),
    })
}
