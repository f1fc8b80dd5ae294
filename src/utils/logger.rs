use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 未設定 RUST_LOG 時使用的過濾條件；開啟監控時需放行 info 才看得到統計
pub fn default_filter(verbose: bool, monitor: bool) -> &'static str {
    if verbose {
        "interview_map_etl=debug,info"
    } else if monitor {
        "interview_map_etl=info"
    } else {
        "interview_map_etl=warn"
    }
}

/// 日誌寫到 stderr，stdout 保留給主控台報表
pub fn init_cli_logger(verbose: bool, monitor: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, monitor)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
