//! 日志初始化
//!
//! 终端日志写到 stderr，保证命令输出（stdout）干净；
//! 配置了日志目录时另外写一份按天滚动的文件。

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DEFAULT_LOG_FILTER};

const LOG_FILE_PREFIX: &str = "woordjes.log";

/// 文件日志的后台写线程句柄，drop 时刷新剩余日志
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// 安装全局 subscriber，进程内只能调用一次
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let (file_writer, guard) = match config.log_dir.as_deref().map(daily_file_writer) {
        Some(Ok((writer, guard))) => (Some(writer), Some(guard)),
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(log_filter(&config.log_filter))
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(file_layer)
        .init();

    guard.map(|guard| FileLogGuard { _guard: guard })
}

/// 解析过滤指令，无法解析时回退到 [`DEFAULT_LOG_FILTER`]
pub fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directives:?} ({err}), using {DEFAULT_LOG_FILTER}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

fn daily_file_writer(dir: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_filter_parses_directives() {
        let filter = log_filter("woordjes=trace");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_invalid_log_filter_falls_back() {
        let filter = log_filter("woordjes=loud");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_daily_file_writer_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        let (_writer, _guard) = daily_file_writer(&log_dir).unwrap();
        assert!(log_dir.is_dir());
    }
}
