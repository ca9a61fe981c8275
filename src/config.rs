//! 运行配置
//!
//! 启动时从环境变量读取（`main` 会先加载 `.env`）。无效值一律回退到默认值。

use std::path::PathBuf;

/// 默认视口宽度（逻辑像素），滑动阈值取其四分之一
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 390.0;
/// 默认日志过滤：本 crate 输出 info，依赖库只输出 warn
pub const DEFAULT_LOG_FILTER: &str = "warn,woordjes=info";
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite 数据库文件（`WOORDJES_DB`）
    pub db_path: PathBuf,
    /// 卡片区域宽度（`VIEWPORT_WIDTH`）
    pub viewport_width: f32,
    /// `EnvFilter` 指令（`RUST_LOG`）
    pub log_filter: String,
    /// 滚动日志目录，未开启 `ENABLE_FILE_LOGS` 时为 `None`
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意键值查找函数构建配置，便于测试时不修改进程环境
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = non_blank("WOORDJES_DB")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let viewport_width = non_blank("VIEWPORT_WIDTH")
            .and_then(|value| value.trim().parse::<f32>().ok())
            .filter(|width| width.is_finite() && *width > 0.0)
            .unwrap_or(DEFAULT_VIEWPORT_WIDTH);

        let log_filter = non_blank("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let file_logs = non_blank("ENABLE_FILE_LOGS")
            .map(|v| matches!(v.trim(), "true" | "1"))
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            non_blank("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
        });

        Self {
            db_path,
            viewport_width,
            log_filter,
            log_dir,
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("woordjes").join("woordjes.db"))
        .unwrap_or_else(|| PathBuf::from("woordjes.db"))
}
