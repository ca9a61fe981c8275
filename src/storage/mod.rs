//! 本地存储模块
//!
//! 提供设备本地的键值持久化，支持：
//! - 收藏单词 ID 列表
//! - 已学会单词 ID 列表
//! - 用户自定义 / 导入的单词

// ============================================================
// 子模块声明
// ============================================================

pub mod memory;
pub mod migrations;
pub mod models;
pub mod progress;
pub mod sqlite;

// ============================================================
// 重新导出主要类型
// ============================================================

pub use memory::MemoryStore;
pub use migrations::run_migrations;
pub use models::*;
pub use progress::ProgressStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

// ============================================================
// 存储键
// ============================================================

/// 收藏单词 ID 列表
pub const FAVORITES_KEY: &str = "favorites";
/// 已学会单词 ID 列表
pub const LEARNED_KEY: &str = "learned_words";
/// 自定义单词列表
pub const CUSTOM_WORDS_KEY: &str = "custom_words";

// ============================================================
// 错误类型定义
// ============================================================

/// 存储模块错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to acquire lock: {0}")]
    LockError(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================
// KeyValueStore - 持久化后端抽象
// ============================================================

/// 键值持久化后端
///
/// 每次 `set` 必须是原子的：要么新值完整可见，要么旧值保持不变。
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的序列化值，不存在时返回 `None`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// 写入（插入或覆盖）键值
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// 删除键，返回是否删除了记录
    fn remove(&self, key: &str) -> StorageResult<bool>;
}
