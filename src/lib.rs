//! Woordjes：荷兰语单词卡片，进度保存在本地
//!
//! - `storage`：收藏、已学会、自定义单词的持久化
//! - `session`：滑动复习状态机
//! - `catalog`：内置分类与首页统计
//! - `favorites`：收藏列表多选
//! - `words`：添加单词表单校验
//! - `import`：CSV 导入

pub mod catalog;
pub mod config;
pub mod favorites;
pub mod import;
pub mod logging;
pub mod session;
pub mod storage;
pub mod words;

pub use catalog::{Catalog, ProgressSummary};
pub use session::{DecisionHandler, SessionError, SessionWord, SwipeOutcome, SwipeSession};
pub use storage::{
    Category, CustomWord, KeyValueStore, MemoryStore, ProgressState, ProgressStore, SqliteStore,
    StorageError, StorageResult, Word,
};
