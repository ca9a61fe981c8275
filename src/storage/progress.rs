//! 用户进度存储
//!
//! 收藏、已学会、自定义单词三类数据的唯一来源。
//! 每次修改先写入持久化后端，写入成功后才更新内存状态并通知订阅者，
//! 因此写入失败时内存中仍是修改前的状态。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::storage::models::{dedup_custom_words, dedup_ids, CustomWord, ProgressState};
use crate::storage::{
    KeyValueStore, StorageError, StorageResult, CUSTOM_WORDS_KEY, FAVORITES_KEY, LEARNED_KEY,
};

/// 用户进度存储
///
/// 可注入任意 [`KeyValueStore`] 后端。读操作直接返回当前状态，
/// 界面层可通过 [`ProgressStore::subscribe`] 订阅状态变化。
pub struct ProgressStore {
    backend: Arc<dyn KeyValueStore>,
    state: watch::Sender<ProgressState>,
    writer: Mutex<()>,
}

impl ProgressStore {
    /// 从持久化后端加载进度
    ///
    /// 三类数据分别加载。某一项缺失或无法解析时记录日志并初始化为空，
    /// 不会阻止应用启动。
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let favorites = load_slice::<Vec<String>>(backend.as_ref(), FAVORITES_KEY)
            .map(dedup_ids)
            .unwrap_or_default();
        let learned_ids = load_slice::<Vec<String>>(backend.as_ref(), LEARNED_KEY)
            .map(dedup_ids)
            .unwrap_or_default();
        let custom_words = load_slice::<Vec<CustomWord>>(backend.as_ref(), CUSTOM_WORDS_KEY)
            .map(dedup_custom_words)
            .unwrap_or_default();

        tracing::info!(
            favorites = favorites.len(),
            learned = learned_ids.len(),
            custom_words = custom_words.len(),
            "progress loaded"
        );

        let (state, _) = watch::channel(ProgressState {
            favorites,
            learned_ids,
            custom_words,
        });

        Self {
            backend,
            state,
            writer: Mutex::new(()),
        }
    }

    // ========== 读取 ==========

    /// 订阅状态变化，接收端总能看到最新提交的状态
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.state.subscribe()
    }

    /// 当前状态的快照
    pub fn snapshot(&self) -> ProgressState {
        self.state.borrow().clone()
    }

    pub fn favorites(&self) -> Vec<String> {
        self.state.borrow().favorites.clone()
    }

    pub fn learned_ids(&self) -> Vec<String> {
        self.state.borrow().learned_ids.clone()
    }

    pub fn custom_words(&self) -> Vec<CustomWord> {
        self.state.borrow().custom_words.clone()
    }

    /// 指定分类下的自定义单词
    pub fn custom_words_in(&self, category_id: &str) -> Vec<CustomWord> {
        self.state
            .borrow()
            .custom_words_in(category_id)
            .cloned()
            .collect()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.borrow().is_favorite(id)
    }

    pub fn is_learned(&self, id: &str) -> bool {
        self.state.borrow().is_learned(id)
    }

    // ========== 收藏 ==========

    /// 切换收藏状态，返回切换后是否为收藏
    pub fn toggle_favorite(&self, id: &str) -> StorageResult<bool> {
        let _writer = self.lock_writer()?;

        let mut favorites = self.state.borrow().favorites.clone();
        let favorited = match favorites.iter().position(|f| f == id) {
            Some(pos) => {
                favorites.remove(pos);
                false
            }
            None => {
                favorites.push(id.to_string());
                true
            }
        };

        self.persist(FAVORITES_KEY, &favorites)?;
        self.state.send_modify(move |s| s.favorites = favorites);

        tracing::debug!(word_id = %id, favorited, "favorite toggled");
        Ok(favorited)
    }

    /// 清空收藏
    pub fn clear_favorites(&self) -> StorageResult<()> {
        let _writer = self.lock_writer()?;

        self.persist(FAVORITES_KEY, &Vec::<String>::new())?;
        self.state.send_modify(|s| s.favorites.clear());
        Ok(())
    }

    /// 批量移除收藏，不在收藏中的 ID 忽略，返回实际移除的数量
    pub fn remove_favorites<S: AsRef<str>>(&self, ids: &[S]) -> StorageResult<usize> {
        let _writer = self.lock_writer()?;

        let current = self.state.borrow().favorites.clone();
        let before = current.len();
        let favorites: Vec<String> = current
            .into_iter()
            .filter(|f| !ids.iter().any(|id| id.as_ref() == f))
            .collect();
        let removed = before - favorites.len();

        if removed == 0 {
            return Ok(0);
        }

        self.persist(FAVORITES_KEY, &favorites)?;
        self.state.send_modify(move |s| s.favorites = favorites);
        Ok(removed)
    }

    // ========== 学习进度 ==========

    /// 标记为已学会，已存在时不做任何修改；返回是否新增
    pub fn mark_as_learned(&self, id: &str) -> StorageResult<bool> {
        let _writer = self.lock_writer()?;

        if self.state.borrow().is_learned(id) {
            return Ok(false);
        }

        let mut learned = self.state.borrow().learned_ids.clone();
        learned.push(id.to_string());

        self.persist(LEARNED_KEY, &learned)?;
        self.state.send_modify(move |s| s.learned_ids = learned);

        tracing::debug!(word_id = %id, "word marked as learned");
        Ok(true)
    }

    /// 重置学习进度，只清空已学会列表
    pub fn reset_progress(&self) -> StorageResult<()> {
        let _writer = self.lock_writer()?;

        self.persist(LEARNED_KEY, &Vec::<String>::new())?;
        self.state.send_modify(|s| s.learned_ids.clear());

        tracing::info!("learning progress reset");
        Ok(())
    }

    // ========== 自定义单词 ==========

    /// 追加一个自定义单词，ID 唯一性由调用方保证
    pub fn add_custom_word(&self, word: CustomWord) -> StorageResult<()> {
        self.import_words(vec![word]).map(|_| ())
    }

    /// 批量追加自定义单词
    ///
    /// 一次写入全部单词；写入失败时内存状态保持不变，错误返回给调用方。
    pub fn import_words(&self, words: Vec<CustomWord>) -> StorageResult<usize> {
        if words.is_empty() {
            return Ok(0);
        }

        let _writer = self.lock_writer()?;

        let count = words.len();
        let mut custom_words = self.state.borrow().custom_words.clone();
        custom_words.extend(words);

        self.persist(CUSTOM_WORDS_KEY, &custom_words)?;
        self.state.send_modify(move |s| s.custom_words = custom_words);

        tracing::info!(count, "custom words stored");
        Ok(count)
    }

    /// 删除自定义单词，不存在时返回 `false`
    pub fn delete_custom_word(&self, id: &str) -> StorageResult<bool> {
        let _writer = self.lock_writer()?;

        let current = self.state.borrow().custom_words.clone();
        let before = current.len();
        let custom_words: Vec<CustomWord> =
            current.into_iter().filter(|w| w.id() != id).collect();

        if custom_words.len() == before {
            return Ok(false);
        }

        self.persist(CUSTOM_WORDS_KEY, &custom_words)?;
        self.state.send_modify(move |s| s.custom_words = custom_words);

        tracing::debug!(word_id = %id, "custom word deleted");
        Ok(true)
    }

    // ========== 内部方法 ==========

    fn lock_writer(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(key, &json));

        if let Err(ref e) = result {
            tracing::warn!(key, error = %e, "failed to persist progress");
        }
        result
    }
}

/// 加载单项数据，缺失或损坏时返回 `None`
fn load_slice<T: DeserializeOwned>(backend: &dyn KeyValueStore, key: &str) -> Option<T> {
    match backend.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored progress is unreadable, starting empty");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load progress, starting empty");
            None
        }
    }
}
