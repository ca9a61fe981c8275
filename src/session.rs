//! 滑动复习会话
//!
//! 会话按顺序逐张展示一副固定的卡片。动画完全由界面层负责：
//! 界面层上报拖动位置，手指抬起时调用 [`SwipeSession::release`]。
//! 超过阈值的释放会提交决定：
//!
//! - 向右：切换收藏，进入下一张
//! - 向左：标记为已学会，进入下一张
//!
//! 只有向左会标记已学会，所以收藏不会让单词从以后的会话中消失。

use std::sync::Arc;

use thiserror::Error;

use crate::storage::{CustomWord, ProgressStore, StorageResult, Word};

/// 提交决定所需的拖动距离占视口宽度的比例
pub const SWIPE_THRESHOLD_RATIO: f32 = 0.25;

// ============================================================
// DecisionHandler - 决定的副作用
// ============================================================

/// 已提交决定的副作用
pub trait DecisionHandler {
    /// 向右滑动
    fn on_favorite(&self, id: &str) -> StorageResult<()>;
    /// 向左滑动，或删除后的跳过
    fn on_learned(&self, id: &str) -> StorageResult<()>;
    fn on_delete(&self, id: &str) -> StorageResult<()>;
}

impl DecisionHandler for ProgressStore {
    fn on_favorite(&self, id: &str) -> StorageResult<()> {
        self.toggle_favorite(id).map(|_| ())
    }

    fn on_learned(&self, id: &str) -> StorageResult<()> {
        self.mark_as_learned(id).map(|_| ())
    }

    fn on_delete(&self, id: &str) -> StorageResult<()> {
        self.delete_custom_word(id).map(|_| ())
    }
}

impl<T: DecisionHandler + ?Sized> DecisionHandler for Arc<T> {
    fn on_favorite(&self, id: &str) -> StorageResult<()> {
        (**self).on_favorite(id)
    }

    fn on_learned(&self, id: &str) -> StorageResult<()> {
        (**self).on_learned(id)
    }

    fn on_delete(&self, id: &str) -> StorageResult<()> {
        (**self).on_delete(id)
    }
}

// ============================================================
// 卡片与结果
// ============================================================

/// 一张卡片：词库单词或用户自定义单词
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWord {
    Catalog(Word),
    Custom(CustomWord),
}

impl SessionWord {
    pub fn id(&self) -> &str {
        &self.word().id
    }

    pub fn word(&self) -> &Word {
        match self {
            SessionWord::Catalog(word) => word,
            SessionWord::Custom(custom) => &custom.word,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, SessionWord::Custom(_))
    }
}

impl From<Word> for SessionWord {
    fn from(word: Word) -> Self {
        SessionWord::Catalog(word)
    }
}

impl From<CustomWord> for SessionWord {
    fn from(word: CustomWord) -> Self {
        SessionWord::Custom(word)
    }
}

/// 手势开始以来的累计位移
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragOffset {
    pub x: f32,
    pub y: f32,
}

/// 释放或删除的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// 未达阈值，卡片弹回，仍是当前卡片
    SnapBack,
    Favorited { word_id: String },
    Skipped { word_id: String },
    Deleted { word_id: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is completed")]
    Completed,

    #[error("word {0} is not a custom word")]
    NotCustom(String),

    #[error("viewport width must be a positive finite number, got {0}")]
    InvalidViewportWidth(String),
}

// ============================================================
// SwipeSession - 状态机
// ============================================================

/// 逐张复习一份单词快照
///
/// 卡组在构建时固定；会话中已处理的单词留在原位，游标不会错位。
/// 会话进行中在别处标记为已学会的单词仍会出现。
pub struct SwipeSession<H: DecisionHandler> {
    words: Vec<SessionWord>,
    cursor: usize,
    drag_offset: DragOffset,
    threshold: f32,
    handler: H,
}

impl<H: DecisionHandler> SwipeSession<H> {
    /// `viewport_width` 为卡片区域的逻辑宽度，阈值取其四分之一。
    /// 宽度必须是有限正数，否则阈值没有意义（为 0 时原地释放也会收藏）。
    pub fn new(
        words: Vec<SessionWord>,
        viewport_width: f32,
        handler: H,
    ) -> Result<Self, SessionError> {
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return Err(SessionError::InvalidViewportWidth(viewport_width.to_string()));
        }

        tracing::debug!(cards = words.len(), viewport_width, "swipe session started");
        Ok(Self {
            words,
            cursor: 0,
            drag_offset: DragOffset::default(),
            threshold: viewport_width * SWIPE_THRESHOLD_RATIO,
            handler,
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.words.len().saturating_sub(self.cursor)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn drag_offset(&self) -> DragOffset {
        self.drag_offset
    }

    pub fn is_completed(&self) -> bool {
        self.cursor >= self.words.len()
    }

    /// 当前卡片
    pub fn current(&self) -> Option<&SessionWord> {
        self.words.get(self.cursor)
    }

    /// 当前卡片下面的那张
    pub fn upcoming(&self) -> Option<&SessionWord> {
        self.words.get(self.cursor + 1)
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// 记录拖动中的累计位移，只影响展示；会话结束后忽略
    pub fn drag_update(&mut self, dx: f32, dy: f32) {
        if self.is_completed() {
            return;
        }
        self.drag_offset = DragOffset { x: dx, y: dy };
    }

    /// 在已记录的位移处释放
    pub fn release(&mut self) -> Result<SwipeOutcome, SessionError> {
        let DragOffset { x, y } = self.drag_offset;
        self.release_with_offset(x, y)
    }

    /// 在指定位移处释放，只看水平方向，阈值包含边界
    pub fn release_with_offset(&mut self, x: f32, y: f32) -> Result<SwipeOutcome, SessionError> {
        let word_id = self
            .current()
            .map(|w| w.id().to_string())
            .ok_or(SessionError::Completed)?;

        self.drag_offset = DragOffset { x, y };

        if x >= self.threshold {
            if let Err(e) = self.handler.on_favorite(&word_id) {
                tracing::warn!(word_id = %word_id, error = %e, "favorite not saved");
            }
            self.advance();
            Ok(SwipeOutcome::Favorited { word_id })
        } else if x <= -self.threshold {
            self.skip(&word_id);
            Ok(SwipeOutcome::Skipped { word_id })
        } else {
            self.drag_offset = DragOffset::default();
            Ok(SwipeOutcome::SnapBack)
        }
    }

    /// 删除当前自定义单词，然后按跳过处理
    pub fn delete_current(&mut self) -> Result<SwipeOutcome, SessionError> {
        let word = self.current().ok_or(SessionError::Completed)?;
        if !word.is_custom() {
            return Err(SessionError::NotCustom(word.id().to_string()));
        }
        let word_id = word.id().to_string();

        if let Err(e) = self.handler.on_delete(&word_id) {
            tracing::warn!(word_id = %word_id, error = %e, "custom word not deleted");
        }
        self.skip(&word_id);
        Ok(SwipeOutcome::Deleted { word_id })
    }

    fn skip(&mut self, word_id: &str) {
        if let Err(e) = self.handler.on_learned(word_id) {
            tracing::warn!(word_id = %word_id, error = %e, "learned state not saved");
        }
        self.advance();
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.drag_offset = DragOffset::default();
        if self.is_completed() {
            tracing::debug!(cards = self.words.len(), "swipe session completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, IMPORTED_CATEGORY_ID};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl DecisionHandler for Recorder {
        fn on_favorite(&self, id: &str) -> StorageResult<()> {
            self.calls.borrow_mut().push(format!("fav:{id}"));
            Ok(())
        }

        fn on_learned(&self, id: &str) -> StorageResult<()> {
            self.calls.borrow_mut().push(format!("learned:{id}"));
            Ok(())
        }

        fn on_delete(&self, id: &str) -> StorageResult<()> {
            self.calls.borrow_mut().push(format!("delete:{id}"));
            Ok(())
        }
    }

    fn deck(ids: &[&str]) -> Vec<SessionWord> {
        ids.iter()
            .map(|id| Word::new(*id, "woord", "word", "", "").into())
            .collect()
    }

    fn session(ids: &[&str]) -> SwipeSession<Recorder> {
        SwipeSession::new(deck(ids), 400.0, Recorder::default()).unwrap()
    }

    fn store() -> Arc<ProgressStore> {
        Arc::new(ProgressStore::load(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_empty_deck_starts_completed() {
        let mut session = session(&[]);
        assert!(session.is_completed());
        assert!(session.current().is_none());
        assert_eq!(session.release_with_offset(500.0, 0.0), Err(SessionError::Completed));
    }

    #[test]
    fn test_invalid_viewport_width_is_rejected() {
        for width in [0.0, -0.0, -400.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = SwipeSession::new(deck(&["a"]), width, Recorder::default());
            assert!(
                matches!(result, Err(SessionError::InvalidViewportWidth(_))),
                "width {width} accepted"
            );
        }
    }

    #[test]
    fn test_release_without_movement_snaps_back() {
        let store = store();
        let mut session = SwipeSession::new(deck(&["a"]), 1.0, store.clone()).unwrap();

        assert_eq!(session.release_with_offset(0.0, 0.0), Ok(SwipeOutcome::SnapBack));
        assert!(store.favorites().is_empty());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_below_threshold_snaps_back() {
        let mut session = session(&["a"]);
        assert_eq!(session.threshold(), 100.0);

        session.drag_update(99.0, 12.0);
        assert_eq!(session.drag_offset(), DragOffset { x: 99.0, y: 12.0 });
        assert_eq!(session.release(), Ok(SwipeOutcome::SnapBack));
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.drag_offset(), DragOffset::default());
        assert!(session.handler().calls.borrow().is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut session = session(&["a", "b"]);

        assert_eq!(
            session.release_with_offset(100.0, 0.0),
            Ok(SwipeOutcome::Favorited { word_id: "a".into() })
        );
        assert_eq!(
            session.release_with_offset(-100.0, 0.0),
            Ok(SwipeOutcome::Skipped { word_id: "b".into() })
        );
        assert_eq!(*session.handler().calls.borrow(), vec!["fav:a", "learned:b"]);
    }

    #[test]
    fn test_scenario_right_left_left() {
        let store = store();
        let mut session = SwipeSession::new(deck(&["A", "B", "C"]), 360.0, store.clone()).unwrap();

        session.release_with_offset(200.0, 0.0).unwrap();
        assert_eq!(session.upcoming().map(|w| w.id()), Some("C"));
        session.release_with_offset(-200.0, 5.0).unwrap();
        session.release_with_offset(-200.0, -5.0).unwrap();

        assert_eq!(store.favorites(), vec!["A"]);
        assert_eq!(store.learned_ids(), vec!["B", "C"]);
        assert_eq!(session.cursor(), 3);
        assert!(session.is_completed());
        assert_eq!(session.release_with_offset(-200.0, 0.0), Err(SessionError::Completed));
    }

    #[test]
    fn test_deck_ignores_learned_changes_during_session() {
        let store = store();
        let mut session = SwipeSession::new(deck(&["a", "b", "c"]), 400.0, store.clone()).unwrap();

        session.release_with_offset(150.0, 0.0).unwrap();
        // 会话外把后面的单词标记为已学会
        store.mark_as_learned("c").unwrap();

        assert_eq!(session.len(), 3);
        session.release_with_offset(150.0, 0.0).unwrap();
        assert_eq!(session.current().map(|w| w.id()), Some("c"));

        assert_eq!(
            session.release_with_offset(150.0, 0.0),
            Ok(SwipeOutcome::Favorited { word_id: "c".into() })
        );
        assert!(session.is_completed());
        assert_eq!(store.favorites(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_drag_ignored_after_completion() {
        let mut session = session(&["a"]);
        session.release_with_offset(-150.0, 0.0).unwrap();

        session.drag_update(50.0, 50.0);
        assert_eq!(session.drag_offset(), DragOffset::default());
    }

    #[test]
    fn test_delete_requires_custom_word() {
        let mut session = session(&["a"]);
        assert_eq!(
            session.delete_current(),
            Err(SessionError::NotCustom("a".into()))
        );
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_delete_custom_word_mid_session() {
        let store = store();
        let custom = CustomWord::new(
            Word::new("c1", "de kat", "the cat", "", ""),
            IMPORTED_CATEGORY_ID,
        );
        store.add_custom_word(custom.clone()).unwrap();

        let words = vec![
            Word::new("a", "hallo", "hello", "", "").into(),
            custom.into(),
            Word::new("b", "dag", "bye", "", "").into(),
        ];
        let mut session = SwipeSession::new(words, 400.0, store.clone()).unwrap();

        session.release_with_offset(300.0, 0.0).unwrap();
        assert_eq!(
            session.delete_current(),
            Ok(SwipeOutcome::Deleted { word_id: "c1".into() })
        );

        assert!(store.custom_words().is_empty());
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.current().map(|w| w.id()), Some("b"));
        assert!(store.is_learned("c1"));

        session.release_with_offset(-300.0, 0.0).unwrap();
        assert!(session.is_completed());
    }

    #[test]
    fn test_storage_failure_still_advances() {
        let backend = Arc::new(MemoryStore::new());
        let store = Arc::new(ProgressStore::load(backend.clone()));
        backend.set_fail_writes(true);

        let mut session = SwipeSession::new(deck(&["a", "b"]), 400.0, store.clone()).unwrap();
        session.release_with_offset(-150.0, 0.0).unwrap();

        assert_eq!(session.cursor(), 1);
        assert!(!store.is_learned("a"));
    }
}
