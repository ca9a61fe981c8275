//! 收藏列表
//!
//! 长按进入多选模式，选中后批量取消收藏。

use crate::catalog::Catalog;
use crate::storage::{ProgressState, ProgressStore, StorageResult, Word};

/// 收藏列表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteItem {
    pub word: Word,
    pub selected: bool,
}

/// 收藏页的选择状态
///
/// 长按进入多选模式并切换该行；多选模式下普通点击切换选中。
#[derive(Debug, Clone, Default)]
pub struct FavoritesView {
    selected: Vec<String>,
    selection_mode: bool,
}

impl FavoritesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selection_mode(&self) -> bool {
        self.selection_mode
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn long_press(&mut self, id: &str) {
        self.selection_mode = true;
        self.toggle(id);
    }

    /// 进入多选模式并选中该行，已选中时保持不变
    pub fn select(&mut self, id: &str) {
        self.selection_mode = true;
        if !self.is_selected(id) {
            self.selected.push(id.to_string());
        }
    }

    /// 返回点击是否被多选模式消费
    pub fn press(&mut self, id: &str) -> bool {
        if !self.selection_mode {
            return false;
        }
        self.toggle(id);
        true
    }

    pub fn exit_selection(&mut self) {
        self.selection_mode = false;
        self.selected.clear();
    }

    /// 取消收藏所有选中的单词并退出多选模式；失败时保留选择，便于重试
    pub fn delete_selected(&mut self, store: &ProgressStore) -> StorageResult<usize> {
        if self.selected.is_empty() {
            return Ok(0);
        }
        let removed = store.remove_favorites(self.selected.as_slice())?;
        self.exit_selection();
        Ok(removed)
    }

    pub fn clear_all(&mut self, store: &ProgressStore) -> StorageResult<()> {
        store.clear_favorites()?;
        self.exit_selection();
        Ok(())
    }

    pub fn items(&self, catalog: &Catalog, state: &ProgressState) -> Vec<FavoriteItem> {
        catalog
            .favorite_words(state)
            .into_iter()
            .map(|word| FavoriteItem {
                selected: self.is_selected(&word.id),
                word,
            })
            .collect()
    }

    fn toggle(&mut self, id: &str) {
        match self.selected.iter().position(|s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(id.to_string()),
        }
    }
}
