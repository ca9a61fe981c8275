//! 数据模型定义
//!
//! 序列化格式与设备上已有数据保持一致（camelCase 字段名）。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 导入单词所属的合成分类
pub const IMPORTED_CATEGORY_ID: &str = "imported";

// ============================================================
// Word - 词典条目
// ============================================================

/// 词典条目，构建时从静态词库生成，不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// 唯一标识
    pub id: String,
    /// 荷兰语
    pub dutch: String,
    /// 英语释义
    pub english: String,
    /// 荷兰语例句
    #[serde(default)]
    pub example_dutch: String,
    /// 例句翻译
    #[serde(default)]
    pub example_english: String,
}

impl Word {
    pub fn new(
        id: impl Into<String>,
        dutch: impl Into<String>,
        english: impl Into<String>,
        example_dutch: impl Into<String>,
        example_english: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            dutch: dutch.into(),
            english: english.into(),
            example_dutch: example_dutch.into(),
            example_english: example_english.into(),
        }
    }
}

// ============================================================
// CustomWord - 用户添加 / 导入的单词
// ============================================================

/// 用户添加或 CSV 导入的单词
///
/// 创建后不再修改，只能按 ID 整体删除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWord {
    #[serde(flatten)]
    pub word: Word,
    /// 所属分类 ID，导入的单词为 `imported`
    pub category_id: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl CustomWord {
    pub fn new(word: Word, category_id: impl Into<String>) -> Self {
        Self {
            word,
            category_id: category_id.into(),
            is_custom: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.word.id
    }
}

// ============================================================
// Category - 静态分类
// ============================================================

/// 单词分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub title_dutch: String,
    pub description: String,
    /// 图标名称，由界面层解析
    pub icon_name: String,
    pub words: Vec<Word>,
}

// ============================================================
// ProgressState - 持久化的用户进度
// ============================================================

/// 用户进度聚合，由 `ProgressStore` 独占管理
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    /// 收藏的单词 ID（保持插入顺序，无重复）
    pub favorites: Vec<String>,
    /// 已学会 / 跳过的单词 ID（无重复）
    pub learned_ids: Vec<String>,
    /// 自定义单词（按 ID 唯一）
    pub custom_words: Vec<CustomWord>,
}

impl ProgressState {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    pub fn is_learned(&self, id: &str) -> bool {
        self.learned_ids.iter().any(|l| l == id)
    }

    pub fn custom_word(&self, id: &str) -> Option<&CustomWord> {
        self.custom_words.iter().find(|w| w.id() == id)
    }

    /// 指定分类下的自定义单词，保持存储顺序
    pub fn custom_words_in<'a>(
        &'a self,
        category_id: &'a str,
    ) -> impl Iterator<Item = &'a CustomWord> + 'a {
        self.custom_words
            .iter()
            .filter(move |w| w.category_id == category_id)
    }
}

/// 去除重复 ID，保留首次出现的顺序
pub(crate) fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// 去除 ID 重复的自定义单词，保留首次出现的条目
pub(crate) fn dedup_custom_words(words: Vec<CustomWord>) -> Vec<CustomWord> {
    let mut seen = HashSet::with_capacity(words.len());
    words
        .into_iter()
        .filter(|w| seen.insert(w.word.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_word_json_layout() {
        let word = CustomWord::new(
            Word::new("c1", "de kat", "the cat", "De kat slaapt.", "The cat sleeps."),
            IMPORTED_CATEGORY_ID,
        );

        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["exampleDutch"], "De kat slaapt.");
        assert_eq!(json["categoryId"], "imported");
        assert_eq!(json["isCustom"], true);
    }

    #[test]
    fn test_custom_word_without_optional_fields() {
        let json = r#"{"id":"c2","dutch":"de hond","english":"the dog","categoryId":"animals"}"#;
        let word: CustomWord = serde_json::from_str(json).unwrap();
        assert_eq!(word.id(), "c2");
        assert_eq!(word.word.example_dutch, "");
        assert!(!word.is_custom);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let ids = vec!["b".into(), "a".into(), "b".into(), "c".into(), "a".into()];
        assert_eq!(dedup_ids(ids), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_custom_words_in_category() {
        let state = ProgressState {
            custom_words: vec![
                CustomWord::new(Word::new("1", "a", "a", "", ""), "food"),
                CustomWord::new(Word::new("2", "b", "b", "", ""), IMPORTED_CATEGORY_ID),
                CustomWord::new(Word::new("3", "c", "c", "", ""), "food"),
            ],
            ..Default::default()
        };

        let ids: Vec<&str> = state.custom_words_in("food").map(|w| w.id()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(state.custom_word("2").is_some());
        assert!(state.custom_word("4").is_none());
    }
}
