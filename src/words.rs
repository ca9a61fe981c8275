//! 添加单词表单

use thiserror::Error;

use crate::storage::{CustomWord, Word};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("the Dutch word is required")]
    MissingDutch,

    #[error("the English translation is required")]
    MissingEnglish,

    #[error("a category is required")]
    MissingCategory,
}

/// 为用户创建的单词生成唯一 ID
pub fn new_word_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 校验前的表单字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDraft {
    pub dutch: String,
    pub english: String,
    pub example_dutch: String,
    pub example_english: String,
    pub category_id: String,
}

impl WordDraft {
    pub fn new(
        dutch: impl Into<String>,
        english: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            dutch: dutch.into(),
            english: english.into(),
            category_id: category_id.into(),
            ..Default::default()
        }
    }

    pub fn with_examples(
        mut self,
        example_dutch: impl Into<String>,
        example_english: impl Into<String>,
    ) -> Self {
        self.example_dutch = example_dutch.into();
        self.example_english = example_english.into();
        self
    }

    /// 保存按钮是否可用
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.dutch.trim().is_empty() {
            return Err(DraftError::MissingDutch);
        }
        if self.english.trim().is_empty() {
            return Err(DraftError::MissingEnglish);
        }
        if self.category_id.trim().is_empty() {
            return Err(DraftError::MissingCategory);
        }
        Ok(())
    }

    /// 校验后转换为带新 ID 的自定义单词，各字段去除首尾空白
    pub fn into_custom_word(self) -> Result<CustomWord, DraftError> {
        self.validate()?;

        let word = Word::new(
            new_word_id(),
            self.dutch.trim(),
            self.english.trim(),
            self.example_dutch.trim(),
            self.example_english.trim(),
        );
        Ok(CustomWord::new(word, self.category_id.trim()))
    }
}
