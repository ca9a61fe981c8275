//! 静态词库
//!
//! 内置分类、合成的 `imported` 分类，以及基于进度状态的只读视图。

use std::collections::HashSet;

use serde::Serialize;

use crate::session::SessionWord;
use crate::storage::{Category, ProgressState, Word, IMPORTED_CATEGORY_ID};

// ============================================================
// ProgressSummary - 首页统计
// ============================================================

/// 首页显示的统计数字
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_words: usize,
    pub learned: usize,
    pub favorites: usize,
    pub todo: usize,
}

// ============================================================
// Catalog
// ============================================================

/// 随应用发布的固定分类
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_categories())
    }

    pub fn static_categories(&self) -> &[Category] {
        &self.categories
    }

    /// 添加单词表单中预选的分类
    pub fn default_category_id(&self) -> Option<&str> {
        self.categories.first().map(|c| c.id.as_str())
    }

    pub fn contains_category(&self, id: &str) -> bool {
        id == IMPORTED_CATEGORY_ID || self.categories.iter().any(|c| c.id == id)
    }

    /// 静态分类（追加各自的自定义单词），`imported` 分类有单词时排在最后
    pub fn categories(&self, state: &ProgressState) -> Vec<Category> {
        let mut merged: Vec<Category> = self
            .categories
            .iter()
            .map(|c| with_custom_words(c.clone(), state))
            .collect();

        let imported = with_custom_words(imported_category(), state);
        if !imported.words.is_empty() {
            merged.push(imported);
        }
        merged
    }

    /// 按 ID 查找分类，`None` 表示未知 ID，调用方应显示"未找到"
    pub fn category(&self, id: &str, state: &ProgressState) -> Option<Category> {
        if id == IMPORTED_CATEGORY_ID {
            return Some(with_custom_words(imported_category(), state));
        }
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| with_custom_words(c.clone(), state))
    }

    /// 分类中待复习单词的快照：先词库单词，再自定义单词，跳过已学会的
    ///
    /// 只在打开分类时取一次，之后的进度变化不影响进行中的会话。
    pub fn session_words(&self, id: &str, state: &ProgressState) -> Option<Vec<SessionWord>> {
        let static_words: &[Word] = if id == IMPORTED_CATEGORY_ID {
            &[]
        } else {
            &self.categories.iter().find(|c| c.id == id)?.words
        };

        let words = static_words
            .iter()
            .cloned()
            .map(SessionWord::from)
            .chain(state.custom_words_in(id).cloned().map(SessionWord::from))
            .filter(|w| !state.is_learned(w.id()))
            .collect();
        Some(words)
    }

    /// 已收藏的单词，先词库单词，再自定义单词
    pub fn favorite_words(&self, state: &ProgressState) -> Vec<Word> {
        let mut seen = HashSet::new();
        self.all_words(state)
            .filter(|w| state.is_favorite(&w.id))
            .filter(|w| seen.insert(w.id.clone()))
            .cloned()
            .collect()
    }

    pub fn summary(&self, state: &ProgressState) -> ProgressSummary {
        let ids: HashSet<&str> = self.all_words(state).map(|w| w.id.as_str()).collect();
        let learned = ids.iter().filter(|id| state.is_learned(id)).count();
        let total_words = ids.len();

        ProgressSummary {
            total_words,
            learned,
            favorites: state.favorites.len(),
            todo: total_words.saturating_sub(learned),
        }
    }

    fn all_words<'a>(&'a self, state: &'a ProgressState) -> impl Iterator<Item = &'a Word> + 'a {
        self.categories
            .iter()
            .flat_map(|c| c.words.iter())
            .chain(state.custom_words.iter().map(|w| &w.word))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn with_custom_words(mut category: Category, state: &ProgressState) -> Category {
    category
        .words
        .extend(state.custom_words_in(&category.id).map(|w| w.word.clone()));
    category
}

fn imported_category() -> Category {
    Category {
        id: IMPORTED_CATEGORY_ID.to_string(),
        title: "Imported".to_string(),
        title_dutch: "Geïmporteerd".to_string(),
        description: "Words imported from CSV files".to_string(),
        icon_name: "Upload".to_string(),
        words: Vec::new(),
    }
}

fn category(
    id: &str,
    title: &str,
    title_dutch: &str,
    description: &str,
    icon_name: &str,
    words: &[(&str, &str, &str, &str)],
) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
        title_dutch: title_dutch.to_string(),
        description: description.to_string(),
        icon_name: icon_name.to_string(),
        words: words
            .iter()
            .enumerate()
            .map(|(i, (nl, en, ex_nl, ex_en))| {
                Word::new(format!("{id}-{}", i + 1), *nl, *en, *ex_nl, *ex_en)
            })
            .collect(),
    }
}

// ============================================================
// 内置词库
// ============================================================

fn builtin_categories() -> Vec<Category> {
    vec![
        category(
            "greetings",
            "Greetings",
            "Begroetingen",
            "Saying hello and goodbye",
            "Hand",
            &[
                ("hallo", "hello", "Hallo, hoe gaat het?", "Hello, how are you?"),
                ("goedemorgen", "good morning", "Goedemorgen, buurman!", "Morning, neighbour!"),
                ("tot ziens", "goodbye", "Tot ziens, tot morgen.", "Bye, see you tomorrow."),
                ("dank je wel", "thank you", "Dank je wel voor het eten.", "Thanks for the food."),
                ("alsjeblieft", "please", "Een koffie, alsjeblieft.", "A coffee, please."),
            ],
        ),
        category(
            "numbers",
            "Numbers",
            "Getallen",
            "Counting from one to ten",
            "Hash",
            &[
                ("een", "one", "Ik heb een broer.", "I have one brother."),
                ("twee", "two", "Twee koffie, graag.", "Two coffees, please."),
                ("drie", "three", "Het is drie uur.", "It is three o'clock."),
                ("vier", "four", "Wij zijn met z'n vieren.", "There are four of us."),
                ("tien", "ten", "De bus komt over tien minuten.", "The bus comes in ten minutes."),
            ],
        ),
        category(
            "food",
            "Food & Drink",
            "Eten en drinken",
            "At the table and in the café",
            "Utensils",
            &[
                ("het brood", "the bread", "Het brood is vers.", "The bread is fresh."),
                ("de kaas", "the cheese", "Nederlandse kaas is lekker.", "Dutch cheese is tasty."),
                ("het water", "the water", "Mag ik wat water?", "May I have some water?"),
                ("de appel", "the apple", "Ik eet een appel.", "I am eating an apple."),
                ("de koffie", "the coffee", "De koffie is heet.", "The coffee is hot."),
            ],
        ),
        category(
            "home",
            "Home",
            "Thuis",
            "Rooms and things around the house",
            "Home",
            &[
                ("het huis", "the house", "Ons huis is klein.", "Our house is small."),
                ("de keuken", "the kitchen", "Mama is in de keuken.", "Mum is in the kitchen."),
                ("de deur", "the door", "Doe de deur dicht.", "Close the door."),
                ("het raam", "the window", "Het raam staat open.", "The window is open."),
                ("de tafel", "the table", "Het boek ligt op tafel.", "The book is on the table."),
            ],
        ),
        category(
            "transport",
            "Transport",
            "Vervoer",
            "Getting around town",
            "Bus",
            &[
                ("de fiets", "the bicycle", "Ik ga met de fiets.", "I go by bike."),
                ("de trein", "the train", "De trein is te laat.", "The train is late."),
                ("de bus", "the bus", "Waar stopt de bus?", "Where does the bus stop?"),
                ("het station", "the station", "Het is vlakbij.", "It is nearby."),
                ("de auto", "the car", "De auto is rood.", "The car is red."),
            ],
        ),
    ]
}
