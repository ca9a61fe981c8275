//! CSV 单词导入
//!
//! 表头列（不区分大小写）：`Dutch`、`English`、`ExampleDutch`（可选）、
//! `ExampleEnglish`（可选）。缺少荷兰语或英语的行会被跳过并计数。
//! 接受的行以新 ID 存入 `imported` 分类，一次写入。

use std::path::Path;

use thiserror::Error;

use crate::storage::{CustomWord, ProgressStore, StorageError, Word, IMPORTED_CATEGORY_ID};
use crate::words::new_word_id;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("error parsing CSV at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("no valid words found, check column headers ({skipped} rows skipped)")]
    NoValidRows { skipped: usize },

    #[error("import failed: {0}")]
    Storage(#[from] StorageError),

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// 导入成功后展示给用户的摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportReport {
    pub fn message(&self) -> String {
        let mut message = format!("Imported {} words.", self.imported);
        if self.skipped > 0 {
            message.push_str(&format!(" ({} skipped)", self.skipped));
        }
        message
    }
}

/// 已解析、尚未存储的行
#[derive(Debug, Clone)]
pub struct ParsedImport {
    pub words: Vec<CustomWord>,
    pub skipped: usize,
}

// ============================================================
// 导入入口
// ============================================================

/// 解析并存储 CSV 文档，只写入一次
pub fn import_csv(store: &ProgressStore, text: &str) -> Result<ImportReport, ImportError> {
    let ParsedImport { words, skipped } = parse_words(text)?;
    if words.is_empty() {
        return Err(ImportError::NoValidRows { skipped });
    }

    let imported = store.import_words(words)?;
    let report = ImportReport { imported, skipped };
    tracing::info!(imported, skipped, "csv import finished");
    Ok(report)
}

pub fn import_file<P: AsRef<Path>>(
    store: &ProgressStore,
    path: P,
) -> Result<ImportReport, ImportError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), bytes = text.len(), "importing csv file");
    import_csv(store, &text)
}

/// 把 CSV 文档转换成自定义单词，不访问存储
pub fn parse_words(text: &str) -> Result<ParsedImport, ImportError> {
    let mut records = read_records(text)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(ParsedImport {
            words: Vec::new(),
            skipped: 0,
        });
    };

    let columns = Columns::from_header(&header);
    let mut words = Vec::new();
    let mut skipped = 0;

    for record in records {
        match columns.word(&record) {
            Some(word) => words.push(CustomWord::new(word, IMPORTED_CATEGORY_ID)),
            None => skipped += 1,
        }
    }

    Ok(ParsedImport { words, skipped })
}

// ============================================================
// CSV 解析
// ============================================================

/// 表头中各列的位置
struct Columns {
    dutch: Option<usize>,
    english: Option<usize>,
    example_dutch: Option<usize>,
    example_english: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Self {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Self {
            dutch: find("dutch"),
            english: find("english"),
            example_dutch: find("exampledutch"),
            example_english: find("exampleenglish"),
        }
    }

    fn word(&self, record: &[String]) -> Option<Word> {
        let value = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|v| v.trim())
                .unwrap_or("")
        };

        let dutch = value(self.dutch);
        let english = value(self.english);
        if dutch.is_empty() || english.is_empty() {
            return None;
        }

        Some(Word::new(
            new_word_id(),
            dutch,
            english,
            value(self.example_dutch),
            value(self.example_english),
        ))
    }
}

/// 把 CSV 文档切分成记录
///
/// 支持带 `""` 转义的引号字段、CRLF 与单独 CR 换行、开头的 UTF-8 BOM；
/// 空行丢弃。
fn read_records(text: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
                quote_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                record.push(std::mem::take(&mut field));
                field_started = false;
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(ImportError::Parse {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if field_started || !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.iter().all(|f| f.trim().is_empty());
    if !blank {
        records.push(record);
    }
}
