use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thiserror::Error;

use woordjes::config::Config;
use woordjes::favorites::FavoritesView;
use woordjes::import::{self, ImportError};
use woordjes::logging;
use woordjes::words::{DraftError, WordDraft};
use woordjes::{
    Catalog, ProgressStore, SessionError, SqliteStore, StorageError, SwipeOutcome, SwipeSession,
};

#[derive(Parser)]
#[command(name = "woordjes", version, about = "Dutch vocabulary flashcards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List categories with their word counts
    Categories,
    /// Review the unlearned words of a category (h = skip, l = favorite, d = delete, q = quit)
    Review { category: String },
    /// Show favorites, or remove some or all of them
    Favorites {
        #[arg(long, num_args = 1..)]
        remove: Vec<String>,
        #[arg(long)]
        clear: bool,
    },
    /// Add a custom word
    Add {
        dutch: String,
        english: String,
        #[arg(long, default_value = "")]
        example_dutch: String,
        #[arg(long, default_value = "")]
        example_english: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Import words from a CSV file (Dutch,English,ExampleDutch,ExampleEnglish)
    Import { file: PathBuf },
    /// Show learning progress
    Stats,
    /// Forget which words were learned; favorites and custom words are kept
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("pass --yes to confirm resetting your learning progress")]
    NotConfirmed,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config);

    let cli = Cli::parse();

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<(), CliError> {
    let backend = SqliteStore::open(&config.db_path)?;
    let store = Arc::new(ProgressStore::load(Arc::new(backend)));
    let catalog = Catalog::builtin();

    match command {
        Command::Categories => {
            let state = store.snapshot();
            for category in catalog.categories(&state) {
                let learned = category
                    .words
                    .iter()
                    .filter(|w| state.is_learned(&w.id))
                    .count();
                println!(
                    "{:<12} {} ({}) {}/{} learned",
                    category.id,
                    category.title,
                    category.title_dutch,
                    learned,
                    category.words.len()
                );
            }
        }
        Command::Review { category } => review(&catalog, store, &category, config.viewport_width)?,
        Command::Favorites { remove, clear } => {
            let mut view = FavoritesView::new();
            if clear {
                view.clear_all(&store)?;
                println!("All favorites removed.");
            } else if !remove.is_empty() {
                for id in &remove {
                    view.select(id);
                }
                let removed = view.delete_selected(&store)?;
                println!("Removed {removed} favorites.");
            }
            for item in view.items(&catalog, &store.snapshot()) {
                println!("{:<12} {} = {}", item.word.id, item.word.dutch, item.word.english);
            }
        }
        Command::Add {
            dutch,
            english,
            example_dutch,
            example_english,
            category,
        } => {
            let category_id = category
                .or_else(|| catalog.default_category_id().map(str::to_string))
                .unwrap_or_default();
            if !catalog.contains_category(&category_id) {
                return Err(CliError::CategoryNotFound(category_id));
            }
            let word = WordDraft::new(dutch, english, category_id)
                .with_examples(example_dutch, example_english)
                .into_custom_word()?;
            let id = word.id().to_string();
            store.add_custom_word(word)?;
            println!("Saved card {id}.");
        }
        Command::Import { file } => {
            let report = import::import_file(&store, &file)?;
            println!("Success! {}", report.message());
        }
        Command::Stats => {
            let summary = catalog.summary(&store.snapshot());
            println!("Total words: {}", summary.total_words);
            println!("Learned:     {}", summary.learned);
            println!("Favorites:   {}", summary.favorites);
            println!("To do:       {}", summary.todo);
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(CliError::NotConfirmed);
            }
            store.reset_progress()?;
            println!("Learning progress reset.");
        }
    }

    Ok(())
}

fn review(
    catalog: &Catalog,
    store: Arc<ProgressStore>,
    category_id: &str,
    viewport_width: f32,
) -> Result<(), CliError> {
    let state = store.snapshot();
    let words = catalog
        .session_words(category_id, &state)
        .ok_or_else(|| CliError::CategoryNotFound(category_id.to_string()))?;
    let mut session = SwipeSession::new(words, viewport_width, store)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(card) = session.current() {
        let word = card.word().clone();
        let is_custom = card.is_custom();
        println!();
        println!("[{}/{}] {}", session.cursor() + 1, session.len(), word.dutch);
        if !word.example_dutch.is_empty() {
            println!("        {}", word.example_dutch);
        }
        let delete_hint = if is_custom { ", d = delete" } else { "" };
        print!("h = skip, l = favorite{delete_hint}, q = quit > ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let outcome = match line?.trim() {
            "h" => session.release_with_offset(-viewport_width, 0.0)?,
            "l" => session.release_with_offset(viewport_width, 0.0)?,
            "d" if is_custom => session.delete_current()?,
            "q" => return Ok(()),
            _ => continue,
        };

        match outcome {
            SwipeOutcome::Favorited { .. } => {
                println!("{} = {} (saved to favorites)", word.dutch, word.english)
            }
            SwipeOutcome::Skipped { .. } => println!("{} = {}", word.dutch, word.english),
            SwipeOutcome::Deleted { .. } => println!("Deleted {}.", word.dutch),
            SwipeOutcome::SnapBack => {}
        }
    }

    if session.is_completed() {
        println!("Category completed!");
    }
    Ok(())
}
