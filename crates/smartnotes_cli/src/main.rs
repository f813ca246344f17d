//! SmartNotes command-line front end.
//!
//! # Responsibility
//! - Forward add/toggle/edit/delete/list actions to the item repository.
//! - Render repository state as text or JSON.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use log::info;
use smartnotes_core::{
    core_version, AppConfig, Category, ConfigError, DocumentStore, Item, ItemId, ItemRepository,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    BlankText,
    NotFound { category: Category, id: ItemId },
    /// The mutation applied in memory but the data file was not rewritten.
    Unsaved,
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::BlankText => write!(f, "text cannot be empty"),
            Self::NotFound { category, id } => write!(f, "{category} {id} not found"),
            Self::Unsaved => write!(f, "changes could not be written to the data file"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Version = cli.command {
        println!("smartnotes_core version={}", core_version());
        return Ok(());
    }

    let config = AppConfig::resolve(cli.data_file, cli.log_level.as_deref(), cli.log_dir)?;
    config.init_logging()?;
    info!(
        "event=cli_start module=cli status=ok data_file={}",
        config.data_file.display()
    );

    let mut repo = config.open_repository();
    if let Some(warning) = load_warning(&repo, &config.data_file) {
        eprintln!("{warning}");
    }
    run_command(cli.command, &mut repo, cli.json)?;

    if repo.is_dirty() {
        return Err(CliError::Unsaved);
    }
    Ok(())
}

/// Message shown when the data file could not be loaded and an empty
/// document stands in for it.
fn load_warning<S: DocumentStore>(repo: &ItemRepository<S>, data_file: &Path) -> Option<String> {
    repo.load_error().map(|err| {
        format!(
            "Warning: could not load {} ({err}); starting with empty lists, \
             the next change will overwrite the file",
            data_file.display()
        )
    })
}

fn run_command<S: DocumentStore>(
    command: Commands,
    repo: &mut ItemRepository<S>,
    json: bool,
) -> Result<(), CliError> {
    match command {
        Commands::Add { category, text } => {
            let item = repo
                .add(category, &text.join(" "))
                .ok_or(CliError::BlankText)?;
            print_item(category, &item, json)
        }
        Commands::Done { category, id } => toggle(repo, category, id, true, json),
        Commands::Undone { category, id } => toggle(repo, category, id, false, json),
        Commands::Edit { category, id, text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                return Err(CliError::BlankText);
            }
            if !repo.set_text(category, id, &text) {
                return Err(CliError::NotFound { category, id });
            }
            print_stored(repo, category, id, json)
        }
        Commands::Rm { category, id } => {
            if !repo.remove(category, id) {
                return Err(CliError::NotFound { category, id });
            }
            if !json {
                println!("removed {category} {id}");
            }
            Ok(())
        }
        Commands::List { category } => {
            let categories = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            if json {
                let listing: serde_json::Map<String, serde_json::Value> = categories
                    .iter()
                    .map(|category| {
                        serde_json::to_value(repo.list(*category))
                            .map(|items| (category.collection_key().to_string(), items))
                    })
                    .collect::<Result<_, _>>()?;
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for category in categories {
                    println!("{} ({})", category.collection_key(), repo.len(category));
                    for item in repo.list(category) {
                        println!("  {}", format_item(category, item));
                    }
                }
            }
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

fn toggle<S: DocumentStore>(
    repo: &mut ItemRepository<S>,
    category: Category,
    id: ItemId,
    value: bool,
    json: bool,
) -> Result<(), CliError> {
    if !repo.set_completed(category, id, value) {
        return Err(CliError::NotFound { category, id });
    }
    print_stored(repo, category, id, json)
}

fn print_stored<S: DocumentStore>(
    repo: &ItemRepository<S>,
    category: Category,
    id: ItemId,
    json: bool,
) -> Result<(), CliError> {
    let item = repo
        .get(category, id)
        .ok_or(CliError::NotFound { category, id })?;
    print_item(category, item, json)
}

fn print_item(category: Category, item: &Item, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", format_item(category, item));
    }
    Ok(())
}

fn format_item(category: Category, item: &Item) -> String {
    let mark = if category.tracks_completion() {
        if item.is_completed() {
            "[x] "
        } else {
            "[ ] "
        }
    } else {
        ""
    };
    format!(
        "{mark}#{} {}  (updated {})",
        item.id, item.text, item.updated_at
    )
}

#[cfg(test)]
mod tests {
    use super::{format_item, load_warning, run_command, CliError};
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use smartnotes_core::{Category, Document, Item, ItemRepository, MemoryStore};
    use std::path::Path;

    #[test]
    fn cli_parses_category_names_and_joins_text() {
        let cli = Cli::parse_from(["smartnotes", "add", "notes", "Buy", "milk"]);
        match cli.command {
            Commands::Add { category, text } => {
                assert_eq!(category, Category::Note);
                assert_eq!(text.join(" "), "Buy milk");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["smartnotes", "add", "tasks", "x"]).is_err());
    }

    #[test]
    fn format_item_marks_completion_for_notes_only() {
        let mut note = Item::new(Category::Note, 1, "Buy milk", "2024-01-01 10:00:00");
        note.completed = Some(true);
        assert!(format_item(Category::Note, &note).starts_with("[x] #1 Buy milk"));

        let quote = Item::new(Category::Quote, 2, "Carpe diem", "2024-01-01 10:00:00");
        assert!(format_item(Category::Quote, &quote).starts_with("#2 Carpe diem"));
    }

    #[test]
    fn commands_forward_to_repository() {
        let mut repo = ItemRepository::open(MemoryStore::new());
        run_command(
            Commands::Add {
                category: Category::Note,
                text: vec!["Buy".to_string(), "milk".to_string()],
            },
            &mut repo,
            false,
        )
        .unwrap();
        run_command(
            Commands::Done {
                category: Category::Note,
                id: 1,
            },
            &mut repo,
            true,
        )
        .unwrap();
        assert!(repo.get(Category::Note, 1).unwrap().is_completed());

        let err = run_command(
            Commands::Rm {
                category: Category::Note,
                id: 9,
            },
            &mut repo,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::NotFound { id: 9, .. }));

        let err = run_command(
            Commands::Add {
                category: Category::Quote,
                text: vec!["  ".to_string()],
            },
            &mut repo,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::BlankText));
        assert_eq!(repo.store().save_count(), 2);
    }

    #[test]
    fn unreadable_data_is_reported_before_mutating() {
        let mut broken = Document::default();
        broken
            .notes
            .push(Item::new(Category::Note, 1, "важливо", "2024-01-01 10:00:00"));
        broken
            .notes
            .push(Item::new(Category::Note, 1, "дублікат", "2024-01-01 10:00:00"));
        let repo = ItemRepository::open(MemoryStore::with_document(broken));

        let warning = load_warning(&repo, Path::new("data.json")).unwrap();
        assert!(warning.starts_with("Warning: could not load data.json"));
        assert!(warning.contains("duplicate note id 1"));
        assert!(warning.contains("overwrite"));

        let healthy = ItemRepository::open(MemoryStore::new());
        assert!(load_warning(&healthy, Path::new("data.json")).is_none());
    }
}
