//! CLI argument definitions for SmartNotes.

use clap::{Parser, Subcommand};
use smartnotes_core::{Category, ItemId};
use std::path::PathBuf;

/// SmartNotes - keep notes, contacts and quotes in a local JSON file.
#[derive(Parser, Debug)]
#[command(name = "smartnotes")]
#[command(author, version, about = "Keep notes, contacts and quotes in a local JSON file", long_about = None)]
pub struct Cli {
    /// Data file to read and rewrite [default: ./data.json]
    #[arg(short = 'f', long = "data-file", global = true)]
    pub data_file: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an item (note, contact or quote)
    Add {
        category: Category,
        /// Item text; words are joined with single spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark an item as completed
    Done { category: Category, id: ItemId },

    /// Clear the completed mark of an item
    Undone { category: Category, id: ItemId },

    /// Replace the text of an item
    Edit {
        category: Category,
        id: ItemId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete an item
    Rm { category: Category, id: ItemId },

    /// List items of one category, or of all categories
    List { category: Option<Category> },

    /// Print the core version
    Version,
}
