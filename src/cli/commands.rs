use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::filter::ViewFilter;
use crate::model::theme_mode::ThemeMode;

#[derive(Parser)]
#[command(name = "tick", about = concat!("[x] tick v", env!("CARGO_PKG_VERSION"), " - one list, no fuss"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the end of the list
    Add(AddArgs),
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Toggle a task between open and done
    Done(IdArgs),
    /// Replace a task's text (empty text deletes it)
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Delete every task
    Clear(ClearArgs),
    /// Show task counts
    Stats,
    /// Show or set the color theme
    Theme(ThemeArgs),
    /// List categories, or add one
    Categories(CategoriesCmd),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Category id (see `tick categories`)
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which tasks to show
    #[arg(long, value_enum, default_value_t = ViewArg::All)]
    pub view: ViewArg,
    /// Only tasks in this category
    #[arg(long, short)]
    pub category: Option<String>,
    /// Only tasks whose text contains this (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task id, as shown by `tick list`
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id
    pub id: String,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    All,
    Active,
    #[value(alias = "done")]
    Completed,
}

impl From<ViewArg> for ViewFilter {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::All => ViewFilter::All,
            ViewArg::Active => ViewFilter::Active,
            ViewArg::Completed => ViewFilter::Completed,
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to switch to; prints the current one when omitted
    #[arg(value_enum)]
    pub mode: Option<ThemeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CategoriesCmd {
    #[command(subcommand)]
    pub action: Option<CategoriesAction>,
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// Add a category to config.toml
    Add(CategoryAddArgs),
}

#[derive(Args)]
pub struct CategoryAddArgs {
    /// Identifier stored with each task
    pub id: String,
    /// Label shown in lists and the filter bar
    pub label: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove all entries, not just those older than 30 days
    #[arg(long)]
    pub all: bool,
}
