use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::kv::FileStore;
use crate::io::recovery;
use crate::model::config::{Category, Config};
use crate::model::filter::FilterState;
use crate::model::task::TaskId;
use crate::ops::task_store::{ClearOutcome, EditOutcome, TaskStore};

type CmdResult = Result<(), Box<dyn Error>>;

/// Paths and flags shared by every command
struct Context {
    data_dir: PathBuf,
    config_path: PathBuf,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = Context {
        data_dir: config_io::data_dir(cli.data_dir.as_deref()),
        config_path: config_io::config_path(cli.config.as_deref()),
        json: cli.json,
    };
    tracing::debug!(data_dir = %ctx.data_dir.display(), config = %ctx.config_path.display(), "resolved paths");

    match cli.command {
        None => Err("no command given (run `tick` without arguments for the TUI)".into()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&ctx, args),
            Commands::Stats => cmd_stats(&ctx),
            Commands::Categories(args) => cmd_categories(&ctx, args),
            Commands::Recovery(args) => cmd_recovery(&ctx, args),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args),
            Commands::Done(args) => cmd_done(&ctx, args),
            Commands::Edit(args) => cmd_edit(&ctx, args),
            Commands::Rm(args) => cmd_rm(&ctx, args),
            Commands::Clear(args) => cmd_clear(&ctx, args),
            Commands::Theme(args) => cmd_theme(&ctx, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(ctx: &Context) -> Result<(TaskStore, Config), Box<dyn Error>> {
    let config = config_io::read_config(&ctx.config_path)?;
    let kv = FileStore::open(&ctx.data_dir)?;
    let store = TaskStore::load(Box::new(kv), config.categories.clone())?;
    Ok((store, config))
}

fn parse_id(raw: &str) -> Result<TaskId, Box<dyn Error>> {
    raw.parse()
        .map_err(|_| format!("invalid task id: {}", raw).into())
}

fn not_found(id: TaskId) -> Box<dyn Error> {
    format!("task not found: {}", id).into()
}

fn check_category(config: &Config, id: &str) -> CmdResult {
    if id.is_empty() || config.categories.contains(id) {
        Ok(())
    } else {
        Err(format!("unknown category: {} (see `tick categories`)", id).into())
    }
}

/// Ask on stderr, read one line from stdin. Only y/yes counts as yes.
fn stdin_confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let (store, config) = open_store(ctx)?;
    let category = args.category.unwrap_or_default();
    check_category(&config, &category)?;
    let filter = FilterState::new(args.view.into(), category, args.search.unwrap_or_default());

    let rows: Vec<_> = store.query_visible(&filter).collect();
    if ctx.json {
        let tasks: Vec<TaskJson> = rows
            .iter()
            .map(|(pos, task)| task_to_json(*pos, task, &config.categories))
            .collect();
        return print_json(&tasks);
    }

    let width = label_width(rows.iter().map(|(_, t)| *t), &config.categories);
    for (_, task) in &rows {
        println!("{}", format_task_line(task, &config.categories, width));
    }
    Ok(())
}

fn cmd_stats(ctx: &Context) -> CmdResult {
    let (store, _config) = open_store(ctx)?;
    let stats = store.stats();
    if ctx.json {
        return print_json(&stats_to_json(&stats));
    }
    for line in format_stats(&stats) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_categories(ctx: &Context, args: CategoriesCmd) -> CmdResult {
    let config = match args.action {
        Some(CategoriesAction::Add(add)) => {
            let id = add.id.trim();
            if id.is_empty() {
                return Err("category id cannot be empty".into());
            }
            let config = config_io::add_category(&ctx.config_path, Category::new(id, add.label.trim()))?;
            eprintln!("added category {} to {}", id, ctx.config_path.display());
            config
        }
        None => config_io::read_config(&ctx.config_path)?,
    };

    if ctx.json {
        let list: Vec<CategoryJson> = config
            .categories
            .iter()
            .map(|c| CategoryJson {
                id: c.id.clone(),
                label: c.label.clone(),
            })
            .collect();
        return print_json(&list);
    }
    let width = config.categories.ids().map(str::len).max().unwrap_or(0);
    for c in config.categories.iter() {
        println!("{:<width$}  {}", c.id, c.label, width = width);
    }
    Ok(())
}

fn cmd_recovery(ctx: &Context, args: RecoveryCmd) -> CmdResult {
    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(&ctx.data_dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let removed = recovery::prune_recovery(&ctx.data_dir, prune.all)?;
            println!("pruned {} entries", removed);
            Ok(())
        }
        None => {
            let entries = recovery::read_recovery_entries(&ctx.data_dir, None);
            let shown = &entries[..entries.len().min(args.limit.unwrap_or(10))];
            if ctx.json {
                return print_json(&shown);
            }
            let Some(oldest) = entries.last() else {
                println!("recovery log is empty");
                return Ok(());
            };
            eprintln!(
                "{} entries since {}",
                entries.len(),
                oldest.timestamp.format("%Y-%m-%d")
            );
            for entry in shown {
                print!("{}", entry);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let (mut store, config) = open_store(ctx)?;
    let category = args.category.unwrap_or_default();
    check_category(&config, &category)?;

    match store.add(&args.text, &category)? {
        Some(id) => println!("{}", id),
        None => tracing::info!("empty task text, nothing added"),
    }
    Ok(())
}

fn cmd_done(ctx: &Context, args: IdArgs) -> CmdResult {
    let (mut store, config) = open_store(ctx)?;
    let id = parse_id(&args.id)?;
    if !store.toggle_completion(id)? {
        return Err(not_found(id));
    }
    if let Some(task) = store.get(id) {
        println!("{}", format_task_line(task, &config.categories, 0));
    }
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    let (mut store, config) = open_store(ctx)?;
    let id = parse_id(&args.id)?;
    match store.edit(id, &args.text)? {
        EditOutcome::Edited => {
            if let Some(task) = store.get(id) {
                println!("{}", format_task_line(task, &config.categories, 0));
            }
            Ok(())
        }
        EditOutcome::Removed(_) => {
            println!("removed #{} (empty text)", id);
            Ok(())
        }
        EditOutcome::Missing => Err(not_found(id)),
    }
}

fn cmd_rm(ctx: &Context, args: IdArgs) -> CmdResult {
    let (mut store, _config) = open_store(ctx)?;
    let id = parse_id(&args.id)?;
    match store.remove(id)? {
        Some(_) => {
            println!("removed #{}", id);
            Ok(())
        }
        None => Err(not_found(id)),
    }
}

fn cmd_clear(ctx: &Context, args: ClearArgs) -> CmdResult {
    let (mut store, _config) = open_store(ctx)?;
    let outcome = if args.yes {
        store.clear_all(&mut |_: &str| true)?
    } else {
        store.clear_all(&mut stdin_confirm)?
    };
    match outcome {
        ClearOutcome::Empty => println!("nothing to clear"),
        ClearOutcome::Declined => println!("cancelled"),
        ClearOutcome::Cleared(n) => println!("cleared {} tasks", n),
    }
    Ok(())
}

fn cmd_theme(ctx: &Context, args: ThemeArgs) -> CmdResult {
    let (mut store, _config) = open_store(ctx)?;
    if let Some(mode) = args.mode {
        store.set_theme(mode.into())?;
    }
    println!("{}", store.theme());
    Ok(())
}
