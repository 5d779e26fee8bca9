use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use tasklist::cli::{Cli, Command};
use tasklist::config::Config;
use tasklist::{FilterMode, Intent, Slot, Task, TaskStore, ViewSession};

fn setup_logging() {
    // Quiet by default so list output stays readable; RUST_LOG overrides
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Turn a user-typed reference into a task id
fn resolve<S: Slot>(store: &TaskStore<S>, reference: &str) -> Result<String> {
    match store.resolve_id(reference) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(eyre!("No task matches '{}'", reference)),
        Err(candidates) => Err(eyre!(
            "'{}' is ambiguous, candidates: {}",
            reference,
            candidates.join(", ")
        )),
    }
}

fn print_tasks(tasks: &[Task], mode: FilterMode) {
    if tasks.is_empty() {
        let label = match mode {
            FilterMode::All => "No tasks".to_string(),
            other => format!("No {} tasks", other),
        };
        println!("{}", label.dimmed());
        return;
    }
    for task in tasks {
        let mark = if task.completed { "✓".green() } else { "·".normal() };
        let text = if task.completed {
            task.text.strikethrough().dimmed()
        } else {
            task.text.normal()
        };
        println!("{} {} {}", mark, task.short_id().cyan(), text);
    }
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(store_path) = cli.store_path {
        config.store_path = store_path;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let slot = config.open_slot().context("Failed to open storage")?;
    let mut store = TaskStore::with_key(slot, config.storage_key.clone());
    store.load();

    let mode = cli
        .filter
        .as_deref()
        .map(FilterMode::parse)
        .unwrap_or(config.default_filter);
    let mut view = ViewSession::new(mode);

    let intent = match cli.command {
        Command::Add { text } => Intent::Add(text.join(" ")),
        Command::Edit { id, text } => Intent::Edit {
            id: resolve(&store, &id)?,
            text: text.join(" "),
        },
        Command::Toggle { id } => Intent::Toggle(resolve(&store, &id)?),
        Command::Rm { id } => Intent::Remove(resolve(&store, &id)?),
        Command::Clear => Intent::ClearCompleted,
        Command::Ls { mode } => {
            let mode = mode.as_deref().map(FilterMode::parse).unwrap_or(view.filter);
            view.dispatch(&mut store, Intent::SetFilter(mode))?;
            print_tasks(&view.render(&store), view.filter);
            return Ok(());
        }
        Command::Mv { dragged, target } => {
            let dragged = resolve(&store, &dragged)?;
            let target = resolve(&store, &target)?;
            view.dispatch(&mut store, Intent::DragStart(dragged))?;
            Intent::Drop(target)
        }
        Command::Stats => {
            let counts = store.counts();
            println!("Total:     {}", counts.total);
            println!("Active:    {}", counts.active.to_string().yellow());
            println!("Completed: {}", counts.completed.to_string().green());
            return Ok(());
        }
    };

    let shown = view.dispatch(&mut store, intent)?;
    print_tasks(&shown, view.filter);

    let counts = store.counts();
    println!(
        "{}",
        format!("{} item{} left", counts.active, if counts.active == 1 { "" } else { "s" }).dimmed()
    );

    Ok(())
}
