//! Example 01: Basic CRUD Operations
//!
//! This example adds, edits, toggles, reorders and removes tasks with a
//! file-backed TaskStore, then reopens the store to show the list survived.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use tasklist::{FileSlot, FilterMode, Task, TaskStore};

fn show(label: &str, tasks: &[Task]) {
    println!("{}:", label);
    if tasks.is_empty() {
        println!("  (none)");
    }
    for (i, task) in tasks.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, task, task.short_id());
    }
    println!();
}

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;
    let store_path = temp_dir.path().to_path_buf();

    println!("TaskList Basic CRUD Example");
    println!("===========================\n");
    println!("Store path: {}\n", store_path.display());

    let mut store = TaskStore::open(FileSlot::open(&store_path)?);

    // CREATE
    println!("1. ADD - Appending three tasks...");
    let milk = store.add("buy milk")?;
    let dog = store.add("walk dog")?;
    let mail = store.add("answer mail")?;
    show("All tasks", store.items());

    // UPDATE
    println!("2. EDIT + TOGGLE - Renaming mail, completing the dog walk...");
    store.edit(mail.id(), "answer email")?;
    store.toggle(dog.id())?;
    show("Active", &store.filter(FilterMode::Active));
    show("Completed", &store.filter(FilterMode::Completed));

    // REORDER
    println!("3. REORDER - Dragging email onto milk...");
    store.reorder(mail.id(), milk.id())?;
    show("All tasks", store.items());

    // Unknown ids are ignored
    println!("4. NO-OP - Toggling an id that does not exist...");
    let changed = store.toggle("no-such-id")?;
    println!("  changed: {}\n", changed);

    // DELETE
    println!("5. CLEAR COMPLETED + REMOVE...");
    let removed = store.clear_completed()?;
    println!("  cleared {} completed task(s)", removed);
    store.remove(milk.id())?;
    show("All tasks", store.items());

    // Reopen to prove persistence
    println!("6. REOPEN - Loading the list from disk again...");
    let reopened = TaskStore::open(FileSlot::open(&store_path)?);
    show("Reloaded", reopened.items());
    assert_eq!(reopened.items(), store.items());

    let raw = std::fs::read_to_string(store_path.join("tasklist.items.json"))?;
    println!("Stored JSON: {}", raw);

    Ok(())
}
