//! Example 02: Driving the store through a ViewSession
//!
//! A view keeps its own filter and drag state, sends intents, and re-renders
//! from the list each dispatch returns. This uses an in-memory slot.
//!
//! Run with: cargo run --example 02_view_session

use eyre::Result;
use tasklist::{FilterMode, Intent, MemorySlot, Task, TaskStore, ViewSession};

fn render(view: &ViewSession, tasks: &[Task]) {
    println!("[filter: {}]", view.filter);
    for task in tasks {
        println!("  {}", task);
    }
    println!();
}

fn main() -> Result<()> {
    let mut store = TaskStore::open(MemorySlot::new());
    let mut view = ViewSession::default();

    println!("TaskList View Session Example");
    println!("=============================\n");

    for text in ["buy milk", "walk dog", "   ", "answer email"] {
        let shown = view.dispatch(&mut store, Intent::Add(text.to_string()))?;
        println!("add {:?}", text);
        render(&view, &shown);
    }

    let ids: Vec<String> = store.items().iter().map(|t| t.id().to_string()).collect();

    println!("toggle 'walk dog', then show active only");
    view.dispatch(&mut store, Intent::Toggle(ids[1].clone()))?;
    let shown = view.dispatch(&mut store, Intent::SetFilter(FilterMode::Active))?;
    render(&view, &shown);

    println!("drag 'answer email' onto 'buy milk'");
    view.dispatch(&mut store, Intent::DragStart(ids[2].clone()))?;
    let shown = view.dispatch(&mut store, Intent::Drop(ids[0].clone()))?;
    render(&view, &shown);

    println!("clear completed, show all");
    view.dispatch(&mut store, Intent::ClearCompleted)?;
    let shown = view.dispatch(&mut store, Intent::SetFilter(FilterMode::All))?;
    render(&view, &shown);

    let counts = store.counts();
    println!("{} item(s) left", counts.active);

    Ok(())
}
