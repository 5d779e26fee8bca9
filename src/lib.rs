// TaskList - Ordered task list with write-through key-value persistence

pub mod cli;
pub mod config;
pub mod filter;
pub mod session;
pub mod slot;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use filter::FilterMode;
pub use session::{Intent, ViewSession};
pub use slot::{FileSlot, MemorySlot, Slot, SqliteSlot};
pub use store::{Counts, STORAGE_KEY, TaskStore};
pub use task::Task;
