// Ordered task collection with write-through persistence

use crate::filter::FilterMode;
use crate::slot::Slot;
use crate::task::Task;
use eyre::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Key under which the serialized list is stored
pub const STORAGE_KEY: &str = "tasklist.items";

/// Totals shown in a list footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Owner of the ordered task list
///
/// Every mutating operation rewrites the whole list to the slot before it
/// returns, so the persisted value always matches `items()`. A failed write
/// leaves `items()` as it was before the call.
pub struct TaskStore<S: Slot> {
    slot: S,
    key: String,
    items: Vec<Task>,
}

impl<S: Slot> TaskStore<S> {
    /// Create an empty store over `slot` using [`STORAGE_KEY`]
    ///
    /// Call [`TaskStore::load`] before anything else, or use [`TaskStore::open`].
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    /// Create an empty store over `slot` using a custom key
    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
            items: Vec::new(),
        }
    }

    /// Create a store and load its items
    pub fn open(slot: S) -> Self {
        let mut store = Self::new(slot);
        store.load();
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Give back the underlying slot
    pub fn into_slot(self) -> S {
        self.slot
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.items.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn counts(&self) -> Counts {
        let completed = self.items.iter().filter(|t| t.completed).count();
        Counts {
            total: self.items.len(),
            active: self.items.len() - completed,
            completed,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|t| t.id() == id)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace `items` with the persisted list
    ///
    /// A missing, empty, unreadable or malformed value yields an empty list.
    pub fn load(&mut self) {
        self.items = match self.slot.read(&self.key) {
            Ok(Some(raw)) if raw.trim().is_empty() => Vec::new(),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => dedup_by_id(tasks),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Stored task list is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to read stored task list, starting empty");
                Vec::new()
            }
        };

        info!(key = %self.key, count = self.items.len(), "Loaded task list");
    }

    /// Write the full list to the slot, replacing what was there
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.items).context("Failed to serialize task list")?;
        self.slot
            .write(&self.key, &json)
            .with_context(|| format!("Failed to persist task list under '{}'", self.key))?;
        debug!(key = %self.key, count = self.items.len(), "persist: written");
        Ok(())
    }

    /// Persist, putting `snapshot` back as `items` if the write fails
    fn commit(&mut self, snapshot: Vec<Task>) -> Result<()> {
        if let Err(e) = self.persist() {
            warn!(key = %self.key, error = ?e, "Write failed, rolling back in-memory change");
            self.items = snapshot;
            return Err(e);
        }
        Ok(())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new incomplete task and return it
    pub fn add(&mut self, text: impl Into<String>) -> Result<Task> {
        let mut task = Task::new(text);
        // v7 ids only repeat if the clock and RNG both misbehave; regenerate if so
        while self.position(task.id()).is_some() {
            task = Task::new(task.text);
        }

        debug!(id = task.id(), "add: appending");
        let snapshot = self.items.clone();
        self.items.push(task.clone());
        self.commit(snapshot)?;
        Ok(task)
    }

    /// Replace the text of `id`; returns false when no such task exists
    pub fn edit(&mut self, id: &str, text: impl Into<String>) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            debug!(id, "edit: unknown id, ignoring");
            return Ok(false);
        };

        let snapshot = self.items.clone();
        self.items[idx].set_text(text);
        self.commit(snapshot)?;
        Ok(true)
    }

    /// Flip completion of `id`; returns false when no such task exists
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            debug!(id, "toggle: unknown id, ignoring");
            return Ok(false);
        };

        let snapshot = self.items.clone();
        self.items[idx].toggle_completed();
        self.commit(snapshot)?;
        Ok(true)
    }

    /// Remove `id`; returns false when no such task exists
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            debug!(id, "remove: unknown id, ignoring");
            return Ok(false);
        };

        let snapshot = self.items.clone();
        self.items.remove(idx);
        self.commit(snapshot)?;
        Ok(true)
    }

    /// Drop every completed task, keeping the rest in order
    ///
    /// Always persists. Returns how many tasks were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let snapshot = self.items.clone();
        self.items.retain(|t| !t.completed);
        let removed = snapshot.len() - self.items.len();

        debug!(removed, "clear_completed: done");
        self.commit(snapshot)?;
        Ok(removed)
    }

    /// Move `dragged_id` so it sits immediately before `target_id`
    ///
    /// No-op when the ids are equal or either is unknown. The insertion index
    /// is taken in the list with the dragged task already removed. Returns
    /// true when the order changed.
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<bool> {
        if dragged_id == target_id {
            return Ok(false);
        }
        let (Some(from), Some(to)) = (self.position(dragged_id), self.position(target_id)) else {
            debug!(dragged_id, target_id, "reorder: unknown id, ignoring");
            return Ok(false);
        };

        let snapshot = self.items.clone();
        let task = self.items.remove(from);
        let insert_idx = if from < to { to - 1 } else { to };
        self.items.insert(insert_idx, task);

        debug!(dragged_id, target_id, from, to = insert_idx, "reorder: moved");
        self.commit(snapshot)?;
        Ok(insert_idx != from)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks matching `mode`, in list order
    pub fn filter(&self, mode: FilterMode) -> Vec<Task> {
        self.items.iter().filter(|t| mode.matches(t)).cloned().collect()
    }

    /// Resolve a short reference to a full task id
    ///
    /// Returns:
    /// - Ok(Some(id)) for an exact id, a 1-based position, or a unique id
    ///   prefix or suffix (the form [`Task::short_id`] prints)
    /// - Ok(None) if nothing matches
    /// - Err with candidates if the reference is ambiguous
    pub fn resolve_id(&self, reference: &str) -> std::result::Result<Option<String>, Vec<String>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok(None);
        }

        if let Some(task) = self.get(reference) {
            return Ok(Some(task.id().to_string()));
        }

        if let Ok(n) = reference.parse::<usize>()
            && (1..=self.items.len()).contains(&n)
        {
            return Ok(Some(self.items[n - 1].id().to_string()));
        }

        let mut matches: Vec<String> = self
            .items
            .iter()
            .filter(|t| t.id().starts_with(reference) || t.id().ends_with(reference))
            .map(|t| t.id().to_string())
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(matches),
        }
    }
}

/// Keep the first task for each id
fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let before = tasks.len();
    let unique: Vec<Task> = tasks.into_iter().filter(|t| seen.insert(t.id().to_string())).collect();
    if unique.len() != before {
        warn!(dropped = before - unique.len(), "Stored task list had duplicate ids, keeping first");
    }
    unique
}
