//! View-side state and the intents a view sends to the store
//!
//! The store never pushes changes. A view holds a [`ViewSession`], turns each
//! user action into an [`Intent`], and re-renders from the list that
//! [`ViewSession::dispatch`] hands back.

use crate::filter::FilterMode;
use crate::slot::Slot;
use crate::store::TaskStore;
use crate::task::Task;
use eyre::Result;
use tracing::debug;

/// A single user action forwarded from the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(String),
    Edit { id: String, text: String },
    Toggle(String),
    Remove(String),
    ClearCompleted,
    SetFilter(FilterMode),
    DragStart(String),
    Drop(String),
    DragCancel,
}

/// Filter and drag state owned by one view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSession {
    pub filter: FilterMode,
    pub dragging: Option<String>,
}

impl ViewSession {
    pub fn new(filter: FilterMode) -> Self {
        Self { filter, dragging: None }
    }

    /// Apply `intent` and return the list the view should now show
    pub fn dispatch<S: Slot>(&mut self, store: &mut TaskStore<S>, intent: Intent) -> Result<Vec<Task>> {
        debug!(?intent, filter = %self.filter, "dispatch");

        match intent {
            Intent::Add(text) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!("dispatch: ignoring blank add");
                } else {
                    store.add(text)?;
                }
            }
            Intent::Edit { id, text } => {
                let text = text.trim();
                if text.is_empty() {
                    store.remove(&id)?;
                } else {
                    store.edit(&id, text)?;
                }
            }
            Intent::Toggle(id) => {
                store.toggle(&id)?;
            }
            Intent::Remove(id) => {
                store.remove(&id)?;
            }
            Intent::ClearCompleted => {
                store.clear_completed()?;
            }
            Intent::SetFilter(mode) => {
                self.filter = mode;
            }
            Intent::DragStart(id) => {
                self.dragging = Some(id);
            }
            Intent::Drop(target) => {
                if let Some(dragged) = self.dragging.take() {
                    store.reorder(&dragged, &target)?;
                }
            }
            Intent::DragCancel => {
                self.dragging = None;
            }
        }

        Ok(self.render(store))
    }

    /// The current filtered view of `store`
    pub fn render<S: Slot>(&self, store: &TaskStore<S>) -> Vec<Task> {
        store.filter(self.filter)
    }
}
