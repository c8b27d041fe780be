//! # Undo/Redo Stack
//!
//! Snapshot history for the editing session.
//!
//! ## Design
//!
//! - Every discrete edit pushes a full snapshot of the edited value
//! - The first push is the baseline; it can never be undone past
//! - Undo moves the top snapshot to the redo stack and returns the new top
//! - Redo moves it back and returns it
//! - New pushes clear the redo stack (linear history)
//! - The oldest snapshot is evicted past `max_levels`
//! - Batches collapse several pushes into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! stack.push(site.clone(), "Open site");
//!
//! let edited = mutation.apply(&site, &mut ctx)?.site;
//! stack.push(edited.clone(), mutation.description());
//!
//! // Back to `site`
//! let previous = stack.undo();
//! ```

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default number of retained snapshots
pub const DEFAULT_MAX_LEVELS: usize = 50;

/// One retained snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState<T> {
    pub snapshot: T,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

impl<T> HistoryState<T> {
    pub fn new(snapshot: T, description: Option<String>) -> Self {
        Self {
            snapshot,
            timestamp: Utc::now(),
            description,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Batch {
    /// Whether the batch already owns the top undo entry
    started: bool,
    description: Option<String>,
}

/// Bounded linear undo/redo history over snapshots of `T`
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    /// Applied states, oldest first; the back is the current state
    undo_stack: VecDeque<HistoryState<T>>,

    /// Undone states, most recent last
    redo_stack: Vec<HistoryState<T>>,

    /// Maximum number of retained snapshots (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<Batch>,
}

impl<T: Clone> UndoStack<T> {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record `snapshot` as the new current state
    pub fn push(&mut self, snapshot: T, description: impl Into<String>) {
        let description = Some(description.into());

        if let Some(batch) = &mut self.current_batch {
            if batch.started {
                if let Some(top) = self.undo_stack.back_mut() {
                    top.snapshot = snapshot;
                    top.timestamp = Utc::now();
                    return;
                }
            }
            batch.started = true;
            let description = batch.description.clone().or(description);
            self.push_state(HistoryState::new(snapshot, description));
        } else {
            self.push_state(HistoryState::new(snapshot, description));
        }
    }

    fn push_state(&mut self, state: HistoryState<T>) {
        self.undo_stack.push_back(state);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.pop_front();
        }

        self.redo_stack.clear();
    }

    /// Start grouping pushes into a single undo step
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(Batch::default());
    }

    pub fn end_batch(&mut self) {
        self.current_batch = None;
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        let Some(batch) = &mut self.current_batch else {
            return;
        };
        let description = description.into();
        if batch.started {
            if let Some(top) = self.undo_stack.back_mut() {
                top.description = Some(description.clone());
            }
        }
        batch.description = Some(description);
    }

    /// Step back; returns the restored state
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.current_batch = None;

        let undone = self.undo_stack.pop_back()?;
        self.redo_stack.push(undone);
        self.undo_stack.back().map(|state| &state.snapshot)
    }

    /// Step forward; returns the restored state
    pub fn redo(&mut self) -> Option<&T> {
        let redone = self.redo_stack.pop()?;
        self.current_batch = None;

        self.undo_stack.push_back(redone);
        self.undo_stack.back().map(|state| &state.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn current(&self) -> Option<&T> {
        self.undo_stack.back().map(|state| &state.snapshot)
    }

    /// Number of steps that can be undone
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len().saturating_sub(1)
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Drop all history and start over from `baseline`
    pub fn reset(&mut self, baseline: T, description: impl Into<String>) {
        self.clear();
        self.push(baseline, description);
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Description of the edit the next undo reverts
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack
            .back()
            .and_then(|state| state.description.as_deref())
    }

    /// Description of the edit the next redo reapplies
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|state| state.description.as_deref())
    }

    /// Retained states, oldest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryState<T>> {
        self.undo_stack.iter()
    }
}

impl<T: Clone> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
