use std::collections::VecDeque;

use super::delta::Delta;

/// Default cap on kept undo groups
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// A group of deltas that form a single undoable action
#[derive(Debug, Clone, Default)]
pub struct UndoEntry {
    /// The deltas in this entry (in the order they were applied)
    pub deltas: Vec<Delta>,
}

impl UndoEntry {
    /// Add a delta to this entry
    pub fn push(&mut self, delta: Delta) {
        self.deltas.push(delta);
    }

    /// Check if this entry has any deltas
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Deltas that revert this entry, in application order
    pub fn inverse(&self) -> Vec<Delta> {
        self.deltas.iter().rev().map(Delta::inverse).collect()
    }
}

/// Manages the undo/redo history
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Stack of undoable entries (VecDeque for O(1) front removal during trimming)
    undo_stack: VecDeque<UndoEntry>,
    /// Stack of redoable entries
    redo_stack: VecDeque<UndoEntry>,
    /// Current entry being built
    current_entry: Option<UndoEntry>,
    /// Nesting of open groups; the entry is committed when it drops to zero
    depth: usize,
    /// Maximum number of undo entries to keep
    max_entries: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            current_entry: None,
            depth: 0,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an undo group. Groups nest; only the outermost one commits.
    pub fn begin_undo_group(&mut self) {
        if self.depth == 0 {
            self.current_entry = Some(UndoEntry::default());
        }
        self.depth += 1;
    }

    /// End the current undo group
    pub fn end_undo_group(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }
        if let Some(entry) = self.current_entry.take() {
            self.commit(entry);
        }
    }

    /// Record a delta in the current undo group
    pub fn record(&mut self, delta: Delta) {
        if let Some(ref mut entry) = self.current_entry {
            entry.push(delta);
        } else {
            // No group started, create a single-delta entry
            let mut entry = UndoEntry::default();
            entry.push(delta);
            self.commit(entry);
        }
    }

    fn commit(&mut self, entry: UndoEntry) {
        if entry.is_empty() {
            return;
        }
        self.undo_stack.push_back(entry);
        // Clear redo stack when new changes are made
        self.redo_stack.clear();
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
    }

    /// Pop an entry from the undo stack
    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(entry.clone());
        Some(entry)
    }

    /// Pop an entry from the redo stack
    pub fn pop_redo(&mut self) -> Option<UndoEntry> {
        let entry = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(entry.clone());
        Some(entry)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo entries
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_entry = None;
        self.depth = 0;
    }
}
