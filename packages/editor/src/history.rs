//! # Undo/Redo History
//!
//! Linear history over patch sequences.
//!
//! ## Design
//!
//! - Conceptually a list of snapshots `S[0..=n]` with a cursor `c`, where
//!   `S[0]` is the empty sequence (the unpatched document)
//! - Stored as one patch log: `S[i]` is `log[..i]`, so memory stays linear
//! - A new patch discards everything after the cursor (the redo branch)
//! - Undo/redo only move the cursor
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//! history.apply_patch(patch);
//! history.undo();
//! history.redo();
//! let css = patcher.patch(original, history.current_patches());
//! ```

use crate::Patch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    /// Every patch reachable by redo from the baseline
    log: Vec<Patch>,

    /// Number of patches in the current snapshot
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a patch to the current snapshot, dropping the redo branch
    pub fn apply_patch(&mut self, patch: Patch) {
        self.log.truncate(self.cursor);
        self.log.push(patch);
        self.cursor = self.log.len();
    }

    /// Step back one snapshot. Returns false at the baseline.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one snapshot. Returns false at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        if self.cursor == self.log.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Back to the single empty snapshot
    pub fn reset(&mut self) {
        self.log.clear();
        self.cursor = 0;
    }

    /// Patch sequence of the current snapshot
    pub fn current_patches(&self) -> &[Patch] {
        &self.log[..self.cursor]
    }

    /// Patch sequence of snapshot `index`, if it exists
    pub fn snapshot(&self, index: usize) -> Option<&[Patch]> {
        (index <= self.log.len()).then(|| &self.log[..index])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots including the empty baseline
    pub fn snapshot_count(&self) -> usize {
        self.log.len() + 1
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.log.len()
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.log.len() - self.cursor
    }

    /// Patch that the next undo would remove
    pub fn undo_patch(&self) -> Option<&Patch> {
        self.current_patches().last()
    }

    /// Patch that the next redo would reapply
    pub fn redo_patch(&self) -> Option<&Patch> {
        self.log.get(self.cursor)
    }
}
