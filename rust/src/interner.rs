//! Task id interning.
//!
//! Maps caller-supplied string ids to dense arena indices so the passes can
//! use plain `Vec` indexing. Indices follow first-occurrence order. The
//! display side (index back to id) lives on the graph's nodes.

use rustc_hash::FxHashMap;

/// Arena index of a task.
pub type TaskIdx = usize;

#[derive(Debug, Clone, Default)]
pub struct TaskIdInterner {
    to_idx: FxHashMap<String, TaskIdx>,
}

impl TaskIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Intern an id. The flag is `false` when the id was already known, so
    /// the caller can decide how to treat the duplicate.
    pub fn intern(&mut self, id: &str) -> (TaskIdx, bool) {
        if let Some(&idx) = self.to_idx.get(id) {
            return (idx, false);
        }
        let idx = self.to_idx.len();
        self.to_idx.insert(id.to_string(), idx);
        (idx, true)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }
}
