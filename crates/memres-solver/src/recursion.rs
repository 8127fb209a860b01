//! Path tracking for the supertype walk.
//!
//! The hierarchy walker keeps an explicit stack, so this guard does not
//! protect the native call stack. It records the classifiers on the current
//! supertype path: a classifier met twice on one path closes a cycle. It also
//! bounds the path length and the total number of edges a walk may follow.

use crate::def::DefId;
use rustc_hash::FxHashSet;

/// Outcome of stepping onto a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Entered,
    /// Already on the current path.
    Cycle,
    /// Path length or edge budget exhausted.
    LimitExceeded,
}

/// Classifiers on the current supertype path.
///
/// Every [`PathStep::Entered`] must be matched by one [`leave`](Self::leave).
/// Debug builds panic when a guard is dropped with classifiers still on the
/// path.
pub struct PathGuard {
    on_path: FxHashSet<DefId>,
    steps: u32,
    max_depth: u32,
    max_steps: u32,
}

impl PathGuard {
    pub fn new(max_depth: u32, max_steps: u32) -> Self {
        Self {
            on_path: FxHashSet::default(),
            steps: 0,
            max_depth,
            max_steps,
        }
    }

    pub fn enter(&mut self, def: DefId) -> PathStep {
        self.steps = self.steps.saturating_add(1);
        if self.steps > self.max_steps {
            return PathStep::LimitExceeded;
        }
        if self.on_path.contains(&def) {
            return PathStep::Cycle;
        }
        if self.depth() >= self.max_depth {
            return PathStep::LimitExceeded;
        }
        self.on_path.insert(def);
        PathStep::Entered
    }

    pub fn leave(&mut self, def: DefId) {
        let removed = self.on_path.remove(&def);
        debug_assert!(removed, "PathGuard::leave({def:?}) without a matching enter");
    }

    pub fn depth(&self) -> u32 {
        self.on_path.len() as u32
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(debug_assertions)]
impl Drop for PathGuard {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.on_path.is_empty() {
            panic!(
                "PathGuard dropped with {} classifiers still on the path",
                self.on_path.len()
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
