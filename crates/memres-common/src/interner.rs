//! Concurrent string interner.
//!
//! Member names, classifier names and package identifiers are compared far
//! more often than they are printed, so they are stored as `Atom` handles.
//! The interner is shared between threads: the type model is built once and
//! then queried from any number of resolution requests.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Interned string handle.
///
/// Two atoms produced by the same [`Interner`] are equal iff their strings
/// are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty string. Always interned first.
    pub const EMPTY: Self = Self(0);
}

/// Thread-safe string interner backed by two `DashMap`s.
pub struct Interner {
    ids: DashMap<Arc<str>, Atom, FxBuildHasher>,
    strings: DashMap<Atom, Arc<str>, FxBuildHasher>,
    next: AtomicU32,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let interner = Self {
            ids: DashMap::with_hasher(FxBuildHasher),
            strings: DashMap::with_hasher(FxBuildHasher),
            next: AtomicU32::new(0),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Atom::EMPTY);
        interner
    }

    /// Intern `text`, returning the existing atom if it was seen before.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(existing) = self.ids.get(text) {
            return *existing;
        }
        let key: Arc<str> = Arc::from(text);
        match self.ids.entry(key.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let atom = Atom(self.next.fetch_add(1, Ordering::Relaxed));
                self.strings.insert(atom, key);
                *entry.insert(atom)
            }
        }
    }

    /// Look up the string for `atom`.
    pub fn resolve(&self, atom: Atom) -> Option<Arc<str>> {
        self.strings.get(&atom).map(|s| Arc::clone(s.value()))
    }

    /// Look up the string for `atom`, falling back to `#<index>` for atoms
    /// that came from another interner.
    pub fn display(&self, atom: Atom) -> String {
        match self.resolve(atom) {
            Some(text) => text.to_string(),
            None => format!("#{}", atom.0),
        }
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
