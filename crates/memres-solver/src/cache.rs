//! Session-owned memo of resolved member sets.
//!
//! Keyed by classifier identity. Resolution is pure, so a requester that
//! loses a race computes redundantly and adopts the entry that was inserted
//! first; the discarded result is identical.

use crate::assembly::ResolvedMembers;
use crate::def::DefId;
use crate::overrides::Ancestry;
use crate::substitution::SubstitutionComposer;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Point-in-time cache counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub entries: usize,
    pub edge_substitutions: usize,
    pub hits: u64,
    pub misses: u64,
    /// Results computed by a requester that lost the insertion race.
    pub redundant_computations: u64,
}

pub struct MemberCache {
    members: DashMap<DefId, Arc<ResolvedMembers>, FxBuildHasher>,
    composer: SubstitutionComposer,
    hits: AtomicU64,
    misses: AtomicU64,
    redundant: AtomicU64,
}

impl Default for MemberCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberCache {
    pub fn new() -> Self {
        Self {
            members: DashMap::with_hasher(FxBuildHasher),
            composer: SubstitutionComposer::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            redundant: AtomicU64::new(0),
        }
    }

    pub fn composer(&self) -> &SubstitutionComposer {
        &self.composer
    }

    /// Look up `def`, counting the probe.
    pub fn probe(&self, def: DefId) -> Option<Arc<ResolvedMembers>> {
        let found = self.peek(def);
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        trace!(def = def.0, hit = found.is_some(), "MemberCache::probe");
        found
    }

    /// Look up `def` without touching the counters.
    pub fn peek(&self, def: DefId) -> Option<Arc<ResolvedMembers>> {
        self.members.get(&def).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, def: DefId) -> bool {
        self.members.contains_key(&def)
    }

    /// Insert a freshly computed result. Returns the cached entry, which is
    /// an earlier insertion if another thread got there first.
    pub fn insert(&self, members: ResolvedMembers) -> Arc<ResolvedMembers> {
        let def = members.def();
        let members = Arc::new(members);
        let entry = self.members.entry(def).or_insert_with(|| Arc::clone(&members));
        if !Arc::ptr_eq(entry.value(), &members) {
            self.redundant.fetch_add(1, Ordering::Relaxed);
            trace!(def = def.0, "MemberCache::insert - discarding redundant result");
        }
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop every cached result, e.g. after the type model was reloaded.
    pub fn clear(&self) {
        self.members.clear();
        self.composer.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.redundant.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            entries: self.members.len(),
            edge_substitutions: self.composer.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            redundant_computations: self.redundant.load(Ordering::Relaxed),
        }
    }
}

impl Ancestry for MemberCache {
    fn is_strict_subclass(&self, sub: DefId, sup: DefId) -> bool {
        self.members
            .get(&sub)
            .is_some_and(|entry| entry.is_descendant_of(sup))
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
