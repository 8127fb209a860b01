//! Signature keys: the equality used to recognize "the same logical member"
//! arriving from different supertypes.
//!
//! Two regimes coexist:
//!
//! - **Logical** keys compare kind, name, static-ness and the number of
//!   generic parameters, then compare parameters pairwise by mutual
//!   subtyping after renaming the other member's generic parameters onto
//!   this member's. Equality is not transitive (flexible types are
//!   equivalent to both of their bounds), so logical keys are bucketed by
//!   shape and matched by scanning.
//! - **Binary** keys compare kind, name, static-ness and the erased
//!   parameter list exactly, the way a host-platform method descriptor does.
//!
//! Keys carry their regime; comparing keys of different regimes panics.

use crate::db::TypeSystem;
use crate::errors::ResolveError;
use crate::overrides::OverrideResolver;
use crate::substitution::Substitution;
use crate::types::{ErasedType, MemberKind, ResolvedMember, TypeId, TypeParamId};
use memres_common::Atom;
use memres_common::limits::MEMBER_TABLE_CAPACITY;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::cmp::Ordering;
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureMode {
    Logical,
    Binary,
}

/// The hashable part of a signature key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SignatureShape {
    pub kind: MemberKind,
    pub name: Atom,
    pub is_static: bool,
    /// Always zero for binary keys: generic parameters are erased.
    pub type_parameter_count: u32,
    pub parameter_count: u32,
}

#[derive(Clone, Debug)]
pub struct LogicalSignature {
    shape: SignatureShape,
    type_parameters: SmallVec<[TypeParamId; 2]>,
    parameters: SmallVec<[TypeId; 4]>,
}

impl LogicalSignature {
    fn matches(&self, other: &LogicalSignature, ts: &dyn TypeSystem) -> bool {
        if self.shape != other.shape {
            return false;
        }
        let eliminator =
            Substitution::eliminating(&other.type_parameters, &self.type_parameters, ts);
        self.parameters
            .iter()
            .zip(&other.parameters)
            .all(|(mine, theirs)| ts.is_equivalent(*mine, ts.substitute(*theirs, &eliminator)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinarySignature {
    shape: SignatureShape,
    erased: SmallVec<[ErasedType; 4]>,
}

/// Signature key of a resolved member under one regime.
#[derive(Clone, Debug)]
pub enum SignatureKey {
    Logical(LogicalSignature),
    Binary(BinarySignature),
}

impl SignatureKey {
    /// Key of `member` as viewed through the queried classifier.
    ///
    /// # Panics
    ///
    /// Panics if a `ForeignField` carries parameters or generic parameters.
    pub fn new(mode: SignatureMode, member: &ResolvedMember, ts: &dyn TypeSystem) -> Self {
        let parameters: SmallVec<[TypeId; 4]> = member.signature_parameters().collect();
        assert!(
            member.kind() != MemberKind::ForeignField
                || (parameters.is_empty() && member.type_parameters().is_empty()),
            "foreign field '{}' cannot have parameters or type parameters",
            ts.interner().display(member.name())
        );
        let shape = SignatureShape {
            kind: member.kind(),
            name: member.name(),
            is_static: member.is_static(),
            type_parameter_count: 0,
            parameter_count: parameters.len() as u32,
        };
        match mode {
            SignatureMode::Logical => Self::Logical(LogicalSignature {
                shape: SignatureShape {
                    type_parameter_count: member.type_parameters().len() as u32,
                    ..shape
                },
                type_parameters: member.type_parameters().iter().copied().collect(),
                parameters,
            }),
            SignatureMode::Binary => Self::Binary(BinarySignature {
                shape,
                erased: parameters.iter().map(|t| ts.erase(*t)).collect(),
            }),
        }
    }

    pub fn mode(&self) -> SignatureMode {
        match self {
            Self::Logical(_) => SignatureMode::Logical,
            Self::Binary(_) => SignatureMode::Binary,
        }
    }

    pub fn shape(&self) -> SignatureShape {
        match self {
            Self::Logical(key) => key.shape,
            Self::Binary(key) => key.shape,
        }
    }

    /// Whether both keys denote the same logical member.
    ///
    /// # Panics
    ///
    /// Panics if the keys belong to different regimes.
    pub fn matches(&self, other: &SignatureKey, ts: &dyn TypeSystem) -> bool {
        match (self, other) {
            (Self::Logical(a), Self::Logical(b)) => a.matches(b, ts),
            (Self::Binary(a), Self::Binary(b)) => a == b,
            _ => panic!(
                "cannot compare a {:?} signature key with a {:?} signature key",
                self.mode(),
                other.mode()
            ),
        }
    }
}

// =============================================================================
// SignatureTable
// =============================================================================

struct TableEntry {
    key: SignatureKey,
    /// Members no other candidate dominates, in arrival order. The entry
    /// resolves when exactly one is left.
    candidates: SmallVec<[ResolvedMember; 1]>,
    /// Clash between the two oldest candidates; cleared if an own
    /// declaration replaces the entry.
    conflict: Option<ResolveError>,
}

impl TableEntry {
    fn member(&self) -> &ResolvedMember {
        &self.candidates[0]
    }
}

/// Insertion-ordered map from signature key to the winning member.
///
/// Entries are bucketed by [`SignatureShape`] and matched with
/// [`SignatureKey::matches`] inside a bucket.
pub struct SignatureTable {
    mode: SignatureMode,
    buckets: FxHashMap<SignatureShape, SmallVec<[usize; 1]>>,
    entries: Vec<Option<TableEntry>>,
    live: usize,
}

impl SignatureTable {
    pub fn new(mode: SignatureMode) -> Self {
        Self {
            mode,
            buckets: FxHashMap::with_capacity_and_hasher(MEMBER_TABLE_CAPACITY, FxBuildHasher),
            entries: Vec::with_capacity(MEMBER_TABLE_CAPACITY),
            live: 0,
        }
    }

    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn find(&self, key: &SignatureKey, ts: &dyn TypeSystem) -> Option<usize> {
        self.buckets.get(&key.shape())?.iter().copied().find(|idx| {
            self.entries[*idx]
                .as_ref()
                .is_some_and(|entry| entry.key.matches(key, ts))
        })
    }

    fn push(&mut self, key: SignatureKey, member: ResolvedMember) {
        let idx = self.entries.len();
        self.buckets.entry(key.shape()).or_default().push(idx);
        self.entries.push(Some(TableEntry {
            key,
            candidates: smallvec![member],
            conflict: None,
        }));
        self.live += 1;
    }

    /// Merge an inherited member, keeping the most specific override.
    ///
    /// Candidates that clash on unrelated return types stay on the entry
    /// until a later member dominates all of them, so the outcome does not
    /// depend on supertype order. A clash that survives is reported by
    /// [`first_conflict`](Self::first_conflict), so that an own declaration
    /// can still resolve it.
    pub fn merge(
        &mut self,
        key: SignatureKey,
        member: ResolvedMember,
        resolver: &OverrideResolver<'_>,
    ) {
        let Some(idx) = self.find(&key, resolver.type_system()) else {
            self.push(key, member);
            return;
        };
        let Some(entry) = self.entries[idx].as_mut() else {
            return;
        };
        let dominated = entry.candidates.iter().any(|candidate| {
            matches!(
                resolver.compare(candidate, &member),
                Ok(Ordering::Less | Ordering::Equal)
            )
        });
        if dominated {
            return;
        }
        let before = entry.candidates.len();
        entry.candidates.retain(|candidate| {
            !matches!(resolver.compare(&member, candidate), Ok(Ordering::Less))
        });
        trace!(
            owner = member.owner().0,
            distance = member.distance(),
            replaced = before - entry.candidates.len(),
            "SignatureTable::merge - undominated override"
        );
        entry.candidates.push(member);
        entry.conflict = match entry.candidates.as_slice() {
            [first, second, ..] => resolver.compare(first, second).err(),
            _ => None,
        };
        if let Some(conflict) = &entry.conflict {
            trace!(kind = conflict.kind(), "SignatureTable::merge - conflicting override");
        }
    }

    /// Insert an own declaration, replacing every inherited entry with a
    /// matching key. Own declarations never replace each other.
    pub fn overlay(&mut self, key: SignatureKey, member: ResolvedMember, ts: &dyn TypeSystem) {
        if let Some(bucket) = self.buckets.get_mut(&key.shape()) {
            let entries = &mut self.entries;
            let mut removed = 0;
            bucket.retain(|idx| {
                let inherited_match = entries[*idx]
                    .as_ref()
                    .is_some_and(|entry| {
                        entry.member().distance() > 0 && entry.key.matches(&key, ts)
                    });
                if inherited_match {
                    entries[*idx] = None;
                    removed += 1;
                }
                !inherited_match
            });
            self.live -= removed;
        }
        self.push(key, member);
    }

    /// The first unresolved clash, in insertion order.
    pub fn first_conflict(&self) -> Option<&ResolveError> {
        self.entries
            .iter()
            .flatten()
            .find_map(|entry| entry.conflict.as_ref())
    }

    /// Live members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &ResolvedMember> + '_ {
        self.entries.iter().flatten().map(TableEntry::member)
    }

    pub fn into_members(self) -> Vec<ResolvedMember> {
        self.entries
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.candidates.into_iter().next())
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/signature_tests.rs"]
mod tests;
