//! Classifier identifiers and storage for the reference type model.
//!
//! `DefId` is the engine's type handle: an opaque, identity-comparable
//! reference to a class, interface, enum, or foreign classifier. The
//! resolver only ever compares and hashes it.
//!
//! `DefinitionStore` holds the declarations behind each handle for
//! [`TypeModel`](crate::model::TypeModel). Hosts with their own type system
//! implement [`TypeSystem`](crate::TypeSystem) directly and never touch it.

use crate::types::{CallableMember, ClassifierFlags, ClassifierInfo, TypeId, TypeParamId};
use dashmap::DashMap;
use memres_common::Atom;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `DefinitionStore` instances.
/// Used to tell stores apart in traces.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// DefId - Classifier Identifier
// =============================================================================

/// Type handle.
///
/// `DefId(0)` is reserved as the invalid sentinel so that a zeroed handle
/// from a host never aliases a real classifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }

    /// Dense index for bit sets.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// DefinitionInfo - Stored Classifier Data
// =============================================================================

/// Everything the reference model knows about one classifier.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub name: Atom,
    pub flags: ClassifierFlags,
    pub package: Atom,

    /// Generic parameters of the classifier, in declaration order.
    pub type_params: Vec<TypeParamId>,

    /// Direct supertypes, in declaration order.
    pub supertypes: Vec<TypeId>,

    /// Own members (no inheritance applied).
    pub members: Vec<Arc<CallableMember>>,
}

impl DefinitionInfo {
    fn with_flags(name: Atom, package: Atom, flags: ClassifierFlags) -> Self {
        Self {
            name,
            flags,
            package,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Create a new class definition.
    pub fn class(name: Atom, package: Atom) -> Self {
        Self::with_flags(name, package, ClassifierFlags::empty())
    }

    /// Create a new interface definition.
    pub fn interface(name: Atom, package: Atom) -> Self {
        Self::with_flags(name, package, ClassifierFlags::INTERFACE)
    }

    /// Create a new enum definition.
    pub fn enumeration(name: Atom, package: Atom) -> Self {
        Self::with_flags(name, package, ClassifierFlags::ENUM)
    }

    /// Mark the definition as declared by the host platform.
    pub fn foreign(mut self) -> Self {
        self.flags |= ClassifierFlags::FOREIGN;
        self
    }

    /// Mark the definition as the root `Any` classifier.
    pub fn root(mut self) -> Self {
        self.flags |= ClassifierFlags::ROOT;
        self
    }

    pub fn with_type_params(mut self, params: Vec<TypeParamId>) -> Self {
        self.type_params = params;
        self
    }

    pub fn with_supertypes(mut self, supertypes: Vec<TypeId>) -> Self {
        self.supertypes = supertypes;
        self
    }

    pub fn classifier_info(&self) -> ClassifierInfo {
        ClassifierInfo {
            name: self.name,
            flags: self.flags,
            package: self.package,
        }
    }
}

// =============================================================================
// DefinitionStore - Storage for Definitions
// =============================================================================

/// Thread-safe storage for classifier definitions.
///
/// Uses `DashMap` so a model can be populated and queried from several
/// threads. Definitions are registered first and completed afterwards
/// (`add_supertype`, `add_member`), since members and self-referential
/// supertypes need the definition's own `DefId`.
pub struct DefinitionStore {
    /// Unique instance ID for traces
    instance_id: u64,

    /// `DefId` -> `DefinitionInfo` mapping
    definitions: DashMap<DefId, DefinitionInfo, FxBuildHasher>,

    /// Next available `DefId`
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new - creating new instance");
        Self {
            instance_id,
            definitions: DashMap::with_hasher(FxBuildHasher),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    fn allocate(&self) -> DefId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        trace!(
            instance_id = self.instance_id,
            allocated_def_id = %id,
            "DefinitionStore::allocate"
        );
        DefId(id)
    }

    /// Register a new definition and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            def_id = %id.0,
            flags = ?info.flags,
            "DefinitionStore::register"
        );
        self.definitions.insert(id, info);
        id
    }

    /// Get definition info by `DefId`.
    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn get_classifier_info(&self, id: DefId) -> Option<ClassifierInfo> {
        self.definitions.get(&id).map(|r| r.classifier_info())
    }

    pub fn get_type_params(&self, id: DefId) -> Option<Vec<TypeParamId>> {
        self.definitions.get(&id).map(|r| r.type_params.clone())
    }

    pub fn get_supertypes(&self, id: DefId) -> Option<Vec<TypeId>> {
        self.definitions.get(&id).map(|r| r.supertypes.clone())
    }

    pub fn get_members(&self, id: DefId) -> Option<Vec<Arc<CallableMember>>> {
        self.definitions.get(&id).map(|r| r.members.clone())
    }

    pub fn get_name(&self, id: DefId) -> Option<Atom> {
        self.definitions.get(&id).map(|r| r.name)
    }

    /// Replace the type parameters of a definition.
    pub fn set_type_params(&self, id: DefId, params: Vec<TypeParamId>) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            entry.type_params = params;
        }
    }

    /// Append a direct supertype.
    pub fn add_supertype(&self, id: DefId, supertype: TypeId) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            entry.supertypes.push(supertype);
        }
    }

    /// Append an own member.
    pub fn add_member(&self, id: DefId, member: CallableMember) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            trace!(
                instance_id = self.instance_id,
                def_id = %id.0,
                kind = ?member.kind,
                "DefinitionStore::add_member"
            );
            entry.members.push(Arc::new(member));
        }
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Get all `DefIds`, sorted (for debugging/testing).
    pub fn all_ids(&self) -> Vec<DefId> {
        let mut ids: Vec<DefId> = self.definitions.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        ids
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
