//! Filter/assembly: turns the resolved supertypes of one classifier and its
//! own declarations into the member sets reported for it.
//!
//! Inheritance suppression:
//! - Private members are never inherited, but are listed on their owner.
//! - Statics declared on an interface are never inherited, but are listed
//!   on the interface. Enum statics are ordinary transitive members.
//! - Package-private members are inherited only within the owner's
//!   package; elsewhere they are dropped during the merge.
//!
//! Three sets come out of assembly. `transitive` is what subtypes inherit.
//! `own_only` holds the own members that are listed but never inherited.
//! `reported` is their union, with own-only members replacing inherited
//! entries that share their key.

use crate::db::TypeSystem;
use crate::def::DefId;
use crate::errors::ResolveError;
use crate::options::{ResolverOptions, RevisitPolicy};
use crate::overrides::{Ancestry, OverrideResolver};
use crate::signature::{SignatureKey, SignatureMode, SignatureTable};
use crate::substitution::{Substitution, SubstitutionComposer};
use crate::types::{
    CallableMember, ClassifierInfo, MemberScope, Origin, ResolvedMember, TypeApplication,
    Visibility,
};
use fixedbitset::FixedBitSet;
use memres_common::Atom;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// Where an own declaration ends up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Overlaid onto the inherited table; subtypes inherit it.
    Transitive,
    /// Listed on the owner only.
    OwnOnly,
}

pub fn placement(owner: &ClassifierInfo, member: &CallableMember) -> Placement {
    if member.visibility == Visibility::Private {
        return Placement::OwnOnly;
    }
    if member.is_static && owner.is_interface() {
        return Placement::OwnOnly;
    }
    Placement::Transitive
}

/// One resolved direct supertype edge.
pub struct InheritedEdge {
    pub application: TypeApplication,
    pub substitution: Arc<Substitution>,
    pub members: Arc<ResolvedMembers>,
}

// =============================================================================
// ResolvedMembers
// =============================================================================

/// The cached result of resolving one classifier.
#[derive(Debug)]
pub struct ResolvedMembers {
    def: DefId,
    mode: SignatureMode,
    transitive: Arc<[ResolvedMember]>,
    own_only: Arc<[ResolvedMember]>,
    reported: Arc<[ResolvedMember]>,
    /// Some transitive member is static.
    has_static: bool,
    /// Some transitive member is package-private.
    has_package_private: bool,
    /// Some reported member is static.
    reports_static: bool,
    /// Transitive supertypes, indexed by `DefId`.
    ancestors: FixedBitSet,
    has_native: bool,
    has_foreign: bool,
}

impl ResolvedMembers {
    pub fn def(&self) -> DefId {
        self.def
    }

    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    /// Members subtypes inherit, including own non-private declarations.
    pub fn transitive(&self) -> &Arc<[ResolvedMember]> {
        &self.transitive
    }

    /// Own members listed here but never inherited.
    pub fn own_only(&self) -> &Arc<[ResolvedMember]> {
        &self.own_only
    }

    /// Everything a reflective member listing reports.
    pub fn reported(&self) -> &Arc<[ResolvedMember]> {
        &self.reported
    }

    pub fn has_static(&self) -> bool {
        self.has_static
    }

    pub fn has_package_private(&self) -> bool {
        self.has_package_private
    }

    pub fn is_descendant_of(&self, sup: DefId) -> bool {
        sup != self.def && self.ancestors.contains(sup.index())
    }

    /// Transitive supertypes in `DefId` order.
    pub fn ancestors(&self) -> impl Iterator<Item = DefId> + '_ {
        self.ancestors.ones().map(|idx| DefId(idx as u32))
    }

    /// Whether the classifier or any supertype is native.
    pub fn has_native(&self) -> bool {
        self.has_native
    }

    /// Whether the classifier or any supertype is foreign.
    pub fn has_foreign(&self) -> bool {
        self.has_foreign
    }

    /// Reported members of one scope.
    pub fn partition(&self, scope: MemberScope) -> Arc<[ResolvedMember]> {
        if !self.reports_static {
            return match scope {
                MemberScope::Instance => Arc::clone(&self.reported),
                MemberScope::Static => Arc::from(Vec::new()),
            };
        }
        let want_static = scope == MemberScope::Static;
        self.reported
            .iter()
            .filter(|m| m.is_static() == want_static)
            .cloned()
            .collect()
    }

    /// Own declarations, both transitive and own-only.
    pub fn declared(&self) -> Arc<[ResolvedMember]> {
        self.reported
            .iter()
            .filter(|m| m.distance() == 0)
            .cloned()
            .collect()
    }
}

// =============================================================================
// MemberAssembler
// =============================================================================

/// Merges the resolved supertypes of a classifier with its own members.
pub struct MemberAssembler<'a> {
    ts: &'a dyn TypeSystem,
    composer: &'a SubstitutionComposer,
    ancestry: &'a dyn Ancestry,
    options: &'a ResolverOptions,
}

impl<'a> MemberAssembler<'a> {
    pub fn new(
        ts: &'a dyn TypeSystem,
        composer: &'a SubstitutionComposer,
        ancestry: &'a dyn Ancestry,
        options: &'a ResolverOptions,
    ) -> Self {
        Self {
            ts,
            composer,
            ancestry,
            options,
        }
    }

    pub fn assemble(
        &self,
        def: DefId,
        info: &ClassifierInfo,
        edges: &[InheritedEdge],
    ) -> Result<ResolvedMembers, ResolveError> {
        let ts = self.ts;

        let mut ancestors = FixedBitSet::with_capacity(def.index() + 1);
        let mut has_native = info.origin() == Origin::Native;
        let mut has_foreign = info.origin() == Origin::Foreign;
        for edge in edges {
            let sup = &edge.members;
            let len = ancestors.len().max(sup.ancestors.len()).max(sup.def.index() + 1);
            ancestors.grow(len);
            ancestors.insert(sup.def.index());
            ancestors.union_with(&sup.ancestors);
            has_native |= sup.has_native;
            has_foreign |= sup.has_foreign;
        }

        let mode = self.options.signature_mode.mode_for(has_native, has_foreign);
        let resolver = OverrideResolver::new(ts, self.ancestry);
        let mut table = SignatureTable::new(mode);

        let mut packages: FxHashMap<DefId, Atom> = FxHashMap::default();
        let mut contributed: FxHashSet<DefId> = FxHashSet::default();
        for edge in edges {
            let sup = &edge.members;
            trace!(
                def = def.0,
                supertype = edge.application.type_id().0,
                classifier = sup.def.0,
                members = sup.transitive.len(),
                "MemberAssembler::assemble - merging supertype"
            );
            let mut owners: FxHashSet<DefId> = FxHashSet::default();
            for member in sup.transitive.iter() {
                if self.options.revisit_policy == RevisitPolicy::FirstPathWins {
                    if contributed.contains(&member.owner()) {
                        continue;
                    }
                    owners.insert(member.owner());
                }
                if sup.has_package_private
                    && member.visibility() == Visibility::PackagePrivate
                    && !self.same_package(&mut packages, member.owner(), info.package)
                {
                    trace!(
                        def = def.0,
                        owner = member.owner().0,
                        "MemberAssembler::assemble - package-private member not inherited"
                    );
                    continue;
                }
                let inherited = member.inherit(&edge.substitution, def, self.composer, ts);
                let key = SignatureKey::new(mode, &inherited, ts);
                table.merge(key, inherited, &resolver);
            }
            contributed.extend(owners);
        }

        let mut own_only = Vec::new();
        for member in ts.declared_members(def) {
            let placed = placement(info, &member);
            let resolved = ResolvedMember::declared(member, def);
            match placed {
                Placement::Transitive => {
                    let key = SignatureKey::new(mode, &resolved, ts);
                    table.overlay(key, resolved, ts);
                }
                Placement::OwnOnly => own_only.push(resolved),
            }
        }

        if let Some(conflict) = table.first_conflict() {
            return Err(conflict.clone());
        }

        let transitive: Arc<[ResolvedMember]> = table.members().cloned().collect();
        let reported = if own_only.is_empty() {
            Arc::clone(&transitive)
        } else {
            for member in &own_only {
                let key = SignatureKey::new(mode, member, ts);
                table.overlay(key, member.clone(), ts);
            }
            Arc::from(table.into_members())
        };

        let has_static = transitive.iter().any(|m| m.is_static());
        let has_package_private = transitive
            .iter()
            .any(|m| m.visibility() == Visibility::PackagePrivate);
        let reports_static = has_static || own_only.iter().any(|m| m.is_static());

        debug!(
            def = def.0,
            mode = ?mode,
            transitive = transitive.len(),
            own_only = own_only.len(),
            reported = reported.len(),
            "MemberAssembler::assemble"
        );

        Ok(ResolvedMembers {
            def,
            mode,
            transitive,
            own_only: Arc::from(own_only),
            reported,
            has_static,
            has_package_private,
            reports_static,
            ancestors,
            has_native,
            has_foreign,
        })
    }

    fn same_package(
        &self,
        packages: &mut FxHashMap<DefId, Atom>,
        owner: DefId,
        package: Atom,
    ) -> bool {
        let owner_package = *packages.entry(owner).or_insert_with(|| {
            self.ts
                .classifier_info(owner)
                .map_or(Atom::EMPTY, |info| info.package)
        });
        owner_package == package
    }
}

#[cfg(test)]
#[path = "../tests/assembly_tests.rs"]
mod tests;
