//! Substitutions and their composition along supertype chains.
//!
//! A member declared on `Base<T>` and inherited by `Leaf` through
//! `Mid : Base<List<U>>` and `Leaf : Mid<String>` accumulates
//! `{T ↦ List<U>}` at `Mid` and `{U ↦ String} ∘ {T ↦ List<U>}` at `Leaf`.
//! The external type system produces the per-edge substitutions and applies
//! them; this module only sequences and caches them.

use crate::db::TypeSystem;
use crate::errors::ResolveError;
use crate::types::{TypeApplication, TypeId, TypeParamId};
use dashmap::DashMap;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::trace;

/// Mapping from type parameters to type references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    mapping: IndexMap<TypeParamId, TypeId, FxBuildHasher>,
}

impl Substitution {
    /// The identity substitution carried by freshly declared members.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (TypeParamId, TypeId)>) -> Self {
        Self {
            mapping: pairs.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, param: TypeParamId, type_id: TypeId) {
        self.mapping.insert(param, type_id);
    }

    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.mapping.get(&param).copied()
    }

    pub fn contains(&self, param: TypeParamId) -> bool {
        self.mapping.contains_key(&param)
    }

    pub fn is_identity(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeParamId, TypeId)> + '_ {
        self.mapping.iter().map(|(p, t)| (*p, *t))
    }

    /// `outer ∘ self`: apply `outer` to the range of `self`, then add the
    /// mappings of `outer` that `self` does not define.
    pub fn then(&self, outer: &Substitution, ts: &dyn TypeSystem) -> Substitution {
        let mut composed = Substitution {
            mapping: IndexMap::with_capacity_and_hasher(
                self.mapping.len() + outer.mapping.len(),
                FxBuildHasher,
            ),
        };
        for (param, type_id) in self.iter() {
            composed.insert(param, ts.substitute(type_id, outer));
        }
        for (param, type_id) in outer.iter() {
            if !composed.contains(param) {
                composed.insert(param, type_id);
            }
        }
        composed
    }

    /// Substitution that renames `from[i]` to the type of `to[i]`.
    ///
    /// Used to compare two generic members positionally: the other member's
    /// type parameters are substituted into this member's signature.
    pub fn eliminating(
        from: &[TypeParamId],
        to: &[TypeParamId],
        ts: &dyn TypeSystem,
    ) -> Substitution {
        if from.is_empty() || to.is_empty() {
            return Substitution::identity();
        }
        Substitution::from_pairs(
            from.iter()
                .zip(to)
                .map(|(x, y)| (*x, ts.type_parameter_type(*y))),
        )
    }
}

// =============================================================================
// SubstitutionComposer
// =============================================================================

/// Caches per-edge substitutions and composes accumulated ones.
///
/// Owned by the `MemberCache` of a session; every supertype application is
/// asked for its substitutor at most once per successful lookup.
pub struct SubstitutionComposer {
    edges: DashMap<TypeApplication, Arc<Substitution>, FxBuildHasher>,
}

impl Default for SubstitutionComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionComposer {
    pub fn new() -> Self {
        Self {
            edges: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Substitution implied by instantiating a supertype's parameters.
    ///
    /// Fails with [`ResolveError::UnresolvedSupertype`] when the application
    /// carries a star projection. Failures are not cached.
    pub fn edge_substitution(
        &self,
        ts: &dyn TypeSystem,
        application: TypeApplication,
    ) -> Result<Arc<Substitution>, ResolveError> {
        if let Some(cached) = self.edges.get(&application) {
            return Ok(Arc::clone(cached.value()));
        }
        let substitution = Arc::new(ts.substitutor_for(application)?);
        trace!(
            application = application.0.0,
            mappings = substitution.len(),
            "SubstitutionComposer::edge_substitution"
        );
        Ok(Arc::clone(
            self.edges
                .entry(application)
                .or_insert(substitution)
                .value(),
        ))
    }

    /// `edge ∘ accumulated`, sharing the input when either side is identity.
    pub fn compose(
        &self,
        ts: &dyn TypeSystem,
        accumulated: &Arc<Substitution>,
        edge: &Arc<Substitution>,
    ) -> Arc<Substitution> {
        if edge.is_identity() {
            return Arc::clone(accumulated);
        }
        if accumulated.is_identity() {
            return Arc::clone(edge);
        }
        Arc::new(accumulated.then(edge, ts))
    }

    /// Compose `accumulated` with the substitution of `application`.
    pub fn compose_along(
        &self,
        ts: &dyn TypeSystem,
        accumulated: &Arc<Substitution>,
        application: TypeApplication,
    ) -> Result<Arc<Substitution>, ResolveError> {
        let edge = self.edge_substitution(ts, application)?;
        Ok(self.compose(ts, accumulated, &edge))
    }

    /// Number of cached edge substitutions.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&self) {
        self.edges.clear();
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
