//! Public entry points of the engine.
//!
//! ```ignore
//! let cache = MemberCache::new();
//! let resolver = MemberResolver::new(&model, &cache);
//! let members = resolver.resolve_all_members(leaf)?;
//! ```

use crate::assembly::ResolvedMembers;
use crate::cache::MemberCache;
use crate::caches::query_trace;
use crate::coercion::{IdentityCoercion, SupertypeCoercion};
use crate::db::TypeSystem;
use crate::def::DefId;
use crate::errors::ResolveError;
use crate::hierarchy::HierarchyWalker;
use crate::options::ResolverOptions;
use crate::types::{MemberScope, ResolvedMember};
use std::sync::Arc;
use tracing::debug;

/// Resolves the member sets of classifiers of one type model.
///
/// Cheap to construct; all memoized state lives in the borrowed
/// [`MemberCache`], which must only be shared between resolvers over the
/// same model, options and coercion.
pub struct MemberResolver<'a> {
    ts: &'a dyn TypeSystem,
    cache: &'a MemberCache,
    coercion: &'a dyn SupertypeCoercion,
    options: ResolverOptions,
}

impl<'a> MemberResolver<'a> {
    pub fn new(ts: &'a dyn TypeSystem, cache: &'a MemberCache) -> Self {
        Self {
            ts,
            cache,
            coercion: &IdentityCoercion,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_coercion(mut self, coercion: &'a dyn SupertypeCoercion) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn cache(&self) -> &MemberCache {
        self.cache
    }

    /// Full resolution result of `def`, computed at most once per cache.
    pub fn resolve(&self, def: DefId) -> Result<Arc<ResolvedMembers>, ResolveError> {
        HierarchyWalker::new(self.ts, self.cache, self.coercion, &self.options).resolve(def)
    }

    /// Every member a reflective listing of `def` reports: inherited members
    /// plus own members that are never inherited.
    pub fn resolve_all_members(&self, def: DefId) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        self.query("resolve_all_members", def, |members| {
            Arc::clone(members.reported())
        })
    }

    /// Reported members of `def` with (`Static`) or without (`Instance`)
    /// an instance receiver.
    pub fn resolve_members(
        &self,
        def: DefId,
        scope: MemberScope,
    ) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        let op = match scope {
            MemberScope::Static => "resolve_static_members",
            MemberScope::Instance => "resolve_instance_members",
        };
        self.query(op, def, |members| members.partition(scope))
    }

    /// Members subtypes of `def` inherit, without own-only members.
    pub fn resolve_inherited_members(
        &self,
        def: DefId,
    ) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        self.query("resolve_inherited_members", def, |members| {
            Arc::clone(members.transitive())
        })
    }

    /// Reported members declared on `def` itself.
    pub fn resolve_declared_members(
        &self,
        def: DefId,
    ) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        self.query("resolve_declared_members", def, ResolvedMembers::declared)
    }

    fn query(
        &self,
        op: &'static str,
        def: DefId,
        project: impl FnOnce(&ResolvedMembers) -> Arc<[ResolvedMember]>,
    ) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::members_start(query_id, op, def);
        }

        let cached = self.cache.probe(def);
        let cache_hit = cached.is_some();
        let resolved = match cached {
            Some(members) => Ok(members),
            None => self.resolve(def),
        };

        match resolved {
            Ok(members) => {
                let result = project(&members);
                if let Some(query_id) = query_id {
                    query_trace::members_end(query_id, op, result.len(), cache_hit);
                }
                Ok(result)
            }
            Err(err) => {
                debug!(def = def.0, op, error = %err, "MemberResolver: resolution failed");
                if let Some(query_id) = query_id {
                    query_trace::members_error(query_id, op, err.kind());
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
