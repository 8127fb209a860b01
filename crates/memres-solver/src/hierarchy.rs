//! Depth-first walk over the supertype DAG of a queried classifier.
//!
//! The walk is iterative: an explicit stack of frames, one per classifier
//! whose supertypes are still being resolved. A frame is finished (its
//! members assembled and cached) only after every direct supertype has a
//! cached result, so each classifier in the closure is assembled once, in
//! post-order. Diamonds hit the cache on the second path.
//!
//! A supertype that is already on the current path is a cycle. The edge is
//! pruned and logged, and the walk panics instead when
//! `ResolverOptions::assert_on_cycle` is set.

use crate::assembly::{InheritedEdge, MemberAssembler, ResolvedMembers};
use crate::cache::MemberCache;
use crate::coercion::SupertypeCoercion;
use crate::db::TypeSystem;
use crate::def::DefId;
use crate::errors::ResolveError;
use crate::options::ResolverOptions;
use crate::recursion::{PathGuard, PathStep};
use crate::substitution::Substitution;
use crate::types::{ClassifierInfo, TypeApplication};
use memres_common::limits::MAX_HIERARCHY_ITERATIONS;
use std::sync::Arc;
use tracing::{trace, warn};

struct SupertypeEdge {
    application: TypeApplication,
    classifier: DefId,
    substitution: Arc<Substitution>,
}

struct WalkFrame {
    def: DefId,
    info: ClassifierInfo,
    edges: Vec<SupertypeEdge>,
    /// Result per edge; `None` for pruned edges.
    resolved: Vec<Option<Arc<ResolvedMembers>>>,
    next: usize,
}

pub struct HierarchyWalker<'a> {
    ts: &'a dyn TypeSystem,
    cache: &'a MemberCache,
    coercion: &'a dyn SupertypeCoercion,
    options: &'a ResolverOptions,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(
        ts: &'a dyn TypeSystem,
        cache: &'a MemberCache,
        coercion: &'a dyn SupertypeCoercion,
        options: &'a ResolverOptions,
    ) -> Self {
        Self {
            ts,
            cache,
            coercion,
            options,
        }
    }

    /// Resolve `root` and every uncached classifier in its supertype closure.
    pub fn resolve(&self, root: DefId) -> Result<Arc<ResolvedMembers>, ResolveError> {
        if let Some(cached) = self.cache.peek(root) {
            return Ok(cached);
        }
        let mut guard = PathGuard::new(self.options.max_hierarchy_depth, MAX_HIERARCHY_ITERATIONS);
        let mut stack = Vec::new();
        let result = self.walk(root, &mut guard, &mut stack);
        // Frames left behind by an error are still entered.
        for frame in stack.iter().rev() {
            guard.leave(frame.def);
        }
        result
    }

    fn walk(
        &self,
        root: DefId,
        guard: &mut PathGuard,
        stack: &mut Vec<WalkFrame>,
    ) -> Result<Arc<ResolvedMembers>, ResolveError> {
        self.enter(root, root, guard, stack)?;

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.edges.len() {
                let idx = frame.next;
                frame.next += 1;
                let (def, classifier) = (frame.def, frame.edges[idx].classifier);
                if let Some(done) = self.cache.peek(classifier) {
                    frame.resolved[idx] = Some(done);
                    continue;
                }
                if !self.enter(root, classifier, guard, stack)? {
                    self.prune_cycle(def, classifier);
                }
                continue;
            }

            let Some(frame) = stack.pop() else {
                break;
            };
            guard.leave(frame.def);
            let members = self.finish(frame)?;
            match stack.last_mut() {
                Some(parent) => {
                    let idx = parent.next - 1;
                    parent.resolved[idx] = Some(members);
                }
                None => return Ok(members),
            }
        }

        // The stack starts with the root frame and only empties by returning.
        Err(ResolveError::UnknownClassifierKind { def: root })
    }

    /// Push a frame for `def`. `Ok(false)` if `def` is already on the path.
    fn enter(
        &self,
        root: DefId,
        def: DefId,
        guard: &mut PathGuard,
        stack: &mut Vec<WalkFrame>,
    ) -> Result<bool, ResolveError> {
        match guard.enter(def) {
            PathStep::Entered => match self.open_frame(def) {
                Ok(frame) => {
                    stack.push(frame);
                    Ok(true)
                }
                Err(err) => {
                    guard.leave(def);
                    Err(err)
                }
            },
            PathStep::Cycle => Ok(false),
            PathStep::LimitExceeded => Err(ResolveError::DepthLimitExceeded {
                root,
                limit: guard.max_depth(),
            }),
        }
    }

    fn open_frame(&self, def: DefId) -> Result<WalkFrame, ResolveError> {
        let ts = self.ts;
        let info = ts
            .classifier_info(def)
            .filter(ClassifierInfo::is_well_formed)
            .ok_or(ResolveError::UnknownClassifierKind { def })?;
        let composer = self.cache.composer();
        let edges = ts
            .direct_supertypes(def)
            .into_iter()
            .map(|raw| {
                let application = self.coercion.coerce(ts, raw);
                let classifier = ts.classifier_of(application)?;
                let substitution = composer.edge_substitution(ts, application)?;
                Ok(SupertypeEdge {
                    application,
                    classifier,
                    substitution,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;
        trace!(
            def = def.0,
            supertypes = edges.len(),
            "HierarchyWalker::open_frame"
        );
        Ok(WalkFrame {
            def,
            info,
            resolved: vec![None; edges.len()],
            edges,
            next: 0,
        })
    }

    fn prune_cycle(&self, def: DefId, supertype: DefId) {
        warn!(
            def = def.0,
            supertype = supertype.0,
            "HierarchyWalker: cyclic supertype edge pruned"
        );
        if self.options.assert_on_cycle {
            panic!(
                "cyclic supertype hierarchy: definition {} reaches definition {} again",
                def.0, supertype.0
            );
        }
    }

    fn finish(&self, frame: WalkFrame) -> Result<Arc<ResolvedMembers>, ResolveError> {
        let edges: Vec<InheritedEdge> = frame
            .edges
            .into_iter()
            .zip(frame.resolved)
            .filter_map(|(edge, members)| {
                members.map(|members| InheritedEdge {
                    application: edge.application,
                    substitution: edge.substitution,
                    members,
                })
            })
            .collect();
        let assembler =
            MemberAssembler::new(self.ts, self.cache.composer(), self.cache, self.options);
        let members = assembler.assemble(frame.def, &frame.info, &edges)?;
        Ok(self.cache.insert(members))
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
