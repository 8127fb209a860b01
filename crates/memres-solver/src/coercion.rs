//! Supertype coercion hook, run on every direct supertype before its
//! classifier is looked up.
//!
//! Host platforms expose some supertypes through a different classifier
//! than the one that declares their members. The typical case is a
//! flexible collection supertype `(MutableList<T>..List<T>?)` coming from
//! foreign code, whose mutable view has no member table of its own.

use crate::db::TypeSystem;
use crate::def::DefId;
use crate::types::TypeApplication;
use rustc_hash::FxHashMap;

pub trait SupertypeCoercion: Send + Sync {
    fn coerce(&self, ts: &dyn TypeSystem, application: TypeApplication) -> TypeApplication;
}

/// Leaves every supertype unchanged.
pub struct IdentityCoercion;

impl SupertypeCoercion for IdentityCoercion {
    fn coerce(&self, _ts: &dyn TypeSystem, application: TypeApplication) -> TypeApplication {
        application
    }
}

/// Maps view classifiers onto the canonical classifier that owns the
/// members.
///
/// A flexible supertype whose upper bound belongs to a registered alias
/// family is replaced by that upper bound; an application of an alias is
/// then rebound to its canonical classifier with the same arguments.
#[derive(Default)]
pub struct ClassifierAliasCoercion {
    aliases: FxHashMap<DefId, DefId>,
}

impl ClassifierAliasCoercion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as a view of `canonical`.
    pub fn alias(mut self, alias: DefId, canonical: DefId) -> Self {
        self.aliases.insert(alias, canonical);
        self
    }

    pub fn canonical(&self, def: DefId) -> Option<DefId> {
        self.aliases.get(&def).copied()
    }

    fn in_family(&self, def: DefId) -> bool {
        self.aliases.contains_key(&def) || self.aliases.values().any(|c| *c == def)
    }
}

impl SupertypeCoercion for ClassifierAliasCoercion {
    fn coerce(&self, ts: &dyn TypeSystem, application: TypeApplication) -> TypeApplication {
        let application = match ts.flexible_upper_bound(application.type_id()) {
            Some(upper)
                if ts
                    .classifier_of(TypeApplication(upper))
                    .is_ok_and(|def| self.in_family(def)) =>
            {
                TypeApplication(upper)
            }
            _ => application,
        };
        match ts.classifier_of(application).ok().and_then(|def| self.canonical(def)) {
            Some(canonical) => ts.with_classifier(application, canonical),
            None => application,
        }
    }
}

#[cfg(test)]
#[path = "../tests/coercion_tests.rs"]
mod tests;
