//! In-memory reference implementation of [`TypeSystem`].
//!
//! The model is deliberately small: nominal classifiers with invariant type
//! arguments and star projections, type parameters with upper bounds,
//! nullable types, flexible `(lower..upper)` platform types, a root `Any`
//! classifier and a bottom `Nothing`. It is used by the engine's tests and
//! benches and by hosts that do not bring their own type system.
//!
//! Subtyping rules:
//! - `Nothing <: T` for all `T`; `T <: Any` for every non-nullable `T`.
//! - `(L..U) <: T` iff `L <: T`; `T <: (L..U)` iff `T <: U`.
//! - `S? <: T?` iff `S <: T`; `S <: T?` iff `S <: T`; `S? <: T` never.
//! - A type parameter is a subtype of its upper bound (default `Any?`).
//! - `C<A..> <: D<B..>` walks `C`'s supertypes with `C`'s parameters
//!   substituted; on `C == D` arguments must be equivalent, a star on the
//!   right accepts anything.

use crate::db::TypeSystem;
use crate::def::{DefId, DefinitionInfo, DefinitionStore};
use crate::errors::ResolveError;
use crate::substitution::Substitution;
use crate::types::{
    CallableMember, ClassifierInfo, ErasedType, TypeApplication, TypeId, TypeParamId,
    TypeProjection,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use memres_common::limits::MAX_SUBTYPE_DEPTH;
use memres_common::{Atom, Interner};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Structural representation of a type in the reference model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Nothing,
    Named {
        def: DefId,
        args: SmallVec<[TypeProjection; 2]>,
    },
    Param(TypeParamId),
    Nullable(TypeId),
    Flexible {
        lower: TypeId,
        upper: TypeId,
    },
}

/// A declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamInfo {
    pub name: Atom,
    /// `None` means `Any?`.
    pub upper_bound: Option<TypeId>,
}

pub struct TypeModel {
    interner: Interner,
    definitions: DefinitionStore,
    type_ids: DashMap<TypeData, TypeId, FxBuildHasher>,
    type_data: DashMap<TypeId, TypeData, FxBuildHasher>,
    next_type: AtomicU32,
    params: DashMap<TypeParamId, TypeParamInfo, FxBuildHasher>,
    next_param: AtomicU32,
    any_def: DefId,
}

impl Default for TypeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeModel {
    /// Create a model containing only the root `Any` classifier.
    pub fn new() -> Self {
        let interner = Interner::new();
        let definitions = DefinitionStore::new();
        let any_name = interner.intern("Any");
        let any_def = definitions.register(DefinitionInfo::class(any_name, Atom::EMPTY).root());
        let model = Self {
            interner,
            definitions,
            type_ids: DashMap::with_hasher(FxBuildHasher),
            type_data: DashMap::with_hasher(FxBuildHasher),
            next_type: AtomicU32::new(0),
            params: DashMap::with_hasher(FxBuildHasher),
            next_param: AtomicU32::new(0),
            any_def,
        };
        let any = model.intern_type(TypeData::Named {
            def: any_def,
            args: SmallVec::new(),
        });
        let nothing = model.intern_type(TypeData::Nothing);
        debug_assert_eq!(any, TypeId::ANY);
        debug_assert_eq!(nothing, TypeId::NOTHING);
        model
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn intern(&self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    pub fn definitions(&self) -> &DefinitionStore {
        &self.definitions
    }

    /// The root `Any` classifier.
    pub fn any_def(&self) -> DefId {
        self.any_def
    }

    pub fn register(&self, info: DefinitionInfo) -> DefId {
        self.definitions.register(info)
    }

    pub fn class(&self, name: &str, package: &str) -> DefId {
        self.register(DefinitionInfo::class(self.intern(name), self.intern(package)))
    }

    pub fn interface(&self, name: &str, package: &str) -> DefId {
        self.register(DefinitionInfo::interface(
            self.intern(name),
            self.intern(package),
        ))
    }

    pub fn enumeration(&self, name: &str, package: &str) -> DefId {
        self.register(DefinitionInfo::enumeration(
            self.intern(name),
            self.intern(package),
        ))
    }

    pub fn foreign_class(&self, name: &str, package: &str) -> DefId {
        self.register(DefinitionInfo::class(self.intern(name), self.intern(package)).foreign())
    }

    pub fn foreign_interface(&self, name: &str, package: &str) -> DefId {
        self.register(
            DefinitionInfo::interface(self.intern(name), self.intern(package)).foreign(),
        )
    }

    /// Declare a type parameter.
    pub fn type_param(&self, name: &str, upper_bound: Option<TypeId>) -> TypeParamId {
        let id = TypeParamId(self.next_param.fetch_add(1, Ordering::SeqCst));
        self.params.insert(
            id,
            TypeParamInfo {
                name: self.intern(name),
                upper_bound,
            },
        );
        id
    }

    /// Declare classifier type parameters (unbounded) on `def`.
    pub fn declare_type_params(&self, def: DefId, names: &[&str]) -> Vec<TypeParamId> {
        let params: Vec<TypeParamId> = names.iter().map(|n| self.type_param(n, None)).collect();
        self.definitions.set_type_params(def, params.clone());
        params
    }

    pub fn add_supertype(&self, def: DefId, supertype: TypeId) {
        self.definitions.add_supertype(def, supertype);
    }

    pub fn add_member(&self, def: DefId, member: CallableMember) {
        self.definitions.add_member(def, member);
    }

    // -------------------------------------------------------------------------
    // Type construction
    // -------------------------------------------------------------------------

    fn intern_type(&self, data: TypeData) -> TypeId {
        if let Some(existing) = self.type_ids.get(&data) {
            return *existing;
        }
        match self.type_ids.entry(data.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeId(self.next_type.fetch_add(1, Ordering::SeqCst));
                self.type_data.insert(id, data);
                *entry.insert(id)
            }
        }
    }

    pub fn type_data(&self, type_id: TypeId) -> Option<TypeData> {
        self.type_data.get(&type_id).map(|d| d.clone())
    }

    /// `def<args..>`.
    pub fn named(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.intern_type(TypeData::Named {
            def,
            args: args.iter().map(|a| TypeProjection::Type(*a)).collect(),
        })
    }

    /// `def<args..>` with explicit projections.
    pub fn named_projected(&self, def: DefId, args: &[TypeProjection]) -> TypeId {
        self.intern_type(TypeData::Named {
            def,
            args: args.iter().copied().collect(),
        })
    }

    pub fn param(&self, param: TypeParamId) -> TypeId {
        self.intern_type(TypeData::Param(param))
    }

    pub fn nullable(&self, inner: TypeId) -> TypeId {
        match self.type_data(inner) {
            Some(TypeData::Nullable(_)) => inner,
            _ => self.intern_type(TypeData::Nullable(inner)),
        }
    }

    pub fn flexible(&self, lower: TypeId, upper: TypeId) -> TypeId {
        if lower == upper {
            return lower;
        }
        self.intern_type(TypeData::Flexible { lower, upper })
    }

    /// `T!`: the platform type `(T..T?)`.
    pub fn platform(&self, inner: TypeId) -> TypeId {
        let upper = self.nullable(inner);
        self.flexible(inner, upper)
    }

    // -------------------------------------------------------------------------
    // Subtyping
    // -------------------------------------------------------------------------

    fn param_upper_bound(&self, param: TypeParamId) -> TypeId {
        self.params
            .get(&param)
            .and_then(|p| p.upper_bound)
            .unwrap_or_else(|| self.nullable(TypeId::ANY))
    }

    fn classifier_substitution(&self, def: DefId, args: &[TypeProjection]) -> Substitution {
        let params = self.definitions.get_type_params(def).unwrap_or_default();
        Substitution::from_pairs(params.into_iter().zip(args).filter_map(|(p, a)| match a {
            TypeProjection::Type(t) => Some((p, *t)),
            TypeProjection::Star => None,
        }))
    }

    fn is_subtype_at(&self, sub: TypeId, sup: TypeId, depth: u32) -> bool {
        if sub == sup {
            return true;
        }
        if depth >= MAX_SUBTYPE_DEPTH {
            return false;
        }
        let (Some(sub_data), Some(sup_data)) = (self.type_data(sub), self.type_data(sup)) else {
            return false;
        };
        let next = depth + 1;
        match (&sub_data, &sup_data) {
            (TypeData::Nothing, _) => true,
            (TypeData::Flexible { lower, .. }, _) => self.is_subtype_at(*lower, sup, next),
            (_, TypeData::Flexible { upper, .. }) => self.is_subtype_at(sub, *upper, next),
            (TypeData::Nullable(s), TypeData::Nullable(t)) => self.is_subtype_at(*s, *t, next),
            (TypeData::Nullable(_), _) => false,
            (TypeData::Param(p), _) => {
                let bound = self.param_upper_bound(*p);
                (bound != sub && self.is_subtype_at(bound, sup, next))
                    || matches!(
                        &sup_data,
                        TypeData::Nullable(t) if self.is_subtype_at(sub, *t, next)
                    )
            }
            (_, TypeData::Nullable(t)) => self.is_subtype_at(sub, *t, next),
            (_, TypeData::Param(_)) | (_, TypeData::Nothing) => false,
            (TypeData::Named { def, args }, TypeData::Named { def: target, args: target_args }) => {
                if *target == self.any_def {
                    return true;
                }
                if def == target {
                    return self.arguments_match(args, target_args, next);
                }
                let substitution = self.classifier_substitution(*def, args);
                self.definitions
                    .get_supertypes(*def)
                    .unwrap_or_default()
                    .into_iter()
                    .any(|st| {
                        let st = self.substitute(st, &substitution);
                        self.is_subtype_at(st, sup, next)
                    })
            }
        }
    }

    fn arguments_match(&self, args: &[TypeProjection], targets: &[TypeProjection], depth: u32) -> bool {
        args.len() == targets.len()
            && args.iter().zip(targets).all(|(a, t)| match (a, t) {
                (_, TypeProjection::Star) => true,
                (TypeProjection::Star, TypeProjection::Type(_)) => false,
                (TypeProjection::Type(a), TypeProjection::Type(t)) => {
                    self.is_subtype_at(*a, *t, depth) && self.is_subtype_at(*t, *a, depth)
                }
            })
    }

    fn substitute_projection(&self, projection: TypeProjection, s: &Substitution) -> TypeProjection {
        match projection {
            TypeProjection::Type(t) => TypeProjection::Type(self.substitute(t, s)),
            TypeProjection::Star => TypeProjection::Star,
        }
    }
}

impl TypeSystem for TypeModel {
    fn interner(&self) -> &Interner {
        &self.interner
    }

    fn classifier_info(&self, def: DefId) -> Option<ClassifierInfo> {
        self.definitions.get_classifier_info(def)
    }

    fn declared_members(&self, def: DefId) -> Vec<Arc<CallableMember>> {
        self.definitions.get_members(def).unwrap_or_default()
    }

    fn direct_supertypes(&self, def: DefId) -> Vec<TypeApplication> {
        self.definitions
            .get_supertypes(def)
            .unwrap_or_default()
            .into_iter()
            .map(TypeApplication)
            .collect()
    }

    fn classifier_of(&self, application: TypeApplication) -> Result<DefId, ResolveError> {
        match self.type_data(application.0) {
            Some(TypeData::Named { def, .. }) => Ok(def),
            Some(TypeData::Flexible { lower, .. }) => self.classifier_of(TypeApplication(lower)),
            Some(TypeData::Nullable(inner)) => self.classifier_of(TypeApplication(inner)),
            Some(TypeData::Param(_)) | Some(TypeData::Nothing) | None => {
                Err(ResolveError::NonDenotableSupertype {
                    supertype: application,
                })
            }
        }
    }

    fn substitutor_for(&self, application: TypeApplication) -> Result<Substitution, ResolveError> {
        match self.type_data(application.0) {
            Some(TypeData::Named { def, args }) => {
                if args.iter().any(|a| matches!(a, TypeProjection::Star)) {
                    return Err(ResolveError::UnresolvedSupertype {
                        supertype: application,
                    });
                }
                Ok(self.classifier_substitution(def, &args))
            }
            Some(TypeData::Flexible { lower, .. }) => self.substitutor_for(TypeApplication(lower)),
            Some(TypeData::Nullable(inner)) => self.substitutor_for(TypeApplication(inner)),
            Some(TypeData::Param(_)) | Some(TypeData::Nothing) | None => {
                Err(ResolveError::NonDenotableSupertype {
                    supertype: application,
                })
            }
        }
    }

    fn substitute(&self, type_id: TypeId, substitution: &Substitution) -> TypeId {
        if substitution.is_identity() {
            return type_id;
        }
        match self.type_data(type_id) {
            Some(TypeData::Param(p)) => substitution.get(p).unwrap_or(type_id),
            Some(TypeData::Named { def, args }) => {
                if args.is_empty() {
                    return type_id;
                }
                let args: SmallVec<[TypeProjection; 2]> = args
                    .iter()
                    .map(|a| self.substitute_projection(*a, substitution))
                    .collect();
                self.intern_type(TypeData::Named { def, args })
            }
            Some(TypeData::Nullable(inner)) => {
                let inner = self.substitute(inner, substitution);
                self.nullable(inner)
            }
            Some(TypeData::Flexible { lower, upper }) => {
                let lower = self.substitute(lower, substitution);
                let upper = self.substitute(upper, substitution);
                self.flexible(lower, upper)
            }
            Some(TypeData::Nothing) | None => type_id,
        }
    }

    fn type_parameter_type(&self, param: TypeParamId) -> TypeId {
        self.param(param)
    }

    fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        self.is_subtype_at(sub, sup, 0)
    }

    fn is_flexible(&self, type_id: TypeId) -> bool {
        matches!(self.type_data(type_id), Some(TypeData::Flexible { .. }))
    }

    fn flexible_upper_bound(&self, type_id: TypeId) -> Option<TypeId> {
        match self.type_data(type_id) {
            Some(TypeData::Flexible { upper, .. }) => Some(upper),
            _ => None,
        }
    }

    fn with_classifier(&self, application: TypeApplication, def: DefId) -> TypeApplication {
        match self.type_data(application.0) {
            Some(TypeData::Named { args, .. }) => {
                TypeApplication(self.intern_type(TypeData::Named { def, args }))
            }
            Some(TypeData::Nullable(inner)) => {
                let inner = self.with_classifier(TypeApplication(inner), def);
                TypeApplication(self.nullable(inner.0))
            }
            _ => application,
        }
    }

    fn erase(&self, type_id: TypeId) -> ErasedType {
        match self.type_data(type_id) {
            Some(TypeData::Named { def, .. }) if def == self.any_def => ErasedType::Top,
            Some(TypeData::Named { def, .. }) => ErasedType::Classifier(def),
            Some(TypeData::Nullable(inner)) => self.erase(inner),
            Some(TypeData::Flexible { lower, .. }) => self.erase(lower),
            Some(TypeData::Param(p)) => match self.params.get(&p).and_then(|p| p.upper_bound) {
                Some(bound) if bound != type_id => self.erase(bound),
                _ => ErasedType::Top,
            },
            Some(TypeData::Nothing) => ErasedType::Bottom,
            None => ErasedType::Top,
        }
    }
}

#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod tests;
