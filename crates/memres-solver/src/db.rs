//! The query surface the engine consumes from the external type system.

use crate::def::DefId;
use crate::errors::ResolveError;
use crate::substitution::Substitution;
use crate::types::{
    CallableMember, ClassifierInfo, ErasedType, TypeApplication, TypeId, TypeParamId,
};
use memres_common::Interner;
use std::sync::Arc;

/// Read-only view of an immutable type model.
///
/// Every query must be pure: the engine caches its results per classifier
/// and may call the same query from several threads.
pub trait TypeSystem: Send + Sync {
    /// Interner that produced the member and classifier name atoms.
    fn interner(&self) -> &Interner;

    /// Classification of `def`, or `None` if it is not a classifier.
    fn classifier_info(&self, def: DefId) -> Option<ClassifierInfo>;

    /// Members declared directly on `def`; no inheritance applied.
    fn declared_members(&self, def: DefId) -> Vec<Arc<CallableMember>>;

    /// Direct supertype applications of `def`, in declaration order.
    fn direct_supertypes(&self, def: DefId) -> Vec<TypeApplication>;

    /// Classifier of a supertype application.
    ///
    /// Fails with [`ResolveError::NonDenotableSupertype`] for type
    /// parameters, the bottom type, and other references without one.
    fn classifier_of(&self, application: TypeApplication) -> Result<DefId, ResolveError>;

    /// Substitution from the classifier's type parameters to the
    /// application's arguments.
    ///
    /// Fails with [`ResolveError::UnresolvedSupertype`] for star projections.
    fn substitutor_for(&self, application: TypeApplication) -> Result<Substitution, ResolveError>;

    /// Apply `substitution` to `type_id`.
    fn substitute(&self, type_id: TypeId, substitution: &Substitution) -> TypeId;

    /// Type reference to a bare type parameter.
    fn type_parameter_type(&self, param: TypeParamId) -> TypeId;

    fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool;

    /// Whether `type_id` is a flexible (platform) type.
    fn is_flexible(&self, type_id: TypeId) -> bool;

    /// Upper bound of a flexible type, `None` for rigid types.
    fn flexible_upper_bound(&self, type_id: TypeId) -> Option<TypeId>;

    /// Same application with its classifier replaced, arguments kept.
    fn with_classifier(&self, application: TypeApplication, def: DefId) -> TypeApplication;

    /// Host-platform erasure of `type_id`.
    fn erase(&self, type_id: TypeId) -> ErasedType;

    /// `a <: b && b <: a`.
    fn is_equivalent(&self, a: TypeId, b: TypeId) -> bool {
        a == b || (self.is_subtype_of(a, b) && self.is_subtype_of(b, a))
    }
}
