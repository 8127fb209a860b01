//! Core data model: type references, classifiers and callable members.
//!
//! Type references (`TypeId`) and type parameters (`TypeParamId`) are opaque
//! handles owned by the external type system. The engine never inspects
//! them structurally; it only hands them back through [`TypeSystem`] queries.
//!
//! [`TypeSystem`]: crate::TypeSystem

use crate::db::TypeSystem;
use crate::def::DefId;
use crate::substitution::{Substitution, SubstitutionComposer};
use bitflags::bitflags;
use memres_common::Atom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Interned type reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The root `Any` type of the reference model.
    pub const ANY: Self = Self(0);
    /// The bottom `Nothing` type of the reference model.
    pub const NOTHING: Self = Self(1);
}

/// A generic parameter, either of a classifier or of a member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// One supertype edge: a classifier instantiated with type arguments,
/// e.g. `Base<String>` in `class Derived : Base<String>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication(pub TypeId);

impl TypeApplication {
    pub const fn type_id(self) -> TypeId {
        self.0
    }
}

/// A type argument position: a concrete type or a star projection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeProjection {
    Type(TypeId),
    Star,
}

/// Host-platform (erased) view of a type, as it appears in a binary
/// method descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErasedType {
    /// Erasure of the root type and of unbounded type parameters.
    Top,
    /// Erasure of the bottom type.
    Bottom,
    Classifier(DefId),
}

// =============================================================================
// Classifiers
// =============================================================================

bitflags! {
    /// Classification of a type handle.
    ///
    /// A classifier without `INTERFACE` or `ENUM` is a class. `INTERFACE`
    /// and `ENUM` are mutually exclusive.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ClassifierFlags: u8 {
        const INTERFACE = 1 << 0;
        const ENUM = 1 << 1;
        /// Declared by the host platform rather than the source language.
        const FOREIGN = 1 << 2;
        /// The root `Any` classifier.
        const ROOT = 1 << 3;
    }
}

/// Where a classifier was declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Native,
    Foreign,
}

/// What the engine needs to know about a classifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierInfo {
    pub name: Atom,
    pub flags: ClassifierFlags,
    /// Defining module/package, for package-private visibility.
    pub package: Atom,
}

impl ClassifierInfo {
    pub const fn is_interface(&self) -> bool {
        self.flags.contains(ClassifierFlags::INTERFACE)
    }

    pub const fn is_enum(&self) -> bool {
        self.flags.contains(ClassifierFlags::ENUM)
    }

    pub const fn is_root(&self) -> bool {
        self.flags.contains(ClassifierFlags::ROOT)
    }

    pub const fn origin(&self) -> Origin {
        if self.flags.contains(ClassifierFlags::FOREIGN) {
            Origin::Foreign
        } else {
            Origin::Native
        }
    }

    /// `false` for flag combinations no classifier can have.
    pub const fn is_well_formed(&self) -> bool {
        !self
            .flags
            .contains(ClassifierFlags::INTERFACE.union(ClassifierFlags::ENUM))
    }
}

// =============================================================================
// Callable members
// =============================================================================

/// Closed set of member kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Function,
    Property,
    /// A field of a host-platform class, getter and setter merged.
    ForeignField,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

/// Partition selector for `MemberResolver::resolve_members`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberScope {
    Static,
    Instance,
}

/// One function, property or field as declared on its owner, plus the
/// substitution accumulated while it is inherited.
///
/// `parameter_types` and `return_type` are always the *declared* types; the
/// view through a subtype is obtained by applying `substitution`.
#[derive(Clone, Debug)]
pub struct CallableMember {
    pub name: Atom,
    pub kind: MemberKind,
    /// Declaring type, never the type the member is viewed through.
    pub owner: DefId,
    pub is_static: bool,
    pub visibility: Visibility,
    /// Receiver of an extension member. Counts as the first parameter for
    /// signature purposes.
    pub extension_receiver: Option<TypeId>,
    pub parameter_types: SmallVec<[TypeId; 4]>,
    pub return_type: TypeId,
    /// The member's own generic parameters.
    pub type_parameters: SmallVec<[TypeParamId; 2]>,
    pub substitution: Arc<Substitution>,
}

impl CallableMember {
    fn new(owner: DefId, name: Atom, kind: MemberKind, return_type: TypeId) -> Self {
        Self {
            name,
            kind,
            owner,
            is_static: false,
            visibility: Visibility::Public,
            extension_receiver: None,
            parameter_types: SmallVec::new(),
            return_type,
            type_parameters: SmallVec::new(),
            substitution: Arc::new(Substitution::identity()),
        }
    }

    pub fn function(
        owner: DefId,
        name: Atom,
        parameter_types: impl IntoIterator<Item = TypeId>,
        return_type: TypeId,
    ) -> Self {
        let mut member = Self::new(owner, name, MemberKind::Function, return_type);
        member.parameter_types = parameter_types.into_iter().collect();
        member
    }

    pub fn property(owner: DefId, name: Atom, type_id: TypeId) -> Self {
        Self::new(owner, name, MemberKind::Property, type_id)
    }

    pub fn foreign_field(owner: DefId, name: Atom, type_id: TypeId) -> Self {
        Self::new(owner, name, MemberKind::ForeignField, type_id)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_type_parameters(mut self, params: impl IntoIterator<Item = TypeParamId>) -> Self {
        self.type_parameters = params.into_iter().collect();
        self
    }

    pub fn with_extension_receiver(mut self, receiver: TypeId) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    /// Number of parameters that take part in signature comparison.
    pub fn signature_arity(&self) -> usize {
        self.parameter_types.len() + usize::from(self.extension_receiver.is_some())
    }

    pub fn is_package_private(&self) -> bool {
        self.visibility == Visibility::PackagePrivate
    }

    /// Copy of this member carrying a different accumulated substitution.
    pub(crate) fn with_substitution(&self, substitution: Arc<Substitution>) -> Self {
        Self {
            substitution,
            ..self.clone()
        }
    }
}

// =============================================================================
// Resolved members
// =============================================================================

/// A member as seen through the queried classifier.
///
/// Carries the declared member (with its accumulated substitution) plus the
/// viewed parameter, receiver and return types, its topological distance
/// from the queried classifier, and the dispatch receiver it is rebound to.
#[derive(Clone, Debug)]
pub struct ResolvedMember {
    member: Arc<CallableMember>,
    extension_receiver: Option<TypeId>,
    parameter_types: SmallVec<[TypeId; 4]>,
    return_type: TypeId,
    distance: u32,
    dispatch_receiver: Option<DefId>,
}

impl ResolvedMember {
    /// A member declared directly on `viewer`.
    pub fn declared(member: Arc<CallableMember>, viewer: DefId) -> Self {
        Self {
            extension_receiver: member.extension_receiver,
            parameter_types: member.parameter_types.clone(),
            return_type: member.return_type,
            distance: 0,
            dispatch_receiver: (!member.is_static).then_some(viewer),
            member,
        }
    }

    /// View this member one supertype edge further down, from `viewer`.
    ///
    /// Viewed types are rewritten with `edge` only; the member itself records
    /// the full composed substitution.
    pub fn inherit(
        &self,
        edge: &Arc<Substitution>,
        viewer: DefId,
        composer: &SubstitutionComposer,
        ts: &dyn TypeSystem,
    ) -> Self {
        let composed = composer.compose(ts, &self.member.substitution, edge);
        let member = if Arc::ptr_eq(&composed, &self.member.substitution) {
            Arc::clone(&self.member)
        } else {
            Arc::new(self.member.with_substitution(composed))
        };
        Self {
            member,
            extension_receiver: self.extension_receiver.map(|t| ts.substitute(t, edge)),
            parameter_types: self
                .parameter_types
                .iter()
                .map(|t| ts.substitute(*t, edge))
                .collect(),
            return_type: ts.substitute(self.return_type, edge),
            distance: self.distance.saturating_add(1),
            dispatch_receiver: (!self.member.is_static).then_some(viewer),
        }
    }

    /// The declared member, carrying the composed substitution.
    pub fn member(&self) -> &Arc<CallableMember> {
        &self.member
    }

    pub fn name(&self) -> Atom {
        self.member.name
    }

    pub fn kind(&self) -> MemberKind {
        self.member.kind
    }

    pub fn owner(&self) -> DefId {
        self.member.owner
    }

    pub fn is_static(&self) -> bool {
        self.member.is_static
    }

    pub fn visibility(&self) -> Visibility {
        self.member.visibility
    }

    pub fn type_parameters(&self) -> &[TypeParamId] {
        &self.member.type_parameters
    }

    pub fn extension_receiver(&self) -> Option<TypeId> {
        self.extension_receiver
    }

    pub fn parameter_types(&self) -> &[TypeId] {
        &self.parameter_types
    }

    pub fn return_type(&self) -> TypeId {
        self.return_type
    }

    /// Number of supertype edges between the queried classifier and the
    /// owner. Zero for own declarations.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// The classifier instance calls dispatch on; `None` for statics.
    pub fn dispatch_receiver(&self) -> Option<DefId> {
        self.dispatch_receiver
    }

    /// Receiver first, then parameters, as used by signature keys.
    pub fn signature_parameters(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.extension_receiver
            .into_iter()
            .chain(self.parameter_types.iter().copied())
    }
}

impl PartialEq for ResolvedMember {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&*self.member, &*other.member);
        a.name == b.name
            && a.kind == b.kind
            && a.owner == b.owner
            && a.is_static == b.is_static
            && a.visibility == b.visibility
            && a.type_parameters == b.type_parameters
            && a.substitution == b.substitution
            && self.extension_receiver == other.extension_receiver
            && self.parameter_types == other.parameter_types
            && self.return_type == other.return_type
            && self.distance == other.distance
            && self.dispatch_receiver == other.dispatch_receiver
    }
}

impl Eq for ResolvedMember {}
