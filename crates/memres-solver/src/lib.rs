//! Transitive member resolution over multiple-inheritance hierarchies.
//!
//! Given a classifier in a hierarchy mixing classes, interfaces, enums and
//! foreign (host-platform) types, computes the de-duplicated set of callable
//! members a reflective query against it must report:
//!
//! - **Override resolution** across diamonds, by declaring-type ancestry and
//!   return-type covariance
//! - **Generic substitution** composed along every supertype edge
//! - **Signature equivalence** under a logical (source-language) and a
//!   binary (erased, host-platform) regime
//! - **Inheritance suppression** for interface statics, private and
//!   package-private members
//!
//! The type system itself is external and consumed through [`TypeSystem`];
//! [`TypeModel`] is an in-memory implementation.

pub mod assembly;
mod caches;
pub mod cache;
pub mod coercion;
pub mod db;
pub mod def;
pub mod errors;
pub mod hierarchy;
pub mod model;
pub mod options;
pub mod overrides;
pub mod recursion;
pub mod resolver;
pub mod signature;
pub mod substitution;
pub mod types;

pub use assembly::{Placement, ResolvedMembers, placement};
pub use cache::{CacheStatsSnapshot, MemberCache};
pub use coercion::{ClassifierAliasCoercion, IdentityCoercion, SupertypeCoercion};
pub use db::TypeSystem;
pub use def::{DefId, DefinitionInfo, DefinitionStore};
pub use errors::ResolveError;
pub use model::{TypeData, TypeModel, TypeParamInfo};
pub use options::{ResolverOptions, RevisitPolicy, SignatureModePolicy};
pub use overrides::{Ancestry, NoAncestry, OverrideResolver};
pub use resolver::MemberResolver;
pub use signature::{SignatureKey, SignatureMode, SignatureShape, SignatureTable};
pub use substitution::{Substitution, SubstitutionComposer};
pub use types::{
    CallableMember, ClassifierFlags, ClassifierInfo, ErasedType, MemberKind, MemberScope, Origin,
    ResolvedMember, TypeApplication, TypeId, TypeParamId, TypeProjection, Visibility,
};

// Test modules: most are loaded by their source files via #[path = "../tests/..."].
#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
#[cfg(test)]
#[path = "../tests/resolution_tests.rs"]
mod resolution_tests;
