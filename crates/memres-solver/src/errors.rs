//! Internal-consistency failures raised by member resolution.
//!
//! None of these are transient: they indicate a malformed hierarchy or a bug
//! in the upstream type model. They are propagated unchanged and never
//! retried.

use crate::def::DefId;
use crate::types::{TypeApplication, TypeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// A supertype reference has no concrete classifier.
    NonDenotableSupertype { supertype: TypeApplication },
    /// A supertype reference is a star/wildcard projection, so its
    /// substitution cannot be composed.
    UnresolvedSupertype { supertype: TypeApplication },
    /// Two members share a signature, neither is declared in a subtype of
    /// the other's owner, and neither return type is a subtype of the other.
    ConflictingOverrides {
        member: String,
        first_owner: DefId,
        first_return: TypeId,
        second_owner: DefId,
        second_return: TypeId,
    },
    /// A type handle is neither a recognized native nor foreign classifier.
    UnknownClassifierKind { def: DefId },
    /// The supertype chain from `root` is longer than the configured limit.
    DepthLimitExceeded { root: DefId, limit: u32 },
}

impl ResolveError {
    /// Short, stable name of the variant for structured logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NonDenotableSupertype { .. } => "non_denotable_supertype",
            Self::UnresolvedSupertype { .. } => "unresolved_supertype",
            Self::ConflictingOverrides { .. } => "conflicting_overrides",
            Self::UnknownClassifierKind { .. } => "unknown_classifier_kind",
            Self::DepthLimitExceeded { .. } => "depth_limit_exceeded",
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonDenotableSupertype { supertype } => write!(
                f,
                "non-denotable supertype: type {} has no concrete classifier",
                supertype.0.0
            ),
            Self::UnresolvedSupertype { supertype } => write!(
                f,
                "star projection in supertype {} cannot be substituted",
                supertype.0.0
            ),
            Self::ConflictingOverrides {
                member,
                first_owner,
                first_return,
                second_owner,
                second_return,
            } => write!(
                f,
                "conflicting inherited members '{}': return type {} from definition {} \
                 and return type {} from definition {} are unrelated",
                member, first_return.0, first_owner.0, second_return.0, second_owner.0
            ),
            Self::UnknownClassifierKind { def } => {
                write!(f, "definition {} is not a recognized classifier", def.0)
            }
            Self::DepthLimitExceeded { root, limit } => write!(
                f,
                "supertype hierarchy of definition {} is deeper than {} levels",
                root.0, limit
            ),
        }
    }
}

impl std::error::Error for ResolveError {}
