//! Override resolution: which of two members sharing a signature key is the
//! more specific one.
//!
//! The ordering, smallest first:
//! 1. A member declared on a strict subclass of the other's owner.
//! 2. A member whose return type is a strict subtype of the other's, after
//!    renaming the other member's generic parameters onto this one's.
//! 3. Between mutually assignable returns, the rigid one over the flexible
//!    one.
//! 4. Remaining ties by distance from the queried classifier, then by owner,
//!    so the winner never depends on arrival order.
//!
//! Unrelated return types have no order and are reported as
//! [`ResolveError::ConflictingOverrides`].

use crate::db::TypeSystem;
use crate::def::DefId;
use crate::errors::ResolveError;
use crate::substitution::Substitution;
use crate::types::ResolvedMember;
use std::cmp::Ordering;

/// Subclass queries over classifiers that have already been resolved.
pub trait Ancestry {
    /// `sub != sup` and `sup` is a transitive supertype of `sub`.
    fn is_strict_subclass(&self, sub: DefId, sup: DefId) -> bool;
}

/// Ancestry without any known relationships; only the return-type rules
/// apply.
pub struct NoAncestry;

impl Ancestry for NoAncestry {
    fn is_strict_subclass(&self, _sub: DefId, _sup: DefId) -> bool {
        false
    }
}

pub struct OverrideResolver<'a> {
    ts: &'a dyn TypeSystem,
    ancestry: &'a dyn Ancestry,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(ts: &'a dyn TypeSystem, ancestry: &'a dyn Ancestry) -> Self {
        Self { ts, ancestry }
    }

    pub fn type_system(&self) -> &'a dyn TypeSystem {
        self.ts
    }

    /// `Less` if `a` is the more specific override.
    pub fn compare(&self, a: &ResolvedMember, b: &ResolvedMember) -> Result<Ordering, ResolveError> {
        let (a_owner, b_owner) = (a.owner(), b.owner());
        if a_owner != b_owner {
            if self.ancestry.is_strict_subclass(a_owner, b_owner) {
                return Ok(Ordering::Less);
            }
            if self.ancestry.is_strict_subclass(b_owner, a_owner) {
                return Ok(Ordering::Greater);
            }
        }

        let ts = self.ts;
        let eliminator = Substitution::eliminating(b.type_parameters(), a.type_parameters(), ts);
        let a_return = a.return_type();
        let b_return = ts.substitute(b.return_type(), &eliminator);
        let a_sub_b = ts.is_subtype_of(a_return, b_return);
        let b_sub_a = ts.is_subtype_of(b_return, a_return);

        let ordering = match (a_sub_b, b_sub_a) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => match (ts.is_flexible(a_return), ts.is_flexible(b_return)) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => Ordering::Equal,
            },
            (false, false) => {
                return Err(ResolveError::ConflictingOverrides {
                    member: ts.interner().display(a.name()),
                    first_owner: a_owner,
                    first_return: a_return,
                    second_owner: b_owner,
                    second_return: b_return,
                });
            }
        };

        Ok(ordering
            .then_with(|| a.distance().cmp(&b.distance()))
            .then_with(|| a_owner.cmp(&b_owner)))
    }
}

#[cfg(test)]
#[path = "../tests/override_tests.rs"]
mod tests;
