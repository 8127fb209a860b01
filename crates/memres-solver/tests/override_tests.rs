use super::*;
use crate::substitution::SubstitutionComposer;
use crate::test_fixtures::Fixture;
use crate::types::CallableMember;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Explicit `(sub, sup)` pairs.
struct Edges(FxHashSet<(DefId, DefId)>);

impl Ancestry for Edges {
    fn is_strict_subclass(&self, sub: DefId, sup: DefId) -> bool {
        self.0.contains(&(sub, sup))
    }
}

fn viewed(f: &Fixture, member: CallableMember, viewer: DefId, depth: u32) -> ResolvedMember {
    let owner = member.owner;
    let composer = SubstitutionComposer::new();
    let identity = Arc::new(Substitution::identity());
    let mut resolved = ResolvedMember::declared(Arc::new(member), owner);
    for _ in 0..depth {
        resolved = resolved.inherit(&identity, viewer, &composer, &f.model);
    }
    resolved
}

#[test]
fn test_subclass_owner_wins_regardless_of_return() {
    let f = Fixture::new();
    let base = f.class("Base");
    let mid = f.class("Mid");
    let leaf = f.class("Leaf");
    let name = f.name("get");
    let ancestry = Edges([(mid, base)].into_iter().collect());
    let resolver = OverrideResolver::new(&f.model, &ancestry);

    let from_base = viewed(&f, CallableMember::function(base, name, [], f.int), leaf, 2);
    let from_mid = viewed(&f, CallableMember::function(mid, name, [], f.number), leaf, 1);
    assert_eq!(resolver.compare(&from_mid, &from_base), Ok(Ordering::Less));
    assert_eq!(resolver.compare(&from_base, &from_mid), Ok(Ordering::Greater));
}

#[test]
fn test_covariant_return_wins_between_unrelated_owners() {
    let f = Fixture::new();
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let c = f.class("C");
    let name = f.name("get");
    let resolver = OverrideResolver::new(&f.model, &NoAncestry);

    let number = viewed(&f, CallableMember::function(i1, name, [], f.number), c, 1);
    let int = viewed(&f, CallableMember::function(i2, name, [], f.int), c, 1);
    assert_eq!(resolver.compare(&int, &number), Ok(Ordering::Less));
    assert_eq!(resolver.compare(&number, &int), Ok(Ordering::Greater));
}

#[test]
fn test_rigid_return_beats_flexible() {
    let f = Fixture::new();
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let c = f.class("C");
    let name = f.name("name");
    let resolver = OverrideResolver::new(&f.model, &NoAncestry);

    let flexible = viewed(
        &f,
        CallableMember::function(i1, name, [], f.model.platform(f.string)),
        c,
        1,
    );
    let rigid = viewed(&f, CallableMember::function(i2, name, [], f.string), c, 1);
    assert_eq!(resolver.compare(&rigid, &flexible), Ok(Ordering::Less));
    assert_eq!(resolver.compare(&flexible, &rigid), Ok(Ordering::Greater));
}

#[test]
fn test_ties_break_by_distance_then_owner() {
    let f = Fixture::new();
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let c = f.class("C");
    let name = f.name("f");
    let resolver = OverrideResolver::new(&f.model, &NoAncestry);

    let near = viewed(&f, CallableMember::function(i2, name, [], f.unit), c, 1);
    let far = viewed(&f, CallableMember::function(i1, name, [], f.unit), c, 2);
    assert_eq!(resolver.compare(&near, &far), Ok(Ordering::Less));

    let first = viewed(&f, CallableMember::function(i1, name, [], f.unit), c, 1);
    assert_eq!(resolver.compare(&first, &near), Ok(Ordering::Less));
    assert_eq!(resolver.compare(&first, &first), Ok(Ordering::Equal));
}

#[test]
fn test_generic_returns_compared_after_renaming() {
    let f = Fixture::new();
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let c = f.class("C");
    let name = f.name("id");
    let resolver = OverrideResolver::new(&f.model, &NoAncestry);
    let x = f.model.type_param("X", None);
    let y = f.model.type_param("Y", None);

    let a = viewed(
        &f,
        CallableMember::function(i1, name, [f.model.param(x)], f.model.param(x))
            .with_type_parameters([x]),
        c,
        1,
    );
    let b = viewed(
        &f,
        CallableMember::function(i2, name, [f.model.param(y)], f.model.param(y))
            .with_type_parameters([y]),
        c,
        1,
    );
    // Equal returns after renaming; the owner decides.
    assert_eq!(resolver.compare(&a, &b), Ok(Ordering::Less));
    assert_eq!(resolver.compare(&b, &a), Ok(Ordering::Greater));
}

#[test]
fn test_unrelated_returns_conflict() {
    let f = Fixture::new();
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let c = f.class("C");
    let name = f.name("f");
    let resolver = OverrideResolver::new(&f.model, &NoAncestry);

    let a = viewed(&f, CallableMember::function(i1, name, [], f.string), c, 1);
    let b = viewed(&f, CallableMember::function(i2, name, [], f.int), c, 1);
    let err = resolver.compare(&a, &b).expect_err("unrelated returns");
    assert_eq!(
        err,
        ResolveError::ConflictingOverrides {
            member: "f".to_string(),
            first_owner: i1,
            first_return: f.string,
            second_owner: i2,
            second_return: f.int,
        }
    );
    assert_eq!(err.kind(), "conflicting_overrides");
}

/// Every pair and triple of a candidate set sharing one key must satisfy
/// irreflexivity, antisymmetry and transitivity of `Less`, and transitivity
/// of `Equal`.
#[test]
fn test_comparator_is_strict_weak_ordering() {
    let f = Fixture::new();
    let base = f.class("Base");
    let mid = f.class("Mid");
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let leaf = f.class("Leaf");
    let name = f.name("value");
    let ancestry = Edges([(mid, base)].into_iter().collect());
    let resolver = OverrideResolver::new(&f.model, &ancestry);

    let candidates = [
        viewed(&f, CallableMember::function(base, name, [], f.number), leaf, 2),
        viewed(&f, CallableMember::function(base, name, [], f.number), leaf, 3),
        viewed(&f, CallableMember::function(mid, name, [], f.number), leaf, 1),
        viewed(&f, CallableMember::function(i1, name, [], f.int), leaf, 1),
        viewed(&f, CallableMember::function(i2, name, [], f.model.platform(f.int)), leaf, 1),
        viewed(&f, CallableMember::function(i2, name, [], f.int), leaf, 2),
    ];
    let cmp = |a: &ResolvedMember, b: &ResolvedMember| {
        resolver.compare(a, b).expect("candidates are comparable")
    };

    for a in &candidates {
        assert_eq!(cmp(a, a), Ordering::Equal);
        for b in &candidates {
            assert_eq!(cmp(a, b), cmp(b, a).reverse());
            for c in &candidates {
                if cmp(a, b) == Ordering::Less && cmp(b, c) == Ordering::Less {
                    assert_eq!(cmp(a, c), Ordering::Less);
                }
                if cmp(a, b) == Ordering::Equal && cmp(b, c) == Ordering::Equal {
                    assert_eq!(cmp(a, c), Ordering::Equal);
                }
            }
        }
    }
}

#[test]
fn test_winner_is_independent_of_arrival_order() {
    let f = Fixture::new();
    let i1 = f.interface("I1");
    let i2 = f.interface("I2");
    let i3 = f.interface("I3");
    let c = f.class("C");
    let name = f.name("f");
    let resolver = OverrideResolver::new(&f.model, &NoAncestry);

    let members = [
        viewed(&f, CallableMember::function(i3, name, [], f.unit), c, 1),
        viewed(&f, CallableMember::function(i1, name, [], f.unit), c, 2),
        viewed(&f, CallableMember::function(i2, name, [], f.unit), c, 1),
    ];
    let pick = |order: &[usize]| {
        let mut best = &members[order[0]];
        for idx in &order[1..] {
            if resolver.compare(&members[*idx], best) == Ok(Ordering::Less) {
                best = &members[*idx];
            }
        }
        best.owner()
    };
    let expected = pick(&[0, 1, 2]);
    assert_eq!(expected, i2);
    for order in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
        assert_eq!(pick(&order), expected);
    }
}
