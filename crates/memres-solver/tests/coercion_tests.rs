use super::*;
use crate::test_fixtures::Fixture;

struct Collections {
    f: Fixture,
    list_def: DefId,
    mutable_def: DefId,
}

fn collections() -> Collections {
    let f = Fixture::new();
    let list_def = f.model.interface("List", "lib");
    f.model.declare_type_params(list_def, &["E"]);
    let mutable_def = f.model.interface("MutableList", "lib");
    let e = f.model.declare_type_params(mutable_def, &["E"])[0];
    f.model
        .add_supertype(mutable_def, f.model.named(list_def, &[f.model.param(e)]));
    Collections {
        f,
        list_def,
        mutable_def,
    }
}

#[test]
fn test_identity_coercion_is_noop() {
    let c = collections();
    let flexible = c.f.model.flexible(
        c.f.model.named(c.mutable_def, &[c.f.string]),
        c.f.model.nullable(c.f.model.named(c.list_def, &[c.f.string])),
    );
    let app = TypeApplication(flexible);
    assert_eq!(IdentityCoercion.coerce(&c.f.model, app), app);
}

#[test]
fn test_alias_is_rebound_to_canonical_classifier() {
    let c = collections();
    let coercion = ClassifierAliasCoercion::new().alias(c.mutable_def, c.list_def);
    assert_eq!(coercion.canonical(c.mutable_def), Some(c.list_def));
    assert_eq!(coercion.canonical(c.list_def), None);

    let mutable_string = TypeApplication(c.f.model.named(c.mutable_def, &[c.f.string]));
    let coerced = coercion.coerce(&c.f.model, mutable_string);
    assert_eq!(
        coerced.type_id(),
        c.f.model.named(c.list_def, &[c.f.string])
    );
}

#[test]
fn test_flexible_collection_takes_upper_bound() {
    let c = collections();
    let coercion = ClassifierAliasCoercion::new().alias(c.mutable_def, c.list_def);
    let upper = c.f.model.nullable(c.f.model.named(c.list_def, &[c.f.string]));
    let flexible = c
        .f
        .model
        .flexible(c.f.model.named(c.mutable_def, &[c.f.string]), upper);

    let coerced = coercion.coerce(&c.f.model, TypeApplication(flexible));
    assert_eq!(coerced.type_id(), upper);
    assert_eq!(c.f.model.classifier_of(coerced), Ok(c.list_def));
}

#[test]
fn test_unrelated_supertypes_are_unchanged() {
    let c = collections();
    let coercion = ClassifierAliasCoercion::new().alias(c.mutable_def, c.list_def);

    let platform_string = TypeApplication(c.f.model.platform(c.f.string));
    assert_eq!(coercion.coerce(&c.f.model, platform_string), platform_string);

    let list_int = TypeApplication(c.f.model.named(c.list_def, &[c.f.int]));
    assert_eq!(coercion.coerce(&c.f.model, list_int), list_int);
}
