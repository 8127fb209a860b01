use super::*;

struct Lib {
    model: TypeModel,
    string: TypeId,
    number: TypeId,
    int: TypeId,
    list_def: DefId,
}

fn lib() -> Lib {
    let model = TypeModel::new();
    let string_def = model.class("String", "lib");
    let number_def = model.class("Number", "lib");
    let int_def = model.class("Int", "lib");
    let number = model.named(number_def, &[]);
    model.add_supertype(int_def, number);
    let list_def = model.interface("List", "lib");
    model.declare_type_params(list_def, &["E"]);
    Lib {
        string: model.named(string_def, &[]),
        number,
        int: model.named(int_def, &[]),
        list_def,
        model,
    }
}

#[test]
fn test_reserved_type_ids() {
    let model = TypeModel::new();
    assert_eq!(
        model.type_data(TypeId::ANY),
        Some(TypeData::Named {
            def: model.any_def(),
            args: SmallVec::new()
        })
    );
    assert_eq!(model.type_data(TypeId::NOTHING), Some(TypeData::Nothing));
    let info = model.classifier_info(model.any_def()).expect("root");
    assert!(info.is_root());
}

#[test]
fn test_types_are_interned() {
    let l = lib();
    let a = l.model.named(l.list_def, &[l.string]);
    let b = l.model.named(l.list_def, &[l.string]);
    assert_eq!(a, b);
    assert_ne!(a, l.model.named(l.list_def, &[l.int]));
    assert_eq!(l.model.nullable(l.model.nullable(l.string)), l.model.nullable(l.string));
    assert_eq!(l.model.flexible(l.string, l.string), l.string);
}

#[test]
fn test_nominal_subtyping() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    assert!(ts.is_subtype_of(l.int, l.number));
    assert!(!ts.is_subtype_of(l.number, l.int));
    assert!(!ts.is_subtype_of(l.string, l.number));
    assert!(ts.is_subtype_of(l.string, TypeId::ANY));
    assert!(ts.is_subtype_of(TypeId::NOTHING, l.string));
    assert!(!ts.is_subtype_of(l.string, TypeId::NOTHING));
}

#[test]
fn test_nullable_subtyping() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let string_n = l.model.nullable(l.string);
    let any_n = l.model.nullable(TypeId::ANY);
    assert!(ts.is_subtype_of(l.string, string_n));
    assert!(!ts.is_subtype_of(string_n, l.string));
    assert!(!ts.is_subtype_of(string_n, TypeId::ANY));
    assert!(ts.is_subtype_of(string_n, any_n));
}

#[test]
fn test_flexible_types_are_equivalent_to_both_bounds() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let platform = l.model.platform(l.string);
    assert!(ts.is_flexible(platform));
    assert!(!ts.is_flexible(l.string));
    assert!(ts.is_equivalent(platform, l.string));
    assert!(ts.is_equivalent(platform, l.model.nullable(l.string)));
    assert!(!ts.is_equivalent(l.string, l.model.nullable(l.string)));
    assert_eq!(
        ts.flexible_upper_bound(platform),
        Some(l.model.nullable(l.string))
    );
    assert_eq!(ts.flexible_upper_bound(l.string), None);
}

#[test]
fn test_generic_arguments_are_invariant() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let list_int = l.model.named(l.list_def, &[l.int]);
    let list_number = l.model.named(l.list_def, &[l.number]);
    let list_star = l.model.named_projected(l.list_def, &[TypeProjection::Star]);
    assert!(!ts.is_subtype_of(list_int, list_number));
    assert!(ts.is_subtype_of(list_int, list_star));
    assert!(!ts.is_subtype_of(list_star, list_int));
}

#[test]
fn test_subtyping_substitutes_along_supertypes() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    // class Names : List<String>
    let names_def = l.model.class("Names", "app");
    l.model
        .add_supertype(names_def, l.model.named(l.list_def, &[l.string]));
    let names = l.model.named(names_def, &[]);
    assert!(ts.is_subtype_of(names, l.model.named(l.list_def, &[l.string])));
    assert!(!ts.is_subtype_of(names, l.model.named(l.list_def, &[l.int])));

    // class Wrapper<W> : List<W>
    let wrapper_def = l.model.class("Wrapper", "app");
    let w = l.model.declare_type_params(wrapper_def, &["W"])[0];
    l.model
        .add_supertype(wrapper_def, l.model.named(l.list_def, &[l.model.param(w)]));
    let wrapper_int = l.model.named(wrapper_def, &[l.int]);
    assert!(ts.is_subtype_of(wrapper_int, l.model.named(l.list_def, &[l.int])));
}

#[test]
fn test_type_parameters_use_upper_bound() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let bounded = l.model.param(l.model.type_param("N", Some(l.number)));
    let unbounded = l.model.param(l.model.type_param("T", None));
    assert!(ts.is_subtype_of(bounded, l.number));
    assert!(!ts.is_subtype_of(bounded, l.int));
    assert!(!ts.is_subtype_of(unbounded, TypeId::ANY));
    assert!(ts.is_subtype_of(unbounded, l.model.nullable(TypeId::ANY)));
    assert!(!ts.is_subtype_of(l.number, bounded));
    assert!(ts.is_subtype_of(unbounded, l.model.nullable(unbounded)));
    assert!(ts.is_subtype_of(bounded, l.model.nullable(l.number)));
    assert!(!ts.is_subtype_of(l.model.nullable(unbounded), unbounded));
}

#[test]
fn test_substitute_rewrites_structurally() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let t = l.model.type_param("T", None);
    let t_type = l.model.param(t);
    let s = Substitution::from_pairs([(t, l.string)]);

    let list_t_n = l.model.nullable(l.model.named(l.list_def, &[t_type]));
    assert_eq!(
        ts.substitute(list_t_n, &s),
        l.model.nullable(l.model.named(l.list_def, &[l.string]))
    );
    assert_eq!(ts.substitute(l.int, &s), l.int);
    assert_eq!(ts.substitute(t_type, &Substitution::identity()), t_type);
}

#[test]
fn test_erasure() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let list_string = l.model.named(l.list_def, &[l.string]);
    assert_eq!(ts.erase(list_string), ErasedType::Classifier(l.list_def));
    assert_eq!(
        ts.erase(l.model.named(l.list_def, &[l.int])),
        ts.erase(list_string)
    );
    assert_eq!(ts.erase(l.model.platform(list_string)), ts.erase(list_string));
    assert_eq!(ts.erase(TypeId::ANY), ErasedType::Top);
    assert_eq!(ts.erase(TypeId::NOTHING), ErasedType::Bottom);

    let unbounded = l.model.param(l.model.type_param("T", None));
    let bounded = l.model.param(l.model.type_param("L", Some(list_string)));
    assert_eq!(ts.erase(unbounded), ErasedType::Top);
    assert_eq!(ts.erase(bounded), ErasedType::Classifier(l.list_def));
}

#[test]
fn test_classifier_of() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let list_string = l.model.named(l.list_def, &[l.string]);
    assert_eq!(ts.classifier_of(TypeApplication(list_string)), Ok(l.list_def));
    assert_eq!(
        ts.classifier_of(TypeApplication(l.model.nullable(list_string))),
        Ok(l.list_def)
    );

    let t_type = TypeApplication(l.model.param(l.model.type_param("T", None)));
    assert_eq!(
        ts.classifier_of(t_type),
        Err(ResolveError::NonDenotableSupertype { supertype: t_type })
    );
    let nothing = TypeApplication(TypeId::NOTHING);
    assert!(matches!(
        ts.classifier_of(nothing),
        Err(ResolveError::NonDenotableSupertype { .. })
    ));
}

#[test]
fn test_substitutor_for() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let e = l.model.definitions().get_type_params(l.list_def).expect("List")[0];
    let list_string = TypeApplication(l.model.named(l.list_def, &[l.string]));
    let s = ts.substitutor_for(list_string).expect("substitution");
    assert_eq!(s.get(e), Some(l.string));

    let list_star =
        TypeApplication(l.model.named_projected(l.list_def, &[TypeProjection::Star]));
    assert_eq!(
        ts.substitutor_for(list_star),
        Err(ResolveError::UnresolvedSupertype {
            supertype: list_star
        })
    );
}

#[test]
fn test_with_classifier_keeps_arguments() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let mutable_def = l.model.interface("MutableList", "lib");
    l.model.declare_type_params(mutable_def, &["E"]);
    let mutable_string = l.model.nullable(l.model.named(mutable_def, &[l.string]));
    let rebound = ts.with_classifier(TypeApplication(mutable_string), l.list_def);
    assert_eq!(
        rebound.type_id(),
        l.model.nullable(l.model.named(l.list_def, &[l.string]))
    );
}

#[test]
fn test_declared_members_and_supertypes() {
    let l = lib();
    let ts: &dyn TypeSystem = &l.model;
    let def = l.model.class("Box", "app");
    let get = l.model.intern("get");
    l.model
        .add_member(def, CallableMember::function(def, get, [], l.string));
    l.model
        .add_supertype(def, l.model.named(l.list_def, &[l.string]));

    let members = ts.declared_members(def);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, get);
    assert_eq!(ts.direct_supertypes(def).len(), 1);
    assert!(ts.declared_members(DefId(4242)).is_empty());
}
