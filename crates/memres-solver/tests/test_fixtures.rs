//! Shared hierarchy-building helpers for the solver unit tests.

use crate::{
    CallableMember, DefId, MemberCache, MemberResolver, ResolveError, ResolvedMember,
    ResolverOptions, TypeId, TypeModel,
};
use memres_common::Atom;
use std::sync::Arc;

/// A reference model pre-populated with a few library classifiers.
pub(crate) struct Fixture {
    pub model: TypeModel,
    pub string: TypeId,
    pub number: TypeId,
    pub int: TypeId,
    pub unit: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let model = TypeModel::new();
        let string_def = model.class("String", "lib");
        let number_def = model.class("Number", "lib");
        let int_def = model.class("Int", "lib");
        let unit_def = model.class("Unit", "lib");
        let number = model.named(number_def, &[]);
        model.add_supertype(int_def, number);
        Self {
            string: model.named(string_def, &[]),
            number,
            int: model.named(int_def, &[]),
            unit: model.named(unit_def, &[]),
            model,
        }
    }

    pub fn name(&self, text: &str) -> Atom {
        self.model.intern(text)
    }

    pub fn class(&self, name: &str) -> DefId {
        self.model.class(name, "app")
    }

    pub fn interface(&self, name: &str) -> DefId {
        self.model.interface(name, "app")
    }

    /// `sub : sup` without type arguments.
    pub fn extends(&self, sub: DefId, sup: DefId) {
        self.model.add_supertype(sub, self.model.named(sup, &[]));
    }

    /// `sub : sup<args..>`.
    pub fn extends_with(&self, sub: DefId, sup: DefId, args: &[TypeId]) {
        self.model.add_supertype(sub, self.model.named(sup, args));
    }

    pub fn function(&self, owner: DefId, name: &str, params: &[TypeId], ret: TypeId) {
        self.model.add_member(
            owner,
            CallableMember::function(owner, self.name(name), params.iter().copied(), ret),
        );
    }

    pub fn add(&self, owner: DefId, member: CallableMember) {
        self.model.add_member(owner, member);
    }

    pub fn resolve_all(&self, def: DefId) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        self.resolve_all_with(def, ResolverOptions::default())
    }

    pub fn resolve_all_with(
        &self,
        def: DefId,
        options: ResolverOptions,
    ) -> Result<Arc<[ResolvedMember]>, ResolveError> {
        let cache = MemberCache::new();
        MemberResolver::new(&self.model, &cache)
            .with_options(options)
            .resolve_all_members(def)
    }

    /// Members called `name`.
    pub fn named<'m>(&self, members: &'m [ResolvedMember], name: &str) -> Vec<&'m ResolvedMember> {
        let atom = self.name(name);
        members.iter().filter(|m| m.name() == atom).collect()
    }
}
