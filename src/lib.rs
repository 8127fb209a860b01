//! memres: transitive member resolution for reflective queries.
//!
//! Re-exports the engine from `memres-solver` and the shared interner from
//! `memres-common`, plus [`tracing_config`] for hosts that want the engine's
//! logs on stderr.
//!
//! ```ignore
//! use memres::{MemberCache, MemberResolver, TypeModel};
//!
//! let model = TypeModel::new();
//! let base = model.interface("Base", "app");
//! let derived = model.class("Derived", "app");
//! model.add_supertype(derived, model.named(base, &[]));
//!
//! let cache = MemberCache::new();
//! let members = MemberResolver::new(&model, &cache).resolve_all_members(derived)?;
//! ```

pub use memres_common::{Atom, Interner, limits};
pub use memres_solver::*;

pub mod tracing_config;
