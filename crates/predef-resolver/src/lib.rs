//! Type-graph resolution for predef
//!
//! Walks a [`predef_core::TypeHost`] from the global scope and the ambient
//! modules, assigns every reachable class, interface, alias and object literal
//! a stable id, and returns the flattened [`predef_core::PredefTypes`] bundle.

mod alias;
pub mod classify;
pub mod context;
pub mod driver;
pub mod error;
mod interface;
pub mod registry;
mod walker;

pub use classify::{classify, TypeKind};
pub use context::ResolutionContext;
pub use driver::{build_predef_types, TypeResolver};
pub use error::ResolveError;
pub use registry::{IdentityKey, IdentityRegistry, NodeTable};
