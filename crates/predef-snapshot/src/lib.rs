//! Host type-model snapshots
//!
//! A snapshot is a flat, id-linked dump of everything the resolver asks a
//! host about. [`SnapshotHost`] serves it through [`predef_core::TypeHost`],
//! and [`SnapshotBuilder`] writes one programmatically.

pub mod builder;
pub mod error;
pub mod host;
pub mod model;

pub use builder::{ParamSpec, PropertySpec, SignatureRef, SnapshotBuilder, SymbolRef, TypeRef};
pub use error::SnapshotError;
pub use host::{SignatureHandle, SnapshotHost, SymbolHandle, TypeHandle};
pub use model::{HostSnapshot, SignatureEntry, SnapshotFormat, SymbolEntry, TypeEntry};
