//! Output model and host boundary for predef
//!
//! `predef` flattens the type graph of a host type checker into a
//! deduplicated, serializable bundle. This crate holds the parts shared by the
//! resolver, the host snapshot and the CLI.

pub mod analysis;
pub mod config;
pub mod error;
pub mod host;
pub mod ir;
pub mod types;

pub use config::{MemberSet, OutputConfig, PredefConfig, ResolverConfig};
pub use error::CoreError;
pub use host::{
    Declaration, HostSymbolId, HostTypeId, LiteralValue, ModifierFlags, ObjectFlags, SymbolFlags,
    TypeFlags, TypeHost,
};
pub use ir::{Module, PredefTypes, TypeRecord};
pub use types::{
    CallSignature, Composite, Generic, InterfaceInfo, Parameter, Primitive, PrimitiveKind,
    Property, StableId, TypeInfo,
};
