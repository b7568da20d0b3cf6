//! Boundary to the host type-checking engine
//!
//! The resolver never owns host data. It asks a [`TypeHost`] about opaque
//! handles and turns the answers into [`crate::types::TypeInfo`] payloads.
//! Flag values mirror the host's own numbering so a snapshot can be dumped
//! straight from the engine.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a host type, stable for one host run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostTypeId(pub u64);

/// Identity of a host symbol, stable for one host run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostSymbolId(pub u64);

impl fmt::Display for HostTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.0)
    }
}

impl fmt::Display for HostSymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol {}", self.0)
    }
}

bitflags! {
    /// Kind flags reported for every type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TypeFlags: u32 {
        const ANY              = 1 << 0;
        const UNKNOWN          = 1 << 1;
        const STRING           = 1 << 2;
        const NUMBER           = 1 << 3;
        const BOOLEAN          = 1 << 4;
        const ENUM             = 1 << 5;
        const BIG_INT          = 1 << 6;
        const STRING_LITERAL   = 1 << 7;
        const NUMBER_LITERAL   = 1 << 8;
        const BOOLEAN_LITERAL  = 1 << 9;
        const ENUM_LITERAL     = 1 << 10;
        const BIG_INT_LITERAL  = 1 << 11;
        const ES_SYMBOL        = 1 << 12;
        const UNIQUE_ES_SYMBOL = 1 << 13;
        const VOID             = 1 << 14;
        const UNDEFINED        = 1 << 15;
        const NULL             = 1 << 16;
        const NEVER            = 1 << 17;
        const TYPE_PARAMETER   = 1 << 18;
        const OBJECT           = 1 << 19;
        const UNION            = 1 << 20;
        const INTERSECTION     = 1 << 21;
        const INDEX            = 1 << 22;
        const INDEXED_ACCESS   = 1 << 23;
        const CONDITIONAL      = 1 << 24;
        const SUBSTITUTION     = 1 << 25;
        const NON_PRIMITIVE    = 1 << 26;
    }

    /// Additional flags reported for object types
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u32 {
        const CLASS          = 1 << 0;
        const INTERFACE      = 1 << 1;
        const REFERENCE      = 1 << 2;
        const TUPLE          = 1 << 3;
        const ANONYMOUS      = 1 << 4;
        const MAPPED         = 1 << 5;
        const INSTANTIATED   = 1 << 6;
        const OBJECT_LITERAL = 1 << 7;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SymbolFlags: u32 {
        const VARIABLE     = 1 << 0;
        const PROPERTY     = 1 << 1;
        const FUNCTION     = 1 << 2;
        const CLASS        = 1 << 3;
        const INTERFACE    = 1 << 4;
        const MODULE       = 1 << 5;
        const METHOD       = 1 << 6;
        const GET_ACCESSOR = 1 << 7;
        const SET_ACCESSOR = 1 << 8;
        const TYPE_ALIAS   = 1 << 9;
        const OPTIONAL     = 1 << 10;
    }

    /// Declaration modifiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ModifierFlags: u32 {
        const EXPORT    = 1 << 0;
        const AMBIENT   = 1 << 1;
        const PUBLIC    = 1 << 2;
        const PRIVATE   = 1 << 3;
        const PROTECTED = 1 << 4;
        const STATIC    = 1 << 5;
        const READONLY  = 1 << 6;
        const ABSTRACT  = 1 << 7;
    }
}

/// Literal value carried by a literal type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

/// One declaration site of a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub file: String,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

/// Read-only view of a host type model.
///
/// Handles are cheap to clone and only meaningful for the host that produced
/// them. Every query is answered from data the host has already computed.
pub trait TypeHost {
    type Type: Clone + fmt::Debug;
    type Symbol: Clone + fmt::Debug;
    type Signature: Clone + fmt::Debug;

    fn type_identity(&self, ty: &Self::Type) -> HostTypeId;
    fn type_flags(&self, ty: &Self::Type) -> TypeFlags;
    fn object_flags(&self, ty: &Self::Type) -> ObjectFlags;
    fn literal_value(&self, ty: &Self::Type) -> Option<LiteralValue>;

    /// Symbol naming a nominal type
    fn type_symbol(&self, ty: &Self::Type) -> Option<Self::Symbol>;
    fn alias_symbol(&self, ty: &Self::Type) -> Option<Self::Symbol>;
    fn alias_type_arguments(&self, ty: &Self::Type) -> Vec<Self::Type>;

    /// Generic target of an instantiation
    fn reference_target(&self, ty: &Self::Type) -> Option<Self::Type>;
    fn type_arguments(&self, ty: &Self::Type) -> Vec<Self::Type>;
    /// Local type parameters of a generic class or interface
    fn type_parameters(&self, ty: &Self::Type) -> Vec<Self::Type>;

    /// Members of a union or intersection, in host order
    fn constituent_types(&self, ty: &Self::Type) -> Vec<Self::Type>;
    /// `T` of `keyof T`
    fn index_operand(&self, ty: &Self::Type) -> Option<Self::Type>;
    /// `(T, K)` of `T[K]`
    fn indexed_access_parts(&self, ty: &Self::Type) -> Option<(Self::Type, Self::Type)>;
    fn constraint(&self, ty: &Self::Type) -> Option<Self::Type>;

    fn base_types(&self, ty: &Self::Type) -> Vec<Self::Type>;
    fn call_signatures(&self, ty: &Self::Type) -> Vec<Self::Signature>;
    fn construct_signatures(&self, ty: &Self::Type) -> Vec<Self::Signature>;
    /// Members declared directly on the type, if the host tracks them separately
    fn declared_properties(&self, ty: &Self::Type) -> Option<Vec<Self::Symbol>>;
    /// Effective members, including inherited ones
    fn properties(&self, ty: &Self::Type) -> Vec<Self::Symbol>;

    fn symbol_identity(&self, sym: &Self::Symbol) -> HostSymbolId;
    fn symbol_name(&self, sym: &Self::Symbol) -> String;
    fn qualified_name(&self, sym: &Self::Symbol) -> String;
    fn symbol_flags(&self, sym: &Self::Symbol) -> SymbolFlags;
    fn declarations(&self, sym: &Self::Symbol) -> Vec<Declaration>;
    /// Type of the symbol at its declaring site
    fn type_of_symbol(&self, sym: &Self::Symbol) -> Option<Self::Type>;
    /// Declared type of a type-level symbol, e.g. the expansion of an alias
    fn declared_type_of_symbol(&self, sym: &Self::Symbol) -> Option<Self::Type>;
    fn alias_type_parameters(&self, sym: &Self::Symbol) -> Vec<Self::Type>;

    fn signature_type_parameters(&self, sig: &Self::Signature) -> Vec<Self::Type>;
    fn signature_parameters(&self, sig: &Self::Signature) -> Vec<Self::Symbol>;
    fn signature_return_type(&self, sig: &Self::Signature) -> Self::Type;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_use_text_form() {
        let flags = TypeFlags::BOOLEAN | TypeFlags::UNION;
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "\"BOOLEAN | UNION\"");

        let parsed: TypeFlags = serde_json::from_str("\"OBJECT\"").unwrap();
        assert_eq!(parsed, TypeFlags::OBJECT);
    }

    #[test]
    fn test_literal_value_is_untagged() {
        let value: LiteralValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, LiteralValue::Number(42.0));
        let value: LiteralValue = serde_json::from_str("\"foo\"").unwrap();
        assert_eq!(value, LiteralValue::String("foo".to_string()));
        let value: LiteralValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, LiteralValue::Boolean(true));
    }

    #[test]
    fn test_declaration_modifiers_default_empty() {
        let decl: Declaration = serde_json::from_str(r#"{"file": "lib.d.ts"}"#).unwrap();
        assert!(decl.modifiers.is_empty());
    }
}
