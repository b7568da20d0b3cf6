//! Resolved type payloads
//!
//! A [`TypeInfo`] is either a bare [`StableId`] (a reference to a record in the
//! node table), an inline [`Primitive`], or one of the tagged [`Composite`]
//! shapes. The three are told apart structurally on the wire: integers are
//! references, objects with a `kind` field are primitives and objects with a
//! `type` field are composites.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Pass-local identity of a resolved type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(pub u32);

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Core type payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeInfo {
    /// Non-generic reference to a record
    Id(StableId),
    Primitive(Primitive),
    Composite(Composite),
}

/// Primitive kinds understood by downstream consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    Any,
    Boolean,
    Number,
    NumberLit,
    String,
    StringLit,
    Undefined,
    Null,
    Never,
    Void,
    Symbol,
    /// The non-primitive `object` type
    Object,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Any => "any",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Number => "number",
            PrimitiveKind::NumberLit => "number-lit",
            PrimitiveKind::String => "string",
            PrimitiveKind::StringLit => "string-lit",
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Never => "never",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Symbol => "symbol",
            PrimitiveKind::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<serde_json::Value>,
}

/// Tagged type shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Composite {
    #[serde(rename = "union")]
    Union { members: Vec<TypeInfo> },

    #[serde(rename = "intersection")]
    Intersection { members: Vec<TypeInfo> },

    /// `keyof T`
    #[serde(rename = "index")]
    IndexType {
        #[serde(rename = "keyOf")]
        key_of: Box<TypeInfo>,
    },

    /// `T[K]`
    #[serde(rename = "index-access")]
    IndexedAccess {
        object: Box<TypeInfo>,
        index: Box<TypeInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        constraint: Option<Box<TypeInfo>>,
    },

    #[serde(rename = "interface")]
    Interface(InterfaceInfo),

    #[serde(rename = "tuple")]
    Tuple {
        #[serde(rename = "member")]
        members: Vec<TypeInfo>,
    },

    #[serde(rename = "generics-ref")]
    GenericParamRef {
        #[serde(rename = "targetId")]
        target_id: StableId,
    },

    #[serde(rename = "ref")]
    Reference {
        #[serde(rename = "targetId")]
        target_id: StableId,
        #[serde(rename = "typeArguments")]
        type_arguments: Vec<TypeInfo>,
    },
}

/// Structured object/interface/class shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub is_class: bool,
    pub bases: Vec<TypeInfo>,
    pub call_signatures: Vec<CallSignature>,
    pub construction_signatures: Vec<CallSignature>,
    pub properties: BTreeMap<String, Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSignature {
    pub type_parameters: Vec<Generic>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    pub optional: bool,
}

/// A generic parameter declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generic {
    pub id: StableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeInfo>,
}

impl TypeInfo {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeInfo::Primitive(Primitive {
            kind,
            literal: None,
        })
    }

    pub fn literal(kind: PrimitiveKind, value: serde_json::Value) -> Self {
        TypeInfo::Primitive(Primitive {
            kind,
            literal: Some(value),
        })
    }

    pub fn any() -> Self {
        Self::primitive(PrimitiveKind::Any)
    }

    pub fn union(members: Vec<TypeInfo>) -> Self {
        TypeInfo::Composite(Composite::Union { members })
    }

    pub fn intersection(members: Vec<TypeInfo>) -> Self {
        TypeInfo::Composite(Composite::Intersection { members })
    }

    pub fn tuple(members: Vec<TypeInfo>) -> Self {
        TypeInfo::Composite(Composite::Tuple { members })
    }

    pub fn interface(info: InterfaceInfo) -> Self {
        TypeInfo::Composite(Composite::Interface(info))
    }

    pub fn reference(target_id: StableId, type_arguments: Vec<TypeInfo>) -> Self {
        TypeInfo::Composite(Composite::Reference {
            target_id,
            type_arguments,
        })
    }

    pub fn generic_param(target_id: StableId) -> Self {
        TypeInfo::Composite(Composite::GenericParamRef { target_id })
    }

    /// Record id this payload points at, if it is a reference of either form
    pub fn target_id(&self) -> Option<StableId> {
        match self {
            TypeInfo::Id(id) => Some(*id),
            TypeInfo::Composite(Composite::Reference { target_id, .. }) => Some(*target_id),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceInfo> {
        match self {
            TypeInfo::Composite(Composite::Interface(info)) => Some(info),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeInfo::Primitive(_))
    }

    /// Visit this payload and every payload nested in it, parents first
    pub fn visit(&self, f: &mut impl FnMut(&TypeInfo)) {
        f(self);
        let TypeInfo::Composite(composite) = self else {
            return;
        };
        match composite {
            Composite::Union { members }
            | Composite::Intersection { members }
            | Composite::Tuple { members } => {
                for member in members {
                    member.visit(f);
                }
            }
            Composite::IndexType { key_of } => key_of.visit(f),
            Composite::IndexedAccess {
                object,
                index,
                constraint,
            } => {
                object.visit(f);
                index.visit(f);
                if let Some(constraint) = constraint {
                    constraint.visit(f);
                }
            }
            Composite::Interface(info) => info.visit(f),
            Composite::GenericParamRef { .. } => {}
            Composite::Reference { type_arguments, .. } => {
                for arg in type_arguments {
                    arg.visit(f);
                }
            }
        }
    }

    /// Visit every record id referenced from this payload, including nested ones.
    ///
    /// Generic parameter references are not record references and are skipped.
    pub fn for_each_reference(&self, f: &mut impl FnMut(StableId)) {
        self.visit(&mut |info| {
            if let Some(id) = info.target_id() {
                f(id);
            }
        });
    }

    /// Collect referenced record ids in visit order
    pub fn references(&self) -> Vec<StableId> {
        let mut refs = Vec::new();
        self.for_each_reference(&mut |id| refs.push(id));
        refs
    }
}

impl InterfaceInfo {
    /// Visit the payloads of bases, signatures and properties
    pub fn visit(&self, f: &mut impl FnMut(&TypeInfo)) {
        for base in &self.bases {
            base.visit(f);
        }
        for sig in self
            .call_signatures
            .iter()
            .chain(&self.construction_signatures)
        {
            sig.visit(f);
        }
        for prop in self.properties.values() {
            prop.ty.visit(f);
        }
    }
}

impl CallSignature {
    pub fn visit(&self, f: &mut impl FnMut(&TypeInfo)) {
        for generic in &self.type_parameters {
            if let Some(constraint) = &generic.constraint {
                constraint.visit(f);
            }
        }
        for param in &self.parameters {
            param.ty.visit(f);
        }
        self.return_type.visit(f);
    }
}

impl From<StableId> for TypeInfo {
    fn from(id: StableId) -> Self {
        TypeInfo::Id(id)
    }
}

impl From<PrimitiveKind> for TypeInfo {
    fn from(kind: PrimitiveKind) -> Self {
        TypeInfo::primitive(kind)
    }
}

/// JSON form of a numeric literal; integral values stay integers.
///
/// `NaN` and the infinities have no JSON form and yield `None`. Negative zero
/// is written as `0`, as `JSON.stringify` does.
pub fn number_literal(value: f64) -> Option<serde_json::Value> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Some(serde_json::Value::from(value as i64))
    } else {
        serde_json::Number::from_f64(value).map(serde_json::Value::Number)
    }
}
