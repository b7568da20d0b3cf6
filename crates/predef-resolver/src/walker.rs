//! Depth-first walk from host types to `TypeInfo`

use predef_core::types::number_literal;
use predef_core::{
    Composite, LiteralValue, ObjectFlags, PrimitiveKind, TypeHost, TypeInfo, TypeRecord,
};
use serde_json::Value;
use tracing::trace;

use crate::classify::{classify, TypeKind};
use crate::context::ResolutionContext;
use crate::error::ResolveError;
use crate::registry::IdentityKey;

/// Remaining stack below which a descent moves to a fresh segment
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each new stack segment
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

impl<'h, H: TypeHost> ResolutionContext<'h, H> {
    /// Resolve a host type into a payload, registering every named or
    /// anonymous object type it reaches in the node table.
    pub fn resolve(&mut self, ty: &H::Type) -> Result<TypeInfo, ResolveError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            if let Some(alias) = self.host.alias_symbol(ty) {
                return self.resolve_alias(ty, &alias);
            }
            self.walk_structure(ty)
        })
    }

    /// Resolve a type by its own structure, ignoring any alias it carries
    pub(crate) fn walk_structure(&mut self, ty: &H::Type) -> Result<TypeInfo, ResolveError> {
        let flags = self.host.type_flags(ty);
        let kind = classify(flags, self.host.object_flags(ty))?;
        trace!(identity = %self.host.type_identity(ty), ?kind, "walking type");

        match kind {
            TypeKind::Any => Ok(TypeInfo::any()),
            TypeKind::Boolean => Ok(TypeInfo::primitive(PrimitiveKind::Boolean)),
            TypeKind::Number => Ok(TypeInfo::primitive(PrimitiveKind::Number)),
            TypeKind::String => Ok(TypeInfo::primitive(PrimitiveKind::String)),
            TypeKind::Undefined => Ok(TypeInfo::primitive(PrimitiveKind::Undefined)),
            TypeKind::Null => Ok(TypeInfo::primitive(PrimitiveKind::Null)),
            TypeKind::Never => Ok(TypeInfo::primitive(PrimitiveKind::Never)),
            TypeKind::Void => Ok(TypeInfo::primitive(PrimitiveKind::Void)),
            TypeKind::Symbol => Ok(TypeInfo::primitive(PrimitiveKind::Symbol)),
            TypeKind::NonPrimitive => Ok(TypeInfo::primitive(PrimitiveKind::Object)),
            TypeKind::BooleanLiteral => match self.host.literal_value(ty) {
                Some(LiteralValue::Boolean(value)) => {
                    Ok(TypeInfo::literal(PrimitiveKind::Boolean, Value::Bool(value)))
                }
                other => Err(self.bad_literal(ty, "boolean", other)),
            },
            TypeKind::NumberLiteral => match self.host.literal_value(ty) {
                Some(LiteralValue::Number(value)) => {
                    let literal = number_literal(value).ok_or_else(|| {
                        self.unexpected(ty, &format!("number literal {} has no JSON form", value))
                    })?;
                    Ok(TypeInfo::literal(PrimitiveKind::NumberLit, literal))
                }
                other => Err(self.bad_literal(ty, "number", other)),
            },
            TypeKind::StringLiteral => match self.host.literal_value(ty) {
                Some(LiteralValue::String(value)) => Ok(TypeInfo::literal(
                    PrimitiveKind::StringLit,
                    Value::String(value),
                )),
                other => Err(self.bad_literal(ty, "string", other)),
            },
            TypeKind::TypeParameter => Ok(TypeInfo::generic_param(self.generic_id(ty))),
            TypeKind::Union => Ok(TypeInfo::union(self.resolve_constituents(ty)?)),
            TypeKind::Intersection => Ok(TypeInfo::intersection(self.resolve_constituents(ty)?)),
            TypeKind::Index => {
                let operand = self.host.index_operand(ty).ok_or_else(|| {
                    self.unexpected(ty, "keyof type without an operand")
                })?;
                Ok(TypeInfo::Composite(Composite::IndexType {
                    key_of: Box::new(self.resolve(&operand)?),
                }))
            }
            TypeKind::IndexedAccess => {
                let (object, index) = self.host.indexed_access_parts(ty).ok_or_else(|| {
                    self.unexpected(ty, "indexed access without object and index types")
                })?;
                let object = self.resolve(&object)?;
                let index = self.resolve(&index)?;
                let constraint = match self.host.constraint(ty) {
                    Some(constraint) => Some(Box::new(self.resolve(&constraint)?)),
                    None => None,
                };
                Ok(TypeInfo::Composite(Composite::IndexedAccess {
                    object: Box::new(object),
                    index: Box::new(index),
                    constraint,
                }))
            }
            TypeKind::Conditional => Err(ResolveError::UnsupportedConstruct(format!(
                "conditional type ({})",
                self.host.type_identity(ty)
            ))),
            TypeKind::Enum => Err(ResolveError::UnsupportedConstruct(format!(
                "enum type '{}'",
                self.describe(ty)
            ))),
            TypeKind::Reference => self.resolve_instantiation(ty),
            TypeKind::Nominal => Ok(TypeInfo::Id(self.ensure_interface(ty)?)),
            TypeKind::Anonymous => self.resolve_anonymous(ty),
        }
    }

    fn resolve_constituents(&mut self, ty: &H::Type) -> Result<Vec<TypeInfo>, ResolveError> {
        self.host
            .constituent_types(ty)
            .iter()
            .map(|member| self.resolve(member))
            .collect()
    }

    /// `Target<Args>`: tuples are inlined, everything else becomes a generic reference
    fn resolve_instantiation(&mut self, ty: &H::Type) -> Result<TypeInfo, ResolveError> {
        let target = self
            .host
            .reference_target(ty)
            .ok_or_else(|| self.unexpected(ty, "instantiation without a target"))?;
        let args = self.host.type_arguments(ty);

        if self.host.object_flags(&target).contains(ObjectFlags::TUPLE) {
            let members = args
                .iter()
                .map(|arg| self.resolve(arg))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TypeInfo::tuple(members));
        }

        let target_id = self.ensure_interface(&target)?;
        self.emit_ref(target_id, &args)
    }

    /// Object literal types are inlined where they occur. The table still gets
    /// an unnamed record so that a cyclic encounter can point back at it.
    fn resolve_anonymous(&mut self, ty: &H::Type) -> Result<TypeInfo, ResolveError> {
        let (id, started) = self
            .registry
            .reserve(IdentityKey::Type(self.host.type_identity(ty)));
        if started {
            return Ok(TypeInfo::Id(id));
        }
        self.table.reserve(id);

        let symbol = self.host.type_symbol(ty);
        let body = TypeInfo::interface(self.build_interface(ty, symbol.as_ref())?);
        self.table.fill(TypeRecord::anonymous(id, body.clone()));
        Ok(body)
    }

    fn describe(&self, ty: &H::Type) -> String {
        self.host
            .type_symbol(ty)
            .map(|sym| self.host.qualified_name(&sym))
            .unwrap_or_else(|| self.host.type_identity(ty).to_string())
    }

    fn unexpected(&self, ty: &H::Type, what: &str) -> ResolveError {
        ResolveError::UnexpectedRepresentation(format!(
            "{} ({})",
            what,
            self.host.type_identity(ty)
        ))
    }

    fn bad_literal(&self, ty: &H::Type, expected: &str, found: Option<LiteralValue>) -> ResolveError {
        ResolveError::UnexpectedRepresentation(format!(
            "{} literal type ({}) carries {:?}",
            expected,
            self.host.type_identity(ty),
            found
        ))
    }
}
