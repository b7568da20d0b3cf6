//! Host flag classification
//!
//! Maps the open-ended flag combinations a host reports onto the closed
//! [`TypeKind`] set the walker dispatches on. Combinations outside that set
//! are rejected here so the walker never has to guess.

use predef_core::{ObjectFlags, TypeFlags};

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Any,
    Boolean,
    BooleanLiteral,
    Number,
    NumberLiteral,
    String,
    StringLiteral,
    Undefined,
    Null,
    Never,
    Void,
    Symbol,
    NonPrimitive,
    TypeParameter,
    Union,
    Intersection,
    Index,
    IndexedAccess,
    Conditional,
    Enum,
    /// Instantiation of a generic class, interface or tuple
    Reference,
    /// Declared class or interface
    Nominal,
    /// Object literal or other structural object type
    Anonymous,
}

/// Classify a type from its host flags
pub fn classify(flags: TypeFlags, object_flags: ObjectFlags) -> Result<TypeKind, ResolveError> {
    // enums are unions of enum literals, so they must be caught before unions
    if flags.intersects(TypeFlags::ENUM | TypeFlags::ENUM_LITERAL) {
        return Ok(TypeKind::Enum);
    }
    if flags.contains(TypeFlags::CONDITIONAL) {
        return Ok(TypeKind::Conditional);
    }
    if flags.contains(TypeFlags::ANY) {
        return Ok(TypeKind::Any);
    }
    // `boolean` is reported as a union of its two literals
    if flags.contains(TypeFlags::BOOLEAN) {
        return Ok(TypeKind::Boolean);
    }
    if flags.contains(TypeFlags::BOOLEAN_LITERAL) {
        return Ok(TypeKind::BooleanLiteral);
    }
    if flags.contains(TypeFlags::NUMBER) {
        return Ok(TypeKind::Number);
    }
    if flags.contains(TypeFlags::NUMBER_LITERAL) {
        return Ok(TypeKind::NumberLiteral);
    }
    if flags.contains(TypeFlags::STRING) {
        return Ok(TypeKind::String);
    }
    if flags.contains(TypeFlags::STRING_LITERAL) {
        return Ok(TypeKind::StringLiteral);
    }
    if flags.contains(TypeFlags::UNDEFINED) {
        return Ok(TypeKind::Undefined);
    }
    if flags.contains(TypeFlags::NULL) {
        return Ok(TypeKind::Null);
    }
    if flags.contains(TypeFlags::NEVER) {
        return Ok(TypeKind::Never);
    }
    if flags.contains(TypeFlags::VOID) {
        return Ok(TypeKind::Void);
    }
    if flags.intersects(TypeFlags::ES_SYMBOL | TypeFlags::UNIQUE_ES_SYMBOL) {
        return Ok(TypeKind::Symbol);
    }
    if flags.contains(TypeFlags::NON_PRIMITIVE) {
        return Ok(TypeKind::NonPrimitive);
    }
    if flags.contains(TypeFlags::TYPE_PARAMETER) {
        return Ok(TypeKind::TypeParameter);
    }
    if flags.contains(TypeFlags::UNION) {
        return Ok(TypeKind::Union);
    }
    if flags.contains(TypeFlags::INTERSECTION) {
        return Ok(TypeKind::Intersection);
    }
    if flags.contains(TypeFlags::INDEX) {
        return Ok(TypeKind::Index);
    }
    if flags.contains(TypeFlags::INDEXED_ACCESS) {
        return Ok(TypeKind::IndexedAccess);
    }
    if flags.contains(TypeFlags::OBJECT) {
        return classify_object(flags, object_flags);
    }

    Err(ResolveError::UnexpectedRepresentation(format!(
        "type flags {:?} match no known kind",
        flags
    )))
}

fn classify_object(flags: TypeFlags, object_flags: ObjectFlags) -> Result<TypeKind, ResolveError> {
    if object_flags.contains(ObjectFlags::REFERENCE) {
        Ok(TypeKind::Reference)
    } else if object_flags.intersects(ObjectFlags::CLASS | ObjectFlags::INTERFACE) {
        Ok(TypeKind::Nominal)
    } else if object_flags.contains(ObjectFlags::ANONYMOUS) {
        Ok(TypeKind::Anonymous)
    } else {
        Err(ResolveError::UnexpectedRepresentation(format!(
            "object type with flags {:?} and object flags {:?}",
            flags, object_flags
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind(flags: TypeFlags) -> Result<TypeKind, ResolveError> {
        classify(flags, ObjectFlags::empty())
    }

    #[test]
    fn test_intrinsics() {
        assert_eq!(kind(TypeFlags::ANY), Ok(TypeKind::Any));
        assert_eq!(kind(TypeFlags::STRING), Ok(TypeKind::String));
        assert_eq!(kind(TypeFlags::STRING_LITERAL), Ok(TypeKind::StringLiteral));
        assert_eq!(kind(TypeFlags::NUMBER_LITERAL), Ok(TypeKind::NumberLiteral));
        assert_eq!(kind(TypeFlags::UNIQUE_ES_SYMBOL), Ok(TypeKind::Symbol));
        assert_eq!(kind(TypeFlags::NON_PRIMITIVE), Ok(TypeKind::NonPrimitive));
        assert_eq!(kind(TypeFlags::VOID), Ok(TypeKind::Void));
    }

    #[test]
    fn test_boolean_wins_over_union() {
        assert_eq!(
            kind(TypeFlags::BOOLEAN | TypeFlags::UNION),
            Ok(TypeKind::Boolean)
        );
        assert_eq!(kind(TypeFlags::UNION), Ok(TypeKind::Union));
    }

    #[test]
    fn test_enum_wins_over_union() {
        assert_eq!(kind(TypeFlags::ENUM | TypeFlags::UNION), Ok(TypeKind::Enum));
        assert_eq!(
            kind(TypeFlags::ENUM_LITERAL | TypeFlags::NUMBER_LITERAL),
            Ok(TypeKind::Enum)
        );
    }

    #[test]
    fn test_object_kinds() {
        assert_eq!(
            classify(
                TypeFlags::OBJECT,
                ObjectFlags::REFERENCE | ObjectFlags::INTERFACE
            ),
            Ok(TypeKind::Reference)
        );
        assert_eq!(
            classify(TypeFlags::OBJECT, ObjectFlags::CLASS),
            Ok(TypeKind::Nominal)
        );
        assert_eq!(
            classify(TypeFlags::OBJECT, ObjectFlags::INTERFACE),
            Ok(TypeKind::Nominal)
        );
        assert_eq!(
            classify(TypeFlags::OBJECT, ObjectFlags::ANONYMOUS),
            Ok(TypeKind::Anonymous)
        );
    }

    #[test]
    fn test_unknown_combinations_are_rejected() {
        assert!(matches!(
            kind(TypeFlags::UNKNOWN),
            Err(ResolveError::UnexpectedRepresentation(_))
        ));
        assert!(matches!(
            kind(TypeFlags::empty()),
            Err(ResolveError::UnexpectedRepresentation(_))
        ));
        assert!(matches!(
            classify(TypeFlags::OBJECT, ObjectFlags::MAPPED),
            Err(ResolveError::UnexpectedRepresentation(_))
        ));
    }
}
