//! Fail-fast behaviour of a resolution pass

use predef_core::{ObjectFlags, PrimitiveKind, ResolverConfig, TypeFlags, TypeInfo};
use predef_resolver::{ResolutionContext, ResolveError, TypeResolver};
use predef_snapshot::{PropertySpec, SnapshotBuilder};
use predef_test_fixtures::{FixtureType, TestFixtures};

fn resolve(fixture: FixtureType) -> Result<predef_core::PredefTypes, ResolveError> {
    let host = TestFixtures::host(fixture);
    TypeResolver::new(&host).build_predef_types(&host.global(), &host.ambient_modules())
}

#[test]
fn test_conditional_type_aborts_the_pass() {
    match resolve(FixtureType::ConditionalType) {
        Err(ResolveError::UnsupportedConstruct(message)) => {
            assert!(message.contains("conditional"), "unexpected message: {}", message);
        }
        other => panic!("Expected unsupported construct, got {:?}", other),
    }
}

#[test]
fn test_enum_type_is_unsupported() {
    match resolve(FixtureType::EnumType) {
        Err(ResolveError::UnsupportedConstruct(message)) => {
            assert!(message.contains("Direction"), "unexpected message: {}", message);
        }
        other => panic!("Expected unsupported construct, got {:?}", other),
    }
}

#[test]
fn test_mapped_type_is_unexpected() {
    assert!(matches!(
        resolve(FixtureType::MappedType),
        Err(ResolveError::UnexpectedRepresentation(_))
    ));
}

#[test]
fn test_missing_declaration_names_the_member() {
    assert_eq!(
        resolve(FixtureType::MissingDeclaration),
        Err(ResolveError::MissingDeclaration("name".to_string()))
    );
}

#[test]
fn test_unknown_and_bigint_are_unexpected() -> Result<(), Box<dyn std::error::Error>> {
    for flags in [TypeFlags::UNKNOWN, TypeFlags::BIG_INT, TypeFlags::SUBSTITUTION] {
        let mut b = SnapshotBuilder::new();
        let global = b.global();
        let odd = b.intrinsic(flags);
        b.property(global, PropertySpec::variable("odd", odd));
        let host = b.into_host()?;

        let result = TypeResolver::new(&host).build_predef_types(&host.global(), &[]);
        assert!(
            matches!(result, Err(ResolveError::UnexpectedRepresentation(_))),
            "{:?} should be rejected, got {:?}",
            flags,
            result
        );
    }
    Ok(())
}

#[test]
fn test_literal_without_value_is_unexpected() -> Result<(), Box<dyn std::error::Error>> {
    let mut b = SnapshotBuilder::new();
    b.global();
    let bare = b.intrinsic(TypeFlags::STRING_LITERAL);
    let host = b.into_host()?;

    let config = ResolverConfig::default();
    let mut ctx = ResolutionContext::new(&host, &config);
    let handle = host.type_handle(bare.0).expect("type exists");
    assert!(matches!(
        ctx.resolve(&handle),
        Err(ResolveError::UnexpectedRepresentation(_))
    ));
    Ok(())
}

#[test]
fn test_non_finite_number_literal_is_unexpected() -> Result<(), Box<dyn std::error::Error>> {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut b = SnapshotBuilder::new();
        let global = b.global();
        let odd = b.number_literal(value);
        b.property(global, PropertySpec::variable("odd", odd));
        let host = b.into_host()?;

        match TypeResolver::new(&host).build_predef_types(&host.global(), &[]) {
            Err(ResolveError::UnexpectedRepresentation(message)) => {
                assert!(message.contains("no JSON form"), "unexpected message: {}", message);
            }
            other => panic!("{} should be rejected, got {:?}", value, other),
        }
    }
    Ok(())
}

#[test]
fn test_error_deep_in_the_graph_propagates_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    // global.outer: Outer { inner: Inner { broken: string extends T ? ... } }
    let mut b = SnapshotBuilder::new();
    let global = b.global();
    let conditional = b.conditional();
    let inner = b.interface("Inner");
    b.property(inner, PropertySpec::data("broken", conditional));
    let outer = b.interface("Outer");
    b.property(outer, PropertySpec::data("inner", inner));
    b.property(global, PropertySpec::variable("outer", outer));
    let host = b.into_host()?;

    let result = TypeResolver::new(&host).build_predef_types(&host.global(), &[]);
    assert!(matches!(result, Err(ResolveError::UnsupportedConstruct(_))));
    Ok(())
}

#[test]
fn test_instantiation_without_target_is_unexpected() -> Result<(), Box<dyn std::error::Error>> {
    let mut b = SnapshotBuilder::new();
    b.global();
    let dangling = b.raw(TypeFlags::OBJECT, ObjectFlags::REFERENCE);
    let host = b.into_host()?;

    let config = ResolverConfig::default();
    let mut ctx = ResolutionContext::new(&host, &config);
    let handle = host.type_handle(dangling.0).expect("type exists");
    match ctx.resolve(&handle) {
        Err(ResolveError::UnexpectedRepresentation(message)) => {
            assert!(message.contains("without a target"), "unexpected message: {}", message);
        }
        other => panic!("Expected unexpected representation, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_successful_context_freezes_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let mut b = SnapshotBuilder::new();
    b.global();
    let string = b.string();
    let host = b.into_host()?;

    let config = ResolverConfig::default();
    let mut ctx = ResolutionContext::new(&host, &config);
    let handle = host.type_handle(string.0).expect("type exists");
    assert_eq!(ctx.resolve(&handle)?, TypeInfo::primitive(PrimitiveKind::String));
    assert!(ctx.finish()?.is_empty());
    Ok(())
}
