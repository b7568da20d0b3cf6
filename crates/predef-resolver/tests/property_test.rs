//! Ordering and identity properties over generated host models

use predef_core::{PrimitiveKind, ResolverConfig, TypeFlags, TypeInfo};
use predef_resolver::{ResolutionContext, TypeResolver};
use predef_snapshot::{PropertySpec, SnapshotBuilder, TypeRef};
use proptest::prelude::*;

const KINDS: [(TypeFlags, PrimitiveKind); 8] = [
    (TypeFlags::ANY, PrimitiveKind::Any),
    (TypeFlags::STRING, PrimitiveKind::String),
    (TypeFlags::NUMBER, PrimitiveKind::Number),
    (TypeFlags::UNDEFINED, PrimitiveKind::Undefined),
    (TypeFlags::NULL, PrimitiveKind::Null),
    (TypeFlags::NEVER, PrimitiveKind::Never),
    (TypeFlags::VOID, PrimitiveKind::Void),
    (TypeFlags::ES_SYMBOL, PrimitiveKind::Symbol),
];

fn members(b: &mut SnapshotBuilder, picks: &[usize]) -> (Vec<TypeRef>, Vec<TypeInfo>) {
    picks
        .iter()
        .map(|&i| {
            let (flags, kind) = KINDS[i];
            (b.intrinsic(flags), TypeInfo::primitive(kind))
        })
        .unzip()
}

proptest! {
    #[test]
    fn union_members_keep_host_order(picks in prop::collection::vec(0..KINDS.len(), 1..10)) {
        let mut b = SnapshotBuilder::new();
        let global = b.global();
        let (refs, expected) = members(&mut b, &picks);
        let union = b.union(&refs);
        b.property(global, PropertySpec::variable("value", union));
        let host = b.into_host().unwrap();

        let bundle = TypeResolver::new(&host).build_predef_types(&host.global(), &[]).unwrap();
        let value = &bundle.global_type.as_interface().unwrap().properties["value"];
        // duplicates are kept, nothing is sorted
        prop_assert_eq!(&value.ty, &TypeInfo::union(expected));
    }

    #[test]
    fn intersection_members_keep_host_order(picks in prop::collection::vec(0..KINDS.len(), 1..10)) {
        let mut b = SnapshotBuilder::new();
        let global = b.global();
        let (refs, expected) = members(&mut b, &picks);
        let intersection = b.intersection(&refs);
        b.property(global, PropertySpec::variable("value", intersection));
        let host = b.into_host().unwrap();

        let bundle = TypeResolver::new(&host).build_predef_types(&host.global(), &[]).unwrap();
        let value = &bundle.global_type.as_interface().unwrap().properties["value"];
        prop_assert_eq!(&value.ty, &TypeInfo::intersection(expected));
    }

    #[test]
    fn tuple_elements_keep_position(picks in prop::collection::vec(0..KINDS.len(), 0..10)) {
        let mut b = SnapshotBuilder::new();
        let global = b.global();
        let (refs, expected) = members(&mut b, &picks);
        let tuple = b.tuple(&refs);
        b.property(global, PropertySpec::variable("value", tuple));
        let host = b.into_host().unwrap();

        let bundle = TypeResolver::new(&host).build_predef_types(&host.global(), &[]).unwrap();
        let value = &bundle.global_type.as_interface().unwrap().properties["value"];
        prop_assert_eq!(&value.ty, &TypeInfo::tuple(expected));
        prop_assert_eq!(bundle.types.len(), 1);
    }

    #[test]
    fn repeated_resolution_yields_one_record(repeats in 1usize..6) {
        let mut b = SnapshotBuilder::new();
        b.global();
        let string = b.string();
        let item = b.interface("Item");
        b.property(item, PropertySpec::data("label", string));
        let host = b.into_host().unwrap();

        let config = ResolverConfig::default();
        let mut ctx = ResolutionContext::new(&host, &config);
        let handle = host.type_handle(item.0).unwrap();
        let first = ctx.resolve(&handle).unwrap();
        for _ in 0..repeats {
            prop_assert_eq!(&ctx.resolve(&handle).unwrap(), &first);
        }
        let records = ctx.finish().unwrap();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(TypeInfo::Id(records[0].id), first);
    }
}
