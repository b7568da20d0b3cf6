//! Loading hand-written snapshot files from disk

use predef_core::{LiteralValue, ModifierFlags, ObjectFlags, TypeFlags, TypeHost};
use predef_snapshot::{HostSnapshot, SnapshotError, SnapshotHost};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// ```ts
/// interface Flag { readonly on: boolean; label?: "yes"; }
/// declare var flag: Flag;
/// ```
const FLAG_YAML: &str = r#"
global: 0
types:
  - id: 10
    flags: OBJECT
    objectFlags: ANONYMOUS
    symbol: 0
    properties: [1]
  - id: 11
    flags: OBJECT
    objectFlags: INTERFACE
    symbol: 2
    properties: [3, 4]
  - id: 12
    flags: BOOLEAN | UNION
    types: [13, 14]
  - id: 13
    flags: BOOLEAN_LITERAL
    literal: false
  - id: 14
    flags: BOOLEAN_LITERAL
    literal: true
  - id: 15
    flags: STRING_LITERAL
    literal: "yes"
symbols:
  - id: 0
    name: global
    flags: MODULE
    type: 10
  - id: 1
    name: flag
    flags: VARIABLE
    declarations: [{ file: flag.d.ts }]
    type: 11
  - id: 2
    name: Flag
    flags: INTERFACE
    declarations: [{ file: flag.d.ts }]
    declaredType: 11
  - id: 3
    name: "on"
    flags: PROPERTY
    declarations: [{ file: flag.d.ts, modifiers: READONLY }]
    type: 12
  - id: 4
    name: label
    flags: PROPERTY | OPTIONAL
    declarations: [{ file: flag.d.ts }]
    type: 15
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_yaml_snapshot_with_text_flags() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = write(&dir, "flag.yaml", FLAG_YAML);

    let host = SnapshotHost::load(&path)?;
    let global = host.global();
    let global_type = host.type_of_symbol(&global).ok_or("global has no type")?;
    assert_eq!(host.object_flags(&global_type), ObjectFlags::ANONYMOUS);

    let flag = &host.properties(&global_type)[0];
    let flag_type = host.type_of_symbol(flag).ok_or("flag has no type")?;
    let members = host.properties(&flag_type);
    assert_eq!(host.symbol_name(&members[0]), "on");

    let on = host.type_of_symbol(&members[0]).ok_or("on has no type")?;
    assert_eq!(host.type_flags(&on), TypeFlags::BOOLEAN | TypeFlags::UNION);
    let literals: Vec<_> = host
        .constituent_types(&on)
        .iter()
        .map(|t| host.literal_value(t))
        .collect();
    assert_eq!(
        literals,
        vec![Some(LiteralValue::Boolean(false)), Some(LiteralValue::Boolean(true))]
    );
    assert!(host.declarations(&members[0])[0]
        .modifiers
        .contains(ModifierFlags::READONLY));

    let label = host.type_of_symbol(&members[1]).ok_or("label has no type")?;
    assert_eq!(
        host.literal_value(&label),
        Some(LiteralValue::String("yes".to_string()))
    );
    Ok(())
}

#[test]
fn test_json_copy_of_yaml_snapshot_is_identical() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let yaml = write(&dir, "flag.yml", FLAG_YAML);
    let snapshot = HostSnapshot::load(&yaml)?;

    let json = dir.path().join("flag.json");
    snapshot.save(&json)?;
    assert!(fs::read_to_string(&json)?.contains("\"BOOLEAN | UNION\""));
    assert_eq!(HostSnapshot::load(&json)?, snapshot);
    Ok(())
}

#[test]
fn test_dangling_symbol_names_its_owner() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let broken = FLAG_YAML.replace("properties: [3, 4]", "properties: [3, 40]");
    let path = write(&dir, "broken.yaml", &broken);

    match SnapshotHost::load(&path) {
        Err(SnapshotError::DanglingSymbol { id, .. }) => assert_eq!(id, 40),
        Err(other) => return Err(format!("unexpected error {}", other).into()),
        Ok(_) => return Err("dangling symbol was accepted".into()),
    }
    Ok(())
}

#[test]
fn test_malformed_flags_are_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let broken = FLAG_YAML.replace("BOOLEAN | UNION", "BOOLEAN | NOPE");
    let path = write(&dir, "broken.yaml", &broken);

    assert!(matches!(
        SnapshotHost::load(&path),
        Err(SnapshotError::Yaml(_))
    ));
    Ok(())
}
