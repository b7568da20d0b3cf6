//! On-disk form of a host type model
//!
//! Every cross-reference is the integer id of another entry. Flags use the
//! `bitflags` text form, e.g. `"OBJECT"` or `"BOOLEAN | UNION"`.

use std::path::Path;

use predef_core::{Declaration, LiteralValue, ObjectFlags, SymbolFlags, TypeFlags};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SnapshotError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub symbols: Vec<SymbolEntry>,
    #[serde(default)]
    pub signatures: Vec<SignatureEntry>,
    /// Symbol whose type is the global scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<u64>,
    /// Ambient module symbols, in output order
    #[serde(default)]
    pub ambient_modules: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
    pub id: u64,
    pub flags: TypeFlags,
    #[serde(default, skip_serializing_if = "ObjectFlags::is_empty")]
    pub object_flags: ObjectFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<LiteralValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_symbol: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias_type_arguments: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<u64>,
    /// Union or intersection members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<u64>,
    /// Operand of `keyof`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_operand: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_signatures: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct_signatures: Vec<u64>,
    /// Members declared on the type itself; absent when the host does not
    /// separate them from the effective members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_properties: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolEntry {
    pub id: u64,
    pub name: String,
    /// Defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub flags: SymbolFlags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<Declaration>,
    /// Type at the declaring site
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias_type_parameters: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<u64>,
    /// Parameter symbols, in order
    #[serde(default)]
    pub parameters: Vec<u64>,
    pub return_type: u64,
}

/// Serialization format of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the format from a file extension. Anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

impl HostSnapshot {
    pub fn from_json_str(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let format = SnapshotFormat::from_path(path);
        debug!("Loading {:?} snapshot from {}", format, path.display());
        let content = std::fs::read_to_string(path)?;
        match format {
            SnapshotFormat::Json => Self::from_json_str(&content),
            SnapshotFormat::Yaml => Self::from_yaml_str(&content),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, SnapshotError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn to_yaml(&self) -> Result<String, SnapshotError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let content = match SnapshotFormat::from_path(path) {
            SnapshotFormat::Json => self.to_json(true)?,
            SnapshotFormat::Yaml => self.to_yaml()?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"{
        "types": [
            {"id": 1, "flags": "STRING"},
            {"id": 2, "flags": "OBJECT", "objectFlags": "ANONYMOUS", "properties": [11]}
        ],
        "symbols": [
            {"id": 10, "name": "global", "flags": "MODULE", "type": 2},
            {"id": 11, "name": "name", "flags": "PROPERTY",
             "declarations": [{"file": "lib.d.ts", "modifiers": "READONLY"}], "type": 1}
        ],
        "global": 10
    }"#;

    #[test]
    fn test_parse_json_snapshot() {
        let snapshot = HostSnapshot::from_json_str(MINIMAL).unwrap();
        assert_eq!(snapshot.types.len(), 2);
        assert_eq!(snapshot.types[1].object_flags, ObjectFlags::ANONYMOUS);
        assert_eq!(snapshot.symbols[1].ty, Some(1));
        assert_eq!(snapshot.global, Some(10));
        assert!(snapshot.ambient_modules.is_empty());
        assert!(snapshot.signatures.is_empty());
    }

    #[test]
    fn test_yaml_matches_json() {
        let snapshot = HostSnapshot::from_json_str(MINIMAL).unwrap();
        let yaml = snapshot.to_yaml().unwrap();
        assert_eq!(HostSnapshot::from_yaml_str(&yaml).unwrap(), snapshot);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SnapshotFormat::from_path(Path::new("host.yml")),
            SnapshotFormat::Yaml
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("host.json")),
            SnapshotFormat::Json
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("host")),
            SnapshotFormat::Json
        );
    }

    #[test]
    fn test_save_and_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.yaml");
        let snapshot = HostSnapshot::from_json_str(MINIMAL).unwrap();
        snapshot.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("flags: STRING"));
        assert_eq!(HostSnapshot::load(&path).unwrap(), snapshot);
    }
}
