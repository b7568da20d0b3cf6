//! Result bundle produced by one resolution pass

use crate::error::CoreError;
use crate::types::{Generic, StableId, TypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Finished entry of the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecord {
    pub id: StableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_files: Option<Vec<String>>,
    pub is_alias: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_type_parameters: Option<Vec<Generic>>,
    /// Local generic parameters of a generic class or interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<Vec<Generic>>,
    pub body: TypeInfo,
}

impl TypeRecord {
    /// Record without naming metadata, as used for anonymous object types
    pub fn anonymous(id: StableId, body: TypeInfo) -> Self {
        Self {
            id,
            name: None,
            qualified_name: None,
            origin_files: None,
            is_alias: false,
            alias_type_parameters: None,
            type_parameters: None,
            body,
        }
    }

    pub fn display_name(&self) -> String {
        self.qualified_name
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("<anonymous {}>", self.id))
    }
}

/// An ambient module and its exported surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
}

/// Serializable output of a resolution pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefTypes {
    pub global_type: TypeInfo,
    pub ambient_modules: Vec<Module>,
    pub types: Vec<TypeRecord>,
}

impl PredefTypes {
    pub fn find_record(&self, id: StableId) -> Option<&TypeRecord> {
        self.types.iter().find(|record| record.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TypeRecord> {
        self.types
            .iter()
            .find(|record| record.name.as_deref() == Some(name))
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.ambient_modules.iter().find(|m| m.name == name)
    }

    /// Every payload root in the bundle: global type, module surfaces and record bodies
    pub fn roots(&self) -> impl Iterator<Item = &TypeInfo> {
        std::iter::once(&self.global_type)
            .chain(self.ambient_modules.iter().map(|m| &m.ty))
            .chain(self.types.iter().map(|r| &r.body))
    }

    /// Check the table invariants: unique ids and no dangling references
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut ids = HashSet::new();
        for record in &self.types {
            if !ids.insert(record.id) {
                return Err(CoreError::DuplicateRecord(record.id));
            }
        }

        let mut dangling = None;
        for root in self.roots() {
            root.for_each_reference(&mut |id| {
                if dangling.is_none() && !ids.contains(&id) {
                    dangling = Some(id);
                }
            });
            if let Some(id) = dangling {
                return Err(CoreError::DanglingReference(id));
            }
        }

        tracing::trace!("Validated bundle with {} records", self.types.len());
        Ok(())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, CoreError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn bundle(types: Vec<TypeRecord>, global: TypeInfo) -> PredefTypes {
        PredefTypes {
            global_type: global,
            ambient_modules: vec![],
            types,
        }
    }

    #[test]
    fn test_validate_accepts_closed_bundle() {
        let record = TypeRecord::anonymous(StableId(0), TypeInfo::Id(StableId(0)));
        let types = bundle(vec![record], TypeInfo::Id(StableId(0)));
        assert!(types.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let types = bundle(
            vec![],
            TypeInfo::reference(StableId(3), vec![TypeInfo::any()]),
        );
        match types.validate() {
            Err(CoreError::DanglingReference(id)) => assert_eq!(id, StableId(3)),
            other => panic!("Expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_duplicate_record() {
        let a = TypeRecord::anonymous(StableId(1), TypeInfo::any());
        let b = TypeRecord::anonymous(StableId(1), TypeInfo::any());
        assert!(matches!(
            bundle(vec![a, b], TypeInfo::any()).validate(),
            Err(CoreError::DuplicateRecord(StableId(1)))
        ));
    }

    #[test]
    fn test_compact_wire_format() {
        let record = TypeRecord {
            id: StableId(0),
            name: Some("Pair".to_string()),
            qualified_name: Some("Pair".to_string()),
            origin_files: Some(vec!["lib.d.ts".to_string()]),
            is_alias: true,
            alias_type_parameters: None,
            type_parameters: None,
            body: TypeInfo::tuple(vec![
                TypeInfo::primitive(PrimitiveKind::String),
                TypeInfo::primitive(PrimitiveKind::Number),
            ]),
        };
        let types = PredefTypes {
            global_type: TypeInfo::Id(StableId(0)),
            ambient_modules: vec![Module {
                name: "\"fs\"".to_string(),
                ty: TypeInfo::Id(StableId(0)),
            }],
            types: vec![record],
        };

        assert_snapshot!(
            types.to_json(false).unwrap(),
            @r#"{"globalType":0,"ambientModules":[{"name":"\"fs\"","type":0}],"types":[{"id":0,"name":"Pair","qualifiedName":"Pair","originFiles":["lib.d.ts"],"isAlias":true,"body":{"type":"tuple","member":[{"kind":"string"},{"kind":"number"}]}}]}"#
        );
    }

    #[test]
    fn test_json_round_trip_preserves_bundle() {
        let types = bundle(
            vec![TypeRecord::anonymous(StableId(0), TypeInfo::any())],
            TypeInfo::Id(StableId(0)),
        );
        let parsed = PredefTypes::from_json(&types.to_json(true).unwrap()).unwrap();
        assert_eq!(parsed, types);
    }
}
