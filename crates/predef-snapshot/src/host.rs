//! `TypeHost` implementation over a validated snapshot

use std::collections::HashMap;
use std::path::Path;

use predef_core::{
    Declaration, HostSymbolId, HostTypeId, LiteralValue, ObjectFlags, SymbolFlags, TypeFlags,
    TypeHost,
};
use tracing::debug;

use crate::error::SnapshotError;
use crate::model::{HostSnapshot, SignatureEntry, SymbolEntry, TypeEntry};

/// Handle to a type of a [`SnapshotHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(usize);

/// Handle to a symbol of a [`SnapshotHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolHandle(usize);

/// Handle to a signature of a [`SnapshotHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureHandle(usize);

/// Host backed by a [`HostSnapshot`].
///
/// Construction checks that ids are unique and that every reference points at
/// an existing entry, so handles can only be created for entries that exist.
#[derive(Debug)]
pub struct SnapshotHost {
    snapshot: HostSnapshot,
    type_index: HashMap<u64, usize>,
    symbol_index: HashMap<u64, usize>,
    signature_index: HashMap<u64, usize>,
    global: SymbolHandle,
}

impl SnapshotHost {
    pub fn new(snapshot: HostSnapshot) -> Result<Self, SnapshotError> {
        let type_index = index_ids(snapshot.types.iter().map(|t| t.id), SnapshotError::DuplicateType)?;
        let symbol_index =
            index_ids(snapshot.symbols.iter().map(|s| s.id), SnapshotError::DuplicateSymbol)?;
        let signature_index = index_ids(
            snapshot.signatures.iter().map(|s| s.id),
            SnapshotError::DuplicateSignature,
        )?;

        let checker = RefChecker {
            types: &type_index,
            symbols: &symbol_index,
            signatures: &signature_index,
        };
        checker.check(&snapshot)?;

        let global_id = snapshot.global.ok_or(SnapshotError::MissingGlobal)?;
        let global = SymbolHandle(checker.symbol("global", global_id)?);

        debug!(
            types = snapshot.types.len(),
            symbols = snapshot.symbols.len(),
            signatures = snapshot.signatures.len(),
            "Loaded host snapshot"
        );

        Ok(Self {
            snapshot,
            type_index,
            symbol_index,
            signature_index,
            global,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        Self::new(HostSnapshot::load(path)?)
    }

    pub fn snapshot(&self) -> &HostSnapshot {
        &self.snapshot
    }

    pub fn global(&self) -> SymbolHandle {
        self.global
    }

    pub fn ambient_modules(&self) -> Vec<SymbolHandle> {
        self.snapshot
            .ambient_modules
            .iter()
            .map(|id| self.symbol_ref(*id))
            .collect()
    }

    pub fn type_handle(&self, id: u64) -> Option<TypeHandle> {
        self.type_index.get(&id).copied().map(TypeHandle)
    }

    pub fn symbol_handle(&self, id: u64) -> Option<SymbolHandle> {
        self.symbol_index.get(&id).copied().map(SymbolHandle)
    }

    pub fn signature_handle(&self, id: u64) -> Option<SignatureHandle> {
        self.signature_index.get(&id).copied().map(SignatureHandle)
    }

    fn ty(&self, handle: &TypeHandle) -> &TypeEntry {
        &self.snapshot.types[handle.0]
    }

    fn sym(&self, handle: &SymbolHandle) -> &SymbolEntry {
        &self.snapshot.symbols[handle.0]
    }

    fn sig(&self, handle: &SignatureHandle) -> &SignatureEntry {
        &self.snapshot.signatures[handle.0]
    }

    // ids below were all checked in `new`

    fn type_ref(&self, id: u64) -> TypeHandle {
        TypeHandle(self.type_index[&id])
    }

    fn symbol_ref(&self, id: u64) -> SymbolHandle {
        SymbolHandle(self.symbol_index[&id])
    }

    fn signature_ref(&self, id: u64) -> SignatureHandle {
        SignatureHandle(self.signature_index[&id])
    }

    fn type_refs(&self, ids: &[u64]) -> Vec<TypeHandle> {
        ids.iter().map(|id| self.type_ref(*id)).collect()
    }

    fn symbol_refs(&self, ids: &[u64]) -> Vec<SymbolHandle> {
        ids.iter().map(|id| self.symbol_ref(*id)).collect()
    }

    fn signature_refs(&self, ids: &[u64]) -> Vec<SignatureHandle> {
        ids.iter().map(|id| self.signature_ref(*id)).collect()
    }
}

impl TypeHost for SnapshotHost {
    type Type = TypeHandle;
    type Symbol = SymbolHandle;
    type Signature = SignatureHandle;

    fn type_identity(&self, ty: &TypeHandle) -> HostTypeId {
        HostTypeId(self.ty(ty).id)
    }

    fn type_flags(&self, ty: &TypeHandle) -> TypeFlags {
        self.ty(ty).flags
    }

    fn object_flags(&self, ty: &TypeHandle) -> ObjectFlags {
        self.ty(ty).object_flags
    }

    fn literal_value(&self, ty: &TypeHandle) -> Option<LiteralValue> {
        self.ty(ty).literal.clone()
    }

    fn type_symbol(&self, ty: &TypeHandle) -> Option<SymbolHandle> {
        self.ty(ty).symbol.map(|id| self.symbol_ref(id))
    }

    fn alias_symbol(&self, ty: &TypeHandle) -> Option<SymbolHandle> {
        self.ty(ty).alias_symbol.map(|id| self.symbol_ref(id))
    }

    fn alias_type_arguments(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.ty(ty).alias_type_arguments)
    }

    fn reference_target(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        self.ty(ty).target.map(|id| self.type_ref(id))
    }

    fn type_arguments(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.ty(ty).type_arguments)
    }

    fn type_parameters(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.ty(ty).type_parameters)
    }

    fn constituent_types(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.ty(ty).types)
    }

    fn index_operand(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        self.ty(ty).index_operand.map(|id| self.type_ref(id))
    }

    fn indexed_access_parts(&self, ty: &TypeHandle) -> Option<(TypeHandle, TypeHandle)> {
        let entry = self.ty(ty);
        Some((
            self.type_ref(entry.object_type?),
            self.type_ref(entry.index_type?),
        ))
    }

    fn constraint(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        self.ty(ty).constraint.map(|id| self.type_ref(id))
    }

    fn base_types(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.ty(ty).base_types)
    }

    fn call_signatures(&self, ty: &TypeHandle) -> Vec<SignatureHandle> {
        self.signature_refs(&self.ty(ty).call_signatures)
    }

    fn construct_signatures(&self, ty: &TypeHandle) -> Vec<SignatureHandle> {
        self.signature_refs(&self.ty(ty).construct_signatures)
    }

    fn declared_properties(&self, ty: &TypeHandle) -> Option<Vec<SymbolHandle>> {
        self.ty(ty)
            .declared_properties
            .as_ref()
            .map(|ids| self.symbol_refs(ids))
    }

    fn properties(&self, ty: &TypeHandle) -> Vec<SymbolHandle> {
        self.symbol_refs(&self.ty(ty).properties)
    }

    fn symbol_identity(&self, sym: &SymbolHandle) -> HostSymbolId {
        HostSymbolId(self.sym(sym).id)
    }

    fn symbol_name(&self, sym: &SymbolHandle) -> String {
        self.sym(sym).name.clone()
    }

    fn qualified_name(&self, sym: &SymbolHandle) -> String {
        let entry = self.sym(sym);
        entry
            .qualified_name
            .clone()
            .unwrap_or_else(|| entry.name.clone())
    }

    fn symbol_flags(&self, sym: &SymbolHandle) -> SymbolFlags {
        self.sym(sym).flags
    }

    fn declarations(&self, sym: &SymbolHandle) -> Vec<Declaration> {
        self.sym(sym).declarations.clone()
    }

    fn type_of_symbol(&self, sym: &SymbolHandle) -> Option<TypeHandle> {
        self.sym(sym).ty.map(|id| self.type_ref(id))
    }

    fn declared_type_of_symbol(&self, sym: &SymbolHandle) -> Option<TypeHandle> {
        self.sym(sym).declared_type.map(|id| self.type_ref(id))
    }

    fn alias_type_parameters(&self, sym: &SymbolHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.sym(sym).alias_type_parameters)
    }

    fn signature_type_parameters(&self, sig: &SignatureHandle) -> Vec<TypeHandle> {
        self.type_refs(&self.sig(sig).type_parameters)
    }

    fn signature_parameters(&self, sig: &SignatureHandle) -> Vec<SymbolHandle> {
        self.symbol_refs(&self.sig(sig).parameters)
    }

    fn signature_return_type(&self, sig: &SignatureHandle) -> TypeHandle {
        self.type_ref(self.sig(sig).return_type)
    }
}

fn index_ids(
    ids: impl Iterator<Item = u64>,
    duplicate: fn(u64) -> SnapshotError,
) -> Result<HashMap<u64, usize>, SnapshotError> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if index.insert(id, position).is_some() {
            return Err(duplicate(id));
        }
    }
    Ok(index)
}

struct RefChecker<'a> {
    types: &'a HashMap<u64, usize>,
    symbols: &'a HashMap<u64, usize>,
    signatures: &'a HashMap<u64, usize>,
}

impl RefChecker<'_> {
    fn ty(&self, context: &str, id: u64) -> Result<usize, SnapshotError> {
        self.types
            .get(&id)
            .copied()
            .ok_or_else(|| SnapshotError::DanglingType {
                context: context.to_string(),
                id,
            })
    }

    fn symbol(&self, context: &str, id: u64) -> Result<usize, SnapshotError> {
        self.symbols
            .get(&id)
            .copied()
            .ok_or_else(|| SnapshotError::DanglingSymbol {
                context: context.to_string(),
                id,
            })
    }

    fn signature(&self, context: &str, id: u64) -> Result<usize, SnapshotError> {
        self.signatures
            .get(&id)
            .copied()
            .ok_or_else(|| SnapshotError::DanglingSignature {
                context: context.to_string(),
                id,
            })
    }

    fn check(&self, snapshot: &HostSnapshot) -> Result<(), SnapshotError> {
        for entry in &snapshot.types {
            let context = format!("type {}", entry.id);
            let types = entry
                .alias_type_arguments
                .iter()
                .chain(&entry.type_arguments)
                .chain(&entry.type_parameters)
                .chain(&entry.types)
                .chain(&entry.base_types)
                .chain(entry.target.iter())
                .chain(entry.index_operand.iter())
                .chain(entry.object_type.iter())
                .chain(entry.index_type.iter())
                .chain(entry.constraint.iter());
            for id in types {
                self.ty(&context, *id)?;
            }

            let symbols = entry
                .properties
                .iter()
                .chain(entry.declared_properties.iter().flatten())
                .chain(entry.symbol.iter())
                .chain(entry.alias_symbol.iter());
            for id in symbols {
                self.symbol(&context, *id)?;
            }

            for id in entry.call_signatures.iter().chain(&entry.construct_signatures) {
                self.signature(&context, *id)?;
            }
        }

        for entry in &snapshot.symbols {
            let context = format!("symbol '{}'", entry.name);
            let types = entry
                .alias_type_parameters
                .iter()
                .chain(entry.ty.iter())
                .chain(entry.declared_type.iter());
            for id in types {
                self.ty(&context, *id)?;
            }
        }

        for entry in &snapshot.signatures {
            let context = format!("signature {}", entry.id);
            for id in entry.type_parameters.iter().chain(std::iter::once(&entry.return_type)) {
                self.ty(&context, *id)?;
            }
            for id in &entry.parameters {
                self.symbol(&context, *id)?;
            }
        }

        for id in &snapshot.ambient_modules {
            self.symbol("ambient modules", *id)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(json: &str) -> HostSnapshot {
        HostSnapshot::from_json_str(json).unwrap()
    }

    #[test]
    fn test_host_answers_queries() {
        let host = SnapshotHost::new(snapshot(
            r#"{
                "types": [
                    {"id": 1, "flags": "STRING"},
                    {"id": 2, "flags": "OBJECT", "objectFlags": "ANONYMOUS", "properties": [11]}
                ],
                "symbols": [
                    {"id": 10, "name": "global", "type": 2},
                    {"id": 11, "name": "name", "qualifiedName": "Global.name", "flags": "PROPERTY | OPTIONAL", "type": 1}
                ],
                "global": 10
            }"#,
        ))
        .unwrap();

        let global_type = host.type_of_symbol(&host.global()).unwrap();
        assert_eq!(host.type_identity(&global_type), HostTypeId(2));
        assert_eq!(host.declared_properties(&global_type), None);

        let members = host.properties(&global_type);
        assert_eq!(members.len(), 1);
        assert_eq!(host.symbol_name(&members[0]), "name");
        assert_eq!(host.qualified_name(&members[0]), "Global.name");
        assert!(host.symbol_flags(&members[0]).contains(SymbolFlags::OPTIONAL));
        assert_eq!(host.qualified_name(&host.global()), "global");
        assert!(host.ambient_modules().is_empty());
    }

    #[test]
    fn test_rejects_dangling_type() {
        let result = SnapshotHost::new(snapshot(
            r#"{
                "types": [{"id": 1, "flags": "UNION", "types": [7]}],
                "symbols": [{"id": 10, "name": "global", "type": 1}],
                "global": 10
            }"#,
        ));
        match result {
            Err(SnapshotError::DanglingType { id, context }) => {
                assert_eq!(id, 7);
                assert_eq!(context, "type 1");
            }
            other => panic!("Expected dangling type, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_dangling_signature_parameter() {
        let result = SnapshotHost::new(snapshot(
            r#"{
                "types": [{"id": 1, "flags": "VOID"}],
                "symbols": [{"id": 10, "name": "global", "type": 1}],
                "signatures": [{"id": 20, "parameters": [99], "returnType": 1}],
                "global": 10
            }"#,
        ));
        assert!(matches!(
            result,
            Err(SnapshotError::DanglingSymbol { id: 99, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = SnapshotHost::new(snapshot(
            r#"{
                "types": [{"id": 1, "flags": "VOID"}, {"id": 1, "flags": "NULL"}],
                "symbols": [{"id": 10, "name": "global", "type": 1}],
                "global": 10
            }"#,
        ));
        assert!(matches!(result, Err(SnapshotError::DuplicateType(1))));
    }

    #[test]
    fn test_requires_global() {
        let result = SnapshotHost::new(snapshot(r#"{"types": [], "symbols": []}"#));
        assert!(matches!(result, Err(SnapshotError::MissingGlobal)));

        let result = SnapshotHost::new(snapshot(r#"{"global": 3}"#));
        assert!(matches!(
            result,
            Err(SnapshotError::DanglingSymbol { id: 3, .. })
        ));
    }
}
