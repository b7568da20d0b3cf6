//! Programmatic construction of host snapshots
//!
//! Mirrors how a type checker would report declarations, so fixtures and
//! tests can describe a host model without writing snapshot JSON by hand.

use std::collections::HashSet;

use predef_core::{Declaration, LiteralValue, ModifierFlags, ObjectFlags, SymbolFlags, TypeFlags};

use crate::error::SnapshotError;
use crate::host::SnapshotHost;
use crate::model::{HostSnapshot, SignatureEntry, SymbolEntry, TypeEntry};

const DEFAULT_FILE: &str = "lib.d.ts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolRef(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureRef(pub u64);

/// A member to add to an object type
#[derive(Debug, Clone)]
pub struct PropertySpec {
    name: String,
    ty: TypeRef,
    flags: SymbolFlags,
    modifiers: ModifierFlags,
    declared: bool,
}

impl PropertySpec {
    pub fn data(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            flags: SymbolFlags::PROPERTY,
            modifiers: ModifierFlags::empty(),
            declared: true,
        }
    }

    pub fn method(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            flags: SymbolFlags::METHOD,
            ..Self::data(name, ty)
        }
    }

    pub fn getter(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            flags: SymbolFlags::GET_ACCESSOR,
            ..Self::data(name, ty)
        }
    }

    pub fn variable(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            flags: SymbolFlags::VARIABLE,
            ..Self::data(name, ty)
        }
    }

    pub fn optional(mut self) -> Self {
        self.flags |= SymbolFlags::OPTIONAL;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.modifiers |= ModifierFlags::READONLY;
        self
    }

    /// Drop the declaration site, as hosts do for some synthesized members
    pub fn without_declaration(mut self) -> Self {
        self.declared = false;
        self
    }
}

/// A signature parameter
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    ty: TypeRef,
    optional: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Builds a [`HostSnapshot`] entry by entry.
///
/// Ids are positions in the respective tables. Effective members of types
/// with bases are computed in [`SnapshotBuilder::build`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: HostSnapshot,
    file: String,
    global_type: Option<TypeRef>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: HostSnapshot::default(),
            file: DEFAULT_FILE.to_string(),
            global_type: None,
        }
    }

    /// Declaration file for everything declared from here on
    pub fn in_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.file = file.into();
        self
    }

    pub fn raw(&mut self, flags: TypeFlags, object_flags: ObjectFlags) -> TypeRef {
        let id = self.snapshot.types.len() as u64;
        self.snapshot.types.push(TypeEntry {
            id,
            flags,
            object_flags,
            ..Default::default()
        });
        TypeRef(id)
    }

    pub fn intrinsic(&mut self, flags: TypeFlags) -> TypeRef {
        self.raw(flags, ObjectFlags::empty())
    }

    pub fn any(&mut self) -> TypeRef {
        self.intrinsic(TypeFlags::ANY)
    }

    pub fn string(&mut self) -> TypeRef {
        self.intrinsic(TypeFlags::STRING)
    }

    pub fn number(&mut self) -> TypeRef {
        self.intrinsic(TypeFlags::NUMBER)
    }

    /// `boolean`, reported by hosts as the union of its two literals
    pub fn boolean(&mut self) -> TypeRef {
        self.intrinsic(TypeFlags::BOOLEAN | TypeFlags::UNION)
    }

    pub fn void(&mut self) -> TypeRef {
        self.intrinsic(TypeFlags::VOID)
    }

    pub fn string_literal(&mut self, value: &str) -> TypeRef {
        self.literal(
            TypeFlags::STRING_LITERAL,
            LiteralValue::String(value.to_string()),
        )
    }

    pub fn number_literal(&mut self, value: f64) -> TypeRef {
        self.literal(TypeFlags::NUMBER_LITERAL, LiteralValue::Number(value))
    }

    pub fn boolean_literal(&mut self, value: bool) -> TypeRef {
        self.literal(TypeFlags::BOOLEAN_LITERAL, LiteralValue::Boolean(value))
    }

    fn literal(&mut self, flags: TypeFlags, value: LiteralValue) -> TypeRef {
        let ty = self.intrinsic(flags);
        self.type_mut(ty).literal = Some(value);
        ty
    }

    /// Symbol declared once in the current file. `qualified` may be dotted;
    /// the plain name is its last segment.
    pub fn symbol(&mut self, qualified: &str, flags: SymbolFlags) -> SymbolRef {
        let name = qualified.rsplit('.').next().unwrap_or(qualified).to_string();
        let id = self.snapshot.symbols.len() as u64;
        self.snapshot.symbols.push(SymbolEntry {
            id,
            qualified_name: (name != qualified).then(|| qualified.to_string()),
            name,
            flags,
            declarations: vec![Declaration {
                file: self.file.clone(),
                modifiers: ModifierFlags::empty(),
            }],
            ..Default::default()
        });
        SymbolRef(id)
    }

    /// Record another declaration of an existing symbol in the current file
    pub fn redeclare(&mut self, symbol: SymbolRef) {
        let file = self.file.clone();
        self.symbol_mut(symbol).declarations.push(Declaration {
            file,
            modifiers: ModifierFlags::empty(),
        });
    }

    pub fn symbol_of(&self, ty: TypeRef) -> Option<SymbolRef> {
        self.snapshot.types[ty.0 as usize].symbol.map(SymbolRef)
    }

    pub fn interface(&mut self, qualified: &str) -> TypeRef {
        self.nominal(qualified, SymbolFlags::INTERFACE, ObjectFlags::INTERFACE)
    }

    pub fn class(&mut self, qualified: &str) -> TypeRef {
        self.nominal(qualified, SymbolFlags::CLASS, ObjectFlags::CLASS)
    }

    fn nominal(&mut self, qualified: &str, symbol_flags: SymbolFlags, object_flags: ObjectFlags) -> TypeRef {
        let symbol = self.symbol(qualified, symbol_flags);
        let ty = self.raw(TypeFlags::OBJECT, object_flags);
        let entry = self.type_mut(ty);
        entry.symbol = Some(symbol.0);
        entry.declared_properties = Some(Vec::new());
        self.symbol_mut(symbol).declared_type = Some(ty.0);
        ty
    }

    /// Generic class or interface: the declared type is an instantiation of
    /// itself with its own parameters as arguments.
    pub fn generic_interface(&mut self, qualified: &str, params: &[&str]) -> (TypeRef, Vec<TypeRef>) {
        let ty = self.interface(qualified);
        let params = self.make_generic(ty, params);
        (ty, params)
    }

    pub fn generic_class(&mut self, qualified: &str, params: &[&str]) -> (TypeRef, Vec<TypeRef>) {
        let ty = self.class(qualified);
        let params = self.make_generic(ty, params);
        (ty, params)
    }

    fn make_generic(&mut self, ty: TypeRef, params: &[&str]) -> Vec<TypeRef> {
        let params: Vec<TypeRef> = params.iter().map(|name| self.type_parameter(name)).collect();
        let ids: Vec<u64> = params.iter().map(|p| p.0).collect();
        let entry = self.type_mut(ty);
        entry.object_flags |= ObjectFlags::REFERENCE;
        entry.target = Some(ty.0);
        entry.type_arguments = ids.clone();
        entry.type_parameters = ids;
        params
    }

    pub fn type_parameter(&mut self, name: &str) -> TypeRef {
        let symbol = self.symbol(name, SymbolFlags::empty());
        let ty = self.intrinsic(TypeFlags::TYPE_PARAMETER);
        self.type_mut(ty).symbol = Some(symbol.0);
        ty
    }

    /// Set the constraint of a type parameter or indexed access
    pub fn constrain(&mut self, ty: TypeRef, constraint: TypeRef) {
        self.type_mut(ty).constraint = Some(constraint.0);
    }

    /// `Target<Args>`
    pub fn instantiate(&mut self, target: TypeRef, args: &[TypeRef]) -> TypeRef {
        let target_entry = &self.snapshot.types[target.0 as usize];
        let symbol = target_entry.symbol;
        let object_flags = (target_entry.object_flags & (ObjectFlags::CLASS | ObjectFlags::INTERFACE))
            | ObjectFlags::REFERENCE;
        let ty = self.raw(TypeFlags::OBJECT, object_flags);
        let entry = self.type_mut(ty);
        entry.symbol = symbol;
        entry.target = Some(target.0);
        entry.type_arguments = args.iter().map(|a| a.0).collect();
        ty
    }

    /// `[A, B, ...]`
    pub fn tuple(&mut self, elements: &[TypeRef]) -> TypeRef {
        let target = self.raw(TypeFlags::OBJECT, ObjectFlags::TUPLE);
        let ty = self.raw(TypeFlags::OBJECT, ObjectFlags::REFERENCE);
        let entry = self.type_mut(ty);
        entry.target = Some(target.0);
        entry.type_arguments = elements.iter().map(|e| e.0).collect();
        ty
    }

    /// Anonymous object type with its own `__type` symbol
    pub fn object_literal(&mut self) -> TypeRef {
        let symbol = self.symbol("__type", SymbolFlags::empty());
        let ty = self.raw(TypeFlags::OBJECT, ObjectFlags::ANONYMOUS);
        self.type_mut(ty).symbol = Some(symbol.0);
        ty
    }

    pub fn union(&mut self, members: &[TypeRef]) -> TypeRef {
        let ty = self.intrinsic(TypeFlags::UNION);
        self.type_mut(ty).types = members.iter().map(|m| m.0).collect();
        ty
    }

    pub fn intersection(&mut self, members: &[TypeRef]) -> TypeRef {
        let ty = self.intrinsic(TypeFlags::INTERSECTION);
        self.type_mut(ty).types = members.iter().map(|m| m.0).collect();
        ty
    }

    /// `keyof T`
    pub fn keyof(&mut self, operand: TypeRef) -> TypeRef {
        let ty = self.intrinsic(TypeFlags::INDEX);
        self.type_mut(ty).index_operand = Some(operand.0);
        ty
    }

    /// `T[K]`
    pub fn indexed_access(&mut self, object: TypeRef, index: TypeRef) -> TypeRef {
        let ty = self.intrinsic(TypeFlags::INDEXED_ACCESS);
        let entry = self.type_mut(ty);
        entry.object_type = Some(object.0);
        entry.index_type = Some(index.0);
        ty
    }

    pub fn conditional(&mut self) -> TypeRef {
        self.intrinsic(TypeFlags::CONDITIONAL)
    }

    pub fn enumeration(&mut self, qualified: &str, members: &[f64]) -> TypeRef {
        let symbol = self.symbol(qualified, SymbolFlags::empty());
        let literals: Vec<TypeRef> = members
            .iter()
            .map(|value| self.literal(TypeFlags::NUMBER_LITERAL | TypeFlags::ENUM_LITERAL, LiteralValue::Number(*value)))
            .collect();
        let ty = self.union(&literals);
        let entry = self.type_mut(ty);
        entry.flags |= TypeFlags::ENUM;
        entry.symbol = Some(symbol.0);
        ty
    }

    pub fn extend(&mut self, ty: TypeRef, base: TypeRef) {
        self.type_mut(ty).base_types.push(base.0);
    }

    /// Add a member to an object type and return its symbol
    pub fn property(&mut self, owner: TypeRef, spec: PropertySpec) -> SymbolRef {
        let symbol = self.symbol(&spec.name, spec.flags);
        let entry = self.symbol_mut(symbol);
        entry.ty = Some(spec.ty.0);
        if spec.declared {
            for declaration in &mut entry.declarations {
                declaration.modifiers = spec.modifiers;
            }
        } else {
            entry.declarations.clear();
        }

        let owner = self.type_mut(owner);
        if let Some(declared) = &mut owner.declared_properties {
            declared.push(symbol.0);
        }
        owner.properties.push(symbol.0);
        symbol
    }

    pub fn signature(&mut self, type_parameters: &[TypeRef], params: &[ParamSpec], return_type: TypeRef) -> SignatureRef {
        let parameters = params
            .iter()
            .map(|param| {
                let mut flags = SymbolFlags::VARIABLE;
                if param.optional {
                    flags |= SymbolFlags::OPTIONAL;
                }
                let symbol = self.symbol(&param.name, flags);
                self.symbol_mut(symbol).ty = Some(param.ty.0);
                symbol.0
            })
            .collect();

        let id = self.snapshot.signatures.len() as u64;
        self.snapshot.signatures.push(SignatureEntry {
            id,
            type_parameters: type_parameters.iter().map(|p| p.0).collect(),
            parameters,
            return_type: return_type.0,
        });
        SignatureRef(id)
    }

    pub fn call_signature(&mut self, owner: TypeRef, signature: SignatureRef) {
        self.type_mut(owner).call_signatures.push(signature.0);
    }

    pub fn construct_signature(&mut self, owner: TypeRef, signature: SignatureRef) {
        self.type_mut(owner).construct_signatures.push(signature.0);
    }

    /// Object type with one call signature, as used for function-valued members
    pub fn function(&mut self, params: &[ParamSpec], return_type: TypeRef) -> TypeRef {
        let ty = self.object_literal();
        let signature = self.signature(&[], params, return_type);
        self.call_signature(ty, signature);
        ty
    }

    /// Declare `type Name<Params> = ...`; the body is set with [`Self::alias_body`]
    pub fn type_alias(&mut self, qualified: &str, params: &[&str]) -> (SymbolRef, Vec<TypeRef>) {
        let symbol = self.symbol(qualified, SymbolFlags::TYPE_ALIAS);
        let params: Vec<TypeRef> = params.iter().map(|name| self.type_parameter(name)).collect();
        self.symbol_mut(symbol).alias_type_parameters = params.iter().map(|p| p.0).collect();
        (symbol, params)
    }

    /// Make `body` the declared type of `alias`
    pub fn alias_body(&mut self, alias: SymbolRef, body: TypeRef) {
        let params = self.symbol_mut(alias).alias_type_parameters.clone();
        self.symbol_mut(alias).declared_type = Some(body.0);
        let entry = self.type_mut(body);
        entry.alias_symbol = Some(alias.0);
        entry.alias_type_arguments = params;
    }

    /// Make `ty` the declared type of `alias` without claiming it, as in
    /// `type A = B` where `ty` keeps the alias symbol of `B`
    pub fn alias_target(&mut self, alias: SymbolRef, ty: TypeRef) {
        self.symbol_mut(alias).declared_type = Some(ty.0);
    }

    /// An occurrence of `alias` with arguments, structurally a copy of its body
    pub fn alias_instance(&mut self, alias: SymbolRef, args: &[TypeRef]) -> TypeRef {
        let body = self.snapshot.symbols[alias.0 as usize]
            .declared_type
            .map(|id| self.snapshot.types[id as usize].clone());
        let id = self.snapshot.types.len() as u64;
        let mut entry = body.unwrap_or_else(|| TypeEntry {
            flags: TypeFlags::OBJECT,
            object_flags: ObjectFlags::ANONYMOUS,
            ..Default::default()
        });
        entry.id = id;
        entry.alias_symbol = Some(alias.0);
        entry.alias_type_arguments = args.iter().map(|a| a.0).collect();
        self.snapshot.types.push(entry);
        TypeRef(id)
    }

    /// The global scope object. Created on first use.
    pub fn global(&mut self) -> TypeRef {
        if let Some(ty) = self.global_type {
            return ty;
        }
        let symbol = self.symbol("global", SymbolFlags::MODULE);
        let ty = self.raw(TypeFlags::OBJECT, ObjectFlags::ANONYMOUS);
        self.type_mut(ty).symbol = Some(symbol.0);
        self.symbol_mut(symbol).ty = Some(ty.0);
        self.snapshot.global = Some(symbol.0);
        self.global_type = Some(ty);
        ty
    }

    /// Declare an ambient module, e.g. `"fs"`, and return its export object
    pub fn ambient_module(&mut self, name: &str) -> TypeRef {
        let symbol = self.symbol(&format!("\"{}\"", name), SymbolFlags::MODULE);
        let ty = self.raw(TypeFlags::OBJECT, ObjectFlags::ANONYMOUS);
        self.type_mut(ty).symbol = Some(symbol.0);
        self.symbol_mut(symbol).ty = Some(ty.0);
        self.snapshot.ambient_modules.push(symbol.0);
        ty
    }

    pub fn build(mut self) -> HostSnapshot {
        let effective: Vec<(usize, Vec<u64>)> = (0..self.snapshot.types.len())
            .filter(|&idx| !self.snapshot.types[idx].base_types.is_empty())
            .map(|idx| (idx, self.effective_members(idx, &mut Vec::new())))
            .collect();
        for (idx, members) in effective {
            self.snapshot.types[idx].properties = members;
        }
        self.snapshot
    }

    pub fn into_host(self) -> Result<SnapshotHost, SnapshotError> {
        SnapshotHost::new(self.build())
    }

    /// Own members followed by inherited ones that are not overridden
    fn effective_members(&self, idx: usize, visiting: &mut Vec<usize>) -> Vec<u64> {
        if visiting.contains(&idx) {
            return Vec::new();
        }
        visiting.push(idx);

        let entry = &self.snapshot.types[idx];
        let mut members = entry
            .declared_properties
            .clone()
            .unwrap_or_else(|| entry.properties.clone());
        let mut names: HashSet<&str> = members.iter().map(|id| self.member_name(*id)).collect();

        for base in &entry.base_types {
            let base_entry = &self.snapshot.types[*base as usize];
            let base_idx = base_entry.target.unwrap_or(*base) as usize;
            for member in self.effective_members(base_idx, visiting) {
                if names.insert(self.member_name(member)) {
                    members.push(member);
                }
            }
        }

        visiting.pop();
        members
    }

    fn member_name(&self, id: u64) -> &str {
        &self.snapshot.symbols[id as usize].name
    }

    fn type_mut(&mut self, ty: TypeRef) -> &mut TypeEntry {
        &mut self.snapshot.types[ty.0 as usize]
    }

    fn symbol_mut(&mut self, symbol: SymbolRef) -> &mut SymbolEntry {
        &mut self.snapshot.symbols[symbol.0 as usize]
    }
}
