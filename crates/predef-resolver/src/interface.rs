//! Interface builder for classes, interfaces and object literal types

use std::collections::BTreeMap;

use predef_core::{
    CallSignature, InterfaceInfo, MemberSet, ModifierFlags, ObjectFlags, Parameter, Property,
    StableId, SymbolFlags, TypeHost, TypeInfo, TypeRecord,
};
use tracing::debug;

use crate::context::ResolutionContext;
use crate::error::ResolveError;
use crate::registry::IdentityKey;

impl<'h, H: TypeHost> ResolutionContext<'h, H> {
    /// Register a class or interface declaration once and return its record id
    pub(crate) fn ensure_interface(&mut self, ty: &H::Type) -> Result<StableId, ResolveError> {
        let (id, started) = self
            .registry
            .reserve(IdentityKey::Type(self.host.type_identity(ty)));
        if started {
            return Ok(id);
        }
        self.table.reserve(id);

        let symbol = self.host.type_symbol(ty);
        let type_parameters = self.generics(&self.host.type_parameters(ty))?;
        let body = TypeInfo::interface(self.build_interface(ty, symbol.as_ref())?);

        let mut record = TypeRecord::anonymous(id, body);
        if let Some(symbol) = &symbol {
            record.name = Some(self.host.symbol_name(symbol));
            record.qualified_name = Some(self.host.qualified_name(symbol));
            record.origin_files = Some(self.origin_files(symbol));
        }
        record.type_parameters = (!type_parameters.is_empty()).then_some(type_parameters);

        debug!(%id, name = %record.display_name(), "registered interface");
        self.table.fill(record);
        Ok(id)
    }

    /// Build the structural shape of an object type.
    ///
    /// `owner` names the type for the member exclusion list.
    pub(crate) fn build_interface(
        &mut self,
        ty: &H::Type,
        owner: Option<&H::Symbol>,
    ) -> Result<InterfaceInfo, ResolveError> {
        let owner_name = owner.map(|sym| self.host.qualified_name(sym));

        let bases = self
            .host
            .base_types(ty)
            .iter()
            .map(|base| self.resolve(base))
            .collect::<Result<Vec<_>, _>>()?;

        let members = match self.config.member_set {
            MemberSet::Declared => self
                .host
                .declared_properties(ty)
                .unwrap_or_else(|| self.host.properties(ty)),
            MemberSet::Effective => self.host.properties(ty),
        };

        let mut properties = BTreeMap::new();
        for member in &members {
            let name = self.host.symbol_name(member);
            let property = self.build_property(owner_name.as_deref(), &name, member)?;
            properties.insert(name, property);
        }

        let call_signatures = self
            .host
            .call_signatures(ty)
            .iter()
            .map(|sig| self.build_signature(sig))
            .collect::<Result<Vec<_>, _>>()?;
        let construction_signatures = self
            .host
            .construct_signatures(ty)
            .iter()
            .map(|sig| self.build_signature(sig))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InterfaceInfo {
            is_class: self.host.object_flags(ty).contains(ObjectFlags::CLASS),
            bases,
            call_signatures,
            construction_signatures,
            properties,
        })
    }

    fn build_property(
        &mut self,
        owner: Option<&str>,
        name: &str,
        member: &H::Symbol,
    ) -> Result<Property, ResolveError> {
        let optional = self
            .host
            .symbol_flags(member)
            .contains(SymbolFlags::OPTIONAL);
        let readonly = self.is_readonly(member)?;

        let ty = if self.config.is_excluded(owner, name) {
            debug!(owner = owner.unwrap_or("<anonymous>"), member = name, "skipping excluded member");
            TypeInfo::any()
        } else {
            let member_type = self.host.type_of_symbol(member).ok_or_else(|| {
                ResolveError::UnexpectedRepresentation(format!("member '{}' has no type", name))
            })?;
            self.resolve(&member_type)?
        };

        Ok(Property {
            ty,
            optional,
            readonly,
        })
    }

    /// Methods and accessors are always readonly; data members read the
    /// modifier of their first declaration.
    fn is_readonly(&self, member: &H::Symbol) -> Result<bool, ResolveError> {
        let method_like = SymbolFlags::METHOD
            | SymbolFlags::FUNCTION
            | SymbolFlags::GET_ACCESSOR
            | SymbolFlags::SET_ACCESSOR;
        if self.host.symbol_flags(member).intersects(method_like) {
            return Ok(true);
        }

        let declarations = self.host.declarations(member);
        let first = declarations
            .first()
            .ok_or_else(|| ResolveError::MissingDeclaration(self.host.symbol_name(member)))?;
        Ok(first.modifiers.contains(ModifierFlags::READONLY))
    }

    fn build_signature(&mut self, sig: &H::Signature) -> Result<CallSignature, ResolveError> {
        let type_parameters = self.generics(&self.host.signature_type_parameters(sig))?;

        let mut parameters = Vec::new();
        for param in self.host.signature_parameters(sig) {
            let name = self.host.symbol_name(&param);
            let param_type = self.host.type_of_symbol(&param).ok_or_else(|| {
                ResolveError::UnexpectedRepresentation(format!("parameter '{}' has no type", name))
            })?;
            parameters.push(Parameter {
                ty: self.resolve(&param_type)?,
                optional: self.host.symbol_flags(&param).contains(SymbolFlags::OPTIONAL),
                name,
            });
        }

        let return_type = self.resolve(&self.host.signature_return_type(sig))?;

        Ok(CallSignature {
            type_parameters,
            parameters,
            return_type,
        })
    }

    /// Declaration files of a symbol, first-seen order, without repeats
    pub(crate) fn origin_files(&self, symbol: &H::Symbol) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        for declaration in self.host.declarations(symbol) {
            if !files.contains(&declaration.file) {
                files.push(declaration.file);
            }
        }
        files
    }
}
