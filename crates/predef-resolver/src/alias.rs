//! Named type aliases
//!
//! An alias is expanded once into its own record. Every occurrence, the first
//! included, is then emitted as a reference to that record, generic when the
//! occurrence carries alias type arguments.

use predef_core::{ObjectFlags, StableId, TypeFlags, TypeHost, TypeInfo, TypeRecord};
use tracing::debug;

use crate::context::ResolutionContext;
use crate::error::ResolveError;
use crate::registry::IdentityKey;

impl<'h, H: TypeHost> ResolutionContext<'h, H> {
    pub(crate) fn resolve_alias(
        &mut self,
        ty: &H::Type,
        alias: &H::Symbol,
    ) -> Result<TypeInfo, ResolveError> {
        let (id, started) = self
            .registry
            .reserve(IdentityKey::Alias(self.host.symbol_identity(alias)));
        if !started {
            self.table.reserve(id);
            let record = self.build_alias_record(id, alias)?;
            debug!(%id, name = %record.display_name(), "registered alias");
            self.table.fill(record);
        }

        let args = self.host.alias_type_arguments(ty);
        self.emit_ref(id, &args)
    }

    fn build_alias_record(
        &mut self,
        id: StableId,
        alias: &H::Symbol,
    ) -> Result<TypeRecord, ResolveError> {
        let alias_type_parameters = self.generics(&self.host.alias_type_parameters(alias))?;

        let declared = self.host.declared_type_of_symbol(alias).ok_or_else(|| {
            ResolveError::UnexpectedRepresentation(format!(
                "type alias '{}' has no declared type",
                self.host.qualified_name(alias)
            ))
        })?;

        let literal_key = IdentityKey::Type(self.host.type_identity(&declared));
        let body = if self.names_other_alias(&declared, alias) {
            // `type A = B`: point at B instead of expanding its body a second time
            self.resolve(&declared)?
        } else if self.is_object_literal(&declared) && self.registry.get(&literal_key).is_none() {
            // the literal is the alias, so cyclic encounters of it point at the alias record
            self.registry.bind(literal_key, id);
            TypeInfo::interface(self.build_interface(&declared, Some(alias))?)
        } else {
            self.walk_structure(&declared)?
        };

        let mut record = TypeRecord::anonymous(id, body);
        record.name = Some(self.host.symbol_name(alias));
        record.qualified_name = Some(self.host.qualified_name(alias));
        record.origin_files = Some(self.origin_files(alias));
        record.is_alias = true;
        record.alias_type_parameters =
            (!alias_type_parameters.is_empty()).then_some(alias_type_parameters);
        Ok(record)
    }

    fn names_other_alias(&self, declared: &H::Type, alias: &H::Symbol) -> bool {
        self.host
            .alias_symbol(declared)
            .is_some_and(|other| {
                self.host.symbol_identity(&other) != self.host.symbol_identity(alias)
            })
    }

    fn is_object_literal(&self, ty: &H::Type) -> bool {
        let object_flags = self.host.object_flags(ty);
        self.host.type_flags(ty).contains(TypeFlags::OBJECT)
            && object_flags.contains(ObjectFlags::ANONYMOUS)
            && !object_flags.contains(ObjectFlags::REFERENCE)
    }
}
