//! State owned by a single resolution pass

use predef_core::{Generic, ResolverConfig, StableId, TypeHost, TypeInfo, TypeRecord};

use crate::error::ResolveError;
use crate::registry::{IdentityKey, IdentityRegistry, NodeTable};

/// Registry, node table and host borrow for one pass.
///
/// Every recursive step of the walker takes the context by `&mut`, so no state
/// outlives the pass or leaks between passes.
pub struct ResolutionContext<'h, H: TypeHost> {
    pub(crate) host: &'h H,
    pub(crate) config: &'h ResolverConfig,
    pub(crate) registry: IdentityRegistry,
    pub(crate) table: NodeTable,
}

impl<'h, H: TypeHost> ResolutionContext<'h, H> {
    pub fn new(host: &'h H, config: &'h ResolverConfig) -> Self {
        Self {
            host,
            config,
            registry: IdentityRegistry::new(),
            table: NodeTable::new(),
        }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    /// Reference to `id`, generic when the occurrence carries type arguments
    pub fn emit_ref(&mut self, id: StableId, type_arguments: &[H::Type]) -> Result<TypeInfo, ResolveError> {
        if type_arguments.is_empty() {
            return Ok(TypeInfo::Id(id));
        }
        let args = type_arguments
            .iter()
            .map(|arg| self.resolve(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeInfo::reference(id, args))
    }

    /// Registry id of a generic parameter. Parameters never get a table record.
    pub(crate) fn generic_id(&mut self, param: &H::Type) -> StableId {
        let key = IdentityKey::Type(self.host.type_identity(param));
        self.registry.reserve(key).0
    }

    /// Declarations for a list of generic parameters, constraints included
    pub(crate) fn generics(&mut self, params: &[H::Type]) -> Result<Vec<Generic>, ResolveError> {
        // ids first, so a constraint that mentions a later parameter sees it
        let ids: Vec<StableId> = params.iter().map(|p| self.generic_id(p)).collect();
        ids.into_iter()
            .zip(params)
            .map(|(id, param)| {
                let constraint = match self.host.constraint(param) {
                    Some(constraint) => Some(self.resolve(&constraint)?),
                    None => None,
                };
                Ok(Generic { id, constraint })
            })
            .collect()
    }

    /// Freeze the node table. Fails if any reserved slot was never filled.
    pub fn finish(self) -> Result<Vec<TypeRecord>, ResolveError> {
        self.table.into_records()
    }
}
