//! Entry point for a full resolution pass

use predef_core::{Module, PredefTypes, ResolverConfig, TypeHost};
use tracing::{debug, info, instrument};

use crate::context::ResolutionContext;
use crate::error::ResolveError;

/// Resolves the global scope and ambient modules of a host into a bundle
pub struct TypeResolver<'h, H: TypeHost> {
    host: &'h H,
    config: ResolverConfig,
}

impl<'h, H: TypeHost> TypeResolver<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, ResolverConfig::default())
    }

    pub fn with_config(host: &'h H, config: ResolverConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Run one pass. Each call starts from an empty registry and node table,
    /// and the first error aborts the pass without a bundle.
    #[instrument(skip_all, fields(modules = ambient_modules.len()), level = "debug")]
    pub fn build_predef_types(
        &self,
        global: &H::Symbol,
        ambient_modules: &[H::Symbol],
    ) -> Result<PredefTypes, ResolveError> {
        let mut ctx = ResolutionContext::new(self.host, &self.config);

        let global_type = self.host.type_of_symbol(global).ok_or_else(|| {
            ResolveError::UnexpectedRepresentation(format!(
                "global symbol '{}' has no type",
                self.host.symbol_name(global)
            ))
        })?;
        debug!("Resolving global scope");
        let global_type = ctx.resolve(&global_type)?;

        let mut modules = Vec::with_capacity(ambient_modules.len());
        for module in ambient_modules {
            let name = self.host.symbol_name(module);
            let module_type = self.host.type_of_symbol(module).ok_or_else(|| {
                ResolveError::UnexpectedRepresentation(format!(
                    "ambient module {} has no type",
                    name
                ))
            })?;
            debug!(module = %name, "Resolving ambient module");
            let ty = ctx.resolve(&module_type)?;
            modules.push(Module { name, ty });
        }

        let types = ctx.finish()?;
        info!(
            "Resolved {} types across {} ambient modules",
            types.len(),
            modules.len()
        );

        Ok(PredefTypes {
            global_type,
            ambient_modules: modules,
            types,
        })
    }
}

/// One-shot pass with the default configuration
pub fn build_predef_types<H: TypeHost>(
    host: &H,
    global: &H::Symbol,
    ambient_modules: &[H::Symbol],
) -> Result<PredefTypes, ResolveError> {
    TypeResolver::new(host).build_predef_types(global, ambient_modules)
}
