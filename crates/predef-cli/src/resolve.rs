//! Snapshot to bundle

use anyhow::{Context, Result};
use predef_core::{PredefConfig, PredefTypes, ResolverConfig};
use predef_resolver::TypeResolver;
use predef_snapshot::SnapshotHost;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load the configuration file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<PredefConfig> {
    match path {
        Some(path) => PredefConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(PredefConfig::default()),
    }
}

/// Resolve the global scope and every ambient module of a loaded snapshot
pub fn resolve_snapshot(host: &SnapshotHost, config: &ResolverConfig) -> Result<PredefTypes> {
    let modules = host.ambient_modules();
    let bundle = TypeResolver::with_config(host, config.clone())
        .build_predef_types(&host.global(), &modules)
        .context("Type resolution failed")?;
    Ok(bundle)
}

/// Resolve a snapshot file and serialize the bundle.
///
/// The JSON is written to `output` when given and returned either way.
pub fn resolve_snapshot_file(
    snapshot: &Path,
    output: Option<&Path>,
    config: &PredefConfig,
    pretty: bool,
) -> Result<String> {
    info!("Resolving snapshot {}", snapshot.display());

    let host = SnapshotHost::load(snapshot)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
    let bundle = resolve_snapshot(&host, &config.resolver)?;
    let json = bundle.to_json(pretty || config.output.pretty)?;

    if let Some(output) = output {
        if output.exists() {
            warn!("Overwriting existing bundle {}", output.display());
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(output, &json)
            .with_context(|| format!("Failed to write bundle to {}", output.display()))?;
        info!(
            "Wrote {} types and {} ambient modules to {}",
            bundle.types.len(),
            bundle.ambient_modules.len(),
            output.display()
        );
    }

    Ok(json)
}
