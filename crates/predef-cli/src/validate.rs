//! Consistency checks and summaries for emitted bundles

use anyhow::{Context, Result};
use predef_core::analysis::{BundleStats, ReferenceGraph};
use predef_core::{PredefTypes, StableId};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// What `check` found in a bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub stats: BundleStats,
    /// Mutually referencing record groups, each sorted by id
    pub recursive_groups: Vec<Vec<StableId>>,
}

impl CheckReport {
    /// Human readable multi-line summary
    pub fn summary(&self) -> String {
        let s = &self.stats;
        let mut out = String::new();
        out.push_str(&format!("records:            {}\n", s.records));
        out.push_str(&format!("  interfaces:       {}\n", s.interfaces));
        out.push_str(&format!("  classes:          {}\n", s.classes));
        out.push_str(&format!("  aliases:          {}\n", s.aliases));
        out.push_str(&format!("  anonymous:        {}\n", s.anonymous));
        out.push_str(&format!("ambient modules:    {}\n", s.ambient_modules));
        out.push_str(&format!("references:         {}\n", s.references));
        out.push_str(&format!("  generic:          {}\n", s.generic_references));
        out.push_str(&format!("recursive groups:   {}\n", s.recursive_groups));
        for group in &self.recursive_groups {
            let ids: Vec<String> = group.iter().map(|id| id.to_string()).collect();
            out.push_str(&format!("  [{}]\n", ids.join(", ")));
        }
        out
    }
}

/// Validate a bundle and collect its statistics
pub fn check_bundle(bundle: &PredefTypes) -> Result<CheckReport> {
    bundle.validate().context("Bundle failed validation")?;

    let recursive_groups = ReferenceGraph::from_bundle(bundle).recursive_groups();
    debug!("Found {} recursive groups", recursive_groups.len());

    Ok(CheckReport {
        stats: BundleStats::with_groups(bundle, &recursive_groups),
        recursive_groups,
    })
}

/// Load a bundle from disk and check it
pub fn check_bundle_file(path: &Path) -> Result<CheckReport> {
    info!("Checking bundle {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let bundle = PredefTypes::from_json(&content)
        .with_context(|| format!("Failed to parse bundle {}", path.display()))?;
    check_bundle(&bundle)
}
