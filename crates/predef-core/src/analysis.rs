//! Reference graph over a finished bundle
//!
//! Records are nodes, and an edge `a -> b` means the body of `a` references `b`.
//! Used to report recursive groups and summary statistics for a bundle.

use std::collections::HashMap;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::ir::PredefTypes;
use crate::types::{Composite, StableId, TypeInfo};

#[derive(Debug)]
pub struct ReferenceGraph {
    graph: DiGraph<StableId, ()>,
    indices: HashMap<StableId, NodeIndex>,
}

impl ReferenceGraph {
    pub fn from_bundle(bundle: &PredefTypes) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for record in &bundle.types {
            let idx = graph.add_node(record.id);
            indices.insert(record.id, idx);
        }

        for record in &bundle.types {
            let from = indices[&record.id];
            record.body.for_each_reference(&mut |target| {
                if let Some(&to) = indices.get(&target) {
                    graph.update_edge(from, to, ());
                }
            });
        }

        Self { graph, indices }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn references_from(&self, id: StableId) -> Vec<StableId> {
        let Some(&idx) = self.indices.get(&id) else {
            return Vec::new();
        };
        let mut targets: Vec<StableId> = self.graph.neighbors(idx).map(|n| self.graph[n]).collect();
        targets.sort();
        targets
    }

    /// Groups of records that reach themselves, each sorted by id.
    /// A single record is a group only if it references itself.
    pub fn recursive_groups(&self) -> Vec<Vec<StableId>> {
        let mut groups: Vec<Vec<StableId>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0])
            })
            .map(|scc| {
                let mut ids: Vec<StableId> = scc.into_iter().map(|idx| self.graph[idx]).collect();
                ids.sort();
                ids
            })
            .collect();
        groups.sort();
        groups
    }
}

/// Summary counts for a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleStats {
    pub records: usize,
    pub aliases: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub anonymous: usize,
    pub ambient_modules: usize,
    pub references: usize,
    pub generic_references: usize,
    pub recursive_groups: usize,
}

impl BundleStats {
    pub fn collect(bundle: &PredefTypes) -> Self {
        let groups = ReferenceGraph::from_bundle(bundle).recursive_groups();
        Self::with_groups(bundle, &groups)
    }

    /// Counts for a bundle whose recursive groups are already known
    pub fn with_groups(bundle: &PredefTypes, recursive_groups: &[Vec<StableId>]) -> Self {
        let mut stats = BundleStats {
            records: bundle.types.len(),
            ambient_modules: bundle.ambient_modules.len(),
            ..Default::default()
        };

        for record in &bundle.types {
            if record.is_alias {
                stats.aliases += 1;
            } else if record.name.is_none() {
                stats.anonymous += 1;
            } else if record.body.as_interface().is_some_and(|i| i.is_class) {
                stats.classes += 1;
            } else {
                stats.interfaces += 1;
            }
        }

        for root in bundle.roots() {
            root.visit(&mut |node| match node {
                TypeInfo::Id(_) => stats.references += 1,
                TypeInfo::Composite(Composite::Reference { .. }) => {
                    stats.references += 1;
                    stats.generic_references += 1;
                }
                _ => {}
            });
        }

        stats.recursive_groups = recursive_groups.len();
        stats
    }
}
