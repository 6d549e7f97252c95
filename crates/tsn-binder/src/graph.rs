//! Module dependency graph and emission order.
//!
//! Edges run dependency -> dependent, so a topological order lists every
//! module after the modules it imports. Type-only imports are erased: they
//! never participate in cycle rejection, and a cycle whose edges are all
//! type-only still compiles.

use crate::context::ProgramContext;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use tracing::trace;

/// Classified local import edge.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edge {
    from: String,
    to: String,
    type_only: bool,
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Extract the local-import graph from the bound module set. External
    /// runtime imports are not nodes; the emitter folds them into using-sets.
    pub fn build(ctx: &ProgramContext) -> Self {
        let mut nodes: Vec<String> = ctx.modules.keys().cloned().collect();
        nodes.sort_unstable();

        let mut edges = Vec::new();
        for (path, module) in &ctx.modules {
            // One edge per imported module; value-ness wins when the same
            // module is imported both ways.
            let mut seen: FxHashMap<&str, bool> = FxHashMap::default();
            for import in &module.imports {
                if !ctx.is_local_module(&import.specifier) {
                    continue;
                }
                let type_only = seen
                    .get(import.specifier.as_str())
                    .copied()
                    .unwrap_or(true)
                    && import.type_only;
                seen.insert(&import.specifier, type_only);
            }
            for (specifier, type_only) in seen {
                trace!(from = specifier, to = path, type_only, "import edge");
                edges.push(Edge {
                    from: specifier.to_string(),
                    to: path.clone(),
                    type_only,
                });
            }
        }
        DependencyGraph { nodes, edges }
    }

    /// Compute the emission order.
    ///
    /// Kahn's algorithm with a lexicographic tie-break, run first over all
    /// edges; if that leaves a cycle whose edges are all type-only, the
    /// type-only edges are erased and ordering is retried over value edges
    /// alone. A cycle carrying a value edge is unorderable; the offending
    /// module paths are returned sorted for a stable `TSN6110`.
    pub fn module_order(&self) -> Result<Vec<String>, Vec<String>> {
        match self.kahn(false) {
            Ok(order) => Ok(order),
            Err(stuck) => {
                // The stuck set also contains modules that merely depend on a
                // cycle; peel it down to the cycle members before judging.
                let core = self.cycle_core(stuck);
                let has_value_edge = self
                    .edges
                    .iter()
                    .any(|e| !e.type_only && core.contains(&e.from) && core.contains(&e.to));
                if has_value_edge {
                    let mut members: Vec<String> = core.into_iter().collect();
                    members.sort_unstable();
                    return Err(members);
                }
                self.kahn(true).map_err(|remaining| {
                    let mut members: Vec<String> =
                        self.cycle_core(remaining).into_iter().collect();
                    members.sort_unstable();
                    members
                })
            }
        }
    }

    /// Restrict a stuck set to nodes that sit on a cycle: repeatedly drop
    /// nodes with no predecessor or no successor inside the set.
    fn cycle_core(&self, mut set: FxHashSet<String>) -> FxHashSet<String> {
        loop {
            let keep: FxHashSet<String> = set
                .iter()
                .filter(|node| {
                    let has_pred = self
                        .edges
                        .iter()
                        .any(|e| e.to == **node && set.contains(&e.from));
                    let has_succ = self
                        .edges
                        .iter()
                        .any(|e| e.from == **node && set.contains(&e.to));
                    has_pred && has_succ
                })
                .cloned()
                .collect();
            if keep.len() == set.len() {
                return keep;
            }
            set = keep;
        }
    }

    fn kahn(&self, erase_type_only: bool) -> Result<Vec<String>, FxHashSet<String>> {
        let mut in_degree: FxHashMap<&str, usize> =
            self.nodes.iter().map(|n| (n.as_str(), 0)).collect();
        let mut successors: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for edge in &self.edges {
            if erase_type_only && edge.type_only {
                continue;
            }
            *in_degree.entry(edge.to.as_str()).or_default() += 1;
            successors
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }

        // BTreeSet gives the lexicographic tie-break for free.
        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| *n)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(&next) = ready.iter().next() {
            ready.remove(next);
            order.push(next.to_string());
            for succ in successors.get(next).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(succ);
                    }
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            let placed: FxHashSet<&str> = order.iter().map(String::as_str).collect();
            Err(self
                .nodes
                .iter()
                .filter(|n| !placed.contains(n.as_str()))
                .cloned()
                .collect())
        }
    }
}

/// Convenience wrapper: build the graph and order the bound modules.
pub fn module_order(ctx: &ProgramContext) -> Result<Vec<String>, Vec<String>> {
    DependencyGraph::build(ctx).module_order()
}
