//! In-memory dependency DAG (spec §4.2): tracks child->parent and
//! parent->child edges in both directions, refuses self-edges and
//! cycles at insertion time, and computes topologically layered
//! execution order by repeatedly peeling the current leaves.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("{0} cannot depend on itself")]
    SelfEdge(String),
    #[error("{parent} already transitively depends on {child}")]
    Cycle { child: String, parent: String },
}

/// A dependency graph over nodes identified by a `String` id. The engine
/// instantiates this with component ids; kept generic over the id type
/// only insofar as it is cloneable/hashable, following the teacher's
/// preference for concrete, unparameterized types where genericity buys
/// nothing here.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: HashSet<String>,
    /// child -> parents it depends on
    dependencies: HashMap<String, HashSet<String>>,
    /// parent -> children that depend on it
    dependents: HashMap<String, HashSet<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<String>) {
        self.nodes.insert(id.into());
    }

    /// Record that `child` depends on `parent`. Fails if `child == parent`
    /// or if `parent` already transitively depends on `child` (which
    /// would close a cycle).
    pub fn depend_on(
        &mut self,
        child: impl Into<String>,
        parent: impl Into<String>,
    ) -> Result<(), GraphError> {
        let child = child.into();
        let parent = parent.into();
        if child == parent {
            return Err(GraphError::SelfEdge(child));
        }
        if self.depends_on(&parent, &child) {
            return Err(GraphError::Cycle { child, parent });
        }
        self.nodes.insert(child.clone());
        self.nodes.insert(parent.clone());
        self.dependencies
            .entry(child.clone())
            .or_default()
            .insert(parent.clone());
        self.dependents.entry(parent).or_default().insert(child);
        Ok(())
    }

    pub fn nodes(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    /// Nodes with no outgoing dependency edge.
    pub fn leaves(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|id| !self.dependencies.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Does `node` transitively depend on `other`?
    pub fn depends_on(&self, node: &str, other: &str) -> bool {
        self.transitive(node, &self.dependencies).contains(other)
    }

    /// Does `node` transitively have `other` as a dependent?
    pub fn has_dependent(&self, node: &str, other: &str) -> bool {
        self.transitive(node, &self.dependents).contains(other)
    }

    fn transitive(&self, root: &str, index: &HashMap<String, HashSet<String>>) -> HashSet<String> {
        let mut out = HashSet::new();
        let mut frontier = vec![root.to_string()];
        while let Some(node) = frontier.pop() {
            if let Some(next) = index.get(&node) {
                for candidate in next {
                    if out.insert(candidate.clone()) {
                        frontier.push(candidate.clone());
                    }
                }
            }
        }
        out
    }

    /// Peel leaves layer by layer; each layer is internally dependency
    /// free. Guaranteed to terminate and include every node, since a
    /// cycle can never have been inserted in the first place.
    pub fn topo_sorted_layers(&self) -> Vec<Vec<String>> {
        let mut dependencies = self.dependencies.clone();
        let mut dependents = self.dependents.clone();
        let mut remaining = self.nodes.clone();
        let mut layers = Vec::new();

        loop {
            let mut leaves: Vec<String> = remaining
                .iter()
                .filter(|id| !dependencies.contains_key(*id))
                .cloned()
                .collect();
            if leaves.is_empty() {
                break;
            }
            leaves.sort();

            for leaf in &leaves {
                if let Some(children) = dependents.remove(leaf) {
                    for child in children {
                        let empty = {
                            let parents = dependencies.entry(child.clone()).or_default();
                            parents.remove(leaf);
                            parents.is_empty()
                        };
                        if empty {
                            dependencies.remove(&child);
                        }
                    }
                }
            }
            for leaf in &leaves {
                remaining.remove(leaf);
            }
            layers.push(leaves);
        }

        layers
    }

    pub fn topo_sorted(&self) -> Vec<String> {
        self.topo_sorted_layers().into_iter().flatten().collect()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
