use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::Serialize;

use crate::error::{DepvizError, Result};
use crate::graph::{Graph, Node};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DanglingEdge {
    pub from: String,
    pub to: String,
}

pub fn dangling_references(graph: &Graph) -> Vec<DanglingEdge> {
    let mut dangling: Vec<DanglingEdge> = graph
        .iter()
        .flat_map(|node| {
            node.dependencies
                .iter()
                .filter(|dep| !graph.contains(dep))
                .map(|dep| DanglingEdge {
                    from: node.name.clone(),
                    to: dep.clone(),
                })
        })
        .collect();
    dangling.sort();
    dangling.dedup();
    dangling
}

/// Subgraph of every node reachable from `root`, the root included.
pub fn reachable_from(graph: &Graph, root: &str) -> Result<Graph> {
    if !graph.contains(root) {
        return Err(DepvizError::UnknownNode(root.to_string()));
    }

    let mut digraph: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    for node in graph.iter() {
        indices.insert(node.name.as_str(), digraph.add_node(node.name.as_str()));
    }
    for node in graph.iter() {
        let from = indices[node.name.as_str()];
        for dep in &node.dependencies {
            if let Some(&to) = indices.get(dep.as_str()) {
                digraph.add_edge(from, to, ());
            }
        }
    }

    let mut reachable = BTreeSet::new();
    let mut dfs = Dfs::new(&digraph, indices[root]);
    while let Some(index) = dfs.next(&digraph) {
        reachable.insert(digraph[index]);
    }

    let mut subgraph = Graph::new();
    for name in reachable {
        if let Some(node) = graph.get(name) {
            subgraph.insert(node.clone());
        }
    }
    Ok(subgraph)
}

#[derive(Debug, Serialize)]
pub struct GraphJson<'a> {
    pub nodes: Vec<&'a Node>,
}

pub fn graph_to_json(graph: &Graph) -> GraphJson<'_> {
    GraphJson {
        nodes: graph.iter().collect(),
    }
}
