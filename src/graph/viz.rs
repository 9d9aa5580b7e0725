use crate::core::human_size;
use crate::error::{DepvizError, Result};
use crate::graph::{Graph, Node};

/// Renders the graph as DOT adjacency statements, one per node.
///
/// With `with_sizes` every identifier becomes `"<name> (<size>)"`, which needs each
/// dependency to exist in the graph.
pub fn render_dot(graph: &Graph, with_sizes: bool) -> Result<String> {
    let mut out = String::from("digraph packages {\n");
    for node in graph.iter() {
        let source = if with_sizes {
            sized_label(node)
        } else {
            node.name.clone()
        };
        out.push_str(&format!("\"{}\" -> {{\n", escape_dot_id(&source)));
        for dep in &node.dependencies {
            let target = if with_sizes {
                let target = graph
                    .get(dep)
                    .ok_or_else(|| DepvizError::UnresolvedReference {
                        name: dep.clone(),
                        from: node.name.clone(),
                    })?;
                sized_label(target)
            } else {
                dep.clone()
            };
            out.push_str(&format!("    \"{}\"\n", escape_dot_id(&target)));
        }
        out.push_str("};\n");
    }
    out.push('}');
    Ok(out)
}

pub fn sized_label(node: &Node) -> String {
    format!("{} ({})", node.name, human_size(node.size))
}

fn escape_dot_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}
