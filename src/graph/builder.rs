use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::{Catalogue, Group, Package};
use crate::error::{DepvizError, Result};
use crate::graph::{Graph, Node};

pub fn build_graph(packages: &Catalogue, groups: &[Group]) -> Result<Graph> {
    let membership = group_membership(packages, groups)?;
    let mut graph = Graph::new();

    for package in packages {
        match membership.get(package.name.as_str()) {
            Some(group) => {
                if !graph.contains(&group.name) {
                    graph.insert(group_node(group, groups)?);
                }
            }
            None => graph.insert(package_node(package, groups)?),
        }
    }

    Ok(graph)
}

/// Maps every grouped package to its group, rejecting packages claimed twice.
fn group_membership<'g>(
    packages: &Catalogue,
    groups: &'g [Group],
) -> Result<HashMap<&'g str, &'g Group>> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut membership: HashMap<&str, &Group> = HashMap::new();

    for group in groups {
        if packages.contains(&group.name) {
            return Err(DepvizError::GroupNameCollision(group.name.clone()));
        }
        if !names.insert(group.name.as_str()) {
            return Err(DepvizError::DuplicateGroup(group.name.clone()));
        }
        for member in &group.packages {
            if !packages.contains(member) {
                continue;
            }
            if let Some(first) = membership.insert(member.as_str(), group) {
                return Err(DepvizError::OverlappingGroups {
                    package: member.clone(),
                    first: first.name.clone(),
                    second: group.name.clone(),
                });
            }
        }
    }

    Ok(membership)
}

fn package_node(package: &Package, groups: &[Group]) -> Result<Node> {
    let dependencies = if groups.is_empty() {
        package.requires_resolved.clone()
    } else {
        collapse_into_groups(&package.requires_resolved, groups)?
    };
    Ok(Node {
        name: package.name.clone(),
        size: package.size,
        dependencies,
    })
}

/// A group never lists its own members, so only other groups can absorb its edges.
fn group_node(group: &Group, groups: &[Group]) -> Result<Node> {
    Ok(Node {
        name: group.name.clone(),
        size: group.size,
        dependencies: collapse_into_groups(&group.requires_resolved, groups)?,
    })
}

/// Replaces every dependency inside a group by a single edge to that group.
///
/// A dependency claimed by two groups has no single owner and is rejected, even
/// when it is absent from the catalogue.
fn collapse_into_groups<'a, I>(requires_resolved: I, groups: &[Group]) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut deps = BTreeSet::new();
    for dep in requires_resolved {
        let mut owners = groups.iter().filter(|group| group.contains(dep));
        match (owners.next(), owners.next()) {
            (Some(first), Some(second)) => {
                return Err(DepvizError::OverlappingGroups {
                    package: dep.clone(),
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
            (Some(owner), None) => deps.insert(owner.name.clone()),
            _ => deps.insert(dep.clone()),
        };
    }
    Ok(deps.into_iter().collect())
}
