//! Graph-level structure: link density and connected components.

use fixedbitset::FixedBitSet;
use petgraph::visit::IntoNodeIdentifiers;

use crate::graph::CourseNetwork;

// ---------------------------------------------------------------------------
// Link Density
// ---------------------------------------------------------------------------

/// Fraction of possible course pairs that are linked.
///
/// Density = 2 · edges / (nodes · (nodes − 1)) for an undirected graph.
/// Returns 0.0 for graphs with fewer than 2 nodes.
#[must_use]
pub fn density(network: &CourseNetwork) -> f64 {
    compute_density(network.node_count(), network.edge_count())
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    (2 * edge_count) as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Component Analysis
// ---------------------------------------------------------------------------

/// Sizes of the connected components, sorted descending.
///
/// Every isolated course is its own component of size 1.
#[must_use]
pub fn component_sizes(network: &CourseNetwork) -> Vec<usize> {
    let graph = &network.graph;
    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut sizes = Vec::new();

    for start in graph.node_identifiers() {
        if visited.contains(start.index()) {
            continue;
        }

        let mut stack = vec![start];
        visited.insert(start.index());
        let mut component_size = 0usize;

        while let Some(node) = stack.pop() {
            component_size += 1;
            for neighbor in graph.neighbors(node) {
                if !visited.put(neighbor.index()) {
                    stack.push(neighbor);
                }
            }
        }

        sizes.push(component_size);
    }

    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

/// Share of all courses contained in the largest connected component.
///
/// Returns 0.0 for an empty graph; otherwise the value is in `(0, 1]` and
/// equals 1.0 exactly when the network is connected.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn giant_component_ratio(network: &CourseNetwork) -> f64 {
    let node_count = network.node_count();
    if node_count == 0 {
        return 0.0;
    }
    let largest = component_sizes(network).first().copied().unwrap_or(0);
    largest as f64 / node_count as f64
}

/// Courses with no links at this threshold.
#[must_use]
pub fn isolated_count(network: &CourseNetwork) -> usize {
    network
        .graph
        .node_identifiers()
        .filter(|&idx| network.graph.neighbors(idx).next().is_none())
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
