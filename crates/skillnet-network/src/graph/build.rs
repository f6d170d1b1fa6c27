//! Course network construction from a projection.
//!
//! # Overview
//!
//! Materializes the course × course adjacency matrix as a [`petgraph`]
//! undirected graph. An edge `{A, B}` means A and B retain at least one
//! common skill at the current threshold; its weight is the number of such
//! skills.
//!
//! ## Isolated Courses
//!
//! Every course becomes a node, in input order, before any edge is added.
//! Courses that share nothing with anyone stay in the graph as zero-degree
//! nodes, so density and giant-component ratio are always computed over the
//! full course population rather than a threshold-dependent subset.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use skillnet_core::{AnalysisError, Result};
use tracing::instrument;

use super::project::Projection;

// ---------------------------------------------------------------------------
// CourseNetwork
// ---------------------------------------------------------------------------

/// Node payload: course identity and its coverage at this threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseNode {
    pub id: String,
    pub coverage: usize,
}

/// Undirected weighted course co-occurrence graph for one threshold.
///
/// Node `i` corresponds to row `i` of the association matrix.
#[derive(Debug)]
pub struct CourseNetwork {
    /// Nodes = courses, edge weights = shared-skill counts.
    pub graph: UnGraph<CourseNode, f64>,
    /// Mapping from course ID to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl CourseNetwork {
    /// Build the network for `course_ids` from a [`Projection`].
    ///
    /// One edge is added for every unordered pair `i < j` with positive
    /// weight; the diagonal is never read.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ShapeMismatch`] if the id list, the coverage
    /// vector, and the adjacency dimension disagree, or if an id repeats.
    #[instrument(skip_all, fields(courses = course_ids.len()))]
    pub fn from_projection(course_ids: &[String], projection: &Projection) -> Result<Self> {
        let n = course_ids.len();
        if projection.adjacency.shape() != (n, n) {
            return Err(AnalysisError::ShapeMismatch(format!(
                "{n} course ids for a {}x{} adjacency matrix",
                projection.adjacency.nrows(),
                projection.adjacency.ncols()
            )));
        }
        if projection.coverage.len() != n {
            return Err(AnalysisError::ShapeMismatch(format!(
                "{n} course ids for {} coverage values",
                projection.coverage.len()
            )));
        }

        let mut graph = UnGraph::<CourseNode, f64>::with_capacity(n, 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(n);

        // Step 1: every course is a node, linked or not.
        for (id, &coverage) in course_ids.iter().zip(&projection.coverage) {
            let idx = graph.add_node(CourseNode {
                id: id.clone(),
                coverage,
            });
            if node_map.insert(id.clone(), idx).is_some() {
                return Err(AnalysisError::ShapeMismatch(format!(
                    "course id {id:?} appears more than once"
                )));
            }
        }

        // Step 2: one edge per linked unordered pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = projection.weight(i, j);
                if weight > 0.0 {
                    graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
                }
            }
        }

        Ok(Self { graph, node_map })
    }

    /// Return the number of nodes (courses) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (linked course pairs) in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a course ID.
    #[must_use]
    pub fn node_index(&self, course_id: &str) -> Option<NodeIndex> {
        self.node_map.get(course_id).copied()
    }

    /// Return the payload for a node.
    #[must_use]
    pub fn course(&self, idx: NodeIndex) -> Option<&CourseNode> {
        self.graph.node_weight(idx)
    }

    /// Number of incident edges.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    /// Shared-skill weight between two courses, if they are linked.
    #[must_use]
    pub fn weight_between(&self, a: &str, b: &str) -> Option<f64> {
        let (ia, ib) = (self.node_index(a)?, self.node_index(b)?);
        self.graph
            .find_edge(ia, ib)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    fn projection(n: usize, adjacency: &[f64], coverage: Vec<usize>) -> Projection {
        Projection {
            adjacency: DMatrix::from_row_slice(n, n, adjacency),
            coverage,
        }
    }

    #[test]
    fn isolated_courses_are_nodes() {
        let p = projection(3, &[0.0; 9], vec![4, 0, 2]);
        let network = CourseNetwork::from_projection(&ids(3), &p).expect("build");

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 0);
        let c0 = network.node_index("c0").expect("c0 node");
        assert_eq!(network.degree(c0), 0);
        assert_eq!(network.course(c0).map(|c| c.coverage), Some(4));
    }

    #[test]
    fn edges_follow_upper_triangle_once() {
        let p = projection(
            3,
            &[0.0, 2.0, 0.0, 2.0, 0.0, 1.0, 0.0, 1.0, 0.0],
            vec![2, 3, 1],
        );
        let network = CourseNetwork::from_projection(&ids(3), &p).expect("build");

        assert_eq!(network.edge_count(), 2, "no duplicate unordered pairs");
        assert_eq!(network.weight_between("c0", "c1"), Some(2.0));
        assert_eq!(network.weight_between("c1", "c0"), Some(2.0));
        assert_eq!(network.weight_between("c0", "c2"), None);

        let c1 = network.node_index("c1").expect("c1 node");
        assert_eq!(network.degree(c1), 2);
    }

    #[test]
    fn diagonal_is_never_an_edge() {
        // A malformed projection with a non-zero diagonal still yields no self-loop.
        let p = projection(2, &[5.0, 0.0, 0.0, 5.0], vec![5, 5]);
        let network = CourseNetwork::from_projection(&ids(2), &p).expect("build");
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn id_count_mismatch_is_rejected() {
        let p = projection(2, &[0.0; 4], vec![0, 0]);
        let err = CourseNetwork::from_projection(&ids(3), &p).expect_err("3 ids for 2x2");
        assert!(matches!(err, AnalysisError::ShapeMismatch(_)));
    }

    #[test]
    fn coverage_length_mismatch_is_rejected() {
        let p = projection(2, &[0.0; 4], vec![0]);
        assert!(CourseNetwork::from_projection(&ids(2), &p).is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let p = projection(2, &[0.0; 4], vec![0, 0]);
        let dup = vec!["c0".to_string(), "c0".to_string()];
        assert!(CourseNetwork::from_projection(&dup, &p).is_err());
    }
}
