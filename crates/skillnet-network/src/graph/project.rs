//! Monopartite projection: course × skill → course × course.
//!
//! `adjacency = B · Bᵀ` counts, for every course pair, the skills both
//! retain at the current threshold. The diagonal (a course's overlap with
//! itself) is zeroed so the graph has no self-loops. Row sums of `B` give
//! each course's coverage.

use nalgebra::DMatrix;
use tracing::trace;

use super::binarize::BinarizedMatrix;

/// Shared-skill counts between courses plus per-course coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Symmetric course × course matrix with a zero diagonal.
    pub adjacency: DMatrix<f64>,
    /// Skills retained per course, in row order.
    pub coverage: Vec<usize>,
}

impl Projection {
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Shared-skill count between courses `i` and `j`.
    #[must_use]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.adjacency[(i, j)]
    }

    /// `true` when the adjacency equals its transpose and the diagonal is zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_well_formed(&self) -> bool {
        let n = self.adjacency.nrows();
        self.adjacency.ncols() == n
            && (0..n).all(|i| {
                self.adjacency[(i, i)] == 0.0
                    && (i + 1..n).all(|j| self.adjacency[(i, j)] == self.adjacency[(j, i)])
            })
    }
}

/// Project a binarized course × skill matrix onto courses.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn project(binarized: &BinarizedMatrix) -> Projection {
    let cells = binarized.cells();

    let mut adjacency = cells * cells.transpose();
    adjacency.fill_diagonal(0.0);

    let coverage = cells
        .row_iter()
        .map(|row| row.sum().round() as usize)
        .collect();

    trace!(
        threshold = binarized.threshold(),
        courses = adjacency.nrows(),
        "projected course network"
    );

    Projection {
        adjacency,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::binarize::binarize;
    use skillnet_core::AssociationMatrix;

    fn project_rows(rows: &[Vec<f64>], threshold: f64) -> Projection {
        let courses = (0..rows.len()).map(|i| format!("c{i}")).collect();
        let skills = (0..rows.first().map_or(0, Vec::len))
            .map(|i| format!("s{i}"))
            .collect();
        let m = AssociationMatrix::from_rows(courses, skills, rows).expect("valid");
        project(&binarize(&m, threshold).expect("binarize"))
    }

    #[test]
    fn three_course_example() {
        let p = project_rows(&[vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]], 1.0);

        let expected = DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(p.adjacency, expected);
        assert_eq!(p.coverage, vec![2, 1, 1]);
        assert!(p.is_well_formed());
    }

    #[test]
    fn shared_counts_accumulate() {
        let p = project_rows(&[vec![0.9, 0.8, 0.7], vec![0.9, 0.8, 0.1]], 0.5);
        assert!((p.weight(0, 1) - 2.0).abs() < f64::EPSILON);
        assert!((p.weight(1, 0) - 2.0).abs() < f64::EPSILON);
        assert_eq!(p.coverage, vec![3, 2]);
    }

    #[test]
    fn no_skills_means_no_links() {
        let p = project_rows(&[vec![], vec![]], 0.5);
        assert_eq!(p.course_count(), 2);
        assert_eq!(p.adjacency, DMatrix::zeros(2, 2));
        assert_eq!(p.coverage, vec![0, 0]);
    }

    #[test]
    fn empty_matrix_projects_to_empty() {
        let p = project_rows(&[], 0.5);
        assert_eq!(p.course_count(), 0);
        assert!(p.coverage.is_empty());
        assert!(p.is_well_formed());
    }
}
