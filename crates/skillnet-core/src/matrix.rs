//! Course × skill association matrix.
//!
//! Rows are courses, columns are skills, and each cell holds the strength of
//! association between the two. The matrix is loaded once per run and shared
//! read-only by every threshold iteration.

use std::collections::HashSet;

use nalgebra::DMatrix;

use crate::error::{AnalysisError, Result};

/// Dense real-valued course × skill table with row and column identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationMatrix {
    course_ids: Vec<String>,
    skill_ids: Vec<String>,
    values: DMatrix<f64>,
}

impl AssociationMatrix {
    /// Wrap an existing matrix with its identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ShapeMismatch`] if the identifier counts do not
    /// match the matrix dimensions or a course identifier appears twice.
    pub fn new(
        course_ids: Vec<String>,
        skill_ids: Vec<String>,
        values: DMatrix<f64>,
    ) -> Result<Self> {
        if course_ids.len() != values.nrows() {
            return Err(AnalysisError::ShapeMismatch(format!(
                "{} course ids for {} matrix rows",
                course_ids.len(),
                values.nrows()
            )));
        }
        if skill_ids.len() != values.ncols() {
            return Err(AnalysisError::ShapeMismatch(format!(
                "{} skill ids for {} matrix columns",
                skill_ids.len(),
                values.ncols()
            )));
        }

        let mut seen = HashSet::with_capacity(course_ids.len());
        for id in &course_ids {
            if !seen.insert(id.as_str()) {
                return Err(AnalysisError::ShapeMismatch(format!(
                    "course id {id:?} appears more than once"
                )));
            }
        }

        Ok(Self {
            course_ids,
            skill_ids,
            values,
        })
    }

    /// Build a matrix from row vectors, one per course.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ShapeMismatch`] for ragged rows, in addition
    /// to the checks performed by [`AssociationMatrix::new`].
    pub fn from_rows(
        course_ids: Vec<String>,
        skill_ids: Vec<String>,
        rows: &[Vec<f64>],
    ) -> Result<Self> {
        let ncols = skill_ids.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(AnalysisError::ShapeMismatch(format!(
                "row {idx} has {} values, expected {ncols}",
                row.len()
            )));
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = DMatrix::from_row_slice(rows.len(), ncols, &flat);
        Self::new(course_ids, skill_ids, values)
    }

    /// Course identifiers in row order.
    #[must_use]
    pub fn course_ids(&self) -> &[String] {
        &self.course_ids
    }

    /// Skill identifiers in column order.
    #[must_use]
    pub fn skill_ids(&self) -> &[String] {
        &self.skill_ids
    }

    /// The raw association values.
    #[must_use]
    pub const fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    #[must_use]
    pub fn course_count(&self) -> usize {
        self.values.nrows()
    }

    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.values.ncols()
    }

    /// `(courses, skills)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn from_rows_preserves_row_order() {
        let m = AssociationMatrix::from_rows(
            ids("c", 2),
            ids("s", 3),
            &[vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]],
        )
        .expect("valid matrix");

        assert_eq!(m.shape(), (2, 3));
        assert!((m.values()[(1, 0)] - 0.4).abs() < f64::EPSILON);
        assert!((m.values()[(0, 2)] - 0.3).abs() < f64::EPSILON);
        assert_eq!(m.course_ids(), ["c0", "c1"]);
    }

    #[test]
    fn ragged_rows_are_shape_mismatch() {
        let err = AssociationMatrix::from_rows(ids("c", 2), ids("s", 2), &[vec![1.0, 0.0], vec![1.0]])
            .expect_err("ragged rows must fail");
        assert!(matches!(err, AnalysisError::ShapeMismatch(_)));
    }

    #[test]
    fn duplicate_course_ids_are_rejected() {
        let err = AssociationMatrix::from_rows(
            vec!["c0".into(), "c0".into()],
            ids("s", 1),
            &[vec![1.0], vec![0.0]],
        )
        .expect_err("duplicate ids must fail");
        assert!(err.to_string().contains("c0"));
    }

    #[test]
    fn id_count_must_match_rows() {
        let err = AssociationMatrix::new(ids("c", 3), ids("s", 1), DMatrix::zeros(2, 1))
            .expect_err("3 ids for 2 rows");
        assert!(matches!(err, AnalysisError::ShapeMismatch(_)));
    }

    #[test]
    fn empty_matrix_is_valid() {
        let m = AssociationMatrix::from_rows(vec![], ids("s", 4), &[]).expect("empty is valid");
        assert_eq!(m.course_count(), 0);
        assert_eq!(m.skill_count(), 4);
    }
}
