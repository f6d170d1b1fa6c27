//! Per-course coverage, degree, and influence.
//!
//! Influence is `coverage / degree`: how many skills a course retains per
//! course it is linked to. A course with no links has no influence value at
//! all, which is different from an influence of zero.

use skillnet_core::{CourseCatalog, CourseInfluence};

use crate::graph::CourseNetwork;

/// `coverage / degree`, or `None` when the course is isolated.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn influence(coverage: usize, degree: usize) -> Option<f64> {
    (degree > 0).then(|| coverage as f64 / degree as f64)
}

/// One [`CourseInfluence`] row per course, in input (node index) order.
///
/// Labels come from `catalog`; courses missing from it are labelled
/// [`skillnet_core::UNKNOWN_LABEL`].
#[must_use]
pub fn course_influence(network: &CourseNetwork, catalog: &CourseCatalog) -> Vec<CourseInfluence> {
    network
        .graph
        .node_indices()
        .filter_map(|idx| {
            let course = network.course(idx)?;
            let degree = network.degree(idx);
            Some(CourseInfluence {
                id: course.id.clone(),
                label: catalog.label(&course.id).to_string(),
                coverage: course.coverage,
                degree,
                influence: influence(course.coverage, degree),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Projection;
    use nalgebra::DMatrix;

    #[test]
    fn isolated_course_has_no_influence() {
        assert_eq!(influence(5, 0), None);
        assert_eq!(influence(0, 3), Some(0.0));
        assert_eq!(influence(3, 2), Some(1.5));
    }

    #[test]
    fn rows_follow_input_order_with_labels() {
        let ids: Vec<String> = ["B200", "A100", "Z999"].iter().map(|s| (*s).to_string()).collect();
        let p = Projection {
            adjacency: DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            coverage: vec![2, 1, 4],
        };
        let network = CourseNetwork::from_projection(&ids, &p).expect("build");
        let catalog = CourseCatalog::from_pairs([("A100", "Algorithms"), ("B200", "Biology")]);

        let rows = course_influence(&network, &catalog);
        let order: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, ["B200", "A100", "Z999"]);

        assert_eq!(rows[0].label, "Biology");
        assert_eq!(rows[0].influence, Some(2.0));
        assert_eq!(rows[2].label, "Unknown");
        assert_eq!(rows[2].degree, 0);
        assert_eq!(rows[2].coverage, 4);
        assert_eq!(rows[2].influence, None);
    }
}
