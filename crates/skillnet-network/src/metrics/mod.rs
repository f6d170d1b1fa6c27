//! Metrics over a single-threshold course network.
//!
//! # Overview
//!
//! - **Influence** (`influence`): per-course coverage, degree, and
//!   `coverage / degree`.
//! - **Structure** (`structure`): link density and the giant component ratio.
//! - **Rank correlation** (`rank`): Spearman's rho, used by the sensitivity
//!   analyzer to compare influence orderings across thresholds.
//!
//! [`compute_metrics`] bundles the first two into a [`NetworkMetrics`].

pub mod influence;
pub mod rank;
pub mod structure;

use skillnet_core::{CourseCatalog, CourseInfluence, InfluenceTable, ThresholdSummary};

use crate::graph::CourseNetwork;

/// Everything measured on one course network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkMetrics {
    /// One row per course, in input order.
    pub courses: Vec<CourseInfluence>,
    pub density: f64,
    pub giant_component_ratio: f64,
    pub edge_count: usize,
    pub component_count: usize,
    pub isolated_count: usize,
}

impl NetworkMetrics {
    /// Summary row for the sweep table.
    #[must_use]
    pub const fn summary(&self, threshold: f64) -> ThresholdSummary {
        ThresholdSummary {
            threshold,
            density: Some(self.density),
            giant_component_ratio: Some(self.giant_component_ratio),
        }
    }

    /// Consume into the influence table for `threshold`.
    #[must_use]
    pub fn into_table(self, threshold: f64) -> InfluenceTable {
        InfluenceTable {
            threshold,
            courses: self.courses,
        }
    }
}

/// Compute every metric for `network`, resolving labels through `catalog`.
#[must_use]
pub fn compute_metrics(network: &CourseNetwork, catalog: &CourseCatalog) -> NetworkMetrics {
    let components = structure::component_sizes(network);
    NetworkMetrics {
        courses: influence::course_influence(network, catalog),
        density: structure::density(network),
        giant_component_ratio: structure::giant_component_ratio(network),
        edge_count: network.edge_count(),
        component_count: components.len(),
        isolated_count: structure::isolated_count(network),
    }
}
