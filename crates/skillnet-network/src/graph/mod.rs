//! Course network construction for one threshold.
//!
//! # Overview
//!
//! This module turns the read-only association matrix into a petgraph-based
//! undirected course network. The network feeds the influence and structure
//! metrics in [`crate::metrics`].
//!
//! ## Pipeline
//!
//! ```text
//! AssociationMatrix (course × skill, real-valued)
//!        ↓  binarize::binarize(matrix, threshold)
//! BinarizedMatrix (course × skill, 0/1)
//!        ↓  project::project()
//! Projection (course × course shared-skill counts, zero diagonal; coverage)
//!        ↓  build::CourseNetwork::from_projection()
//! CourseNetwork (UnGraph, every course a node)
//! ```
//!
//! All three stages are pure and recomputed from scratch per threshold.
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use skillnet_network::graph::{binarize, project, CourseNetwork};
//!
//! let binarized = binarize(&matrix, 0.6)?;
//! let projection = project(&binarized);
//! let network = CourseNetwork::from_projection(matrix.course_ids(), &projection)?;
//!
//! println!("courses={} links={}", network.node_count(), network.edge_count());
//! ```

pub mod binarize;
pub mod build;
pub mod project;

// Re-export primary types at module level for convenience.
pub use binarize::{BinarizedMatrix, binarize};
pub use build::{CourseNetwork, CourseNode};
pub use project::{Projection, project};
