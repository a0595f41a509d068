//! Agglomerative hierarchical clustering in pure Rust, for data sets that
//! are described only by their pairwise dissimilarities. Generic over
//! floating point numeric types.
//!
//! Unlike feature space algorithms such as KMeans or DBSCAN, this crate
//! never sees coordinates: the input is a symmetric matrix of distances
//! between named observations, supplied either in lower triangular or full
//! matrix form. Clustering proceeds bottom up. Every observation starts as
//! its own cluster, and the two closest clusters are repeatedly merged until
//! a single one remains. Each merge is recorded as a node of a binary tree,
//! the dendrogram, which can then be flattened into groups in two ways:
//!  1. Cutting at a fixed height, treating every merge above it as not yet
//!     having happened; or
//!  2. Undoing merges, lowest first, until a target number of clusters
//!     remains.
//!
//! The distance between two multi member clusters is controlled by the
//! linkage criterion: the mean pairwise distance between their members
//! (average linkage, as used in UPGMA), the maximum (complete linkage) or
//! the minimum (single linkage). Linkage distances are always derived from
//! the original matrix, so they never accumulate rounding error across
//! merges.
//!
//! # Examples
//! ```
//!use hclust::{DistanceMatrix, HierarchicalClustering, Linkage};
//!
//!// The header row lists every observation except the last, and each row
//!// holds the distances from an observation to those preceding it.
//!let table = "\tid1\tid2\tid3\n\
//!             id2\t2.0\n\
//!             id3\t1.5\t3.0\n\
//!             id4\t2.5\t1.0\t4.5";
//!let matrix: DistanceMatrix<f64> = DistanceMatrix::parse(table).unwrap();
//!
//!let clustering = HierarchicalClustering::new(&matrix, Linkage::Average).unwrap();
//!// 4 leaves and 3 merges
//!assert_eq!(clustering.clusters().len(), 7);
//!
//!let groups = clustering.cut_to_k(2).unwrap();
//!assert_eq!(groups.len(), 2);
//! ```

pub use crate::error::HclustError;
pub use crate::hclust::HierarchicalClustering;
pub use crate::linkage::Linkage;
pub use crate::matrix::DistanceMatrix;
pub use crate::node::ClusterNode;

mod error;
mod hclust;
mod linkage;
mod matrix;
mod node;
