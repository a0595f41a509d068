use crate::error::HclustError;
use crate::linkage::Linkage;
use crate::matrix::{pair_key, DistanceMatrix};
use crate::node::ClusterNode;
use num_traits::Float;
use std::collections::HashMap;

/// Agglomerative hierarchical clustering over a pairwise distance matrix.
///
/// Construction runs the full merge loop to completion: starting from one
/// leaf node per observation, the two closest entities are repeatedly merged
/// until a single cluster subsumes every observation. Every node ever
/// created is retained in creation order, leaves first, so for `N`
/// observations the dendrogram always holds `2N - 1` nodes and its final
/// node is the trunk.
///
/// # Examples
/// ```
///use hclust::{DistanceMatrix, HierarchicalClustering, Linkage};
///
///let matrix: DistanceMatrix<f64> = DistanceMatrix::parse(
///    "\tid1\tid2\tid3\nid2\t2.0\nid3\t1.5\t3.0\nid4\t2.5\t1.0\t4.5",
///).unwrap();
///let clustering = HierarchicalClustering::new(&matrix, Linkage::Average).unwrap();
///
///// 4 leaves and 3 merges
///assert_eq!(clustering.clusters().len(), 7);
///assert_eq!(clustering.cut(1.0).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HierarchicalClustering<'a, T> {
    matrix: &'a DistanceMatrix<T>,
    linkage: Linkage,
    clusters: Vec<ClusterNode<T>>,
}

impl<'a, T: Float> HierarchicalClustering<'a, T> {
    /// Clusters the observations of `matrix` bottom up, using the given
    /// linkage criterion to derive the distance between multi member
    /// clusters. The matrix itself is only ever read.
    ///
    /// # Parameters
    /// * `matrix` - the pairwise distances between the observations to
    ///              cluster.
    /// * `linkage` - the criterion used to derive the distance between two
    ///               clusters from the distances between their members.
    ///
    /// # Returns
    /// * The completed clustering, or an error if the matrix holds no
    ///   observations or lacks a distance for a pair of them.
    pub fn new(matrix: &'a DistanceMatrix<T>, linkage: Linkage) -> Result<Self, HclustError> {
        if matrix.n_observations() == 0 {
            return Err(HclustError::InsufficientData(String::from(
                "the distance matrix holds no observations",
            )));
        }
        let mut clustering = HierarchicalClustering {
            matrix,
            linkage,
            clusters: Vec::new(),
        };
        let mut working = clustering.to_nodes();
        while let Some((a, b, distance)) = working.closest() {
            clustering.merge(&mut working, a, b, distance)?;
        }
        Ok(clustering)
    }

    /// Every node of the dendrogram in creation order: the leaves first,
    /// followed by each merged cluster, ending with the trunk.
    pub fn clusters(&self) -> &[ClusterNode<T>] {
        &self.clusters
    }

    /// The linkage criterion the clustering was built with.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// The ids of the leaf nodes, one per original observation.
    pub fn leaves(&self) -> Vec<&str> {
        self.clusters
            .iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.members[0].as_str())
            .collect()
    }

    /// The trunk of the dendrogram: the final, all subsuming cluster.
    pub fn trunk(&self) -> &ClusterNode<T> {
        // Safe: construction fails on an empty matrix, so there is always
        // at least one node
        self.clusters.last().unwrap()
    }

    /// Flattens the dendrogram at the given height: every merge above
    /// `height` is treated as not yet having happened. Each leaf is walked
    /// up through its ancestors while they sit at or below the cut, and the
    /// distinct stopping nodes form the result.
    ///
    /// Larger heights never produce more clusters than smaller ones.
    ///
    /// # Parameters
    /// * `height` - the height to cut at; must not be negative.
    ///
    /// # Returns
    /// * The member ids of each cluster obtained by the cut.
    pub fn cut(&self, height: T) -> Result<Vec<Vec<String>>, HclustError> {
        if height < T::zero() {
            return Err(HclustError::InvalidArgument(String::from(
                "the cut height cannot be negative",
            )));
        }
        let mut groups: Vec<usize> = Vec::new();
        for (idx, node) in self.clusters.iter().enumerate() {
            if !node.is_leaf() {
                continue;
            }
            let mut current = idx;
            while let Some(parent) = self.clusters[current].parent {
                if self.clusters[parent].height > height {
                    break;
                }
                current = parent;
            }
            if !groups.contains(&current) {
                groups.push(current);
            }
        }
        Ok(self.members_of(&groups))
    }

    /// Flattens the dendrogram by undoing merges, lowest first, until at
    /// most `n` clusters remain. Starting from the leaves, the pair of open
    /// clusters whose shared parent has the smallest height is repeatedly
    /// replaced by that parent.
    ///
    /// # Parameters
    /// * `n` - the target number of clusters; must be at least one. A
    ///         target greater than or equal to the number of observations
    ///         returns every leaf unchanged, and a target of one returns
    ///         the trunk alone.
    ///
    /// # Returns
    /// * The member ids of each remaining cluster.
    pub fn cut_to_k(&self, n: usize) -> Result<Vec<Vec<String>>, HclustError> {
        if n == 0 {
            return Err(HclustError::InvalidArgument(String::from(
                "the target cluster count must be at least one",
            )));
        }
        let mut open: Vec<usize> = self
            .clusters
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect();

        while open.len() > n {
            // find the lowest parent whose children are both still open;
            // the first minimal candidate in list order wins ties
            let mut lowest: Option<(usize, (usize, usize))> = None;
            for &node_idx in &open {
                let parent = match self.clusters[node_idx].parent {
                    Some(parent) => parent,
                    None => continue,
                };
                let children = match self.clusters[parent].children {
                    Some(children) => children,
                    None => continue,
                };
                if !open.contains(&children.0) || !open.contains(&children.1) {
                    continue;
                }
                let replace = match lowest {
                    Some((best, _)) => {
                        self.clusters[parent].height < self.clusters[best].height
                    }
                    None => true,
                };
                if replace {
                    lowest = Some((parent, children));
                }
            }
            match lowest {
                Some((parent, (left, right))) => {
                    open.retain(|&idx| idx != left && idx != right);
                    open.push(parent);
                }
                None => break,
            }
        }
        Ok(self.members_of(&open))
    }

    /// Seeds the working matrix: one leaf node per observation, with the
    /// pairwise distances copied from the original matrix unchanged.
    fn to_nodes(&mut self) -> WorkingMatrix<T> {
        let matrix = self.matrix;
        let mut working = WorkingMatrix {
            active: Vec::new(),
            dist: HashMap::new(),
        };
        for id in matrix.observations() {
            working.active.push(self.clusters.len());
            self.clusters.push(ClusterNode::leaf(id.clone()));
        }
        let obs = matrix.observations();
        for row in 1..obs.len() {
            for col in 0..row {
                if let Some(distance) = matrix.distance(&obs[row], &obs[col]) {
                    working.dist.insert(pair_key(col, row), distance);
                }
            }
        }
        working
    }

    /// Merges nodes `a` and `b` into a new cluster: the new node is
    /// appended to the permanent cluster list, the parents of `a` and `b`
    /// are backfilled, and the working matrix is updated with the linkage
    /// distance from every remaining entity to the new cluster.
    fn merge(
        &mut self,
        working: &mut WorkingMatrix<T>,
        a: usize,
        b: usize,
        distance: T,
    ) -> Result<(), HclustError> {
        let mut members = self.clusters[a].members.clone();
        members.extend(self.clusters[b].members.iter().cloned());
        let height = distance / (T::one() + T::one());

        let merged = self.clusters.len();
        self.clusters.push(ClusterNode::merged(members, height, (a, b)));
        self.clusters[a].parent = Some(merged);
        self.clusters[b].parent = Some(merged);

        working.remove(a);
        working.remove(b);
        for i in 0..working.active.len() {
            let other = working.active[i];
            let linkage_dist = self
                .linkage
                .between(
                    self.matrix,
                    &self.clusters[other].members,
                    &self.clusters[merged].members,
                )
                .ok_or_else(|| {
                    HclustError::MalformedMatrix(String::from(
                        "a pair of observations has no recorded distance",
                    ))
                })?;
            working.dist.insert(pair_key(other, merged), linkage_dist);
        }
        working.active.push(merged);
        Ok(())
    }

    fn members_of(&self, indices: &[usize]) -> Vec<Vec<String>> {
        indices
            .iter()
            .map(|&idx| self.clusters[idx].members.clone())
            .collect()
    }
}

/// A disposable snapshot of the entities still to be merged and the current
/// raw linkage distances between them. Keys are indices into the permanent
/// cluster arena; entries for merged entities are removed and replaced by an
/// entry for the new cluster. Discarded once clustering completes.
#[derive(Debug)]
struct WorkingMatrix<T> {
    active: Vec<usize>,
    dist: HashMap<(usize, usize), T>,
}

impl<T: Float> WorkingMatrix<T> {
    /// Returns the closest pair of active entities and the raw distance
    /// between them, or `None` once fewer than two entities remain. Ties
    /// are broken by the first minimal pair in enumeration order.
    fn closest(&self) -> Option<(usize, usize, T)> {
        if self.active.len() < 2 {
            return None;
        }
        let mut best: Option<(usize, usize, T)> = None;
        for row in 1..self.active.len() {
            for col in 0..row {
                let (a, b) = (self.active[row], self.active[col]);
                if let Some(&distance) = self.dist.get(&pair_key(a, b)) {
                    let closer = match best {
                        Some((_, _, best_dist)) => distance < best_dist,
                        None => true,
                    };
                    if closer {
                        best = Some((a, b, distance));
                    }
                }
            }
        }
        best
    }

    /// Drops an entity from the active list and every distance entry that
    /// refers to it. Stale keys are collected first and removed second,
    /// never while iterating the map.
    fn remove(&mut self, entity: usize) {
        self.active.retain(|&idx| idx != entity);
        let stale: Vec<(usize, usize)> = self
            .dist
            .keys()
            .filter(|(a, b)| *a == entity || *b == entity)
            .copied()
            .collect();
        for key in stale {
            self.dist.remove(&key);
        }
    }
}
