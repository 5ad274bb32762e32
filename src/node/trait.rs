use crate::error::Result;
use crate::geometry::{BoundTrait, PointTrait};
use crate::pairs::{NeighborPair, NeighborPairs, QueryStats};

/// A stored point together with its payload.
pub type Entry<P, T> = (P, T);

/// The scalar type of a node's points and bounds.
pub type NodeNum<S> = <<S as SpatialNode>::Point as PointTrait>::Num;

/// A node in a bounding volume hierarchy.
///
/// A node is either a leaf, which owns its [entries][SpatialNode::entries], or an internal node,
/// which exclusively owns its [children][SpatialNode::children]. The enumerators only ever read a
/// tree through this trait, so any hierarchy works as long as every node's
/// [bound][SpatialNode::bound] encloses all points stored beneath it.
pub trait SpatialNode: Sized {
    /// The point type stored in leaves.
    type Point: PointTrait;

    /// The bounding volume type of each node.
    type Bound: BoundTrait<Num = <Self::Point as PointTrait>::Num>;

    /// The payload attached to each point.
    type Payload;

    /// The precomputed bound of everything stored beneath this node.
    fn bound(&self) -> &Self::Bound;

    /// Returns `true` if this is a leaf node without children.
    fn is_leaf(&self) -> bool;

    /// The entries stored in this node. Empty for internal nodes.
    fn entries(&self) -> &[Entry<Self::Point, Self::Payload>];

    /// The children of this node. Empty for leaves.
    fn children(&self) -> &[Self];

    /// Insert one entry into the subtree rooted at this node.
    fn put(&mut self, point: Self::Point, payload: Self::Payload) -> Result<()>;

    /// Returns `true` if this is an internal node with children.
    fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The total number of entries stored beneath this node.
    fn num_items(&self) -> usize {
        if self.is_leaf() {
            self.entries().len()
        } else {
            self.children().iter().map(|c| c.num_items()).sum()
        }
    }

    /// The number of levels beneath and including this node.
    fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }

    /// Find every unordered pair of distinct entries within `distance` of each other.
    ///
    /// ```
    /// use spatial_tree::geometry::Coord;
    /// use spatial_tree::kdtree::KDNode;
    /// use spatial_tree::SpatialNode;
    ///
    /// let mut tree = KDNode::<f64, &str, 2>::new();
    /// tree.put(Coord::xy(0., 0.), "a").unwrap();
    /// tree.put(Coord::xy(1., 0.), "b").unwrap();
    /// tree.put(Coord::xy(5., 5.), "c").unwrap();
    ///
    /// let pairs = tree.find_pairs(1.5);
    /// assert_eq!(pairs.len(), 1);
    /// let (left, right) = pairs[0].payloads();
    /// assert_eq!((*left).min(*right), "a");
    /// assert_eq!((*left).max(*right), "b");
    /// ```
    fn find_pairs(
        &self,
        distance: NodeNum<Self>,
    ) -> Vec<NeighborPair<'_, Self::Point, Self::Payload>> {
        crate::pairs::find_pairs(self, distance)
    }

    /// The same as [`SpatialNode::find_pairs`], also reporting how much of the pairwise space
    /// was pruned.
    fn find_pairs_with_stats(
        &self,
        distance: NodeNum<Self>,
    ) -> (Vec<NeighborPair<'_, Self::Point, Self::Payload>>, QueryStats) {
        crate::pairs::find_pairs_with_stats(self, distance)
    }

    /// Lazily iterate over the pairs that [`SpatialNode::find_pairs`] returns.
    fn neighbor_pairs(&self, distance: NodeNum<Self>) -> NeighborPairs<'_, Self> {
        NeighborPairs::new(self, distance)
    }

    /// Find neighbor pairs using the rayon thread pool.
    #[cfg(feature = "rayon")]
    fn par_find_pairs(
        &self,
        distance: NodeNum<Self>,
    ) -> Vec<NeighborPair<'_, Self::Point, Self::Payload>>
    where
        Self: Sync,
        Self::Point: Sync,
        Self::Payload: Sync,
    {
        crate::pairs::par_find_pairs(self, distance)
    }
}
