//! Recursive dual-tree traversal.

use std::ops::AddAssign;
use std::ptr;

use log::debug;

use crate::geometry::{BoundTrait, PointTrait};
use crate::node::{Entry, NodeNum, SpatialNode};
use crate::pairs::NeighborPair;
use crate::r#type::IndexableNum;

/// Counters describing how much work a pair query did.
///
/// Comparing `point_comparisons` against `n * (n - 1) / 2` shows how much of the pairwise space
/// the bounding volumes pruned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Node pairs the traversal descended into, including the root paired with itself.
    pub node_pairs_visited: usize,
    /// Node pairs skipped because their bounds were farther apart than the threshold.
    pub node_pairs_pruned: usize,
    /// Leaf pairs whose entries were compared exhaustively.
    pub leaf_pairs_scanned: usize,
    /// Point to point distance evaluations.
    pub point_comparisons: usize,
    /// Pairs within the threshold.
    pub pairs_found: usize,
}

impl AddAssign for QueryStats {
    fn add_assign(&mut self, other: Self) {
        self.node_pairs_visited += other.node_pairs_visited;
        self.node_pairs_pruned += other.node_pairs_pruned;
        self.leaf_pairs_scanned += other.leaf_pairs_scanned;
        self.point_comparisons += other.point_comparisons;
        self.pairs_found += other.pairs_found;
    }
}

/// A query distance in both its linear and squared forms.
///
/// Points are compared by squared distance, bounds by linear distance. When squaring the distance
/// overflows to `+inf` or underflows below the normal range, the squared form no longer orders
/// point distances correctly and points are compared by linear distance instead.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Threshold<N: IndexableNum> {
    linear: N,
    squared: N,
}

impl<N: IndexableNum> Threshold<N> {
    /// Returns `None` for a negative or NaN distance, which no pair can satisfy.
    pub(crate) fn new(distance: N) -> Option<Self> {
        if distance.is_nan() || distance < N::zero() {
            debug!("Distance threshold {:?} matches no pairs", distance);
            return None;
        }
        Some(Self {
            linear: distance,
            squared: distance * distance,
        })
    }

    #[inline]
    pub(crate) fn accepts<P: PointTrait<Num = N>>(&self, a: &P, b: &P) -> bool {
        if self.squared.is_normal() {
            a.sqdist(b) <= self.squared
        } else {
            a.distance(b) <= self.linear
        }
    }

    #[inline]
    pub(crate) fn prunes<B: BoundTrait<Num = N>>(&self, a: &B, b: &B) -> bool {
        a.distance(b) > self.linear
    }
}

/// The nodes to pair up when descending from `node`: its children, or the node itself when it
/// is a leaf.
#[inline]
pub(crate) fn child_list<S: SpatialNode>(node: &S) -> &[S] {
    if node.is_leaf() {
        std::slice::from_ref(node)
    } else {
        node.children()
    }
}

/// Compare the entries of two leaves. When both are the same leaf, each unordered pair is
/// compared once and no entry is compared with itself.
pub(crate) fn scan_leaves<'a, S, F>(
    a: &'a S,
    b: &'a S,
    threshold: &Threshold<NodeNum<S>>,
    stats: &mut QueryStats,
    emit: &mut F,
) where
    S: SpatialNode,
    F: FnMut(&'a Entry<S::Point, S::Payload>, &'a Entry<S::Point, S::Payload>),
{
    let same = ptr::eq(a, b);
    let right_entries = b.entries();

    stats.leaf_pairs_scanned += 1;
    for (i, left) in a.entries().iter().enumerate() {
        let start = if same { i + 1 } else { 0 };
        for right in &right_entries[start..] {
            stats.point_comparisons += 1;
            if threshold.accepts(&left.0, &right.0) {
                stats.pairs_found += 1;
                emit(left, right);
            }
        }
    }
}

fn dual_tree<'a, S, F>(
    a: &'a S,
    b: &'a S,
    threshold: &Threshold<NodeNum<S>>,
    stats: &mut QueryStats,
    emit: &mut F,
) where
    S: SpatialNode,
    F: FnMut(&'a Entry<S::Point, S::Payload>, &'a Entry<S::Point, S::Payload>),
{
    stats.node_pairs_visited += 1;

    if a.is_leaf() && b.is_leaf() {
        scan_leaves(a, b, threshold, stats, emit);
        return;
    }

    let same = ptr::eq(a, b);
    let left_children = child_list(a);
    let right_children = child_list(b);

    for (i, left) in left_children.iter().enumerate() {
        // The diagonal is included: a child paired with itself finds the pairs inside it.
        let start = if same { i } else { 0 };
        for right in &right_children[start..] {
            if threshold.prunes(left.bound(), right.bound()) {
                stats.node_pairs_pruned += 1;
                continue;
            }
            dual_tree(left, right, threshold, stats, emit);
        }
    }
}

/// Call `emit` for every pair of distinct entries under `root` within `distance` of each other.
///
/// This is the allocation-free form of [`find_pairs`]. It returns the counters of the traversal.
pub fn for_each_pair<'a, S, F>(root: &'a S, distance: NodeNum<S>, mut emit: F) -> QueryStats
where
    S: SpatialNode,
    F: FnMut(NeighborPair<'a, S::Point, S::Payload>),
{
    let mut stats = QueryStats::default();
    let Some(threshold) = Threshold::new(distance) else {
        return stats;
    };

    let mut sink = |left: &'a Entry<S::Point, S::Payload>,
                    right: &'a Entry<S::Point, S::Payload>| {
        emit(NeighborPair::new(left, right))
    };
    dual_tree(root, root, &threshold, &mut stats, &mut sink);

    debug!(
        "Found {} pairs within {:?}: visited {} node pairs, pruned {}, {} point comparisons",
        stats.pairs_found,
        distance,
        stats.node_pairs_visited,
        stats.node_pairs_pruned,
        stats.point_comparisons
    );
    stats
}

/// Find every unordered pair of distinct entries under `root` within `distance` of each other.
///
/// `distance` is linear; it is squared once for point comparisons. A negative or NaN distance
/// returns no pairs.
///
/// The results are only complete if every node's bound encloses its contents and the bound
/// distance never overestimates. A tree violating this silently loses pairs.
pub fn find_pairs<S: SpatialNode>(
    root: &S,
    distance: NodeNum<S>,
) -> Vec<NeighborPair<'_, S::Point, S::Payload>> {
    find_pairs_with_stats(root, distance).0
}

/// The same as [`find_pairs`], also returning the counters of the traversal.
pub fn find_pairs_with_stats<S: SpatialNode>(
    root: &S,
    distance: NodeNum<S>,
) -> (Vec<NeighborPair<'_, S::Point, S::Payload>>, QueryStats) {
    let mut pairs = vec![];
    let stats = for_each_pair(root, distance, |pair| pairs.push(pair));
    (pairs, stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Coord;
    use crate::kdtree::KDNode;
    use crate::quadtree::QuadNode;
    use crate::test::{abc_entries, pair_ids};

    fn kd_tree(capacity: usize) -> KDNode<f64, char, 2> {
        let mut tree = KDNode::new_with_capacity(capacity).unwrap();
        for (point, name) in abc_entries() {
            tree.put(point, name).unwrap();
        }
        tree
    }

    #[test]
    fn abc_scenario() {
        for capacity in [1, 2, 16] {
            let tree = kd_tree(capacity);
            assert_eq!(pair_ids(&tree.find_pairs(1.5)), vec![('A', 'B')]);
            assert!(tree.find_pairs(0.5).is_empty());
            assert_eq!(
                pair_ids(&tree.find_pairs(10.)),
                vec![('A', 'B'), ('A', 'C'), ('B', 'C')]
            );
        }
    }

    #[test]
    fn abc_scenario_quadtree() {
        let region = crate::geometry::BoundingBox::new([-8., -8.], [8., 8.]);
        let mut tree = QuadNode::new_with_capacity(region, 1, 8).unwrap();
        for (point, name) in abc_entries() {
            tree.put(point, name).unwrap();
        }
        assert!(tree.is_parent());
        assert_eq!(pair_ids(&tree.find_pairs(1.5)), vec![('A', 'B')]);
        assert!(tree.find_pairs(0.5).is_empty());
        assert_eq!(pair_ids(&tree.find_pairs(10.)).len(), 3);
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let tree = kd_tree(1);
        assert_eq!(pair_ids(&tree.find_pairs(1.)), vec![('A', 'B')]);
    }

    #[test]
    fn empty_tree() {
        let tree = KDNode::<f64, usize, 2>::new();
        assert!(tree.find_pairs(0.).is_empty());
        assert!(tree.find_pairs(f64::INFINITY).is_empty());
    }

    #[test]
    fn single_entry() {
        let mut tree = KDNode::<f64, usize, 2>::new();
        tree.put(Coord::xy(3., 3.), 0).unwrap();
        assert!(tree.find_pairs(0.).is_empty());
        assert!(tree.find_pairs(100.).is_empty());
    }

    #[test]
    fn duplicate_coordinates_pair_at_zero() {
        for capacity in [1, 4] {
            let mut tree = KDNode::<f64, usize, 2>::new_with_capacity(capacity).unwrap();
            tree.put(Coord::xy(1., 1.), 0).unwrap();
            tree.put(Coord::xy(1., 1.), 1).unwrap();
            tree.put(Coord::xy(1., 1.), 2).unwrap();
            tree.put(Coord::xy(2., 2.), 3).unwrap();

            let pairs = tree.find_pairs(0.);
            assert_eq!(pair_ids(&pairs), vec![(0, 1), (0, 2), (1, 2)]);
            assert!(pairs.iter().all(|p| !p.is_self_pair()));
        }
    }

    #[test]
    fn invalid_thresholds() {
        let tree = kd_tree(1);
        assert!(tree.find_pairs(-1.).is_empty());
        assert!(tree.find_pairs(f64::NAN).is_empty());
        assert_eq!(tree.find_pairs(f64::INFINITY).len(), 3);
    }

    #[test]
    fn stats_reflect_pruning() {
        let tree = kd_tree(1);
        let (pairs, stats) = tree.find_pairs_with_stats(1.5);
        assert_eq!(stats.pairs_found, pairs.len());
        assert!(stats.node_pairs_pruned > 0);
        // A and B are the only points close enough to be compared.
        assert_eq!(stats.point_comparisons, 1);

        let (_, stats) = tree.find_pairs_with_stats(-1.);
        assert_eq!(stats, QueryStats::default());
    }

    #[test]
    fn for_each_pair_matches_find_pairs() {
        let tree = kd_tree(2);
        let mut seen = vec![];
        let stats = for_each_pair(&tree, 10., |pair| seen.push(pair));
        assert_eq!(stats.pairs_found, 3);
        assert_eq!(pair_ids(&seen), pair_ids(&tree.find_pairs(10.)));
    }
}
