use std::ptr;

use log::debug;
use rayon::prelude::*;
use tinyvec::TinyVec;

use crate::node::{NodeNum, SpatialNode};
use crate::pairs::traversal::{child_list, scan_leaves, QueryStats, Threshold};
use crate::pairs::NeighborPair;

type PairsAndStats<'a, S> = (
    Vec<NeighborPair<'a, <S as SpatialNode>::Point, <S as SpatialNode>::Payload>>,
    QueryStats,
);

/// Find neighbor pairs like [`find_pairs`][crate::pairs::find_pairs], fanning the unpruned
/// child combinations of each node pair out over the rayon thread pool.
///
/// The tree is only read, so it can be shared with other concurrent queries.
pub fn par_find_pairs<S>(
    root: &S,
    distance: NodeNum<S>,
) -> Vec<NeighborPair<'_, S::Point, S::Payload>>
where
    S: SpatialNode + Sync,
    S::Point: Sync,
    S::Payload: Sync,
{
    let Some(threshold) = Threshold::new(distance) else {
        return vec![];
    };

    let (pairs, stats) = par_dual_tree(root, root, &threshold);
    debug!(
        "Found {} pairs within {:?} in parallel: visited {} node pairs, pruned {}",
        stats.pairs_found, distance, stats.node_pairs_visited, stats.node_pairs_pruned
    );
    pairs
}

fn par_dual_tree<'a, S>(
    a: &'a S,
    b: &'a S,
    threshold: &Threshold<NodeNum<S>>,
) -> PairsAndStats<'a, S>
where
    S: SpatialNode + Sync,
    S::Point: Sync,
    S::Payload: Sync,
{
    let mut stats = QueryStats {
        node_pairs_visited: 1,
        ..Default::default()
    };

    if a.is_leaf() && b.is_leaf() {
        let mut pairs = vec![];
        scan_leaves(a, b, threshold, &mut stats, &mut |left, right| {
            pairs.push(NeighborPair::new(left, right))
        });
        return (pairs, stats);
    }

    let same = ptr::eq(a, b);
    let left_children = child_list(a);
    let right_children = child_list(b);

    // Use TinyVec to avoid heap allocations for typical fan-outs
    let mut candidates: TinyVec<[(usize, usize); 16]> = TinyVec::new();
    for (i, left) in left_children.iter().enumerate() {
        let start = if same { i } else { 0 };
        for (j, right) in right_children.iter().enumerate().skip(start) {
            if threshold.prunes(left.bound(), right.bound()) {
                stats.node_pairs_pruned += 1;
            } else {
                candidates.push((i, j));
            }
        }
    }

    let (pairs, child_stats) = candidates
        .as_slice()
        .par_iter()
        .map(|&(i, j)| par_dual_tree(&left_children[i], &right_children[j], threshold))
        .reduce(
            || (vec![], QueryStats::default()),
            |(mut pairs, mut stats), (other_pairs, other_stats)| {
                pairs.extend(other_pairs);
                stats += other_stats;
                (pairs, stats)
            },
        );
    stats += child_stats;
    (pairs, stats)
}
