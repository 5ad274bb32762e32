use crate::geometry::PointTrait;
use crate::node::Entry;
use crate::pairs::traversal::Threshold;
use crate::pairs::NeighborPair;

/// Compare every entry against every other entry.
///
/// This is the O(n²) reference the tree enumerators must agree with. It is also faster than
/// building a tree when there are only a handful of entries.
pub fn brute_force_pairs<P: PointTrait, T>(
    entries: &[Entry<P, T>],
    distance: P::Num,
) -> Vec<NeighborPair<'_, P, T>> {
    let Some(threshold) = Threshold::new(distance) else {
        return vec![];
    };

    let mut result = vec![];
    for (i, left) in entries.iter().enumerate() {
        for right in &entries[i + 1..] {
            if threshold.accepts(&left.0, &right.0) {
                result.push(NeighborPair::new(left, right));
            }
        }
    }
    result
}
