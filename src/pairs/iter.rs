use std::ptr;

use crate::node::{Entry, NodeNum, SpatialNode};
use crate::pairs::traversal::{child_list, Threshold};
use crate::pairs::NeighborPair;

/// An iterator over the neighbor pairs of a tree, created by
/// [`SpatialNode::neighbor_pairs`].
///
/// This walks the same node pairs as [`find_pairs`][crate::pairs::find_pairs] but keeps its
/// pending work in an explicit list, so results are produced one at a time and iteration can
/// stop early.
pub struct NeighborPairs<'a, S: SpatialNode> {
    threshold: Option<Threshold<NodeNum<S>>>,
    todo_list: Vec<(&'a S, &'a S)>,
    scan: Option<LeafScan<'a, S::Point, S::Payload>>,
}

impl<'a, S: SpatialNode> NeighborPairs<'a, S> {
    pub(crate) fn new(root: &'a S, distance: NodeNum<S>) -> Self {
        let threshold = Threshold::new(distance);
        let todo_list = if threshold.is_some() {
            vec![(root, root)]
        } else {
            vec![]
        };
        Self {
            threshold,
            todo_list,
            scan: None,
        }
    }

    fn push_unpruned_children(&mut self, threshold: &Threshold<NodeNum<S>>, a: &'a S, b: &'a S) {
        let same = ptr::eq(a, b);
        let left_children = child_list(a);
        let right_children = child_list(b);

        for (i, left) in left_children.iter().enumerate() {
            let start = if same { i } else { 0 };
            for right in &right_children[start..] {
                if !threshold.prunes(left.bound(), right.bound()) {
                    self.todo_list.push((left, right));
                }
            }
        }
    }
}

/// Cursor over the candidate entry pairs of two leaves.
struct LeafScan<'a, P, T> {
    left: &'a [Entry<P, T>],
    right: &'a [Entry<P, T>],
    same: bool,
    i: usize,
    j: usize,
}

impl<'a, P, T> LeafScan<'a, P, T> {
    fn new(left: &'a [Entry<P, T>], right: &'a [Entry<P, T>], same: bool) -> Self {
        Self {
            left,
            right,
            same,
            i: 0,
            j: usize::from(same),
        }
    }

    fn next_candidate(&mut self) -> Option<(&'a Entry<P, T>, &'a Entry<P, T>)> {
        let (left, right) = (self.left, self.right);
        while self.i < left.len() {
            if self.j < right.len() {
                let candidate = (&left[self.i], &right[self.j]);
                self.j += 1;
                return Some(candidate);
            }
            self.i += 1;
            self.j = if self.same { self.i + 1 } else { 0 };
        }
        None
    }
}

impl<'a, S: SpatialNode> Iterator for NeighborPairs<'a, S> {
    type Item = NeighborPair<'a, S::Point, S::Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        let threshold = self.threshold?;
        loop {
            if let Some(scan) = &mut self.scan {
                while let Some((left, right)) = scan.next_candidate() {
                    if threshold.accepts(&left.0, &right.0) {
                        return Some(NeighborPair::new(left, right));
                    }
                }
                self.scan = None;
            }

            let (a, b) = self.todo_list.pop()?;
            if a.is_leaf() && b.is_leaf() {
                self.scan = Some(LeafScan::new(a.entries(), b.entries(), ptr::eq(a, b)));
            } else {
                self.push_unpruned_children(&threshold, a, b);
            }
        }
    }
}
