use std::cmp::Ordering;
use std::mem::take;

use log::trace;

use crate::error::{Result, SpatialTreeError};
use crate::geometry::{BoundingBox, Coord};
use crate::node::{Entry, SpatialNode};
use crate::r#type::IndexableNum;

/// The default leaf capacity used by [`KDNode::new`]
pub const DEFAULT_KDTREE_NODE_CAPACITY: usize = 16;

/// A node of a K-D tree over `D`-dimensional points.
///
/// A leaf holds up to `capacity` entries. Inserting past that splits the leaf in two at the
/// median of its widest axis. Leaves whose entries all share one coordinate cannot be split and
/// grow past their capacity instead.
///
/// Splits alone degrade badly on ordered input, so a subtree that grows much taller than a
/// balanced tree of its size is rebuilt from its entries by median recursion. Height stays
/// logarithmic in the number of entries whatever the insertion order.
///
/// Every node stores the tight bounding box of the entries beneath it.
///
/// ```
/// use spatial_tree::geometry::Coord;
/// use spatial_tree::kdtree::KDNode;
/// use spatial_tree::SpatialNode;
///
/// let mut tree = KDNode::<f64, usize, 3>::new_with_capacity(2).unwrap();
/// tree.put(Coord::xyz(0., 0., 0.), 0).unwrap();
/// tree.put(Coord::xyz(1., 0., 0.), 1).unwrap();
/// tree.put(Coord::xyz(9., 9., 9.), 2).unwrap();
///
/// assert!(tree.is_parent());
/// assert_eq!(tree.num_items(), 3);
/// assert_eq!(tree.find_pairs(1.).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct KDNode<N: IndexableNum, T, const D: usize> {
    bound: BoundingBox<N, D>,
    capacity: usize,
    /// Entries stored in this subtree.
    len: usize,
    /// Levels in this subtree, 1 for a leaf.
    height: usize,
    contents: Contents<N, T, D>,
}

#[derive(Debug, Clone)]
enum Contents<N: IndexableNum, T, const D: usize> {
    Leaf(Vec<Entry<Coord<N, D>, T>>),
    Internal {
        axis: usize,
        split: N,
        /// Entries below `split` along `axis` live in the first child, the rest in the second.
        children: Box<[KDNode<N, T, D>; 2]>,
    },
}

impl<N: IndexableNum, T, const D: usize> KDNode<N, T, D> {
    /// Create an empty tree with the default leaf capacity.
    pub fn new() -> Self {
        Self::empty_leaf(DEFAULT_KDTREE_NODE_CAPACITY)
    }

    /// Create an empty tree whose leaves hold up to `capacity` entries before splitting.
    pub fn new_with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SpatialTreeError::InvalidCapacity(capacity));
        }
        Ok(Self::empty_leaf(capacity))
    }

    fn empty_leaf(capacity: usize) -> Self {
        Self {
            bound: BoundingBox::empty(),
            capacity,
            len: 0,
            height: 1,
            contents: Contents::Leaf(vec![]),
        }
    }

    fn leaf(capacity: usize, entries: Vec<Entry<Coord<N, D>, T>>) -> Self {
        let mut bound = BoundingBox::empty();
        for (point, _) in &entries {
            bound.expand_to_coord(point);
        }

        let mut node = Self {
            bound,
            capacity,
            len: entries.len(),
            height: 1,
            contents: Contents::Leaf(entries),
        };
        if node.entries().len() > capacity {
            node.split();
        }
        node
    }

    /// The maximum number of entries a leaf holds before it splits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The axis and coordinate this node divides its children at, or `None` for a leaf.
    pub fn split_plane(&self) -> Option<(usize, N)> {
        match &self.contents {
            Contents::Leaf(_) => None,
            Contents::Internal { axis, split, .. } => Some((*axis, *split)),
        }
    }

    fn insert(&mut self, point: Coord<N, D>, payload: T) {
        self.bound.expand_to_coord(&point);
        self.len += 1;

        let overflowing = match &mut self.contents {
            Contents::Leaf(entries) => {
                entries.push((point, payload));
                entries.len() > self.capacity
            }
            Contents::Internal {
                axis,
                split,
                children,
            } => {
                let side = usize::from(point.get(*axis) >= *split);
                children[side].insert(point, payload);
                self.height = 1 + children[0].height.max(children[1].height);
                false
            }
        };

        if overflowing {
            self.split();
        } else if self.height > height_limit(self.len, self.capacity) {
            self.rebuild();
        }
    }

    /// Rebuild this subtree from scratch, splitting every overflowing leaf at its median.
    fn rebuild(&mut self) {
        trace!(
            "Rebuilding subtree of height {} holding {} entries",
            self.height,
            self.len
        );
        let mut entries = Vec::with_capacity(self.len);
        self.drain_into(&mut entries);
        *self = Self::leaf(self.capacity, entries);
    }

    fn drain_into(&mut self, out: &mut Vec<Entry<Coord<N, D>, T>>) {
        match &mut self.contents {
            Contents::Leaf(entries) => out.append(entries),
            Contents::Internal { children, .. } => {
                for child in children.iter_mut() {
                    child.drain_into(out);
                }
            }
        }
    }

    /// Turn this leaf into an internal node with two leaf children.
    fn split(&mut self) {
        let axis = self.bound.widest_axis();
        if self.bound.extent(axis) <= N::zero() {
            trace!(
                "Not splitting leaf of {} entries sharing one coordinate",
                self.entries().len()
            );
            return;
        }

        let Contents::Leaf(entries) = &mut self.contents else {
            return;
        };
        let mut lower = take(entries);

        // Coordinates are finite, so the comparison is total
        lower.sort_by(|a, b| {
            a.0.get(axis)
                .partial_cmp(&b.0.get(axis))
                .unwrap_or(Ordering::Equal)
        });

        let mut split = lower[lower.len() / 2].0.get(axis);
        if lower[0].0.get(axis) == split {
            // Everything below the median equals it. Split just above it instead so that
            // neither side is empty.
            if let Some(next) = lower.iter().map(|e| e.0.get(axis)).find(|v| *v > split) {
                split = next;
            }
        }

        let upper = lower.split_off(lower.partition_point(|e| e.0.get(axis) < split));
        trace!(
            "Splitting leaf on axis {} at {:?} into {} and {} entries",
            axis,
            split,
            lower.len(),
            upper.len()
        );

        let children = Box::new([
            Self::leaf(self.capacity, lower),
            Self::leaf(self.capacity, upper),
        ]);
        self.height = 1 + children[0].height.max(children[1].height);
        self.contents = Contents::Internal {
            axis,
            split,
            children,
        };
    }
}

/// The height a subtree of `len` entries may reach before it is rebuilt: twice the height of a
/// perfectly balanced tree, plus slack for leaves that hold coincident points.
fn height_limit(len: usize, capacity: usize) -> usize {
    let leaves = len.div_ceil(capacity).max(1);
    let balanced = (usize::BITS - (leaves - 1).leading_zeros()) as usize + 1;
    2 * balanced + 2
}

impl<N: IndexableNum, T, const D: usize> Default for KDNode<N, T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: IndexableNum, T, const D: usize> SpatialNode for KDNode<N, T, D> {
    type Point = Coord<N, D>;
    type Bound = BoundingBox<N, D>;
    type Payload = T;

    fn bound(&self) -> &BoundingBox<N, D> {
        &self.bound
    }

    fn is_leaf(&self) -> bool {
        matches!(self.contents, Contents::Leaf(_))
    }

    fn entries(&self) -> &[Entry<Coord<N, D>, T>] {
        match &self.contents {
            Contents::Leaf(entries) => entries,
            Contents::Internal { .. } => &[],
        }
    }

    fn children(&self) -> &[Self] {
        match &self.contents {
            Contents::Leaf(_) => &[],
            Contents::Internal { children, .. } => children.as_slice(),
        }
    }

    fn put(&mut self, point: Coord<N, D>, payload: T) -> Result<()> {
        if !point.is_finite() {
            return Err(SpatialTreeError::NonFiniteCoordinate(format!(
                "{:?}",
                point.as_array()
            )));
        }
        self.insert(point, payload);
        Ok(())
    }
}
