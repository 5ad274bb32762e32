use std::mem::take;

use geo_traits::CoordTrait;
use log::trace;

use crate::error::{Result, SpatialTreeError};
use crate::geometry::{BoundingBox, Coord};
use crate::node::{Entry, SpatialNode};
use crate::r#type::IndexableNum;

/// The default leaf capacity used by [`QuadNode::new`]
pub const DEFAULT_QUADTREE_NODE_CAPACITY: usize = 16;

/// The default number of times [`QuadNode::new`] allows its region to be subdivided
pub const DEFAULT_QUADTREE_MAX_DEPTH: usize = 16;

/// A node of a region quadtree.
///
/// Each node covers a fixed square-ish region. A leaf holding more than `capacity` entries
/// subdivides its region into four equal quadrants, until `max_depth` subdivisions have been made
/// below the root. Points outside the root region are rejected.
///
/// The [bound][SpatialNode::bound] of a node is the tight box around its entries, not its region,
/// so empty quadrants never take part in a query.
#[derive(Debug, Clone)]
pub struct QuadNode<N: IndexableNum, T> {
    region: BoundingBox<N, 2>,
    bound: BoundingBox<N, 2>,
    capacity: usize,
    /// How many more times this node may subdivide.
    depth_remaining: usize,
    entries: Vec<Entry<Coord<N, 2>, T>>,
    /// South-west, south-east, north-west, north-east.
    children: Option<Box<[QuadNode<N, T>; 4]>>,
}

impl<N: IndexableNum, T> QuadNode<N, T> {
    /// Create an empty tree covering `region` with the default capacity and maximum depth.
    pub fn new(region: BoundingBox<N, 2>) -> Result<Self> {
        Self::new_with_capacity(
            region,
            DEFAULT_QUADTREE_NODE_CAPACITY,
            DEFAULT_QUADTREE_MAX_DEPTH,
        )
    }

    /// Create an empty tree covering `region`.
    ///
    /// Leaves hold up to `capacity` entries before subdividing, and no leaf is more than
    /// `max_depth` levels below the root. Subdivision also stops once a leaf's entries all
    /// coincide or its region is too small to halve, whatever `max_depth` allows.
    pub fn new_with_capacity(
        region: BoundingBox<N, 2>,
        capacity: usize,
        max_depth: usize,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(SpatialTreeError::InvalidCapacity(capacity));
        }
        let region =
            BoundingBox::try_new(*region.lower().as_array(), *region.upper().as_array())?;
        Ok(Self::empty_leaf(region, capacity, max_depth))
    }

    fn empty_leaf(region: BoundingBox<N, 2>, capacity: usize, depth_remaining: usize) -> Self {
        Self {
            region,
            bound: BoundingBox::empty(),
            capacity,
            depth_remaining,
            entries: vec![],
            children: None,
        }
    }

    /// The fixed region this node covers.
    pub fn region(&self) -> &BoundingBox<N, 2> {
        &self.region
    }

    /// Insert a point given as any [`CoordTrait`] implementation.
    pub fn put_coord(&mut self, coord: &impl CoordTrait<T = N>, payload: T) -> Result<()> {
        self.put(Coord::from_coord(coord), payload)
    }

    fn quadrant(&self, point: &Coord<N, 2>) -> usize {
        let center = self.region.center();
        let east = point.get(0) >= center.get(0);
        let north = point.get(1) >= center.get(1);
        usize::from(east) + 2 * usize::from(north)
    }

    fn insert(&mut self, point: Coord<N, 2>, payload: T) {
        self.bound.expand_to_coord(&point);

        let quadrant = self.quadrant(&point);
        if let Some(children) = &mut self.children {
            children[quadrant].insert(point, payload);
            return;
        }

        self.entries.push((point, payload));
        if self.entries.len() > self.capacity {
            self.subdivide();
        }
    }

    fn subdivide(&mut self) {
        if self.depth_remaining == 0 {
            trace!(
                "Leaf at maximum depth holds {} entries over capacity {}",
                self.entries.len(),
                self.capacity
            );
            return;
        }
        if self.bound.extent(0) <= N::zero() && self.bound.extent(1) <= N::zero() {
            trace!(
                "Not subdividing leaf of {} entries sharing one coordinate",
                self.entries.len()
            );
            return;
        }

        let lower = self.region.lower();
        let upper = self.region.upper();
        let center = self.region.center();
        let (min_x, min_y) = (lower.get(0), lower.get(1));
        let (max_x, max_y) = (upper.get(0), upper.get(1));
        let (mid_x, mid_y) = (center.get(0), center.get(1));

        let splits_x = min_x < mid_x && mid_x < max_x;
        let splits_y = min_y < mid_y && mid_y < max_y;
        if !splits_x && !splits_y {
            trace!("Region {:?} is too small to subdivide", self.region);
            return;
        }

        let capacity = self.capacity;
        let depth_remaining = self.depth_remaining - 1;
        let mut children = Box::new(
            [
                BoundingBox::new([min_x, min_y], [mid_x, mid_y]),
                BoundingBox::new([mid_x, min_y], [max_x, mid_y]),
                BoundingBox::new([min_x, mid_y], [mid_x, max_y]),
                BoundingBox::new([mid_x, mid_y], [max_x, max_y]),
            ]
            .map(|region| Self::empty_leaf(region, capacity, depth_remaining)),
        );

        trace!(
            "Subdividing {:?} with {} entries",
            self.region,
            self.entries.len()
        );
        for (point, payload) in take(&mut self.entries) {
            children[self.quadrant(&point)].insert(point, payload);
        }
        self.children = Some(children);
    }
}

impl<N: IndexableNum, T> SpatialNode for QuadNode<N, T> {
    type Point = Coord<N, 2>;
    type Bound = BoundingBox<N, 2>;
    type Payload = T;

    fn bound(&self) -> &BoundingBox<N, 2> {
        &self.bound
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn entries(&self) -> &[Entry<Coord<N, 2>, T>] {
        &self.entries
    }

    fn children(&self) -> &[Self] {
        match &self.children {
            Some(children) => children.as_slice(),
            None => &[],
        }
    }

    fn put(&mut self, point: Coord<N, 2>, payload: T) -> Result<()> {
        if !point.is_finite() {
            return Err(SpatialTreeError::NonFiniteCoordinate(format!(
                "{:?}",
                point.as_array()
            )));
        }
        if !self.region.contains_coord(&point) {
            return Err(SpatialTreeError::OutOfRegion {
                point: format!("{:?}", point.as_array()),
                region: format!("{:?}", self.region),
            });
        }
        self.insert(point, payload);
        Ok(())
    }
}
