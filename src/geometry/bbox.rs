use geo_traits::{
    GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection, UnimplementedLine,
    UnimplementedLineString, UnimplementedMultiLineString, UnimplementedMultiPoint,
    UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon, UnimplementedTriangle,
};

use crate::error::{Result, SpatialTreeError};
use crate::geometry::{euclidean_norm_lower_bound, BoundTrait, Coord};
use crate::r#type::IndexableNum;

/// An axis-aligned bounding box in `D` dimensions.
///
/// A box may be empty, meaning it contains no points at all. The empty box is stored with every
/// minimum at `+inf` and every maximum at `-inf`, so expanding it by a point yields exactly that
/// point and its [distance][BoundTrait::distance] to any other box is `+inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<N: IndexableNum, const D: usize> {
    min: [N; D],
    max: [N; D],
}

impl<N: IndexableNum, const D: usize> BoundingBox<N, D> {
    /// Create a box from its corners. Every component of `min` must be `<=` the matching
    /// component of `max`. Use [`BoundingBox::try_new`] to validate corners that come from
    /// untrusted input.
    pub fn new(min: [N; D], max: [N; D]) -> Self {
        debug_assert!(min
            .iter()
            .zip(max.iter())
            .all(|(lo, hi)| lo <= hi || lo.is_nan() || hi.is_nan()));
        Self { min, max }
    }

    /// Create a box from its corners, checking that every component is finite and that `min`
    /// does not exceed `max` along any axis.
    pub fn try_new(min: [N; D], max: [N; D]) -> Result<Self> {
        if min.iter().chain(max.iter()).any(|c| !c.is_finite()) {
            return Err(SpatialTreeError::NonFiniteCoordinate(format!(
                "{:?} to {:?}",
                min, max
            )));
        }
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo > hi) {
            return Err(SpatialTreeError::InvertedBounds(format!(
                "{:?} to {:?}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// The box containing no points.
    pub fn empty() -> Self {
        Self {
            min: [N::infinity(); D],
            max: [N::neg_infinity(); D],
        }
    }

    /// The degenerate box containing exactly one point.
    pub fn from_coord(coord: &Coord<N, D>) -> Self {
        Self {
            min: *coord.as_array(),
            max: *coord.as_array(),
        }
    }

    /// Returns `true` if this box contains no points.
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(lo, hi)| lo > hi)
    }

    /// The corner with the smallest value along every axis.
    pub fn lower(&self) -> Coord<N, D> {
        Coord::new(self.min)
    }

    /// The corner with the largest value along every axis.
    pub fn upper(&self) -> Coord<N, D> {
        Coord::new(self.max)
    }

    /// The midpoint of the box.
    pub fn center(&self) -> Coord<N, D> {
        let two = N::one() + N::one();
        let mut center = self.min;
        for (c, hi) in center.iter_mut().zip(self.max.iter()) {
            *c = (*c + *hi) / two;
        }
        Coord::new(center)
    }

    /// The length of the box along `axis`.
    pub fn extent(&self, axis: usize) -> N {
        self.max[axis] - self.min[axis]
    }

    /// The axis along which the box is longest. Ties resolve to the lowest axis.
    pub fn widest_axis(&self) -> usize {
        let mut best = 0;
        for axis in 1..D {
            if self.extent(axis) > self.extent(best) {
                best = axis;
            }
        }
        best
    }

    /// Returns `true` if the point lies inside the box or on its boundary.
    pub fn contains_coord(&self, coord: &Coord<N, D>) -> bool {
        (0..D).all(|axis| {
            let c = coord.get(axis);
            self.min[axis] <= c && c <= self.max[axis]
        })
    }

    /// Grow the box so that it contains `coord`.
    pub fn expand_to_coord(&mut self, coord: &Coord<N, D>) {
        for axis in 0..D {
            let c = coord.get(axis);
            if c < self.min[axis] {
                self.min[axis] = c;
            }
            if c > self.max[axis] {
                self.max[axis] = c;
            }
        }
    }

    /// Grow the box so that it contains `other`.
    pub fn expand_to_bbox(&mut self, other: &Self) {
        for axis in 0..D {
            if other.min[axis] < self.min[axis] {
                self.min[axis] = other.min[axis];
            }
            if other.max[axis] > self.max[axis] {
                self.max[axis] = other.max[axis];
            }
        }
    }
}

impl<N: IndexableNum, const D: usize> BoundTrait for BoundingBox<N, D> {
    type Num = N;

    fn distance(&self, other: &Self) -> N {
        let mut gaps = [N::zero(); D];
        for (axis, gap) in gaps.iter_mut().enumerate() {
            *gap = axis_gap(
                self.min[axis],
                self.max[axis],
                other.min[axis],
                other.max[axis],
            );
        }
        euclidean_norm_lower_bound(&gaps)
    }
}

/// 1D distance between two ranges, zero when they overlap.
#[inline]
fn axis_gap<N: IndexableNum>(min1: N, max1: N, min2: N, max2: N) -> N {
    if max1 < min2 {
        min2 - max1
    } else if max2 < min1 {
        min1 - max2
    } else {
        N::zero()
    }
}

impl<N: IndexableNum> GeometryTrait for BoundingBox<N, 2> {
    type T = N;
    type PointType<'b>
        = UnimplementedPoint<N>
    where
        Self: 'b;
    type LineStringType<'b>
        = UnimplementedLineString<N>
    where
        Self: 'b;
    type PolygonType<'b>
        = UnimplementedPolygon<N>
    where
        Self: 'b;
    type MultiPointType<'b>
        = UnimplementedMultiPoint<N>
    where
        Self: 'b;
    type MultiLineStringType<'b>
        = UnimplementedMultiLineString<N>
    where
        Self: 'b;
    type MultiPolygonType<'b>
        = UnimplementedMultiPolygon<N>
    where
        Self: 'b;
    type GeometryCollectionType<'b>
        = UnimplementedGeometryCollection<N>
    where
        Self: 'b;
    type RectType<'b>
        = BoundingBox<N, 2>
    where
        Self: 'b;
    type TriangleType<'b>
        = UnimplementedTriangle<N>
    where
        Self: 'b;
    type LineType<'b>
        = UnimplementedLine<N>
    where
        Self: 'b;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<N>,
        UnimplementedLineString<N>,
        UnimplementedPolygon<N>,
        UnimplementedMultiPoint<N>,
        UnimplementedMultiLineString<N>,
        UnimplementedMultiPolygon<N>,
        UnimplementedGeometryCollection<N>,
        BoundingBox<N, 2>,
        UnimplementedTriangle<N>,
        UnimplementedLine<N>,
    > {
        GeometryType::Rect(self)
    }
}

impl<N: IndexableNum> RectTrait for BoundingBox<N, 2> {
    type CoordType<'a>
        = Coord<N, 2>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        self.lower()
    }

    fn max(&self) -> Self::CoordType<'_> {
        self.upper()
    }
}
