use num_traits::Float;
use crate::r#type::IndexableNum;

/// A point in a metric space.
pub trait PointTrait: Copy {
    /// The scalar type of coordinates and distances.
    type Num: IndexableNum;

    /// The squared Euclidean distance to another point.
    fn sqdist(&self, other: &Self) -> Self::Num;

    /// The linear Euclidean distance to another point.
    ///
    /// Used instead of [`PointTrait::sqdist`] when the squared query distance is not a normal
    /// float. Implementations should stay accurate where squaring would overflow or underflow.
    fn distance(&self, other: &Self) -> Self::Num {
        self.sqdist(other).sqrt()
    }
}

/// A bounding volume summarizing the extent of everything stored beneath a node.
///
/// Implementations must satisfy two contracts that the pair enumerators rely on but never check:
///
/// - every point stored under a node lies within that node's bound, and
/// - [`BoundTrait::distance`] never overestimates the minimum distance between a point in `self`
///   and a point in `other`.
///
/// A bound violating either contract silently drops pairs from query results.
pub trait BoundTrait {
    /// The scalar type of distances.
    type Num: IndexableNum;

    /// A lower bound on the linear (not squared) distance between the two regions.
    fn distance(&self, other: &Self) -> Self::Num;
}
