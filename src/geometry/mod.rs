//! Geometry primitives consumed by the node contract.
//!
//! The enumerators only ever see points through [`PointTrait`] and bounding volumes through
//! [`BoundTrait`]. [`Coord`] and [`BoundingBox`] are the axis-aligned implementations used by the
//! trees in this crate.

mod bbox;
mod coord;
mod norm;
mod r#trait;

pub use bbox::BoundingBox;
pub use coord::Coord;
pub(crate) use norm::{euclidean_norm, euclidean_norm_lower_bound};
pub use r#trait::{BoundTrait, PointTrait};
