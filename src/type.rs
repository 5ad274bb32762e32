use std::fmt::Debug;

use num_traits::Float;

/// A trait for types that can be used for indexed coordinates.
///
/// Distances between bounding volumes are linear (not squared) quantities, so coordinates must
/// support `sqrt`. This trait is sealed and only implemented for `f32` and `f64`.
pub trait IndexableNum: private::Sealed + Float + Debug + Send + Sync {}

impl IndexableNum for f32 {}

impl IndexableNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
