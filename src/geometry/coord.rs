use geo_traits::CoordTrait;

use crate::geometry::{euclidean_norm, PointTrait};
use crate::r#type::IndexableNum;

/// A point with `D` coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<N: IndexableNum, const D: usize>([N; D]);

impl<N: IndexableNum, const D: usize> Coord<N, D> {
    /// Create a coordinate from its components.
    pub fn new(coords: [N; D]) -> Self {
        Self(coords)
    }

    /// The value along `axis`.
    #[inline]
    pub fn get(&self, axis: usize) -> N {
        self.0[axis]
    }

    /// All components of this coordinate.
    pub fn as_array(&self) -> &[N; D] {
        &self.0
    }

    /// Returns `true` if no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl<N: IndexableNum> Coord<N, 2> {
    /// Create a 2D coordinate.
    pub fn xy(x: N, y: N) -> Self {
        Self([x, y])
    }

    /// Copy any [`CoordTrait`] implementation into a 2D coordinate.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        Self([coord.x(), coord.y()])
    }
}

impl<N: IndexableNum> Coord<N, 3> {
    /// Create a 3D coordinate.
    pub fn xyz(x: N, y: N, z: N) -> Self {
        Self([x, y, z])
    }
}

impl<N: IndexableNum, const D: usize> From<[N; D]> for Coord<N, D> {
    fn from(value: [N; D]) -> Self {
        Self(value)
    }
}

impl<N: IndexableNum, const D: usize> PointTrait for Coord<N, D> {
    type Num = N;

    #[inline]
    fn sqdist(&self, other: &Self) -> N {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(N::zero(), |acc, (a, b)| {
                let d = *a - *b;
                acc + d * d
            })
    }

    fn distance(&self, other: &Self) -> N {
        let mut diff = self.0;
        for (d, o) in diff.iter_mut().zip(other.0.iter()) {
            *d = *d - *o;
        }
        euclidean_norm(&diff)
    }
}

impl<N: IndexableNum> CoordTrait for Coord<N, 2> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.0[0]
    }

    fn y(&self) -> Self::T {
        self.0[1]
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.0[0],
            1 => self.0[1],
            _ => panic!("Invalid index of coord"),
        }
    }
}
