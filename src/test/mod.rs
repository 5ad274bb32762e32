//! Fixtures shared by the unit tests.

mod integration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{BoundingBox, Coord};
use crate::node::SpatialNode;
use crate::pairs::NeighborPair;
use crate::r#type::IndexableNum;

pub(crate) use test_node::TestNode;

/// `A = (0, 0)`, `B = (1, 0)` and `C = (5, 5)`.
pub(crate) fn abc_entries() -> Vec<(Coord<f64, 2>, char)> {
    vec![
        (Coord::xy(0., 0.), 'A'),
        (Coord::xy(1., 0.), 'B'),
        (Coord::xy(5., 5.), 'C'),
    ]
}

/// Points spread uniformly over `[0, 50)²`, identified by their insertion index.
pub(crate) fn random_entries(num_items: usize, seed: u64) -> Vec<(Coord<f64, 2>, usize)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_items)
        .map(|id| {
            let x = rng.gen_range(0.0..50.0);
            let y = rng.gen_range(0.0..50.0);
            (Coord::xy(x, y), id)
        })
        .collect()
}

/// The payloads of each pair with the smaller one first, sorted. Duplicate pairs are kept so
/// that comparisons against a reference catch them.
pub(crate) fn pair_ids<P, T: Copy + Ord>(pairs: &[NeighborPair<'_, P, T>]) -> Vec<(T, T)> {
    let mut ids: Vec<_> = pairs
        .iter()
        .map(|pair| {
            let (a, b) = pair.payloads();
            if a <= b {
                (*a, *b)
            } else {
                (*b, *a)
            }
        })
        .collect();
    ids.sort();
    ids
}

/// Check that every node's bound contains every point stored beneath it.
pub(crate) fn assert_bounds_enclose<N, S, const D: usize>(node: &S)
where
    N: IndexableNum,
    S: SpatialNode<Point = Coord<N, D>, Bound = BoundingBox<N, D>>,
{
    let mut points = vec![];
    collect_points(node, &mut points);
    for point in &points {
        assert!(
            node.bound().contains_coord(point),
            "{:?} outside {:?}",
            point,
            node.bound()
        );
    }
    for child in node.children() {
        assert_bounds_enclose(child);
    }
}

fn collect_points<S: SpatialNode>(node: &S, points: &mut Vec<S::Point>) {
    points.extend(node.entries().iter().map(|(point, _)| *point));
    for child in node.children() {
        collect_points(child, points);
    }
}
