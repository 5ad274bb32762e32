use std::collections::HashSet;

use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::geometry::{BoundingBox, Coord};
use crate::kdtree::KDNode;
use crate::pairs::{brute_force_pairs, NeighborPair};
use crate::quadtree::QuadNode;
use crate::test::{pair_ids, random_entries, TestNode};
use crate::{IndexableNum, SpatialNode};

const DISTANCES: [f64; 6] = [0., 0.3, 1., 2.5, 8., 100.];

fn kd_tree(entries: &[(Coord<f64, 2>, usize)], capacity: usize) -> KDNode<f64, usize, 2> {
    let mut tree = KDNode::new_with_capacity(capacity).unwrap();
    for (point, id) in entries {
        tree.put(*point, *id).unwrap();
    }
    tree
}

fn quad_tree(entries: &[(Coord<f64, 2>, usize)], capacity: usize) -> QuadNode<f64, usize> {
    let region = BoundingBox::new([0., 0.], [50., 50.]);
    let mut tree = QuadNode::new_with_capacity(region, capacity, 12).unwrap();
    for (point, id) in entries {
        tree.put(*point, *id).unwrap();
    }
    tree
}

fn assert_well_formed(pairs: &[NeighborPair<'_, Coord<f64, 2>, usize>]) {
    assert!(pairs.iter().all(|pair| !pair.is_self_pair()));
    let ids = pair_ids(pairs);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "pair emitted twice");
}

// Find pairs using rstar's radius query around every point
fn rstar_pairs(entries: &[(Coord<f64, 2>, usize)], distance: f64) -> Vec<(usize, usize)> {
    let tree = RTree::bulk_load(
        entries
            .iter()
            .map(|(point, id)| GeomWithData::new(*point.as_array(), *id))
            .collect(),
    );

    let mut ids = vec![];
    for (point, id) in entries {
        for other in tree.locate_within_distance(*point.as_array(), distance * distance) {
            if *id < other.data {
                ids.push((*id, other.data));
            }
        }
    }
    ids.sort();
    ids
}

#[test]
fn every_shape_matches_brute_force() {
    for (num_items, seed) in [(0, 1), (1, 2), (2, 3), (60, 4), (350, 5)] {
        let entries = random_entries(num_items, seed);

        let trees = [
            kd_tree(&entries, 1),
            kd_tree(&entries, 7),
            kd_tree(&entries, 10_000),
        ];
        let quad = quad_tree(&entries, 3);
        let chain = TestNode::chain(&entries);
        let grouped = TestNode::grouped(&entries, 20);

        for distance in DISTANCES {
            let expected = pair_ids(&brute_force_pairs(&entries, distance));

            for tree in &trees {
                let pairs = tree.find_pairs(distance);
                assert_well_formed(&pairs);
                assert_eq!(pair_ids(&pairs), expected);
            }
            for pairs in [
                quad.find_pairs(distance),
                chain.find_pairs(distance),
                grouped.find_pairs(distance),
            ] {
                assert_well_formed(&pairs);
                assert_eq!(pair_ids(&pairs), expected, "distance {}", distance);
            }
        }
    }
}

#[test]
fn matches_rstar() {
    let entries = random_entries(1000, 17);
    let tree = kd_tree(&entries, 8);

    for distance in [0.5, 1.5, 4.] {
        assert_eq!(
            pair_ids(&tree.find_pairs(distance)),
            rstar_pairs(&entries, distance),
            "The two neighbor pair sets should match!"
        );
    }
}

#[test]
fn threshold_monotonicity() {
    let entries = random_entries(300, 23);
    let tree = quad_tree(&entries, 4);

    let mut previous: HashSet<(usize, usize)> = HashSet::new();
    for distance in DISTANCES {
        let current: HashSet<_> = pair_ids(&tree.find_pairs(distance)).into_iter().collect();
        assert!(previous.is_subset(&current));
        previous = current;
    }
    assert_eq!(previous.len(), 300 * 299 / 2);
}

#[test]
fn leaf_paired_with_internal_node() {
    // The root's first child is a leaf while its second is internal, so the traversal pairs a
    // leaf against the children of an internal node.
    let entries = random_entries(40, 29);
    let tree = TestNode::internal(vec![
        TestNode::leaf(entries[..10].to_vec()),
        TestNode::grouped(&entries[10..], 3),
    ]);

    for distance in DISTANCES {
        assert_eq!(
            pair_ids(&tree.find_pairs(distance)),
            pair_ids(&brute_force_pairs(&entries, distance))
        );
    }
}

#[test]
fn identical_leaves_are_not_the_same_node() {
    let entries = vec![(Coord::xy(1., 1.), 0), (Coord::xy(1., 2.), 1)];
    let tree = TestNode::internal(vec![
        TestNode::leaf(entries.clone()),
        TestNode::leaf(entries.iter().map(|(p, id)| (*p, id + 2)).collect()),
    ]);

    // Each leaf pairs with itself once and with its twin four times.
    let pairs = tree.find_pairs(1.);
    assert_eq!(
        pair_ids(&pairs),
        vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
    );
}

#[test]
fn bound_that_misses_its_contents_loses_pairs() {
    let near = vec![(Coord::xy(0., 0.), 0), (Coord::xy(0.5, 0.), 1)];
    let far = vec![(Coord::xy(0.9, 0.), 2)];
    let correct = TestNode::internal(vec![
        TestNode::leaf(near.clone()),
        TestNode::leaf(far.clone()),
    ]);
    assert_eq!(pair_ids(&correct.find_pairs(1.)).len(), 3);

    let misplaced = BoundingBox::new([30., 30.], [31., 31.]);
    let broken = TestNode::internal(vec![
        TestNode::leaf(near),
        TestNode::leaf(far).with_bound(misplaced),
    ]);
    assert_eq!(pair_ids(&broken.find_pairs(1.)), vec![(0, 1)]);
}

#[test]
fn put_through_the_trait() {
    fn fill<S: SpatialNode<Point = Coord<f64, 2>, Payload = usize>>(mut tree: S) -> usize {
        for (point, id) in random_entries(100, 31) {
            tree.put(point, id).unwrap();
        }
        assert_eq!(tree.num_items(), 100);
        tree.find_pairs(3.).len()
    }

    let expected = brute_force_pairs(&random_entries(100, 31), 3.).len();
    assert_eq!(fill(KDNode::<f64, usize, 2>::new()), expected);
    assert_eq!(
        fill(QuadNode::new(BoundingBox::new([0., 0.], [50., 50.])).unwrap()),
        expected
    );
    assert_eq!(fill(TestNode::grouped(&[], 1)), expected);
}

// Pair counts from a single leaf, a fully split tree, the iterator and brute force
fn counts_by_shape<N: IndexableNum>(entries: &[(Coord<N, 2>, usize)], distance: N) -> [usize; 4] {
    let mut one_leaf = KDNode::<N, usize, 2>::new();
    let mut split = KDNode::<N, usize, 2>::new_with_capacity(1).unwrap();
    for (point, id) in entries {
        one_leaf.put(*point, *id).unwrap();
        split.put(*point, *id).unwrap();
    }
    assert!(split.is_parent());
    [
        one_leaf.find_pairs(distance).len(),
        split.find_pairs(distance).len(),
        split.neighbor_pairs(distance).count(),
        brute_force_pairs(entries, distance).len(),
    ]
}

#[test]
fn squared_distances_out_of_float_range() {
    let far = vec![(Coord::xy(0., 0.), 0), (Coord::xy(1e300, 0.), 1)];
    assert_eq!(counts_by_shape(&far, 1e200), [0; 4]);
    assert_eq!(counts_by_shape(&far, 1e300), [1; 4]);
    assert_eq!(counts_by_shape(&far, 2e300), [1; 4]);
    assert_eq!(counts_by_shape(&far, f64::INFINITY), [1; 4]);

    let close = vec![(Coord::xy(0., 0.), 0), (Coord::xy(3e-200, 0.), 1)];
    assert_eq!(counts_by_shape(&close, 1e-200), [0; 4]);
    assert_eq!(counts_by_shape(&close, 3e-200), [1; 4]);
    assert_eq!(counts_by_shape(&close, 5e-200), [1; 4]);
    assert_eq!(counts_by_shape(&close, 0.), [0; 4]);

    let far_f32 = vec![(Coord::xy(0.0f32, 0.), 0), (Coord::xy(1e20f32, 0.), 1)];
    assert_eq!(counts_by_shape(&far_f32, 2e19), [0; 4]);
    assert_eq!(counts_by_shape(&far_f32, 2e20), [1; 4]);
}
