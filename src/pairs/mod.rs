//! Fixed-radius neighbor pair enumeration over any [`SpatialNode`][crate::SpatialNode]
//! hierarchy.
//!
//! Every enumerator here returns each unordered pair of distinct stored entries whose distance
//! is at most the query threshold exactly once. A pair is identified by the entries it borrows,
//! not by their coordinates, so two entries at the same location still form a pair.
//!
//! The order of the returned pairs is unspecified and differs between enumerators and tree
//! shapes. Sort the results if a canonical order is needed.

mod brute;
mod iter;
mod pair;
#[cfg(feature = "rayon")]
mod parallel;
mod traversal;

pub use brute::brute_force_pairs;
pub use iter::NeighborPairs;
pub use pair::NeighborPair;
#[cfg(feature = "rayon")]
pub use parallel::par_find_pairs;
pub use traversal::{find_pairs, find_pairs_with_stats, for_each_pair, QueryStats};
