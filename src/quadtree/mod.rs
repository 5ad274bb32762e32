//! A 2D region quadtree with a fixed root region.

#![warn(missing_docs)]

mod node;

pub use node::{QuadNode, DEFAULT_QUADTREE_MAX_DEPTH, DEFAULT_QUADTREE_NODE_CAPACITY};
