#![doc = include_str!("../README.md")]

mod error;
pub mod geometry;
pub mod kdtree;
pub mod node;
pub mod pairs;
pub mod quadtree;
mod r#type;

pub use error::SpatialTreeError;
pub use node::SpatialNode;
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
