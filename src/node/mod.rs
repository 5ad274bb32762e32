//! The contract every tree variant exposes to the pair enumerators.

mod r#trait;

pub use r#trait::{Entry, NodeNum, SpatialNode};
