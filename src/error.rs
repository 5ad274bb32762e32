use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum SpatialTreeError {
    /// A node was configured to hold zero entries per leaf.
    #[error("Node capacity must be at least 1, got {0}.")]
    InvalidCapacity(usize),

    /// A coordinate passed to `put` was NaN or infinite.
    #[error("Coordinate is not finite: {0}")]
    NonFiniteCoordinate(String),

    /// A bounding box was given a minimum larger than its maximum along some axis.
    #[error("Box minimum exceeds its maximum: {0}")]
    InvertedBounds(String),

    /// A point passed to `put` lies outside the fixed region of the node.
    #[error("Point {point} lies outside the region {region}.")]
    OutOfRegion { point: String, region: String },
}

pub type Result<T> = std::result::Result<T, SpatialTreeError>;
