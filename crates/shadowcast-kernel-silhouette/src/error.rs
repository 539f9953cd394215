//! Error types for silhouette extraction.

use thiserror::Error;

/// Caller contract violations detected before any vertex is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SilhouetteError {
    /// The flat index list does not describe whole triangles.
    #[error("index count {count} is not a multiple of 3")]
    IndexCountNotMultipleOfThree {
        /// Number of indices supplied.
        count: usize,
    },

    /// An index points past the end of the vertex buffer.
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index value.
        index: u32,
        /// Its position in the index buffer.
        position: usize,
        /// Number of vertices supplied.
        vertex_count: usize,
    },
}

/// Result type for silhouette operations.
pub type Result<T> = std::result::Result<T, SilhouetteError>;
