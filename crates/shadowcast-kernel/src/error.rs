//! Error types for the kernel facade.

use shadowcast_kernel_silhouette::SilhouetteError;
use thiserror::Error;

use crate::registry::CasterId;

/// Errors raised by [`CasterRegistry`](crate::CasterRegistry) operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The id was never issued by this registry or has been removed.
    #[error("unknown caster {0:?}")]
    UnknownCaster(CasterId),

    /// The caster has no triangles to query.
    #[error("caster {0:?} has no triangles")]
    EmptyMesh(CasterId),

    /// The caster's mesh is malformed.
    #[error("invalid caster mesh: {0}")]
    Mesh(#[from] SilhouetteError),
}

/// Result type for kernel facade operations.
pub type Result<T> = std::result::Result<T, KernelError>;
