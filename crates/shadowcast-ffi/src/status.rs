//! Status codes returned across the C boundary.

use shadowcast_kernel_buffer::BufferError;
use shadowcast_kernel_silhouette::SilhouetteError;

/// Result of a call. Zero and positive values carry a usable result;
/// negative values are failures, with outputs left null or zero.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Success.
    Ok = 0,
    /// The triangles do not touch; the output line is the NaN sentinel.
    NoIntersection = 1,
    /// An input triangle has zero area; the output line is the NaN sentinel.
    DegenerateTriangle = 2,
    /// The triangles are coplanar; the output is the longest chord of their
    /// overlap.
    Coplanar = 3,
    /// Edges shared by more than two triangles were reported as silhouette
    /// edges; the output is otherwise complete.
    NonManifoldWarning = 4,
    /// A required pointer was null.
    NullPointer = -1,
    /// The index count is not a multiple of three.
    InvalidIndexCount = -2,
    /// An index points past the vertex buffer.
    IndexOutOfRange = -3,
    /// The result buffer could not be allocated.
    AllocationFailed = -4,
    /// The kernel panicked; the panic was contained.
    Panic = -5,
}

impl Status {
    /// Whether the outputs are usable.
    pub fn is_ok(self) -> bool {
        (self as i32) >= 0
    }
}

impl From<&SilhouetteError> for Status {
    fn from(e: &SilhouetteError) -> Self {
        match e {
            SilhouetteError::IndexCountNotMultipleOfThree { .. } => Self::InvalidIndexCount,
            SilhouetteError::IndexOutOfRange { .. } => Self::IndexOutOfRange,
        }
    }
}

impl From<&BufferError> for Status {
    fn from(_: &BufferError) -> Self {
        Self::AllocationFailed
    }
}
