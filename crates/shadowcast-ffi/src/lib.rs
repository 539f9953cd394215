#![warn(missing_docs)]

//! C ABI for the shadowcast kernel.
//!
//! A flat, C-linkage function surface for managed hosts:
//! - [`intersect`] / [`intersect_ex`]: triangle-triangle intersection
//! - [`extract_silhouette`]: light-relative silhouette edges of a mesh
//! - [`release_buffer`]: hand a result buffer back to the kernel
//!
//! Variable-length results are owned by the kernel until released; the host
//! never frees them with its own allocator. All structs are `#[repr(C)]` with
//! no padding (see [`types`]). Counts are `u32`. Transforms are 16 floats in
//! row-major order. No panic crosses the boundary: each entry point reports a
//! contained panic as [`Status::Panic`] (or the NaN line for [`intersect`]).
//!
//! The library installs no `tracing` subscriber; a host that links it from
//! Rust may install one.

use std::ffi::{c_char, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use shadowcast_kernel_buffer::global;
use shadowcast_kernel_intersect::{intersect_triangles, TriangleIntersection};
use shadowcast_kernel_math::{Point3, Tolerance, Transform};
use shadowcast_kernel_silhouette::{extract_silhouette as extract, Light, MeshRef, SilhouetteOptions};

mod status;
pub mod types;

pub use status::Status;
pub use types::{FfiEdge, FfiLine, FfiTriangle, FfiVec3};

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Run `f`, turning a panic into `fallback`.
fn contain<R>(entry: &'static str, fallback: R, f: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            tracing::error!(entry, %message, "panic contained at C boundary");
            fallback
        }
    }
}

/// View `len` elements at `ptr`. A zero length never dereferences `ptr`.
///
/// # Safety
/// When `len > 0` and `ptr` is non-null, `ptr` must point to `len` valid,
/// aligned elements that outlive the returned slice.
unsafe fn slice_or_empty<'a, T>(ptr: *const T, len: u32) -> Option<&'a [T]> {
    if len == 0 {
        Some(&[])
    } else if ptr.is_null() {
        None
    } else {
        // SAFETY: non-null, and the caller vouches for `len` elements.
        Some(unsafe { std::slice::from_raw_parts(ptr, len as usize) })
    }
}

fn intersect_line(a: &FfiTriangle, b: &FfiTriangle) -> (FfiLine, Status) {
    let result = intersect_triangles(&(*a).into(), &(*b).into(), &Tolerance::DEFAULT);
    match &result {
        TriangleIntersection::Segment(s) => ((*s).into(), Status::Ok),
        TriangleIntersection::Coplanar(_) => match result.as_segment() {
            Some(s) => (s.into(), Status::Coplanar),
            None => (FfiLine::nan(), Status::NoIntersection),
        },
        TriangleIntersection::Empty => (FfiLine::nan(), Status::NoIntersection),
        TriangleIntersection::Degenerate => (FfiLine::nan(), Status::DegenerateTriangle),
    }
}

/// Intersect two triangles.
///
/// Returns the segment along which they cross; a single touching point comes
/// back with `start == end`. Coplanar overlaps return the longest chord of the
/// overlap region. No intersection (including degenerate input) returns a line
/// whose endpoints are all NaN.
#[no_mangle]
pub extern "C" fn intersect(a: FfiTriangle, b: FfiTriangle) -> FfiLine {
    contain("intersect", FfiLine::nan(), || intersect_line(&a, &b).0)
}

/// Intersect two triangles, reporting why there is no segment.
///
/// Writes the same line as [`intersect`] to `out` and returns
/// [`Status::Ok`], [`Status::Coplanar`], [`Status::NoIntersection`] or
/// [`Status::DegenerateTriangle`].
///
/// # Safety
/// `out` must be null or valid for a write of one [`FfiLine`].
#[no_mangle]
pub unsafe extern "C" fn intersect_ex(a: FfiTriangle, b: FfiTriangle, out: *mut FfiLine) -> Status {
    if out.is_null() {
        return Status::NullPointer;
    }
    // SAFETY: checked non-null; the caller guarantees validity.
    unsafe { out.write(FfiLine::nan()) };
    contain("intersect_ex", Status::Panic, || {
        let (line, status) = intersect_line(&a, &b);
        // SAFETY: as above.
        unsafe { out.write(line) };
        status
    })
}

/// Compute the silhouette edges of a mesh as seen from a light.
///
/// `light` points to a world-space position, or to the direction the light
/// travels when `light_is_directional` is non-zero. `transform` points to 16 row-major
/// floats mapping local to world space. Vertices sharing a local position are
/// welded.
///
/// On success `*out_edges` receives a kernel-owned array of
/// `*out_edge_count` edges, to be freed with [`release_buffer`]; an empty
/// result is null with count 0 and needs no release. Returns
/// [`Status::NonManifoldWarning`] when edges shared by more than two triangles
/// were included. On failure the outputs are null and 0.
///
/// # Safety
/// Each pointer must be null or valid for its stated count: `vertices` for
/// `vertex_count` reads, `indices` for `index_count` reads, `transform` for
/// 16 reads, `light` for one read, and `out_edges` / `out_edge_count` for
/// one write each.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn extract_silhouette(
    vertices: *const FfiVec3,
    vertex_count: u32,
    indices: *const u32,
    index_count: u32,
    transform: *const f32,
    light: *const FfiVec3,
    light_is_directional: u32,
    out_edges: *mut *mut FfiEdge,
    out_edge_count: *mut u32,
) -> Status {
    if out_edges.is_null() || out_edge_count.is_null() {
        return Status::NullPointer;
    }
    // SAFETY: checked non-null; the caller guarantees validity.
    unsafe {
        out_edges.write(ptr::null_mut());
        out_edge_count.write(0);
    }

    contain("extract_silhouette", Status::Panic, || {
        // SAFETY: the caller guarantees the counts.
        let inputs = unsafe {
            (
                slice_or_empty(vertices, vertex_count),
                slice_or_empty(indices, index_count),
            )
        };
        let (Some(vertices), Some(indices)) = inputs else {
            return Status::NullPointer;
        };
        if transform.is_null() || light.is_null() {
            return Status::NullPointer;
        }
        // SAFETY: non-null and valid for 16 floats.
        let matrix = unsafe { transform.cast::<[f32; 16]>().read_unaligned() };
        let transform = Transform::from_row_major(&matrix);

        // SAFETY: non-null and valid for one read.
        let light_vec = unsafe { light.read_unaligned() };
        let light = if light_is_directional != 0 {
            Light::directional(light_vec.into())
        } else {
            Light::point(light_vec.into())
        };
        let local: Vec<Point3> = vertices.iter().map(|&v| v.into()).collect();
        let mesh = MeshRef::new(&local, indices);

        let silhouette = match extract(&mesh, &transform, &light, &SilhouetteOptions::default()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "silhouette query rejected");
                return Status::from(&e);
            }
        };

        let mut edges: Vec<FfiEdge> = Vec::new();
        if edges.try_reserve_exact(silhouette.len()).is_err() {
            return Status::AllocationFailed;
        }
        edges.extend(silhouette.edges.iter().map(FfiEdge::from));
        let Ok(count) = u32::try_from(edges.len()) else {
            return Status::AllocationFailed;
        };
        let buffer = match global().publish(edges) {
            Ok(b) => b,
            Err(e) => return Status::from(&e),
        };

        // SAFETY: checked non-null above.
        unsafe {
            out_edges.write(buffer.ptr);
            out_edge_count.write(count);
        }

        if silhouette.has_non_manifold() {
            Status::NonManifoldWarning
        } else {
            Status::Ok
        }
    })
}

/// Free a buffer returned by the kernel.
///
/// Null, foreign and already released pointers are ignored.
#[no_mangle]
pub extern "C" fn release_buffer(ptr: *mut c_void) {
    contain("release_buffer", (), || {
        global().release(ptr.cast_const());
    })
}

/// Number of kernel-owned buffers the host has not released yet.
#[no_mangle]
pub extern "C" fn live_buffer_count() -> u32 {
    contain("live_buffer_count", 0, || {
        u32::try_from(global().live_count()).unwrap_or(u32::MAX)
    })
}

/// Sum of `len` vectors. A layout probe for host bindings.
///
/// # Safety
/// `arr` must be null or valid for `len` reads.
#[no_mangle]
pub unsafe extern "C" fn vec_sum(arr: *const FfiVec3, len: u32) -> FfiVec3 {
    // SAFETY: the caller guarantees the count.
    let Some(items) = (unsafe { slice_or_empty(arr, len) }) else {
        return FfiVec3::default();
    };
    items.iter().fold(FfiVec3::default(), |acc, v| {
        FfiVec3::new(acc.x + v.x, acc.y + v.y, acc.z + v.z)
    })
}

/// The library version as a static NUL-terminated string.
#[no_mangle]
pub extern "C" fn shadowcast_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowcast_kernel_buffer::{BufferRegistry, ReleaseOutcome};
    use std::ffi::CStr;

    const IDENTITY: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    fn v(x: f32, y: f32, z: f32) -> FfiVec3 {
        FfiVec3::new(x, y, z)
    }

    fn cube() -> (Vec<FfiVec3>, Vec<u32>) {
        let h = 0.5;
        let vertices = vec![
            v(-h, -h, -h),
            v(h, -h, -h),
            v(h, h, -h),
            v(-h, h, -h),
            v(-h, -h, h),
            v(h, -h, h),
            v(h, h, h),
            v(-h, h, h),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1,  0, 3, 2,
            4, 5, 6,  4, 6, 7,
            0, 1, 5,  0, 5, 4,
            3, 7, 6,  3, 6, 2,
            0, 4, 7,  0, 7, 3,
            1, 2, 6,  1, 6, 5,
        ];
        (vertices, indices)
    }

    struct Query {
        status: Status,
        edges: *mut FfiEdge,
        count: u32,
    }

    fn query(
        vertices: &[FfiVec3],
        indices: &[u32],
        transform: &[f32; 16],
        light: FfiVec3,
        directional: bool,
    ) -> Query {
        let mut edges = ptr::null_mut();
        let mut count = 0;
        let status = unsafe {
            extract_silhouette(
                vertices.as_ptr(),
                vertices.len() as u32,
                indices.as_ptr(),
                indices.len() as u32,
                transform.as_ptr(),
                &light,
                directional as u32,
                &mut edges,
                &mut count,
            )
        };
        Query { status, edges, count }
    }

    #[test]
    fn test_intersect_crossing() {
        let floor = FfiTriangle {
            a: v(-2.0, -2.0, 0.0),
            b: v(2.0, -2.0, 0.0),
            c: v(0.0, 2.0, 0.0),
        };
        let wall = FfiTriangle {
            a: v(0.0, -1.0, -1.0),
            b: v(0.0, 1.0, -1.0),
            c: v(0.0, 0.0, 1.0),
        };
        let line = intersect(floor, wall);
        assert!(!line.is_nan());
        let ys = [line.start.y, line.end.y];
        assert!(ys.iter().any(|y| (y + 0.5).abs() < 1e-5));
        assert!(ys.iter().any(|y| (y - 0.5).abs() < 1e-5));
        approx::assert_abs_diff_eq!(line.start.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_intersect_miss_is_nan() {
        let a = FfiTriangle {
            a: v(0.0, 0.0, 0.0),
            b: v(1.0, 0.0, 0.0),
            c: v(0.0, 1.0, 0.0),
        };
        let b = FfiTriangle {
            a: v(0.0, 0.0, 5.0),
            b: v(1.0, 0.0, 5.0),
            c: v(0.0, 1.0, 5.0),
        };
        assert!(intersect(a, b).is_nan());

        let mut out = FfiLine::default();
        assert_eq!(unsafe { intersect_ex(a, b, &mut out) }, Status::NoIntersection);
        assert!(out.is_nan());
    }

    #[test]
    fn test_intersect_ex_statuses() {
        let t = FfiTriangle {
            a: v(0.0, 0.0, 0.0),
            b: v(2.0, 0.0, 0.0),
            c: v(0.0, 2.0, 0.0),
        };
        let mut out = FfiLine::default();
        assert_eq!(unsafe { intersect_ex(t, t, &mut out) }, Status::Coplanar);
        assert!(!out.is_nan());

        let line = FfiTriangle {
            a: v(0.0, 0.0, 0.0),
            b: v(1.0, 0.0, 0.0),
            c: v(2.0, 0.0, 0.0),
        };
        assert_eq!(unsafe { intersect_ex(line, t, &mut out) }, Status::DegenerateTriangle);
        assert!(out.is_nan());

        assert_eq!(unsafe { intersect_ex(t, t, ptr::null_mut()) }, Status::NullPointer);
    }

    #[test]
    fn test_cube_silhouette_and_release() {
        let (vertices, indices) = cube();
        let q = query(&vertices, &indices, &IDENTITY, v(0.0, 0.0, 10.0), false);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.count, 4);
        assert!(global().is_live(q.edges));

        let edges = unsafe { std::slice::from_raw_parts(q.edges, q.count as usize) };
        for e in edges {
            assert_eq!(e.kind, 1);
            assert_eq!(e.start, vertices[e.v0 as usize]);
            assert_eq!(e.end, vertices[e.v1 as usize]);
            assert!(e.start.z > 0.0 && e.end.z > 0.0);
        }

        let copy = edges.to_vec();
        release_buffer(q.edges.cast());
        assert!(!global().is_live(q.edges));

        // A second release of the same address is refused.
        let registry = BufferRegistry::new();
        let buf = registry.publish(copy).unwrap();
        assert_eq!(registry.release(buf.ptr), ReleaseOutcome::Freed);
        assert_eq!(registry.release(buf.ptr), ReleaseOutcome::Unknown);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_translated_cube_round_trip() {
        let (vertices, indices) = cube();
        let mut transform = IDENTITY;
        transform[3] = 10.0;
        transform[11] = -4.0;
        let q = query(&vertices, &indices, &transform, v(0.0, 0.0, -1.0), true);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.count, 4);

        let edges = unsafe { std::slice::from_raw_parts(q.edges, q.count as usize) };
        for e in edges {
            let local = vertices[e.v0 as usize];
            assert_eq!(e.start, v(local.x + 10.0, local.y, local.z - 4.0));
        }
        release_buffer(q.edges.cast());
    }

    #[test]
    fn test_empty_mesh_is_ok_and_null() {
        let q = query(&[], &[], &IDENTITY, v(0.0, 0.0, 1.0), false);
        assert_eq!(q.status, Status::Ok);
        assert!(q.edges.is_null());
        assert_eq!(q.count, 0);
        release_buffer(q.edges.cast());
    }

    #[test]
    fn test_invalid_input_leaves_outputs_empty() {
        let (vertices, _) = cube();
        let q = query(&vertices, &[0, 1], &IDENTITY, v(0.0, 0.0, 1.0), false);
        assert_eq!(q.status, Status::InvalidIndexCount);
        assert!(q.edges.is_null());
        assert_eq!(q.count, 0);

        let q = query(&vertices, &[0, 1, 8], &IDENTITY, v(0.0, 0.0, 1.0), false);
        assert_eq!(q.status, Status::IndexOutOfRange);
        assert!(q.edges.is_null());
    }

    #[test]
    fn test_null_pointers_rejected() {
        let (vertices, indices) = cube();
        let mut edges = ptr::null_mut();
        let mut count = 7;
        let status = unsafe {
            extract_silhouette(
                ptr::null(),
                vertices.len() as u32,
                indices.as_ptr(),
                indices.len() as u32,
                IDENTITY.as_ptr(),
                &v(0.0, 0.0, 1.0),
                0,
                &mut edges,
                &mut count,
            )
        };
        assert_eq!(status, Status::NullPointer);
        assert_eq!(count, 0);

        let status = unsafe {
            extract_silhouette(
                vertices.as_ptr(),
                vertices.len() as u32,
                indices.as_ptr(),
                indices.len() as u32,
                ptr::null(),
                &v(0.0, 0.0, 1.0),
                0,
                &mut edges,
                &mut count,
            )
        };
        assert_eq!(status, Status::NullPointer);

        let status = unsafe {
            extract_silhouette(
                vertices.as_ptr(),
                vertices.len() as u32,
                indices.as_ptr(),
                indices.len() as u32,
                IDENTITY.as_ptr(),
                &v(0.0, 0.0, 1.0),
                0,
                ptr::null_mut(),
                &mut count,
            )
        };
        assert_eq!(status, Status::NullPointer);

        let status = unsafe {
            extract_silhouette(
                vertices.as_ptr(),
                vertices.len() as u32,
                indices.as_ptr(),
                indices.len() as u32,
                IDENTITY.as_ptr(),
                ptr::null(),
                0,
                &mut edges,
                &mut count,
            )
        };
        assert_eq!(status, Status::NullPointer);
        assert!(edges.is_null());
    }

    #[test]
    fn test_non_manifold_warning() {
        let vertices = [
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(0.5, 1.0, 0.0),
            v(0.5, -1.0, 0.0),
            v(0.5, 0.0, 1.0),
        ];
        let indices = [0, 1, 2, 1, 0, 3, 0, 1, 4];
        let q = query(&vertices, &indices, &IDENTITY, v(0.0, 0.0, -1.0), true);
        assert_eq!(q.status, Status::NonManifoldWarning);
        assert!(q.count > 0);
        let edges = unsafe { std::slice::from_raw_parts(q.edges, q.count as usize) };
        assert!(edges.iter().any(|e| e.kind == 2));
        release_buffer(q.edges.cast());
    }

    #[test]
    fn test_zero_area_triangle_is_not_non_manifold() {
        let vertices = [
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0),
        ];
        let indices = [0, 1, 2, 0, 2, 3, 0, 2, 2];
        let q = query(&vertices, &indices, &IDENTITY, v(0.0, 0.0, -1.0), true);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.count, 4);
        let edges = unsafe { std::slice::from_raw_parts(q.edges, q.count as usize) };
        assert!(edges.iter().all(|e| e.kind == 0));
        let pairs: Vec<_> = edges.iter().map(|e| (e.v0, e.v1)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        release_buffer(q.edges.cast());
    }

    #[test]
    fn test_release_foreign_and_null() {
        let local = [1u32, 2, 3];
        release_buffer(local.as_ptr() as *mut c_void);
        release_buffer(ptr::null_mut());
        assert_eq!(local, [1, 2, 3]);
    }

    #[test]
    fn test_vec_sum() {
        let items = [v(1.0, 2.0, 3.0), v(-1.0, 0.5, 4.0), v(0.0, 0.0, -2.0)];
        let sum = unsafe { vec_sum(items.as_ptr(), items.len() as u32) };
        assert_eq!(sum, v(0.0, 2.5, 5.0));
        assert_eq!(unsafe { vec_sum(ptr::null(), 3) }, FfiVec3::default());
    }

    #[test]
    fn test_version_string() {
        let version = unsafe { CStr::from_ptr(shadowcast_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_contain_reports_panic() {
        let status = contain("test", Status::Panic, || -> Status { panic!("boom") });
        assert_eq!(status, Status::Panic);
    }
}
