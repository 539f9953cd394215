#![warn(missing_docs)]

//! Owned-buffer exchange for the shadowcast kernel.
//!
//! Variable-length results leave the kernel as a `(pointer, length)` pair.
//! The memory stays owned by a [`BufferRegistry`] until the host hands the
//! pointer back through [`BufferRegistry::release`]. Releasing a pointer the
//! registry does not know (foreign, or already released) is a logged no-op,
//! never a double free.
//!
//! The registry is split into independently locked shards keyed by address,
//! so concurrent queries publishing unrelated buffers do not serialize on a
//! single lock.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use thiserror::Error;

/// Number of independently locked registry shards.
pub const SHARD_COUNT: usize = 16;

static GLOBAL_REGISTRY: OnceLock<BufferRegistry> = OnceLock::new();

/// Errors raised while publishing a buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not provide the requested memory.
    #[error("failed to allocate {bytes} bytes for an owned buffer")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
    },

    /// Zero-sized element types have no addressable storage to hand out.
    #[error("cannot publish a buffer of zero-sized elements")]
    ZeroSized,
}

/// A published buffer as seen by the host: base pointer and element count.
///
/// An empty result is `(null, 0)`; there is nothing to release for it.
#[derive(Debug)]
pub struct RawBuffer<T> {
    /// Base address of the first element, or null when `len == 0`.
    pub ptr: *mut T,
    /// Number of elements.
    pub len: usize,
}

impl<T> RawBuffer<T> {
    /// The empty buffer.
    pub fn empty() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
        }
    }

    /// Whether this buffer carries no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// What [`BufferRegistry::release`] did with a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The buffer was live and is now freed.
    Freed,
    /// Null pointer; nothing to do.
    Null,
    /// Not produced by this registry, or already released.
    Unknown,
}

type Shard = Mutex<HashMap<usize, Box<dyn Any + Send>>>;

/// Bookkeeping of every buffer currently owned on behalf of the host.
pub struct BufferRegistry {
    shards: Vec<Shard>,
}

impl BufferRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    /// Take ownership of `data` and return its address and length.
    ///
    /// The elements stay at the returned address until the pointer is
    /// released; moving the bookkeeping entry never moves the heap block.
    pub fn publish<T: Send + 'static>(&self, data: Vec<T>) -> Result<RawBuffer<T>, BufferError> {
        if std::mem::size_of::<T>() == 0 {
            return Err(BufferError::ZeroSized);
        }
        if data.is_empty() {
            return Ok(RawBuffer::empty());
        }

        let mut boxed: Box<[T]> = data.into_boxed_slice();
        let len = boxed.len();
        let ptr = boxed.as_mut_ptr();
        let addr = ptr as usize;

        self.shard(addr).insert(addr, Box::new(boxed));
        tracing::debug!(addr, len, "published owned buffer");

        Ok(RawBuffer { ptr, len })
    }

    /// Copy `data` into a freshly allocated buffer and publish it.
    ///
    /// Allocation failure is reported as [`BufferError::Allocation`] instead
    /// of aborting the process.
    pub fn publish_copy<T: Copy + Send + 'static>(
        &self,
        data: &[T],
    ) -> Result<RawBuffer<T>, BufferError> {
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(data.len())
            .map_err(|_| BufferError::Allocation {
                bytes: std::mem::size_of_val(data),
            })?;
        owned.extend_from_slice(data);
        self.publish(owned)
    }

    /// Free the buffer at `ptr` if this registry owns it.
    ///
    /// Unknown and already-released pointers are rejected with a warning.
    /// The caller must not race two releases of the same pointer or read the
    /// buffer after releasing it.
    pub fn release<T>(&self, ptr: *const T) -> ReleaseOutcome {
        if ptr.is_null() {
            return ReleaseOutcome::Null;
        }
        let addr = ptr as usize;
        let entry = self.shard(addr).remove(&addr);
        match entry {
            Some(buffer) => {
                drop(buffer);
                tracing::debug!(addr, "released owned buffer");
                ReleaseOutcome::Freed
            }
            None => {
                tracing::warn!(addr, "release of unknown or already released buffer ignored");
                ReleaseOutcome::Unknown
            }
        }
    }

    /// Whether `ptr` is a buffer currently owned by this registry.
    pub fn is_live<T>(&self, ptr: *const T) -> bool {
        let addr = ptr as usize;
        !ptr.is_null() && self.shard(addr).contains_key(&addr)
    }

    /// Number of buffers awaiting release.
    pub fn live_count(&self) -> usize {
        self.shards.iter().map(|s| lock(s).len()).sum()
    }

    fn shard(&self, addr: usize) -> MutexGuard<'_, HashMap<usize, Box<dyn Any + Send>>> {
        // Heap blocks are at least 8-byte aligned; mix in higher bits so
        // neighbouring allocations spread across shards.
        let index = ((addr >> 4) ^ (addr >> 12)) % SHARD_COUNT;
        lock(&self.shards[index])
    }
}

impl Default for BufferRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A poisoned shard only means another thread panicked mid-operation; the
/// map itself is still consistent, so keep using it.
fn lock(shard: &Shard) -> MutexGuard<'_, HashMap<usize, Box<dyn Any + Send>>> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The process-wide registry used by the C surface.
pub fn global() -> &'static BufferRegistry {
    GLOBAL_REGISTRY.get_or_init(BufferRegistry::new)
}
