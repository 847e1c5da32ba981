//! Reuse queue for a single tag
//!
//! A [`Pool`] owns an ordered double-ended sequence of instance handles.
//! Instances are created eagerly at initialization, handed out from the
//! front, and requeued at the back after use, so the front is always the
//! least-recently-issued instance. The pool never destroys an instance;
//! membership is for the life of the registry.
//!
//! # Reuse discipline
//!
//! Callers must always reuse via [`Pool::acquire_front`] followed by
//! [`Pool::release_back`]. The exhaustion check in
//! [`Pool::looks_exhausted`] reads only the front instance's activation
//! flag and is valid only under that strict FIFO discipline.

use std::collections::VecDeque;

use thiserror::Error;

use crate::config::PoolSpec;
use crate::scene::{InstanceHandle, InstanceHost};

/// Errors from pool operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Peek or acquire on a pool with no pooled instances
    #[error("pool '{tag}' has no pooled instances")]
    EmptyPool {
        /// Tag of the empty pool
        tag: String,
    },

    /// The pool handed out a handle the host no longer recognizes
    #[error("pool '{tag}' holds a handle unknown to the host")]
    CorruptPool {
        /// Tag of the corrupt pool
        tag: String,
    },
}

/// Reuse queue for one tag
pub struct Pool {
    spec: PoolSpec,
    handles: VecDeque<InstanceHandle>,
}

impl Pool {
    /// Create an empty pool for a spec; call [`Pool::initialize`] to populate it
    #[must_use]
    pub fn new(spec: PoolSpec) -> Self {
        let capacity = spec.max_size;
        Self {
            spec,
            handles: VecDeque::with_capacity(capacity),
        }
    }

    /// Instantiate `initial_size` instances, deactivate them, and append
    /// each to the tail in order.
    ///
    /// The eager allocation cost is paid once, here.
    pub fn initialize(&mut self, host: &mut dyn InstanceHost) {
        for _ in 0..self.spec.initial_size {
            let handle = host.instantiate(&self.spec.prototype);
            host.set_active(handle, false);
            self.handles.push_back(handle);
        }
        log::info!(
            "created pool '{}' with {} instances (refill {}, cap {})",
            self.spec.tag,
            self.handles.len(),
            self.spec.refill_batch,
            self.spec.max_size
        );
    }

    /// The head element, without removing it
    ///
    /// # Errors
    ///
    /// [`PoolError::EmptyPool`] if the pool holds no instances.
    pub fn peek(&self) -> Result<InstanceHandle, PoolError> {
        self.handles.front().copied().ok_or_else(|| PoolError::EmptyPool {
            tag: self.spec.tag.clone(),
        })
    }

    /// Remove and return the head element
    ///
    /// # Errors
    ///
    /// [`PoolError::EmptyPool`] if the pool holds no instances.
    pub fn acquire_front(&mut self) -> Result<InstanceHandle, PoolError> {
        self.handles.pop_front().ok_or_else(|| PoolError::EmptyPool {
            tag: self.spec.tag.clone(),
        })
    }

    /// Insert a handle at the head
    ///
    /// The handle must not already be a member of this pool; membership is
    /// checked in debug builds only, keeping release insertion O(1).
    pub fn release_front(&mut self, handle: InstanceHandle) {
        debug_assert!(
            !self.handles.contains(&handle),
            "handle already pooled in '{}'",
            self.spec.tag
        );
        self.handles.push_front(handle);
    }

    /// Insert a handle at the tail
    ///
    /// Same membership precondition as [`Pool::release_front`].
    pub fn release_back(&mut self, handle: InstanceHandle) {
        debug_assert!(
            !self.handles.contains(&handle),
            "handle already pooled in '{}'",
            self.spec.tag
        );
        self.handles.push_back(handle);
    }

    /// Grow the pool by one refill batch, prepending the new instances
    ///
    /// Silently a no-op when refilling is disabled (`refill_batch == 0`)
    /// or when the batch would push the pool past `max_size`; growth past
    /// the cap is dropped, not reported.
    pub fn refill(&mut self, host: &mut dyn InstanceHost) {
        let batch = self.spec.refill_batch;
        if batch == 0 || self.handles.len() + batch > self.spec.max_size {
            return;
        }
        log::debug!("refilling pool '{}' with {} instances", self.spec.tag, batch);
        for _ in 0..batch {
            let handle = host.instantiate(&self.spec.prototype);
            host.set_active(handle, false);
            self.handles.push_front(handle);
        }
    }

    /// Cheap exhaustion heuristic: the head instance is active
    ///
    /// Issued instances go to the tail and refills go to the head, so the
    /// head is normally the least-recently-issued instance; if even that
    /// one is still active, most likely all are in use. Only meaningful
    /// under the FIFO reuse discipline documented on this type. Returns
    /// `false` for an empty pool.
    #[must_use]
    pub fn looks_exhausted(&self, host: &dyn InstanceHost) -> bool {
        self.handles.front().is_some_and(|h| host.is_active(*h))
    }

    /// Number of pooled instances
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the pool holds no instances
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// The immutable spec this pool was built from
    #[must_use]
    pub const fn spec(&self) -> &PoolSpec {
        &self.spec
    }
}
