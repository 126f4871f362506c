use std::sync::Arc;

use parking_lot::RwLock;

use crate::BackendHandle;

/// Single publication point for the active backend.
///
/// Readers clone the current `Arc` and keep using it for as long as they need,
/// so a swap never pulls the backend out from under an in-flight request.
#[derive(Debug, Clone)]
pub struct BackendSlot {
    inner: Arc<RwLock<BackendHandle>>,
}

impl BackendSlot {
    #[must_use]
    pub fn new(handle: BackendHandle) -> Self {
        Self {
            inner: Arc::new(RwLock::new(handle)),
        }
    }

    #[must_use]
    pub fn current(&self) -> BackendHandle {
        self.inner.read().clone()
    }

    /// Makes `handle` the active backend and returns the one it replaced
    pub fn publish(&self, handle: BackendHandle) -> BackendHandle {
        std::mem::replace(&mut *self.inner.write(), handle)
    }
}
