//! Outside-click listeners for open pickers.
//!
//! A listener exists exactly as long as its [`ListenerGuard`]. Dropping the
//! guard (picker closed, panel unmounted) detaches it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Owner of a listener, one per mounted panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(pub i64);

#[derive(Default)]
pub struct PointerListeners {
    next_id: AtomicU64,
    active: Mutex<HashMap<u64, PanelId>>,
}

impl PointerListeners {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attach(self: &Arc<Self>, owner: PanelId) -> ListenerGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.table().insert(id, owner);
        ListenerGuard { id, registry: Arc::clone(self) }
    }

    /// Whether a pointer-down in `owner` has to be delivered as an outside click
    pub fn is_listening(&self, owner: PanelId) -> bool {
        self.table().values().any(|&o| o == owner)
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<u64, PanelId>> {
        // The map stays consistent even if a holder panicked.
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// RAII guard that detaches its listener when dropped.
#[must_use]
pub struct ListenerGuard {
    id: u64,
    registry: Arc<PointerListeners>,
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ListenerGuard").field(&self.id).finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.registry.table().remove(&self.id);
    }
}
