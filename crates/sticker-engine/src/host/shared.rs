use std::sync::Arc;

use parking_lot::Mutex;

use crate::surface::{FrameStats, SurfaceState};

use super::adapter::{HostCallbacks, HostSurfaceAdapter};

/// Cloneable, lock-guarded adapter for hosts that may deliver
/// `on_surface_destroyed` from a different thread than rendering.
///
/// Each callback holds the lock only while the forwarded call runs, so a
/// destroy waits for an in-flight frame and never interleaves with it.
#[derive(Clone)]
pub struct SharedSurface {
    inner: Arc<Mutex<HostSurfaceAdapter>>,
}

impl SharedSurface {
    pub fn new(adapter: HostSurfaceAdapter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(adapter)),
        }
    }

    pub fn on_surface_created(&self) {
        self.inner.lock().on_surface_created();
    }

    pub fn on_surface_changed(&self, width: u32, height: u32) {
        self.inner.lock().on_surface_changed(width, height);
    }

    pub fn on_draw_frame(&self) {
        self.inner.lock().on_draw_frame();
    }

    pub fn on_surface_destroyed(&self) {
        self.inner.lock().on_surface_destroyed();
    }

    pub fn state(&self) -> SurfaceState {
        self.inner.lock().state()
    }

    pub fn stats(&self) -> FrameStats {
        self.inner.lock().stats()
    }
}

impl std::fmt::Debug for SharedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Formatting may happen while a callback holds the lock.
        match self.inner.try_lock() {
            Some(adapter) => f.debug_tuple("SharedSurface").field(&*adapter).finish(),
            None => f.write_str("SharedSurface(<locked>)"),
        }
    }
}
