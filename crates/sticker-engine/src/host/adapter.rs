use crate::backend::RenderBackend;
use crate::capability::{probe_or_fallback, CapabilityLevel, HostEnvironment};
use crate::surface::{FrameOutcome, FrameStats, Outcome, SurfaceController, SurfaceState};

/// Lifecycle callbacks a hosting UI framework delivers for one surface.
///
/// Mirrors the GL surface view renderer contract: created, changed, draw, and
/// destroyed. Hosts may deliver these in any order; implementations must not
/// panic on out-of-order calls.
pub trait HostCallbacks {
    fn on_surface_created(&mut self);

    fn on_surface_changed(&mut self, width: u32, height: u32);

    fn on_draw_frame(&mut self);

    fn on_surface_destroyed(&mut self);
}

enum Slot {
    /// No create callback yet; the backend waits here.
    Pending(Box<dyn RenderBackend>),
    Active(SurfaceController),
    /// Destroyed before any create arrived.
    Closed,
}

/// Translates host callbacks into [`SurfaceController`] calls.
///
/// One adapter per surface instance. The controller is built lazily on the
/// first create callback, after the capability level has been probed. The
/// probed level is cached so create retries use the same one.
pub struct HostSurfaceAdapter {
    env: Box<dyn HostEnvironment + Send>,
    capability: Option<CapabilityLevel>,
    slot: Slot,
}

impl HostSurfaceAdapter {
    pub fn new(env: Box<dyn HostEnvironment + Send>, backend: Box<dyn RenderBackend>) -> Self {
        Self {
            env,
            capability: None,
            slot: Slot::Pending(backend),
        }
    }

    pub fn state(&self) -> SurfaceState {
        match &self.slot {
            Slot::Pending(_) => SurfaceState::Uninitialized,
            Slot::Active(controller) => controller.state(),
            Slot::Closed => SurfaceState::Destroyed,
        }
    }

    /// Level chosen for this surface, once probed.
    pub fn capability(&self) -> Option<CapabilityLevel> {
        self.capability
    }

    pub fn stats(&self) -> FrameStats {
        self.controller()
            .map(SurfaceController::stats)
            .unwrap_or_default()
    }

    pub fn controller(&self) -> Option<&SurfaceController> {
        match &self.slot {
            Slot::Active(controller) => Some(controller),
            _ => None,
        }
    }

    fn active(&mut self, callback: &str) -> Option<&mut SurfaceController> {
        match &mut self.slot {
            Slot::Active(controller) => Some(controller),
            Slot::Pending(_) => {
                log::warn!("{callback} before surface creation; ignoring");
                None
            }
            Slot::Closed => {
                log::debug!("{callback} after surface destruction; ignoring");
                None
            }
        }
    }
}

impl HostCallbacks for HostSurfaceAdapter {
    fn on_surface_created(&mut self) {
        let mut controller = match std::mem::replace(&mut self.slot, Slot::Closed) {
            Slot::Pending(backend) => SurfaceController::new(backend),
            Slot::Active(controller) => controller,
            Slot::Closed => {
                log::warn!("surface created after it was destroyed; ignoring");
                return;
            }
        };

        let env = &self.env;
        let capability = *self
            .capability
            .get_or_insert_with(|| probe_or_fallback(&**env));

        match controller.create(capability) {
            Ok(Outcome::Applied | Outcome::Unchanged) => {}
            Ok(Outcome::Rejected(e)) => log::debug!("surface-created callback ignored: {e}"),
            // Already logged by the controller; the host may deliver another
            // create callback to retry.
            Err(_) => {}
        }
        self.slot = Slot::Active(controller);
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        if let Some(controller) = self.active("surface changed") {
            let _ = controller.resize(width, height);
        }
    }

    fn on_draw_frame(&mut self) {
        if let Some(controller) = self.active("draw frame") {
            if let FrameOutcome::Dropped(e) = controller.render_frame() {
                log::trace!("host frame dropped: {e}");
            }
        }
    }

    fn on_surface_destroyed(&mut self) {
        match &mut self.slot {
            Slot::Active(controller) => {
                let _ = controller.destroy();
            }
            Slot::Pending(_) => {
                log::debug!("surface destroyed before creation");
                self.slot = Slot::Closed;
            }
            Slot::Closed => {}
        }
    }
}

impl std::fmt::Debug for HostSurfaceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSurfaceAdapter")
            .field("state", &self.state())
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::capability::{CapabilityUnavailable, FixedEnvironment};
    use crate::surface::Dimensions;
    use crate::testing::RecordingBackend;

    fn adapter(version: u32) -> (HostSurfaceAdapter, RecordingBackend) {
        let backend = RecordingBackend::new();
        let adapter = HostSurfaceAdapter::new(
            Box::new(FixedEnvironment(version)),
            Box::new(backend.clone()),
        );
        (adapter, backend)
    }

    #[test]
    fn draw_before_create_is_ignored() {
        let (mut a, backend) = adapter(0x20000);
        a.on_draw_frame();
        a.on_surface_changed(10, 10);
        assert_eq!(a.state(), SurfaceState::Uninitialized);
        assert!(a.controller().is_none());
        assert_eq!(a.capability(), None);

        let calls = backend.calls();
        assert!(calls.inits.is_empty());
        assert_eq!(calls.frames, 0);
    }

    #[test]
    fn host_sequence_reaches_backend_in_order() {
        let (mut a, backend) = adapter(0x20000);
        a.on_surface_created();
        a.on_surface_changed(800, 600);
        a.on_draw_frame();
        a.on_draw_frame();
        a.on_draw_frame();
        a.on_surface_destroyed();
        a.on_surface_destroyed();

        let calls = backend.calls();
        assert_eq!(calls.inits, vec![CapabilityLevel::Standard]);
        assert_eq!(calls.resizes, vec![Dimensions::new(800, 600)]);
        assert_eq!(calls.frames, 3);
        assert_eq!(calls.teardowns, 1);
        assert_eq!(a.state(), SurfaceState::Destroyed);
        assert_eq!(a.stats().rendered, 3);
        assert_eq!(backend.live_handles(), 0);
    }

    #[test]
    fn gles1_host_creates_basic_surface() {
        let (mut a, backend) = adapter(0x10000);
        a.on_surface_created();
        assert_eq!(a.capability(), Some(CapabilityLevel::Basic));
        assert_eq!(backend.calls().inits, vec![CapabilityLevel::Basic]);
    }

    #[test]
    fn unavailable_host_falls_back_to_basic() {
        let backend = RecordingBackend::new();
        let env = || -> Result<u32, CapabilityUnavailable> {
            Err(CapabilityUnavailable::new("no configuration info"))
        };
        let mut a = HostSurfaceAdapter::new(Box::new(env), Box::new(backend.clone()));
        a.on_surface_created();
        assert_eq!(a.state(), SurfaceState::Ready);
        assert_eq!(backend.calls().inits, vec![CapabilityLevel::Basic]);
    }

    #[test]
    fn duplicate_create_keeps_one_handle() {
        let (mut a, backend) = adapter(0x30000);
        a.on_surface_created();
        a.on_surface_created();
        assert_eq!(backend.calls().inits.len(), 1);
        assert_eq!(backend.live_handles(), 1);
    }

    #[test]
    fn create_retry_reuses_probed_capability() {
        let version = Arc::new(AtomicU32::new(0x20000));
        let env = {
            let version = Arc::clone(&version);
            move || -> Result<u32, CapabilityUnavailable> { Ok(version.load(Ordering::SeqCst)) }
        };
        let backend = RecordingBackend::new();
        backend.fail_next_inits(1);
        let mut a = HostSurfaceAdapter::new(Box::new(env), Box::new(backend.clone()));

        a.on_surface_created();
        assert_eq!(a.state(), SurfaceState::Uninitialized);

        // Host now reports a different version; the surface keeps its level.
        version.store(0x30000, Ordering::SeqCst);
        a.on_surface_created();
        assert_eq!(a.state(), SurfaceState::Ready);
        assert_eq!(
            backend.calls().inits,
            vec![CapabilityLevel::Standard, CapabilityLevel::Standard]
        );
        assert_eq!(a.controller().and_then(|c| c.capability()), Some(CapabilityLevel::Standard));
    }

    #[test]
    fn destroy_before_create_closes_the_surface() {
        let (mut a, backend) = adapter(0x20000);
        a.on_surface_destroyed();
        a.on_surface_created();
        a.on_draw_frame();
        assert_eq!(a.state(), SurfaceState::Destroyed);
        let calls = backend.calls();
        assert!(calls.inits.is_empty());
        assert_eq!(calls.teardowns, 0);
    }

    #[test]
    fn callbacks_after_destroy_are_ignored() {
        let (mut a, backend) = adapter(0x20000);
        a.on_surface_created();
        a.on_surface_destroyed();
        a.on_surface_created();
        a.on_surface_changed(5, 5);
        a.on_draw_frame();

        let calls = backend.calls();
        assert_eq!(calls.inits.len(), 1);
        assert!(calls.resizes.is_empty());
        assert_eq!(calls.frames, 0);
        assert_eq!(calls.teardowns, 1);
        assert_eq!(a.state(), SurfaceState::Destroyed);
        assert_eq!(a.capability(), Some(CapabilityLevel::Standard));
    }

    #[test]
    fn minimized_surface_frames_are_skipped() {
        let (mut a, backend) = adapter(0x20000);
        a.on_surface_created();
        a.on_surface_changed(0, 0);
        backend.skip_next_frames(1);
        a.on_draw_frame();
        a.on_surface_changed(320, 240);
        a.on_draw_frame();

        let stats = a.stats();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.rendered, 1);
    }
}
