use crate::backend::{BackendHandle, BackendInitError, FrameStatus, RenderBackend};
use crate::capability::CapabilityLevel;
use crate::time::FrameClock;

use super::state::{
    Dimensions, FrameOutcome, FrameStats, InvalidTransition, Operation, Outcome, SurfaceState,
};

/// Owns the lifecycle of one render surface and its backend handle.
///
/// Transitions:
/// - `create`:       Uninitialized -> Ready
/// - `resize`:       Ready | Sized -> Sized
/// - `render_frame`: Ready | Sized -> unchanged
/// - `destroy`:      any -> Destroyed (terminal)
///
/// Calls arriving in any other state are ignored and reported as
/// [`InvalidTransition`]. All calls are expected on the host's render thread;
/// wrap the owner in a lock if destroy can arrive from elsewhere.
pub struct SurfaceController {
    backend: Box<dyn RenderBackend>,
    handle: Option<Box<dyn BackendHandle>>,
    state: SurfaceState,
    capability: Option<CapabilityLevel>,
    size: Option<Dimensions>,
    clock: FrameClock,
    stats: FrameStats,
}

impl SurfaceController {
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            handle: None,
            state: SurfaceState::Uninitialized,
            capability: None,
            size: None,
            clock: FrameClock::new(),
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Capability the live (or last) handle was created with.
    pub fn capability(&self) -> Option<CapabilityLevel> {
        self.capability
    }

    /// Last size received while live.
    pub fn size(&self) -> Option<Dimensions> {
        self.size
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Creates the backend handle at `capability`.
    ///
    /// On failure the surface stays `Uninitialized` and `create` may be retried.
    pub fn create(&mut self, capability: CapabilityLevel) -> Result<Outcome, BackendInitError> {
        if self.state != SurfaceState::Uninitialized {
            return Ok(Outcome::Rejected(self.reject(Operation::Create)));
        }

        let handle = self.backend.initialize(capability).inspect_err(|e| {
            log::error!("{e}; surface stays uninitialized");
        })?;

        debug_assert!(self.handle.is_none());
        self.handle = Some(handle);
        self.capability = Some(capability);
        self.clock.restart();
        self.state = SurfaceState::Ready;
        log::info!("surface created at {capability} capability");
        Ok(Outcome::Applied)
    }

    /// Forwards a new drawable size to the backend.
    pub fn resize(&mut self, width: u32, height: u32) -> Outcome {
        let size = Dimensions::new(width, height);
        if !self.state.is_live() {
            return Outcome::Rejected(self.reject(Operation::Resize));
        }
        if self.state == SurfaceState::Sized && self.size == Some(size) {
            log::trace!("resize to {size} ignored; size unchanged");
            return Outcome::Unchanged;
        }

        let Some(handle) = self.handle.as_mut() else {
            return Outcome::Rejected(self.reject(Operation::Resize));
        };
        handle.resize(size);

        self.size = Some(size);
        self.state = SurfaceState::Sized;
        log::debug!("surface resized to {size}");
        Outcome::Applied
    }

    /// Renders one frame. Backend failures drop the frame without changing state;
/// frames the backend skips are counted apart from rendered ones.
    pub fn render_frame(&mut self) -> FrameOutcome {
        if !self.state.is_live() {
            self.stats.rejected += 1;
            return FrameOutcome::Rejected(self.reject(Operation::RenderFrame));
        }
        let Some(handle) = self.handle.as_mut() else {
            self.stats.rejected += 1;
            return FrameOutcome::Rejected(self.reject(Operation::RenderFrame));
        };

        let time = self.clock.tick();
        match handle.render_frame(time) {
            Ok(FrameStatus::Presented) => {
                self.stats.rendered += 1;
                FrameOutcome::Rendered
            }
            Ok(FrameStatus::Skipped) => {
                self.stats.skipped += 1;
                log::trace!("frame {} skipped by backend", time.frame_index);
                FrameOutcome::Skipped
            }
            Err(e) => {
                self.stats.dropped += 1;
                log::warn!("frame {} dropped: {e}", time.frame_index);
                FrameOutcome::Dropped(e)
            }
        }
    }

    /// Tears the surface down. Safe to call any number of times; the backend
    /// handle is released exactly once.
    pub fn destroy(&mut self) -> Outcome {
        if self.state == SurfaceState::Destroyed {
            log::trace!("destroy ignored; surface already destroyed");
            return Outcome::Unchanged;
        }

        if let Some(mut handle) = self.handle.take() {
            handle.teardown();
        }
        self.state = SurfaceState::Destroyed;
        log::info!(
            "surface destroyed ({} frames rendered, {} dropped)",
            self.stats.rendered,
            self.stats.dropped
        );
        Outcome::Applied
    }

    fn reject(&self, operation: Operation) -> InvalidTransition {
        let err = InvalidTransition {
            operation,
            state: self.state,
        };
        log::warn!("{err}; ignoring");
        err
    }
}

impl Drop for SurfaceController {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.destroy();
        }
    }
}

impl std::fmt::Debug for SurfaceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceController")
            .field("state", &self.state)
            .field("capability", &self.capability)
            .field("size", &self.size)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RenderError;
    use crate::testing::RecordingBackend;

    fn controller() -> (SurfaceController, RecordingBackend) {
        let backend = RecordingBackend::new();
        (SurfaceController::new(Box::new(backend.clone())), backend)
    }

    #[test]
    fn starts_uninitialized() {
        let (c, _) = controller();
        assert_eq!(c.state(), SurfaceState::Uninitialized);
        assert_eq!(c.capability(), None);
        assert_eq!(c.size(), None);
    }

    #[test]
    fn render_before_create_is_rejected() {
        let (mut c, backend) = controller();
        let outcome = c.render_frame();
        assert!(matches!(
            outcome,
            FrameOutcome::Rejected(InvalidTransition {
                operation: Operation::RenderFrame,
                state: SurfaceState::Uninitialized,
            })
        ));
        assert_eq!(backend.calls().frames, 0);
        assert_eq!(c.stats().rejected, 1);
        assert_eq!(c.state(), SurfaceState::Uninitialized);
    }

    #[test]
    fn resize_before_create_is_rejected() {
        let (mut c, backend) = controller();
        assert!(matches!(c.resize(10, 10), Outcome::Rejected(_)));
        assert!(backend.calls().resizes.is_empty());
        assert_eq!(c.size(), None);
    }

    #[test]
    fn full_lifecycle_tears_down_once() {
        let (mut c, backend) = controller();
        assert_eq!(c.create(CapabilityLevel::Standard), Ok(Outcome::Applied));
        assert_eq!(c.state(), SurfaceState::Ready);

        assert_eq!(c.resize(800, 600), Outcome::Applied);
        assert_eq!(c.state(), SurfaceState::Sized);

        for _ in 0..3 {
            assert_eq!(c.render_frame(), FrameOutcome::Rendered);
        }

        assert_eq!(c.destroy(), Outcome::Applied);
        assert_eq!(c.destroy(), Outcome::Unchanged);

        let calls = backend.calls();
        assert_eq!(calls.inits, vec![CapabilityLevel::Standard]);
        assert_eq!(calls.resizes, vec![Dimensions::new(800, 600)]);
        assert_eq!(calls.frames, 3);
        assert_eq!(calls.teardowns, 1);
        assert_eq!(c.stats().rendered, 3);
        assert_eq!(c.state(), SurfaceState::Destroyed);
    }

    #[test]
    fn destroy_many_times_tears_down_once() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Basic).unwrap();
        for _ in 0..5 {
            let _ = c.destroy();
        }
        assert_eq!(backend.calls().teardowns, 1);
    }

    #[test]
    fn destroy_before_create_is_terminal_without_teardown() {
        let (mut c, backend) = controller();
        assert_eq!(c.destroy(), Outcome::Applied);
        assert_eq!(c.state(), SurfaceState::Destroyed);
        assert_eq!(backend.calls().teardowns, 0);

        let outcome = c.create(CapabilityLevel::Standard).unwrap();
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert!(backend.calls().inits.is_empty());
    }

    #[test]
    fn repeated_resize_reaches_backend_once() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        assert_eq!(c.resize(640, 480), Outcome::Applied);
        assert_eq!(c.resize(640, 480), Outcome::Unchanged);
        assert_eq!(c.state(), SurfaceState::Sized);
        assert_eq!(c.size(), Some(Dimensions::new(640, 480)));
        assert_eq!(backend.calls().resizes.len(), 1);

        assert_eq!(c.resize(1024, 768), Outcome::Applied);
        assert_eq!(backend.calls().resizes.len(), 2);
    }

    #[test]
    fn render_is_accepted_before_first_resize() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        assert_eq!(c.render_frame(), FrameOutcome::Rendered);
        assert_eq!(c.state(), SurfaceState::Ready);
        assert_eq!(backend.calls().frames, 1);
    }

    #[test]
    fn second_create_is_rejected_and_keeps_single_handle() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let outcome = c.create(CapabilityLevel::Advanced).unwrap();
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(backend.calls().inits.len(), 1);
        assert_eq!(c.capability(), Some(CapabilityLevel::Standard));
    }

    #[test]
    fn failed_init_stays_uninitialized_and_retry_succeeds() {
        let (mut c, backend) = controller();
        backend.fail_next_inits(1);

        let err = c.create(CapabilityLevel::Standard).unwrap_err();
        assert!(err.message.contains("scripted"));
        assert_eq!(c.state(), SurfaceState::Uninitialized);
        assert_eq!(c.capability(), None);

        assert_eq!(c.create(CapabilityLevel::Standard), Ok(Outcome::Applied));
        assert_eq!(c.state(), SurfaceState::Ready);
        assert_eq!(
            backend.calls().inits,
            vec![CapabilityLevel::Standard, CapabilityLevel::Standard]
        );
    }

    #[test]
    fn render_failure_drops_frame_and_keeps_state() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let _ = c.resize(100, 100);
        backend.fail_next_frames(1, RenderError::Timeout);

        assert_eq!(c.render_frame(), FrameOutcome::Dropped(RenderError::Timeout));
        assert_eq!(c.state(), SurfaceState::Sized);
        assert_eq!(c.render_frame(), FrameOutcome::Rendered);

        let stats = c.stats();
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.rendered, 1);
    }

    #[test]
    fn calls_after_destroy_are_rejected() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let _ = c.destroy();

        assert!(matches!(c.resize(1, 1), Outcome::Rejected(_)));
        assert!(matches!(c.render_frame(), FrameOutcome::Rejected(_)));
        let calls = backend.calls();
        assert_eq!(calls.frames, 0);
        assert!(calls.resizes.is_empty());
    }

    #[test]
    fn frame_indices_restart_per_surface() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let _ = c.render_frame();
        let _ = c.render_frame();
        assert_eq!(backend.calls().frame_indices, vec![0, 1]);
    }

    #[test]
    fn skipped_frames_are_not_counted_as_rendered() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let _ = c.resize(0, 0);
        backend.skip_next_frames(2);

        assert_eq!(c.render_frame(), FrameOutcome::Skipped);
        assert_eq!(c.render_frame(), FrameOutcome::Skipped);
        assert_eq!(c.render_frame(), FrameOutcome::Rendered);
        assert_eq!(c.state(), SurfaceState::Sized);

        let stats = c.stats();
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.rendered, 1);
        assert_eq!(stats.dropped, 0);
        let calls = backend.calls();
        assert_eq!(calls.skipped, 2);
        assert_eq!(calls.frames, 1);
    }

    #[test]
    fn create_after_destroy_reports_destroyed_state() {
        let (mut c, _) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let _ = c.destroy();

        let expected = InvalidTransition {
            operation: Operation::Create,
            state: SurfaceState::Destroyed,
        };
        assert_eq!(
            c.create(CapabilityLevel::Standard),
            Ok(Outcome::Rejected(expected))
        );
        assert_eq!(expected.to_string(), "cannot create while surface is destroyed");
    }

    #[test]
    fn drop_releases_live_handle() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        drop(c);
        assert_eq!(backend.calls().teardowns, 1);
    }

    #[test]
    fn drop_after_destroy_does_not_tear_down_again() {
        let (mut c, backend) = controller();
        let _ = c.create(CapabilityLevel::Standard).unwrap();
        let _ = c.destroy();
        drop(c);
        assert_eq!(backend.calls().teardowns, 1);
    }
}
