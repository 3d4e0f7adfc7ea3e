//! Recording backend double shared by unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{BackendHandle, BackendInitError, FrameStatus, RenderBackend, RenderError};
use crate::capability::CapabilityLevel;
use crate::surface::Dimensions;
use crate::time::FrameTime;

/// Everything the backend and its handles have been asked to do.
#[derive(Debug, Default, Clone)]
pub(crate) struct Calls {
    pub inits: Vec<CapabilityLevel>,
    pub resizes: Vec<Dimensions>,
    pub frames: u64,
    pub skipped: u64,
    pub frame_indices: Vec<u64>,
    pub teardowns: u32,
}

#[derive(Debug, Default)]
struct Script {
    calls: Calls,
    fail_inits: u32,
    fail_frames: u32,
    skip_frames: u32,
    frame_error: Option<RenderError>,
    live_handles: u32,
}

/// Cloneable backend whose clones share one call log.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingBackend {
    script: Arc<Mutex<Script>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Calls {
        self.script.lock().calls.clone()
    }

    pub fn live_handles(&self) -> u32 {
        self.script.lock().live_handles
    }

    pub fn fail_next_inits(&self, n: u32) {
        self.script.lock().fail_inits = n;
    }

    pub fn skip_next_frames(&self, n: u32) {
        self.script.lock().skip_frames = n;
    }

    pub fn fail_next_frames(&self, n: u32, err: RenderError) {
        let mut s = self.script.lock();
        s.fail_frames = n;
        s.frame_error = Some(err);
    }
}

impl RenderBackend for RecordingBackend {
    fn initialize(
        &mut self,
        capability: CapabilityLevel,
    ) -> Result<Box<dyn BackendHandle>, BackendInitError> {
        let mut s = self.script.lock();
        s.calls.inits.push(capability);
        if s.fail_inits > 0 {
            s.fail_inits -= 1;
            return Err(BackendInitError::new("scripted init failure"));
        }
        s.live_handles += 1;
        assert!(s.live_handles <= 1, "more than one live handle");
        Ok(Box::new(RecordingHandle {
            script: Arc::clone(&self.script),
            torn_down: false,
        }))
    }
}

struct RecordingHandle {
    script: Arc<Mutex<Script>>,
    torn_down: bool,
}

impl BackendHandle for RecordingHandle {
    fn resize(&mut self, size: Dimensions) {
        assert!(!self.torn_down, "resize after teardown");
        self.script.lock().calls.resizes.push(size);
    }

    fn render_frame(&mut self, time: FrameTime) -> Result<FrameStatus, RenderError> {
        assert!(!self.torn_down, "render after teardown");
        let mut s = self.script.lock();
        if s.fail_frames > 0 {
            s.fail_frames -= 1;
            return Err(s.frame_error.clone().unwrap_or(RenderError::Timeout));
        }
        if s.skip_frames > 0 {
            s.skip_frames -= 1;
            s.calls.skipped += 1;
            return Ok(FrameStatus::Skipped);
        }
        s.calls.frames += 1;
        s.calls.frame_indices.push(time.frame_index);
        Ok(FrameStatus::Presented)
    }

    fn teardown(&mut self) {
        assert!(!self.torn_down, "double teardown");
        self.torn_down = true;
        let mut s = self.script.lock();
        s.calls.teardowns += 1;
        s.live_handles -= 1;
    }
}
