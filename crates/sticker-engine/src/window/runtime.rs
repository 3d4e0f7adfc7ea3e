use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::backend::{BackendRegistry, RenderBackend};
use crate::device::AdapterEnvironment;
use crate::host::{HostCallbacks, HostSurfaceAdapter};
use crate::surface::SurfaceState;

static BACKENDS: BackendRegistry<Arc<Window>> = BackendRegistry::new();

/// Registers the backend factory used for every surface the runtime creates.
///
/// Call once at process start, before [`Runtime::run`]. Returns `false` if a
/// factory was already registered.
pub fn register_backend<F>(factory: F) -> bool
where
    F: Fn(Arc<Window>) -> Box<dyn RenderBackend> + Send + Sync + 'static,
{
    BACKENDS.register(factory)
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Reported graphics API version (`major << 16 | minor`) to use instead of
    /// querying the adapter.
    pub api_version_override: Option<u32>,

    /// How many times surface creation is attempted before giving up.
    pub create_attempts: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "sticker".to_string(),
            initial_size: LogicalSize::new(720.0, 720.0),
            api_version_override: None,
            create_attempts: 3,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window and drives its surface until the window closes.
    pub fn run(config: RuntimeConfig) -> Result<()> {
        anyhow::ensure!(
            BACKENDS.is_registered(),
            "no render backend registered; call window::register_backend first"
        );

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct RuntimeState {
    config: RuntimeConfig,
    window: Option<Arc<Window>>,
    /// Adapter for the current surface instance. Replaced on every resume
    /// after the previous surface was destroyed.
    surface: Option<HostSurfaceAdapter>,
    error: Option<anyhow::Error>,
}

impl RuntimeState {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            window: None,
            surface: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.destroy_surface();
        event_loop.exit();
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        if let Some(window) = &self.window {
            return Ok(Arc::clone(window));
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window = Some(Arc::clone(&window));
        Ok(window)
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = self.ensure_window(event_loop)?;

        let backend = BACKENDS.create(Arc::clone(&window))?;
        let env = AdapterEnvironment::new().with_override(self.config.api_version_override);
        let mut surface = HostSurfaceAdapter::new(Box::new(env), backend);

        let attempts = self.config.create_attempts.max(1);
        for attempt in 1..=attempts {
            surface.on_surface_created();
            if surface.state() != SurfaceState::Uninitialized {
                break;
            }
            log::warn!("surface creation attempt {attempt}/{attempts} failed");
        }
        anyhow::ensure!(
            surface.state() == SurfaceState::Ready,
            "surface could not be created after {attempts} attempts"
        );

        let PhysicalSize { width, height } = window.inner_size();
        surface.on_surface_changed(width, height);

        self.surface = Some(surface);
        window.request_redraw();
        Ok(())
    }

    fn destroy_surface(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.on_surface_destroyed();
        }
    }

    fn surface_is_live(&self) -> bool {
        self.surface
            .as_ref()
            .is_some_and(|s| s.state().is_live())
    }
}

impl ApplicationHandler for RuntimeState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface_is_live() {
            return;
        }
        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e.context("failed to create surface"));
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // The native surface goes away on suspend (Android); a new one is
        // created on the next resume.
        log::debug!("suspended; destroying surface");
        self.destroy_surface();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw while the surface is live; the sticker animates.
        if self.surface_is_live() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref().map(Arc::clone) else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.destroy_surface();
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.on_surface_changed(width, height);
                }
                window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let PhysicalSize { width, height } = window.inner_size();
                if let Some(surface) = self.surface.as_mut() {
                    surface.on_surface_changed(width, height);
                }
                window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.on_draw_frame();
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(surface) = &self.surface {
            let stats = surface.stats();
            log::info!(
                "exiting: {} frames rendered, {} skipped, {} dropped",
                stats.rendered,
                stats.skipped,
                stats.dropped
            );
        }
        self.destroy_surface();
    }
}
