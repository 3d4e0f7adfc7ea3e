use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::backend::{BackendHandle, BackendInitError, FrameStatus, RenderBackend, RenderError};
use crate::capability::CapabilityLevel;
use crate::render::{RenderCtx, RenderTarget, StickerRenderer};
use crate::surface::Dimensions;
use crate::time::FrameTime;

use super::init::limits_for;
use super::surface;
use super::{GpuFrame, GpuInit};

/// wgpu backend bound to one window.
///
/// Every `initialize` builds a fresh [`Gpu`] (instance, surface, device) at
/// the requested capability level.
pub struct WgpuBackend {
    window: Arc<Window>,
    init: GpuInit,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, init: GpuInit) -> Self {
        Self { window, init }
    }
}

impl RenderBackend for WgpuBackend {
    fn initialize(
        &mut self,
        capability: CapabilityLevel,
    ) -> Result<Box<dyn BackendHandle>, BackendInitError> {
        let gpu = pollster::block_on(Gpu::new(
            Arc::clone(&self.window),
            self.init.clone(),
            capability,
        ))?;
        Ok(Box::new(gpu))
    }
}

/// Owns wgpu core objects, the surface configuration and the sticker renderer.
///
/// This type is the backend handle of a live surface:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames, draws the sticker and presents
pub struct Gpu {
    /// Window the surface presents to; must outlive the surface.
    window: Arc<Window>,

    /// wgpu instance used to create the adapter and surface.
    _instance: wgpu::Instance,

    /// Surface bound to the window.
    surface: wgpu::Surface<'static>,

    /// Selected adapter.
    _adapter: wgpu::Adapter,

    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: Dimensions,

    clear_color: wgpu::Color,
    sticker: StickerRenderer,
    torn_down: bool,
}

impl Gpu {
    /// Creates a GPU context for `window` at `capability`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit, capability: CapabilityLevel) -> Result<Self> {
        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            desired_maximum_frame_latency,
            clear_color,
            sticker,
        } = init;

        let inner = window.inner_size();
        let size = Dimensions::new(inner.width, inner.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sticker device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits_for(capability, adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .with_context(|| format!("failed to create wgpu device at {capability} capability"))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        // A zero-sized window cannot be configured; wait for the first resize.
        if !size.is_empty() {
            surface.configure(&device, &config);
        }

        let info = adapter.get_info();
        log::info!(
            "wgpu device ready: {} ({:?}), format {:?}, {capability} capability",
            info.name,
            info.backend,
            format
        );

        Ok(Self {
            window,
            _instance: instance,
            surface,
            _adapter: adapter,
            device,
            queue,
            config,
            size,
            clear_color,
            sticker: StickerRenderer::new(sticker),
            torn_down: false,
        })
    }

    /// Acquires the next surface texture and creates an encoder.
    fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sticker frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands; presenting happens when the surface
    /// texture is dropped.
    fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        drop(frame.surface_texture);
    }

    fn clear(&self, frame: &mut GpuFrame) {
        let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sticker clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}

impl BackendHandle for Gpu {
    fn resize(&mut self, size: Dimensions) {
        if self.torn_down {
            return;
        }
        self.size = size;
        surface::apply_resize(&self.surface, &self.device, &mut self.config, size);
    }

    fn render_frame(&mut self, time: FrameTime) -> std::result::Result<FrameStatus, RenderError> {
        if self.torn_down {
            return Err(RenderError::Other("backend torn down".to_string()));
        }
        // Nothing to present to while minimized.
        if self.size.is_empty() {
            return Ok(FrameStatus::Skipped);
        }

        let mut frame = match self.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return Err(surface::map_surface_error(
                    &self.surface,
                    &self.device,
                    &self.config,
                    self.size,
                    err,
                ));
            }
        };

        self.clear(&mut frame);

        let ctx = RenderCtx::new(&self.device, &self.queue, self.config.format, self.size);
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.sticker.render(&ctx, &mut target, time);
        }

        self.window.pre_present_notify();
        self.submit(frame);
        Ok(FrameStatus::Presented)
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.sticker.release();
        log::debug!("wgpu surface resources released");
    }
}
