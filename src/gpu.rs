//! # GPU Management Module
//!
//! The `gpu` module sets up and owns the core `wgpu` objects: the surface bound to the window,
//! the logical device and its queue, and the surface configuration.
//!
//! ## Overview
//!
//! [`Gpu::new_async`] walks the usual initialization chain and turns every failure into an
//! error instead of a panic, because a machine without a usable OpenGL driver is an expected
//! startup failure for this program:
//!
//! 1. Create an instance limited to the configured backends (OpenGL by default).
//! 2. Create a surface for the window.
//! 3. Request an adapter that can present to that surface.
//! 4. Request a device with GL-class limits.
//! 5. Configure the surface.
//!
//! ## Features
//!
//! - **Surface Resizing**: [`Gpu::resize`] reconfigures the swap chain, deferring zero sizes.
//! - **Depth/Stencil Texture Creation**: [`Gpu::create_depth_texture`] builds the
//!   depth-stencil attachment matching the current surface size.
//! - **Frame Acquisition**: [`Gpu::acquire_frame`] classifies surface errors into a
//!   [`FrameAcquireError`].

use anyhow::Context;

use crate::config::AppConfig;

/// Format of the depth-stencil attachment. It gives the surface a depth buffer and a stencil
/// buffer, like the GL default framebuffer the program used to request.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// The GPU resources tied to one window.
pub struct Gpu {
    /// The surface presenting into the window.
    pub surface: wgpu::Surface<'static>,

    /// The logical device every resource is created on.
    pub device: wgpu::Device,

    /// The queue uniform writes and command buffers are submitted to.
    pub queue: wgpu::Queue,

    /// The active swap chain configuration.
    ///
    /// Width and height are never zero; a zero-sized resize leaves the last valid size in place.
    pub surface_config: wgpu::SurfaceConfiguration,

    /// Color format of the surface textures.
    pub surface_format: wgpu::TextureFormat,
}

/// Why a frame could not be acquired.
#[derive(Debug)]
pub enum FrameAcquireError {
    /// The surface was reconfigured; the next frame should succeed.
    Reconfigured,
    /// Transient problem; skip this frame.
    Skip(wgpu::SurfaceError),
    /// The device cannot continue.
    Fatal(wgpu::SurfaceError),
}

impl Gpu {
    /// Reconfigures the surface for a new size in physical pixels.
    ///
    /// `wgpu` cannot configure a zero-sized surface, so such requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Creates a depth-stencil texture view of the given size.
    pub fn create_depth_texture(&self, width: u32, height: u32) -> wgpu::TextureView {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Acquires the next surface texture.
    ///
    /// Lost and outdated surfaces are reconfigured on the spot. Timeouts and unknown errors skip
    /// the frame, and running out of memory is fatal.
    pub fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, FrameAcquireError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                Err(FrameAcquireError::Reconfigured)
            }
            Err(err @ wgpu::SurfaceError::OutOfMemory) => Err(FrameAcquireError::Fatal(err)),
            Err(err) => Err(FrameAcquireError::Skip(err)),
        }
    }

    /// Initializes the GPU for `window`, which must already be `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Fails when the surface cannot be created, no adapter of the configured backends can
    /// present to it, or the device request is rejected.
    pub async fn new_async(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        config: &AppConfig,
    ) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create a rendering surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| {
                format!(
                    "no GPU adapter for backends {:?} can present to this window",
                    config.backends
                )
            })?;

        let adapter_info = adapter.get_info();
        log::info!(
            "GPU adapter: {} ({:?}, driver: {} {})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.driver,
            adapter_info.driver_info
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Quad Device"),
                    memory_hints: wgpu::MemoryHints::default(),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .context("failed to create the GPU device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        // vertex colors are written out unconverted
        let surface_format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("the surface reports no supported formats")?;

        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: config.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
        })
    }
}
