//! # `renderer.rs` - Renderer Module
//!
//! The `renderer.rs` module contains the `Renderer` struct, the `wgpu` implementation of the
//! [`FrameTarget`] seam the frame driver renders through.
//!
//! ## Key Features
//!
//! - **GPU Management**: The `Renderer` owns the [`Gpu`] (surface, device, queue) for the window.
//!
//! - **Depth Buffering**: A depth-stencil texture matching the surface size is cleared every
//!   frame and recreated on every resize.
//!
//! - **Scene Integration**: The [`Scene`] holds the mesh buffers, the `projMatr` uniform and the
//!   pipeline; the renderer wraps each draw of it in a render pass and presents the result.
//!
//! ## Frame Flow
//!
//! For every [`DrawPass`] the renderer:
//! 1. Acquires the next surface texture, skipping the frame on transient surface errors.
//! 2. Begins a render pass that clears color and depth to the values in the pass.
//! 3. Sets the viewport and records the scene's indexed draw.
//! 4. Submits the commands and presents the texture.

use std::sync::Arc;

use anyhow::Context;
use winit::window::Window;

use crate::config::AppConfig;
use crate::frame::{DrawPass, FrameTarget, Viewport};
use crate::gpu::{FrameAcquireError, Gpu};
use crate::mesh::Mesh;
use crate::scene::Scene;

/// Renders the scene into a window.
///
/// # Fields
///
/// - `window`: the window presented into, also used to request redraws.
/// - `gpu`: surface, device and queue.
/// - `depth_texture_view`: the depth-stencil attachment for the current surface size.
/// - `scene`: mesh buffers, uniform and pipeline.
pub struct Renderer {
    window: Arc<Window>,
    gpu: Gpu,
    depth_texture_view: wgpu::TextureView,
    scene: Scene,
}

impl Renderer {
    /// Creates a renderer for `window`, initializing the GPU and building the pipeline.
    ///
    /// # Errors
    ///
    /// Any failure from [`Gpu::new_async`] or [`Scene::new`]; all of them are fatal at startup.
    pub async fn new(window: Arc<Window>, config: &AppConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let gpu = Gpu::new_async(window.clone(), size.width, size.height, config)
            .await
            .context("GPU initialization failed")?;

        let depth_texture_view =
            gpu.create_depth_texture(gpu.surface_config.width, gpu.surface_config.height);

        let scene = Scene::new(&gpu.device, gpu.surface_format)
            .await
            .context("shader setup failed")?;

        Ok(Self {
            window,
            gpu,
            depth_texture_view,
            scene,
        })
    }

    /// The viewport clamped to the surface, in the form `RenderPass::set_viewport` expects.
    fn viewport_rect(&self, viewport: Viewport) -> (f32, f32, f32, f32) {
        let surface_width = self.gpu.surface_config.width;
        let surface_height = self.gpu.surface_config.height;
        let x = viewport.x.min(surface_width - 1);
        let y = viewport.y.min(surface_height - 1);
        let width = viewport.width.clamp(1, surface_width - x);
        let height = viewport.height.clamp(1, surface_height - y);
        (x as f32, y as f32, width as f32, height as f32)
    }
}

impl FrameTarget for Renderer {
    fn upload_mesh(&mut self, mesh: &Mesh) {
        self.scene.upload_mesh(&self.gpu.device, mesh);
    }

    fn set_projection(&mut self, matrix: &nalgebra_glm::Mat4) {
        self.scene.update_projection(&self.gpu.queue, matrix);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.gpu.resize(viewport.width, viewport.height);
        self.depth_texture_view = self
            .gpu
            .create_depth_texture(self.gpu.surface_config.width, self.gpu.surface_config.height);
    }

    fn draw(&mut self, pass: &DrawPass) -> anyhow::Result<()> {
        let surface_texture = match self.gpu.acquire_frame() {
            Ok(texture) => texture,
            Err(FrameAcquireError::Reconfigured) => {
                log::debug!("Surface reconfigured; skipping frame");
                return Ok(());
            }
            Err(FrameAcquireError::Skip(err)) => {
                log::warn!("Skipping frame: {err}");
                return Ok(());
            }
            Err(FrameAcquireError::Fatal(err)) => {
                anyhow::bail!("cannot acquire a surface texture: {err}");
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.gpu.surface_format),
                ..Default::default()
            });

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let (x, y, width, height) = self.viewport_rect(pass.viewport);

        // The render pass borrows the encoder; it has to end before `finish()`.
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(pass.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(pass.clear_depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_viewport(x, y, width, height, 0.0, 1.0);
            self.scene.render(&mut render_pass, pass.index_count);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
