//! # Frame Driver
//!
//! The frame driver owns everything the renderer needs between events: the mesh, the camera
//! constants, the current viewport and projection, and the lifecycle state. Window events are
//! translated into [`FrameEvent`]s by the application and fed through a single entry point,
//! [`FrameDriver::handle_event`].
//!
//! ## Events
//!
//! - [`FrameEvent::Resize`]: recompute the projection, push it to the `projMatr` uniform and
//!   move the viewport to `(0, 0, width, height)`.
//! - [`FrameEvent::Tick`]: clear, draw the mesh once with indexed drawing, present, and request
//!   the next tick.
//! - [`FrameEvent::Key`] with [`Key::Escape`], or [`FrameEvent::Close`]: shut down. Once shut
//!   down, the driver ignores everything else it is given.
//!
//! ## Diagnostics
//!
//! Every accepted resize logs the projection line (see [`Projection`]) at `info` under the
//! [`DIAGNOSTICS_TARGET`] log target. [`init_logging`](crate::init_logging) keeps that target
//! enabled whatever filter is in effect, so the line always reaches standard output, carrying
//! the logger's usual timestamp and level prefix.
//!
//! ## GPU Seam
//!
//! The driver never talks to `wgpu` directly. It issues its commands through the
//! [`FrameTarget`] trait, which the [`Renderer`](crate::Renderer) implements on top of the GPU
//! and which tests implement with a recorder.

use crate::logging::DIAGNOSTICS_TARGET;
use crate::mesh::Mesh;
use crate::projection::{Projection, ProjectionParams};

/// Clear color applied at the start of every frame: blue, zero alpha.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
    a: 0.0,
};

/// Depth value the depth buffer is cleared to at the start of every frame.
pub const CLEAR_DEPTH: f32 = 1.0;

/// A rectangle of the render target, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// A viewport covering a whole `width` x `height` target.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Returns `true` when the viewport covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything a target needs to record and present one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPass {
    pub clear_color: wgpu::Color,
    pub clear_depth: f32,
    pub viewport: Viewport,
    /// Indices consumed by the single indexed draw.
    pub index_count: u32,
    /// Vertices available to the draw.
    pub vertex_count: u32,
}

/// Keys the driver distinguishes. `Escape` is the key with ASCII code 27.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl From<winit::keyboard::KeyCode> for Key {
    fn from(code: winit::keyboard::KeyCode) -> Self {
        match code {
            winit::keyboard::KeyCode::Escape => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Input to [`FrameDriver::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// The drawable area changed size (physical pixels).
    Resize { width: u32, height: u32 },
    /// One display refresh.
    Tick,
    /// A key was pressed.
    Key(Key),
    /// The window was asked to close.
    Close,
}

/// What the caller should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Shutdown,
}

/// Lifecycle of a [`FrameDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No usable resize has arrived yet, so there is no projection to draw with.
    AwaitingResize,
    /// A projection is in place and ticks draw frames.
    Running,
    /// Terminal. All further events are ignored.
    Shutdown,
}

/// The GPU-facing side of the frame driver.
///
/// Calls arrive in a fixed order: `upload_mesh` once at construction, then any sequence of
/// `set_projection`/`set_viewport` pairs and `draw`/`request_redraw` pairs.
pub trait FrameTarget {
    /// Uploads the static mesh into GPU buffers.
    fn upload_mesh(&mut self, mesh: &Mesh);

    /// Writes the projection matrix into the shader's `projMatr` uniform.
    fn set_projection(&mut self, matrix: &nalgebra_glm::Mat4);

    /// Sets the viewport transform used by subsequent draws.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clears, draws the mesh once and presents the frame.
    ///
    /// Transient presentation problems should be absorbed by the target. An `Err` means the
    /// target cannot render any more and shuts the driver down.
    fn draw(&mut self, pass: &DrawPass) -> anyhow::Result<()>;

    /// Schedules the next tick.
    fn request_redraw(&self);
}

/// Single owner of the renderer state, driven by [`FrameEvent`]s.
pub struct FrameDriver<T: FrameTarget> {
    target: T,
    mesh: Mesh,
    params: ProjectionParams,
    viewport: Option<Viewport>,
    projection: Option<Projection>,
    state: DriverState,
}

impl<T: FrameTarget> FrameDriver<T> {
    /// Creates a driver and uploads `mesh` to `target`.
    pub fn new(mut target: T, mesh: Mesh, params: ProjectionParams) -> Self {
        target.upload_mesh(&mesh);
        Self {
            target,
            mesh,
            params,
            viewport: None,
            projection: None,
            state: DriverState::AwaitingResize,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The projection computed by the last accepted resize.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Dispatches one event and reports whether the caller should keep running.
    pub fn handle_event(&mut self, event: FrameEvent) -> Flow {
        if self.state == DriverState::Shutdown {
            return Flow::Shutdown;
        }

        match event {
            FrameEvent::Resize { width, height } => self.resize(width, height),
            FrameEvent::Tick => self.tick(),
            FrameEvent::Key(Key::Escape) => {
                log::info!("Escape pressed. Exiting...");
                self.shutdown();
            }
            FrameEvent::Key(Key::Other) => {}
            FrameEvent::Close => {
                log::info!("Close requested. Exiting...");
                self.shutdown();
            }
        }

        match self.state {
            DriverState::Shutdown => Flow::Shutdown,
            _ => Flow::Continue,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::full(width, height);
        if viewport.is_empty() {
            // Minimized windows report a zero size; the projection is undefined for it.
            log::debug!("Ignoring resize to ({width}, {height})");
            return;
        }

        let projection = self.params.project(width, height);
        log::info!(target: DIAGNOSTICS_TARGET, "{projection}");

        self.target.set_projection(&projection.matrix);
        self.target.set_viewport(viewport);

        self.projection = Some(projection);
        self.viewport = Some(viewport);
        self.state = DriverState::Running;
    }

    fn tick(&mut self) {
        if let (DriverState::Running, Some(viewport)) = (self.state, self.viewport) {
            let pass = DrawPass {
                clear_color: CLEAR_COLOR,
                clear_depth: CLEAR_DEPTH,
                viewport,
                index_count: self.mesh.index_count(),
                vertex_count: self.mesh.vertex_count(),
            };

            if let Err(err) = self.target.draw(&pass) {
                log::error!("Rendering failed: {err:#}");
                self.shutdown();
                return;
            }
        } else {
            log::debug!("Tick before the first resize; nothing to draw");
        }

        self.target.request_redraw();
    }

    fn shutdown(&mut self) {
        self.state = DriverState::Shutdown;
    }
}
