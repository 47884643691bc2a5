//! # Quad Renderer Library
//!
//! This library opens a window and draws a single colored quad through a perspective
//! projection, rendered with `wgpu` on its OpenGL backend. It is organized into small modules:
//! pure math and geometry at the bottom, the frame driver in the middle, and the GPU and window
//! plumbing on top.
//!
//! ## Modules
//!
//! - [`projection`]: Derives the perspective matrix for a viewport size, field of view and clipping planes.
//! - [`mesh`]: Defines the quad's vertices (positions block, then colors block) and its indices.
//! - [`frame`]: The frame driver: reacts to resize, tick, key and close events through the [`FrameTarget`] seam.
//! - [`renderer`]: Implements [`FrameTarget`] on top of the GPU: render passes, depth buffer, presentation.
//! - [`gpu`]: Initializes and manages the surface, device, queue and surface configuration.
//! - [`scene`]: Holds the mesh buffers, the `projMatr` uniform and the render pipeline.
//! - [`uniform_buffer`] and [`uniform_binding`]: The uniform's CPU layout and its GPU binding.
//! - [`app`]: Creates the window and feeds `winit` events into the frame driver.
//! - [`config`] and [`logging`]: Startup configuration and logger setup.
//!
//! ## Constants
//!
//! ### [`SHADER_SOURCE`]
//!
//! The WGSL source for the vertex and fragment stages. The vertex stage multiplies every
//! position by `projMatr`; the fragment stage outputs the interpolated vertex color.
//!
//! ## Usage
//!
//! The binary does little more than this:
//!
//! ```no_run
//! use quad_core::{init_logging, run, AppConfig, LoggingConfig};
//!
//! init_logging(LoggingConfig::default());
//! if let Err(err) = run(AppConfig::from_env()) {
//!     eprintln!("Error: {err:#}");
//!     std::process::exit(1);
//! }
//! ```
//!
//! The frame logic can be exercised without a GPU by implementing [`FrameTarget`]:
//!
//! ```rust
//! use quad_core::{DrawPass, Flow, FrameDriver, FrameEvent, FrameTarget, Key, Mesh, ProjectionParams, Viewport};
//!
//! struct Headless;
//!
//! impl FrameTarget for Headless {
//!     fn upload_mesh(&mut self, _mesh: &Mesh) {}
//!     fn set_projection(&mut self, _matrix: &nalgebra_glm::Mat4) {}
//!     fn set_viewport(&mut self, _viewport: Viewport) {}
//!     fn draw(&mut self, _pass: &DrawPass) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!     fn request_redraw(&self) {}
//! }
//!
//! let mut driver = FrameDriver::new(Headless, Mesh::QUAD, ProjectionParams::default());
//! driver.handle_event(FrameEvent::Resize { width: 600, height: 600 });
//! assert_eq!(driver.handle_event(FrameEvent::Tick), Flow::Continue);
//! assert_eq!(driver.handle_event(FrameEvent::Key(Key::Escape)), Flow::Shutdown);
//! ```
//!
//! ## Dependencies
//!
//! - `wgpu`: GPU access, pipelines and buffers.
//! - `winit`: Window creation and event handling.
//! - `nalgebra-glm`: The projection matrix.
//! - `bytemuck`: Byte views of vertex and uniform data.
//! - `log` and `env_logger`: Logging.
//! - `anyhow`: Startup and rendering errors.
//! - `pollster`: Blocking on the asynchronous GPU initialization.

pub mod app;
pub mod config;
pub mod frame;
pub mod gpu;
pub mod logging;
pub mod mesh;
pub mod projection;
pub mod renderer;
pub mod scene;
pub mod uniform_binding;
pub mod uniform_buffer;

pub use crate::app::{run, App};
pub use crate::config::{parse_backends, AppConfig, WindowConfig, BACKEND_ENV};
pub use crate::frame::{
    DrawPass, DriverState, Flow, FrameDriver, FrameEvent, FrameTarget, Key, Viewport, CLEAR_COLOR,
    CLEAR_DEPTH,
};
pub use crate::gpu::Gpu;
pub use crate::logging::{init_logging, LogTarget, LoggingConfig, DIAGNOSTICS_TARGET};
pub use crate::mesh::{Mesh, VertexData};
pub use crate::projection::{compute_projection, Projection, ProjectionParams};
pub use crate::renderer::Renderer;
pub use crate::scene::Scene;
pub use crate::uniform_binding::UniformBinding;
pub use crate::uniform_buffer::UniformBuffer;

/// The WGSL source of the quad shader.
///
/// ### Uniform
///
/// - `@group(0) @binding(0) projMatr`: the 4x4 projection matrix, column-major.
///
/// ### Vertex Stage
///
/// `vertex_main` reads `@location(0) position` and `@location(1) color`, both `vec4<f32>`, and
/// emits `projMatr * position` with its depth remapped from `[-1, 1]` to `[0, 1]`.
///
/// ### Fragment Stage
///
/// `fragment_main` returns the interpolated color.
pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_shader() -> naga::Module {
        let module = naga::front::wgsl::parse_str(SHADER_SOURCE)
            .unwrap_or_else(|err| panic!("{}", err.emit_to_string(SHADER_SOURCE)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("shader should validate");
        module
    }

    fn vec4_f32() -> naga::TypeInner {
        naga::TypeInner::Vector {
            size: naga::VectorSize::Quad,
            scalar: naga::Scalar::F32,
        }
    }

    #[test]
    fn shader_declares_proj_matr_uniform() {
        let module = parse_shader();
        let (_, global) = module
            .global_variables
            .iter()
            .find(|(_, global)| global.name.as_deref() == Some("projMatr"))
            .expect("projMatr global");

        assert_eq!(global.space, naga::AddressSpace::Uniform);
        assert_eq!(
            global.binding,
            Some(naga::ResourceBinding {
                group: 0,
                binding: 0
            })
        );
        assert_eq!(
            module.types[global.ty].inner,
            naga::TypeInner::Matrix {
                columns: naga::VectorSize::Quad,
                rows: naga::VectorSize::Quad,
                scalar: naga::Scalar::F32,
            }
        );
        assert_eq!(module.global_variables.len(), 1);
    }

    #[test]
    fn vertex_inputs_use_locations_zero_and_one() {
        let module = parse_shader();
        let entry = module
            .entry_points
            .iter()
            .find(|entry| entry.name == "vertex_main")
            .expect("vertex_main entry point");
        assert_eq!(entry.stage, naga::ShaderStage::Vertex);

        // Inputs are either bound arguments or members of a struct argument.
        let mut inputs = Vec::new();
        for argument in &entry.function.arguments {
            match (&argument.binding, &module.types[argument.ty].inner) {
                (Some(binding), inner) => inputs.push((binding.clone(), inner.clone())),
                (None, naga::TypeInner::Struct { members, .. }) => {
                    for member in members {
                        let binding = member.binding.clone().expect("bound struct member");
                        inputs.push((binding, module.types[member.ty].inner.clone()));
                    }
                }
                (None, other) => panic!("unbound vertex input of type {other:?}"),
            }
        }

        let mut locations: Vec<u32> = inputs
            .iter()
            .map(|(binding, inner)| {
                assert_eq!(*inner, vec4_f32());
                match binding {
                    naga::Binding::Location { location, .. } => *location,
                    naga::Binding::BuiltIn(builtin) => panic!("unexpected builtin {builtin:?}"),
                }
            })
            .collect();
        locations.sort_unstable();
        assert_eq!(locations, [0, 1]);
    }

    #[test]
    fn shader_has_both_stages() {
        let module = parse_shader();
        let stages: Vec<_> = module
            .entry_points
            .iter()
            .map(|entry| (entry.name.as_str(), entry.stage))
            .collect();
        assert!(stages.contains(&("vertex_main", naga::ShaderStage::Vertex)));
        assert!(stages.contains(&("fragment_main", naga::ShaderStage::Fragment)));
    }

    #[test]
    fn clip_depth_is_remapped_to_unit_range() {
        assert!(SHADER_SOURCE.contains("projMatr * vert.position"));
        assert!(SHADER_SOURCE.contains("(clip.z + clip.w) * 0.5"));
    }
}
