//! # Scene
//!
//! The `scene` module holds the GPU resources needed to draw the quad: its vertex and index
//! buffers, the `projMatr` uniform binding, and the render pipeline tying them to the shader.
//!
//! ## Overview
//!
//! - [`Scene::new`] compiles the shader and builds the pipeline. Compilation and validation
//!   errors are captured with an error scope and returned, so a broken shader stops the program
//!   with a diagnostic rather than rendering nothing.
//! - [`Scene::upload_mesh`] creates the vertex and index buffers once.
//! - [`Scene::update_projection`] rewrites the uniform.
//! - [`Scene::render`] binds everything and issues the single indexed draw.
//!
//! ## Vertex Buffer Slots
//!
//! The vertex buffer holds the positions block followed by the colors block (see
//! [`crate::mesh`]). Slot 0 is bound to the positions range and slot 1 to the colors range of
//! the same buffer, which lines up with `@location(0)` and `@location(1)` in the shader.

use anyhow::Context;

use crate::gpu::DEPTH_FORMAT;
use crate::mesh::{Mesh, VertexData};
use crate::uniform_binding::UniformBinding;
use crate::uniform_buffer::UniformBuffer;
use crate::SHADER_SOURCE;

/// The mesh once it lives in GPU memory.
pub struct MeshBuffers {
    /// Positions block followed by colors block.
    pub vertex_buffer: wgpu::Buffer,

    /// 16-bit triangle list indices.
    pub index_buffer: wgpu::Buffer,

    /// Number of indices in `index_buffer`.
    pub index_count: u32,
}

/// GPU state for drawing the quad.
///
/// # Fields
///
/// - `mesh`: the uploaded buffers, `None` until [`Scene::upload_mesh`] runs.
/// - `uniform`: the `projMatr` uniform buffer and bind group.
/// - `pipeline`: the render pipeline built from [`SHADER_SOURCE`].
pub struct Scene {
    pub mesh: Option<MeshBuffers>,
    pub uniform: UniformBinding,
    pub pipeline: wgpu::RenderPipeline,
}

impl Scene {
    /// Creates the uniform binding and the render pipeline.
    ///
    /// # Errors
    ///
    /// Returns the validation error reported by the device if the shader fails to compile or
    /// the pipeline fails to link against it.
    pub async fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> anyhow::Result<Self> {
        let uniform = UniformBinding::new(device);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = Self::create_pipeline(device, surface_format, &uniform);
        if let Some(err) = device.pop_error_scope().await {
            return Err(anyhow::anyhow!("{err}")).context("failed to build the render pipeline");
        }

        Ok(Self {
            mesh: None,
            uniform,
            pipeline,
        })
    }

    /// Uploads the mesh into freshly created vertex and index buffers.
    pub fn upload_mesh(&mut self, device: &wgpu::Device, mesh: &Mesh) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: mesh.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: mesh.index_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.mesh = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        });
    }

    /// Writes a new projection matrix into the `projMatr` uniform.
    pub fn update_projection(&self, queue: &wgpu::Queue, matrix: &nalgebra_glm::Mat4) {
        self.uniform.update_buffer(queue, UniformBuffer { proj_matr: *matrix });
    }

    /// Records the draw of `index_count` indices into `renderpass`.
    ///
    /// Does nothing if no mesh was uploaded. `index_count` is clamped to the uploaded index
    /// count.
    pub fn render<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>, index_count: u32) {
        let Some(mesh) = self.mesh.as_ref() else {
            log::warn!("No mesh uploaded; skipping draw");
            return;
        };

        renderpass.set_pipeline(&self.pipeline);
        renderpass.set_bind_group(0, &self.uniform.bind_group, &[]);

        renderpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(VertexData::position_range()));
        renderpass.set_vertex_buffer(1, mesh.vertex_buffer.slice(VertexData::color_range()));
        renderpass.set_index_buffer(mesh.index_buffer.slice(..), Mesh::INDEX_FORMAT);

        renderpass.draw_indexed(0..index_count.min(mesh.index_count), 0, 0..1);
    }

    /// Creates the render pipeline.
    ///
    /// - Triangle list topology; the quad is two independent triangles.
    /// - No face culling and no blending.
    /// - Depth test `LessEqual` with depth writes against [`DEPTH_FORMAT`].
    fn create_pipeline(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        uniform: &UniformBinding,
    ) -> wgpu::RenderPipeline {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER_SOURCE)),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&uniform.bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = VertexData::buffer_layouts();

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vertex_main"),
                buffers: &vertex_buffers, // slot 0 positions, slot 1 colors
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fragment_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        })
    }
}
