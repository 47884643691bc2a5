//! # Uniform Binding
//!
//! Owns the GPU side of the `projMatr` uniform: the buffer that holds a [`UniformBuffer`], the
//! bind group layout the pipeline is built against, and the bind group set before drawing.
//!
//! The buffer is created once and only ever rewritten in place through the queue, so the bind
//! group stays valid for the lifetime of the renderer.

use crate::uniform_buffer::UniformBuffer;

/// The projection uniform as seen by the GPU.
///
/// # Fields
///
/// - `buffer`: a `UNIFORM | COPY_DST` buffer sized for one [`UniformBuffer`].
/// - `bind_group`: binds `buffer` at binding 0 of group 0.
/// - `bind_group_layout`: describes that binding for the pipeline layout. The uniform is only
///   visible to the vertex stage.
pub struct UniformBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformBinding {
    /// Creates the buffer (zero-initialized), its layout and its bind group.
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("projMatr Uniform Buffer"),
                contents: bytemuck::cast_slice(&[UniformBuffer::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<UniformBuffer>() as wgpu::BufferAddress,
                    ),
                },
                count: None,
            }],
            label: Some("projMatr_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("projMatr_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Writes `uniform_buffer` into the GPU buffer.
    ///
    /// The write is queued and becomes visible to the next submitted frame.
    pub fn update_buffer(&self, queue: &wgpu::Queue, uniform_buffer: UniformBuffer) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform_buffer]));
    }
}
