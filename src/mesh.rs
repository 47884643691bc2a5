//! # Mesh Module
//!
//! This module defines the static geometry drawn every frame: a quad made of four vertices and
//! six indices. Each vertex carries a homogeneous position and an RGBA color.
//!
//! # Memory Layout
//!
//! Unlike an interleaved vertex format, the backing buffer stores all positions first and all
//! colors after them:
//!
//! ```text
//! bytes   0..64   position[0] position[1] position[2] position[3]
//! bytes  64..128  color[0]    color[1]    color[2]    color[3]
//! ```
//!
//! Both blocks are tightly packed (`[f32; 4]` per entry, stride 16). The pipeline reads them
//! through two vertex buffer slots bound to sub-ranges of the same buffer:
//!
//! - slot 0, `@location(0)`: positions, [`VertexData::position_range`]
//! - slot 1, `@location(1)`: colors, [`VertexData::color_range`]
//!
//! # Crate Dependencies
//!
//! - `bytemuck` to view [`VertexData`] as raw bytes for the upload.
//! - `wgpu` for the attribute and buffer layout descriptions.

use std::ops::Range;

/// Vertex attributes read from buffer slot 0.
static POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

/// Vertex attributes read from buffer slot 1.
static COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];

/// The per-vertex data of a mesh, laid out as a positions block followed by a colors block.
///
/// The struct is `#[repr(C)]` and `Pod`, so [`bytemuck::bytes_of`] yields exactly the bytes the
/// vertex buffer is initialized with.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexData {
    /// Homogeneous positions `[x, y, z, w]`.
    pub positions: [[f32; 4]; 4],

    /// RGBA colors, one per position, each channel in `[0.0, 1.0]`.
    pub colors: [[f32; 4]; 4],
}

impl VertexData {
    /// Size in bytes of one attribute entry. Both blocks use it as their stride.
    pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;

    /// Byte range of the positions block inside the vertex buffer.
    pub fn position_range() -> Range<wgpu::BufferAddress> {
        let start = std::mem::offset_of!(VertexData, positions) as wgpu::BufferAddress;
        start..start + std::mem::size_of::<[[f32; 4]; 4]>() as wgpu::BufferAddress
    }

    /// Byte range of the colors block inside the vertex buffer.
    pub fn color_range() -> Range<wgpu::BufferAddress> {
        let start = std::mem::offset_of!(VertexData, colors) as wgpu::BufferAddress;
        start..start + std::mem::size_of::<[[f32; 4]; 4]>() as wgpu::BufferAddress
    }

    /// Returns the buffer layouts for slots 0 (positions) and 1 (colors).
    ///
    /// Each layout describes a single `Float32x4` attribute with a stride of
    /// [`VertexData::STRIDE`], so there are no gaps between consecutive entries.
    pub fn buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: Self::STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: Self::STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &COLOR_ATTRIBUTES,
            },
        ]
    }
}

/// Static geometry: vertex data plus the indices of the triangles built from it.
///
/// A mesh is immutable once created. The frame driver owns it and hands it to the GPU once,
/// at startup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Positions and colors.
    pub vertices: VertexData,

    /// Triangle list indices into `vertices`, read as 16-bit values.
    pub indices: [u16; 6],
}

impl Mesh {
    /// A quad spanning `[-1, 1]` in X and Y, two units in front of the camera.
    ///
    /// The two triangles fan out from the left-bottom corner: `0, 1, 2` and `0, 2, 3`.
    pub const QUAD: Mesh = Mesh {
        vertices: VertexData {
            positions: [
                [-1.0, -1.0, -2.0, 1.0], // left-bottom
                [-1.0, 1.0, -2.0, 1.0],  // left-top
                [1.0, 1.0, -2.0, 1.0],   // right-top
                [1.0, -1.0, -2.0, 1.0],  // right-bottom
            ],
            colors: [
                [1.0, 0.0, 0.0, 1.0], // red
                [0.0, 1.0, 0.0, 1.0], // green
                [1.0, 0.0, 1.0, 1.0], // purple
                [1.0, 1.0, 0.0, 1.0], // yellow
            ],
        },
        indices: [0, 1, 2, 0, 2, 3],
    };

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.positions.len() as u32
    }

    /// Number of indices consumed by one draw of the mesh.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// The bytes to upload into the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.vertices)
    }

    /// The bytes to upload into the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Format of the values in [`Mesh::index_bytes`].
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_counts() {
        assert_eq!(Mesh::QUAD.vertex_count(), 4);
        assert_eq!(Mesh::QUAD.index_count(), 6);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let mesh = Mesh::QUAD;
        assert!(mesh.indices.iter().all(|&i| u32::from(i) < mesh.vertex_count()));
    }

    #[test]
    fn positions_block_precedes_colors_block() {
        assert_eq!(VertexData::position_range(), 0..64);
        assert_eq!(VertexData::color_range(), 64..128);

        let mesh = Mesh::QUAD;
        let bytes = mesh.vertex_bytes();
        assert_eq!(bytes.len(), 128);

        let first_position: &[f32] = bytemuck::cast_slice(&bytes[0..16]);
        assert_eq!(first_position, &[-1.0_f32, -1.0, -2.0, 1.0]);

        let first_color: &[f32] = bytemuck::cast_slice(&bytes[64..80]);
        assert_eq!(first_color, &[1.0_f32, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn attribute_slots_are_tightly_packed() {
        let [positions, colors] = VertexData::buffer_layouts();

        assert_eq!(positions.array_stride, 16);
        assert_eq!(positions.attributes.len(), 1);
        assert_eq!(positions.attributes[0].shader_location, 0);
        assert_eq!(positions.attributes[0].offset, 0);
        assert_eq!(positions.attributes[0].format, wgpu::VertexFormat::Float32x4);

        assert_eq!(colors.array_stride, 16);
        assert_eq!(colors.attributes[0].shader_location, 1);
        assert_eq!(colors.attributes[0].offset, 0);
    }

    #[test]
    fn index_bytes_are_sixteen_bit() {
        let mesh = Mesh::QUAD;
        let indices: &[u16] = bytemuck::cast_slice(mesh.index_bytes());
        assert_eq!(indices, &[0_u16, 1, 2, 0, 2, 3]);
        assert_eq!(Mesh::INDEX_FORMAT, wgpu::IndexFormat::Uint16);
    }
}
