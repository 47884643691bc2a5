//! # Uniform Buffer
//!
//! This module defines the `UniformBuffer` struct, the CPU-side image of the uniform block the
//! vertex shader reads. It holds a single value: the perspective projection matrix, exposed to
//! WGSL as `projMatr`.
//!
//! ## Memory Layout and Traits
//!
//! - `#[repr(C)]`: keeps the field order and layout identical to the WGSL `mat4x4<f32>`.
//! - `bytemuck::Pod` and `bytemuck::Zeroable`: allow the struct to be written to the GPU buffer
//!   as raw bytes. `nalgebra_glm::Mat4` supports both through the `convert-bytemuck` feature.
//!
//! The matrix is stored column-major, which is also how WGSL lays out `mat4x4<f32>`, so no
//! transposition happens on upload.
//!
//! ## Example Usage
//!
//! ```rust
//! use quad_core::{compute_projection, UniformBuffer};
//!
//! let uniform = UniformBuffer {
//!     proj_matr: compute_projection(600, 600, 90.0, 0.2, 1000.0).matrix,
//! };
//! let raw_data: &[u8] = bytemuck::bytes_of(&uniform);
//! assert_eq!(raw_data.len(), 64);
//! ```

/// The uniform block bound at group 0, binding 0.
///
/// A default instance holds the zero matrix, which leaves everything degenerate until the first
/// resize writes a real projection.
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBuffer {
    /// The perspective projection matrix (`projMatr` in the shader).
    pub proj_matr: nalgebra_glm::Mat4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_wgsl_mat4_size() {
        assert_eq!(std::mem::size_of::<UniformBuffer>(), 64);
    }

    #[test]
    fn bytes_are_column_major() {
        let matrix = nalgebra_glm::Mat4::from_column_slice(&[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        let uniform = UniformBuffer { proj_matr: matrix };
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniform));
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[3], 4.0);
        assert_eq!(floats[4], 5.0);
        assert_eq!(floats[15], 16.0);
    }
}
