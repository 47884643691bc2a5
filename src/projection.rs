//! # Projection
//!
//! This module derives the perspective projection matrix that the shader reads through the
//! `projMatr` uniform. It is a pure leaf: nothing here touches the GPU, and every value it
//! produces is fully determined by the viewport size, the vertical field of view and the
//! near/far clipping planes.
//!
//! ## Overview
//!
//! The matrix is the classic right-handed perspective projection. It maps the view frustum,
//! looking down the negative Z axis, onto clip space with a depth range of `[-1, 1]`:
//!
//! ```text
//! col0 = [ near/r, 0,      0,                      0 ]
//! col1 = [ 0,      near/t, 0,                      0 ]
//! col2 = [ 0,      0,      (far+near)/(near-far), -1 ]
//! col3 = [ 0,      0,      2*near*far/(near-far),  0 ]
//! ```
//!
//! where `t = near * tan(fov / 2)` is half the frustum height at the near plane and
//! `r = t * aspect` is half of its width.
//!
//! ## Degenerate Inputs
//!
//! [`compute_projection`] never fails. A zero height or a field of view of 0° or 180° simply
//! produces infinities or NaNs, so callers are expected to reject such viewports first. The
//! frame driver does this by ignoring zero-sized resize events.
//!
//! ## Example
//!
//! ```rust
//! use quad_core::compute_projection;
//!
//! let projection = compute_projection(600, 600, 90.0, 0.2, 1000.0);
//! assert_eq!(projection.aspect, 1.0);
//! assert_eq!(projection.matrix[(3, 2)], -1.0);
//! ```

use std::fmt;

/// The fixed camera constants a projection is derived from.
///
/// Only the viewport size changes at runtime; these three values stay the same for the
/// lifetime of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,

    /// Distance to the near clipping plane. Must be positive.
    pub near: f32,

    /// Distance to the far clipping plane. Must be greater than `near`.
    pub far: f32,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.2,
            far: 1000.0,
        }
    }
}

impl ProjectionParams {
    /// Computes the projection for a viewport of the given size in pixels.
    pub fn project(&self, width: u32, height: u32) -> Projection {
        compute_projection(width, height, self.fov_degrees, self.near, self.far)
    }
}

/// A computed perspective projection together with the intermediate values it was built from.
///
/// The intermediates are kept so the resize diagnostics can print them; the GPU only ever sees
/// [`Projection::matrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Vertical field of view, in radians.
    pub fov: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    /// Half the frustum height at the near plane.
    pub t: f32,
    /// Half the frustum width at the near plane.
    pub r: f32,
    /// The projection matrix, stored column-major.
    pub matrix: nalgebra_glm::Mat4,
}

/// Builds the perspective projection for a `width` x `height` viewport.
///
/// # Parameters
///
/// - `width`, `height`: viewport size in pixels. `height` must be non-zero.
/// - `fov_degrees`: vertical field of view, strictly between 0 and 180 degrees.
/// - `near`, `far`: clipping plane distances with `0 < near < far`.
///
/// # Returns
///
/// A [`Projection`] whose matrix follows the layout documented at the module level. The
/// result is a pure function of its inputs, so equal inputs always give bit-identical output.
pub fn compute_projection(
    width: u32,
    height: u32,
    fov_degrees: f32,
    near: f32,
    far: f32,
) -> Projection {
    let fov = fov_degrees.to_radians();
    let aspect = width as f32 / height as f32;
    let t = near * (fov / 2.0).tan();
    let r = t * aspect;

    #[rustfmt::skip]
    let matrix = nalgebra_glm::Mat4::from_column_slice(&[
        near / r, 0.0,      0.0,                         0.0,
        0.0,      near / t, 0.0,                         0.0,
        0.0,      0.0,      (far + near) / (near - far), -1.0,
        0.0,      0.0,      2.0 * near * far / (near - far), 0.0,
    ]);

    Projection {
        near,
        far,
        fov,
        aspect,
        t,
        r,
        matrix,
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={:.1}  f={:.1}  fov={:.2}  aspect={:.2}  t={:.2}  r={:.2}",
            self.near, self.far, self.fov, self.aspect, self.t, self.r
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPS
    }

    // Columns are addressed as matrix[(row, column)].

    #[test]
    fn square_viewport_has_unit_scale() {
        let p = compute_projection(600, 600, 90.0, 0.2, 1000.0);
        assert_eq!(p.aspect, 1.0);
        assert!(approx(p.t, 0.2), "t = {}", p.t);
        assert!(approx(p.r, 0.2), "r = {}", p.r);
        assert!(approx(p.matrix[(0, 0)], 1.0));
        assert!(approx(p.matrix[(1, 1)], 1.0));
        assert_eq!(p.matrix[(3, 2)], -1.0);
        assert_eq!(p.matrix[(3, 3)], 0.0);
    }

    #[test]
    fn storage_is_column_major() {
        let p = compute_projection(600, 600, 90.0, 0.2, 1000.0);
        let data = p.matrix.as_slice();
        // col2 = [0, 0, (f+n)/(n-f), -1]
        assert_eq!(data[11], -1.0);
        assert_eq!(data[10], p.matrix[(2, 2)]);
        // col3 = [0, 0, 2nf/(n-f), 0]
        assert_eq!(data[14], p.matrix[(2, 3)]);
        assert_eq!(data[15], 0.0);
    }

    #[test]
    fn identical_inputs_are_bit_identical() {
        for (w, h) in [(600, 600), (1920, 1080), (1, 4096), (333, 17)] {
            let a = ProjectionParams::default().project(w, h);
            let b = ProjectionParams::default().project(w, h);
            let bits_a: Vec<u32> = a.matrix.iter().map(|v| v.to_bits()).collect();
            let bits_b: Vec<u32> = b.matrix.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits_a, bits_b);
        }
    }

    #[test]
    fn doubling_width_doubles_aspect_and_halves_x_scale() {
        let narrow = compute_projection(600, 600, 90.0, 0.2, 1000.0);
        let wide = compute_projection(1200, 600, 90.0, 0.2, 1000.0);
        assert_eq!(wide.aspect, narrow.aspect * 2.0);
        assert_eq!(wide.matrix[(0, 0)], narrow.matrix[(0, 0)] / 2.0);
        assert_eq!(wide.matrix[(1, 1)], narrow.matrix[(1, 1)]);
    }

    #[test]
    fn far_plane_at_infinity_limit() {
        let near = 0.2;
        let p = compute_projection(600, 600, 90.0, near, 1.0e30);
        assert!(approx(p.matrix[(2, 2)], -1.0));
        assert!(approx(p.matrix[(2, 3)], -2.0 * near));

        let mut previous = f32::INFINITY;
        for far in [1.0e2, 1.0e3, 1.0e5, 1.0e7] {
            let distance = (compute_projection(600, 600, 90.0, near, far).matrix[(2, 2)] + 1.0).abs();
            assert!(distance < previous);
            previous = distance;
        }
    }

    #[test]
    fn matches_right_handed_negative_one_to_one_perspective() {
        let p = compute_projection(800, 600, 90.0, 0.2, 1000.0);
        let reference = nalgebra_glm::perspective_rh_no(p.aspect, p.fov, 0.2, 1000.0);
        for (ours, theirs) in p.matrix.iter().zip(reference.iter()) {
            assert!((ours - theirs).abs() <= 1e-4, "{ours} vs {theirs}");
        }
    }

    #[test]
    fn zero_height_is_not_finite() {
        let p = compute_projection(600, 0, 90.0, 0.2, 1000.0);
        assert!(!p.aspect.is_finite());
    }

    #[test]
    fn diagnostic_line() {
        let p = ProjectionParams::default().project(600, 600);
        assert_eq!(
            p.to_string(),
            "n=0.2  f=1000.0  fov=1.57  aspect=1.00  t=0.20  r=0.20"
        );
    }
}
