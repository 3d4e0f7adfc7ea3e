//! Sticker placement math.
//!
//! Matrices are column-major `[[f32; 4]; 4]` so they upload directly into a
//! WGSL `mat4x4<f32>`.

use crate::surface::Dimensions;

pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Placement of the sticker quad in view space.
///
/// The view spans `[-1, 1]` on the shorter surface axis; the longer axis is
/// extended so the sticker keeps its proportions on any surface size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StickerTransform {
    /// Rotation around the view axis, in radians.
    pub angle: f32,
    pub translation: [f32; 3],
    /// Half extent of the quad in view units.
    pub scale: f32,
}

impl Default for StickerTransform {
    fn default() -> Self {
        Self {
            angle: 0.0,
            translation: [0.0; 3],
            scale: 0.5,
        }
    }
}

impl StickerTransform {
    pub fn set_angle_and_translation(&mut self, angle: f32, translation: [f32; 3]) {
        self.angle = angle;
        self.translation = translation;
    }

    /// Model matrix: translate * rotate * scale.
    pub fn model(&self) -> Mat4 {
        let [tx, ty, tz] = self.translation;
        mul(
            &translation(tx, ty, tz),
            &mul(&rotation_z(self.angle), &scale(self.scale)),
        )
    }

    /// Full clip-space matrix for a surface of `size`.
    pub fn mvp(&self, size: Dimensions) -> Mat4 {
        mul(&projection(size.aspect()), &self.model())
    }
}

/// Orthographic projection covering `[-1, 1]` on the shorter axis.
pub fn projection(aspect: f32) -> Mat4 {
    let (half_w, half_h) = if aspect >= 1.0 {
        (aspect, 1.0)
    } else {
        (1.0, 1.0 / aspect)
    };
    let mut m = IDENTITY;
    m[0][0] = 1.0 / half_w;
    m[1][1] = 1.0 / half_h;
    // Map z in [-1, 1] to wgpu's [0, 1] depth range.
    m[2][2] = 0.5;
    m[3][2] = 0.5;
    m
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[3] = [x, y, z, 1.0];
    m
}

pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0] = [c, s, 0.0, 0.0];
    m[1] = [-s, c, 0.0, 0.0];
    m
}

pub fn scale(s: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s;
    m[1][1] = s;
    m[2][2] = s;
    m
}

/// `a * b` for column-major matrices.
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, v) in out_col.iter_mut().enumerate() {
            *v = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

/// Applies `m` to the point `(x, y, 0, 1)`.
pub fn transform_point(m: &Mat4, x: f32, y: f32) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, v) in out.iter_mut().enumerate() {
        *v = m[0][row] * x + m[1][row] * y + m[3][row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_is_neutral() {
        let r = rotation_z(0.3);
        assert_eq!(mul(&IDENTITY, &r), r);
        assert_eq!(mul(&r, &IDENTITY), r);
    }

    #[test]
    fn wide_surface_squeezes_x() {
        let p = transform_point(&projection(2.0), 1.0, 1.0);
        assert!(close(p[0], 0.5));
        assert!(close(p[1], 1.0));
    }

    #[test]
    fn tall_surface_squeezes_y() {
        let p = transform_point(&projection(0.5), 1.0, 1.0);
        assert!(close(p[0], 1.0));
        assert!(close(p[1], 0.5));
    }

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let p = transform_point(&rotation_z(std::f32::consts::FRAC_PI_2), 1.0, 0.0);
        assert!(close(p[0], 0.0));
        assert!(close(p[1], 1.0));
    }

    #[test]
    fn model_scales_then_translates() {
        let mut t = StickerTransform::default();
        t.set_angle_and_translation(0.0, [0.25, -0.25, 0.0]);
        let p = transform_point(&t.model(), 1.0, 1.0);
        assert!(close(p[0], 0.75));
        assert!(close(p[1], 0.25));
    }

    #[test]
    fn mvp_on_square_surface_matches_model() {
        let t = StickerTransform::default();
        let p = transform_point(&t.mvp(Dimensions::new(600, 600)), 1.0, 0.0);
        assert!(close(p[0], 0.5));
    }
}
