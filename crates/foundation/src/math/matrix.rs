//! Column-major 3x3 and 4x4 matrices.
//!
//! Storage order matches the glTF / 3D Tiles convention so tileset `transform` arrays can be
//! used directly.

use super::{HeadingPitchRoll, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    m: [f64; 9],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self {
            m: [c0.x, c0.y, c0.z, c1.x, c1.y, c1.z, c2.x, c2.y, c2.z],
        }
    }

    pub fn from_rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_columns(Vec3::UNIT_X, Vec3::new(0.0, c, s), Vec3::new(0.0, -s, c))
    }

    pub fn from_rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_columns(Vec3::new(c, 0.0, -s), Vec3::UNIT_Y, Vec3::new(s, 0.0, c))
    }

    pub fn from_rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_columns(Vec3::new(c, s, 0.0), Vec3::new(-s, c, 0.0), Vec3::UNIT_Z)
    }

    /// Local rotation for a heading/pitch/roll triple: `Rz(-heading) * Ry(-pitch) * Rx(roll)`.
    pub fn from_heading_pitch_roll(hpr: HeadingPitchRoll) -> Self {
        Self::from_rotation_z(-hpr.heading)
            .multiply(&Self::from_rotation_y(-hpr.pitch))
            .multiply(&Self::from_rotation_x(hpr.roll))
    }

    pub fn column(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[i * 3], self.m[i * 3 + 1], self.m[i * 3 + 2])
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 3 + row]
    }

    pub fn multiply(&self, other: &Mat3) -> Mat3 {
        let mut m = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                m[col * 3 + row] = (0..3).map(|k| self.at(row, k) * other.at(k, col)).sum();
            }
        }
        Mat3 { m }
    }

    pub fn multiply_vector(&self, v: Vec3) -> Vec3 {
        self.column(0).scale(v.x) + self.column(1).scale(v.y) + self.column(2).scale(v.z)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    m: [f64; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn from_column_major(m: [f64; 16]) -> Self {
        Self { m }
    }

    pub fn from_translation(t: Vec3) -> Self {
        Self::from_rotation_translation(Mat3::IDENTITY, t)
    }

    pub fn from_rotation_translation(rotation: Mat3, t: Vec3) -> Self {
        let c0 = rotation.column(0);
        let c1 = rotation.column(1);
        let c2 = rotation.column(2);
        Self {
            m: [
                c0.x, c0.y, c0.z, 0.0, c1.x, c1.y, c1.z, 0.0, c2.x, c2.y, c2.z, 0.0, t.x, t.y, t.z,
                1.0,
            ],
        }
    }

    pub fn as_array(&self) -> [f64; 16] {
        self.m
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[12], self.m[13], self.m[14])
    }

    pub fn rotation(&self) -> Mat3 {
        Mat3::from_columns(
            Vec3::new(self.m[0], self.m[1], self.m[2]),
            Vec3::new(self.m[4], self.m[5], self.m[6]),
            Vec3::new(self.m[8], self.m[9], self.m[10]),
        )
    }

    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        let mut m = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                m[col * 4 + row] = (0..4).map(|k| self.at(row, k) * other.at(k, col)).sum();
            }
        }
        Mat4 { m }
    }

    /// Transforms a point (w = 1), assuming an affine matrix.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation().multiply_vector(p) + self.translation()
    }

    /// Transforms a direction (w = 0).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation().multiply_vector(v)
    }

    /// Largest column scale of the upper 3x3, used to scale radii.
    pub fn max_scale(&self) -> f64 {
        let r = self.rotation();
        (0..3).map(|i| r.column(i).length()).fold(0.0, f64::max)
    }
}
