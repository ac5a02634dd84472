// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local coordinate frames
//!
//! Every plate, bolt pattern and cut box is positioned purely through a
//! [`Frame`] plus an origin, so frames built here must be right-handed and
//! orthonormal for any input, including axis-aligned and parallel inputs.

use nalgebra::{Matrix4, Point3, Vector3};

/// Inputs shorter than this normalize to the default axis.
const ZERO_LENGTH: f64 = 1e-12;

/// Projections shorter than this count as parallel to the primary axis.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Zero-safe unit vector.
///
/// Vectors shorter than 1e-12 come back as `(0, 0, 1)` instead of NaN.
/// The substitution is silent to the caller; it is only traced.
#[inline]
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len < ZERO_LENGTH {
        tracing::trace!(x = v.x, y = v.y, z = v.z, "degenerate vector, using +Z");
        return Vector3::z();
    }
    v / len
}

/// Right-handed orthonormal triple `(X, Y, Z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
    pub z: Vector3<f64>,
}

impl Frame {
    /// The global frame.
    pub fn identity() -> Self {
        Self {
            x: Vector3::x(),
            y: Vector3::y(),
            z: Vector3::z(),
        }
    }

    /// Map a local offset into global coordinates (rotation only).
    #[inline]
    pub fn to_global(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.x * local.x + self.y * local.y + self.z * local.z
    }

    /// Global position of a local offset measured from `origin`.
    #[inline]
    pub fn point_at(&self, origin: &Point3<f64>, local: &Vector3<f64>) -> Point3<f64> {
        origin + self.to_global(local)
    }

    /// Placement matrix: columns are the local axes, last column the origin.
    pub fn to_matrix(&self, origin: &Point3<f64>) -> Matrix4<f64> {
        let mut transform = Matrix4::identity();
        for (col, axis) in [self.x, self.y, self.z].iter().enumerate() {
            transform[(0, col)] = axis.x;
            transform[(1, col)] = axis.y;
            transform[(2, col)] = axis.z;
        }
        transform[(0, 3)] = origin.x;
        transform[(1, 3)] = origin.y;
        transform[(2, 3)] = origin.z;
        transform
    }

    /// Unit lengths, mutual orthogonality and `Z × X ≈ Y` within `tolerance`.
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let unit = [self.x, self.y, self.z]
            .iter()
            .all(|a| (a.norm() - 1.0).abs() <= tolerance);
        let orthogonal = self.x.dot(&self.y).abs() <= tolerance
            && self.y.dot(&self.z).abs() <= tolerance
            && self.z.dot(&self.x).abs() <= tolerance;
        let right_handed = (self.z.cross(&self.x) - self.y).norm() <= tolerance;
        unit && orthogonal && right_handed
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

/// Build a frame whose Z follows `axis_z` and whose X leans toward `preferred_x`.
///
/// `preferred_x` is projected onto the plane orthogonal to Z. When it is
/// parallel to Z the X axis falls back to `(0,1,0) × Z`, or `(1,0,0) × Z`
/// when Z is nearly vertical (`|Z.y| ≥ 0.9`).
pub fn make_frame(axis_z: &Vector3<f64>, preferred_x: &Vector3<f64>) -> Frame {
    let z = normalize(axis_z);

    let projected = preferred_x - z * preferred_x.dot(&z);
    let x = if projected.norm() < PARALLEL_EPSILON {
        let helper = if z.y.abs() >= 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        normalize(&helper.cross(&z))
    } else {
        normalize(&projected)
    };

    // Right-hand rule: Y = Z × X
    let y = z.cross(&x);

    Frame { x, y, z }
}
