//! View frustum planes derived from a combined view-projection matrix.

use cgmath::{Matrix, Matrix4, Point3, Vector4};

/// A half-space `a*x + b*y + c*z + d > 0`.
///
/// Planes are not normalized: only the sign of [`evaluate`](Self::evaluate)
/// is used for culling, never the distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    pub fn evaluate(&self, p: Point3<f32>) -> f32 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }

    /// `true` if `p` lies strictly on the inner side of the plane.
    pub fn contains(&self, p: Point3<f32>) -> bool {
        self.evaluate(p) > 0.0
    }
}

impl From<Vector4<f32>> for Plane {
    fn from(v: Vector4<f32>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

/// The six planes bounding the visible region of a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const TOP: usize = 3;
    pub const NEAR: usize = 4;
    pub const FAR: usize = 5;

    /// Extracts the planes from a world-to-clip matrix.
    ///
    /// The matrix must map into OpenGL style clip space (`-w <= x, y, z <= w`),
    /// e.g. `cgmath::perspective(..) * view`. For every axis `i` the lower
    /// plane is `row_w + row_i` and the upper plane is `row_w - row_i`. Since
    /// the matrix takes world coordinates the planes are in world space.
    pub fn from_view_projection(view_proj: &Matrix4<f32>) -> Self {
        let w = view_proj.row(3);
        let x = view_proj.row(0);
        let y = view_proj.row(1);
        let z = view_proj.row(2);
        Self {
            planes: [
                (w + x).into(),
                (w - x).into(),
                (w + y).into(),
                (w - y).into(),
                (w + z).into(),
                (w - z).into(),
            ],
        }
    }

    /// `true` if `p` is inside all six planes.
    pub fn contains_point(&self, p: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| plane.contains(p))
    }
}
