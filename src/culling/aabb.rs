//! Axis-aligned bounding boxes and the box-vs-frustum visibility test.

use cgmath::{Point3, Vector3};
use serde::Deserialize;

use crate::culling::frustum::Frustum;

/// Local-space bounding box of a mesh.
///
/// Built by folding vertex positions into a running min/max. Once at least
/// one point was folded in, `min <= max` holds on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub const fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// A box that contains nothing; folding any point into it yields that point.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Folds all `positions` into a box, or `None` if there are none.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut aabb = Self::empty();
        positions.into_iter().for_each(|p| aabb.fold(p));
        (!aabb.is_empty()).then_some(aabb)
    }

    pub fn fold(&mut self, p: [f32; 3]) {
        self.min.x = self.min.x.min(p[0]);
        self.min.y = self.min.y.min(p[1]);
        self.min.z = self.min.z.min(p[2]);
        self.max.x = self.max.x.max(p[0]);
        self.max.y = self.max.y.max(p[1]);
        self.max.z = self.max.z.max(p[2]);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut aabb = *self;
        aabb.fold(other.min.into());
        aabb.fold(other.max.into());
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// All 8 corners. Bit 0 of the index picks x, bit 1 picks y and bit 2
    /// picks z (`0` = min, `1` = max).
    pub fn corners(&self) -> [Point3<f32>; 8] {
        std::array::from_fn(|i| {
            Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// The corners after applying `scale` and then `translation`.
    ///
    /// Nodes carry no orientation so no rotation is applied.
    pub fn world_corners(
        &self,
        scale: Vector3<f32>,
        translation: Vector3<f32>,
    ) -> [Point3<f32>; 8] {
        self.corners().map(|c| {
            Point3::new(
                c.x * scale.x + translation.x,
                c.y * scale.y + translation.y,
                c.z * scale.z + translation.z,
            )
        })
    }
}

/// How a box is tested against the frustum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CullMode {
    /// Visible if at least one corner is inside all six planes at once.
    ///
    /// Large boxes that straddle the frustum without any corner inside are
    /// culled even though part of them is on screen.
    #[default]
    CornerExistence,
    /// Culled only if all corners are outside the same plane.
    ///
    /// Never culls a visible box; may keep some boxes near frustum edges
    /// that are actually off screen.
    PlaneDistance,
}

impl CullMode {
    pub fn next(self) -> Self {
        match self {
            CullMode::CornerExistence => CullMode::PlaneDistance,
            CullMode::PlaneDistance => CullMode::CornerExistence,
        }
    }
}

/// Decides whether a box given by its world-space `corners` survives culling.
pub fn is_visible(frustum: &Frustum, corners: &[Point3<f32>; 8], mode: CullMode) -> bool {
    match mode {
        CullMode::CornerExistence => corners.iter().any(|&c| frustum.contains_point(c)),
        CullMode::PlaneDistance => frustum
            .planes
            .iter()
            .all(|plane| corners.iter().any(|&c| plane.contains(c))),
    }
}

/// Line-list vertex for drawing bounding boxes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

pub const VISIBLE_COLOR: [f32; 3] = [0.1, 0.9, 0.2];
pub const CULLED_COLOR: [f32; 3] = [0.9, 0.1, 0.1];

impl DebugVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DebugVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Appends the 12 edges of the box (24 vertices) to `out`.
pub fn push_box_edges(corners: &[Point3<f32>; 8], color: [f32; 3], out: &mut Vec<DebugVertex>) {
    for i in 0..8 {
        for bit in [1, 2, 4] {
            // every edge connects two corners that differ in exactly one axis
            if i & bit == 0 {
                out.push(DebugVertex {
                    position: corners[i].into(),
                    color,
                });
                out.push(DebugVertex {
                    position: corners[i | bit].into(),
                    color,
                });
            }
        }
    }
}
