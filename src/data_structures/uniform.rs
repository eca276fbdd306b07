//! Uniform records packed into the per-frame byte buffer.
//!
//! Both records follow WGSL uniform layout rules: a `vec3<f32>` occupies 16
//! bytes, so every vec3 is followed by 4 bytes of padding and the per-draw
//! opacity scalar is padded up to 16 bytes.
//!
//! | record              | field            | offset | size |
//! |---------------------|------------------|--------|------|
//! | `SharedFrameRecord` | `view`           | 0      | 64   |
//! |                     | `projection`     | 64     | 64   |
//! |                     | `eye`            | 128    | 12+4 |
//! |                     | `light_position` | 144    | 12+4 |
//! |                     | `light_color`    | 160    | 12+4 |
//! | `PerDrawRecord`     | `model`          | 0      | 64   |
//! |                     | `opacity`        | 64     | 4+12 |

use cgmath::{Matrix4, Point3, Vector3};

use crate::camera::{CameraFrame, OPENGL_TO_WGPU_MATRIX};

/// A single point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Light {
    pub fn new(position: impl Into<Vector3<f32>>, color: impl Into<Vector3<f32>>) -> Self {
        Self {
            position: position.into(),
            color: color.into(),
        }
    }
}

/// Camera and light data shared by all draws of a frame. Packed once, at offset 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SharedFrameRecord {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub eye: [f32; 3],
    _padding: u32,
    pub light_position: [f32; 3],
    _padding2: u32,
    pub light_color: [f32; 3],
    _padding3: u32,
}

impl SharedFrameRecord {
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    /// The stored projection already maps depth into wgpu's `[0, 1]` range.
    pub fn new(camera: &CameraFrame, light: &Light) -> Self {
        let eye: Point3<f32> = camera.eye;
        Self {
            view: camera.view.into(),
            projection: (OPENGL_TO_WGPU_MATRIX * camera.projection).into(),
            eye: eye.into(),
            _padding: 0,
            light_position: light.position.into(),
            _padding2: 0,
            light_color: light.color.into(),
            _padding3: 0,
        }
    }
}

/// Data for a single node draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerDrawRecord {
    pub model: [[f32; 4]; 4],
    pub opacity: f32,
    _padding: [f32; 3],
}

impl PerDrawRecord {
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    pub fn new(model: Matrix4<f32>, opacity: f32) -> Self {
        Self {
            model: model.into(),
            opacity,
            _padding: [0.0; 3],
        }
    }
}
