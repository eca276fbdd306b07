#![allow(dead_code)]

use glitter_ngin::{
    camera::{Camera, CameraFrame, Projection},
    cgmath::{Deg, Point3, Vector3},
    culling::Aabb,
    data_structures::{node::Node, uniform::Light},
    draw_order::Bucket,
    render::{DrawCall, DrawSink},
};

/// Alignment most desktop GPUs report.
pub const ALIGNMENT: u32 = 256;

/// Camera at the origin looking down -Z with a 60 degree, 4:3 view.
pub fn origin_camera() -> (Camera, Projection) {
    let camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(60.0), 0.1, 100.0);
    (camera, projection)
}

pub fn origin_frame() -> CameraFrame {
    let (camera, projection) = origin_camera();
    camera.frame(&projection)
}

pub fn light() -> Light {
    Light::new([0.0, 10.0, 0.0], [1.0, 1.0, 1.0])
}

pub fn unit_box() -> Aabb {
    Aabb::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
}

/// A unit-scaled node of mesh 0 / texture 0 at `z` on the view axis.
pub fn node_ahead(z: f32) -> Node {
    Node::new(Vector3::new(0.0, 0.0, z), Vector3::new(1.0, 1.0, 1.0), 0, 0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    Begin(Bucket),
    Draw(DrawCall),
}

/// Collects draw submissions instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Recorded>,
}

impl RecordingSink {
    pub fn draws(&self) -> Vec<DrawCall> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Draw(call) => Some(*call),
                Recorded::Begin(_) => None,
            })
            .collect()
    }
}

impl DrawSink for RecordingSink {
    fn begin_bucket(&mut self, bucket: Bucket) {
        self.events.push(Recorded::Begin(bucket));
    }

    fn draw(&mut self, call: DrawCall) {
        self.events.push(Recorded::Draw(call));
    }
}
