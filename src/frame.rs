//! Per-frame scene processing.
//!
//! [`FramePacker::pack`] runs once per frame, strictly in this order:
//!
//! 1. clear the byte allocator
//! 2. pack the shared camera/light record (always at offset 0)
//! 3. extract the frustum from the camera's view-projection
//! 4. for every node:
//!    - skip it if its opacity is 0 (no culling, no record, no draw)
//!    - test its world-space bounding box against the frustum if culling is on
//!    - emit its bounding box as debug lines if requested
//!    - pack its per-draw record and remember the offset
//! 5. sort the opaque and transparent buckets
//!
//! The result is a [`FramePlan`]. Uploading the packed bytes and issuing the
//! draws is left to the caller, see [`crate::render`].

use std::collections::HashMap;

use cgmath::{EuclideanSpace, MetricSpace, Point3};
use wgpu::BufferAddress;

use crate::{
    allocator::ByteAllocator,
    camera::CameraFrame,
    culling::{
        Aabb, CullMode, Frustum,
        aabb::{CULLED_COLOR, DebugVertex, VISIBLE_COLOR, push_box_edges},
        is_visible,
    },
    data_structures::{
        model::Bounded,
        node::{NodeId, NodeSet},
        uniform::{Light, SharedFrameRecord},
    },
    draw_order::{DrawList, classify},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSettings {
    pub frustum_culling: bool,
    pub cull_mode: CullMode,
    pub debug_aabbs: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            frustum_culling: true,
            cull_mode: CullMode::default(),
            debug_aabbs: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes: usize,
    /// Nodes with opacity 0.
    pub skipped: usize,
    pub culled: usize,
    pub opaque: usize,
    pub transparent: usize,
}

/// The outcome of packing one frame.
///
/// Offsets point into the allocator buffer as it was filled by the same
/// `pack` call and become meaningless once the next frame is packed.
#[derive(Clone, Debug, Default)]
pub struct FramePlan {
    offsets: HashMap<NodeId, BufferAddress>,
    draws: DrawList,
    eye: [f32; 3],
    pub debug_lines: Vec<DebugVertex>,
    pub stats: FrameStats,
}

impl FramePlan {
    /// Offset of the shared camera/light record.
    pub const SHARED_OFFSET: BufferAddress = 0;

    /// Offset of the node's per-draw record, `None` if it is not drawn this frame.
    pub fn offset_of(&self, id: NodeId) -> Option<BufferAddress> {
        self.offsets.get(&id).copied()
    }

    pub fn draws(&self) -> &DrawList {
        &self.draws
    }

    pub fn eye(&self) -> Point3<f32> {
        self.eye.into()
    }

    /// Number of per-draw records packed.
    pub fn records(&self) -> usize {
        self.offsets.len()
    }
}

/// Owns the byte allocator and turns a node set into a packed frame.
#[derive(Debug)]
pub struct FramePacker {
    allocator: ByteAllocator,
    pub settings: FrameSettings,
}

impl FramePacker {
    pub fn new(allocator: ByteAllocator, settings: FrameSettings) -> Self {
        Self {
            allocator,
            settings,
        }
    }

    /// Packs the frame and updates each node's `culled` flag.
    ///
    /// Nodes that reference a mesh missing from `meshes` are not drawn.
    pub fn pack<M: Bounded>(
        &mut self,
        nodes: &mut NodeSet,
        meshes: &[M],
        camera: &CameraFrame,
        light: &Light,
    ) -> FramePlan {
        self.allocator.clear();

        let mut plan = FramePlan {
            eye: camera.eye.into(),
            ..Default::default()
        };
        let shared = self.allocator.push(&SharedFrameRecord::new(camera, light));
        debug_assert_eq!(shared, FramePlan::SHARED_OFFSET);

        let frustum = Frustum::from_view_projection(&camera.view_projection());
        let settings = self.settings;

        for node in nodes.iter_mut() {
            plan.stats.nodes += 1;
            let Some(bucket) = classify(node.opacity) else {
                node.culled = false;
                plan.stats.skipped += 1;
                continue;
            };
            let Some(mesh) = meshes.get(node.mesh) else {
                log::warn!("Node {:?} references unknown mesh {}", node.id(), node.mesh);
                node.culled = false;
                continue;
            };

            if settings.frustum_culling {
                let bounds: Aabb = mesh.local_bounds();
                let corners = bounds.world_corners(node.scale, node.position);
                node.culled = !is_visible(&frustum, &corners, settings.cull_mode);
                log::trace!("Node {:?} culled: {}", node.id(), node.culled);
                if settings.debug_aabbs {
                    let color = if node.culled { CULLED_COLOR } else { VISIBLE_COLOR };
                    push_box_edges(&corners, color, &mut plan.debug_lines);
                }
                if node.culled {
                    plan.stats.culled += 1;
                    continue;
                }
            } else {
                node.culled = false;
            }

            let offset = self.allocator.push(&node.to_record());
            plan.offsets.insert(node.id(), offset);
            let distance = camera.eye.distance(Point3::from_vec(node.position));
            plan.draws.push(bucket, node.id(), distance);
        }

        plan.draws.sort();
        plan.stats.opaque = plan.draws.opaque().len();
        plan.stats.transparent = plan.draws.transparent().len();
        log::debug!("{:?}, {} bytes packed", plan.stats, self.allocator.size());
        plan
    }

    /// The packed bytes of the last frame, ready for a single upload.
    pub fn bytes(&self) -> &[u8] {
        self.allocator.data()
    }

    pub fn allocator(&self) -> &ByteAllocator {
        &self.allocator
    }
}
