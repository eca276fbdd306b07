//! Draw submission.
//!
//! [`submit_draws`] walks a [`FramePlan`] in draw order (all opaque nodes
//! front-to-back, then all transparent nodes back-to-front) and hands one
//! [`DrawCall`] per node to a [`DrawSink`]. The [`PassSink`] turns those into
//! wgpu commands; tests record them instead.

use wgpu::BufferAddress;

use crate::{
    context::FrameResources,
    data_structures::{
        model::{Material, Mesh},
        node::{MeshId, NodeId, NodeSet, TextureId},
    },
    draw_order::Bucket,
    frame::FramePlan,
};

/// Everything needed to draw one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub node: NodeId,
    pub mesh: MeshId,
    pub texture: TextureId,
    /// Offset of the node's per-draw record in the frame buffer.
    pub offset: BufferAddress,
}

pub trait DrawSink {
    /// Called before the first draw of each bucket, even if the bucket is empty.
    fn begin_bucket(&mut self, bucket: Bucket);

    fn draw(&mut self, call: DrawCall);
}

/// Submits all draws of `plan` in order and returns how many were issued.
pub fn submit_draws(plan: &FramePlan, nodes: &NodeSet, sink: &mut impl DrawSink) -> usize {
    let mut issued = 0;
    for bucket in [Bucket::Opaque, Bucket::Transparent] {
        sink.begin_bucket(bucket);
        for entry in plan.draws().bucket(bucket) {
            let (Some(node), Some(offset)) = (nodes.get(entry.node), plan.offset_of(entry.node))
            else {
                log::warn!("Node {:?} vanished between packing and drawing", entry.node);
                continue;
            };
            sink.draw(DrawCall {
                node: entry.node,
                mesh: node.mesh,
                texture: node.texture,
                offset,
            });
            issued += 1;
        }
    }
    issued
}

/// Records draws into a wgpu render pass.
///
/// The shared record is bound at group 0, the per-draw record at group 1
/// through a dynamic offset and the node texture at group 2. Each mesh
/// primitive becomes one indexed draw.
pub struct PassSink<'a, 'enc> {
    pub pass: &'a mut wgpu::RenderPass<'enc>,
    pub frame: &'a FrameResources,
    pub opaque_pipeline: &'a wgpu::RenderPipeline,
    pub transparent_pipeline: &'a wgpu::RenderPipeline,
    pub meshes: &'a [Mesh],
    pub materials: &'a [Material],
}

impl DrawSink for PassSink<'_, '_> {
    fn begin_bucket(&mut self, bucket: Bucket) {
        let pipeline = match bucket {
            Bucket::Opaque => self.opaque_pipeline,
            Bucket::Transparent => self.transparent_pipeline,
        };
        self.pass.set_pipeline(pipeline);
        self.pass.set_bind_group(0, &self.frame.shared_bind_group, &[]);
    }

    fn draw(&mut self, call: DrawCall) {
        let (Some(mesh), Some(material)) =
            (self.meshes.get(call.mesh), self.materials.get(call.texture))
        else {
            log::warn!("Skipping draw of {:?}: missing mesh or texture", call.node);
            return;
        };
        self.pass
            .set_bind_group(1, &self.frame.draw_bind_group, &[call.offset as u32]);
        self.pass.set_bind_group(2, &material.bind_group, &[]);
        for primitive in &mesh.primitives {
            self.pass
                .set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
            self.pass
                .set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.pass.draw_indexed(0..primitive.num_elements, 0, 0..1);
        }
    }
}
