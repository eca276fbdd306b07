//! Scene nodes and the bounded set that owns them.
//!
//! A [`Node`] is a mesh instance with a position, a non-uniform scale, a
//! texture and an opacity. Nodes have no orientation. The [`NodeSet`] hands
//! out [`NodeId`]s and enforces the configured maximum node count.

use std::f32::consts::TAU;

use cgmath::Vector3;
use instant::Duration;

use crate::{data_structures::uniform::PerDrawRecord, error::SceneError};

pub type MeshId = usize;
pub type TextureId = usize;

/// Angular speed of the opacity animation in radians per second.
const OPACITY_SPEED: f32 = 1.5;
/// Animated opacities this close to 0 or 1 are snapped to exactly 0 or 1.
const OPACITY_SNAP: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub mesh: MeshId,
    pub texture: TextureId,
    /// `1.0` is opaque, `0.0` is not drawn at all.
    pub opacity: f32,
    /// Let the tick phase animate the opacity.
    pub animate: bool,
    /// Phase offset of the opacity animation in radians.
    pub phase: f32,
    /// Result of the last frustum test. Only meaningful while culling is on.
    pub culled: bool,
}

impl Node {
    pub fn new(position: Vector3<f32>, scale: Vector3<f32>, mesh: MeshId, texture: TextureId) -> Self {
        Self {
            id: NodeId(0),
            position,
            scale,
            mesh,
            texture,
            opacity: 1.0,
            animate: false,
            phase: 0.0,
            culled: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn animated(mut self, phase: f32) -> Self {
        self.animate = true;
        self.phase = phase;
        self
    }

    /// Set by [`NodeSet::spawn`].
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Scale first, then translate.
    pub fn model_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_record(&self) -> PerDrawRecord {
        PerDrawRecord::new(self.model_matrix(), self.opacity)
    }
}

/// Animated opacity at `time` seconds for a node with the given `phase`.
pub fn animated_opacity(time: f32, phase: f32) -> f32 {
    let opacity = ((time * OPACITY_SPEED + phase).sin() + 1.0) * 0.5;
    if opacity < OPACITY_SNAP {
        0.0
    } else if opacity > 1.0 - OPACITY_SNAP {
        1.0
    } else {
        opacity
    }
}

/// All live nodes, in spawn order.
#[derive(Clone, Debug)]
pub struct NodeSet {
    nodes: Vec<Node>,
    next_id: u32,
    max_nodes: usize,
    time: f32,
}

impl NodeSet {
    pub fn new(max_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(max_nodes),
            next_id: 0,
            max_nodes,
            time: 0.0,
        }
    }

    pub fn spawn(&mut self, mut node: Node) -> Result<NodeId, SceneError> {
        if self.nodes.len() >= self.max_nodes {
            return Err(SceneError::CapacityReached {
                max: self.max_nodes,
            });
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.id = id;
        self.nodes.push(node);
        Ok(id)
    }

    /// Spawns up to `amount` nodes made by `factory`, clamped to the free capacity.
    pub fn spawn_many(&mut self, amount: usize, mut factory: impl FnMut(usize) -> Node) -> Vec<NodeId> {
        let amount = amount.min(self.remaining());
        (0..amount)
            .filter_map(|i| self.spawn(factory(i)).ok())
            .collect()
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.nodes.iter().position(|node| node.id == id)?;
        Some(self.nodes.remove(idx))
    }

    pub fn remove_last(&mut self) -> Option<Node> {
        self.nodes.pop()
    }

    /// Drops every node. Ids start from zero again afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.next_id = 0;
    }

    /// Advances the opacity animation of all nodes flagged `animate`.
    pub fn tick(&mut self, dt: Duration) {
        // wrap after a whole number of periods so the f32 clock keeps its precision
        let period = TAU / OPACITY_SPEED;
        self.time = (self.time + dt.as_secs_f32()) % (period * 1000.0);
        let time = self.time;
        self.nodes
            .iter_mut()
            .filter(|node| node.animate)
            .for_each(|node| node.opacity = animated_opacity(time, node.phase));
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn remaining(&self) -> usize {
        self.max_nodes.saturating_sub(self.nodes.len())
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
