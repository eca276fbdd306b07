//! Opaque/transparent partitioning and draw-order sorting.
//!
//! Opaque nodes are drawn front-to-back so the depth test rejects as many
//! hidden fragments as possible. Transparent nodes are drawn back-to-front
//! (painter's algorithm) because blending is order dependent and there is no
//! order-independent transparency. Nodes at exactly the same distance end up
//! in an unspecified order.

use crate::data_structures::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    Opaque,
    Transparent,
}

/// Sorts a node into a bucket by its opacity.
///
/// `1.0` (or more) is opaque, anything in `(0, 1)` is transparent and `0.0`
/// (or less, or NaN) gets `None`: the node is not drawn at all.
pub fn classify(opacity: f32) -> Option<Bucket> {
    if opacity >= 1.0 {
        Some(Bucket::Opaque)
    } else if opacity > 0.0 {
        Some(Bucket::Transparent)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawEntry {
    pub node: NodeId,
    pub distance: f32,
}

/// Both draw buckets of one frame.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    opaque: Vec<DrawEntry>,
    transparent: Vec<DrawEntry>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: Bucket, node: NodeId, distance: f32) {
        let entry = DrawEntry { node, distance };
        match bucket {
            Bucket::Opaque => self.opaque.push(entry),
            Bucket::Transparent => self.transparent.push(entry),
        }
    }

    /// Opaque ascending, transparent descending by distance to the eye.
    pub fn sort(&mut self) {
        self.opaque
            .sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));
        self.transparent
            .sort_unstable_by(|a, b| b.distance.total_cmp(&a.distance));
    }

    pub fn opaque(&self) -> &[DrawEntry] {
        &self.opaque
    }

    pub fn transparent(&self) -> &[DrawEntry] {
        &self.transparent
    }

    pub fn bucket(&self, bucket: Bucket) -> &[DrawEntry] {
        match bucket {
            Bucket::Opaque => &self.opaque,
            Bucket::Transparent => &self.transparent,
        }
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }
}
