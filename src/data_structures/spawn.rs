//! Random node placement for the input layer.

use cgmath::Vector3;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::SpawnConfig,
    data_structures::node::Node,
};

/// Opacity of freshly spawned transparent nodes that are neither random nor animated.
const HALF_OPACITY: f32 = 0.5;

/// Places nodes at random positions inside `[-extent, extent]^3` with a
/// random per-axis scale, mesh, texture and opacity.
#[derive(Clone, Debug)]
pub struct Spawner {
    rng: StdRng,
    extent: f32,
    scale: (f32, f32),
    meshes: usize,
    textures: usize,
}

impl Spawner {
    /// `meshes` and `textures` are the number of loaded assets; ids are drawn
    /// from `0..meshes` and `0..textures`.
    pub fn new(settings: &SpawnConfig, meshes: usize, textures: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), settings, meshes, textures)
    }

    /// Deterministic spawner for reproducible scenes.
    pub fn seeded(seed: u64, settings: &SpawnConfig, meshes: usize, textures: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), settings, meshes, textures)
    }

    fn with_rng(rng: StdRng, settings: &SpawnConfig, meshes: usize, textures: usize) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("Clamping spawn settings: {:#}", e);
        }
        let [lo, hi] = settings.scale.map(|s| if s.is_finite() { s.abs() } else { 1.0 });
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let extent = settings.extent.abs();
        Self {
            rng,
            extent: if (2.0 * extent).is_finite() { extent } else { 0.0 },
            scale: (lo, hi),
            meshes: meshes.max(1),
            textures: textures.max(1),
        }
    }

    pub fn next_node(&mut self) -> Node {
        let position = Vector3::new(self.coord(), self.coord(), self.coord());
        let scale = Vector3::new(self.scale_axis(), self.scale_axis(), self.scale_axis());
        let mesh = self.rng.gen_range(0..self.meshes);
        let texture = self.rng.gen_range(0..self.textures);
        let node = Node::new(position, scale, mesh, texture);

        match self.rng.gen_range(0..4) {
            0 => node,
            1 => node.with_opacity(HALF_OPACITY),
            2 => {
                let opacity = self.rng.gen_range(0.1..1.0);
                node.with_opacity(opacity)
            }
            _ => {
                let phase = self.rng.gen_range(0.0..std::f32::consts::TAU);
                node.animated(phase)
            }
        }
    }

    fn coord(&mut self) -> f32 {
        if self.extent == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.extent..=self.extent)
    }

    fn scale_axis(&mut self) -> f32 {
        let (lo, hi) = self.scale;
        if lo == hi {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }
}
