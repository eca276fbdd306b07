//! Renderer configuration.
//!
//! Every field has a default, so a TOML file only needs the values it wants
//! to change:
//!
//! ```toml
//! max_nodes = 1024
//! cull_mode = "plane-distance"
//!
//! [assets]
//! meshes = ["cube.obj", "suzanne.glb"]
//! textures = ["crate.png"]
//! ```

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::{culling::CullMode, frame::FrameSettings};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Upper bound for spawned nodes.
    pub max_nodes: usize,
    pub frustum_culling: bool,
    pub cull_mode: CullMode,
    pub debug_aabbs: bool,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub clear_colour: [f64; 4],
    pub spawn: SpawnConfig,
    pub assets: AssetConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "Glitter".to_string(),
            width: 1280,
            height: 720,
            max_nodes: 256,
            frustum_culling: true,
            cull_mode: CullMode::CornerExistence,
            debug_aabbs: false,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            clear_colour: [0.05, 0.05, 0.08, 1.0],
            spawn: SpawnConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl RendererConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.spawn.validate().context("Invalid [spawn] table")?;
        Ok(config)
    }

    pub fn frame_settings(&self) -> FrameSettings {
        FrameSettings {
            frustum_culling: self.frustum_culling,
            cull_mode: self.cull_mode,
            debug_aabbs: self.debug_aabbs,
        }
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 30.0],
            yaw: -90.0,
            pitch: -10.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 200.0,
            speed: 10.0,
            sensitivity: 0.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [8.0, 40.0, 20.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Nodes spawn inside the cube `[-extent, extent]^3`.
    pub extent: f32,
    /// Per-axis scale is drawn from `[min, max)`.
    pub scale: [f32; 2],
    /// Nodes spawned at startup.
    pub initial: usize,
}

impl SpawnConfig {
    /// Extent and both scale bounds must be finite and not negative, and the
    /// ranges drawn from them must stay finite.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.extent >= 0.0 && (2.0 * self.extent).is_finite()) {
            anyhow::bail!("extent {} is out of range", self.extent);
        }
        for bound in self.scale {
            if !(bound >= 0.0 && bound.is_finite()) {
                anyhow::bail!("scale bound {} is out of range", bound);
            }
        }
        Ok(())
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            extent: 20.0,
            scale: [0.5, 2.0],
            initial: 32,
        }
    }
}

/// Files below the `assets/` directory.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub meshes: Vec<String>,
    pub textures: Vec<String>,
}
