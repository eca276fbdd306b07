//! Loading meshes and textures from the `assets/` directory.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::data_structures::model::Mesh;

pub mod mesh;
pub mod texture;

/// Root every asset path is resolved against.
pub const ASSET_DIR: &str = "assets";

fn asset_path(file_name: &str) -> PathBuf {
    Path::new("./").join(ASSET_DIR).join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Cannot read asset {}", path.display()))
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("Cannot read asset {}", path.display()))
}

/// Loads a mesh file, choosing the parser by extension.
pub async fn load_mesh(file_name: &str, device: &wgpu::Device) -> anyhow::Result<Mesh> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let data = match extension.as_deref() {
        Some("obj") => mesh::parse_obj(file_name, &load_string(file_name).await?).await?,
        Some("gltf") | Some("glb") => {
            mesh::parse_gltf(file_name, &load_binary(file_name).await?).await?
        }
        _ => anyhow::bail!("Unsupported mesh format: {}", file_name),
    };
    log::info!(
        "Loaded mesh {} ({} primitives, bounds {:?})",
        file_name,
        data.primitives.len(),
        data.bounds
    );
    Ok(data.upload(device))
}
