use thiserror::Error;

use crate::data_structures::node::{MeshId, TextureId};

/// Errors raised when the scene is modified.
///
/// Rendering a frame never fails; these only come from spawning nodes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("cannot spawn more than {max} nodes")]
    CapacityReached { max: usize },
    #[error("mesh {0} is not loaded")]
    UnknownMesh(MeshId),
    #[error("texture {0} is not loaded")]
    UnknownTexture(TextureId),
}
