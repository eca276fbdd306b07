//! Scene data: nodes, meshes, textures and the uniform records sent to the GPU.
//!
//! - `node` holds the bounded node set and the opacity animation
//! - `model` contains mesh and material definitions as GPU resources
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `uniform` defines the byte layout of the shared and per-draw records
//! - `spawn` places random nodes for the input layer

pub mod model;
pub mod node;
pub mod spawn;
pub mod texture;
pub mod uniform;
