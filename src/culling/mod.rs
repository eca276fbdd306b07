//! Frustum culling.
//!
//! - `frustum` extracts six world-space planes from a view-projection matrix
//! - `aabb` contains the bounding box type, the visibility test and debug line output

pub mod aabb;
pub mod frustum;

pub use aabb::{Aabb, CullMode, is_visible};
pub use frustum::{Frustum, Plane};
