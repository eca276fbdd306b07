//! glitter-ngin
//!
//! A small real-time renderer for a bounded set of textured, scaled mesh
//! instances ("nodes"). Each frame the CPU decides what to draw, in which
//! order, and packs all per-draw uniform data into one aligned byte buffer
//! that is uploaded with a single write.
//!
//! High-level modules
//! - `allocator`: bump allocator that aligns records to the GPU's uniform offset alignment
//! - `culling`: frustum plane extraction and bounding box visibility tests
//! - `draw_order`: opaque/transparent buckets sorted by eye distance
//! - `frame`: per-frame packing of records, culling and ordering
//! - `render`: draw submission into a render pass
//! - `camera`: fly camera, projection and controller
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: nodes, meshes, textures and uniform records
//! - `pipelines`: opaque, transparent and debug line pipelines
//! - `resources`: helpers to load meshes/textures and create GPU resources
//! - `flow`: scene ownership and the application event loop
//! - `config`: TOML configuration
//!

pub mod allocator;
pub mod camera;
pub mod config;
pub mod context;
pub mod culling;
pub mod data_structures;
pub mod draw_order;
pub mod error;
pub mod flow;
pub mod frame;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
