//! Render pipelines. Both node pipelines share one shader and one layout;
//! they differ only in blending and depth writes.

pub mod basic;
pub mod debug;
pub mod transparent;
