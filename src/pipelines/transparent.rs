use crate::{
    data_structures::model::{ModelVertex, Vertex},
    pipelines::basic::{DepthMode, NodeLayouts, mk_render_pipeline, node_pipeline_layout, node_shader},
};

/// Same shader and layout as the opaque pipeline, but alpha blended and
/// without depth writes. Draws must arrive back-to-front.
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    layouts: &NodeLayouts,
) -> wgpu::RenderPipeline {
    let layout = node_pipeline_layout(device, layouts);
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(DepthMode::ReadOnly),
        &[ModelVertex::desc()],
        wgpu::PrimitiveTopology::TriangleList,
        node_shader(),
    )
}
