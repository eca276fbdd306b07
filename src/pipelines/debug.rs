use crate::{
    culling::aabb::DebugVertex,
    pipelines::basic::{DepthMode, mk_render_pipeline},
};

/// Line list pipeline for bounding box wireframes. Only uses the shared
/// frame record (group 0).
pub fn mk_debug_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    shared_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Debug Line Pipeline Layout"),
        bind_group_layouts: &[shared_layout],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Debug Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("debug_lines.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        Some(DepthMode::ReadOnly),
        &[DebugVertex::desc()],
        wgpu::PrimitiveTopology::LineList,
        shader,
    )
}
