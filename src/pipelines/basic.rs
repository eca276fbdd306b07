use crate::data_structures::{
    model::{self, Vertex},
    texture::Texture,
};

/// Bind group layouts shared by the node pipelines, in group order.
pub struct NodeLayouts<'a> {
    pub shared: &'a wgpu::BindGroupLayout,
    pub draw: &'a wgpu::BindGroupLayout,
    pub texture: &'a wgpu::BindGroupLayout,
}

pub fn node_pipeline_layout(device: &wgpu::Device, layouts: &NodeLayouts) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Node Pipeline Layout"),
        bind_group_layouts: &[layouts.shared, layouts.draw, layouts.texture],
        immediate_size: 0,
    })
}

pub fn node_shader() -> wgpu::ShaderModuleDescriptor<'static> {
    wgpu::ShaderModuleDescriptor {
        label: Some("Node Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("node.wgsl").into()),
    }
}

/// Opaque nodes: no blending, depth test and depth writes on.
pub fn mk_opaque_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    layouts: &NodeLayouts,
) -> wgpu::RenderPipeline {
    let layout = node_pipeline_layout(device, layouts);
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        Some(DepthMode::ReadWrite),
        &[model::ModelVertex::desc()],
        wgpu::PrimitiveTopology::TriangleList,
        node_shader(),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthMode {
    ReadWrite,
    /// Depth test without writing, so later transparent draws still blend
    /// over earlier ones.
    ReadOnly,
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth: Option<DepthMode>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    topology: wgpu::PrimitiveTopology,
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);
    let cull_mode = match topology {
        wgpu::PrimitiveTopology::TriangleList | wgpu::PrimitiveTopology::TriangleStrip => {
            Some(wgpu::Face::Back)
        }
        _ => None,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth.map(|mode| wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: mode == DepthMode::ReadWrite,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
