//! GPU and window context.
//!
//! [`Context`] owns the device, queue and surface together with everything
//! that lives as long as the window: the depth texture, bind group layouts,
//! pipelines, the per-frame uniform buffer, the camera and the light.

use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraController, Projection},
    config::RendererConfig,
    culling::aabb::DebugVertex,
    data_structures::{
        texture::Texture,
        uniform::{Light, PerDrawRecord, SharedFrameRecord},
    },
    pipelines::{
        basic::{NodeLayouts, mk_opaque_pipeline},
        debug::mk_debug_pipeline,
        transparent::mk_transparent_pipeline,
    },
    resources::texture::texture_layout,
};

/// Smallest uniform buffer allocated, in bytes.
const MIN_FRAME_BUFFER_SIZE: wgpu::BufferAddress = 4096;

pub struct Pipelines {
    pub opaque: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub debug: wgpu::RenderPipeline,
}

/// The uniform buffer all packed records of a frame are uploaded to and the
/// two bind groups that view it.
pub struct FrameResources {
    pub buffer: wgpu::Buffer,
    pub shared_layout: wgpu::BindGroupLayout,
    pub draw_layout: wgpu::BindGroupLayout,
    /// Binds the shared record at offset 0.
    pub shared_bind_group: wgpu::BindGroup,
    /// Binds one per-draw record; the offset is supplied per draw.
    pub draw_bind_group: wgpu::BindGroup,
    pub debug_lines: Option<(wgpu::Buffer, u32)>,
}

impl FrameResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let shared_layout = uniform_layout(device, "shared_frame_layout", SharedFrameRecord::SIZE, false);
        let draw_layout = uniform_layout(device, "per_draw_layout", PerDrawRecord::SIZE, true);
        let buffer = mk_frame_buffer(device, MIN_FRAME_BUFFER_SIZE);
        let (shared_bind_group, draw_bind_group) =
            mk_frame_bind_groups(device, &buffer, &shared_layout, &draw_layout);
        Self {
            buffer,
            shared_layout,
            draw_layout,
            shared_bind_group,
            draw_bind_group,
            debug_lines: None,
        }
    }

    /// Uploads the packed frame in one transfer, growing the buffer first if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let size = bytes.len() as wgpu::BufferAddress;
        if size > self.buffer.size() {
            let new_size = size.next_power_of_two().max(MIN_FRAME_BUFFER_SIZE);
            log::info!("Growing frame uniform buffer to {} bytes", new_size);
            self.buffer = mk_frame_buffer(device, new_size);
            let (shared, draw) =
                mk_frame_bind_groups(device, &self.buffer, &self.shared_layout, &self.draw_layout);
            self.shared_bind_group = shared;
            self.draw_bind_group = draw;
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }

    pub fn upload_debug_lines(&mut self, device: &wgpu::Device, lines: &[DebugVertex]) {
        self.debug_lines = (!lines.is_empty()).then(|| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Debug AABB Vertex Buffer"),
                contents: bytemuck::cast_slice(lines),
                usage: wgpu::BufferUsages::VERTEX,
            });
            (buffer, lines.len() as u32)
        });
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    size: wgpu::BufferAddress,
    has_dynamic_offset: bool,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        }],
        label: Some(label),
    })
}

fn mk_frame_buffer(device: &wgpu::Device, size: wgpu::BufferAddress) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Frame Uniform Buffer"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn mk_frame_bind_groups(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
    shared_layout: &wgpu::BindGroupLayout,
    draw_layout: &wgpu::BindGroupLayout,
) -> (wgpu::BindGroup, wgpu::BindGroup) {
    let bind = |layout: &wgpu::BindGroupLayout, size: wgpu::BufferAddress, label: &str| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size),
                }),
            }],
            label: Some(label),
        })
    };
    (
        bind(shared_layout, SharedFrameRecord::SIZE, "shared_frame_bind_group"),
        bind(draw_layout, PerDrawRecord::SIZE, "per_draw_bind_group"),
    )
}

pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: Camera,
    pub controller: CameraController,
    pub projection: Projection,
    pub light: Light,
    pub clear_colour: wgpu::Color,
    pub texture_layout: wgpu::BindGroupLayout,
    pub frame: FrameResources,
    pub pipelines: Pipelines,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &RendererConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("Cannot open the GPU device")?;

        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("Surface is not supported by the adapter")?;
        // Node colours assume an sRGB target.
        let surface_caps = surface.get_capabilities(&adapter);
        if let Some(format) = surface_caps.formats.iter().copied().find(|f| f.is_srgb()) {
            config.format = format;
        }
        surface.configure(&device, &config);

        let camera_settings = &settings.camera;
        let camera = Camera::new(
            camera_settings.position,
            cgmath::Deg(camera_settings.yaw),
            cgmath::Deg(camera_settings.pitch),
        );
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(camera_settings.fovy),
            camera_settings.znear,
            camera_settings.zfar,
        );
        let controller = CameraController::new(camera_settings.speed, camera_settings.sensitivity);
        let light = Light::new(settings.light.position, settings.light.color);

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let texture_layout = texture_layout(&device);
        let frame = FrameResources::new(&device);
        let layouts = NodeLayouts {
            shared: &frame.shared_layout,
            draw: &frame.draw_layout,
            texture: &texture_layout,
        };
        let pipelines = Pipelines {
            opaque: mk_opaque_pipeline(&device, &config, &layouts),
            transparent: mk_transparent_pipeline(&device, &config, &layouts),
            debug: mk_debug_pipeline(&device, &config, &frame.shared_layout),
        };

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            controller,
            projection,
            light,
            clear_colour: settings.clear_colour(),
            texture_layout,
            frame,
            pipelines,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        true
    }
}
