//! Scene ownership and the application event loop.
//!
//! Every redraw runs the same sequence:
//! 1. advance the opacity animation (tick)
//! 2. move the camera
//! 3. pack the frame ([`FramePacker::pack`])
//! 4. upload the packed bytes in one write
//! 5. draw opaque nodes, transparent nodes, then debug boxes
//! 6. present
//!
//! # Keys
//!
//! | Key | Action |
//! |---|---|
//! | `F` | toggle frustum culling |
//! | `B` | toggle bounding box display |
//! | `M` | switch cull mode |
//! | `Space` | spawn one node |
//! | `N` | spawn 16 nodes |
//! | `C` | remove all nodes |
//! | `Backspace` | remove the newest node |
//!
//! Camera: `WASD`/arrows move, `E`/`Q` rise and sink, right mouse drag looks
//! around, the wheel zooms.

use std::{iter, sync::Arc};

use anyhow::Context as _;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    allocator::ByteAllocator,
    config::RendererConfig,
    context::Context,
    data_structures::{
        model::{Material, Mesh},
        node::{Node, NodeId, NodeSet},
        spawn::Spawner,
        texture::Texture,
    },
    error::SceneError,
    frame::FramePacker,
    render::{PassSink, submit_draws},
    resources::{load_mesh, mesh::unit_cube, texture::load_texture},
};

/// Nodes spawned by the `N` key.
const SPAWN_BATCH: usize = 16;

/// Nodes plus the assets they reference.
///
/// Generic over the mesh and material types so scenes can be built without
/// a GPU.
pub struct Scene<M = Mesh, T = Material> {
    pub nodes: NodeSet,
    pub meshes: Vec<M>,
    pub materials: Vec<T>,
    spawner: Spawner,
}

impl<M, T> Scene<M, T> {
    pub fn new(max_nodes: usize, meshes: Vec<M>, materials: Vec<T>, spawner: Spawner) -> Self {
        Self {
            nodes: NodeSet::new(max_nodes),
            meshes,
            materials,
            spawner,
        }
    }

    /// Spawns `node` after checking that its mesh and texture exist.
    pub fn spawn(&mut self, node: Node) -> Result<NodeId, SceneError> {
        if node.mesh >= self.meshes.len() {
            return Err(SceneError::UnknownMesh(node.mesh));
        }
        if node.texture >= self.materials.len() {
            return Err(SceneError::UnknownTexture(node.texture));
        }
        self.nodes.spawn(node)
    }

    /// Spawns up to `amount` random nodes and returns how many were placed.
    pub fn spawn_random(&mut self, amount: usize) -> usize {
        let mut spawned = 0;
        for _ in 0..amount {
            let node = self.spawner.next_node();
            match self.spawn(node) {
                Ok(_) => spawned += 1,
                Err(e) => {
                    log::warn!("Spawn rejected: {}", e);
                    break;
                }
            }
        }
        spawned
    }
}

/// Loads every configured asset. Missing files are logged and skipped; an
/// empty list falls back to a unit cube or a plain white texture.
async fn load_scene(ctx: &Context, config: &RendererConfig) -> anyhow::Result<Scene> {
    let mut meshes = Vec::new();
    for file_name in &config.assets.meshes {
        match load_mesh(file_name, &ctx.device).await {
            Ok(mesh) => meshes.push(mesh),
            Err(e) => log::warn!("Skipping mesh {}: {:#}", file_name, e),
        }
    }
    if meshes.is_empty() {
        log::info!("No meshes loaded, using the built-in cube");
        meshes.push(unit_cube().upload(&ctx.device));
    }

    let mut materials = Vec::new();
    for file_name in &config.assets.textures {
        match load_texture(file_name, &ctx.device, &ctx.queue).await {
            Ok(texture) => materials.push(Material::new(
                &ctx.device,
                file_name,
                texture,
                &ctx.texture_layout,
            )),
            Err(e) => log::warn!("Skipping texture {}: {:#}", file_name, e),
        }
    }
    if materials.is_empty() {
        let white = Texture::create_solid([255, 255, 255, 255], 1, 1, &ctx.device, &ctx.queue);
        materials.push(Material::new(&ctx.device, "white", white, &ctx.texture_layout));
    }
    log::info!("Loaded {} meshes and {} textures", meshes.len(), materials.len());

    let spawner = Spawner::new(&config.spawn, meshes.len(), materials.len());
    let mut scene = Scene::new(config.max_nodes, meshes, materials, spawner);
    scene.spawn_random(config.spawn.initial);
    Ok(scene)
}

pub struct AppState {
    pub(crate) ctx: Context,
    pub scene: Scene,
    pub packer: FramePacker,
    is_surface_configured: bool,
    looking: bool,
    last_time: Instant,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &RendererConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config)
            .await
            .context("Cannot create the main context")?;
        let scene = load_scene(&ctx, config).await?;
        let packer = FramePacker::new(ByteAllocator::new(ctx.device.clone()), config.frame_settings());
        Ok(Self {
            ctx,
            scene,
            packer,
            is_surface_configured: false,
            looking: false,
            last_time: Instant::now(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    /// Handles the scene keys. Returns `true` if the key was consumed.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        let settings = &mut self.packer.settings;
        match key {
            KeyCode::KeyF => {
                settings.frustum_culling = !settings.frustum_culling;
                log::info!("Frustum culling: {}", settings.frustum_culling);
            }
            KeyCode::KeyB => {
                settings.debug_aabbs = !settings.debug_aabbs;
                log::info!("Bounding boxes: {}", settings.debug_aabbs);
            }
            KeyCode::KeyM => {
                settings.cull_mode = settings.cull_mode.next();
                log::info!("Cull mode: {:?}", settings.cull_mode);
            }
            KeyCode::Space => {
                self.scene.spawn_random(1);
            }
            KeyCode::KeyN => {
                self.scene.spawn_random(SPAWN_BATCH);
            }
            KeyCode::KeyC => self.scene.nodes.clear(),
            KeyCode::Backspace => {
                self.scene.nodes.remove_last();
            }
            _ => return false,
        }
        true
    }

    fn update(&mut self) {
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        self.scene.nodes.tick(dt);
        self.ctx.controller.update(&mut self.ctx.camera, dt);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let camera = self.ctx.camera.frame(&self.ctx.projection);
        let plan = self
            .packer
            .pack(&mut self.scene.nodes, &self.scene.meshes, &camera, &self.ctx.light);
        self.ctx
            .frame
            .upload(&self.ctx.device, &self.ctx.queue, self.packer.bytes());
        self.ctx
            .frame
            .upload_debug_lines(&self.ctx.device, &plan.debug_lines);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            let mut sink = PassSink {
                pass: &mut render_pass,
                frame: &self.ctx.frame,
                opaque_pipeline: &self.ctx.pipelines.opaque,
                transparent_pipeline: &self.ctx.pipelines.transparent,
                meshes: &self.scene.meshes,
                materials: &self.scene.materials,
            };
            submit_draws(&plan, &self.scene.nodes, &mut sink);

            if let Some((buffer, count)) = &self.ctx.frame.debug_lines {
                render_pass.set_pipeline(&self.ctx.pipelines.debug);
                render_pass.set_bind_group(0, &self.ctx.frame.shared_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..*count, 0..1);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: RendererConfig,
    state: Option<AppState>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: RendererConfig) -> anyhow::Result<Self> {
        let async_runtime =
            tokio::runtime::Runtime::new().context("Cannot start the async runtime")?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            init_error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Cannot create the window")?,
        );
        self.async_runtime
            .block_on(AppState::new(window, &self.config))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("Initialization failed: {:#}", e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.looking {
                state.ctx.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.ctx.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                code => {
                    state.handle_key(code);
                }
            },
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Right,
                ..
            } => state.looking = button_state.is_pressed(),
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => log::error!("Unable to render {}", e),
                }
            }
            _ => {}
        }
    }
}

/// Opens the window and runs until it is closed.
pub fn run(config: RendererConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        eprintln!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
