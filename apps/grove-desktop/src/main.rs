use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use grove_common::{GroveConfig, WindowSettings};
use grove_input::{InputState, KeyAction, KeyBindings};
use grove_render::{FlyCamera, RenderView};
use grove_render_wgpu::WgpuRenderer;
use grove_scene::Scene;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

/// Longest frame step fed to the camera, so a stall does not teleport it.
const MAX_FRAME_DT: f32 = 0.1;
/// Touchpad pixels per scroll line.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Parser)]
#[command(name = "grove-desktop", about = "Fly through a scattered forest")]
struct Cli {
    /// YAML config file (window, camera, scatter, scene, keybindings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scatter seed, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trees, overriding the config
    #[arg(long)]
    trees: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Everything the frame loop owns besides the GPU.
struct AppContext {
    camera: FlyCamera,
    input: InputState,
    scene: Scene,
    show_overlay: bool,
    last_frame: Instant,
    fps: f32,
}

impl AppContext {
    fn new(config: &GroveConfig, bindings: KeyBindings, scene: Scene) -> Self {
        Self {
            camera: FlyCamera::from_settings(&config.camera),
            input: InputState::new(bindings),
            scene,
            show_overlay: true,
            last_frame: Instant::now(),
            fps: 0.0,
        }
    }

    /// Advance one frame. Returns true when the cursor should be released.
    fn update(&mut self, dt: f32) -> bool {
        if dt > 0.0 {
            self.fps = if self.fps == 0.0 {
                1.0 / dt
            } else {
                self.fps * 0.9 + 0.1 / dt
            };
        }

        let frame = self.input.poll();
        let mut release_cursor = false;
        for trigger in &frame.triggers {
            match trigger {
                KeyAction::ReleaseCursor => release_cursor = true,
                KeyAction::ToggleOverlay => self.show_overlay = !self.show_overlay,
                _ => {}
            }
        }
        frame.apply(&mut self.camera, dt);
        release_cursor
    }

    fn draw_overlay(&self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let cam = &self.camera;
        egui::Window::new("Grove")
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.0}", self.fps));
                ui.label(format!(
                    "Trees: {}  Seed: {}",
                    self.scene.tree_count(),
                    self.scene.seed()
                ));
                ui.separator();
                ui.label(format!(
                    "Position: ({:.1}, {:.1}, {:.1})",
                    cam.position.x, cam.position.y, cam.position.z
                ));
                ui.label(format!("Yaw: {:.1}  Pitch: {:.1}", cam.yaw(), cam.pitch()));
                ui.label(format!("FOV: {:.1}", cam.zoom()));
                if let Some((index, distance)) = self.scene.nearest_tree(cam.position) {
                    ui.label(format!("Nearest tree: #{index} at {distance:.1}"));
                }
                ui.separator();
                let bindings = self.input.bindings();
                ui.small(format!(
                    "Click: look | {}: release | {}: sprint | {}: overlay",
                    key_hint(bindings, KeyAction::ReleaseCursor),
                    key_hint(bindings, KeyAction::Sprint),
                    key_hint(bindings, KeyAction::ToggleOverlay),
                ));
            });
    }
}

fn key_hint(bindings: &KeyBindings, action: KeyAction) -> String {
    let keys: Vec<&str> = bindings.keys_for(action).collect();
    if keys.is_empty() {
        "unbound".to_owned()
    } else {
        keys.join("/")
    }
}

/// Window, device and the renderers drawing into its surface.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        settings: &WindowSettings,
        scene: &Scene,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(PhysicalSize::new(settings.width, settings.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("grove_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer =
            WgpuRenderer::new(&device, surface_format, config.width, config.height, scene);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            trees = renderer.instance_count(),
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn capture_cursor(&self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("cursor grab unavailable: {e}");
        }
        self.window.set_cursor_visible(false);
    }

    fn release_cursor(&self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("failed to release cursor: {e}");
        }
        self.window.set_cursor_visible(true);
    }

    /// Draw the scene, then the overlay on top of it.
    fn draw(&mut self, app: &AppContext, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &RenderView::from_camera(&app.camera),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| app.draw_overlay(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    window_settings: WindowSettings,
    app: AppContext,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(window_settings: WindowSettings, app: AppContext) -> Self {
        Self {
            window_settings,
            app,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn set_look(&mut self, active: bool) {
        self.app.input.set_look_active(active);
        if let Some(gpu) = &self.gpu {
            if active {
                gpu.capture_cursor();
            } else {
                gpu.release_cursor();
            }
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(
            event_loop,
            &self.window_settings,
            &self.app.scene,
            &self.egui_ctx,
        ) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.app.camera.set_aspect(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        // While looking around, the overlay gets no input.
        if !self.app.input.look_active() {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.app.camera.set_aspect(new_size.width, new_size.height);
            }
            WindowEvent::Focused(false) => {
                self.app.input.release_all();
                self.set_look(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let key = format!("{code:?}");
                match state {
                    ElementState::Pressed => self.app.input.key_pressed(&key),
                    ElementState::Released => self.app.input.key_released(&key),
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.app.input.look_active() {
                    self.set_look(true);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.app.input.scrolled(lines);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.app.last_frame)
                    .as_secs_f32()
                    .min(MAX_FRAME_DT);
                self.app.last_frame = now;

                if self.app.update(dt) {
                    self.set_look(false);
                }

                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&self.app, &self.egui_ctx);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.app.input.look_active() {
                self.app.input.mouse_motion(delta.0, delta.1);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_config(cli: &Cli) -> Result<(GroveConfig, KeyBindings)> {
    let (mut config, bindings) = match &cli.config {
        Some(path) => (
            GroveConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            KeyBindings::load(path)
                .with_context(|| format!("failed to load keybindings from {}", path.display()))?,
        ),
        None => (GroveConfig::default(), KeyBindings::default()),
    };

    if let Some(seed) = cli.seed {
        config.scatter.seed = Some(seed);
    }
    if let Some(trees) = cli.trees {
        config.scatter.count = trees;
    }
    Ok((config, bindings))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("grove-desktop starting");

    let (config, bindings) = load_config(&cli)?;
    let scene =
        Scene::generate(&config.scatter, &config.scene).context("failed to scatter trees")?;
    let app = AppContext::new(&config, bindings, scene);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut gpu_app = GpuApp::new(config.window, app);
    event_loop.run_app(&mut gpu_app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_common::{PlacementPoint, SceneLayout};
    use grove_scatter::ScatterConstraints;

    fn test_app() -> AppContext {
        let scene = Scene::from_placements(
            vec![PlacementPoint::on_ground(10.0, 0.0)],
            ScatterConstraints::new(1, 5.0, 20.0),
            &SceneLayout::default(),
            1,
        );
        AppContext::new(&GroveConfig::default(), KeyBindings::default(), scene)
    }

    #[test]
    fn overlay_toggles_once_per_press() {
        let mut app = test_app();
        assert!(app.show_overlay);
        app.input.key_pressed("F1");
        app.input.key_pressed("F1"); // auto-repeat
        app.update(0.016);
        assert!(!app.show_overlay);
        app.update(0.016);
        assert!(!app.show_overlay);
    }

    #[test]
    fn escape_requests_cursor_release() {
        let mut app = test_app();
        app.input.key_pressed("Escape");
        assert!(app.update(0.016));
        assert!(!app.update(0.016));
    }

    #[test]
    fn held_key_moves_camera_each_frame() {
        let mut app = test_app();
        let start = app.camera.position;
        app.input.key_pressed("KeyW");
        app.update(0.5);
        app.update(0.5);
        // Speed 2.5 along -Z for one second.
        assert!((app.camera.position.z - (start.z - 2.5)).abs() < 1e-4);
    }

    #[test]
    fn cli_overrides_scatter_settings() {
        let cli = Cli::parse_from(["grove-desktop", "--seed", "9", "--trees", "12"]);
        let (config, _) = load_config(&cli).unwrap();
        assert_eq!(config.scatter.seed, Some(9));
        assert_eq!(config.scatter.count, 12);
    }

    #[test]
    fn key_hint_lists_bound_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(key_hint(&bindings, KeyAction::ToggleOverlay), "F1");
        let mut custom = KeyBindings::default();
        custom.bind("Tab", KeyAction::ToggleOverlay);
        assert_eq!(key_hint(&custom, KeyAction::ToggleOverlay), "F1/Tab");
    }
}
