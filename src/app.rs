use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::SceneConfig;
use crate::cube_pass::CubePass;
use crate::error::{PaddockError, Result};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::scene::SceneState;
use crate::texture::Texture;

const GRASS_SIZE: u32 = 64;
const GRASS_SEED: u32 = 7;
const SKY_SIZE: u32 = 256;

/// Wall-clock seconds since the scene started.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Opens a window and runs the scene until it is closed.
///
/// Setup failures (window, surface, adapter, device) end the event loop and
/// are returned. Once running, frames that cannot be presented are skipped.
pub fn run(config: SceneConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = PaddockApp {
        scene: SceneState::from_config(&config),
        input: Input::new(&config.controls),
        config,
        stage: Stage::Pending,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match (app.error, app.stage) {
        (Some(err), _) => Err(err),
        (None, Stage::Pending) => Err(PaddockError::SetupIncomplete),
        (None, Stage::Running { .. }) => Ok(()),
    }
}

enum Stage {
    Pending,
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        pass: CubePass,
        clock: Stopwatch,
    },
}

struct PaddockApp {
    config: SceneConfig,
    scene: SceneState,
    input: Input,
    stage: Stage,
    error: Option<PaddockError>,
}

impl PaddockApp {
    fn setup(&self, event_loop: &ActiveEventLoop) -> Result<Stage> {
        let window_config = &self.config.window;
        let window_attrs = WindowAttributes::default()
            .with_title(&window_config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_config.width,
                window_config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let mut pass = CubePass::new(&gpu);

        let textures = &self.config.textures;
        let ground = Texture::from_file_or(&gpu, textures.ground.as_deref(), |gpu| {
            Texture::grass(gpu, GRASS_SIZE, GRASS_SEED)
        });
        let sky = Texture::from_file_or(&gpu, textures.sky.as_deref(), |gpu| {
            Texture::sky(gpu, SKY_SIZE)
        });
        pass.set_textures(&gpu, &ground, &sky);

        log::info!("scene ready ({}x{})", gpu.width(), gpu.height());
        Ok(Stage::Running {
            window,
            gpu,
            pass,
            clock: Stopwatch::start(),
        })
    }
}

impl ApplicationHandler for PaddockApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.stage, Stage::Pending) {
            return;
        }
        match self.setup(event_loop) {
            Ok(stage) => {
                if let Stage::Running { window, gpu, .. } = &stage {
                    self.scene.set_viewport(gpu.width(), gpu.height());
                    window.request_redraw();
                }
                self.stage = stage;
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Stage::Running {
            window,
            gpu,
            pass,
            clock,
        } = &mut self.stage
        else {
            return;
        };

        if self.input.handle_event(&event, gpu.width(), &mut self.scene) {
            window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                self.scene.set_viewport(size.width, size.height);
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost; reconfiguring and skipping frame");
                        gpu.reconfigure();
                        window.request_redraw();
                        return;
                    }
                    Err(err) => {
                        log::warn!("skipping frame: {err}");
                        window.request_redraw();
                        return;
                    }
                };
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                self.scene.render(clock.elapsed(), pass);
                pass.render(gpu, &view);
                window.pre_present_notify();
                output.present();

                if wants_next_tick(&self.scene) {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// The tick only re-registers itself while something is moving. A still
/// scene is redrawn on input, resize and expose.
fn wants_next_tick(scene: &SceneState) -> bool {
    scene.animation_enabled()
}
