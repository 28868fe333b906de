use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use robot_parallax::cli::Cli;
use robot_parallax::config::Config;
use robot_parallax::core::{Button, Clock, Controller, FpsMeter, SystemClock, WinitController};
use robot_parallax::driver::Stage;
use robot_parallax::renderer::FigureRenderer;
use robot_parallax::trace;

const FPS_UPDATE_INTERVAL: f32 = 1.0;

struct App {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<FigureRenderer>,
    stage: Option<Stage>,
    input: WinitController,
    wall_clock: SystemClock,
    frame_clock: Clock,
    fps: FpsMeter,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            stage: None,
            input: WinitController::new(),
            wall_clock: SystemClock,
            frame_clock: Clock::new(),
            fps: FpsMeter::new(FPS_UPDATE_INTERVAL),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title("Robot Parallax")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.width,
                        self.config.height,
                    )),
            )
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let stage = Stage::from_config(&self.config, size.width, size.height);
        let renderer = pollster::block_on(FigureRenderer::new(
            window.clone(),
            stage.figure(),
            &self.config,
        ))
        .context("Failed to initialize renderer")?;

        self.window = Some(window);
        self.stage = Some(stage);
        self.renderer = Some(renderer);
        self.frame_clock.reset();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.frame_clock.tick();
        if let Some(fps) = self.fps.frame(delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        let (Some(stage), Some(renderer)) = (&mut self.stage, &mut self.renderer) else {
            return;
        };
        renderer.set_fps(self.fps.fps());

        match stage.frame(renderer, &mut self.wall_clock) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout, skipping frame"),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::error!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{:#}", e);
                self.fatal = Some(e);
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
        // Let egui handle the event first
        if let Some(renderer) = &mut self.renderer {
            if renderer.handle_event(&event) {
                return;
            }
        }

        if let Some(command) = self.input.process_event(&event) {
            if let Some(stage) = &mut self.stage {
                stage.apply_scroll(command);
            }
        }
        if self.input.is_down(Button::Escape) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                if let Some(stage) = &mut self.stage {
                    stage.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;
    log::info!("Configuration: {:?}", config);

    if let Some(steps) = cli.trace {
        let mut stage = Stage::from_config(&config, config.width, config.height);
        let stdout = std::io::stdout();
        trace::run(&mut stage, steps, &mut stdout.lock())?;
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("Controls: mouse wheel, arrows, PageUp/PageDown/Space, Home/End, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
