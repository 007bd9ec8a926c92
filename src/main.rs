//! micscope - a live microphone visualizer
//!
//! Captures the default audio input device and renders either an
//! oscilloscope waveform or a frequency bar graph on a full-window surface,
//! repainting once per display frame until the window is closed.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use micscope::audio::{Analyzer, CaptureStream};
use micscope::cli::Args;
use micscope::params::{AnalyzerConfig, RenderConfig, ScreenSize};
use micscope::rendering::RenderSystem;
use micscope::telemetry;
use micscope::viz::{self, Visual};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Analysis pipeline (constructed once, fixed for the session)
    analyzer: Analyzer,
    visual: Box<dyn Visual>,
    /// Capture stream (kept alive; dropping it stops the microphone)
    _capture: Option<CaptureStream>,

    // Shared screen-size state: written by the resize handler, read by
    // every draw pass, all on the event-loop thread.
    screen_size: ScreenSize,

    // Configuration
    render_config: RenderConfig,

    // First failure that aborted startup, surfaced after the loop exits
    startup_failure: Option<anyhow::Error>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let analyzer = Analyzer::new(AnalyzerConfig::default())?;
        let visual = viz::create(args.visual, analyzer.bin_count());
        let render_config = RenderConfig {
            window_width: args.width,
            window_height: args.height,
        };

        Ok(Self {
            window: None,
            render_system: None,
            analyzer,
            visual,
            _capture: None,
            screen_size: ScreenSize::default(),
            render_config,
            startup_failure: None,
        })
    }

    fn fail_startup(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.startup_failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("micscope")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        // Surface creation precedes media acquisition: a missing window or
        // GPU aborts startup before any audio device is touched.
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                return self.fail_startup(
                    event_loop,
                    anyhow::Error::new(err).context("failed to create window"),
                );
            }
        };

        // Bars geometry is the larger of the two visuals: six vertices per bin.
        let vertex_capacity = self.analyzer.bin_count() * 6;
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            vertex_capacity,
        )) {
            Ok(render_system) => render_system,
            Err(err) => return self.fail_startup(event_loop, err),
        };

        let capture = match CaptureStream::open(self.analyzer.sample_sink()) {
            Ok(capture) => capture,
            Err(err) => return self.fail_startup(event_loop, err),
        };

        let size = window.inner_size();
        self.screen_size.update(size.width, size.height);

        info!("visualizer running; press Escape to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self._capture = Some(capture);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                // Reconfiguring clears the surface; the next frame repaints
                // it from blank.
                self.screen_size.update(size.width, size.height);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let topology = self.visual.topology();
        let vertices = self.visual.update(&mut self.analyzer, self.screen_size);

        match render_system.render(vertices, topology) {
            Ok(()) => {}
            // The surface comes back once reconfigured; repaint next frame.
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("render surface out of memory");
                event_loop.exit();
            }
            Err(err) => error!("render error: {err}"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init();
    info!("micscope starting ({} visual)", args.visual);

    let mut app = App::new(&args)?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(err) = app.startup_failure.take() {
        error!("startup failed: {err:#}");
        return Err(err);
    }

    Ok(())
}
