use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::vulkan::VkBackend;

/// How often the fps figure is refreshed.
pub const FPS_REFRESH: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        return AppConfig {
            title: "Lumen".to_string(),
            width: 640,
            height: 480,
            target_fps: 60.,
        };
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        return self;
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        return self;
    }

    pub fn with_target_fps(mut self, target_fps: f32) -> Self {
        self.target_fps = target_fps;
        return self;
    }
}

/// Passed to update callbacks once per loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateContext {
    /// Time since the previous iteration, in units of one target frame.
    pub delta_time: f32,
    pub elapsed: Duration,
    pub total: Duration,
    /// Frames rendered so far.
    pub frame: u64,
    pub fps: f32,
}

/// Passed to render callbacks when a frame is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub frame: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub update: UpdateContext,
    pub render: Option<RenderContext>,
    /// Set whenever the fps figure was refreshed on this tick.
    pub fps: Option<f32>,
}

/// Frame cadence bookkeeping, fed with the wall time of each loop
/// iteration. Times are kept in milliseconds.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_delay: f64,
    frame_elapsed: f64,
    fps_elapsed: f64,
    fps_frames: u32,
    total: Duration,
    frame: u64,
    fps: f32,
}

impl FrameClock {
    /// A non-positive target renders on every iteration.
    pub fn new(target_fps: f32) -> Self {
        let frame_delay = if target_fps > 0. {
            1000. / target_fps as f64
        } else {
            0.
        };

        return FrameClock {
            frame_delay,
            frame_elapsed: 0.,
            fps_elapsed: 0.,
            fps_frames: 0,
            total: Duration::ZERO,
            frame: 0,
            fps: 0.,
        };
    }

    pub fn frame_delay(&self) -> Duration {
        return Duration::from_secs_f64(self.frame_delay / 1000.);
    }

    pub fn advance(&mut self, elapsed: Duration) -> Tick {
        let elapsed_ms = elapsed.as_nanos() as f64 / 1e6;
        self.total += elapsed;

        let delta_time = if self.frame_delay > 0. {
            (elapsed_ms / self.frame_delay) as f32
        } else {
            1.
        };

        let update = UpdateContext {
            delta_time,
            elapsed,
            total: self.total,
            frame: self.frame,
            fps: self.fps,
        };

        let mut render = None;
        self.frame_elapsed += elapsed_ms;
        if self.frame_delay <= self.frame_elapsed {
            render = Some(RenderContext { frame: self.frame });

            self.frame_elapsed = 0.;
            self.fps_frames += 1;
            self.frame += 1;
        }

        let mut fps = None;
        self.fps_elapsed += elapsed_ms;
        if FPS_REFRESH.as_millis() as f64 <= self.fps_elapsed {
            self.fps = (self.fps_frames as f64 / self.fps_elapsed * 1000.) as f32;
            fps = Some(self.fps);

            self.fps_elapsed = 0.;
            self.fps_frames = 0;
        }

        return Tick {
            update,
            render,
            fps,
        };
    }
}

type SetupFn = Box<dyn FnOnce(&mut VkBackend) -> Result<()>>;
type TeardownFn = Box<dyn FnOnce(&mut VkBackend)>;

/// Window shell driving the frame loop.
///
/// Update callbacks run on every loop iteration, render callbacks when a
/// frame is due according to the target fps.
pub struct App {
    config: AppConfig,
    clock: FrameClock,
    last_tick: Option<Instant>,

    pub update: Event<UpdateContext>,
    pub render: Event<RenderContext>,
    pub resize: Event<PhysicalSize<u32>>,

    setup: Vec<SetupFn>,
    teardown: Vec<TeardownFn>,
    error: Option<Error>,

    // The backend owns the surface and must go before the window.
    backend: Option<VkBackend>,
    window: Option<Window>,
}

impl App {
    pub fn new(config: AppConfig) -> App {
        return App {
            clock: FrameClock::new(config.target_fps),
            config,
            last_tick: None,
            update: Event::new(),
            render: Event::new(),
            resize: Event::new(),
            setup: Vec::new(),
            teardown: Vec::new(),
            error: None,
            backend: None,
            window: None,
        };
    }

    pub fn config(&self) -> &AppConfig {
        return &self.config;
    }

    /// Runs once the backend exists, before the first update.
    pub fn on_setup<F>(&mut self, setup: F)
    where
        F: FnOnce(&mut VkBackend) -> Result<()> + 'static,
    {
        self.setup.push(Box::new(setup));
    }

    /// Runs when the window closes, while the backend is still alive.
    pub fn on_teardown<F>(&mut self, teardown: F)
    where
        F: FnOnce(&mut VkBackend) + 'static,
    {
        self.teardown.push(Box::new(teardown));
    }

    /// Opens the window and runs the loop until it is closed. The first
    /// error raised by a setup callback or by backend creation ends the
    /// loop and is returned.
    pub fn run(mut self) -> Result<()> {
        let event_loop =
            EventLoop::new().map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self)
            .map_err(|e| Error::Window(format!("Event loop failed: {}", e)))?;

        return match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        };
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        log::info!(target: "app", "Creating window '{}'", self.config.title);

        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = event_loop
            .create_window(window_attributes)
            .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))?;

        let mut backend = VkBackend::new(&window)?;
        self.window = Some(window);

        for setup in self.setup.drain(..) {
            if let Err(e) = setup(&mut backend) {
                self.backend = Some(backend);
                return Err(e);
            }
        }

        self.backend = Some(backend);
        self.last_tick = Some(Instant::now());
        return Ok(());
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!(target: "app", "{}", error);
        self.error = Some(error);
        self.shutdown();
        event_loop.exit();
    }

    fn shutdown(&mut self) {
        if let Some(backend) = &mut self.backend {
            for teardown in self.teardown.drain(..) {
                teardown(backend);
            }
        }

        self.backend = None;
        self.window = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!(target: "app", "Close requested, exiting");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                log::debug!(target: "app", "Resized to {}x{}", size.width, size.height);
                self.resize.call(&size);
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let last_tick = match self.last_tick {
            Some(last_tick) if self.backend.is_some() => last_tick,
            _ => return,
        };

        let now = Instant::now();
        self.last_tick = Some(now);

        let tick = self.clock.advance(now.duration_since(last_tick));

        self.update.call(&tick.update);

        if let Some(render) = tick.render {
            self.render.call(&render);
        }

        if let (Some(fps), Some(window)) = (tick.fps, &self.window) {
            window.set_title(&format!("{} - {:.2}", self.config.title, fps));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
