//! # Application Core (`app.rs`)
//!
//! The `App` struct connects the `winit` event loop to the [`FrameDriver`]. It creates the
//! window and the [`Renderer`] when the event loop resumes, translates window events into
//! [`FrameEvent`]s, and stops the event loop when the driver shuts down.
//!
//! ## Startup
//!
//! On the first `resumed` call the app:
//! 1. Creates the window from [`WindowConfig`](crate::WindowConfig): title, inner size and outer
//!    position.
//! 2. Initializes the renderer synchronously with `pollster`.
//! 3. Wraps it in a driver holding [`Mesh::QUAD`], then feeds the driver the window's current
//!    size as a first resize, so the first frame already has a projection.
//!
//! Any failure in these steps is kept in the app and the event loop exits. [`run`] then returns
//! that error to the caller.
//!
//! ## Event Translation
//!
//! | `WindowEvent`                  | `FrameEvent`            |
//! |--------------------------------|-------------------------|
//! | `Resized(size)`                | `Resize { width, height }` |
//! | `RedrawRequested`              | `Tick`                  |
//! | `KeyboardInput` (pressed)      | `Key(..)`               |
//! | `CloseRequested`               | `Close`                 |

use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::config::AppConfig;
use crate::frame::{Flow, FrameDriver, FrameEvent, Key};
use crate::mesh::Mesh;
use crate::renderer::Renderer;

/// Application state handed to the `winit` event loop.
///
/// # Fields
///
/// - `config`: window and camera settings.
/// - `window`: the window, once created.
/// - `driver`: the frame driver owning the renderer, once the GPU is up.
/// - `startup_error`: why startup failed, if it did.
pub struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    driver: Option<FrameDriver<Renderer>>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            driver: None,
            startup_error: None,
        }
    }

    /// Takes the error that stopped startup, if any.
    pub fn take_startup_error(&mut self) -> Option<anyhow::Error> {
        self.startup_error.take()
    }

    /// Creates the window and the driver.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_position(PhysicalPosition::new(window_config.x, window_config.y));

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create the window")?,
        );
        self.window = Some(window.clone());

        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.config))?;
        let mut driver = FrameDriver::new(renderer, Mesh::QUAD, self.config.projection);

        let PhysicalSize { width, height } = window.inner_size();
        driver.handle_event(FrameEvent::Resize { width, height });
        window.request_redraw();

        self.driver = Some(driver);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("Startup failed: {err:#}");
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };

        let frame_event = match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match (key_event.state, key_event.physical_key) {
                    (ElementState::Pressed, PhysicalKey::Code(code)) => FrameEvent::Key(Key::from(code)),
                    _ => return,
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                FrameEvent::Resize { width, height }
            }
            WindowEvent::RedrawRequested => FrameEvent::Tick,
            WindowEvent::CloseRequested => FrameEvent::Close,
            _ => return,
        };

        if driver.handle_event(frame_event) == Flow::Shutdown {
            event_loop.exit();
        }
    }
}

/// Runs the application until the window is closed or Escape is pressed.
///
/// # Errors
///
/// Fails when the event loop cannot be created or run, or when startup failed (no window, no
/// usable GPU, or a shader that does not build).
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    let mut app = App::new(config);

    event_loop
        .run_app(&mut app)
        .context("event loop terminated with an error")?;

    match app.take_startup_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
