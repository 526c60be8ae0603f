use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameTime};

/// Presentation flags. None of them affect simulation state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowOptions {
    pub resizable: bool,
    /// No title bar or frame.
    pub borderless: bool,
    pub always_on_top: bool,
    /// Mouse input passes through to whatever is below.
    pub click_through: bool,
    /// Framebuffer alpha is composited with the desktop.
    pub transparent: bool,
}

impl WindowOptions {
    /// Borderless, always-on-top, click-through, see-through.
    pub fn overlay() -> Self {
        Self {
            resizable: false,
            borderless: true,
            always_on_top: true,
            click_through: true,
            transparent: true,
        }
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            resizable: false,
            borderless: false,
            always_on_top: false,
            click_through: false,
            transparent: false,
        }
    }
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub options: WindowOptions,
}

impl RuntimeConfig {
    fn window_attributes(&self) -> WindowAttributes {
        let opts = self.options;
        let mut attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.initial_size)
            .with_resizable(opts.resizable)
            .with_decorations(!opts.borderless)
            .with_transparent(opts.transparent);
        if opts.always_on_top {
            attrs = attrs.with_window_level(WindowLevel::AlwaysOnTop);
        }
        attrs
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "swarm".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            options: WindowOptions::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` until it closes, and returns the first
    /// fatal error seen by either the runtime or the app.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.error.take() {
            return Err(err);
        }
        state.app.exit_status()
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    error: Option<anyhow::Error>,
    shut_down: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            error: None,
            shut_down: false,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let window = event_loop
            .create_window(self.config.window_attributes())
            .context("failed to create window")?;

        if self.config.options.click_through {
            if let Err(e) = window.set_cursor_hittest(false) {
                log::warn!("click-through unsupported on this platform: {e}");
            }
        }

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    /// Tears down in order: app resources first, then the GPU, then the window.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if !self.shut_down {
            self.shut_down = true;
            self.app.on_exit();
            self.window = None;
            log::info!("runtime shut down");
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.shutdown(event_loop);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.shut_down {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(mut entry) => {
                // Window and GPU setup happened on this clock's watch.
                entry.with_clock_mut(|clock| clock.reset());
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.shut_down {
            event_loop.exit();
            return;
        }

        // Uncapped: redraw as soon as the previous frame is presented.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.shut_down {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let mut exit_from_app_event = false;
        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            if app.on_window_event(&event) == AppControl::Exit {
                exit_from_app_event = true;
            }
        });

        if exit_from_app_event {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                let mut app_control = AppControl::Continue;

                entry.with_mut(|fields| {
                    let ft: FrameTime = fields.clock.tick();

                    // Scope to ensure `ctx` is dropped before mutating frame state.
                    {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                window: fields.window,
                            },
                            gpu: fields.gpu,
                            input: fields.input_state,
                            input_frame: fields.input_frame,
                            time: ft,
                        };

                        app_control = app.on_frame(&mut ctx);
                    }

                    // The first frame builds the app's GPU resources; keep that out of the next dt.
                    if ft.frame_index == 0 {
                        fields.clock.reset();
                    }

                    // Clear per-frame deltas after the frame is consumed.
                    fields.input_frame.clear();
                });

                if app_control == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_sets_every_presentation_flag() {
        let opts = WindowOptions::overlay();
        assert!(opts.borderless && opts.always_on_top && opts.click_through && opts.transparent);
        assert_eq!(WindowOptions::default(), WindowOptions {
            resizable: false,
            borderless: false,
            always_on_top: false,
            click_through: false,
            transparent: false,
        });
    }
}
