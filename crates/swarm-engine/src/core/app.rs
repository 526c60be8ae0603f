use winit::event::WindowEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the runtime is shutting down, while the GPU context
    /// is still alive.
    fn on_exit(&mut self) {}

    /// Outcome reported by `Runtime::run` after the event loop ends.
    ///
    /// An app that stopped on a fatal error hands it back here.
    fn exit_status(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
