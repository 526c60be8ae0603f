use crate::coords::{ColorRgba, CoordMapper};
use crate::core::{App, AppControl, FrameCtx};
use crate::input::{InputFrame, Key};
use crate::instances::InstanceStore;
use crate::render::{DirtyAttrs, MirrorLayout, RenderMode, ShapeRenderer};
use crate::sim::Simulation;

use super::sequence::Simulated;

#[derive(Debug, Clone)]
pub struct FrameLoopConfig {
    /// Maximum live instances; GPU buffers are sized to this once.
    pub capacity: usize,
    pub layout: MirrorLayout,
    pub clear_color: ColorRgba,
    /// Switches between fill and wireframe.
    pub toggle_key: Key,
    pub close_key: Key,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            layout: MirrorLayout::Interleaved,
            clear_color: ColorRgba::black(),
            toggle_key: Key::Space,
            close_key: Key::Escape,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// Nothing allocated yet; the first frame builds everything.
    Init,
    Running,
    /// Close observed; simulation and GPU resources released.
    Terminating,
}

/// Drives one `Simulation` into one `ShapeRenderer`.
///
/// Single-threaded: store, simulation and renderer live on the event-loop
/// thread and are touched only from `on_frame`.
pub struct FrameLoop<S: Simulation> {
    config: FrameLoopConfig,
    state: LoopState,
    sim: Option<S>,
    store: InstanceStore<S::Link>,
    mapper: Option<CoordMapper>,
    renderer: Option<ShapeRenderer>,
    mode: RenderMode,
    /// Attributes changed since the last upload that reached the device.
    unsent: DirtyAttrs,
    frames: u64,
    fatal: Option<anyhow::Error>,
}

impl<S: Simulation> FrameLoop<S> {
    pub fn new(config: FrameLoopConfig, sim: S) -> Self {
        assert!(config.capacity > 0, "frame loop capacity must be positive");
        Self {
            store: InstanceStore::with_capacity(config.capacity),
            config,
            state: LoopState::Init,
            sim: Some(sim),
            mapper: None,
            renderer: None,
            mode: RenderMode::default(),
            unsent: DirtyAttrs::NONE,
            frames: 0,
            fatal: None,
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[inline]
    pub fn store(&self) -> &InstanceStore<S::Link> {
        &self.store
    }

    /// Direct store access, e.g. to place instances before `start`.
    #[inline]
    pub fn store_mut(&mut self) -> &mut InstanceStore<S::Link> {
        &mut self.store
    }

    #[inline]
    pub fn mapper(&self) -> Option<&CoordMapper> {
        self.mapper.as_ref()
    }

    pub fn simulation(&self) -> Option<&S> {
        self.sim.as_ref()
    }

    /// Binds the window mapping and populates the store. `Init` → `Running`.
    pub fn start(&mut self, mapper: CoordMapper) {
        assert_eq!(self.state, LoopState::Init, "frame loop already started");
        if let Some(sim) = self.sim.as_mut() {
            sim.populate(&mut self.store, &mapper);
        }
        self.mapper = Some(mapper);
        self.state = LoopState::Running;
        log::info!(
            "frame loop running: {}/{} instances, {:?} layout",
            self.store.count(),
            self.store.capacity(),
            self.config.layout
        );
    }

    /// Steps the simulation and writes its state into the store.
    ///
    /// The returned dirty set also covers earlier frames whose upload never
    /// happened, so a skipped frame cannot leave stale attributes on the device.
    pub fn simulate(&mut self, dt: f32) -> Simulated {
        assert_eq!(self.state, LoopState::Running, "simulate outside the running state");
        let (Some(sim), Some(mapper)) = (self.sim.as_mut(), self.mapper.as_ref()) else {
            unreachable!("running frame loop without simulation or mapper");
        };
        let outcome = sim.step(dt, &mut self.store, mapper);
        self.unsent |= sim.sync(&mut self.store, mapper);
        self.frames += 1;
        Simulated::new(outcome, self.unsent)
    }

    /// Marks everything simulated so far as resident on the device.
    fn upload_done(&mut self) {
        self.unsent = DirtyAttrs::NONE;
    }

    /// Applies this frame's key transitions. Returns `Exit` on a close key.
    pub fn handle_input(&mut self, input: &InputFrame) -> AppControl {
        if input.pressed(self.config.close_key) {
            log::info!("close key pressed");
            return AppControl::Exit;
        }
        if input.pressed(self.config.toggle_key) {
            self.mode = self.mode.toggled();
            log::info!("render mode: {:?}", self.mode);
        }
        AppControl::Continue
    }

    /// Releases the simulation and GPU resources. Idempotent.
    pub fn terminate(&mut self) {
        if self.state == LoopState::Terminating {
            return;
        }
        self.state = LoopState::Terminating;
        self.renderer = None;
        self.sim = None;
        log::info!("frame loop terminated after {} frames", self.frames);
    }

    fn init_gpu(&mut self, ctx: &FrameCtx<'_, '_>) -> anyhow::Result<()> {
        let mapper = CoordMapper::new(ctx.window.viewport());
        self.start(mapper);
        let renderer = ShapeRenderer::new(
            &ctx.render_ctx(),
            self.config.layout,
            mapper.projection(),
            &self.store.pack(),
        )?;
        log::info!("present mode: {:?}", ctx.gpu.present_mode());
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl<S: Simulation> App for FrameLoop<S> {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // The setup frame only places instances; its measured time covers
        // GPU initialization, not simulation.
        let dt = match self.state {
            LoopState::Init => {
                if let Err(e) = self.init_gpu(ctx) {
                    self.fatal = Some(e.context("frame loop initialization failed"));
                    return AppControl::Exit;
                }
                0.0
            }
            LoopState::Running => ctx.time.dt,
            LoopState::Terminating => return AppControl::Exit,
        };

        if self.handle_input(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }

        let simulated = self.simulate(dt);

        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Exit;
        };
        let store = &self.store;
        let mode = self.mode;
        let mut drawn = false;
        let control = ctx.render(self.config.clear_color, |rctx, target| {
            let uploaded = renderer.upload(rctx.queue, store, simulated);
            renderer.draw(target, uploaded, mode);
            drawn = true;
        });
        if drawn {
            self.upload_done();
        }
        control
    }

    fn on_exit(&mut self) {
        self.terminate();
    }

    fn exit_status(&mut self) -> anyhow::Result<()> {
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
