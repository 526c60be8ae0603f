//! A box of circles and rects dropped under gravity.

use swarm_engine::device::GpuInit;
use swarm_engine::frame::{FrameLoop, FrameLoopConfig};
use swarm_engine::logging::{init_logging, LoggingConfig};
use swarm_engine::physics::PhysicsConfig;
use swarm_engine::render::MirrorLayout;
use swarm_engine::sim::{Rigid, RigidOptions};
use swarm_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

const CAPACITY: usize = 400;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "swarm · rigid".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
        ..RuntimeConfig::default()
    };

    let physics = PhysicsConfig::with_pixels_per_unit(48.0);
    log::info!(
        "rigid demo: {CAPACITY} bodies, {} px/unit, gravity {:?}",
        physics.pixels_per_unit,
        physics.gravity
    );
    let sim = Rigid::new(RigidOptions {
        physics,
        ..RigidOptions::default()
    });

    // Only pose changes per frame; separate buffers keep scale/color static.
    let frame_loop = FrameLoop::new(
        FrameLoopConfig {
            capacity: CAPACITY,
            layout: MirrorLayout::Separate,
            ..FrameLoopConfig::default()
        },
        sim,
    );

    Runtime::run(config, GpuInit::default(), frame_loop)
}
