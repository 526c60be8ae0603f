//! The physics box drawn straight onto the desktop: transparent, borderless,
//! always on top and click-through. Escape quits.

use swarm_engine::coords::ColorRgba;
use swarm_engine::device::GpuInit;
use swarm_engine::frame::{FrameLoop, FrameLoopConfig};
use swarm_engine::logging::{init_logging, LoggingConfig};
use swarm_engine::physics::PhysicsConfig;
use swarm_engine::sim::{Rigid, RigidOptions};
use swarm_engine::window::{Runtime, RuntimeConfig, WindowOptions};
use winit::dpi::LogicalSize;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "swarm · overlay".to_string(),
        initial_size: LogicalSize::new(1920.0, 1080.0),
        options: WindowOptions::overlay(),
    };

    let sim = Rigid::new(RigidOptions {
        physics: PhysicsConfig::with_pixels_per_unit(40.0),
        ..RigidOptions::default()
    });

    log::info!("overlay demo: transparent click-through window, Escape quits");

    let frame_loop = FrameLoop::new(
        FrameLoopConfig {
            capacity: 200,
            clear_color: ColorRgba::transparent(),
            ..FrameLoopConfig::default()
        },
        sim,
    );

    Runtime::run(config, GpuInit::default().transparent(), frame_loop)
}
