//! Shapes jumping to random spots every frame, all spinning together.
//!
//! Space toggles wireframe, Escape quits.

use swarm_engine::device::GpuInit;
use swarm_engine::frame::{FrameLoop, FrameLoopConfig};
use swarm_engine::logging::{init_logging, LoggingConfig};
use swarm_engine::sim::{Scatter, ScatterOptions};
use swarm_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "swarm · scatter".to_string(),
        initial_size: LogicalSize::new(1920.0, 1080.0),
        ..RuntimeConfig::default()
    };

    let options = ScatterOptions::default();
    log::info!(
        "scatter demo: 100 shapes, {} rad/s, recolor {}",
        options.rotation_speed,
        options.recolor
    );

    let frame_loop = FrameLoop::new(
        FrameLoopConfig {
            capacity: 100,
            ..FrameLoopConfig::default()
        },
        Scatter::new(options),
    );

    Runtime::run(config, GpuInit::default(), frame_loop)
}
