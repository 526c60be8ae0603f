//! One new body every 10 ms, launched from the top of the window, until 1000
//! are alive.

use swarm_engine::device::GpuInit;
use swarm_engine::frame::{FrameLoop, FrameLoopConfig};
use swarm_engine::logging::{init_logging, LoggingConfig};
use swarm_engine::sim::{Fountain, FountainOptions};
use swarm_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "swarm · fountain".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
        ..RuntimeConfig::default()
    };

    let options = FountainOptions {
        interval: 0.01,
        ..FountainOptions::default()
    };
    log::info!(
        "fountain demo: up to 1000 bodies, one every {}s",
        options.interval
    );

    let frame_loop = FrameLoop::new(
        FrameLoopConfig {
            capacity: 1000,
            ..FrameLoopConfig::default()
        },
        Fountain::new(options),
    );

    Runtime::run(config, GpuInit::default(), frame_loop)
}
