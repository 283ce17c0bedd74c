//! RVC Simulator - stand-in for the two-axis carriage controller
//!
//! Host binary that behaves like the carriage on the far end of its serial
//! link: it accepts framed requests on stdin, answers on stdout and
//! publishes joint-state telemetry. Logs go to stderr.
//!
//! Usage: `rvc-sim [CONFIG.toml]`

use std::path::PathBuf;

use embassy_executor::Spawner;
use embassy_time::Timer;
use static_cell::StaticCell;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_settings, Settings};
use crate::error::SimResult;
use crate::link::SimulatedLink;

mod channels;
mod config;
mod controller;
mod error;
mod link;
mod tasks;

// Settings must live forever for task references
static SETTINGS: StaticCell<Settings> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    init_tracing();
    info!("RVC simulator starting...");

    if let Err(e) = run(spawner).await {
        error!("{}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(spawner: Spawner) -> SimResult<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings: &'static Settings = SETTINGS.init(load_settings(path.as_deref())?);
    info!("Configuration loaded");

    let link = SimulatedLink::open(&settings.boot.port)?;
    link.spawn_receiver()?;

    // Wait for device to ready
    Timer::after_millis(settings.boot.settle_ms).await;

    spawner.spawn(tasks::link_tx_task()).unwrap();
    spawner
        .spawn(tasks::controller_task(settings.sim, &settings.boot.frame_id))
        .unwrap();

    info!("All tasks spawned, simulator running on {}", link.port());
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn exit_code(e: &error::SimError) -> i32 {
    match e {
        error::SimError::Config(_) => 2,
        error::SimError::Link { .. } | error::SimError::Io(_) => 1,
    }
}
