//! Main controller task
//!
//! Owns the [`Controller`] and multiplexes host requests, motion ticks and
//! telemetry ticks. Startup homing runs here before the first request is
//! taken off the channel.

use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Instant, Ticker};
use tracing::{debug, info, warn};

use rvc_core::config::SimConfig;
use rvc_core::state::Event;

use crate::channels::{OUTBOUND_CHANNEL, REQUEST_CHANNEL};
use crate::controller::{Controller, Outbox};

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(config: SimConfig, frame_id: &'static str) {
    info!("Controller task started");

    let start = Instant::now();
    let mut controller = Controller::new(config, frame_id);
    let mut motion = Ticker::every(Duration::from_millis(config.tick_ms.into()));
    let mut outbox = Outbox::new();

    boot_homing(&mut controller, &mut motion, start, &mut outbox).await;

    let mut telemetry = Ticker::every(Duration::from_millis(config.telemetry_ms.into()));
    info!("Carriage ready, accepting requests");

    loop {
        match select3(REQUEST_CHANNEL.receive(), motion.next(), telemetry.next()).await {
            Either3::First(request) => controller.handle_request(request, &mut outbox),
            Either3::Second(()) => {
                controller.tick(elapsed_ms(start), &mut outbox);
            }
            Either3::Third(()) => controller.publish_setpoint(elapsed_ms(start), &mut outbox),
        }
        flush(&mut outbox).await;
    }
}

/// Enable motors and home, ticking until the carriage is at the origin
async fn boot_homing(
    controller: &mut Controller,
    motion: &mut Ticker,
    start: Instant,
    outbox: &mut Outbox,
) {
    info!("Beginning homing sequence");
    controller.enable_motors();

    if let Err(status) = controller.start_homing() {
        warn!("{}", status.message);
        info!("Homing failed.");
        return;
    }

    loop {
        motion.next().await;
        let events = controller.tick(elapsed_ms(start), outbox);
        flush(outbox).await;
        if events.iter().any(Event::is_homing_result) {
            break;
        }
    }
    info!("Homing successful.");
    debug!("State after homing: {:?}", controller.machine().snapshot());
}

/// Hand queued frames to the link TX task
async fn flush(outbox: &mut Outbox) {
    for frame in core::mem::take(outbox) {
        OUTBOUND_CHANNEL.send(frame).await;
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis()
}
