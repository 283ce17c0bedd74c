//! Controller bridging the link protocol and the carriage machine
//!
//! The controller is the single owner of the [`Machine`]. It:
//! - Translates host requests into core commands
//! - Answers each request, holding deferred `tap`/`home` callers until the
//!   tick that completes them
//! - Turns tick events into `goal_js` records
//! - Builds periodic `setpoint_js` records
//!
//! Everything it produces is queued as encoded frames in an [`Outbox`].

use heapless::Vec;
use tracing::{debug, info, warn};

use rvc_core::command::{Command, RejectReason, Reply, Status, HOMED_MESSAGE};
use rvc_core::config::SimConfig;
use rvc_core::state::{Event, Machine, TickEvents};
use rvc_protocol::{
    Frame, HostCommand, HostRequest, RejectCode, Seq, SeqCounter, SimMessage, TelemetryRecord,
    JOINT_NAMES,
};

/// Most tap callers waiting on one release
pub const MAX_PENDING_TAPS: usize = 8;

/// Most frames produced by one controller step
pub const MAX_OUTBOX: usize = 16;

/// Frames waiting to be written to the link
pub type Outbox = Vec<Frame, MAX_OUTBOX>;

/// Controller state wrapping the machine
pub struct Controller {
    machine: Machine,
    /// Frame id for joint-state records
    frame_id: &'static str,
    /// Callers waiting for the current tap to release
    pending_taps: Vec<Seq, MAX_PENDING_TAPS>,
    /// Caller waiting for homing to finish
    pending_home: Option<Seq>,
    setpoint_seq: SeqCounter,
    goal_seq: SeqCounter,
}

impl Controller {
    /// Create a controller around a fresh machine
    pub fn new(config: SimConfig, frame_id: &'static str) -> Self {
        Self::with_machine(Machine::new(config), frame_id)
    }

    /// Create a controller around an existing machine
    pub fn with_machine(machine: Machine, frame_id: &'static str) -> Self {
        Self {
            machine,
            frame_id,
            pending_taps: Vec::new(),
            pending_home: None,
            setpoint_seq: SeqCounter::new(),
            goal_seq: SeqCounter::new(),
        }
    }

    /// The carriage machine
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Enable motors as part of startup
    pub fn enable_motors(&mut self) -> Status {
        self.machine.set_motors(true)
    }

    /// Start the startup homing run, which has no caller to answer
    pub fn start_homing(&mut self) -> Result<(), Status> {
        match self.machine.home() {
            Reply::Pending => Ok(()),
            Reply::Status(status) => Err(status),
            _ => Err(Status::failed("Failed to home.")),
        }
    }

    /// Apply one host request, queueing its response
    pub fn handle_request(&mut self, request: HostRequest, out: &mut Outbox) {
        let HostRequest { seq, command } = request;
        debug!("Request {}: {:?}", seq, command);

        let command = to_command(command);
        if command == Command::Tap && self.pending_taps.is_full() {
            warn!("Too many tap callers waiting, refusing request {}", seq);
            emit(out, SimMessage::Rejected { seq, code: RejectCode::Busy });
            return;
        }

        match self.machine.handle(command) {
            Reply::Ack => emit(out, SimMessage::Ack { seq }),
            Reply::Silent => {}
            Reply::Pending => self.defer(seq, command),
            Reply::Status(status) => {
                if command == Command::Home {
                    info!("Home request {} refused: {}", seq, status.message);
                }
                emit(out, status_message(seq, status));
            }
            Reply::Rejected(reason) => {
                debug!("Request {} rejected: {:?}", seq, reason);
                emit(
                    out,
                    SimMessage::Rejected {
                        seq,
                        code: reject_code(reason),
                    },
                );
            }
        }
    }

    /// Advance the machine one motion tick, queueing the frames it causes
    pub fn tick(&mut self, now_ms: u64, out: &mut Outbox) -> TickEvents {
        let events = self.machine.tick();

        for event in &events {
            match *event {
                Event::GoalReached(position) => {
                    debug!("Goal reached at ({}, {})", position.x, position.y);
                    let seq = self.goal_seq.next_seq();
                    emit(out, SimMessage::GoalJs(self.record(seq, now_ms)));
                }
                Event::HomingStageComplete(stage) => {
                    debug!("Homing stage {:?} complete", stage);
                }
                Event::HomingSweepComplete => {
                    debug!("Homing sweep complete, returning to origin");
                }
                Event::Homed => {
                    info!("Carriage homed");
                    if let Some(seq) = self.pending_home.take() {
                        emit(out, status_message(seq, Status::ok(HOMED_MESSAGE)));
                    }
                }
                Event::TapReleased => {
                    for seq in core::mem::take(&mut self.pending_taps) {
                        emit(out, SimMessage::Ack { seq });
                    }
                }
            }
        }

        events
    }

    /// Queue one `setpoint_js` record
    pub fn publish_setpoint(&mut self, now_ms: u64, out: &mut Outbox) {
        let seq = self.setpoint_seq.next_seq();
        emit(out, SimMessage::SetpointJs(self.record(seq, now_ms)));
    }

    fn defer(&mut self, seq: Seq, command: Command) {
        match command {
            Command::Tap => {
                // Capacity checked before the command ran
                let _ = self.pending_taps.push(seq);
            }
            Command::Home => {
                info!("Home request {}: beginning homing sequence", seq);
                self.pending_home = Some(seq);
            }
            _ => {}
        }
    }

    fn record(&self, seq: u32, now_ms: u64) -> TelemetryRecord<'static> {
        TelemetryRecord {
            seq,
            stamp_ms: now_ms,
            frame_id: self.frame_id,
            name: JOINT_NAMES,
            position: self.machine.position().to_array(),
            effort: self.machine.collision().to_array(),
        }
    }
}

fn to_command(command: HostCommand) -> Command {
    match command {
        HostCommand::MoveJr { dx, dy } => Command::Move { dx, dy },
        HostCommand::MoveJp { x, y } => Command::MoveTo { x, y },
        HostCommand::VelocityScale(scale) => Command::VelocityScale(scale),
        HostCommand::Halt => Command::Halt,
        HostCommand::Tap => Command::Tap,
        HostCommand::Home => Command::Home,
        HostCommand::SetEndEff(down) => Command::SetEndEffector(down),
        HostCommand::SetLed(on) => Command::SetLed(on),
        HostCommand::SetMotors(on) => Command::SetMotors(on),
    }
}

fn reject_code(reason: RejectReason) -> RejectCode {
    match reason {
        RejectReason::HomingInProgress => RejectCode::Busy,
        RejectReason::NonFiniteTarget => RejectCode::Invalid,
    }
}

fn status_message(seq: Seq, status: Status) -> SimMessage<'static> {
    SimMessage::Status {
        seq,
        success: status.success,
        message: status.message,
    }
}

fn emit(out: &mut Outbox, message: SimMessage<'_>) {
    match message.to_frame() {
        Ok(frame) => {
            if out.push(frame).is_err() {
                warn!("Outbox full, dropping {:?}", message);
            }
        }
        Err(e) => warn!("Failed to encode {:?}: {:?}", message, e),
    }
}
