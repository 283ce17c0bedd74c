//! Command handlers on the machine

use super::{Command, RejectReason, Reply, Status};
use crate::motion::Point;
use crate::state::Machine;

impl Machine {
    /// Dispatch one command
    pub fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::Move { dx, dy } => self.move_by(dx, dy),
            Command::MoveTo { x, y } => self.move_to(x, y),
            Command::VelocityScale(scale) => {
                self.set_velocity_scale(scale);
                Reply::Silent
            }
            Command::Halt => self.halt(),
            Command::Tap => self.tap(),
            Command::Home => self.home(),
            Command::SetEndEffector(down) => Reply::Status(self.set_end_effector(down)),
            Command::SetLed(on) => Reply::Status(self.set_led(on)),
            Command::SetMotors(on) => Reply::Status(self.set_motors(on)),
        }
    }

    /// Shift the goal by `(dx, dy)`
    pub fn move_by(&mut self, dx: f64, dy: f64) -> Reply {
        self.retarget(self.goal.offset(dx, dy))
    }

    /// Replace the goal with `(x, y)`
    pub fn move_to(&mut self, x: f64, y: f64) -> Reply {
        self.retarget(Point::new(x, y))
    }

    /// Cancel in-flight motion at the current position
    pub fn halt(&mut self) -> Reply {
        self.retarget(self.position)
    }

    /// Set the velocity scale, clamped into `[0, 1]`
    pub fn set_velocity_scale(&mut self, scale: f64) {
        self.scale.set(scale);
    }

    /// Press the end effector for the configured hold time
    ///
    /// Tapping while a hold is running restarts it.
    pub fn tap(&mut self) -> Reply {
        self.actuators.endeff_down = true;
        self.tap.press(self.config.tap_hold_ticks());
        Reply::Pending
    }

    /// Start the homing sequence
    pub fn home(&mut self) -> Reply {
        match self
            .homing
            .start(self.actuators.motors_on, self.scale.get())
        {
            Ok(()) => Reply::Pending,
            Err(e) => Reply::Status(Status::failed(e.message())),
        }
    }

    /// Press or release the end effector
    pub fn set_end_effector(&mut self, down: bool) -> Status {
        self.actuators.endeff_down = down;
        if down {
            Status::ok("End Effector Pressed")
        } else {
            Status::ok("End Effector Released")
        }
    }

    /// Light or darken the status LED
    pub fn set_led(&mut self, on: bool) -> Status {
        self.actuators.led_on = on;
        if on {
            Status::ok("LED Lit")
        } else {
            Status::ok("LED Off")
        }
    }

    /// Enable or disable the motors
    pub fn set_motors(&mut self, on: bool) -> Status {
        self.actuators.motors_on = on;
        if on {
            Status::ok("Motors Enabled")
        } else {
            Status::ok("Motors Disabled")
        }
    }

    fn retarget(&mut self, goal: Point) -> Reply {
        if self.homing.is_active() {
            return Reply::Rejected(RejectReason::HomingInProgress);
        }
        if !goal.is_finite() {
            return Reply::Rejected(RejectReason::NonFiniteTarget);
        }
        self.set_goal(goal);
        Reply::Ack
    }
}
