//! Carriage machine
//!
//! Owns every piece of simulated state: position, goal, actuators, velocity
//! scale, the goal-reached detector, the tap timer and the homing sequence.
//! A single owner drives it by `&mut` reference, so ticks and commands can
//! never interleave mid-update.

use heapless::Vec;

use super::actuators::{ActuatorState, VelocityScale};
use super::detector::GoalReachedDetector;
use super::events::{Event, MAX_TICK_EVENTS};
use super::tap::TapTimer;
use crate::config::SimConfig;
use crate::motion::{HomingPhase, HomingProgress, HomingSequence, MotionSimulator, Point};

/// Events produced by one tick
pub type TickEvents = Vec<Event, MAX_TICK_EVENTS>;

/// Point-in-time view of the machine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Carriage position
    pub position: Point,
    /// Commanded goal
    pub goal: Point,
    /// Collision offset passed through to telemetry
    pub collision: Point,
    /// Actuator flags
    pub actuators: ActuatorState,
    /// Effective velocity scale
    pub velocity_scale: f64,
    /// Homing phase, if homing
    pub homing: Option<HomingPhase>,
    /// End effector is held by a tap
    pub tap_holding: bool,
}

/// Simulated two-axis carriage
#[derive(Debug, Clone)]
pub struct Machine {
    pub(crate) config: SimConfig,
    pub(crate) simulator: MotionSimulator,
    pub(crate) homing: HomingSequence,
    pub(crate) position: Point,
    pub(crate) goal: Point,
    pub(crate) collision: Point,
    pub(crate) actuators: ActuatorState,
    pub(crate) scale: VelocityScale,
    pub(crate) detector: GoalReachedDetector,
    pub(crate) tap: TapTimer,
    /// Ticks since creation
    ticks: u64,
}

impl Machine {
    /// Create a machine at the origin with motors off and full velocity
    pub fn new(config: SimConfig) -> Self {
        Self::with_position(config, Point::ORIGIN)
    }

    /// Create a machine resting at `position`
    pub fn with_position(config: SimConfig, position: Point) -> Self {
        Self {
            simulator: MotionSimulator::from_config(&config),
            homing: HomingSequence::new(&config),
            config,
            position,
            goal: position,
            collision: Point::ORIGIN,
            actuators: ActuatorState::default(),
            scale: VelocityScale::default(),
            detector: GoalReachedDetector::new(),
            tap: TapTimer::new(),
            ticks: 0,
        }
    }

    /// Carriage configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current goal
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Collision offset
    pub fn collision(&self) -> Point {
        self.collision
    }

    /// Update the collision offset
    ///
    /// The offset is owned by whatever detects collisions; the machine only
    /// carries it into telemetry.
    pub fn set_collision(&mut self, offset: Point) {
        self.collision = offset;
    }

    /// Actuator flags
    pub fn actuators(&self) -> ActuatorState {
        self.actuators
    }

    /// Effective velocity scale
    pub fn velocity_scale(&self) -> f64 {
        self.scale.get()
    }

    /// Check if homing is running
    pub fn is_homing(&self) -> bool {
        self.homing.is_active()
    }

    /// Check if a tap is holding the end effector
    pub fn is_tapping(&self) -> bool {
        self.tap.is_holding()
    }

    /// Ticks since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Capture the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            goal: self.goal,
            collision: self.collision,
            actuators: self.actuators,
            velocity_scale: self.scale.get(),
            homing: self.homing.phase(),
            tap_holding: self.tap.is_holding(),
        }
    }

    /// Check if motion ticks move the carriage right now
    pub fn motion_enabled(&self) -> bool {
        !self.config.gate_motion_on_motors || self.actuators.motors_on
    }

    /// Advance the machine by one tick
    ///
    /// While homing, the homing sequence owns the carriage and neither the
    /// motion simulator nor the goal-reached detector run.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::new();
        self.ticks = self.ticks.wrapping_add(1);

        if self.tap.tick() {
            self.actuators.endeff_down = false;
            let _ = events.push(Event::TapReleased);
        }

        if self.homing.is_active() {
            self.advance_homing(&mut events);
            return events;
        }

        if self.motion_enabled() {
            self.position = self
                .simulator
                .step(self.position, self.goal, self.scale.get());
        }

        if self.detector.observe(self.position, self.goal) {
            let _ = events.push(Event::GoalReached(self.position));
        }

        events
    }

    /// Replace the goal and start a new convergence episode
    pub(crate) fn set_goal(&mut self, goal: Point) {
        self.goal = goal;
        self.detector.rearm();
    }

    fn advance_homing(&mut self, events: &mut TickEvents) {
        match self.homing.advance(&mut self.position, self.scale.get()) {
            HomingProgress::Idle | HomingProgress::Stepped | HomingProgress::Settling => {}
            HomingProgress::StageComplete(stage) => {
                let _ = events.push(Event::HomingStageComplete(stage));
            }
            HomingProgress::SweepComplete => {
                self.set_goal(Point::ORIGIN);
                let _ = events.push(Event::HomingSweepComplete);
            }
            HomingProgress::Complete => {
                let _ = events.push(Event::Homed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_reached_count(events: &TickEvents) -> usize {
        events.iter().filter(|e| e.is_goal_event()).count()
    }

    #[test]
    fn test_new_machine_defaults() {
        let machine = Machine::new(SimConfig::default());
        let snap = machine.snapshot();
        assert_eq!(snap.position, Point::ORIGIN);
        assert_eq!(snap.goal, Point::ORIGIN);
        assert_eq!(snap.collision, Point::ORIGIN);
        assert_eq!(snap.velocity_scale, 1.0);
        assert!(!snap.actuators.motors_on);
        assert_eq!(snap.homing, None);
        assert!(!snap.tap_holding);
    }

    #[test]
    fn test_idle_machine_reports_nothing() {
        let mut machine = Machine::new(SimConfig::default());
        for _ in 0..10 {
            assert!(machine.tick().is_empty());
        }
        assert_eq!(machine.ticks(), 10);
    }

    #[test]
    fn test_motion_runs_with_motors_off_by_default() {
        let mut machine = Machine::new(SimConfig::default());
        machine.set_goal(Point::new(100.0, 0.0));
        machine.tick();
        assert!(machine.position().x > 0.0);
    }

    #[test]
    fn test_motion_gated_on_motors_when_configured() {
        let config = SimConfig {
            gate_motion_on_motors: true,
            ..Default::default()
        };
        let mut machine = Machine::new(config);
        machine.set_goal(Point::new(100.0, 0.0));

        for _ in 0..5 {
            machine.tick();
        }
        assert_eq!(machine.position(), Point::ORIGIN);

        machine.actuators.motors_on = true;
        machine.tick();
        assert!(machine.position().x > 0.0);
    }

    #[test]
    fn test_goal_reached_once_per_episode() {
        let mut machine = Machine::new(SimConfig::default());
        machine.set_goal(Point::new(50.0, 20.0));

        let mut reached = 0;
        for _ in 0..200 {
            reached += goal_reached_count(&machine.tick());
        }
        assert_eq!(reached, 1);
        assert_eq!(machine.position(), Point::new(50.0, 20.0));

        machine.set_goal(Point::new(-50.0, 20.0));
        for _ in 0..200 {
            reached += goal_reached_count(&machine.tick());
        }
        assert_eq!(reached, 2);
    }

    #[test]
    fn test_collision_passthrough() {
        let mut machine = Machine::new(SimConfig::default());
        machine.set_collision(Point::new(1.5, -0.5));
        machine.set_goal(Point::new(30.0, 0.0));
        for _ in 0..20 {
            machine.tick();
        }
        assert_eq!(machine.collision(), Point::new(1.5, -0.5));
        assert_eq!(machine.snapshot().collision, Point::new(1.5, -0.5));
    }
}
