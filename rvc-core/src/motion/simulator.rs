//! Fixed-rate position integrator
//!
//! Moves the carriage in a straight line toward its goal. The axis with the
//! larger remaining distance runs at the full scaled speed; the other axis is
//! slowed proportionally so the velocity vector points exactly at the goal.
//! Once an axis is within the snap distance it lands exactly on the goal,
//! which turns asymptotic approach into bit-exact convergence.

use super::position::{abs, Point};
use crate::config::SimConfig;

/// Current motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Position equals goal
    Stopped,
    /// Position is still converging
    Moving,
}

/// Per-axis velocity in units per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Motion simulator
///
/// Stateless apart from its constants; the caller owns position and goal.
#[derive(Debug, Clone, Copy)]
pub struct MotionSimulator {
    /// Nominal top speed (units/s)
    speed: f64,
    /// Tick period (s)
    tick_s: f64,
    /// Snap-to-goal distance
    snap_epsilon: f64,
}

impl MotionSimulator {
    /// Create a simulator from explicit constants
    pub fn new(speed: f64, tick_s: f64, snap_epsilon: f64) -> Self {
        Self {
            speed,
            tick_s,
            snap_epsilon,
        }
    }

    /// Create a simulator from the carriage configuration
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.speed, config.tick_s(), config.snap_epsilon)
    }

    /// Nominal top speed
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Tick period in seconds
    pub fn tick_s(&self) -> f64 {
        self.tick_s
    }

    /// Velocity that points from `position` to `goal`
    ///
    /// The major axis gets `speed * scale` in the sign of its delta. Ties
    /// pick x as the major axis. A zero delta is always the minor axis, so
    /// the only divisor is the non-zero major delta.
    pub fn velocity(&self, position: Point, goal: Point, scale: f64) -> Velocity {
        let dx = goal.x - position.x;
        let dy = goal.y - position.y;

        if dx == 0.0 && dy == 0.0 {
            return Velocity::default();
        }

        let top = self.speed * scale;
        if abs(dy) > abs(dx) {
            Velocity {
                x: dx / abs(dy) * top,
                y: top * dy / abs(dy),
            }
        } else {
            Velocity {
                x: top * dx / abs(dx),
                y: dy / abs(dx) * top,
            }
        }
    }

    /// Advance `position` by one tick toward `goal`
    pub fn step(&self, position: Point, goal: Point, scale: f64) -> Point {
        let v = self.velocity(position, goal, scale);

        let mut next = Point::new(
            position.x + v.x * self.tick_s,
            position.y + v.y * self.tick_s,
        );

        if abs(goal.x - next.x) <= self.snap_epsilon {
            next.x = goal.x;
        }
        if abs(goal.y - next.y) <= self.snap_epsilon {
            next.y = goal.y;
        }

        next
    }

    /// Motion state for a position/goal pair
    pub fn state(position: Point, goal: Point) -> MotionState {
        if position == goal {
            MotionState::Stopped
        } else {
            MotionState::Moving
        }
    }
}

impl Default for MotionSimulator {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_until_stopped(
        sim: &MotionSimulator,
        mut position: Point,
        goal: Point,
        scale: f64,
        max_ticks: u32,
    ) -> (Point, u32) {
        let mut ticks = 0;
        while position != goal && ticks < max_ticks {
            position = sim.step(position, goal, scale);
            ticks += 1;
        }
        (position, ticks)
    }

    #[test]
    fn test_zero_velocity_at_goal() {
        let sim = MotionSimulator::default();
        let p = Point::new(-200.0, 150.0);
        assert_eq!(sim.velocity(p, p, 1.0), Velocity::default());
        assert_eq!(sim.step(p, p, 1.0), p);
        assert_eq!(MotionSimulator::state(p, p), MotionState::Stopped);
    }

    #[test]
    fn test_major_axis_runs_at_full_speed() {
        let sim = MotionSimulator::default();
        let v = sim.velocity(Point::ORIGIN, Point::new(100.0, 50.0), 1.0);
        assert_eq!(v.x, 120.0);
        assert_eq!(v.y, 60.0);

        let v = sim.velocity(Point::ORIGIN, Point::new(-50.0, -100.0), 0.5);
        assert_eq!(v.x, -30.0);
        assert_eq!(v.y, -60.0);
    }

    #[test]
    fn test_zero_delta_axis_is_minor() {
        let sim = MotionSimulator::default();

        // Pure x move: dy == 0 must not be a divisor
        let v = sim.velocity(Point::ORIGIN, Point::new(-100.0, 0.0), 1.0);
        assert_eq!(v.x, -120.0);
        assert_eq!(v.y, 0.0);
        assert!(v.y.is_finite());

        // Pure y move
        let v = sim.velocity(Point::ORIGIN, Point::new(0.0, 100.0), 1.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 120.0);
    }

    #[test]
    fn test_tie_selects_x_as_major() {
        let sim = MotionSimulator::default();
        let v = sim.velocity(Point::ORIGIN, Point::new(10.0, -10.0), 1.0);
        assert_eq!(v.x, 120.0);
        assert_eq!(v.y, -120.0);
    }

    #[test]
    fn test_snap_within_epsilon() {
        let sim = MotionSimulator::default();
        let goal = Point::new(2.0, -1.0);
        // Both axes already within 2.4 of goal
        assert_eq!(sim.step(Point::ORIGIN, goal, 1.0), goal);
    }

    #[test]
    fn test_snap_applies_with_zero_scale() {
        let sim = MotionSimulator::default();
        let goal = Point::new(1.0, 100.0);
        let next = sim.step(Point::ORIGIN, goal, 0.0);
        assert_eq!(next.x, 1.0);
        assert_eq!(next.y, 0.0);
    }

    #[test]
    fn test_example_move_to_converges() {
        let sim = MotionSimulator::default();
        let start = Point::new(-200.0, 150.0);
        let goal = Point::new(-300.0, 150.0);

        let (end, ticks) = run_until_stopped(&sim, start, goal, 1.0, 1000);
        assert_eq!(end, goal);
        // 100 units at 2.4 units per tick
        assert!(ticks <= 42, "took {} ticks", ticks);

        // Fixed point
        assert_eq!(sim.step(end, goal, 1.0), goal);
    }

    #[test]
    fn test_converges_at_fastest_valid_speed() {
        let config = SimConfig {
            speed: 240.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
        let sim = MotionSimulator::from_config(&config);

        for goal in [105.0, 7.3, -2.5, 4.8, 1000.1] {
            let goal = Point::new(goal, goal / 3.0);
            let (end, _) = run_until_stopped(&sim, Point::new(0.0, 0.0), goal, 1.0, 10_000);
            assert_eq!(end, goal);
        }
    }

    #[test]
    fn test_straight_line_path() {
        let sim = MotionSimulator::default();
        let goal = Point::new(300.0, 150.0);
        let mut p = Point::ORIGIN;
        for _ in 0..50 {
            p = sim.step(p, goal, 1.0);
            if p == goal {
                break;
            }
            // y stays on the line y = x / 2
            assert!(abs(p.y - p.x / 2.0) < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_converges_exactly(
            sx in -1000.0f64..1000.0,
            sy in -1000.0f64..1000.0,
            gx in -1000.0f64..1000.0,
            gy in -1000.0f64..1000.0,
            scale in 0.05f64..=1.0,
        ) {
            let sim = MotionSimulator::default();
            let start = Point::new(sx, sy);
            let goal = Point::new(gx, gy);

            let major = abs(gx - sx).max(abs(gy - sy));
            let per_tick = sim.speed() * scale * sim.tick_s();
            let bound = (major / per_tick) as u32 + 3;

            let (end, ticks) = run_until_stopped(&sim, start, goal, scale, bound + 1);
            prop_assert_eq!(end, goal);
            prop_assert!(ticks <= bound);

            let mut p = end;
            for _ in 0..10 {
                p = sim.step(p, goal, scale);
                prop_assert_eq!(p, goal);
            }
        }

        #[test]
        fn prop_speed_bounded(
            gx in -1000.0f64..1000.0,
            gy in -1000.0f64..1000.0,
            scale in 0.0f64..=1.0,
        ) {
            let sim = MotionSimulator::default();
            let v = sim.velocity(Point::ORIGIN, Point::new(gx, gy), scale);
            let top = sim.speed() * scale;
            prop_assert!(abs(v.x) <= top + 1e-9);
            prop_assert!(abs(v.y) <= top + 1e-9);
        }
    }
}
