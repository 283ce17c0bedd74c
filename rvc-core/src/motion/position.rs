//! Carriage coordinate types
//!
//! Positions, goals and bounds are all plain `(x, y)` pairs in position
//! units. Equality is exact: the simulator snaps onto goals so that
//! convergence can be tested with `==`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Carriage axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

impl Axis {
    /// Both axes in telemetry order
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Axis name as published in telemetry
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// A point on the carriage plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin established by homing
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Read one axis
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Write one axis
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Coordinates as an array in telemetry order
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Component-wise sum
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Absolute value without std
pub(crate) fn abs(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_names() {
        assert_eq!(Axis::X.name(), "x");
        assert_eq!(Axis::Y.name(), "y");
        assert_eq!(Axis::ALL, [Axis::X, Axis::Y]);
    }

    #[test]
    fn test_point_axis_access() {
        let mut p = Point::new(-200.0, 150.0);
        assert_eq!(p.get(Axis::X), -200.0);
        assert_eq!(p.get(Axis::Y), 150.0);

        p.set(Axis::Y, 0.0);
        assert_eq!(p, Point::new(-200.0, 0.0));
        assert_eq!(p.to_array(), [-200.0, 0.0]);
    }

    #[test]
    fn test_point_offset() {
        let p = Point::ORIGIN.offset(10.0, -5.0).offset(-10.0, 5.0);
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn test_point_finite() {
        assert!(Point::new(1.0, -1.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_abs() {
        assert_eq!(abs(-2.5), 2.5);
        assert_eq!(abs(2.5), 2.5);
        assert_eq!(abs(0.0), 0.0);
    }
}
