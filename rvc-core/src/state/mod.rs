//! Carriage state
//!
//! The machine owns all mutable simulation state. Ticks advance it and
//! report what happened as events.

pub mod actuators;
pub mod detector;
pub mod events;
pub mod machine;
pub mod tap;

pub use actuators::{ActuatorState, VelocityScale};
pub use detector::GoalReachedDetector;
pub use events::Event;
pub use machine::{Machine, Snapshot, TickEvents};
pub use tap::TapTimer;
