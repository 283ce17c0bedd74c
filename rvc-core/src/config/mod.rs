//! Configuration types
//!
//! Board-agnostic tunables for the simulated carriage.

pub mod types;

pub use types::*;
