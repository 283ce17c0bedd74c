//! Board-agnostic core logic for the robotic vial carriage simulator
//!
//! This crate contains all simulation logic that does not depend on a
//! transport or a runtime:
//!
//! - Kinematic motion toward a goal
//! - Goal-reached detection
//! - Homing sequence
//! - Actuator state and tap timing
//! - Command surface
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod config;
pub mod motion;
pub mod state;
