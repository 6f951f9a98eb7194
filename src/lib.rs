#![cfg_attr(not(test), no_std)]

//! # plant-stand
//! ## An automated plant-care stand controller in Rust
//!
//! Features:
//! - Distance, temperature, light and soil moisture monitoring
//! - Lift motor keeping the lamp arm at a configured gap
//! - Lamp switching on a light threshold
//! - Interval-gated watering pump
//! - RGB status indicator and buzzer alerts (mutable)
//! - Four-button menu on a 16x2 character LCD for editing thresholds
//!
//! The control logic is hardware-independent: it talks to the board through
//! the capability traits in [`hal`] and the `embedded-hal` traits, so the whole
//! library runs its tests on the host:
//!
//! `cargo test --lib --target x86_64-unknown-linux-gnu`

pub mod actuators;
pub mod app;
pub mod config;
pub mod error;
pub mod hal;
pub mod input;
mod log;
pub mod menu;
pub mod policy;
pub mod rendering;
pub mod sensors;
pub mod settings;
pub mod timer;

#[cfg(test)]
mod testing;

pub use app::{AppState, PlantStand};
pub use error::{Error, Result};
pub use sensors::SensorSnapshot;
pub use settings::Settings;
