//! Campus Week library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the headless game entry point.
//! This library crate exposes the engine so that `tests/` integration
//! tests can drive the simulation without a window or GPU.

pub mod shared;
pub mod config;
pub mod metrics;
pub mod calendar;
pub mod streaks;
pub mod activities;
pub mod scoring;
pub mod level;
pub mod session;
pub mod autoplay;
