//! Support library for the `adventure` binary.
//!
//! Exposes the command pipeline, dataset store, time side channel and game
//! loop so doctests and unit tests can drive them without a subprocess.

pub mod cli;
pub mod clock;
pub mod game;
pub mod logging;
pub mod store;
