//! Cross-module tests.
//!
//! - `determinism.rs`: same seed and inputs give the same arena and effects;
//!   property tests for the weighted walk and the reel
//! - `integration.rs`: catch and tether flows driven through `Simulation`
//! - `helpers.rs`: entity factories and state accessors

mod helpers;
mod integration;

pub use helpers::*;
