//! # Lure Core
//!
//! Deterministic bait, catch and tethered-reel simulation for Lure.
//!
//! ## Architecture
//!
//! - **Entities**: bait, rods, hook projectiles, props, tackle items, actors
//! - **Tick systems**: the catch resolver (bait) and reel controller (rods)
//! - **Event handlers**: tackle damage injection and the tether lifecycle
//! - **Effects**: everything produced is recorded with causal metadata in
//!   an [`output::EffectLog`] for the host to drain
//!
//! Systems and handlers mutate the [`arena::Arena`] directly and record what
//! they did. The [`simulation::Simulation`] drives both and flushes
//! deferred deletions between passes.
//!
//! ## Usage
//!
//! ```
//! use lure_core::config::PrototypeCatalog;
//! use lure_core::entity::{EntityInner, EntityTag, TransformState};
//! use lure_core::simulation::Simulation;
//! use glam::Vec2;
//!
//! let catalog = PrototypeCatalog::from_json(r#"{ "baits": { "Worm": {} } }"#).unwrap();
//! let worm = catalog.bait("Worm").unwrap();
//!
//! let mut sim = Simulation::new(7);
//! sim.arena_mut().spawn(
//!     EntityTag::Bait,
//!     EntityInner::Bait(worm.instantiate(TransformState::adrift(Vec2::ZERO))),
//! );
//! sim.step(1.0);
//! assert_eq!(sim.tick(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod context;
pub mod damage;
pub mod entity;
pub mod event;
pub mod handler;
pub mod handlers;
pub mod joint;
pub mod output;
pub mod random;
pub mod simulation;
pub mod system;
pub mod systems;

#[cfg(test)]
mod tests;
