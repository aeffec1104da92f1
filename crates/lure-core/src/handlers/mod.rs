//! Built-in event handlers.
//!
//! - [`TackleDamageInjector`]: adds tackle bonuses to fired projectiles
//! - [`TetherLifecycle`]: attaches, embeds, reloads and releases the line

pub mod tackle;
pub mod tether;

pub use tackle::TackleDamageInjector;
pub use tether::TetherLifecycle;
