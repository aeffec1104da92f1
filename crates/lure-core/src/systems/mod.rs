//! Built-in tick systems.
//!
//! - [`CatchResolver`]: periodic catch attempts for adrift bait
//! - [`ReelController`]: shortens a reeling rod's tether

pub mod catch;
pub mod reel;

pub use catch::CatchResolver;
pub use reel::ReelController;
