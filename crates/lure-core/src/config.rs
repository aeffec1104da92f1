//! Prototype catalog.
//!
//! Entity templates are authored as JSON and loaded into a
//! [`PrototypeCatalog`]. Templates are immutable once loaded; runtime
//! component bundles are built from them with the `instantiate` methods.
//!
//! ```
//! use lure_core::config::PrototypeCatalog;
//!
//! let catalog = PrototypeCatalog::from_json(r#"{
//!     "baits": { "Worm": { "catch_chance": 0.5 } },
//!     "hooks": { "Lure": { "joint_length": 1.0 } },
//!     "rods":  { "Rod": { "hook": "Lure", "reel_rate": 2.0 } },
//!     "tackle": { "Barbs": { "damage": { "Piercing": 5 } } }
//! }"#).unwrap();
//!
//! let worm = catalog.bait("Worm").unwrap();
//! assert_eq!(worm.catch_interval, 10.0);
//! assert_eq!(worm.catches.len(), 6);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::damage::DamageSpecifier;
use crate::entity::components::DEFAULT_JOIN_OFFSET;
use crate::entity::{
    AmmoState, BaitComponents, BaitState, CatchTable, HookState, ItemComponents,
    ProjectileComponents, RodComponents, StackState, TackleState, TetherState, TransformState,
};

/// Problems found while loading a catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into a catalog.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// `catch_interval` is zero, negative or not finite.
    #[error("bait `{prototype}`: catch_interval must be positive, got {value}")]
    InvalidInterval {
        /// Offending prototype
        prototype: String,
        /// Authored value
        value: f32,
    },
    /// `catch_chance` is NaN or negative.
    #[error("bait `{prototype}`: catch_chance must be a non-negative number, got {value}")]
    InvalidChance {
        /// Offending prototype
        prototype: String,
        /// Authored value
        value: f32,
    },
    /// A catch weight is negative or not finite.
    #[error("bait `{prototype}`: catch `{entry}` has invalid weight {weight}")]
    InvalidWeight {
        /// Offending prototype
        prototype: String,
        /// Catch id
        entry: String,
        /// Authored weight
        weight: f32,
    },
    /// `reel_rate` is negative or not finite.
    #[error("rod `{prototype}`: reel_rate must be non-negative, got {value}")]
    InvalidReelRate {
        /// Offending prototype
        prototype: String,
        /// Authored value
        value: f32,
    },
    /// `joint_length` is negative or not finite.
    #[error("hook `{prototype}`: joint_length must be non-negative, got {value}")]
    InvalidJointLength {
        /// Offending prototype
        prototype: String,
        /// Authored value
        value: f32,
    },
    /// A name refers to a prototype that is not in the catalog.
    #[error("unknown {kind} prototype `{name}`")]
    UnknownPrototype {
        /// Prototype family
        kind: &'static str,
        /// Missing name
        name: String,
    },
}

// =============================================================================
// Prototypes
// =============================================================================

/// Template for placed bait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaitPrototype {
    /// Seconds between catch attempts.
    pub catch_interval: f32,
    /// Probability that an attempt bites.
    pub catch_chance: f32,
    /// Ordered outcome table.
    pub catches: CatchTable,
    /// Units in a fresh stack.
    pub stack: u32,
}

impl Default for BaitPrototype {
    fn default() -> Self {
        let state = BaitState::default();
        Self {
            catch_interval: state.catch_interval,
            catch_chance: state.catch_chance,
            catches: state.catches,
            stack: 1,
        }
    }
}

impl BaitPrototype {
    /// Builds bait components placed at `transform`.
    #[must_use]
    pub fn instantiate(&self, transform: TransformState) -> BaitComponents {
        BaitComponents {
            transform,
            stack: StackState::new(self.stack),
            bait: BaitState {
                elapsed_time: 0.0,
                catch_interval: self.catch_interval,
                catch_chance: self.catch_chance,
                catches: self.catches.clone(),
            },
        }
    }
}

fn default_reel_rate() -> f32 {
    2.5
}

fn default_rope_sprite() -> String {
    "fishing_line".to_string()
}

fn default_reel_sound() -> String {
    "fishing_reel".to_string()
}

fn default_cycle_sound() -> String {
    "fishing_cycle".to_string()
}

fn default_join_offset() -> Vec2 {
    DEFAULT_JOIN_OFFSET
}

fn default_ammo_capacity() -> u32 {
    1
}

/// Template for a fishing rod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodPrototype {
    /// Hook prototype the rod fires. Required.
    pub hook: String,
    /// Line shortening speed in units per second.
    #[serde(default = "default_reel_rate")]
    pub reel_rate: f32,
    /// Sprite drawn along the line.
    #[serde(default = "default_rope_sprite")]
    pub rope_sprite: String,
    /// Sound looped while reeling.
    #[serde(default = "default_reel_sound")]
    pub reel_sound: String,
    /// Sound played on reload.
    #[serde(default = "default_cycle_sound")]
    pub cycle_sound: String,
    /// Rope anchor on the projectile.
    #[serde(default = "default_join_offset")]
    pub projectile_join_offset: Vec2,
    /// Hooks the rod can hold.
    #[serde(default = "default_ammo_capacity")]
    pub ammo_capacity: u32,
}

impl RodPrototype {
    /// Builds rod components placed at `transform`, fully loaded.
    #[must_use]
    pub fn instantiate(&self, transform: TransformState) -> RodComponents {
        RodComponents {
            transform,
            tether: TetherState {
                reel_rate: self.reel_rate,
                rope_sprite: self.rope_sprite.clone(),
                projectile_join_offset: self.projectile_join_offset,
                reel_sound: self.reel_sound.clone(),
                cycle_sound: self.cycle_sound.clone(),
                ..TetherState::default()
            },
            ammo: AmmoState::full(self.ammo_capacity),
            ..RodComponents::default()
        }
    }
}

/// Template for the tether-capable projectile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookPrototype {
    /// Shortest length the line can be reeled to.
    pub joint_length: f32,
    /// Damage dealt on hit.
    pub damage: Option<DamageSpecifier>,
}

impl HookPrototype {
    /// Builds projectile components placed at `transform`.
    #[must_use]
    pub fn instantiate(&self, transform: TransformState) -> ProjectileComponents {
        ProjectileComponents {
            transform,
            damage: self.damage.clone(),
            hook: Some(HookState {
                joint_length: self.joint_length,
            }),
            ..ProjectileComponents::default()
        }
    }
}

/// Template for a tackle item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacklePrototype {
    /// Bonus merged into every fired projectile. Required.
    pub damage: DamageSpecifier,
}

impl TacklePrototype {
    /// Builds item components for a tackle item named `prototype`.
    #[must_use]
    pub fn instantiate(&self, prototype: &str) -> ItemComponents {
        ItemComponents {
            prototype: prototype.to_string(),
            tackle: Some(TackleState {
                damage: self.damage.clone(),
            }),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Every prototype known to a simulation, by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrototypeCatalog {
    /// Bait templates.
    pub baits: BTreeMap<String, BaitPrototype>,
    /// Rod templates.
    pub rods: BTreeMap<String, RodPrototype>,
    /// Hook templates.
    pub hooks: BTreeMap<String, HookPrototype>,
    /// Tackle templates.
    pub tackle: BTreeMap<String, TacklePrototype>,
}

impl PrototypeCatalog {
    /// Parses and validates a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON (including a tackle
    /// entry without `damage`), or the first validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks every template.
    ///
    /// Catch tables whose total weight exceeds 1.0 are accepted with a
    /// warning: entries past the point where the running total passes 1.0
    /// can never be selected.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value or dangling reference found, in
    /// prototype name order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, bait) in &self.baits {
            if !(bait.catch_interval.is_finite() && bait.catch_interval > 0.0) {
                return Err(ConfigError::InvalidInterval {
                    prototype: name.clone(),
                    value: bait.catch_interval,
                });
            }
            if bait.catch_chance.is_nan() || bait.catch_chance < 0.0 {
                return Err(ConfigError::InvalidChance {
                    prototype: name.clone(),
                    value: bait.catch_chance,
                });
            }
            for entry in bait.catches.entries() {
                if !(entry.weight.is_finite() && entry.weight >= 0.0) {
                    return Err(ConfigError::InvalidWeight {
                        prototype: name.clone(),
                        entry: entry.id.clone(),
                        weight: entry.weight,
                    });
                }
            }
            let total = bait.catches.total_weight();
            if total > 1.0 {
                warn!(
                    prototype = %name,
                    total_weight = total,
                    "catch table exceeds 1.0; trailing entries are unreachable"
                );
            }
        }

        for (name, rod) in &self.rods {
            if !(rod.reel_rate.is_finite() && rod.reel_rate >= 0.0) {
                return Err(ConfigError::InvalidReelRate {
                    prototype: name.clone(),
                    value: rod.reel_rate,
                });
            }
            self.hook(&rod.hook)?;
        }

        for (name, hook) in &self.hooks {
            if !(hook.joint_length.is_finite() && hook.joint_length >= 0.0) {
                return Err(ConfigError::InvalidJointLength {
                    prototype: name.clone(),
                    value: hook.joint_length,
                });
            }
        }

        Ok(())
    }

    /// Looks up a bait template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPrototype`] if `name` is not present.
    pub fn bait(&self, name: &str) -> Result<&BaitPrototype, ConfigError> {
        self.baits.get(name).ok_or_else(|| unknown("bait", name))
    }

    /// Looks up a rod template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPrototype`] if `name` is not present.
    pub fn rod(&self, name: &str) -> Result<&RodPrototype, ConfigError> {
        self.rods.get(name).ok_or_else(|| unknown("rod", name))
    }

    /// Looks up a hook template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPrototype`] if `name` is not present.
    pub fn hook(&self, name: &str) -> Result<&HookPrototype, ConfigError> {
        self.hooks.get(name).ok_or_else(|| unknown("hook", name))
    }

    /// Looks up a tackle template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPrototype`] if `name` is not present.
    pub fn tackle(&self, name: &str) -> Result<&TacklePrototype, ConfigError> {
        self.tackle.get(name).ok_or_else(|| unknown("tackle", name))
    }
}

fn unknown(kind: &'static str, name: &str) -> ConfigError {
    ConfigError::UnknownPrototype {
        kind,
        name: name.to_string(),
    }
}
