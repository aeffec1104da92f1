//! Typed damage magnitudes.
//!
//! A [`DamageSpecifier`] maps a damage type (`"Piercing"`, `"Blunt"`, ...) to a
//! magnitude. Tackle modifiers are merged into projectile damage additively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map of damage type to magnitude.
///
/// Backed by a `BTreeMap` so iteration (and therefore merge and logging
/// order) is deterministic.
///
/// ```
/// use lure_core::damage::DamageSpecifier;
///
/// let mut shot = DamageSpecifier::from_pairs([("Piercing", 2.0), ("Blunt", 1.0)]);
/// shot.merge_additive(&DamageSpecifier::from_pairs([("Piercing", 5.0)]));
///
/// assert_eq!(shot.get("Piercing"), Some(7.0));
/// assert_eq!(shot.get("Blunt"), Some(1.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageSpecifier(BTreeMap<String, f32>);

impl DamageSpecifier {
    /// Creates an empty specifier.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a specifier from `(type, magnitude)` pairs.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(kind, amount)| (kind.to_string(), amount))
                .collect(),
        )
    }

    /// Returns the magnitude for a damage type.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<f32> {
        self.0.get(kind).copied()
    }

    /// Iterates `(type, magnitude)` pairs in type order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.0.iter().map(|(kind, amount)| (kind.as_str(), *amount))
    }

    /// Number of damage types present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no damage type is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds every magnitude of `bonus` into `self`.
    ///
    /// Types missing from `self` are inserted; existing ones are summed.
    pub fn merge_additive(&mut self, bonus: &DamageSpecifier) {
        for (kind, amount) in &bonus.0 {
            *self.0.entry(kind.clone()).or_insert(0.0) += *amount;
        }
    }
}
