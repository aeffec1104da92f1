//! Tackle damage injection.
//!
//! When a rod fires, every tackle item in its tackle container adds its
//! damage bonus to every launched projectile that deals damage. Merging
//! is additive per damage type, so the order of tackle items does not
//! matter.

use tracing::debug;

use crate::arena::Arena;
use crate::damage::DamageSpecifier;
use crate::entity::Entity;
use crate::event::{EventKind, GameEvent};
use crate::handler::{EventContext, EventHandler, HandlerDeclaration};
use crate::output::{Modifier, SystemId};

/// Merges tackle bonuses into fired projectiles.
#[derive(Debug, Clone)]
pub struct TackleDamageInjector {
    declaration: HandlerDeclaration,
}

impl TackleDamageInjector {
    /// Creates the injector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: HandlerDeclaration {
                id: SystemId::new("tackle"),
                handles: vec![EventKind::ShotFired],
            },
        }
    }
}

impl Default for TackleDamageInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for TackleDamageInjector {
    fn declaration(&self) -> &HandlerDeclaration {
        &self.declaration
    }

    fn handle(&self, ctx: &mut EventContext<'_>, arena: &mut Arena, event: &GameEvent) {
        let GameEvent::ShotFired { rod, ammo, .. } = event else {
            return;
        };
        let Some(tackle) = arena.get(*rod).and_then(Entity::as_rod).map(|r| r.tackle.clone()) else {
            return;
        };

        let bonuses: Vec<DamageSpecifier> = tackle
            .iter()
            .filter_map(|item| {
                let state = arena.get(*item)?.as_item()?.tackle.as_ref()?;
                Some(state.damage.clone())
            })
            .collect();
        if bonuses.is_empty() {
            return;
        }

        for &shot in ammo {
            let Some(damage) = arena
                .get_mut(shot)
                .and_then(Entity::as_projectile_mut)
                .and_then(|p| p.damage.as_mut())
            else {
                continue;
            };
            for bonus in &bonuses {
                damage.merge_additive(bonus);
            }
            debug!(rod = %rod, projectile = %shot, tackle = bonuses.len(), "tackle damage applied");
            for bonus in &bonuses {
                ctx.record(
                    &self.declaration.id,
                    *rod,
                    Modifier::MergeDamage {
                        projectile: shot,
                        bonus: bonus.clone(),
                    },
                );
            }
        }
    }
}
