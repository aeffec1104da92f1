//! Bait catch resolver.
//!
//! Every tick, bait that is adrift accumulates time. Once more than
//! `catch_interval` seconds have passed the timer resets and one catch
//! attempt is made:
//!
//! 1. Draw a chance roll; the attempt bites iff `roll < min(catch_chance, 1)`.
//! 2. Draw a target and walk the catch table in order, accumulating weights.
//!    The first entry whose running total exceeds the target is selected.
//! 3. Take one unit from the bait stack, then spawn the selected prototype
//!    next to the bait. If the stack is empty nothing spawns.
//!
//! Draws are independent: the target is only drawn after a successful
//! chance roll. Nothing in here ever fails loudly.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::context::EffectSink;
use crate::entity::{CatchEntry, CatchTable, Entity, EntityId, EntityTag};
use crate::output::{Command, Event, Modifier, OutputKind, SystemId};
use crate::system::{SystemDeclaration, TickContext, TickSystem};

/// Returns `true` if a chance roll bites. Chances above 1.0 behave as 1.0.
#[must_use]
pub fn roll_succeeds(catch_chance: f32, chance_roll: f32) -> bool {
    chance_roll < catch_chance.min(1.0)
}

/// Walks `table` in order and returns the first entry whose running total
/// exceeds `target`.
///
/// Returns `None` when `target` lies in the residual mass past the total.
///
/// ```
/// use lure_core::entity::CatchTable;
/// use lure_core::systems::catch::weighted_walk;
///
/// let table = CatchTable::from_pairs([("A", 0.5), ("B", 0.3)]);
/// assert_eq!(weighted_walk(&table, 0.2).map(|e| e.id.as_str()), Some("A"));
/// assert_eq!(weighted_walk(&table, 0.6).map(|e| e.id.as_str()), Some("B"));
/// assert!(weighted_walk(&table, 0.9).is_none());
/// ```
#[must_use]
pub fn weighted_walk(table: &CatchTable, target: f32) -> Option<&CatchEntry> {
    let mut running_total = 0.0_f32;
    table.entries().iter().find(|entry| {
        running_total += entry.weight;
        running_total > target
    })
}

/// Outcome of one catch attempt given both draws.
#[must_use]
pub fn resolve_attempt(
    catch_chance: f32,
    catches: &CatchTable,
    chance_roll: f32,
    target: f32,
) -> Option<&CatchEntry> {
    if roll_succeeds(catch_chance, chance_roll) {
        weighted_walk(catches, target)
    } else {
        None
    }
}

/// Tick system for bait entities.
#[derive(Debug, Clone)]
pub struct CatchResolver {
    declaration: SystemDeclaration,
}

impl CatchResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration {
                id: SystemId::new("catch"),
                required_tags: vec![EntityTag::Bait],
                emits: vec![OutputKind::Command, OutputKind::Modifier, OutputKind::Event],
            },
        }
    }
}

impl Default for CatchResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSystem for CatchResolver {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn update(&self, ctx: &mut TickContext<'_>, arena: &mut Arena, entity: EntityId) {
        let id = &self.declaration.id;
        let Some(bait) = arena.get_mut(entity).and_then(Entity::as_bait_mut) else {
            return;
        };
        if !bait.transform.is_adrift() {
            return;
        }

        bait.bait.elapsed_time += ctx.dt;
        if bait.bait.elapsed_time <= bait.bait.catch_interval {
            return;
        }
        bait.bait.elapsed_time = 0.0;

        let chance_roll = ctx.rng.next_f32();
        if !roll_succeeds(bait.bait.catch_chance, chance_roll) {
            trace!(bait = %entity, chance_roll, "catch attempt missed");
            return;
        }

        let target = ctx.rng.next_f32();
        let Some(prototype) = weighted_walk(&bait.bait.catches, target).map(|e| e.id.clone()) else {
            trace!(bait = %entity, target, "catch attempt landed in residual mass");
            return;
        };

        if !bait.stack.try_use(1) {
            trace!(bait = %entity, %prototype, "bait stack exhausted");
            return;
        }
        let remaining = bait.stack.count;
        ctx.record(
            id,
            entity,
            Modifier::ConsumeStack {
                entity,
                amount: 1,
                remaining,
            },
        );

        if let Some(spawned) = arena.spawn_next_to(&prototype, entity) {
            debug!(bait = %entity, %prototype, %spawned, "catch landed");
            ctx.record(
                id,
                entity,
                Command::SpawnNextTo {
                    prototype: prototype.clone(),
                    anchor: entity,
                    spawned,
                },
            );
            ctx.record(
                id,
                entity,
                Event::CatchLanded {
                    bait: entity,
                    prototype,
                    spawned,
                },
            );
        }

        if remaining == 0 && ctx.execution().is_authoritative() {
            arena.queue_despawn(entity);
            ctx.record(id, entity, Command::QueueDelete { entity });
        }
    }
}
