//! Simulation orchestrator.
//!
//! `Simulation` owns the arena, the tick systems, the event handlers, the
//! seeded random source and the effect log. Two entry points drive it:
//!
//! 1. **`step`**: run every registered tick system over every entity in id
//!    order, then settle.
//! 2. **`dispatch`**: deliver one host event to its handlers, then deliver
//!    every follow-up the handlers raised, first in first out, then settle.
//!
//! Settling flushes the despawn queue. Each despawn drops the joints the
//! entity takes part in, plus the tether of any rod tracking it as its
//! hook, and raises a `JointRemoved` follow-up per dropped joint. Settling
//! repeats until neither events nor despawns are pending.
//!
//! # Determinism
//!
//! Given the same seed, the same initial arena and the same sequence of
//! `step`/`dispatch` calls, the resulting arena and effect log are
//! identical. Entities are visited in id order and every random draw comes
//! from the seeded `ChaCha8Rng`.
//!
//! # Example
//!
//! ```
//! use lure_core::entity::{BaitComponents, EntityInner, EntityTag, TransformState};
//! use lure_core::simulation::Simulation;
//! use glam::Vec2;
//!
//! let mut sim = Simulation::new(42);
//! sim.arena_mut().spawn(
//!     EntityTag::Bait,
//!     EntityInner::Bait(BaitComponents {
//!         transform: TransformState::adrift(Vec2::ZERO),
//!         ..BaitComponents::default()
//!     }),
//! );
//!
//! for _ in 0..10 {
//!     sim.step(1.0);
//! }
//! assert_eq!(sim.tick(), 10);
//! ```

use std::collections::VecDeque;
use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::arena::Arena;
use crate::context::ExecutionContext;
use crate::entity::{Entity, EntityId};
use crate::event::GameEvent;
use crate::handler::{EventContext, HandlerTable};
use crate::handlers::TetherLifecycle;
use crate::joint::TETHER_JOINT_ID;
use crate::output::{EffectLog, Modifier, OutputEnvelope, SystemId, SystemInstanceId, TraceId};
use crate::random::RandomSource;
use crate::system::{SystemRegistry, TickContext};

/// Source id stamped on effects produced while flushing despawns.
const DESPAWN_SOURCE: &str = "despawn";

// =============================================================================
// Simulation
// =============================================================================

/// Single-threaded, fixed-tick driver for the fishing systems.
pub struct Simulation {
    /// Entity and joint state.
    arena: Arena,
    /// Tick systems bundled by entity tag.
    systems: SystemRegistry,
    /// Event handlers in registration order.
    handlers: HandlerTable,
    /// Seeded source for catch draws.
    rng: ChaCha8Rng,
    /// Seed the random source was created from.
    seed: u64,
    /// Authority and prediction flags for the next pass.
    execution: ExecutionContext,
    /// Effects produced since the last drain.
    effects: EffectLog,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("systems", &self.systems)
            .field("handlers", &self.handlers)
            .field("seed", &self.seed)
            .field("execution", &self.execution)
            .field("pending_effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates an authoritative simulation with the default systems and
    /// handlers.
    ///
    /// ```
    /// use lure_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new(12345);
    /// assert_eq!(sim.tick(), 0);
    /// assert_eq!(sim.seed(), 12345);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_parts(seed, SystemRegistry::default_bundles(), HandlerTable::default_table())
    }

    /// Creates a simulation with explicit systems and handlers.
    #[must_use]
    pub fn with_parts(seed: u64, systems: SystemRegistry, handlers: HandlerTable) -> Self {
        Self {
            arena: Arena::new(),
            systems,
            handlers,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            execution: ExecutionContext::server(),
            effects: EffectLog::new(),
        }
    }

    /// Runs one tick with the simulation's own random source.
    pub fn step(&mut self, dt: f32) {
        let Self {
            arena,
            systems,
            handlers,
            rng,
            execution,
            effects,
            ..
        } = self;
        run_tick(arena, systems, handlers, *execution, effects, dt, rng);
    }

    /// Runs one tick drawing from `rng` instead of the seeded source.
    pub fn step_with(&mut self, dt: f32, rng: &mut dyn RandomSource) {
        run_tick(
            &mut self.arena,
            &self.systems,
            &self.handlers,
            self.execution,
            &mut self.effects,
            dt,
            rng,
        );
    }

    /// Delivers a host event and everything it cascades into.
    ///
    /// All effects of one dispatch share a trace id.
    pub fn dispatch(&mut self, event: GameEvent) {
        let tick = self.arena.current_tick();
        self.effects.begin_tick(tick);
        let trace_id = self.arena.new_trace_id();
        debug!(kind = %event.kind(), subject = %event.subject(), %trace_id, "dispatching event");

        let mut queue = VecDeque::from([event]);
        settle(
            &mut self.arena,
            &self.handlers,
            self.execution,
            &mut self.effects,
            tick,
            trace_id,
            &mut queue,
        );
    }

    /// Answers the movement system's weightless query for `entity`.
    #[must_use]
    pub fn can_weightless_move(&self, entity: EntityId, can_move: bool) -> bool {
        TetherLifecycle::can_weightless_move(&self.arena, entity, can_move)
    }

    /// Returns the entity and joint state.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns the arena mutably, for setup between passes.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Returns the current tick.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Returns the seed the random source was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the flags used for the next pass.
    #[must_use]
    pub fn execution(&self) -> ExecutionContext {
        self.execution
    }

    /// Switches authority or prediction flags for the following passes.
    pub fn set_execution(&mut self, execution: ExecutionContext) {
        self.execution = execution;
    }

    /// Returns the tick system registry.
    #[must_use]
    pub fn systems_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }

    /// Returns the handler table.
    #[must_use]
    pub fn handlers_mut(&mut self) -> &mut HandlerTable {
        &mut self.handlers
    }

    /// Effects recorded since the last drain.
    #[must_use]
    pub fn effects(&self) -> &EffectLog {
        &self.effects
    }

    /// Drains the effect log.
    pub fn take_effects(&mut self) -> Vec<OutputEnvelope> {
        self.effects.drain()
    }
}

// =============================================================================
// Passes
// =============================================================================

/// One tick: every system of every entity's bundle, then settle.
fn run_tick(
    arena: &mut Arena,
    systems: &SystemRegistry,
    handlers: &HandlerTable,
    execution: ExecutionContext,
    effects: &mut EffectLog,
    dt: f32,
    rng: &mut dyn RandomSource,
) {
    let tick = arena.current_tick();
    effects.begin_tick(tick);

    // Catches spawned during the pass get ids past this snapshot and wait
    // for the next tick.
    let ids: Vec<EntityId> = arena.entity_ids_sorted().collect();
    for id in ids {
        let Some(tag) = arena.get(id).map(Entity::tag) else {
            continue;
        };
        let bundle = systems.systems_for(tag);
        if bundle.is_empty() {
            continue;
        }
        let trace_id = arena.new_trace_id();
        let mut ctx = TickContext {
            tick,
            dt,
            execution,
            trace_id,
            rng: &mut *rng,
            effects: &mut *effects,
        };
        for system in bundle {
            system.update(&mut ctx, arena, id);
        }
    }

    let mut queue = VecDeque::new();
    let trace_id = arena.new_trace_id();
    settle(arena, handlers, execution, effects, tick, trace_id, &mut queue);
    arena.advance_tick();
}

/// Delivers queued events and flushes despawns until both are exhausted.
fn settle(
    arena: &mut Arena,
    handlers: &HandlerTable,
    execution: ExecutionContext,
    effects: &mut EffectLog,
    tick: u64,
    trace_id: TraceId,
    queue: &mut VecDeque<GameEvent>,
) {
    loop {
        while let Some(event) = queue.pop_front() {
            let mut ctx = EventContext::new(tick, execution, trace_id, effects, queue);
            for handler in handlers.handlers_for(event.kind()) {
                handler.handle(&mut ctx, arena, &event);
            }
        }

        let pending = arena.take_pending_despawns();
        if pending.is_empty() {
            break;
        }
        for id in pending {
            flush_despawn(arena, effects, trace_id, id, queue);
        }
    }
}

/// Removes `id` and everything tethered through it, raising a
/// `JointRemoved` per dropped joint.
fn flush_despawn(
    arena: &mut Arena,
    effects: &mut EffectLog,
    trace_id: TraceId,
    id: EntityId,
    queue: &mut VecDeque<GameEvent>,
) {
    if !arena.contains(id) {
        return;
    }
    let source = SystemInstanceId::new(id, SystemId::new(DESPAWN_SOURCE));

    let tracking_rods: Vec<EntityId> = arena
        .entities_sorted()
        .filter(|e| {
            e.as_rod()
                .is_some_and(|rod| rod.tether.attached_projectile == Some(id))
        })
        .map(Entity::id)
        .collect();
    for rod in tracking_rods {
        let Some(joint) = arena.remove_joint(rod, TETHER_JOINT_ID) else {
            continue;
        };
        effects.record(
            Modifier::RemoveJoint {
                owner: rod,
                joint_id: TETHER_JOINT_ID.to_string(),
            },
            source.clone(),
            trace_id,
        );
        queue.push_back(GameEvent::JointRemoved {
            owner: rod,
            other: joint.body_b(),
            joint_id: TETHER_JOINT_ID.to_string(),
        });
    }

    let removed = arena.clear_joints(id);
    if !removed.is_empty() {
        effects.record(
            Modifier::ClearJoints {
                entity: id,
                removed: removed.len(),
            },
            source,
            trace_id,
        );
    }
    for joint in removed {
        queue.push_back(GameEvent::JointRemoved {
            owner: joint.owner,
            other: joint.other(),
            joint_id: joint.joint_id,
        });
    }

    arena.despawn(id);
    debug!(entity = %id, "despawned");
}

// =============================================================================
// Tests
// =============================================================================
