//! Per-tick systems.
//!
//! A [`TickSystem`] runs once per tick on every entity whose tag it was
//! registered for. Unlike event handlers, tick systems see the passage of
//! time (`dt`) and may draw random numbers.
//!
//! Systems mutate the [`Arena`] directly and record what they did through
//! the [`TickContext`], which feeds the simulation's
//! [`EffectLog`](crate::output::EffectLog).
//!
//! # Registry
//!
//! The [`SystemRegistry`] bundles systems by entity tag. Bait entities get
//! the [`CatchResolver`](crate::systems::CatchResolver); rods get the
//! [`ReelController`](crate::systems::ReelController).
//!
//! ```
//! use lure_core::entity::EntityTag;
//! use lure_core::system::SystemRegistry;
//!
//! let registry = SystemRegistry::default_bundles();
//! assert_eq!(registry.systems_for(EntityTag::Bait).len(), 1);
//! assert_eq!(registry.systems_for(EntityTag::Rod).len(), 1);
//! assert!(registry.systems_for(EntityTag::Prop).is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::arena::Arena;
use crate::context::{EffectSink, ExecutionContext};
use crate::entity::{EntityId, EntityTag};
use crate::output::{EffectLog, Output, OutputKind, SystemId, SystemInstanceId, TraceId};
use crate::random::RandomSource;

// =============================================================================
// Declaration
// =============================================================================

/// What a tick system runs on and what it may produce.
#[derive(Debug, Clone)]
pub struct SystemDeclaration {
    /// Unique identifier for this system.
    pub id: SystemId,
    /// Entity tags this system operates on.
    pub required_tags: Vec<EntityTag>,
    /// Output kinds this system may record.
    pub emits: Vec<OutputKind>,
}

impl SystemDeclaration {
    /// Checks if this system operates on the given entity tag.
    #[must_use]
    pub fn supports_tag(&self, tag: EntityTag) -> bool {
        self.required_tags.contains(&tag)
    }

    /// Checks if this system may record the given output kind.
    #[must_use]
    pub fn emits_output(&self, kind: OutputKind) -> bool {
        self.emits.contains(&kind)
    }
}

// =============================================================================
// Tick Context
// =============================================================================

/// Everything a tick system needs besides the arena.
pub struct TickContext<'a> {
    /// The current simulation tick.
    pub tick: u64,
    /// Seconds covered by this tick.
    pub dt: f32,
    /// Authority and prediction flags.
    pub execution: ExecutionContext,
    /// Trace shared by every effect of this entity pass.
    pub trace_id: TraceId,
    /// Uniform draws in `[0, 1)`.
    pub rng: &'a mut dyn RandomSource,
    /// Destination of recorded effects.
    pub effects: &'a mut EffectLog,
}

impl TickContext<'_> {
    /// Records an effect on behalf of `system` acting on `entity`.
    pub fn record(&mut self, system: &SystemId, entity: EntityId, output: impl Into<Output>) {
        self.effects.record(
            output,
            SystemInstanceId::new(entity, system.clone()),
            self.trace_id,
        );
    }
}

impl EffectSink for TickContext<'_> {
    fn execution(&self) -> ExecutionContext {
        self.execution
    }

    fn emit(&mut self, source: SystemInstanceId, output: Output) {
        self.effects.record(output, source, self.trace_id);
    }
}

impl fmt::Debug for TickContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickContext")
            .field("tick", &self.tick)
            .field("dt", &self.dt)
            .field("execution", &self.execution)
            .field("trace_id", &self.trace_id)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tick System Trait
// =============================================================================

/// Logic run once per tick for one entity.
///
/// Implementations must be deterministic given the arena, the context
/// flags and the draws taken from `ctx.rng`.
pub trait TickSystem: Send + Sync {
    /// Returns the system's declaration.
    fn declaration(&self) -> &SystemDeclaration;

    /// Advances `entity` by one tick.
    ///
    /// Entities that lack the expected components are skipped silently.
    fn update(&self, ctx: &mut TickContext<'_>, arena: &mut Arena, entity: EntityId);
}

// =============================================================================
// Registry
// =============================================================================

/// Tick systems bundled by entity tag, in registration order.
#[derive(Default)]
pub struct SystemRegistry {
    bundles: HashMap<EntityTag, Vec<Arc<dyn TickSystem>>>,
}

impl SystemRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Registers a system for the given entity tag.
    pub fn register(&mut self, tag: EntityTag, system: Arc<dyn TickSystem>) {
        self.bundles.entry(tag).or_default().push(system);
    }

    /// Returns the systems registered for `tag`, or an empty slice.
    #[must_use]
    pub fn systems_for(&self, tag: EntityTag) -> &[Arc<dyn TickSystem>] {
        self.bundles.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Total number of registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// Returns true if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.values().all(Vec::is_empty)
    }

    /// Creates a registry with the catch resolver on bait and the reel
    /// controller on rods.
    #[must_use]
    pub fn default_bundles() -> Self {
        use crate::systems::{CatchResolver, ReelController};

        let mut registry = Self::new();
        registry.register(EntityTag::Bait, Arc::new(CatchResolver::new()));
        registry.register(EntityTag::Rod, Arc::new(ReelController::new()));
        registry
    }
}

impl fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("bundle_count", &self.bundles.len())
            .field("registration_count", &self.registration_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRolls;

    struct CountingSystem {
        declaration: SystemDeclaration,
    }

    impl CountingSystem {
        fn new(id: &str, tags: Vec<EntityTag>) -> Self {
            Self {
                declaration: SystemDeclaration {
                    id: SystemId::new(id),
                    required_tags: tags,
                    emits: vec![OutputKind::Modifier],
                },
            }
        }
    }

    impl TickSystem for CountingSystem {
        fn declaration(&self) -> &SystemDeclaration {
            &self.declaration
        }

        fn update(&self, ctx: &mut TickContext<'_>, _arena: &mut Arena, entity: EntityId) {
            ctx.record(
                &self.declaration.id,
                entity,
                crate::output::Modifier::WakeBody { entity },
            );
        }
    }

    mod declaration_tests {
        use super::*;

        #[test]
        fn supports_and_emits() {
            let system = CountingSystem::new("count", vec![EntityTag::Rod]);
            let decl = system.declaration();
            assert!(decl.supports_tag(EntityTag::Rod));
            assert!(!decl.supports_tag(EntityTag::Bait));
            assert!(decl.emits_output(OutputKind::Modifier));
            assert!(!decl.emits_output(OutputKind::Event));
        }
    }

    mod context_tests {
        use super::*;

        #[test]
        fn record_stamps_source_and_trace() {
            let mut rolls = ScriptedRolls::default();
            let mut log = EffectLog::new();
            let mut ctx = TickContext {
                tick: 0,
                dt: 0.5,
                execution: ExecutionContext::server(),
                trace_id: TraceId::new(11),
                rng: &mut rolls,
                effects: &mut log,
            };
            let mut arena = Arena::new();
            let system = CountingSystem::new("count", vec![EntityTag::Rod]);
            system.update(&mut ctx, &mut arena, EntityId::new(3));

            let entry = &log.entries()[0];
            assert_eq!(entry.trace_id(), TraceId::new(11));
            assert_eq!(entry.source().to_string(), "count@3");
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn register_keeps_order_per_tag() {
            let mut registry = SystemRegistry::new();
            assert!(registry.is_empty());
            registry.register(EntityTag::Rod, Arc::new(CountingSystem::new("a", vec![EntityTag::Rod])));
            registry.register(EntityTag::Rod, Arc::new(CountingSystem::new("b", vec![EntityTag::Rod])));

            let ids: Vec<_> = registry
                .systems_for(EntityTag::Rod)
                .iter()
                .map(|s| s.declaration().id.as_str().to_string())
                .collect();
            assert_eq!(ids, vec!["a", "b"]);
            assert_eq!(registry.registration_count(), 2);
        }

        #[test]
        fn default_bundles_declare_their_tags() {
            let registry = SystemRegistry::default_bundles();
            for (tag, systems) in [
                (EntityTag::Bait, registry.systems_for(EntityTag::Bait)),
                (EntityTag::Rod, registry.systems_for(EntityTag::Rod)),
            ] {
                assert!(systems.iter().all(|s| s.declaration().supports_tag(tag)));
            }
        }

        #[test]
        fn debug_format() {
            let registry = SystemRegistry::default_bundles();
            let debug = format!("{registry:?}");
            assert!(debug.contains("registration_count: 2"));
        }
    }
}
