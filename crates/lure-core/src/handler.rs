//! Event handlers.
//!
//! Each [`EventHandler`] declares the [`EventKind`]s it reacts to. The
//! [`HandlerTable`] routes a [`GameEvent`] to every handler that declared
//! its kind, in registration order, and each handler runs to completion
//! before the next one starts.
//!
//! Handlers may raise follow-up events through the [`EventContext`]. The
//! simulation delivers those after the current event, first in first out.
//!
//! ```
//! use lure_core::event::EventKind;
//! use lure_core::handler::HandlerTable;
//!
//! let table = HandlerTable::default_table();
//! let shot: Vec<_> = table
//!     .handlers_for(EventKind::ShotFired)
//!     .map(|h| h.declaration().id.to_string())
//!     .collect();
//! assert_eq!(shot, vec!["tackle", "tether"]);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::arena::Arena;
use crate::context::{EffectSink, ExecutionContext};
use crate::entity::EntityId;
use crate::event::{EventKind, GameEvent};
use crate::output::{EffectLog, Output, SystemId, SystemInstanceId, TraceId};

/// What a handler reacts to.
#[derive(Debug, Clone)]
pub struct HandlerDeclaration {
    /// Unique identifier for this handler.
    pub id: SystemId,
    /// Event kinds routed to this handler.
    pub handles: Vec<EventKind>,
}

impl HandlerDeclaration {
    /// Checks if this handler reacts to `kind`.
    #[must_use]
    pub fn handles_kind(&self, kind: EventKind) -> bool {
        self.handles.contains(&kind)
    }
}

/// Everything a handler needs besides the arena.
pub struct EventContext<'a> {
    /// The current simulation tick.
    pub tick: u64,
    /// Authority and prediction flags.
    pub execution: ExecutionContext,
    /// Trace shared by the dispatched event and its follow-ups.
    pub trace_id: TraceId,
    effects: &'a mut EffectLog,
    follow_ups: &'a mut VecDeque<GameEvent>,
}

impl<'a> EventContext<'a> {
    /// Creates a context writing into `effects` and `follow_ups`.
    #[must_use]
    pub fn new(
        tick: u64,
        execution: ExecutionContext,
        trace_id: TraceId,
        effects: &'a mut EffectLog,
        follow_ups: &'a mut VecDeque<GameEvent>,
    ) -> Self {
        Self {
            tick,
            execution,
            trace_id,
            effects,
            follow_ups,
        }
    }

    /// Records an effect on behalf of `handler` acting on `entity`.
    pub fn record(&mut self, handler: &SystemId, entity: EntityId, output: impl Into<Output>) {
        self.effects.record(
            output,
            SystemInstanceId::new(entity, handler.clone()),
            self.trace_id,
        );
    }

    /// Queues an event for delivery after the current one.
    pub fn raise(&mut self, event: GameEvent) {
        self.follow_ups.push_back(event);
    }
}

impl EffectSink for EventContext<'_> {
    fn execution(&self) -> ExecutionContext {
        self.execution
    }

    fn emit(&mut self, source: SystemInstanceId, output: Output) {
        self.effects.record(output, source, self.trace_id);
    }
}

impl fmt::Debug for EventContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("tick", &self.tick)
            .field("execution", &self.execution)
            .field("trace_id", &self.trace_id)
            .field("pending_follow_ups", &self.follow_ups.len())
            .finish_non_exhaustive()
    }
}

/// Reaction to discrete events.
///
/// Handlers silently ignore events about entities that are gone or lack
/// the expected components.
pub trait EventHandler: Send + Sync {
    /// Returns the handler's declaration.
    fn declaration(&self) -> &HandlerDeclaration;

    /// Reacts to one event.
    fn handle(&self, ctx: &mut EventContext<'_>, arena: &mut Arena, event: &GameEvent);
}

/// Handlers in registration order.
#[derive(Default)]
pub struct HandlerTable {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl HandlerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Iterates the handlers that react to `kind`, in registration order.
    pub fn handlers_for(&self, kind: EventKind) -> impl Iterator<Item = &Arc<dyn EventHandler>> + '_ {
        self.handlers
            .iter()
            .filter(move |handler| handler.declaration().handles_kind(kind))
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Creates a table with the tackle damage injector followed by the
    /// tether lifecycle.
    ///
    /// The injector is registered first so that fired projectiles carry
    /// their bonus damage before tether bookkeeping sees them.
    #[must_use]
    pub fn default_table() -> Self {
        use crate::handlers::{TackleDamageInjector, TetherLifecycle};

        let mut table = Self::new();
        table.register(Arc::new(TackleDamageInjector::new()));
        table.register(Arc::new(TetherLifecycle::new()));
        table
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.declaration().id.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        declaration: HandlerDeclaration,
    }

    impl EventHandler for Echo {
        fn declaration(&self) -> &HandlerDeclaration {
            &self.declaration
        }

        fn handle(&self, ctx: &mut EventContext<'_>, _arena: &mut Arena, event: &GameEvent) {
            if let GameEvent::EmbedRemoved { projectile } = event {
                ctx.raise(GameEvent::JointRemoved {
                    owner: *projectile,
                    other: *projectile,
                    joint_id: "echo".to_string(),
                });
            }
        }
    }

    #[test]
    fn routes_only_declared_kinds() {
        let mut table = HandlerTable::new();
        table.register(Arc::new(Echo {
            declaration: HandlerDeclaration {
                id: SystemId::new("echo"),
                handles: vec![EventKind::EmbedRemoved],
            },
        }));
        assert_eq!(table.handlers_for(EventKind::EmbedRemoved).count(), 1);
        assert_eq!(table.handlers_for(EventKind::ShotFired).count(), 0);
    }

    #[test]
    fn raised_events_queue_in_order() {
        let mut log = EffectLog::new();
        let mut queue = VecDeque::new();
        let mut ctx = EventContext::new(0, ExecutionContext::server(), TraceId::new(0), &mut log, &mut queue);
        let echo = Echo {
            declaration: HandlerDeclaration {
                id: SystemId::new("echo"),
                handles: vec![EventKind::EmbedRemoved],
            },
        };
        let mut arena = Arena::new();
        echo.handle(&mut ctx, &mut arena, &GameEvent::EmbedRemoved { projectile: EntityId::new(1) });
        echo.handle(&mut ctx, &mut arena, &GameEvent::EmbedRemoved { projectile: EntityId::new(2) });

        let owners: Vec<_> = queue.iter().map(GameEvent::subject).collect();
        assert_eq!(owners, vec![EntityId::new(1), EntityId::new(2)]);
    }

    #[test]
    fn default_table_order() {
        let table = HandlerTable::default_table();
        assert_eq!(format!("{table:?}"), r#"["tackle", "tether"]"#);
    }
}
