//! Reel controller.
//!
//! A rod is either idle or reeling. While reeling, every tick narrows the
//! upper bound of the rod's tether joint by `reel_rate * dt`, never below
//! the joint's lower bound, and clamps the current length to it. Both
//! joint bodies and the rod's relay body are woken so the solver acts on
//! the shorter line.
//!
//! Reeling stops when the upper bound reaches the lower bound, or when the
//! tether joint is missing or is not a distance joint.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::context::EffectSink;
use crate::entity::{Entity, EntityId, EntityTag};
use crate::joint::TETHER_JOINT_ID;
use crate::output::{Command, Event, Modifier, OutputKind, SystemId, SystemInstanceId};
use crate::system::{SystemDeclaration, TickContext, TickSystem};

/// Moves a rod between idle and reeling.
///
/// No-op when the rod is already in the requested state, or is gone.
/// The reel sound is only started or stopped on the first run of a tick;
/// a handle left behind by a replayed stop is released by the next idle
/// tick. Returns `true` if the state changed.
pub(crate) fn set_reeling<S: EffectSink + ?Sized>(
    sink: &mut S,
    arena: &mut Arena,
    system: &SystemId,
    rod: EntityId,
    user: Option<EntityId>,
    reeling: bool,
) -> bool {
    let first = sink.execution().is_first_prediction();
    let Some((current, sound)) = arena
        .get(rod)
        .and_then(Entity::as_rod)
        .map(|r| (r.tether.is_reeling, r.tether.reel_sound.clone()))
    else {
        return false;
    };
    if current == reeling {
        return false;
    }

    let new_handle = (reeling && first).then(|| arena.new_audio_handle());
    let Some(state) = arena.get_mut(rod).and_then(Entity::as_rod_mut) else {
        return false;
    };
    let source = SystemInstanceId::new(rod, system.clone());

    if first {
        if let Some(handle) = state.tether.audio_handle.take() {
            sink.emit(source.clone(), Command::StopAudio { handle, source: rod }.into());
        }
    }
    if let Some(handle) = new_handle {
        state.tether.audio_handle = Some(handle);
        sink.emit(
            source.clone(),
            Command::PlayAudio {
                handle,
                sound,
                source: rod,
                user,
            }
            .into(),
        );
    }

    state.tether.is_reeling = reeling;
    debug!(rod = %rod, reeling, "reel state changed");
    sink.emit(source, Event::ReelingChanged { rod, reeling }.into());
    true
}

/// Tick system for rods.
#[derive(Debug, Clone)]
pub struct ReelController {
    declaration: SystemDeclaration,
}

impl ReelController {
    /// Creates the controller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration {
                id: SystemId::new("reel"),
                required_tags: vec![EntityTag::Rod],
                emits: vec![OutputKind::Command, OutputKind::Modifier, OutputKind::Event],
            },
        }
    }
}

impl Default for ReelController {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSystem for ReelController {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    #[allow(clippy::float_cmp)]
    fn update(&self, ctx: &mut TickContext<'_>, arena: &mut Arena, entity: EntityId) {
        let id = &self.declaration.id;
        let Some(rod) = arena.get_mut(entity).and_then(Entity::as_rod_mut) else {
            return;
        };

        if !rod.tether.is_reeling {
            // Release a sound left over from a replayed stop.
            if ctx.execution.is_first_prediction() {
                if let Some(handle) = rod.tether.audio_handle.take() {
                    ctx.record(id, entity, Command::StopAudio { handle, source: entity });
                }
            }
            return;
        }

        let reel_rate = rod.tether.reel_rate;
        let relay = arena.relay_of(entity);
        let Some(joint) = arena.distance_joint_mut(entity, TETHER_JOINT_ID) else {
            debug!(rod = %entity, "tether joint lost while reeling");
            set_reeling(ctx, arena, id, entity, None, false);
            return;
        };

        joint.max_length = joint.min_length.max(joint.max_length - reel_rate * ctx.dt);
        joint.length = joint.max_length.min(joint.length);
        let (body_a, body_b) = (joint.body_a, joint.body_b);
        let (max_length, min_length, length) = (joint.max_length, joint.min_length, joint.length);

        trace!(rod = %entity, max_length, length, "reel step");
        ctx.record(
            id,
            entity,
            Modifier::ShortenJoint {
                owner: entity,
                joint_id: TETHER_JOINT_ID.to_string(),
                max_length,
                length,
            },
        );

        for body in [body_a, body_b].into_iter().chain(relay) {
            if arena.wake_body(body) {
                ctx.record(id, entity, Modifier::WakeBody { entity: body });
            }
        }

        if max_length == min_length {
            debug!(rod = %entity, min_length, "fully reeled in");
            set_reeling(ctx, arena, id, entity, None, false);
        }
    }
}
