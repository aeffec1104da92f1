//! Tether lifecycle.
//!
//! Reacts to the events that attach, lodge, reload and release a rod's
//! line:
//!
//! | Event | Reaction |
//! |---|---|
//! | `ShotFired` | track the first hook, give it rope visuals, clear `charged` |
//! | `ProjectileEmbedded` | create the tether joint (first run only) |
//! | `JointRemoved` | delete the hook (authority only) |
//! | `Activated` | reload: drop the hook, stop reeling, restore ammo, remove the joint |
//! | `EmbedRemoved` | clear every joint on the former embed target |
//! | `HandDeselected` | stop reeling; the joint stays |
//! | `ReelRequest` | start or stop reeling the sender's active rod |

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::entity::{Entity, EntityId, JointVisuals};
use crate::event::{EventKind, GameEvent, RequestReelMessage};
use crate::handler::{EventContext, EventHandler, HandlerDeclaration};
use crate::joint::{ROD_ANCHOR, TETHER_JOINT_ID, TETHER_SLACK};
use crate::output::{Command, Event, Modifier, SystemId};
use crate::systems::reel::set_reeling;

/// Attach, embed, reload and release handling for rods and hooks.
#[derive(Debug, Clone)]
pub struct TetherLifecycle {
    declaration: HandlerDeclaration,
}

impl TetherLifecycle {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: HandlerDeclaration {
                id: SystemId::new("tether"),
                handles: vec![
                    EventKind::ShotFired,
                    EventKind::ProjectileEmbedded,
                    EventKind::JointRemoved,
                    EventKind::EmbedRemoved,
                    EventKind::Activated,
                    EventKind::HandDeselected,
                    EventKind::ReelRequest,
                ],
            },
        }
    }

    /// Answers the movement system's weightless query.
    ///
    /// An entity that can already move stays able to. Otherwise it may move
    /// if it is the relay target of a joint component holding a tether.
    #[must_use]
    pub fn can_weightless_move(arena: &Arena, entity: EntityId, can_move: bool) -> bool {
        can_move || arena.is_tether_relay_target(entity)
    }

    fn id(&self) -> &SystemId {
        &self.declaration.id
    }

    fn on_shot(
        &self,
        ctx: &mut EventContext<'_>,
        arena: &mut Arena,
        rod: EntityId,
        ammo: &[EntityId],
    ) {
        let Some((sprite, offset)) = arena
            .get(rod)
            .and_then(Entity::as_rod)
            .map(|r| (r.tether.rope_sprite.clone(), r.tether.projectile_join_offset))
        else {
            return;
        };

        // Only one line per rod: later hooks in the same shot are ignored.
        let hook = ammo.iter().copied().find(|shot| {
            arena
                .get(*shot)
                .and_then(Entity::as_projectile)
                .is_some_and(|p| p.hook.is_some())
        });

        if let Some(hook) = hook {
            if let Some(projectile) = arena.get_mut(hook).and_then(Entity::as_projectile_mut) {
                projectile.visuals = Some(JointVisuals {
                    sprite: sprite.clone(),
                    offset_a: offset,
                    target: rod,
                });
            }
            ctx.record(
                self.id(),
                rod,
                Modifier::SetJointVisuals {
                    projectile: hook,
                    sprite,
                    target: rod,
                },
            );
        }

        let Some(state) = arena.get_mut(rod).and_then(Entity::as_rod_mut) else {
            return;
        };
        if let Some(hook) = hook {
            state.tether.attached_projectile = Some(hook);
            debug!(rod = %rod, projectile = %hook, "hook attached");
            ctx.record(self.id(), rod, Event::TetherAttached { rod, projectile: hook });
        }
        state.appearance.charged = false;
        ctx.record(self.id(), rod, Modifier::SetCharged { rod, charged: false });
    }

    fn on_embed(
        &self,
        ctx: &mut EventContext<'_>,
        arena: &mut Arena,
        projectile: EntityId,
        weapon: EntityId,
        embedded: EntityId,
    ) {
        if !ctx.execution.is_first_prediction() {
            return;
        }
        let Some(proj) = arena.get_mut(projectile).and_then(Entity::as_projectile_mut) else {
            return;
        };
        let Some(hook) = proj.hook else {
            return;
        };
        proj.embed.embedded_into = Some(embedded);

        let Some(joint) = arena.create_distance_joint(weapon, embedded, TETHER_JOINT_ID, ROD_ANCHOR)
        else {
            trace!(rod = %weapon, target = %embedded, "tether endpoints missing");
            return;
        };
        joint.max_length = joint.length + TETHER_SLACK;
        joint.min_length = hook.joint_length.min(joint.max_length);
        joint.stiffness = 1.0;
        joint.breakpoint = None;

        let (length, min_length, max_length) = (joint.length, joint.min_length, joint.max_length);
        debug!(rod = %weapon, target = %embedded, length, min_length, max_length, "tether created");
        ctx.record(
            self.id(),
            weapon,
            Modifier::CreateDistanceJoint {
                owner: weapon,
                target: embedded,
                joint_id: TETHER_JOINT_ID.to_string(),
                length,
                min_length,
                max_length,
            },
        );
    }

    fn on_joint_removed(
        &self,
        ctx: &mut EventContext<'_>,
        arena: &mut Arena,
        owner: EntityId,
        other: EntityId,
        joint_id: &str,
    ) {
        if !ctx.execution.is_authoritative() {
            return;
        }
        let is_hook = |id: EntityId| {
            arena
                .get(id)
                .and_then(Entity::as_projectile)
                .is_some_and(|p| p.hook.is_some())
        };
        let projectile = if is_hook(owner) {
            Some(owner)
        } else if is_hook(other) {
            Some(other)
        } else if joint_id == TETHER_JOINT_ID {
            arena
                .get(owner)
                .and_then(Entity::as_rod)
                .and_then(|r| r.tether.attached_projectile)
        } else {
            None
        };

        let Some(projectile) = projectile.filter(|p| arena.contains(*p)) else {
            return;
        };
        if arena.is_queued_for_despawn(projectile) {
            return;
        }
        debug!(owner = %owner, projectile = %projectile, "tether lost, deleting hook");
        arena.queue_despawn(projectile);
        ctx.record(self.id(), owner, Command::QueueDelete { entity: projectile });
    }

    fn on_activate(
        &self,
        ctx: &mut EventContext<'_>,
        arena: &mut Arena,
        rod: EntityId,
        user: EntityId,
        complex: bool,
    ) {
        if !ctx.execution.is_first_prediction() || !complex {
            return;
        }
        let Some(state) = arena.get(rod).and_then(Entity::as_rod) else {
            return;
        };
        let Some(projectile) = state.tether.attached_projectile else {
            return;
        };
        let cycle_sound = state.tether.cycle_sound.clone();

        let handle = arena.new_audio_handle();
        ctx.record(
            self.id(),
            rod,
            Command::PlayAudio {
                handle,
                sound: cycle_sound,
                source: rod,
                user: Some(user),
            },
        );

        if let Some(state) = arena.get_mut(rod).and_then(Entity::as_rod_mut) {
            state.appearance.charged = true;
            state.tether.attached_projectile = None;
        }
        ctx.record(self.id(), rod, Modifier::SetCharged { rod, charged: true });

        if ctx.execution.is_authoritative() && arena.contains(projectile) {
            arena.queue_despawn(projectile);
            ctx.record(self.id(), rod, Command::QueueDelete { entity: projectile });
        }

        set_reeling(ctx, arena, self.id(), rod, Some(user), false);

        let count = arena
            .get_mut(rod)
            .and_then(Entity::as_rod_mut)
            .map(|r| r.ammo.restore(1));
        if let Some(count) = count {
            ctx.record(self.id(), rod, Modifier::RestoreAmmo { rod, delta: 1, count });
        }

        if let Some(joint) = arena.remove_joint(rod, TETHER_JOINT_ID) {
            ctx.record(
                self.id(),
                rod,
                Modifier::RemoveJoint {
                    owner: rod,
                    joint_id: TETHER_JOINT_ID.to_string(),
                },
            );
            ctx.raise(GameEvent::JointRemoved {
                owner: rod,
                other: joint.body_b(),
                joint_id: TETHER_JOINT_ID.to_string(),
            });
        }
        debug!(rod = %rod, projectile = %projectile, "rod reloaded");
    }

    fn on_embed_removed(&self, ctx: &mut EventContext<'_>, arena: &mut Arena, projectile: EntityId) {
        let Some(proj) = arena.get_mut(projectile).and_then(Entity::as_projectile_mut) else {
            return;
        };
        if proj.hook.is_none() {
            return;
        }
        let Some(target) = proj.embed.embedded_into.take() else {
            return;
        };

        let removed = arena.clear_joints(target);
        debug!(projectile = %projectile, target = %target, removed = removed.len(), "embed removed");
        ctx.record(
            self.id(),
            projectile,
            Modifier::ClearJoints {
                entity: target,
                removed: removed.len(),
            },
        );
        for joint in removed {
            ctx.raise(GameEvent::JointRemoved {
                owner: joint.owner,
                other: joint.other(),
                joint_id: joint.joint_id,
            });
        }
    }

    fn on_reel_request(
        &self,
        ctx: &mut EventContext<'_>,
        arena: &mut Arena,
        sender: EntityId,
        message: RequestReelMessage,
    ) {
        let Some((active, combat_mode)) = arena
            .get(sender)
            .and_then(Entity::as_actor)
            .map(|a| (a.hands.active_item, a.combat_mode))
        else {
            return;
        };
        let Some(rod) = active.filter(|item| arena.get(*item).is_some_and(Entity::is_rod)) else {
            return;
        };
        if message.reeling && !combat_mode {
            trace!(actor = %sender, rod = %rod, "reel request outside combat stance ignored");
            return;
        }
        set_reeling(ctx, arena, self.id(), rod, Some(sender), message.reeling);
    }
}

impl Default for TetherLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for TetherLifecycle {
    fn declaration(&self) -> &HandlerDeclaration {
        &self.declaration
    }

    fn handle(&self, ctx: &mut EventContext<'_>, arena: &mut Arena, event: &GameEvent) {
        match event {
            GameEvent::ShotFired { rod, ammo, .. } => self.on_shot(ctx, arena, *rod, ammo),
            GameEvent::ProjectileEmbedded {
                projectile,
                weapon,
                embedded,
            } => self.on_embed(ctx, arena, *projectile, *weapon, *embedded),
            GameEvent::JointRemoved {
                owner,
                other,
                joint_id,
            } => self.on_joint_removed(ctx, arena, *owner, *other, joint_id),
            GameEvent::Activated { rod, user, complex } => {
                self.on_activate(ctx, arena, *rod, *user, *complex);
            }
            GameEvent::EmbedRemoved { projectile } => self.on_embed_removed(ctx, arena, *projectile),
            GameEvent::HandDeselected { rod, user } => {
                set_reeling(ctx, arena, self.id(), *rod, Some(*user), false);
            }
            GameEvent::ReelRequest { sender, message } => {
                self.on_reel_request(ctx, arena, *sender, *message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExecutionContext;
    use crate::entity::{
        ActorComponents, EntityInner, EntityTag, HandsState, HookState, ProjectileComponents,
        PropComponents, RodComponents, TransformState,
    };
    use crate::joint::{DistanceJoint, Joint};
    use crate::output::{EffectLog, Output, TraceId};
    use glam::Vec2;
    use std::collections::VecDeque;

    struct Fixture {
        arena: Arena,
        log: EffectLog,
        queue: VecDeque<GameEvent>,
        rod: EntityId,
        hook: EntityId,
        target: EntityId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut arena = Arena::new();
            let rod = arena.spawn(
                EntityTag::Rod,
                EntityInner::Rod(RodComponents {
                    transform: TransformState::adrift(Vec2::new(0.0, -0.5)),
                    ..RodComponents::default()
                }),
            );
            let hook = arena.spawn(
                EntityTag::Projectile,
                EntityInner::Projectile(ProjectileComponents {
                    hook: Some(HookState { joint_length: 1.0 }),
                    ..ProjectileComponents::default()
                }),
            );
            let target = arena.spawn(
                EntityTag::Prop,
                EntityInner::Prop(PropComponents {
                    transform: TransformState::adrift(Vec2::new(4.0, 0.0)),
                    ..PropComponents::default()
                }),
            );
            Self {
                arena,
                log: EffectLog::new(),
                queue: VecDeque::new(),
                rod,
                hook,
                target,
            }
        }

        fn send(&mut self, execution: ExecutionContext, event: GameEvent) {
            let mut ctx = EventContext::new(0, execution, TraceId::new(0), &mut self.log, &mut self.queue);
            TetherLifecycle::new().handle(&mut ctx, &mut self.arena, &event);
        }

        fn rod(&self) -> &RodComponents {
            self.arena.get(self.rod).unwrap().as_rod().unwrap()
        }

        fn shoot(&mut self) {
            let event = GameEvent::ShotFired {
                rod: self.rod,
                user: None,
                ammo: vec![self.hook],
            };
            self.send(ExecutionContext::server(), event);
        }

        fn embed(&mut self, execution: ExecutionContext) {
            let event = GameEvent::ProjectileEmbedded {
                projectile: self.hook,
                weapon: self.rod,
                embedded: self.target,
            };
            self.send(execution, event);
        }
    }

    mod shot_tests {
        use super::*;

        #[test]
        fn tracks_first_hook_only() {
            let mut fx = Fixture::new();
            let second = fx.arena.spawn(
                EntityTag::Projectile,
                EntityInner::Projectile(ProjectileComponents {
                    hook: Some(HookState::default()),
                    ..ProjectileComponents::default()
                }),
            );
            let plain = fx.arena.spawn(
                EntityTag::Projectile,
                EntityInner::Projectile(ProjectileComponents::default()),
            );
            let event = GameEvent::ShotFired {
                rod: fx.rod,
                user: None,
                ammo: vec![plain, fx.hook, second],
            };
            fx.send(ExecutionContext::server(), event);

            assert_eq!(fx.rod().tether.attached_projectile, Some(fx.hook));
            assert!(!fx.rod().appearance.charged);
            let visuals = fx.arena.get(fx.hook).unwrap().as_projectile().unwrap().visuals.clone();
            assert_eq!(visuals.unwrap().target, fx.rod);
            assert!(fx.arena.get(second).unwrap().as_projectile().unwrap().visuals.is_none());
        }

        #[test]
        fn shot_without_hook_still_clears_charge() {
            let mut fx = Fixture::new();
            let event = GameEvent::ShotFired {
                rod: fx.rod,
                user: None,
                ammo: vec![],
            };
            fx.send(ExecutionContext::server(), event);
            assert!(fx.rod().tether.attached_projectile.is_none());
            assert!(!fx.rod().appearance.charged);
        }
    }

    mod embed_tests {
        use super::*;

        #[test]
        fn creates_rigid_tether_with_slack() {
            let mut fx = Fixture::new();
            fx.shoot();
            fx.embed(ExecutionContext::server());

            let joint = *fx.arena.distance_joint_mut(fx.rod, TETHER_JOINT_ID).unwrap();
            assert!((joint.length - 4.0).abs() < 1e-6);
            assert!((joint.max_length - 4.2).abs() < 1e-6);
            assert_eq!(joint.min_length, 1.0);
            assert_eq!(joint.stiffness, 1.0);
            assert!(joint.breakpoint.is_none());
            assert_eq!(
                fx.arena.get(fx.hook).unwrap().as_projectile().unwrap().embed.embedded_into,
                Some(fx.target)
            );
        }

        #[test]
        fn replayed_embed_is_ignored() {
            let mut fx = Fixture::new();
            fx.embed(ExecutionContext::replay());
            assert!(fx.arena.joints(fx.rod).is_none());
        }

        #[test]
        fn min_length_is_clamped_to_max() {
            let mut fx = Fixture::new();
            if let Some(p) = fx.arena.get_mut(fx.hook).and_then(Entity::as_projectile_mut) {
                p.hook = Some(HookState { joint_length: 10.0 });
            }
            fx.embed(ExecutionContext::server());
            let joint = fx.arena.distance_joint_mut(fx.rod, TETHER_JOINT_ID).unwrap();
            assert_eq!(joint.min_length, joint.max_length);
        }
    }

    mod joint_removed_tests {
        use super::*;

        #[test]
        fn authority_deletes_tracked_hook() {
            let mut fx = Fixture::new();
            fx.shoot();
            let event = GameEvent::JointRemoved {
                owner: fx.rod,
                other: fx.target,
                joint_id: TETHER_JOINT_ID.to_string(),
            };
            fx.send(ExecutionContext::server(), event);
            assert!(fx.arena.is_queued_for_despawn(fx.hook));
        }

        #[test]
        fn prediction_never_deletes() {
            let mut fx = Fixture::new();
            fx.shoot();
            let event = GameEvent::JointRemoved {
                owner: fx.rod,
                other: fx.target,
                joint_id: TETHER_JOINT_ID.to_string(),
            };
            fx.send(ExecutionContext::predicted(), event);
            assert!(!fx.arena.is_queued_for_despawn(fx.hook));
        }

        #[test]
        fn unrelated_joint_is_ignored() {
            let mut fx = Fixture::new();
            fx.shoot();
            let event = GameEvent::JointRemoved {
                owner: fx.rod,
                other: fx.target,
                joint_id: "weld".to_string(),
            };
            fx.send(ExecutionContext::server(), event);
            assert!(!fx.arena.is_queued_for_despawn(fx.hook));
        }
    }

    mod activation_tests {
        use super::*;

        fn activate(fx: &mut Fixture, complex: bool) {
            let user = fx.target;
            let event = GameEvent::Activated {
                rod: fx.rod,
                user,
                complex,
            };
            fx.send(ExecutionContext::server(), event);
        }

        #[test]
        fn without_projectile_is_noop() {
            let mut fx = Fixture::new();
            let joint = DistanceJoint::new(fx.rod, fx.target, ROD_ANCHOR, 3.0);
            fx.arena.insert_joint(fx.rod, TETHER_JOINT_ID, Joint::Distance(joint));
            if let Some(rod) = fx.arena.get_mut(fx.rod).and_then(Entity::as_rod_mut) {
                rod.ammo.count = 0;
            }

            activate(&mut fx, true);
            assert!(fx.log.is_empty());
            assert_eq!(fx.rod().ammo.count, 0);
            assert!(fx.arena.joints(fx.rod).unwrap().contains(TETHER_JOINT_ID));
        }

        #[test]
        fn quick_tap_is_noop() {
            let mut fx = Fixture::new();
            fx.shoot();
            let before = fx.log.len();
            activate(&mut fx, false);
            assert_eq!(fx.log.len(), before);
            assert_eq!(fx.rod().tether.attached_projectile, Some(fx.hook));
        }

        #[test]
        fn reload_unwinds_everything() {
            let mut fx = Fixture::new();
            fx.shoot();
            fx.embed(ExecutionContext::server());
            if let Some(rod) = fx.arena.get_mut(fx.rod).and_then(Entity::as_rod_mut) {
                rod.ammo.count = 0;
                rod.tether.is_reeling = true;
            }

            activate(&mut fx, true);

            let rod = fx.rod();
            assert!(rod.appearance.charged);
            assert!(rod.tether.attached_projectile.is_none());
            assert!(!rod.tether.is_reeling);
            assert_eq!(rod.ammo.count, 1);
            assert!(!fx.arena.joints(fx.rod).unwrap().contains(TETHER_JOINT_ID));
            assert!(fx.arena.is_queued_for_despawn(fx.hook));
            assert!(matches!(
                fx.queue.front(),
                Some(GameEvent::JointRemoved { joint_id, .. }) if joint_id == TETHER_JOINT_ID
            ));
            assert!(fx.log.outputs().any(|o| matches!(
                o,
                Output::Command(Command::PlayAudio { sound, .. }) if sound == "fishing_cycle"
            )));
        }

        #[test]
        fn reload_after_hook_is_gone_still_restores_ammo() {
            let mut fx = Fixture::new();
            fx.shoot();
            let hook = fx.hook;
            fx.arena.despawn(hook);
            if let Some(rod) = fx.arena.get_mut(fx.rod).and_then(Entity::as_rod_mut) {
                rod.ammo.count = 0;
            }

            activate(&mut fx, true);
            assert_eq!(fx.rod().ammo.count, 1);
            assert!(!fx.arena.is_queued_for_despawn(hook));
        }
    }

    mod embed_removed_tests {
        use super::*;

        #[test]
        fn clears_target_joints_and_raises_removal() {
            let mut fx = Fixture::new();
            fx.shoot();
            fx.embed(ExecutionContext::server());
            let event = GameEvent::EmbedRemoved { projectile: fx.hook };
            fx.send(ExecutionContext::server(), event);

            assert!(!fx.arena.joints(fx.rod).unwrap().contains(TETHER_JOINT_ID));
            assert_eq!(fx.queue.len(), 1);
            assert!(fx
                .arena
                .get(fx.hook)
                .unwrap()
                .as_projectile()
                .unwrap()
                .embed
                .embedded_into
                .is_none());
        }

        #[test]
        fn unembedded_hook_is_noop() {
            let mut fx = Fixture::new();
            let event = GameEvent::EmbedRemoved { projectile: fx.hook };
            fx.send(ExecutionContext::server(), event);
            assert!(fx.log.is_empty());
        }
    }

    mod reel_request_tests {
        use super::*;

        fn actor(fx: &mut Fixture, combat_mode: bool) -> EntityId {
            let rod = fx.rod;
            fx.arena.spawn(
                EntityTag::Actor,
                EntityInner::Actor(ActorComponents {
                    hands: HandsState {
                        active_item: Some(rod),
                    },
                    combat_mode,
                    ..ActorComponents::default()
                }),
            )
        }

        fn request(fx: &mut Fixture, sender: EntityId, reeling: bool) {
            let event = GameEvent::ReelRequest {
                sender,
                message: RequestReelMessage { reeling },
            };
            fx.send(ExecutionContext::server(), event);
        }

        #[test]
        fn start_requires_combat_stance() {
            let mut fx = Fixture::new();
            let passive = actor(&mut fx, false);
            request(&mut fx, passive, true);
            assert!(!fx.rod().tether.is_reeling);

            let fighter = actor(&mut fx, true);
            request(&mut fx, fighter, true);
            assert!(fx.rod().tether.is_reeling);
        }

        #[test]
        fn stop_is_always_honoured() {
            let mut fx = Fixture::new();
            let fighter = actor(&mut fx, true);
            request(&mut fx, fighter, true);
            let passive = actor(&mut fx, false);
            request(&mut fx, passive, false);
            assert!(!fx.rod().tether.is_reeling);
        }

        #[test]
        fn repeated_start_is_idempotent() {
            let mut fx = Fixture::new();
            let fighter = actor(&mut fx, true);
            request(&mut fx, fighter, true);
            let handle = fx.rod().tether.audio_handle;
            let before = fx.log.len();
            request(&mut fx, fighter, true);
            assert_eq!(fx.rod().tether.audio_handle, handle);
            assert_eq!(fx.log.len(), before);
        }

        #[test]
        fn sender_without_rod_is_ignored() {
            let mut fx = Fixture::new();
            let empty_handed = fx.arena.spawn(
                EntityTag::Actor,
                EntityInner::Actor(ActorComponents {
                    combat_mode: true,
                    ..ActorComponents::default()
                }),
            );
            request(&mut fx, empty_handed, true);
            assert!(fx.log.is_empty());
        }
    }

    mod deselect_tests {
        use super::*;

        #[test]
        fn stops_reeling_but_keeps_joint() {
            let mut fx = Fixture::new();
            fx.shoot();
            fx.embed(ExecutionContext::server());
            if let Some(rod) = fx.arena.get_mut(fx.rod).and_then(Entity::as_rod_mut) {
                rod.tether.is_reeling = true;
            }
            let event = GameEvent::HandDeselected {
                rod: fx.rod,
                user: fx.target,
            };
            fx.send(ExecutionContext::server(), event);

            assert!(!fx.rod().tether.is_reeling);
            assert!(fx.arena.joints(fx.rod).unwrap().contains(TETHER_JOINT_ID));
        }
    }

    mod weightless_tests {
        use super::*;

        #[test]
        fn relay_target_of_tether_may_move() {
            let mut fx = Fixture::new();
            let holder = fx.target;
            fx.arena.set_relay(fx.rod, Some(holder));
            assert!(!TetherLifecycle::can_weightless_move(&fx.arena, holder, false));

            fx.shoot();
            fx.embed(ExecutionContext::server());
            assert!(TetherLifecycle::can_weightless_move(&fx.arena, holder, false));
            assert!(TetherLifecycle::can_weightless_move(&fx.arena, fx.hook, true));
        }
    }
}
