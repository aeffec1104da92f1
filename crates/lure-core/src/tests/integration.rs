//! End-to-end flows through `Simulation`:
//! - Catch attempts, stack consumption and bait deletion
//! - Cast, embed, reel and reload of a rod
//! - Joint loss, embed removal and endpoint despawn
//! - Speculative replicas gating deletion and audio

use glam::Vec2;

use crate::context::ExecutionContext;
use crate::damage::DamageSpecifier;
use crate::entity::{CatchTable, Entity};
use crate::event::{GameEvent, RequestReelMessage};
use crate::joint::TETHER_JOINT_ID;
use crate::output::{Command, Event, Output, OutputEnvelope};
use crate::random::ScriptedRolls;
use crate::simulation::Simulation;

use super::helpers::{
    add_tackle, bait_state, cast_into, eager_bait, prop_prototypes, rod_state, spawn_actor,
    spawn_bait, spawn_hook, spawn_prop, spawn_rod, tether_joint,
};

fn commands(effects: &[OutputEnvelope]) -> Vec<&Command> {
    effects.iter().filter_map(|e| e.output().as_command()).collect()
}

// =============================================================================
// Catch
// =============================================================================

mod catch_tests {
    use super::*;

    #[test]
    fn single_entry_table_lands_catch() {
        let mut sim = Simulation::new(0);
        let bait = spawn_bait(&mut sim, eager_bait(0.5, CatchTable::from_pairs([("X", 1.0)])), 3);
        let mut rolls = ScriptedRolls::new([0.0, 0.25]);

        sim.step_with(1.0, &mut rolls);

        assert_eq!(prop_prototypes(&sim), vec!["X"]);
        assert_eq!(bait_state(&sim, bait).stack.count, 2);
        assert_eq!(bait_state(&sim, bait).bait.elapsed_time, 0.0);
        assert!(sim.take_effects().iter().any(|e| matches!(
            e.output(),
            Output::Event(Event::CatchLanded { prototype, .. }) if prototype == "X"
        )));
    }

    #[test]
    fn timer_accumulates_across_ticks() {
        let mut sim = Simulation::new(0);
        let bait = spawn_bait(&mut sim, eager_bait(1.0, CatchTable::from_pairs([("X", 1.0)])), 5);
        let mut rolls = ScriptedRolls::new([0.0, 0.0]);

        for _ in 0..4 {
            sim.step_with(0.25, &mut rolls);
        }
        assert!(prop_prototypes(&sim).is_empty());
        assert_eq!(rolls.drawn(), 0);

        sim.step_with(0.25, &mut rolls);
        assert_eq!(prop_prototypes(&sim), vec!["X"]);
        assert_eq!(bait_state(&sim, bait).stack.count, 4);
    }

    #[test]
    fn residual_mass_selects_nothing() {
        let mut sim = Simulation::new(0);
        let table = CatchTable::from_pairs([("A", 0.5), ("B", 0.3)]);
        let bait = spawn_bait(&mut sim, eager_bait(0.5, table), 2);
        let mut rolls = ScriptedRolls::new([0.0, 0.9]);

        sim.step_with(1.0, &mut rolls);

        assert!(prop_prototypes(&sim).is_empty());
        assert_eq!(bait_state(&sim, bait).stack.count, 2);
        assert_eq!(rolls.drawn(), 2);
    }

    #[test]
    fn failed_chance_roll_skips_target_draw() {
        let mut sim = Simulation::new(0);
        let mut state = eager_bait(0.5, CatchTable::from_pairs([("X", 1.0)]));
        state.catch_chance = 0.25;
        spawn_bait(&mut sim, state, 1);
        let mut rolls = ScriptedRolls::new([0.5]);

        sim.step_with(1.0, &mut rolls);

        assert!(prop_prototypes(&sim).is_empty());
        assert_eq!(rolls.drawn(), 1);
    }

    #[test]
    fn stack_runs_out_then_bait_is_deleted() {
        let mut sim = Simulation::new(0);
        let bait = spawn_bait(&mut sim, eager_bait(0.5, CatchTable::from_pairs([("X", 1.0)])), 2);
        let mut rolls = ScriptedRolls::new([0.0, 0.0]);

        sim.step_with(1.0, &mut rolls);
        assert!(sim.arena().contains(bait));
        sim.step_with(1.0, &mut rolls);

        assert!(!sim.arena().contains(bait));
        assert_eq!(prop_prototypes(&sim), vec!["X", "X"]);
        assert!(commands(&sim.take_effects())
            .iter()
            .any(|c| matches!(c, Command::QueueDelete { entity } if *entity == bait)));
    }

    #[test]
    fn speculative_replica_keeps_spent_bait() {
        let mut sim = Simulation::new(0);
        sim.set_execution(ExecutionContext::predicted());
        let bait = spawn_bait(&mut sim, eager_bait(0.5, CatchTable::from_pairs([("X", 1.0)])), 1);
        let mut rolls = ScriptedRolls::new([0.0, 0.0]);

        sim.step_with(1.0, &mut rolls);

        assert!(sim.arena().contains(bait));
        assert_eq!(bait_state(&sim, bait).stack.count, 0);
    }

    #[test]
    fn grounded_bait_never_draws() {
        let mut sim = Simulation::new(0);
        let bait = spawn_bait(&mut sim, eager_bait(0.5, CatchTable::from_pairs([("X", 1.0)])), 1);
        let grid = spawn_prop(&mut sim, "Grid", Vec2::ZERO);
        if let Some(state) = sim.arena_mut().get_mut(bait).and_then(Entity::as_bait_mut) {
            state.transform.grid = Some(grid);
        }
        let mut rolls = ScriptedRolls::new([0.0]);

        for _ in 0..10 {
            sim.step_with(1.0, &mut rolls);
        }

        assert_eq!(rolls.drawn(), 0);
        assert_eq!(bait_state(&sim, bait).bait.elapsed_time, 0.0);
    }
}

// =============================================================================
// Tether
// =============================================================================

mod tether_tests {
    use super::*;

    /// Rod anchored at the origin, tethered to a target 5 units away with a
    /// hook whose shortest line is 1.
    fn rigged(reel_rate: f32) -> (Simulation, crate::entity::EntityId, crate::entity::EntityId) {
        let mut sim = Simulation::new(0);
        let rod = spawn_rod(&mut sim, Vec2::ZERO, reel_rate);
        let hook = spawn_hook(&mut sim, 1.0, None);
        let target = spawn_prop(&mut sim, "Mob", Vec2::new(4.8, 0.0));
        cast_into(&mut sim, rod, hook, target);
        (sim, rod, hook)
    }

    #[test]
    fn embed_builds_tether_with_slack() {
        let (mut sim, rod, hook) = rigged(2.0);
        let joint = tether_joint(&mut sim, rod).expect("tether");

        assert!((joint.length - 4.8).abs() < 1e-5);
        assert!((joint.max_length - 5.0).abs() < 1e-5);
        assert_eq!(joint.min_length, 1.0);
        assert_eq!(rod_state(&sim, rod).tether.attached_projectile, Some(hook));
        assert!(!rod_state(&sim, rod).appearance.charged);
    }

    #[test]
    fn reel_in_to_minimum_then_idle() {
        let (mut sim, rod, _) = rigged(2.0);
        if let Some(joint) = sim.arena_mut().distance_joint_mut(rod, TETHER_JOINT_ID) {
            joint.max_length = 5.0;
        }
        let actor = spawn_actor(&mut sim, Some(rod), true);
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });
        assert!(rod_state(&sim, rod).tether.is_reeling);
        assert!(rod_state(&sim, rod).tether.audio_handle.is_some());

        sim.step(0.5);
        sim.step(0.5);
        assert_eq!(tether_joint(&mut sim, rod).map(|j| j.max_length), Some(3.0));
        assert!(rod_state(&sim, rod).tether.is_reeling);

        sim.step(0.5);
        sim.step(0.5);
        assert_eq!(tether_joint(&mut sim, rod).map(|j| j.max_length), Some(1.0));
        assert!(!rod_state(&sim, rod).tether.is_reeling);
        assert!(rod_state(&sim, rod).tether.audio_handle.is_none());
        assert!(commands(&sim.take_effects())
            .iter()
            .any(|c| matches!(c, Command::StopAudio { .. })));
    }

    #[test]
    fn reel_request_outside_combat_stance_is_ignored() {
        let (mut sim, rod, _) = rigged(2.0);
        let actor = spawn_actor(&mut sim, Some(rod), false);
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });
        assert!(!rod_state(&sim, rod).tether.is_reeling);
    }

    #[test]
    fn reload_without_hook_is_noop() {
        let mut sim = Simulation::new(0);
        let rod = spawn_rod(&mut sim, Vec2::ZERO, 2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        if let Some(state) = sim.arena_mut().get_mut(rod).and_then(Entity::as_rod_mut) {
            state.ammo.count = 0;
        }

        sim.dispatch(GameEvent::Activated {
            rod,
            user: actor,
            complex: true,
        });

        assert!(sim.effects().is_empty());
        assert_eq!(rod_state(&sim, rod).ammo.count, 0);
    }

    #[test]
    fn reload_tears_down_tether() {
        let (mut sim, rod, hook) = rigged(2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });
        if let Some(state) = sim.arena_mut().get_mut(rod).and_then(Entity::as_rod_mut) {
            state.ammo.count = 0;
        }
        sim.take_effects();

        sim.dispatch(GameEvent::Activated {
            rod,
            user: actor,
            complex: true,
        });

        let state = rod_state(&sim, rod);
        assert!(state.appearance.charged);
        assert!(!state.tether.is_reeling);
        assert!(state.tether.attached_projectile.is_none());
        assert_eq!(state.ammo.count, 1);
        assert!(tether_joint(&mut sim, rod).is_none());
        assert!(!sim.arena().contains(hook));

        let effects = sim.take_effects();
        let sounds: Vec<_> = commands(&effects)
            .into_iter()
            .filter_map(|c| match c {
                Command::PlayAudio { sound, .. } => Some(sound.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sounds, vec!["fishing_cycle"]);
    }

    #[test]
    fn deselect_stops_reeling_but_keeps_line() {
        let (mut sim, rod, _) = rigged(2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });
        sim.dispatch(GameEvent::HandDeselected { rod, user: actor });

        assert!(!rod_state(&sim, rod).tether.is_reeling);
        assert!(tether_joint(&mut sim, rod).is_some());
    }

    #[test]
    fn pulling_hook_out_clears_line_and_deletes_hook() {
        let (mut sim, rod, hook) = rigged(2.0);
        sim.dispatch(GameEvent::EmbedRemoved { projectile: hook });

        assert!(tether_joint(&mut sim, rod).is_none());
        assert!(!sim.arena().contains(hook));
        assert_eq!(rod_state(&sim, rod).tether.attached_projectile, Some(hook));
    }

    #[test]
    fn lost_joint_while_reeling_stops_reel() {
        let (mut sim, rod, _) = rigged(2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });
        sim.arena_mut().remove_joint(rod, TETHER_JOINT_ID);

        sim.step(0.5);
        assert!(!rod_state(&sim, rod).tether.is_reeling);
    }

    #[test]
    fn tackle_bonus_reaches_fired_hook() {
        let mut sim = Simulation::new(0);
        let rod = spawn_rod(&mut sim, Vec2::ZERO, 2.0);
        add_tackle(&mut sim, rod, [("Piercing", 5.0)]);
        let hook = spawn_hook(
            &mut sim,
            1.0,
            Some(DamageSpecifier::from_pairs([("Piercing", 2.0), ("Blunt", 1.0)])),
        );

        sim.dispatch(GameEvent::ShotFired {
            rod,
            user: None,
            ammo: vec![hook],
        });

        let damage = sim
            .arena()
            .get(hook)
            .and_then(Entity::as_projectile)
            .and_then(|p| p.damage.clone());
        assert_eq!(
            damage,
            Some(DamageSpecifier::from_pairs([("Piercing", 7.0), ("Blunt", 1.0)]))
        );
    }

    #[test]
    fn held_rod_lets_holder_move_weightless() {
        let (mut sim, rod, _) = rigged(2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        assert!(!sim.can_weightless_move(actor, false));

        sim.arena_mut().set_relay(rod, Some(actor));
        assert!(sim.can_weightless_move(actor, false));

        sim.arena_mut().remove_joint(rod, TETHER_JOINT_ID);
        assert!(!sim.can_weightless_move(actor, false));
    }
}

// =============================================================================
// Prediction
// =============================================================================

mod prediction_tests {
    use super::*;

    #[test]
    fn replayed_reel_start_is_silent() {
        let mut sim = Simulation::new(0);
        let rod = spawn_rod(&mut sim, Vec2::ZERO, 2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        sim.set_execution(ExecutionContext::replay());

        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });

        assert!(rod_state(&sim, rod).tether.is_reeling);
        assert!(rod_state(&sim, rod).tether.audio_handle.is_none());
        assert!(commands(&sim.take_effects()).is_empty());
    }

    #[test]
    fn replayed_embed_creates_no_joint() {
        let mut sim = Simulation::new(0);
        let rod = spawn_rod(&mut sim, Vec2::ZERO, 2.0);
        let hook = spawn_hook(&mut sim, 1.0, None);
        let target = spawn_prop(&mut sim, "Mob", Vec2::new(3.0, 0.0));
        sim.set_execution(ExecutionContext::replay());

        cast_into(&mut sim, rod, hook, target);

        assert!(tether_joint(&mut sim, rod).is_none());
        assert_eq!(rod_state(&sim, rod).tether.attached_projectile, Some(hook));
    }

    #[test]
    fn stale_handle_is_released_by_idle_tick() {
        let mut sim = Simulation::new(0);
        let rod = spawn_rod(&mut sim, Vec2::ZERO, 2.0);
        let actor = spawn_actor(&mut sim, Some(rod), true);
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: true },
        });

        sim.set_execution(ExecutionContext::replay());
        sim.dispatch(GameEvent::ReelRequest {
            sender: actor,
            message: RequestReelMessage { reeling: false },
        });
        assert!(rod_state(&sim, rod).tether.audio_handle.is_some());
        sim.take_effects();

        sim.set_execution(ExecutionContext::predicted());
        sim.step(0.1);
        assert!(rod_state(&sim, rod).tether.audio_handle.is_none());
        assert!(commands(&sim.take_effects())
            .iter()
            .any(|c| matches!(c, Command::StopAudio { .. })));
    }
}
