//! Factory functions and accessors shared by the cross-module tests.

use glam::Vec2;

use crate::damage::DamageSpecifier;
use crate::entity::{
    ActorComponents, BaitComponents, BaitState, CatchTable, Entity, EntityId, EntityInner,
    EntityTag, HandsState, HookState, ItemComponents, ProjectileComponents, PropComponents,
    RodComponents, StackState, TackleState, TransformState,
};
use crate::event::GameEvent;
use crate::joint::{DistanceJoint, TETHER_JOINT_ID};
use crate::simulation::Simulation;

// =============================================================================
// Spawning
// =============================================================================

/// Spawns adrift bait at the origin.
pub fn spawn_bait(sim: &mut Simulation, bait: BaitState, stack: u32) -> EntityId {
    sim.arena_mut().spawn(
        EntityTag::Bait,
        EntityInner::Bait(BaitComponents {
            transform: TransformState::adrift(Vec2::ZERO),
            stack: StackState::new(stack),
            bait,
        }),
    )
}

/// Bait that always bites, attempting every `interval` seconds.
pub fn eager_bait(interval: f32, table: CatchTable) -> BaitState {
    BaitState {
        elapsed_time: 0.0,
        catch_interval: interval,
        catch_chance: 1.0,
        catches: table,
    }
}

/// Spawns a loaded rod whose anchor sits at `anchor`.
pub fn spawn_rod(sim: &mut Simulation, anchor: Vec2, reel_rate: f32) -> EntityId {
    let mut rod = RodComponents {
        transform: TransformState::adrift(anchor - Vec2::new(0.0, 0.5)),
        ..RodComponents::default()
    };
    rod.tether.reel_rate = reel_rate;
    sim.arena_mut().spawn(EntityTag::Rod, EntityInner::Rod(rod))
}

/// Spawns a hook projectile with the given minimum line length.
pub fn spawn_hook(sim: &mut Simulation, joint_length: f32, damage: Option<DamageSpecifier>) -> EntityId {
    sim.arena_mut().spawn(
        EntityTag::Projectile,
        EntityInner::Projectile(ProjectileComponents {
            damage,
            hook: Some(HookState { joint_length }),
            ..ProjectileComponents::default()
        }),
    )
}

/// Spawns a prop at `position`.
pub fn spawn_prop(sim: &mut Simulation, prototype: &str, position: Vec2) -> EntityId {
    sim.arena_mut().spawn(
        EntityTag::Prop,
        EntityInner::Prop(PropComponents {
            prototype: prototype.to_string(),
            transform: TransformState::adrift(position),
            ..PropComponents::default()
        }),
    )
}

/// Spawns an actor holding `item` in its active hand.
pub fn spawn_actor(sim: &mut Simulation, item: Option<EntityId>, combat_mode: bool) -> EntityId {
    sim.arena_mut().spawn(
        EntityTag::Actor,
        EntityInner::Actor(ActorComponents {
            hands: HandsState { active_item: item },
            combat_mode,
            ..ActorComponents::default()
        }),
    )
}

/// Spawns a tackle item and puts it in `rod`'s tackle container.
pub fn add_tackle<'a>(
    sim: &mut Simulation,
    rod: EntityId,
    bonus: impl IntoIterator<Item = (&'a str, f32)>,
) -> EntityId {
    let item = sim.arena_mut().spawn(
        EntityTag::Item,
        EntityInner::Item(ItemComponents {
            prototype: "FishingTackle".to_string(),
            tackle: Some(TackleState {
                damage: DamageSpecifier::from_pairs(bonus),
            }),
        }),
    );
    if let Some(state) = sim.arena_mut().get_mut(rod).and_then(Entity::as_rod_mut) {
        state.tackle.push(item);
    }
    item
}

// =============================================================================
// Flows
// =============================================================================

/// Fires `hook` from `rod` and lodges it in `target`.
pub fn cast_into(sim: &mut Simulation, rod: EntityId, hook: EntityId, target: EntityId) {
    sim.dispatch(GameEvent::ShotFired {
        rod,
        user: None,
        ammo: vec![hook],
    });
    sim.dispatch(GameEvent::ProjectileEmbedded {
        projectile: hook,
        weapon: rod,
        embedded: target,
    });
}

// =============================================================================
// Accessors
// =============================================================================

/// Returns the rod's components.
pub fn rod_state(sim: &Simulation, rod: EntityId) -> &RodComponents {
    sim.arena()
        .get(rod)
        .and_then(Entity::as_rod)
        .expect("rod should exist")
}

/// Returns the bait's components.
pub fn bait_state(sim: &Simulation, bait: EntityId) -> &BaitComponents {
    sim.arena()
        .get(bait)
        .and_then(Entity::as_bait)
        .expect("bait should exist")
}

/// Returns a copy of the rod's tether joint, if present.
pub fn tether_joint(sim: &mut Simulation, rod: EntityId) -> Option<DistanceJoint> {
    sim.arena_mut()
        .distance_joint_mut(rod, TETHER_JOINT_ID)
        .map(|joint| *joint)
}

/// Prototypes of every prop in id order.
pub fn prop_prototypes(sim: &Simulation) -> Vec<String> {
    sim.arena()
        .entities_sorted()
        .filter_map(Entity::as_prop)
        .map(|prop| prop.prototype.clone())
        .collect()
}
