//! Entity and joint storage.
//!
//! The Arena is the container for everything the fishing systems touch:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Joint components keyed by owning entity, with physics relays
//! - A despawn queue flushed by the simulation between passes
//! - Counters for trace ids and audio handles
//!
//! It also stands in for the engine services the systems call as opaque
//! collaborators: spawning a prototype next to an entity, creating and
//! removing joints, and waking bodies.
//!
//! # Example
//!
//! ```
//! use lure_core::arena::Arena;
//! use lure_core::entity::{EntityInner, EntityTag, PropComponents, TransformState};
//! use lure_core::joint::{ROD_ANCHOR, TETHER_JOINT_ID};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(
//!     EntityTag::Prop,
//!     EntityInner::Prop(PropComponents {
//!         transform: TransformState::adrift(Vec2::new(0.0, -0.5)),
//!         ..PropComponents::default()
//!     }),
//! );
//! let b = arena.spawn(
//!     EntityTag::Prop,
//!     EntityInner::Prop(PropComponents {
//!         transform: TransformState::adrift(Vec2::new(3.0, 0.0)),
//!         ..PropComponents::default()
//!     }),
//! );
//!
//! let joint = arena.create_distance_joint(a, b, TETHER_JOINT_ID, ROD_ANCHOR).unwrap();
//! assert!((joint.length - 3.0).abs() < 1e-6);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityInner, EntityTag, PropComponents, TransformState};
use crate::joint::{DistanceJoint, Joint, JointComponent, TETHER_JOINT_ID};
use crate::output::{AudioHandle, TraceId};

/// A joint taken out of the arena, with where it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedJoint {
    /// Entity whose component held the joint.
    pub owner: EntityId,
    /// Key the joint was stored under.
    pub joint_id: String,
    /// The joint itself.
    pub joint: Joint,
}

impl RemovedJoint {
    /// Returns the body on the far side from the owner.
    #[must_use]
    pub fn other(&self) -> EntityId {
        if self.joint.body_a() == self.owner {
            self.joint.body_b()
        } else {
            self.joint.body_a()
        }
    }
}

/// Container for all simulation entities and their joints.
///
/// # Determinism
///
/// Entities and joint components live in `BTreeMap`s keyed by
/// [`EntityId`], and ids are assigned monotonically, so every pass over
/// the arena sees the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    joints: BTreeMap<EntityId, JointComponent>,
    pending_despawn: Vec<EntityId>,
    tick: u64,
    next_trace_id: u64,
    next_audio_handle: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            joints: BTreeMap::new(),
            pending_despawn: Vec::new(),
            tick: 0,
            next_trace_id: 0,
            next_audio_handle: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Entities
    // -------------------------------------------------------------------------

    /// Spawns a new entity and returns its id.
    pub fn spawn(&mut self, tag: EntityTag, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, tag, inner));
        id
    }

    /// Spawns a prop from `prototype` at the position of `anchor`.
    ///
    /// The prop inherits the anchor's grid. Returns `None` if the anchor is
    /// gone or has no placement.
    pub fn spawn_next_to(&mut self, prototype: &str, anchor: EntityId) -> Option<EntityId> {
        let transform: TransformState = *self.entities.get(&anchor)?.transform()?;
        let prop = PropComponents {
            prototype: prototype.to_string(),
            transform,
            ..PropComponents::default()
        };
        Some(self.spawn(EntityTag::Prop, EntityInner::Prop(prop)))
    }

    /// Removes an entity immediately.
    ///
    /// Every joint the entity takes part in is dropped with it, and relays
    /// pointing at it are released. Use [`clear_joints`](Self::clear_joints)
    /// first to learn which joints go.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.clear_joints(id);
        self.joints.remove(&id);
        for component in self.joints.values_mut() {
            if component.relay == Some(id) {
                component.relay = None;
            }
        }
        self.pending_despawn.retain(|pending| *pending != id);
        self.entities.remove(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if the entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns an iterator over entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in deterministic (sorted by ID) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Marks an entity's body awake. Returns `false` if it has none.
    pub fn wake_body(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id).and_then(|e| e.inner_mut().body_mut()) {
            Some(body) => {
                body.awake = true;
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Deferred deletion
    // -------------------------------------------------------------------------

    /// Schedules an entity for deletion at the end of the current pass.
    ///
    /// Queuing the same entity twice is a no-op.
    pub fn queue_despawn(&mut self, id: EntityId) {
        if !self.pending_despawn.contains(&id) {
            self.pending_despawn.push(id);
        }
    }

    /// Returns `true` if the entity is scheduled for deletion.
    #[must_use]
    pub fn is_queued_for_despawn(&self, id: EntityId) -> bool {
        self.pending_despawn.contains(&id)
    }

    /// Takes the deletion queue in the order entities were queued.
    pub fn take_pending_despawns(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending_despawn)
    }

    // -------------------------------------------------------------------------
    // Joints
    // -------------------------------------------------------------------------

    /// Returns the joint component of `owner`, if it has one.
    #[must_use]
    pub fn joints(&self, owner: EntityId) -> Option<&JointComponent> {
        self.joints.get(&owner)
    }

    /// Returns the joint component of `owner` mutably, if it has one.
    #[must_use]
    pub fn joints_mut(&mut self, owner: EntityId) -> Option<&mut JointComponent> {
        self.joints.get_mut(&owner)
    }

    /// Looks up a distance joint by key. Missing or wrong-typed joints both
    /// yield `None`.
    #[must_use]
    pub fn distance_joint_mut(&mut self, owner: EntityId, joint_id: &str) -> Option<&mut DistanceJoint> {
        self.joints
            .get_mut(&owner)?
            .get_mut(joint_id)?
            .as_distance_mut()
    }

    /// Inserts an arbitrary joint under `owner`.
    pub fn insert_joint(&mut self, owner: EntityId, joint_id: &str, joint: Joint) {
        self.joints.entry(owner).or_default().insert(joint_id, joint);
    }

    /// Creates a distance joint from `owner` to `target`.
    ///
    /// The length is the current distance between the owner's anchor point
    /// and the target's position. Bounds start at `[0, length]` with zero
    /// stiffness; callers adjust them through the returned reference.
    /// Returns `None` if either entity is gone or has no placement.
    pub fn create_distance_joint(
        &mut self,
        owner: EntityId,
        target: EntityId,
        joint_id: &str,
        anchor_a: Vec2,
    ) -> Option<&mut DistanceJoint> {
        let from = self.entities.get(&owner)?.transform()?.position + anchor_a;
        let to = self.entities.get(&target)?.transform()?.position;
        let joint = DistanceJoint::new(owner, target, anchor_a, from.distance(to));

        let component = self.joints.entry(owner).or_default();
        component.insert(joint_id, Joint::Distance(joint));
        component.get_mut(joint_id)?.as_distance_mut()
    }

    /// Removes a joint by key.
    pub fn remove_joint(&mut self, owner: EntityId, joint_id: &str) -> Option<Joint> {
        self.joints.get_mut(&owner)?.remove(joint_id)
    }

    /// Removes every joint `entity` takes part in, whoever owns it.
    ///
    /// Joints owned by `entity` come first, then joints owned by others in
    /// owner order.
    pub fn clear_joints(&mut self, entity: EntityId) -> Vec<RemovedJoint> {
        let mut removed = Vec::new();
        if let Some(component) = self.joints.get_mut(&entity) {
            removed.extend(
                component
                    .drain_where(|_| true)
                    .into_iter()
                    .map(|(joint_id, joint)| RemovedJoint {
                        owner: entity,
                        joint_id,
                        joint,
                    }),
            );
        }
        for (owner, component) in &mut self.joints {
            if *owner == entity {
                continue;
            }
            removed.extend(
                component
                    .drain_where(|joint| joint.involves(entity))
                    .into_iter()
                    .map(|(joint_id, joint)| RemovedJoint {
                        owner: *owner,
                        joint_id,
                        joint,
                    }),
            );
        }
        removed
    }

    /// Routes `owner`'s joints through `relay` while it is held.
    pub fn set_relay(&mut self, owner: EntityId, relay: Option<EntityId>) {
        self.joints.entry(owner).or_default().relay = relay;
    }

    /// Returns the relay body of `owner`, if any.
    #[must_use]
    pub fn relay_of(&self, owner: EntityId) -> Option<EntityId> {
        self.joints.get(&owner)?.relay
    }

    /// Iterates owners whose joints are relayed to `target`, in id order.
    pub fn relayed_to(&self, target: EntityId) -> impl Iterator<Item = (EntityId, &JointComponent)> + '_ {
        self.joints
            .iter()
            .filter(move |(_, component)| component.relay == Some(target))
            .map(|(owner, component)| (*owner, component))
    }

    /// Returns `true` if `entity` is the relay target of a component that
    /// holds a tether.
    #[must_use]
    pub fn is_tether_relay_target(&self, entity: EntityId) -> bool {
        self.relayed_to(entity)
            .any(|(_, component)| component.contains(TETHER_JOINT_ID))
    }

    // -------------------------------------------------------------------------
    // Counters
    // -------------------------------------------------------------------------

    /// Generates a new unique trace ID.
    pub fn new_trace_id(&mut self) -> TraceId {
        let id = TraceId::new(self.next_trace_id);
        self.next_trace_id += 1;
        id
    }

    /// Issues a new audio handle.
    pub fn new_audio_handle(&mut self) -> AudioHandle {
        let handle = AudioHandle::new(self.next_audio_handle);
        self.next_audio_handle += 1;
        handle
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
