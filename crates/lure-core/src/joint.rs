//! Joint records shared with the physics collaborator.
//!
//! The solver itself is external. The core creates joints, narrows the
//! length bounds of distance joints and removes them; nothing here
//! integrates motion.
//!
//! Joints are stored per owning entity in a [`JointComponent`], keyed by a
//! string id. The tether between a rod and whatever its hook is lodged in
//! always uses [`TETHER_JOINT_ID`].

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Key of the rod-to-target distance joint.
pub const TETHER_JOINT_ID: &str = "grappling";

/// Local anchor of the tether on the rod.
pub const ROD_ANCHOR: Vec2 = Vec2::new(0.0, 0.5);

/// Extra line paid out beyond the embed distance when the tether is made.
pub const TETHER_SLACK: f32 = 0.2;

/// A rope-like constraint keeping two bodies within `[min_length, max_length]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceJoint {
    /// Owning body.
    pub body_a: EntityId,
    /// Other body.
    pub body_b: EntityId,
    /// Anchor on `body_a`, in its local frame.
    pub anchor_a: Vec2,
    /// Anchor on `body_b`, in its local frame.
    pub anchor_b: Vec2,
    /// Current rest length.
    pub length: f32,
    /// Shortest allowed length.
    pub min_length: f32,
    /// Longest allowed length.
    pub max_length: f32,
    /// 1.0 is rigid.
    pub stiffness: f32,
    /// Force at which the joint snaps. `None` never breaks.
    pub breakpoint: Option<f32>,
}

impl DistanceJoint {
    /// Creates a joint of the given length with bounds `[0, length]`.
    #[must_use]
    pub fn new(body_a: EntityId, body_b: EntityId, anchor_a: Vec2, length: f32) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b: Vec2::ZERO,
            length,
            min_length: 0.0,
            max_length: length,
            stiffness: 0.0,
            breakpoint: None,
        }
    }
}

/// Rigid attachment with no length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeldJoint {
    /// Owning body.
    pub body_a: EntityId,
    /// Other body.
    pub body_b: EntityId,
}

/// Any joint the physics collaborator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Joint {
    /// Length-bounded rope.
    Distance(DistanceJoint),
    /// Rigid weld.
    Weld(WeldJoint),
}

impl Joint {
    /// Owning body.
    #[must_use]
    pub const fn body_a(&self) -> EntityId {
        match self {
            Self::Distance(joint) => joint.body_a,
            Self::Weld(joint) => joint.body_a,
        }
    }

    /// Other body.
    #[must_use]
    pub const fn body_b(&self) -> EntityId {
        match self {
            Self::Distance(joint) => joint.body_b,
            Self::Weld(joint) => joint.body_b,
        }
    }

    /// Returns `true` if `entity` is either body of this joint.
    #[must_use]
    pub fn involves(&self, entity: EntityId) -> bool {
        self.body_a() == entity || self.body_b() == entity
    }

    /// Returns the distance joint, if this is one.
    #[must_use]
    pub const fn as_distance(&self) -> Option<&DistanceJoint> {
        match self {
            Self::Distance(joint) => Some(joint),
            Self::Weld(_) => None,
        }
    }

    /// Returns the distance joint mutably, if this is one.
    #[must_use]
    pub fn as_distance_mut(&mut self) -> Option<&mut DistanceJoint> {
        match self {
            Self::Distance(joint) => Some(joint),
            Self::Weld(_) => None,
        }
    }
}

/// Joints owned by one entity.
///
/// `relay` names the body that stands in for the owner while the owner is
/// held (a rod in an actor's hand relays to the actor).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointComponent {
    joints: BTreeMap<String, Joint>,
    /// Body that receives the owner's joint forces, if any.
    pub relay: Option<EntityId>,
}

impl JointComponent {
    /// Creates an empty component.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a joint by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Joint> {
        self.joints.get(id)
    }

    /// Looks up a joint by id, mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Joint> {
        self.joints.get_mut(id)
    }

    /// Returns `true` if a joint with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.joints.contains_key(id)
    }

    /// Inserts a joint, replacing any previous joint with the same id.
    pub fn insert(&mut self, id: impl Into<String>, joint: Joint) -> Option<Joint> {
        self.joints.insert(id.into(), joint)
    }

    /// Removes a joint by id.
    pub fn remove(&mut self, id: &str) -> Option<Joint> {
        self.joints.remove(id)
    }

    /// Removes and returns every joint matching `pred`, in id order.
    pub fn drain_where(&mut self, mut pred: impl FnMut(&Joint) -> bool) -> Vec<(String, Joint)> {
        let ids: Vec<String> = self
            .joints
            .iter()
            .filter(|(_, joint)| pred(joint))
            .map(|(id, _)| id.clone())
            .collect();
        ids.into_iter()
            .filter_map(|id| self.joints.remove(&id).map(|joint| (id, joint)))
            .collect()
    }

    /// Iterates joints in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Joint)> + '_ {
        self.joints.iter().map(|(id, joint)| (id.as_str(), joint))
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Returns `true` if there are no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}
