//! Discrete events consumed by the tether handlers.
//!
//! The host engine raises these when something happens outside the tick
//! loop: a weapon fires, a projectile lodges, the physics solver drops a
//! joint, a player uses or deselects an item, or a client asks to reel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityId;

/// Client request to start or stop reeling the active hand item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestReelMessage {
    /// Desired reeling state.
    pub reeling: bool,
}

/// An event delivered to the registered handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A rod fired.
    ShotFired {
        /// Firing rod
        rod: EntityId,
        /// Actor holding the rod, if any
        user: Option<EntityId>,
        /// Projectiles launched, in launch order
        ammo: Vec<EntityId>,
    },
    /// A projectile lodged in something.
    ProjectileEmbedded {
        /// The projectile
        projectile: EntityId,
        /// Weapon that fired it
        weapon: EntityId,
        /// Entity it is lodged in
        embedded: EntityId,
    },
    /// A joint disappeared from `owner`.
    JointRemoved {
        /// Entity that held the joint
        owner: EntityId,
        /// Body on the other side
        other: EntityId,
        /// Key of the removed joint
        joint_id: String,
    },
    /// A projectile was pulled out of whatever it was lodged in.
    EmbedRemoved {
        /// The projectile
        projectile: EntityId,
    },
    /// A player used a held rod.
    Activated {
        /// The rod
        rod: EntityId,
        /// Actor using it
        user: EntityId,
        /// `false` for a quick tap
        complex: bool,
    },
    /// The hand holding a rod was deselected.
    HandDeselected {
        /// The rod
        rod: EntityId,
        /// Actor whose hand changed
        user: EntityId,
    },
    /// A client asked to start or stop reeling.
    ReelRequest {
        /// Actor that sent the request
        sender: EntityId,
        /// Request body
        message: RequestReelMessage,
    },
}

impl GameEvent {
    /// Returns the routing kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ShotFired { .. } => EventKind::ShotFired,
            Self::ProjectileEmbedded { .. } => EventKind::ProjectileEmbedded,
            Self::JointRemoved { .. } => EventKind::JointRemoved,
            Self::EmbedRemoved { .. } => EventKind::EmbedRemoved,
            Self::Activated { .. } => EventKind::Activated,
            Self::HandDeselected { .. } => EventKind::HandDeselected,
            Self::ReelRequest { .. } => EventKind::ReelRequest,
        }
    }

    /// Returns the entity the event is about.
    #[must_use]
    pub const fn subject(&self) -> EntityId {
        match self {
            Self::ShotFired { rod, .. }
            | Self::Activated { rod, .. }
            | Self::HandDeselected { rod, .. } => *rod,
            Self::ProjectileEmbedded { projectile, .. } | Self::EmbedRemoved { projectile } => {
                *projectile
            }
            Self::JointRemoved { owner, .. } => *owner,
            Self::ReelRequest { sender, .. } => *sender,
        }
    }
}

/// Event routing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// [`GameEvent::ShotFired`]
    ShotFired,
    /// [`GameEvent::ProjectileEmbedded`]
    ProjectileEmbedded,
    /// [`GameEvent::JointRemoved`]
    JointRemoved,
    /// [`GameEvent::EmbedRemoved`]
    EmbedRemoved,
    /// [`GameEvent::Activated`]
    Activated,
    /// [`GameEvent::HandDeselected`]
    HandDeselected,
    /// [`GameEvent::ReelRequest`]
    ReelRequest,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ShotFired => "ShotFired",
            Self::ProjectileEmbedded => "ProjectileEmbedded",
            Self::JointRemoved => "JointRemoved",
            Self::EmbedRemoved => "EmbedRemoved",
            Self::Activated => "Activated",
            Self::HandDeselected => "HandDeselected",
            Self::ReelRequest => "ReelRequest",
        };
        write!(f, "{name}")
    }
}
