//! Entity types for the simulation.
//!
//! - [`EntityId`]: Unique identifier for entities
//! - [`EntityTag`]: Type classification used to route tick systems
//! - [`EntityInner`]: Type-safe storage for entity-specific components
//! - [`Entity`]: The complete entity container
//!
//! # Example
//!
//! ```
//! use lure_core::entity::{Entity, EntityId, EntityTag};
//!
//! let rod = Entity::new_rod(EntityId::new(42));
//!
//! assert_eq!(rod.id().as_u64(), 42);
//! assert_eq!(rod.tag(), EntityTag::Rod);
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    ActorComponents, AmmoState, BaitComponents, BaitState, BodyState, CatchEntry, CatchTable,
    EmbedState, HandsState, HookState, ItemComponents, JointVisuals, ProjectileComponents,
    PropComponents, RodAppearance, RodComponents, StackState, TackleState, TetherState,
    TransformState,
};

/// Unique identifier for an entity.
///
/// Entity IDs are assigned monotonically by the [`Arena`](crate::arena::Arena)
/// and ordered by value, which gives every pass over the world a
/// deterministic iteration order.
///
/// ```
/// use lure_core::entity::EntityId;
///
/// assert!(EntityId::new(1) < EntityId::new(2));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity type tag.
///
/// Tick systems declare the tags they run on; the
/// [`SystemRegistry`](crate::system::SystemRegistry) uses the tag to bundle
/// systems per entity type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Placed bait that may attract a catch.
    Bait,
    /// Fishing rod: fires a hook on a line and reels it in.
    Rod,
    /// In-flight or embedded projectile.
    Projectile,
    /// Generic physical entity (mob, spawned catch).
    Prop,
    /// Contained item such as tackle.
    Item,
    /// Rod wielder.
    Actor,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bait => write!(f, "Bait"),
            Self::Rod => write!(f, "Rod"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Prop => write!(f, "Prop"),
            Self::Item => write!(f, "Item"),
            Self::Actor => write!(f, "Actor"),
        }
    }
}

/// Type-safe storage for entity-specific components.
///
/// The variant should always match the entity's [`EntityTag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Bait components (placement, stack, catch timer)
    Bait(BaitComponents),
    /// Rod components (tether, ammo, tackle container)
    Rod(RodComponents),
    /// Projectile components (damage, hook, embedding, visuals)
    Projectile(ProjectileComponents),
    /// Prop components (prototype, placement, body)
    Prop(PropComponents),
    /// Item components (prototype, tackle modifier)
    Item(ItemComponents),
    /// Actor components (hands, combat stance)
    Actor(ActorComponents),
}

impl EntityInner {
    /// Returns the corresponding `EntityTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Bait(_) => EntityTag::Bait,
            Self::Rod(_) => EntityTag::Rod,
            Self::Projectile(_) => EntityTag::Projectile,
            Self::Prop(_) => EntityTag::Prop,
            Self::Item(_) => EntityTag::Item,
            Self::Actor(_) => EntityTag::Actor,
        }
    }

    /// Returns the placement of this entity, if it has one.
    ///
    /// Contained items have no placement of their own.
    #[must_use]
    pub const fn transform(&self) -> Option<&TransformState> {
        match self {
            Self::Bait(c) => Some(&c.transform),
            Self::Rod(c) => Some(&c.transform),
            Self::Projectile(c) => Some(&c.transform),
            Self::Prop(c) => Some(&c.transform),
            Self::Actor(c) => Some(&c.transform),
            Self::Item(_) => None,
        }
    }

    /// Returns the physics body of this entity, if it has one.
    #[must_use]
    pub fn body_mut(&mut self) -> Option<&mut BodyState> {
        match self {
            Self::Rod(c) => Some(&mut c.body),
            Self::Projectile(c) => Some(&mut c.body),
            Self::Prop(c) => Some(&mut c.body),
            Self::Actor(c) => Some(&mut c.body),
            Self::Bait(_) | Self::Item(_) => None,
        }
    }

    /// Returns a reference to the bait components, if this is bait.
    #[must_use]
    pub const fn as_bait(&self) -> Option<&BaitComponents> {
        match self {
            Self::Bait(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the bait components, if this is bait.
    #[must_use]
    pub fn as_bait_mut(&mut self) -> Option<&mut BaitComponents> {
        match self {
            Self::Bait(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the rod components, if this is a rod.
    #[must_use]
    pub const fn as_rod(&self) -> Option<&RodComponents> {
        match self {
            Self::Rod(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the rod components, if this is a rod.
    #[must_use]
    pub fn as_rod_mut(&mut self) -> Option<&mut RodComponents> {
        match self {
            Self::Rod(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the projectile components, if this is a projectile.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileComponents> {
        match self {
            Self::Projectile(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the projectile components, if this is a projectile.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileComponents> {
        match self {
            Self::Projectile(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the prop components, if this is a prop.
    #[must_use]
    pub const fn as_prop(&self) -> Option<&PropComponents> {
        match self {
            Self::Prop(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the item components, if this is an item.
    #[must_use]
    pub const fn as_item(&self) -> Option<&ItemComponents> {
        match self {
            Self::Item(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the actor components, if this is an actor.
    #[must_use]
    pub const fn as_actor(&self) -> Option<&ActorComponents> {
        match self {
            Self::Actor(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the actor components, if this is an actor.
    #[must_use]
    pub fn as_actor_mut(&mut self) -> Option<&mut ActorComponents> {
        match self {
            Self::Actor(components) => Some(components),
            _ => None,
        }
    }
}

/// A complete entity in the simulation.
///
/// # Invariants
///
/// - The `EntityId` must be unique within an arena
/// - The `EntityTag` should match the `EntityInner` variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity with the given ID, tag, and inner storage.
    ///
    /// The caller is responsible for keeping `tag` and `inner` consistent.
    #[must_use]
    pub const fn new(id: EntityId, tag: EntityTag, inner: EntityInner) -> Self {
        Self { id, tag, inner }
    }

    /// Creates a new bait entity with default components.
    #[must_use]
    pub fn new_bait(id: EntityId) -> Self {
        Self::new(
            id,
            EntityTag::Bait,
            EntityInner::Bait(BaitComponents::default()),
        )
    }

    /// Creates a new rod entity with default components.
    #[must_use]
    pub fn new_rod(id: EntityId) -> Self {
        Self::new(id, EntityTag::Rod, EntityInner::Rod(RodComponents::default()))
    }

    /// Creates a new projectile entity with default components.
    #[must_use]
    pub fn new_projectile(id: EntityId) -> Self {
        Self::new(
            id,
            EntityTag::Projectile,
            EntityInner::Projectile(ProjectileComponents::default()),
        )
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Returns a reference to the entity's inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the entity's inner component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns `true` if this entity is a rod.
    #[must_use]
    pub const fn is_rod(&self) -> bool {
        matches!(self.tag, EntityTag::Rod)
    }

    /// Returns `true` if this entity is a projectile.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        matches!(self.tag, EntityTag::Projectile)
    }

    /// Returns the placement of this entity, if it has one.
    #[must_use]
    pub const fn transform(&self) -> Option<&TransformState> {
        self.inner.transform()
    }

    /// Returns the bait components if this is bait, `None` otherwise.
    #[must_use]
    pub const fn as_bait(&self) -> Option<&BaitComponents> {
        self.inner.as_bait()
    }

    /// Returns mutable bait components if this is bait, `None` otherwise.
    #[must_use]
    pub fn as_bait_mut(&mut self) -> Option<&mut BaitComponents> {
        self.inner.as_bait_mut()
    }

    /// Returns the rod components if this is a rod, `None` otherwise.
    #[must_use]
    pub const fn as_rod(&self) -> Option<&RodComponents> {
        self.inner.as_rod()
    }

    /// Returns mutable rod components if this is a rod, `None` otherwise.
    #[must_use]
    pub fn as_rod_mut(&mut self) -> Option<&mut RodComponents> {
        self.inner.as_rod_mut()
    }

    /// Returns the projectile components if this is a projectile, `None` otherwise.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileComponents> {
        self.inner.as_projectile()
    }

    /// Returns mutable projectile components if this is a projectile, `None` otherwise.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileComponents> {
        self.inner.as_projectile_mut()
    }

    /// Returns the prop components if this is a prop, `None` otherwise.
    #[must_use]
    pub const fn as_prop(&self) -> Option<&PropComponents> {
        self.inner.as_prop()
    }

    /// Returns the item components if this is an item, `None` otherwise.
    #[must_use]
    pub const fn as_item(&self) -> Option<&ItemComponents> {
        self.inner.as_item()
    }

    /// Returns the actor components if this is an actor, `None` otherwise.
    #[must_use]
    pub const fn as_actor(&self) -> Option<&ActorComponents> {
        self.inner.as_actor()
    }

    /// Returns mutable actor components if this is an actor, `None` otherwise.
    #[must_use]
    pub fn as_actor_mut(&mut self) -> Option<&mut ActorComponents> {
        self.inner.as_actor_mut()
    }
}
