//! Component records for each entity type.
//!
//! Every entity type owns a bundle struct (`BaitComponents`, `RodComponents`,
//! ...) made of small state records. Records shared between bundles
//! (`TransformState`, `BodyState`) are defined once here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::damage::DamageSpecifier;
use crate::entity::EntityId;
use crate::output::AudioHandle;

// =============================================================================
// Shared State
// =============================================================================

/// Placement of an entity in the world.
///
/// `grid` is the supporting surface the entity rests on. An entity with no
/// grid is adrift, which is the qualifying placement for bait.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformState {
    /// World position.
    pub position: Vec2,
    /// Grid the entity is resting on, if any.
    pub grid: Option<EntityId>,
}

impl TransformState {
    /// Creates a transform for an entity floating free at `position`.
    #[must_use]
    pub const fn adrift(position: Vec2) -> Self {
        Self {
            position,
            grid: None,
        }
    }

    /// Creates a transform for an entity resting on `grid`.
    #[must_use]
    pub const fn on_grid(position: Vec2, grid: EntityId) -> Self {
        Self {
            position,
            grid: Some(grid),
        }
    }

    /// Returns `true` if the entity is not resting on any grid.
    #[must_use]
    pub const fn is_adrift(&self) -> bool {
        self.grid.is_none()
    }
}

/// Physics body activity flag.
///
/// The solver is external; the core only wakes bodies that a shortening
/// constraint is about to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyState {
    /// Whether the solver should process this body.
    pub awake: bool,
}

// =============================================================================
// Bait
// =============================================================================

/// One outcome in a [`CatchTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchEntry {
    /// Prototype spawned when this entry is selected.
    pub id: String,
    /// Raw weight compared against the accumulated draw.
    pub weight: f32,
}

impl CatchEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(id: impl Into<String>, weight: f32) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// Ordered weight table of catchable outcomes.
///
/// Order is the resolution order of the weighted walk. Weights are raw: a
/// total below 1.0 leaves residual "nothing caught" mass, and entries past
/// the point where the running total exceeds 1.0 can never be selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatchTable(Vec<CatchEntry>);

impl CatchTable {
    /// Creates a table from entries, keeping their order.
    #[must_use]
    pub fn new(entries: Vec<CatchEntry>) -> Self {
        Self(entries)
    }

    /// Builds a table from `(id, weight)` pairs.
    ///
    /// ```
    /// use lure_core::entity::CatchTable;
    ///
    /// let table = CatchTable::from_pairs([("A", 0.5), ("B", 0.3)]);
    /// assert_eq!(table.len(), 2);
    /// assert!((table.total_weight() - 0.8).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(id, weight)| CatchEntry::new(id, weight))
                .collect(),
        )
    }

    /// Returns the entries in resolution order.
    #[must_use]
    pub fn entries(&self) -> &[CatchEntry] {
        &self.0
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights, accumulated in table order.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.0.iter().map(|entry| entry.weight).sum()
    }
}

impl Default for CatchTable {
    fn default() -> Self {
        Self::from_pairs([
            ("MobCarp", 0.50),
            ("ClothingShoesBootsSalvage", 0.25),
            ("MobCarpMagic", 0.10),
            ("MobCarpHolo", 0.10),
            ("MobShark", 0.04),
            ("MobDragonDungeon", 0.01),
        ])
    }
}

/// Per-bait timer and catch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaitState {
    /// Seconds accumulated since the last catch attempt.
    pub elapsed_time: f32,
    /// Seconds between catch attempts.
    pub catch_interval: f32,
    /// Probability that an attempt bites. Clamped to 1.0 at use time.
    pub catch_chance: f32,
    /// Outcomes and their weights.
    pub catches: CatchTable,
}

impl Default for BaitState {
    fn default() -> Self {
        Self {
            elapsed_time: 0.0,
            catch_interval: 10.0,
            catch_chance: 0.1,
            catches: CatchTable::default(),
        }
    }
}

/// Finite count of a stackable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackState {
    /// Units left in the stack.
    pub count: u32,
}

impl StackState {
    /// Creates a stack holding `count` units.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self { count }
    }

    /// Removes `amount` units if that many are available.
    ///
    /// Returns `false` and leaves the stack untouched otherwise.
    pub fn try_use(&mut self, amount: u32) -> bool {
        match self.count.checked_sub(amount) {
            Some(remaining) => {
                self.count = remaining;
                true
            }
            None => false,
        }
    }
}

impl Default for StackState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Components for bait entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaitComponents {
    /// Placement of the bait.
    pub transform: TransformState,
    /// Units of bait left.
    pub stack: StackState,
    /// Catch timer and table.
    pub bait: BaitState,
}

// =============================================================================
// Rod
// =============================================================================

/// Default offset of the rope's far end on the projectile.
pub const DEFAULT_JOIN_OFFSET: Vec2 = Vec2::new(0.0, 0.5);

/// Tether bookkeeping for a rod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TetherState {
    /// Whether the rod is currently shortening its line.
    pub is_reeling: bool,
    /// Last fired tether-capable projectile. Weak: it may already be gone.
    pub attached_projectile: Option<EntityId>,
    /// Handle of the playing reel sound.
    pub audio_handle: Option<AudioHandle>,
    /// Line shortening speed in units per second.
    pub reel_rate: f32,
    /// Sprite drawn along the line.
    pub rope_sprite: String,
    /// Where the line meets the projectile, in its local frame.
    pub projectile_join_offset: Vec2,
    /// Sound looped while reeling.
    pub reel_sound: String,
    /// Sound played when the rod is reloaded.
    pub cycle_sound: String,
}

impl Default for TetherState {
    fn default() -> Self {
        Self {
            is_reeling: false,
            attached_projectile: None,
            audio_handle: None,
            reel_rate: 2.5,
            rope_sprite: "fishing_line".to_string(),
            projectile_join_offset: DEFAULT_JOIN_OFFSET,
            reel_sound: "fishing_reel".to_string(),
            cycle_sound: "fishing_cycle".to_string(),
        }
    }
}

/// Basic ammunition counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoState {
    /// Rounds available.
    pub count: u32,
    /// Maximum rounds.
    pub capacity: u32,
}

impl AmmoState {
    /// Creates a full magazine of `capacity` rounds.
    #[must_use]
    pub const fn full(capacity: u32) -> Self {
        Self {
            count: capacity,
            capacity,
        }
    }

    /// Adds `delta` rounds, clamped at capacity. Returns the new count.
    pub fn restore(&mut self, delta: u32) -> u32 {
        self.count = self.count.saturating_add(delta).min(self.capacity);
        self.count
    }
}

impl Default for AmmoState {
    fn default() -> Self {
        Self::full(1)
    }
}

/// Rod appearance data read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RodAppearance {
    /// Whether the rod shows a loaded hook.
    pub charged: bool,
}

impl Default for RodAppearance {
    fn default() -> Self {
        Self { charged: true }
    }
}

/// Components for rod entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RodComponents {
    /// Placement of the rod.
    pub transform: TransformState,
    /// Physics body activity.
    pub body: BodyState,
    /// Line and reel state.
    pub tether: TetherState,
    /// Hooks left to fire.
    pub ammo: AmmoState,
    /// Appearance flags.
    pub appearance: RodAppearance,
    /// Contents of the tackle container.
    pub tackle: Vec<EntityId>,
}

// =============================================================================
// Projectile
// =============================================================================

/// Marks a projectile as tether-capable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HookState {
    /// Shortest length the line can be reeled to.
    pub joint_length: f32,
}

impl Default for HookState {
    fn default() -> Self {
        Self { joint_length: 0.0 }
    }
}

/// Where a projectile is lodged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmbedState {
    /// Entity the projectile is embedded into.
    pub embedded_into: Option<EntityId>,
}

/// Rope rendering parameters attached to a projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointVisuals {
    /// Sprite drawn along the rope.
    pub sprite: String,
    /// Rope anchor on the projectile.
    pub offset_a: Vec2,
    /// Entity the rope runs to.
    pub target: EntityId,
}

/// Components for projectile entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectileComponents {
    /// Placement of the projectile.
    pub transform: TransformState,
    /// Physics body activity.
    pub body: BodyState,
    /// Damage dealt on hit, if the projectile deals any.
    pub damage: Option<DamageSpecifier>,
    /// Present on tether-capable projectiles.
    pub hook: Option<HookState>,
    /// Embedding bookkeeping.
    pub embed: EmbedState,
    /// Rope visuals, once attached.
    pub visuals: Option<JointVisuals>,
}

// =============================================================================
// Props, Items, Actors
// =============================================================================

/// Components for generic physical entities (mobs, spawned catches).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropComponents {
    /// Prototype the prop was spawned from.
    pub prototype: String,
    /// Placement of the prop.
    pub transform: TransformState,
    /// Physics body activity.
    pub body: BodyState,
}

/// Damage modifier carried by a tackle item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TackleState {
    /// Bonus merged into fired projectiles.
    pub damage: DamageSpecifier,
}

/// Components for contained items (tackle).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemComponents {
    /// Prototype the item was created from.
    pub prototype: String,
    /// Present if the item is usable as tackle.
    pub tackle: Option<TackleState>,
}

/// What an actor is holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandsState {
    /// Item in the active hand.
    pub active_item: Option<EntityId>,
}

/// Components for actors (rod wielders).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorComponents {
    /// Placement of the actor.
    pub transform: TransformState,
    /// Physics body activity.
    pub body: BodyState,
    /// Held items.
    pub hands: HandsState,
    /// Whether the actor is in combat stance.
    pub combat_mode: bool,
}
