//! Effects produced by the fishing systems.
//!
//! Tick systems and event handlers apply their changes to the
//! [`Arena`](crate::arena::Arena) directly, then record what they did as an
//! [`Output`] in the [`EffectLog`]. The log is what a host engine replays
//! onto its collaborators (audio, physics, rendering, entity spawning) and
//! what tests assert on.
//!
//! # Categories
//!
//! - [`Command`]: requests to an external service (spawn, audio, deletion)
//! - [`Modifier`]: value changes on entity or joint state
//! - [`Event`]: notifications of gameplay transitions
//!
//! Every entry is wrapped in an [`OutputEnvelope`] carrying the producing
//! system instance, the trace id of the tick pass or event dispatch that
//! produced it, the tick, and a sequence number.
//!
//! # Example
//!
//! ```
//! use lure_core::entity::EntityId;
//! use lure_core::output::{
//!     Command, EffectLog, OutputKind, SystemId, SystemInstanceId, TraceId,
//! };
//!
//! let mut log = EffectLog::new();
//! log.begin_tick(3);
//! log.record(
//!     Command::QueueDelete { entity: EntityId::new(9) },
//!     SystemInstanceId::new(EntityId::new(1), SystemId::new("tether")),
//!     TraceId::new(0),
//! );
//!
//! let entries = log.drain();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].tick(), 3);
//! assert_eq!(entries[0].kind(), OutputKind::Command);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::damage::DamageSpecifier;
use crate::entity::EntityId;

// =============================================================================
// Identification Types
// =============================================================================

/// Identifies a tick system or event handler by its registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemId(String);

impl SystemId {
    /// Creates a new `SystemId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SystemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A system acting on one entity.
///
/// ```
/// use lure_core::entity::EntityId;
/// use lure_core::output::{SystemId, SystemInstanceId};
///
/// let instance = SystemInstanceId::new(EntityId::new(4), SystemId::new("reel"));
/// assert_eq!(instance.to_string(), "reel@4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemInstanceId {
    entity_id: EntityId,
    system_id: SystemId,
}

impl SystemInstanceId {
    /// Creates a new instance identifier.
    #[must_use]
    pub fn new(entity_id: EntityId, system_id: SystemId) -> Self {
        Self {
            entity_id,
            system_id,
        }
    }

    /// Entity the system acted on.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// The acting system.
    #[must_use]
    pub fn system_id(&self) -> &SystemId {
        &self.system_id
    }
}

impl fmt::Display for SystemInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.system_id, self.entity_id)
    }
}

/// Groups the effects of one tick pass over an entity, or of one event
/// dispatch including its cascaded follow-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(u64);

impl TraceId {
    /// Creates a new trace ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this trace ID.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trace:{}", self.0)
    }
}

impl From<u64> for TraceId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Handle of a playing sound, issued by the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle(u64);

impl AudioHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this handle.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio:{}", self.0)
    }
}

// =============================================================================
// Output Categories
// =============================================================================

/// Requests to external services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A prototype was spawned next to an anchor entity.
    SpawnNextTo {
        /// Prototype id
        prototype: String,
        /// Entity the spawn was placed beside
        anchor: EntityId,
        /// Newly created entity
        spawned: EntityId,
    },
    /// Start a sound.
    PlayAudio {
        /// Handle of the new sound
        handle: AudioHandle,
        /// Sound asset
        sound: String,
        /// Entity the sound is attached to
        source: EntityId,
        /// Actor that caused it, if any
        user: Option<EntityId>,
    },
    /// Stop a sound.
    StopAudio {
        /// Handle being released
        handle: AudioHandle,
        /// Entity the sound was attached to
        source: EntityId,
    },
    /// Delete an entity at the end of the current pass.
    QueueDelete {
        /// Entity to delete
        entity: EntityId,
    },
}

impl Command {
    /// Returns the entity this command concerns.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::SpawnNextTo { anchor, .. } => *anchor,
            Self::PlayAudio { source, .. } | Self::StopAudio { source, .. } => *source,
            Self::QueueDelete { entity } => *entity,
        }
    }
}

/// Value changes on entity or joint state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Units were taken from a stack.
    ConsumeStack {
        /// Stack owner
        entity: EntityId,
        /// Units taken
        amount: u32,
        /// Units left afterwards
        remaining: u32,
    },
    /// Ammunition was returned to a rod.
    RestoreAmmo {
        /// Rod receiving the ammunition
        rod: EntityId,
        /// Rounds requested
        delta: u32,
        /// Count afterwards, clamped at capacity
        count: u32,
    },
    /// A distance joint was created.
    CreateDistanceJoint {
        /// Owning body
        owner: EntityId,
        /// Other body
        target: EntityId,
        /// Joint key
        joint_id: String,
        /// Initial length
        length: f32,
        /// Lower bound
        min_length: f32,
        /// Upper bound
        max_length: f32,
    },
    /// A distance joint's upper bound was narrowed.
    ShortenJoint {
        /// Owning body
        owner: EntityId,
        /// Joint key
        joint_id: String,
        /// New upper bound
        max_length: f32,
        /// New length
        length: f32,
    },
    /// A joint was removed by key.
    RemoveJoint {
        /// Owning body
        owner: EntityId,
        /// Joint key
        joint_id: String,
    },
    /// Every joint an entity takes part in was removed.
    ClearJoints {
        /// Entity whose joints were cleared
        entity: EntityId,
        /// How many joints were removed
        removed: usize,
    },
    /// A physics body was marked awake.
    WakeBody {
        /// Body to wake
        entity: EntityId,
    },
    /// The rod's loaded-hook appearance changed.
    SetCharged {
        /// Rod whose appearance changed
        rod: EntityId,
        /// New flag value
        charged: bool,
    },
    /// Rope visuals were attached to a projectile.
    SetJointVisuals {
        /// Projectile carrying the visuals
        projectile: EntityId,
        /// Rope sprite
        sprite: String,
        /// Entity the rope runs to
        target: EntityId,
    },
    /// Bonus damage was merged into a projectile.
    MergeDamage {
        /// Projectile receiving the bonus
        projectile: EntityId,
        /// Bonus merged in
        bonus: DamageSpecifier,
    },
}

impl Modifier {
    /// Returns the entity this modifier changed.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::ConsumeStack { entity, .. }
            | Self::ClearJoints { entity, .. }
            | Self::WakeBody { entity } => *entity,
            Self::RestoreAmmo { rod, .. } | Self::SetCharged { rod, .. } => *rod,
            Self::CreateDistanceJoint { owner, .. }
            | Self::ShortenJoint { owner, .. }
            | Self::RemoveJoint { owner, .. } => *owner,
            Self::SetJointVisuals { projectile, .. } | Self::MergeDamage { projectile, .. } => {
                *projectile
            }
        }
    }
}

/// Gameplay transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A bait produced a catch.
    CatchLanded {
        /// Bait that was consumed
        bait: EntityId,
        /// Catch prototype
        prototype: String,
        /// Spawned catch
        spawned: EntityId,
    },
    /// A rod entered or left the reeling state.
    ReelingChanged {
        /// Rod whose state changed
        rod: EntityId,
        /// New state
        reeling: bool,
    },
    /// A rod started tracking a fired hook.
    TetherAttached {
        /// Firing rod
        rod: EntityId,
        /// Tracked projectile
        projectile: EntityId,
    },
}

impl Event {
    /// Returns the primary entity involved in this event.
    #[must_use]
    pub const fn primary_entity(&self) -> EntityId {
        match self {
            Self::CatchLanded { bait, .. } => *bait,
            Self::ReelingChanged { rod, .. } | Self::TetherAttached { rod, .. } => *rod,
        }
    }
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Service requests
    Command,
    /// Value changes
    Modifier,
    /// Notifications
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Modifier => write!(f, "Modifier"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// One recorded effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A service request
    Command(Command),
    /// A value change
    Modifier(Modifier),
    /// A notification
    Event(Event),
}

impl Output {
    /// Returns the category of this output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Modifier(_) => OutputKind::Modifier,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is a command output.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the modifier if this is a modifier output.
    #[must_use]
    pub const fn as_modifier(&self) -> Option<&Modifier> {
        match self {
            Self::Modifier(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the event if this is an event output.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Modifier> for Output {
    fn from(m: Modifier) -> Self {
        Self::Modifier(m)
    }
}

impl From<Event> for Output {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// An [`Output`] with causal metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: SystemInstanceId,
    trace_id: TraceId,
    tick: u64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Creates a new output envelope.
    #[must_use]
    pub fn new(
        output: Output,
        source: SystemInstanceId,
        trace_id: TraceId,
        tick: u64,
        sequence: u32,
    ) -> Self {
        Self {
            output,
            source,
            trace_id,
            tick,
            sequence,
        }
    }

    /// Returns a reference to the wrapped output.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Consumes the envelope and returns the wrapped output.
    #[must_use]
    pub fn into_output(self) -> Output {
        self.output
    }

    /// Returns the producing system instance.
    #[must_use]
    pub fn source(&self) -> &SystemInstanceId {
        &self.source
    }

    /// Returns the trace ID.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Returns the tick when this output was recorded.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns the sequence number within the tick.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the category of the wrapped output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        self.output.kind()
    }
}

// =============================================================================
// Effect Log
// =============================================================================

/// Ordered record of every effect produced since the last drain.
///
/// Sequence numbers restart at zero on every [`begin_tick`](Self::begin_tick).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectLog {
    tick: u64,
    next_sequence: u32,
    entries: Vec<OutputEnvelope>,
}

impl EffectLog {
    /// Creates an empty log at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts stamping new entries with `tick`.
    pub fn begin_tick(&mut self, tick: u64) {
        if tick != self.tick {
            self.tick = tick;
            self.next_sequence = 0;
        }
    }

    /// Appends an effect.
    pub fn record(&mut self, output: impl Into<Output>, source: SystemInstanceId, trace_id: TraceId) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(OutputEnvelope::new(
            output.into(),
            source,
            trace_id,
            self.tick,
            sequence,
        ));
    }

    /// Entries recorded since the last drain, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[OutputEnvelope] {
        &self.entries
    }

    /// Iterates the recorded outputs, oldest first.
    pub fn outputs(&self) -> impl Iterator<Item = &Output> + '_ {
        self.entries.iter().map(OutputEnvelope::output)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns every entry.
    pub fn drain(&mut self) -> Vec<OutputEnvelope> {
        std::mem::take(&mut self.entries)
    }
}

// =============================================================================
// Tests
// =============================================================================
