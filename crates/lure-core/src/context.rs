//! Execution context threaded through every side-effecting operation.
//!
//! A replica is either the authority (ground truth) or a speculative
//! client running ahead of it. Speculative replicas may re-run the same
//! tick several times while reconciling; only the first run of a tick is
//! allowed to start sounds or create joints.

use serde::{Deserialize, Serialize};

use crate::output::{Output, SystemInstanceId};

/// Whether this replica owns the ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    /// Server-side replica.
    Authoritative,
    /// Client-side prediction.
    Speculative,
}

/// Authority and prediction flags for one pass.
///
/// ```
/// use lure_core::context::ExecutionContext;
///
/// let server = ExecutionContext::server();
/// assert!(server.is_authoritative());
/// assert!(server.is_first_prediction());
///
/// let replay = ExecutionContext::replay();
/// assert!(!replay.is_authoritative());
/// assert!(!replay.is_first_prediction());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionContext {
    authority: Authority,
    first_prediction: bool,
}

impl ExecutionContext {
    /// Creates a context from explicit flags.
    #[must_use]
    pub const fn new(authority: Authority, first_prediction: bool) -> Self {
        Self {
            authority,
            first_prediction,
        }
    }

    /// The authority. Every server pass counts as a first prediction.
    #[must_use]
    pub const fn server() -> Self {
        Self::new(Authority::Authoritative, true)
    }

    /// First speculative run of a tick on a client.
    #[must_use]
    pub const fn predicted() -> Self {
        Self::new(Authority::Speculative, true)
    }

    /// Speculative re-run of an already predicted tick.
    #[must_use]
    pub const fn replay() -> Self {
        Self::new(Authority::Speculative, false)
    }

    /// Returns the authority of this replica.
    #[must_use]
    pub const fn authority(&self) -> Authority {
        self.authority
    }

    /// Returns `true` on the authoritative replica.
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        matches!(self.authority, Authority::Authoritative)
    }

    /// Returns `true` on the first run of the current tick.
    #[must_use]
    pub const fn is_first_prediction(&self) -> bool {
        self.first_prediction
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::server()
    }
}

/// Anything that runs under an [`ExecutionContext`] and records effects.
///
/// Implemented by both the tick and the event contexts so that shared
/// transitions (starting and stopping the reel) can run from either.
pub trait EffectSink {
    /// Flags of the current pass.
    fn execution(&self) -> ExecutionContext;

    /// Records an effect produced by `source`.
    fn emit(&mut self, source: SystemInstanceId, output: Output);
}
