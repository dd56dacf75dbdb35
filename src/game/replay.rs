//! Input Recording and Replay
//!
//! A run is fully described by its starting simulation, its geometry and the
//! ordered input frames. Recordings serialize with bincode and replay to the
//! same state hash on every machine that uses the same float semantics.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::collision::CollisionQuery;
use crate::core::hash::{hash_with_domain, StateHash};
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::tick::Simulation;

/// Current recording format version.
pub const RECORDING_VERSION: u16 = 1;

/// Domain separator for recording digests.
const RECORDING_DOMAIN: &[u8] = b"GRAPPLE_CORE_INPUTS_V1";

/// Errors from decoding a recording.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Bytes are not a valid recording.
    #[error("recording codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Recording was written by an incompatible version.
    #[error("unsupported recording version {found} (expected {})", RECORDING_VERSION)]
    UnsupportedVersion {
        /// Version found in the data.
        found: u16,
    },
}

/// Ordered input frames, one per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecording {
    version: u16,
    frames: Vec<InputFrame>,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self {
            version: RECORDING_VERSION,
            frames: Vec::new(),
        }
    }

    /// Create a recording from frames.
    pub fn from_frames(frames: Vec<InputFrame>) -> Self {
        Self {
            version: RECORDING_VERSION,
            frames,
        }
    }

    /// Append the next tick's frame.
    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push(frame);
    }

    /// Recorded frames.
    #[inline]
    pub fn frames(&self) -> &[InputFrame] {
        &self.frames
    }

    /// Number of recorded ticks.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        let recording: Self = bincode::deserialize(data)?;
        if recording.version != RECORDING_VERSION {
            return Err(ReplayError::UnsupportedVersion {
                found: recording.version,
            });
        }
        Ok(recording)
    }

    /// Digest of the encoded frames.
    pub fn digest(&self) -> Result<StateHash, ReplayError> {
        Ok(hash_with_domain(RECORDING_DOMAIN, &self.to_bytes()?))
    }
}

impl Default for InputRecording {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay a recording from `sim`'s current state.
///
/// Returns every event emitted, in order.
pub fn replay(
    sim: &mut Simulation,
    world: &dyn CollisionQuery,
    recording: &InputRecording,
) -> Vec<GameEvent> {
    let mut all_events = Vec::new();
    for frame in recording.frames() {
        let result = sim.step(frame, world);
        all_events.extend(result.events);
    }
    debug!(
        "Replayed {} ticks, {} events",
        recording.len(),
        all_events.len()
    );
    all_events
}
