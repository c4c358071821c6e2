//! Per-tick and per-rebuild reports.

use bead_path::{CollectOutcome, Rejection};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeldState {
    /// Not depositing. Ticks do nothing.
    #[default]
    Idle,
    /// Depositing. Each tick attempts one sample.
    Welding,
}

impl WeldState {
    /// True while welding.
    #[must_use]
    pub const fn is_welding(self) -> bool {
        matches!(self, Self::Welding)
    }
}

impl std::fmt::Display for WeldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Welding => write!(f, "welding"),
        }
    }
}

/// What happened to the sample path during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleOutcome {
    /// The generator is idle.
    Idle,
    /// No tip pose was available.
    NoPose,
    /// The weld gate refused deposition.
    Gated,
    /// The candidate sample was rejected.
    Rejected(Rejection),
    /// A sample was appended.
    Appended {
        /// Index of the new sample in the buffer.
        index: usize,
        /// Number of old samples evicted.
        evicted: usize,
    },
}

impl SampleOutcome {
    /// True if a sample was appended.
    #[must_use]
    pub const fn is_appended(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }
}

impl From<CollectOutcome> for SampleOutcome {
    fn from(outcome: CollectOutcome) -> Self {
        match outcome {
            CollectOutcome::Appended { index, evicted } => Self::Appended { index, evicted },
            CollectOutcome::Rejected(reason) => Self::Rejected(reason),
        }
    }
}

/// Summary of one mesh rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RebuildStats {
    /// Number of rings (retained samples) extruded.
    pub rings: usize,

    /// Number of vertices in the published mesh.
    pub vertices: usize,

    /// Number of triangles in the published mesh.
    pub triangles: usize,

    /// Generation number of the published mesh.
    pub generation: u64,
}

impl RebuildStats {
    /// True if the published mesh has no geometry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.triangles == 0
    }
}

impl std::fmt::Display for RebuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bead rebuild #{}: {} rings → {} vertices, {} triangles",
            self.generation, self.rings, self.vertices, self.triangles
        )
    }
}

/// Everything one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickReport {
    /// Sample acquisition outcome.
    pub outcome: SampleOutcome,

    /// Rebuild summary, if the mesh was rebuilt.
    pub rebuild: Option<RebuildStats>,
}

impl TickReport {
    pub(crate) const fn idle() -> Self {
        Self {
            outcome: SampleOutcome::Idle,
            rebuild: None,
        }
    }
}
