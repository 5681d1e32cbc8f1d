use serde::{Deserialize, Serialize};

use crate::GameRoundPhase;

/// Round-phase change delivered by the game-round source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEvent {
    pub phase: GameRoundPhase,
}

impl RoundEvent {
    pub fn phase_changed(phase: GameRoundPhase) -> Self {
        Self { phase }
    }
}

/// Stores only the latest round phase (last write wins). The upstream source
/// guarantees a single current phase, so no intermediate phases are ever
/// reordered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoundPhaseTracker {
    phase: GameRoundPhase,
}

impl Default for RoundPhaseTracker {
    fn default() -> Self {
        Self {
            phase: GameRoundPhase::Idle,
        }
    }
}

impl RoundPhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, ev: RoundEvent) {
        self.phase = ev.phase;
    }

    pub fn phase(&self) -> GameRoundPhase {
        self.phase
    }

    /// True iff the current phase is `ActiveRound`. `PresentationIdle` is a
    /// terminal display phase and does NOT count as in-round even though it
    /// is reached from `ActiveRound`.
    pub fn in_active_round(&self) -> bool {
        self.phase.is_active_round()
    }
}
