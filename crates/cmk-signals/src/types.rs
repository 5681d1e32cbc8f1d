use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifies a host disable reason (deterministic ordering for tests/logs).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaultKey(pub String);

impl FaultKey {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Transfer-blocking class of a disable reason.
///
/// `Immediate` reasons block cash-out unless exempted; `Deferred` reasons
/// only raise the cash-in tilt flag and never block cash-out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Immediacy {
    Immediate,
    Deferred,
}

/// One active disable reason as reported by the host disable manager.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisableReason {
    pub key: FaultKey,
    pub immediacy: Immediacy,
}

impl DisableReason {
    pub fn immediate<S: Into<String>>(key: S) -> Self {
        Self {
            key: FaultKey::new(key),
            immediacy: Immediacy::Immediate,
        }
    }

    pub fn deferred<S: Into<String>>(key: S) -> Self {
        Self {
            key: FaultKey::new(key),
            immediacy: Immediacy::Deferred,
        }
    }
}

/// Fault keys exempt from cash-out blocking even when classified `Immediate`.
///
/// A homing or authentication fault must never trap a player's money on the
/// machine. The set is fixed at construction and never grows or shrinks at
/// runtime; adding an exemption is a data change, not a logic change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExemptFaults {
    keys: BTreeSet<FaultKey>,
}

impl ExemptFaults {
    /// Mechanical hopper-homing fault (self-clearing; never traps funds).
    pub const HOPPER_HOMING: &'static str = "HOPPER_HOMING_FAULT";
    /// Background media authentication check (routine; never traps funds).
    pub const BACKGROUND_AUTHENTICATION: &'static str = "BACKGROUND_AUTHENTICATION_CHECK";

    /// The standard exemption set shipped with the engine.
    pub fn standard() -> Self {
        Self::from_keys([Self::HOPPER_HOMING, Self::BACKGROUND_AUTHENTICATION])
    }

    /// Build an exemption set from explicit keys (jurisdiction override).
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(FaultKey::new).collect(),
        }
    }

    pub fn contains(&self, key: &FaultKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Current play-round phase. Exactly one phase is active at any instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameRoundPhase {
    /// No round in progress.
    Idle,
    /// Gameplay outcomes are being determined or presented.
    ActiveRound,
    /// Terminal-round display phase, reached from `ActiveRound`. Does NOT
    /// count as in-round for transfer-blocking purposes.
    PresentationIdle,
}

impl GameRoundPhase {
    /// True only for `ActiveRound` — excludes both `Idle` and
    /// `PresentationIdle`.
    pub fn is_active_round(&self) -> bool {
        matches!(self, GameRoundPhase::ActiveRound)
    }
}
