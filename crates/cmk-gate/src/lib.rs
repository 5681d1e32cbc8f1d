//! cmk-gate
//!
//! The credit transfer permission engine:
//! - transfer-flag derivation (may credits move on/off the meter right now)
//! - cash-out lockup policy (jurisdiction strategy state machine)
//! - the live transaction-source seam
//!
//! Deterministic, pure logic. No IO, no time, no host calls. Flags are
//! recomputed on every read from a point-in-time snapshot; nothing here is
//! cached, so a flag can never be stale across a tracker mutation.

mod engine;
mod lockup;
mod types;

pub use engine::derive_flags;
pub use lockup::evaluate_lockup_cashout;
pub use types::*;
