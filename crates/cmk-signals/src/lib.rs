//! cmk-signals
//!
//! Event types and tracker state machines feeding the credit transfer gate:
//! - host disable reasons (immediate vs. deferred, with cash-out exemptions)
//! - game round phase
//! - operator overlay menu
//!
//! Deterministic, pure logic. No IO, no time, no host calls. Each tracker is
//! mutated only by events from its own channel; synchronization is the
//! caller's responsibility (cmk-runtime wraps each tracker in a lock).

mod disable;
mod overlay;
mod round;
mod types;

pub use disable::{DisableEvent, DisableSignals};
pub use overlay::{OverlayEvent, OverlayTracker};
pub use round::{RoundEvent, RoundPhaseTracker};
pub use types::*;
