//! cmk-runtime
//!
//! Wires the pure gate engine to its host:
//! - one mpsc channel per event kind, one consumer task per tracker
//!   (sequential delivery, last write wins)
//! - per-tracker watch cells so gate queries read a consistent snapshot
//!   while the consumer task mutates
//! - the process-lifetime [`CreditGate`] handle with fail-fast builder
//!
//! This is the only crate in the workspace that spawns tasks or logs;
//! `cmk-signals` and `cmk-gate` stay pure.

mod gate;
mod wiring;

pub use gate::{CreditGate, CreditGateBuilder, ForceCashout};
pub use wiring::{spawn_disable_feed, spawn_overlay_feed, spawn_round_feed};
