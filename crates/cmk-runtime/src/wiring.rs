//! Event-feed tasks.
//!
//! Each feed owns its tracker outright: the spawned task is the single
//! consumer of its mpsc channel and the only writer of its watch cell, so
//! events for one tracker are applied strictly in arrival order and a
//! reader of the cell never observes a half-applied event.
//!
//! A task ends when the sender side of its channel closes (the host released
//! the subscription) or when every gate handle has been dropped.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use cmk_signals::{
    DisableEvent, DisableSignals, OverlayEvent, OverlayTracker, RoundEvent, RoundPhaseTracker,
};

/// Spawn the disable-channel consumer. Returns the watch cell the gate
/// reads; the initial value is "not disabled".
pub fn spawn_disable_feed(
    mut rx: mpsc::UnboundedReceiver<DisableEvent>,
) -> watch::Receiver<DisableSignals> {
    let (tx, cell) = watch::channel(DisableSignals::new());
    tokio::spawn(async move {
        let mut st = DisableSignals::new();
        while let Some(ev) = rx.recv().await {
            info!(
                disabled = ev.disabled,
                reason_count = ev.reasons.len(),
                "host disable set replaced"
            );
            st.apply(ev);
            if tx.send(st.clone()).is_err() {
                break;
            }
        }
        debug!("disable feed closed");
    });
    cell
}

/// Spawn the round-phase consumer. Initial phase is `Idle`.
pub fn spawn_round_feed(
    mut rx: mpsc::UnboundedReceiver<RoundEvent>,
) -> watch::Receiver<RoundPhaseTracker> {
    let (tx, cell) = watch::channel(RoundPhaseTracker::new());
    tokio::spawn(async move {
        let mut st = RoundPhaseTracker::new();
        while let Some(ev) = rx.recv().await {
            debug!(phase = ?ev.phase, "round phase changed");
            st.apply(ev);
            if tx.send(st).is_err() {
                break;
            }
        }
        debug!("round feed closed");
    });
    cell
}

/// Spawn the overlay enter/exit consumer. Initial state is "not entered".
pub fn spawn_overlay_feed(
    mut rx: mpsc::UnboundedReceiver<OverlayEvent>,
) -> watch::Receiver<OverlayTracker> {
    let (tx, cell) = watch::channel(OverlayTracker::new());
    tokio::spawn(async move {
        let mut st = OverlayTracker::new();
        while let Some(ev) = rx.recv().await {
            debug!(event = ?ev, "overlay menu event");
            st.apply(ev);
            if tx.send(st).is_err() {
                break;
            }
        }
        debug!("overlay feed closed");
    });
    cell
}
