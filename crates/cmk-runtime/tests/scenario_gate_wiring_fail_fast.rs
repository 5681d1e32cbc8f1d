//! Builder wiring is fail-fast: a missing collaborator is a fatal
//! construction error with a deterministic code, never a runtime condition.
//! The gate must not run partially wired.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use uuid::Uuid;

use cmk_config::GateConfig;
use cmk_gate::TransactionSource;
use cmk_runtime::CreditGate;
use cmk_signals::{DisableSignals, OverlayTracker, RoundPhaseTracker};

struct IdleBank;

impl TransactionSource for IdleBank {
    fn current_transaction_id(&self) -> Result<Option<Uuid>> {
        Ok(None)
    }
}

fn cells() -> (
    watch::Receiver<DisableSignals>,
    watch::Receiver<RoundPhaseTracker>,
    watch::Receiver<OverlayTracker>,
) {
    let (_dtx, d) = watch::channel(DisableSignals::new());
    let (_rtx, r) = watch::channel(RoundPhaseTracker::new());
    let (_otx, o) = watch::channel(OverlayTracker::new());
    (d, r, o)
}

#[test]
fn fully_wired_gate_builds() {
    let (d, r, o) = cells();
    let gate = CreditGate::builder()
        .disable_feed(d)
        .round_feed(r)
        .overlay_feed(o)
        .transaction_source(Arc::new(IdleBank))
        .gate_config(GateConfig::jurisdiction_defaults())
        .build();
    assert!(gate.is_ok());
}

#[test]
fn each_missing_collaborator_fails_with_its_code() {
    let (d, r, o) = cells();
    let err = CreditGate::builder()
        .round_feed(r.clone())
        .overlay_feed(o.clone())
        .transaction_source(Arc::new(IdleBank))
        .gate_config(GateConfig::jurisdiction_defaults())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("GATE_WIRING_MISSING_DISABLE_FEED"));

    let err = CreditGate::builder()
        .disable_feed(d.clone())
        .overlay_feed(o.clone())
        .transaction_source(Arc::new(IdleBank))
        .gate_config(GateConfig::jurisdiction_defaults())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("GATE_WIRING_MISSING_ROUND_FEED"));

    let err = CreditGate::builder()
        .disable_feed(d.clone())
        .round_feed(r.clone())
        .transaction_source(Arc::new(IdleBank))
        .gate_config(GateConfig::jurisdiction_defaults())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("GATE_WIRING_MISSING_OVERLAY_FEED"));

    let err = CreditGate::builder()
        .disable_feed(d.clone())
        .round_feed(r.clone())
        .overlay_feed(o.clone())
        .gate_config(GateConfig::jurisdiction_defaults())
        .build()
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("GATE_WIRING_MISSING_TRANSACTION_SOURCE"));

    let err = CreditGate::builder()
        .disable_feed(d)
        .round_feed(r)
        .overlay_feed(o)
        .transaction_source(Arc::new(IdleBank))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("GATE_WIRING_MISSING_GATE_CONFIG"));
}
