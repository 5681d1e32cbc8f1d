use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::watch;
use tracing::{debug, info};

use cmk_config::GateConfig;
use cmk_gate::{
    derive_flags, evaluate_lockup_cashout, GateInput, LockupStrategy, TransactionSource,
    TransferFlags,
};
use cmk_signals::{DisableSignals, ExemptFaults, OverlayTracker, RoundPhaseTracker};

/// Forced-cash-out collaborator: invoked at most once per `ForceCashout`
/// evaluation, fire-and-forget. Invocation failures are the collaborator's
/// concern, not this engine's.
pub type ForceCashout<'a> = dyn Fn() + Send + Sync + 'a;

/// Process-lifetime handle answering "can money move now, and in which
/// direction". Cheap to clone; all handles observe the same trackers.
///
/// Flags are recomputed from fresh tracker snapshots plus a live transaction
/// query on every read — nothing is cached, so an answer can never be stale
/// across a tracker mutation.
#[derive(Clone)]
pub struct CreditGate {
    disable: watch::Receiver<DisableSignals>,
    round: watch::Receiver<RoundPhaseTracker>,
    overlay: watch::Receiver<OverlayTracker>,
    transactions: Arc<dyn TransactionSource>,
    exempt: ExemptFaults,
    strategy: LockupStrategy,
}

impl std::fmt::Debug for CreditGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditGate")
            .field("disable", &self.disable)
            .field("round", &self.round)
            .field("overlay", &self.overlay)
            .field("exempt", &self.exempt)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl CreditGate {
    pub fn builder() -> CreditGateBuilder {
        CreditGateBuilder::default()
    }

    /// The jurisdiction lockup strategy this gate was built with.
    pub fn lockup_strategy(&self) -> LockupStrategy {
        self.strategy
    }

    /// Derive the four transfer flags right now.
    ///
    /// A transaction-source failure propagates unmasked: silently defaulting
    /// to "safe" would hide a permission-state fault from the operator-facing
    /// fault system.
    pub fn transfer_flags(&self) -> Result<TransferFlags> {
        let transaction_open = self
            .transactions
            .transaction_open()
            .context("transaction source query failed")?;
        Ok(derive_flags(&self.snapshot(transaction_open)))
    }

    /// May a cash-out proceed right now, given the device lockup state and
    /// caller-supplied eligibility?
    ///
    /// Under the `ForceCashout` strategy the supplied callback (if any) is
    /// invoked exactly once and `false` is returned — the caller is told no
    /// cash-out happened synchronously, while the callback independently
    /// attempts or schedules one.
    pub fn can_cashout_in_lockup(
        &self,
        is_locked_up: bool,
        is_allowed_to_cashout: bool,
        force_cashout: Option<&ForceCashout>,
    ) -> Result<bool> {
        let transaction_open = self
            .transactions
            .transaction_open()
            .context("transaction source query failed")?;
        let flags = derive_flags(&self.snapshot(transaction_open));

        let decision = evaluate_lockup_cashout(
            self.strategy,
            is_locked_up,
            is_allowed_to_cashout,
            &flags,
            transaction_open,
        );

        if decision.force_cashout {
            if let Some(cb) = force_cashout {
                info!(strategy = self.strategy.as_str(), "forcing cash-out");
                cb();
            }
        }

        debug!(
            strategy = self.strategy.as_str(),
            is_locked_up,
            is_allowed_to_cashout,
            permitted = decision.permitted,
            reason = ?decision.reason,
            "lockup cash-out evaluated"
        );
        Ok(decision.is_permitted())
    }

    /// Consistent per-tracker snapshot. Each `borrow()` yields the tracker
    /// state as of its last fully applied event.
    fn snapshot(&self, transaction_open: bool) -> GateInput {
        GateInput::from_trackers(
            &self.disable.borrow(),
            &self.exempt,
            &self.round.borrow(),
            &self.overlay.borrow(),
            transaction_open,
        )
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Constructor injection for [`CreditGate`].
///
/// Every collaborator is required; a missing one fails `build()` with a
/// deterministic code. The engine never runs partially wired.
#[derive(Default)]
pub struct CreditGateBuilder {
    disable: Option<watch::Receiver<DisableSignals>>,
    round: Option<watch::Receiver<RoundPhaseTracker>>,
    overlay: Option<watch::Receiver<OverlayTracker>>,
    transactions: Option<Arc<dyn TransactionSource>>,
    config: Option<GateConfig>,
}

impl CreditGateBuilder {
    pub fn disable_feed(mut self, cell: watch::Receiver<DisableSignals>) -> Self {
        self.disable = Some(cell);
        self
    }

    pub fn round_feed(mut self, cell: watch::Receiver<RoundPhaseTracker>) -> Self {
        self.round = Some(cell);
        self
    }

    pub fn overlay_feed(mut self, cell: watch::Receiver<OverlayTracker>) -> Self {
        self.overlay = Some(cell);
        self
    }

    pub fn transaction_source(mut self, src: Arc<dyn TransactionSource>) -> Self {
        self.transactions = Some(src);
        self
    }

    /// Jurisdiction configuration (lockup strategy + exemption set), read
    /// once here and immutable for the gate's lifetime.
    pub fn gate_config(mut self, cfg: GateConfig) -> Self {
        self.config = Some(cfg);
        self
    }

    pub fn build(self) -> Result<CreditGate> {
        let Some(disable) = self.disable else {
            bail!("GATE_WIRING_MISSING_DISABLE_FEED");
        };
        let Some(round) = self.round else {
            bail!("GATE_WIRING_MISSING_ROUND_FEED");
        };
        let Some(overlay) = self.overlay else {
            bail!("GATE_WIRING_MISSING_OVERLAY_FEED");
        };
        let Some(transactions) = self.transactions else {
            bail!("GATE_WIRING_MISSING_TRANSACTION_SOURCE");
        };
        let Some(config) = self.config else {
            bail!("GATE_WIRING_MISSING_GATE_CONFIG");
        };

        info!(
            strategy = config.lockup_strategy.as_str(),
            exemptions = config.exempt_faults.len(),
            "credit gate wired"
        );

        Ok(CreditGate {
            disable,
            round,
            overlay,
            transactions,
            exempt: config.exempt_faults,
            strategy: config.lockup_strategy,
        })
    }
}
