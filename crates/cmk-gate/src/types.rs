use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cmk_signals::{DisableSignals, ExemptFaults, OverlayTracker, RoundPhaseTracker};

/// Point-in-time snapshot of everything the gate evaluates.
///
/// The caller assembles this from consistent per-tracker reads plus a live
/// transaction query; [`crate::derive_flags`] is then a pure function of it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GateInput {
    /// Global host disabled flag.
    pub disabled: bool,
    /// At least one active reason is `Immediate` and not exempt.
    pub blocking_immediate_fault: bool,
    /// Round phase is `ActiveRound` (not `Idle`, not `PresentationIdle`).
    pub in_active_round: bool,
    /// A financial transaction is currently open (live query, never cached).
    pub transaction_open: bool,
    /// Operator overlay menu is open.
    pub overlay_active: bool,
}

impl GateInput {
    /// Assemble an input from tracker reads and a live transaction answer.
    pub fn from_trackers(
        disable: &DisableSignals,
        exempt: &ExemptFaults,
        round: &RoundPhaseTracker,
        overlay: &OverlayTracker,
        transaction_open: bool,
    ) -> Self {
        Self {
            disabled: disable.is_disabled(),
            blocking_immediate_fault: disable.has_blocking_immediate(exempt),
            in_active_round: round.in_active_round(),
            transaction_open,
            overlay_active: overlay.overlay_active(),
        }
    }
}

/// The four derived transfer permissions. Recomputed on every read, never
/// persisted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFlags {
    /// Cash-out blocked: open transaction, active round, or an unexempted
    /// immediate fault.
    pub transfer_off_disabled: bool,
    /// Cash-in blocked by an in-progress round.
    pub transfer_on_disabled_in_game: bool,
    /// Cash-in blocked by any host disable condition (tilt).
    pub transfer_on_disabled_tilt: bool,
    /// Cash-in blocked while the operator overlay is open.
    pub transfer_on_disabled_overlay: bool,
}

impl TransferFlags {
    /// `true` when credits may move off the meter.
    pub fn permits_transfer_off(&self) -> bool {
        !self.transfer_off_disabled
    }

    /// `true` when credits may move onto the meter.
    pub fn permits_transfer_on(&self) -> bool {
        !self.transfer_on_disabled_in_game
            && !self.transfer_on_disabled_tilt
            && !self.transfer_on_disabled_overlay
    }
}

/// Jurisdiction-configured lockup cash-out strategy. Immutable for the
/// process lifetime (read from configuration at construction).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockupStrategy {
    /// Cash-out during lockup is never permitted.
    NotAllowed,
    /// Cash-out is never permitted synchronously; a forced cash-out is
    /// scheduled as a side effect instead.
    ForceCashout,
    /// Cash-out is permitted when the device is locked up and nothing else
    /// blocks it.
    Allowed,
}

impl LockupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockupStrategy::NotAllowed => "NOT_ALLOWED",
            LockupStrategy::ForceCashout => "FORCE_CASHOUT",
            LockupStrategy::Allowed => "ALLOWED",
        }
    }
}

/// Reasons for lockup cash-out decisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LockupReason {
    Permitted,

    // Strategy verdicts
    StrategyNotAllowed,
    StrategyForceCashout,

    // Allowed-strategy preconditions
    NotLockedUp,
    CashoutNotAllowed,
    TransferOffDisabled,
    TransactionOpen,
}

/// Outcome of one lockup cash-out evaluation.
///
/// `force_cashout` is a prescribed side effect, not a synchronous result:
/// the caller invokes its forced-cash-out collaborator at most once and does
/// not observe the outcome (fire-and-forget).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LockupCashoutDecision {
    pub permitted: bool,
    pub force_cashout: bool,
    pub reason: LockupReason,
}

impl LockupCashoutDecision {
    /// `true` when the caller may proceed with a synchronous cash-out.
    pub fn is_permitted(&self) -> bool {
        self.permitted
    }
}

/// Live transaction query seam (e.g. the bank/transaction coordinator).
///
/// Intentionally a live read, not a cached flag: transaction lifetimes are
/// short and must never be stale. Source failures propagate to the caller
/// unmasked — silently defaulting to "safe" here would itself be an unsafe
/// assumption about permission state.
pub trait TransactionSource: Send + Sync {
    /// Identifier of the currently open transaction, if any.
    fn current_transaction_id(&self) -> Result<Option<Uuid>>;

    /// `true` iff a transfer is mid-flight and no new transfer may start.
    fn transaction_open(&self) -> Result<bool> {
        Ok(self.current_transaction_id()?.is_some())
    }
}
