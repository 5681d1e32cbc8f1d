use serde::{Deserialize, Serialize};

use crate::{DisableReason, ExemptFaults, Immediacy};

/// Full replacement of the disable state, as reported by the host disable
/// manager on every reason-set change. Last write wins; per-reason deltas are
/// intentionally not modeled (no ordering hazards).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisableEvent {
    pub disabled: bool,
    pub reasons: Vec<DisableReason>,
}

impl DisableEvent {
    /// System fully enabled; no reasons active.
    pub fn enabled() -> Self {
        Self {
            disabled: false,
            reasons: Vec::new(),
        }
    }

    /// System disabled by the given reason set.
    pub fn disabled_by(reasons: Vec<DisableReason>) -> Self {
        Self {
            disabled: true,
            reasons,
        }
    }
}

/// Current set of active host disable reasons plus the global disabled flag.
///
/// Mutated only by [`DisableEvent`]s from the disable channel; read-only to
/// the gate. Absence of data means "not disabled".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisableSignals {
    disabled: bool,
    active: Vec<DisableReason>,
}

impl DisableSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a disable-channel event (full state replacement).
    pub fn apply(&mut self, ev: DisableEvent) {
        self.disabled = ev.disabled;
        self.active = ev.reasons;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn active_reasons(&self) -> &[DisableReason] {
        &self.active
    }

    /// True iff at least one active reason is `Immediate` and not in the
    /// exemption set. O(k) over the small active-reason set.
    ///
    /// This is the cash-out side of the on/off asymmetry: an exempt fault
    /// still raises the tilt flag (via [`DisableSignals::is_disabled`]) but
    /// must never block cash-out.
    pub fn has_blocking_immediate(&self, exempt: &ExemptFaults) -> bool {
        self.active
            .iter()
            .any(|r| r.immediacy == Immediacy::Immediate && !exempt.contains(&r.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tracker_reports_not_disabled() {
        let st = DisableSignals::new();
        assert!(!st.is_disabled());
        assert!(!st.has_blocking_immediate(&ExemptFaults::standard()));
    }

    #[test]
    fn reason_set_is_replaced_not_merged() {
        let mut st = DisableSignals::new();
        st.apply(DisableEvent::disabled_by(vec![DisableReason::immediate(
            "DOOR_OPEN",
        )]));
        st.apply(DisableEvent::disabled_by(vec![DisableReason::deferred(
            "PRINTER_LOW",
        )]));

        assert_eq!(st.active_reasons().len(), 1);
        assert_eq!(st.active_reasons()[0].key.as_str(), "PRINTER_LOW");
        assert!(!st.has_blocking_immediate(&ExemptFaults::standard()));
    }

    #[test]
    fn enabled_event_clears_everything() {
        let mut st = DisableSignals::new();
        st.apply(DisableEvent::disabled_by(vec![DisableReason::immediate(
            "DOOR_OPEN",
        )]));
        st.apply(DisableEvent::enabled());

        assert!(!st.is_disabled());
        assert!(st.active_reasons().is_empty());
    }

    #[test]
    fn exempt_immediate_reason_is_not_blocking() {
        let mut st = DisableSignals::new();
        st.apply(DisableEvent::disabled_by(vec![DisableReason::immediate(
            ExemptFaults::HOPPER_HOMING,
        )]));

        assert!(st.is_disabled());
        assert!(!st.has_blocking_immediate(&ExemptFaults::standard()));
        // Same reason with an empty exemption set DOES block.
        assert!(st.has_blocking_immediate(&ExemptFaults::default()));
    }
}
