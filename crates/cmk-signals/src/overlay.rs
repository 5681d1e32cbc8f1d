use serde::{Deserialize, Serialize};

/// Operator overlay menu enter/exit notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayEvent {
    Entered,
    Exited,
}

/// Tracks whether the operator overlay menu is open.
///
/// Events strictly alternate in well-formed operation, but the tracker does
/// not validate ordering — it simply records the last event, so applying the
/// same event twice is a no-op in effect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayTracker {
    entered: bool,
}

impl OverlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, ev: OverlayEvent) {
        self.entered = matches!(ev, OverlayEvent::Entered);
    }

    pub fn overlay_active(&self) -> bool {
        self.entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_exit_are_idempotent() {
        let mut st = OverlayTracker::new();

        // Exit without a prior enter stays false.
        st.apply(OverlayEvent::Exited);
        assert!(!st.overlay_active());

        st.apply(OverlayEvent::Entered);
        st.apply(OverlayEvent::Entered);
        assert!(st.overlay_active());

        st.apply(OverlayEvent::Exited);
        st.apply(OverlayEvent::Exited);
        assert!(!st.overlay_active());
    }
}
