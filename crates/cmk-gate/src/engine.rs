use crate::{GateInput, TransferFlags};

/// Derive the four transfer permissions from a gate snapshot.
///
/// Pure and stateless; the same input always produces the same flags.
///
/// The on/off asymmetry is the central invariant of this engine: cash-out
/// halts under any condition that could corrupt a balance-in-flight (open
/// transaction, active round) or that reflects an unexempted immediate
/// fault, while cash-in additionally halts for the overlay and for EVERY
/// disable condition (tilt). An exempt fault therefore raises the tilt flag
/// but never blocks cash-out — a homing or authentication fault must not
/// trap a player's money on the machine.
pub fn derive_flags(inp: &GateInput) -> TransferFlags {
    // 1) Cash-out: transaction mid-flight, round in progress, or an
    //    unexempted immediate fault.
    let transfer_off_disabled =
        inp.transaction_open || inp.in_active_round || (inp.disabled && inp.blocking_immediate_fault);

    // 2) Cash-in is narrower per condition but broader overall: any disable
    //    reason tilts it, exempt or not.
    TransferFlags {
        transfer_off_disabled,
        transfer_on_disabled_in_game: inp.in_active_round,
        transfer_on_disabled_tilt: inp.disabled,
        transfer_on_disabled_overlay: inp.overlay_active,
    }
}
