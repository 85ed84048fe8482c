//! Watchdog-survivable retained state and reset-cause decode
//!
//! A watchdog reset reboots the chip but leaves SRAM alone, so the two
//! bytes of pacing state live in a magic-tagged block the linker never
//! initializes. A true power-on finds garbage there and the magic/check
//! pair rejects it.

use core::mem::MaybeUninit;
use core::ptr::addr_of_mut;

use embassy_rp::pac;

use placard_core::retained::{ResetCause, RetainedState, RetainedStore};

/// "PLCD": marks the block as written by this firmware
const MAGIC: u32 = 0x504C_4344;

#[repr(C)]
struct RetainedBlock {
    magic: u32,
    backoff_exponent: u8,
    last_sequence: u8,
    check: u8,
    _reserved: u8,
}

// The linker must never zero or copy-initialize this block, hence .uninit
#[link_section = ".uninit.RETAINED"]
static mut RETAINED: MaybeUninit<RetainedBlock> = MaybeUninit::uninit();

fn check_byte(state: &RetainedState) -> u8 {
    state.backoff_exponent ^ state.last_sequence ^ 0xA5
}

/// Handle to the retained RAM block
pub struct RamRetained {
    block: &'static mut MaybeUninit<RetainedBlock>,
}

impl RamRetained {
    /// Called exactly once, from `main`, before interrupts exist; nothing
    /// else ever touches the block.
    pub fn take() -> Self {
        #[allow(static_mut_refs)]
        Self {
            block: unsafe { &mut *addr_of_mut!(RETAINED) },
        }
    }
}

impl RetainedStore for RamRetained {
    fn load(&mut self) -> Option<RetainedState> {
        // Every field is a plain integer, so reading a never-written block
        // yields junk bytes, not UB in practice; the magic and check byte
        // reject them.
        let block = unsafe { self.block.assume_init_ref() };
        if block.magic != MAGIC {
            return None;
        }
        let state = RetainedState {
            backoff_exponent: block.backoff_exponent,
            last_sequence: block.last_sequence,
        };
        (block.check == check_byte(&state)).then_some(state)
    }

    fn save(&mut self, state: &RetainedState) {
        self.block.write(RetainedBlock {
            magic: MAGIC,
            backoff_exponent: state.backoff_exponent,
            last_sequence: state.last_sequence,
            check: check_byte(state),
            _reserved: 0,
        });
    }
}

/// Decode why this boot happened
///
/// The watchdog reason register survives until software clears it; the
/// chip-reset register tells the RUN pin apart from a true power-on.
pub fn reset_cause() -> ResetCause {
    let watchdog = pac::WATCHDOG.reason().read();
    if watchdog.timer() || watchdog.force() {
        return ResetCause::Watchdog;
    }

    let chip = pac::VREG_AND_CHIP_RESET.chip_reset().read();
    if chip.had_run() {
        ResetCause::ButtonReset
    } else {
        ResetCause::PowerOn
    }
}
