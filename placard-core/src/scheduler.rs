//! Sleep-spec scheduler
//!
//! Turns a server-supplied [`SleepSpec`] into hardware sleeps. The only
//! interesting part is bridging the timer's two-stage prescaler: neither
//! stage can cover the full exponent range on its own, so the exponent is
//! split across them.

use placard_protocol::SleepSpec;

use crate::traits::{SleepStages, SleepTimer};

/// Exponent span covered by the primary prescaler at its maximum ratio
pub const PRIMARY_STAGE_SPAN: u8 = 7;

/// Largest exponent the secondary prescaler can carry
pub const SECONDARY_STAGE_MAX: u8 = 11;

/// Decompose a sleep exponent into the two prescaler stages
///
/// Exponents above the protocol ceiling clamp to it; the ceiling (18) is
/// exactly what the two stages can express together (7 + 11).
pub fn split_exponent(exponent: u8) -> SleepStages {
    let exponent = exponent.min(PRIMARY_STAGE_SPAN + SECONDARY_STAGE_MAX);
    if exponent > PRIMARY_STAGE_SPAN {
        SleepStages {
            primary_max: true,
            secondary: exponent - PRIMARY_STAGE_SPAN,
        }
    } else {
        SleepStages {
            primary_max: false,
            secondary: exponent,
        }
    }
}

/// Execute a sleep spec: configure the stages once, then chain the units
///
/// Each unit may end early on an external signal; the loop carries on
/// regardless, so a burst of button presses just burns through the
/// remaining units faster.
pub fn run<T: SleepTimer>(timer: &mut T, spec: SleepSpec) {
    let spec = spec.clamped();
    timer.configure(split_exponent(spec.exponent));
    for _ in 0..spec.count {
        timer.sleep_one_unit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingTimer;
    use placard_protocol::MAX_SLEEP_EXPONENT;
    use proptest::prelude::*;

    #[test]
    fn small_exponents_bypass_the_primary_stage() {
        assert_eq!(
            split_exponent(0),
            SleepStages {
                primary_max: false,
                secondary: 0
            }
        );
        assert_eq!(
            split_exponent(7),
            SleepStages {
                primary_max: false,
                secondary: 7
            }
        );
    }

    #[test]
    fn large_exponents_run_the_primary_stage_flat_out() {
        assert_eq!(
            split_exponent(8),
            SleepStages {
                primary_max: true,
                secondary: 1
            }
        );
        assert_eq!(
            split_exponent(18),
            SleepStages {
                primary_max: true,
                secondary: 11
            }
        );
    }

    #[test]
    fn ceiling_and_beyond_are_identical() {
        let mut at_ceiling = RecordingTimer::new();
        run(&mut at_ceiling, SleepSpec::new(4, MAX_SLEEP_EXPONENT));

        let mut beyond = RecordingTimer::new();
        run(&mut beyond, SleepSpec::new(4, 255));

        assert_eq!(at_ceiling.configured, beyond.configured);
        assert_eq!(at_ceiling.units_slept, beyond.units_slept);
    }

    #[test]
    fn sleeps_exactly_count_units() {
        let mut timer = RecordingTimer::new();
        run(&mut timer, SleepSpec::new(5, 3));
        assert_eq!(timer.units_slept, 5);
        assert_eq!(
            timer.configured,
            Some(SleepStages {
                primary_max: false,
                secondary: 3
            })
        );
    }

    #[test]
    fn zero_count_configures_but_never_sleeps() {
        let mut timer = RecordingTimer::new();
        run(&mut timer, SleepSpec::new(0, 9));
        assert_eq!(timer.units_slept, 0);
        assert!(timer.configured.is_some());
    }

    proptest! {
        #[test]
        fn stages_always_recombine_to_the_clamped_exponent(exponent in any::<u8>()) {
            let stages = split_exponent(exponent);
            prop_assert!(stages.secondary <= SECONDARY_STAGE_MAX);
            let recombined = stages.secondary
                + if stages.primary_max { PRIMARY_STAGE_SPAN } else { 0 };
            prop_assert_eq!(recombined, exponent.min(MAX_SLEEP_EXPONENT));
        }
    }
}
