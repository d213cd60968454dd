//! The magic button.
//!
//! Interfaces like the Multiface hang a button on the Z80's NMI line.  Pressing it has to line up
//! with the host's instruction fetches, so the press starts right after the end of an M1 cycle,
//! and lasts a fixed number of our own processor cycles rather than any wall clock time.
//!
//! While this happens nothing else may run, the bus interrupt included, so the whole press is
//! done inside a critical section.  If the host never toggles M1 this never returns.  The host
//! always does while it is running.

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::infallible;

/// How long the button is held, in processor cycles.
pub const MAGIC_HOLD_CYCLES: u32 = 24;

/// Burn a number of processor cycles.
///
/// The press length is calibrated against our own clock, so this sits behind a trait that each
/// target can implement with its own cycle counting delay.
pub trait CycleDelay {
    fn delay_cycles(&mut self, cycles: u32);
}

/// A portable [`CycleDelay`], counting spin loop hints.  Each iteration is at least one cycle.
#[derive(Clone, Copy, Default)]
pub struct SpinDelay;

impl CycleDelay for SpinDelay {
    fn delay_cycles(&mut self, cycles: u32) {
        for _ in 0..cycles {
            core::hint::spin_loop();
        }
    }
}

/// Steps of a single press.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    /// Waiting for M1 to go high.
    WaitHigh,
    /// Waiting for M1 to drop, which is the end of the fetch.
    WaitLow,
    /// Press the button.
    Assert,
    /// Keep it pressed.
    Hold,
    /// Let it go.
    Release,
}

/// The magic button, and what it needs to be pressed at the right time.
///
/// `strobe` is the host's M1 line.  `button` is active low: driven low is pressed.
pub struct MagicButton<S, B, D> {
    strobe: S,
    button: B,
    delay: D,
    hold: u32,
}

impl<S, B, D> MagicButton<S, B, D>
where
    S: InputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
    D: CycleDelay,
{
    /// Create the button, and make sure it starts out released.
    pub fn new(strobe: S, mut button: B, delay: D) -> Self {
        infallible(button.set_high());
        MagicButton {
            strobe,
            button,
            delay,
            hold: MAGIC_HOLD_CYCLES,
        }
    }

    /// Change how many cycles the button is held for.
    pub fn with_hold(mut self, cycles: u32) -> Self {
        self.hold = cycles;
        self
    }

    /// Do a single press.  Blocks everything else until it is done.
    pub fn press(&mut self) {
        critical_section::with(|_| {
            let mut phase = Phase::WaitHigh;
            while phase != Phase::Idle {
                phase = self.step(phase);
            }
        });
    }

    /// Advance the press by one step.
    fn step(&mut self, phase: Phase) -> Phase {
        match phase {
            Phase::Idle => Phase::Idle,
            Phase::WaitHigh => {
                if infallible(self.strobe.is_high()) {
                    Phase::WaitLow
                } else {
                    Phase::WaitHigh
                }
            }
            Phase::WaitLow => {
                if infallible(self.strobe.is_low()) {
                    Phase::Assert
                } else {
                    Phase::WaitLow
                }
            }
            Phase::Assert => {
                infallible(self.button.set_low());
                Phase::Hold
            }
            Phase::Hold => {
                self.delay.delay_cycles(self.hold);
                Phase::Release
            }
            Phase::Release => {
                infallible(self.button.set_high());
                Phase::Idle
            }
        }
    }
}
