//! Board wiring.
//!
//! SparkFun Pro Micro RP2040, wired to the Spectrum's edge connector (through level shifting):
//!
//! | GPIO    | Signal                         |
//! |---------|--------------------------------|
//! | 0, 1    | UART0 from the USB host bridge |
//! | 2..=9   | A8..A15, the row selects       |
//! | 20      | M1                             |
//! | 21      | KD4                            |
//! | 22      | RESET, active low              |
//! | 23      | NMI (magic button), active low |
//! | 25      | WS2812 status LED              |
//! | 26..=29 | KD0..KD3                       |
//!
//! The row selects are all on consecutive pins, so one read of the input register gets them
//! all.

use bsp::hal::gpio::{DynPinId, FunctionSioInput, FunctionSioOutput, Interrupt, Pin, PullDown, PullUp};
use bsp::hal::{pac, Sio};
use sparkfun_pro_micro_rp2040 as bsp;
use zx_keyboard::bus::{AddressBus, DataBus, DataPins};
use zx_keyboard::magic::CycleDelay;

pub type InPin = Pin<DynPinId, FunctionSioInput, PullUp>;
pub type OutPin = Pin<DynPinId, FunctionSioOutput, PullDown>;

/// GPIO number of A8.  A9 to A15 follow.
pub const ADDRESS_SHIFT: u32 = 2;

/// KD0..KD3 are GPIO 26..29, KD4 is GPIO 21.
pub const DATA_PINS: DataPins = DataPins {
    low_shift: 26,
    high_pin: 21,
};

macro_rules! address_pins {
    ($pins:expr) => {
        [
            $pins.gpio2.into_pull_up_input().into_dyn_pin(),
            $pins.gpio3.into_pull_up_input().into_dyn_pin(),
            $pins.gpio4.into_pull_up_input().into_dyn_pin(),
            $pins.gpio5.into_pull_up_input().into_dyn_pin(),
            $pins.gpio6.into_pull_up_input().into_dyn_pin(),
            $pins.gpio7.into_pull_up_input().into_dyn_pin(),
            $pins.gpio8.into_pull_up_input().into_dyn_pin(),
            $pins.gpio9.into_pull_up_input().into_dyn_pin(),
        ]
    };
}
pub(crate) use address_pins;

/// Data pins start out high: nothing pressed.
macro_rules! data_pins {
    ($pins:expr) => {
        [
            $pins.gpio26.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            $pins.gpio27.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            $pins.gpio28.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            $pins.gpio29.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            $pins.gpio21.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
        ]
    };
}
pub(crate) use data_pins;

/// The row select lines, A8..A15.
pub struct AddressLines {
    pins: [InPin; 8],
}

impl AddressLines {
    /// Take the pins, and interrupt on every edge of every one of them.
    pub fn new(mut pins: [InPin; 8]) -> Self {
        for pin in &mut pins {
            pin.set_interrupt_enabled(Interrupt::EdgeLow, true);
            pin.set_interrupt_enabled(Interrupt::EdgeHigh, true);
        }
        AddressLines { pins }
    }
}

impl AddressBus for AddressLines {
    #[inline(always)]
    fn sample(&mut self) -> u8 {
        // Selected rows are low.
        !((Sio::read_bank0() >> ADDRESS_SHIFT) as u8)
    }

    #[inline(always)]
    fn acknowledge(&mut self) {
        for pin in &mut self.pins {
            pin.clear_interrupt(Interrupt::EdgeLow);
            pin.clear_interrupt(Interrupt::EdgeHigh);
        }
    }
}

/// The key data lines, KD0..KD4.
pub struct DataLines {
    _pins: [OutPin; 5],
}

impl DataLines {
    pub fn new(pins: [OutPin; 5]) -> Self {
        DataLines { _pins: pins }
    }
}

impl DataBus for DataLines {
    #[inline(always)]
    fn write(&mut self, value: u8) {
        // SAFETY: Only the data pins are flipped, and they belong to us.  Nothing else writes
        // them, so the output read can't go stale before the flip.
        unsafe {
            let sio = &*pac::SIO::ptr();
            let current = sio.gpio_out.read().bits();
            sio.gpio_out_xor.write(|w| w.bits(DATA_PINS.toggle(current, value)));
        }
    }
}

/// Cycle counted delay for the magic button.
pub struct AsmDelay;

impl CycleDelay for AsmDelay {
    fn delay_cycles(&mut self, cycles: u32) {
        cortex_m::asm::delay(cycles);
    }
}
