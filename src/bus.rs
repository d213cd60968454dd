//! Answering the ULA.
//!
//! Whenever the address lines change, the interrupt handler samples which rows are selected,
//! and puts the matching precomputed response on the data lines.  This runs at the highest
//! priority in the system, and has a budget of tens of nanoseconds, so it does nothing else: no
//! loops, no logging, nothing that can fail.

use crate::response::Reader;

/// The row select lines.
pub trait AddressBus {
    /// Which rows are selected, bit `r` set for row `r`.  Implementations take care of the
    /// lines themselves being active low.
    fn sample(&mut self) -> u8;

    /// Clear whatever condition triggered the interrupt.
    fn acknowledge(&mut self);
}

/// The key data lines.
pub trait DataBus {
    /// Drive the lines.  Bit `c` is key line `c`, already active low.
    fn write(&mut self, value: u8);
}

/// Where the five key lines sit in a GPIO output word: KD0 to KD3 on consecutive pins from
/// `low_shift`, and KD4 on a pin of its own.
#[derive(Clone, Copy, Debug)]
pub struct DataPins {
    pub low_shift: u32,
    pub high_pin: u32,
}

impl DataPins {
    pub const fn mask(self) -> u32 {
        (0x0f << self.low_shift) | (1 << self.high_pin)
    }

    /// The output bits that are high for a response.
    #[inline(always)]
    pub const fn bits(self, value: u8) -> u32 {
        let low = (value & 0x0f) as u32;
        let high = ((value >> 4) & 1) as u32;
        (low << self.low_shift) | (high << self.high_pin)
    }

    /// The bits to flip in `current` so the key lines show `value`.  Only key lines are ever
    /// flipped, so all five change in a single store to an XOR register.
    #[inline(always)]
    pub const fn toggle(self, current: u32, value: u8) -> u32 {
        (current ^ self.bits(value)) & self.mask()
    }
}

/// Everything the bus interrupt needs.
pub struct BusResponder<'a, A, D> {
    reader: Reader<'a>,
    address: A,
    data: D,
}

impl<'a, A: AddressBus, D: DataBus> BusResponder<'a, A, D> {
    pub fn new(reader: Reader<'a>, address: A, data: D) -> Self {
        BusResponder {
            reader,
            address,
            data,
        }
    }

    /// Handle one address change.
    #[inline(always)]
    pub fn respond(&mut self) {
        let select = self.address.sample();
        self.data.write(self.reader.response(select));
        self.address.acknowledge();
    }
}
