//! Keyboard reports.

use arrayvec::ArrayVec;

use crate::usage::{Modifiers, KEY_A};

/// Number of keys in a boot protocol report.
pub const REPORT_KEYS: usize = 6;

/// Size of a boot protocol report on the wire.
pub const REPORT_SIZE: usize = 2 + REPORT_KEYS;

/// A boot protocol keyboard report: the modifiers, and up to six other keys.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyReport {
    pub modifiers: Modifiers,
    pub keys: [u8; REPORT_KEYS],
}

impl KeyReport {
    pub fn new(modifiers: Modifiers, keys: &[u8]) -> KeyReport {
        let mut report = KeyReport {
            modifiers,
            keys: [0; REPORT_KEYS],
        };
        for (slot, &key) in report.keys.iter_mut().zip(keys) {
            *slot = key;
        }
        report
    }

    /// Decode the 8 bytes of a report: modifiers, a reserved byte, then the keys.
    pub fn from_bytes(data: &[u8; REPORT_SIZE]) -> KeyReport {
        let mut keys = [0; REPORT_KEYS];
        keys.copy_from_slice(&data[2..]);
        KeyReport {
            modifiers: Modifiers::from_bits_retain(data[0]),
            keys,
        }
    }

    /// The keys actually down, in report order, without repeats.  Codes below 4 are "no event"
    /// or rollover errors, and are left out.
    pub fn pressed(&self) -> ArrayVec<u8, REPORT_KEYS> {
        let mut pressed = ArrayVec::new();
        for &key in &self.keys {
            if key >= KEY_A && !pressed.contains(&key) {
                pressed.push(key);
            }
        }
        pressed
    }
}

/// Somewhere keyboard reports come from.
pub trait KeyReportSource {
    /// The next report, if there is a new one.  `None` when nothing has changed, or there is no
    /// keyboard attached.
    fn poll(&mut self) -> Option<KeyReport>;
}
