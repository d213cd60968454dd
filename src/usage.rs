//! USB HID keyboard usage codes
//!
//! Only the codes this crate refers to by name are here.  The full set is in the HID Usage
//! Tables, section 10 (Keyboard/Keypad page).

use bitflags::bitflags;

/// Codes below this are "no event" and error indications, not keys.
pub const KEY_A: u8 = 0x04;
pub const KEY_H: u8 = 0x0b;
pub const KEY_Q: u8 = 0x14;
pub const KEY_Z: u8 = 0x1d;
pub const KEY_1: u8 = 0x1e;
pub const KEY_0: u8 = 0x27;
pub const KEY_ENTER: u8 = 0x28;
pub const KEY_ESCAPE: u8 = 0x29;
pub const KEY_BACKSPACE: u8 = 0x2a;
pub const KEY_TAB: u8 = 0x2b;
pub const KEY_SPACE: u8 = 0x2c;
pub const KEY_SEMICOLON: u8 = 0x33;
pub const KEY_CAPS_LOCK: u8 = 0x39;
pub const KEY_F1: u8 = 0x3a;
pub const KEY_F4: u8 = 0x3d;
pub const KEY_F5: u8 = 0x3e;
pub const KEY_F6: u8 = 0x3f;
pub const KEY_F10: u8 = 0x43;
pub const KEY_F12: u8 = 0x45;
pub const KEY_RIGHT: u8 = 0x4f;
pub const KEY_LEFT: u8 = 0x50;
pub const KEY_DOWN: u8 = 0x51;
pub const KEY_UP: u8 = 0x52;
pub const KEY_KEYPAD_1: u8 = 0x59;
pub const KEY_KEYPAD_0: u8 = 0x62;
pub const KEY_NON_US_BACKSLASH: u8 = 0x64;

/// The modifier keys have usage codes too, starting here, in the same order as the bits of
/// [`Modifiers`].
pub const KEY_LEFT_CONTROL: u8 = 0xe0;
pub const KEY_RIGHT_GUI: u8 = 0xe7;

bitflags! {
    /// The modifier byte at the start of a boot protocol keyboard report.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct Modifiers: u8 {
        const LEFT_CONTROL = 0b0000_0001;
        const LEFT_SHIFT = 0b0000_0010;
        const LEFT_ALT = 0b0000_0100;
        const LEFT_GUI = 0b0000_1000;
        const RIGHT_CONTROL = 0b0001_0000;
        const RIGHT_SHIFT = 0b0010_0000;
        const RIGHT_ALT = 0b0100_0000;
        const RIGHT_GUI = 0b1000_0000;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Modifiers {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Modifiers({=u8:#x})", self.bits())
    }
}

