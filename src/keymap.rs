//! USB usage codes to Spectrum keys
//!
//! The PC keyboard has far more keys than the Spectrum, so most of the extras are mapped to the
//! shifted Spectrum key that does the same job: cursor keys become CAPS SHIFT 5-8, backspace is
//! DELETE, and the punctuation keys become their SYMBOL SHIFT equivalents.  The numeric keypad
//! mirrors the main digit row.
//!
//! A few function keys drive the reserved positions:
//!
//! - F5: cursor keys are cursor keys (the default).
//! - F6: cursor keys are a Sinclair joystick.
//! - F10: the magic button.
//! - F12: reset.

use crate::keys::*;
use crate::usage::{KEY_LEFT_CONTROL, KEY_RIGHT_GUI};

const NONE: MatrixKey = MatrixKey::NONE;

/// The modifiers, in usage code (and modifier bit) order.
static MODIFIER_TABLE: [MatrixKey; 8] = [
    ZX_SYM,      // 0xe0, Left control
    ZX_CAPS,     // 0xe1, Left shift
    ZX_EXT_MODE, // 0xe2, Left alt
    ZX_0,        // 0xe3, Left GUI
    ZX_CAPS,     // 0xe4, Right control
    ZX_SYM,      // 0xe5, Right shift
    ZX_EXT_MODE, // 0xe6, Right alt
    ZX_0,        // 0xe7, Right GUI
];

static KEY_TABLE: [MatrixKey; 0x66] = [
    NONE,            // 0x00, No event
    NONE,            // 0x01, Error roll over
    NONE,            // 0x02, POST fail
    NONE,            // 0x03, Error undefined
    ZX_A,            // 0x04, a
    ZX_B,            // 0x05, b
    ZX_C,            // 0x06, c
    ZX_D,            // 0x07, d
    ZX_E,            // 0x08, e
    ZX_F,            // 0x09, f
    ZX_G,            // 0x0a, g
    ZX_H,            // 0x0b, h
    ZX_I,            // 0x0c, i
    ZX_J,            // 0x0d, j
    ZX_K,            // 0x0e, k
    ZX_L,            // 0x0f, l
    ZX_M,            // 0x10, m
    ZX_N,            // 0x11, n
    ZX_O,            // 0x12, o
    ZX_P,            // 0x13, p
    ZX_Q,            // 0x14, q
    ZX_R,            // 0x15, r
    ZX_S,            // 0x16, s
    ZX_T,            // 0x17, t
    ZX_U,            // 0x18, u
    ZX_V,            // 0x19, v
    ZX_W,            // 0x1a, w
    ZX_X,            // 0x1b, x
    ZX_Y,            // 0x1c, y
    ZX_Z,            // 0x1d, z
    ZX_1,            // 0x1e, 1
    ZX_2,            // 0x1f, 2
    ZX_3,            // 0x20, 3
    ZX_4,            // 0x21, 4
    ZX_5,            // 0x22, 5
    ZX_6,            // 0x23, 6
    ZX_7,            // 0x24, 7
    ZX_8,            // 0x25, 8
    ZX_9,            // 0x26, 9
    ZX_0,            // 0x27, 0
    ZX_ENTER,        // 0x28, Enter
    ZX_BREAK,        // 0x29, Escape
    ZX_DELETE,       // 0x2a, Backspace
    ZX_EDIT,         // 0x2b, Tab
    ZX_SPACE,        // 0x2c, Space
    ZX_MINUS,        // 0x2d, -
    ZX_EQUAL,        // 0x2e, =
    ZX_OPEN,         // 0x2f, [
    ZX_CLOSE,        // 0x30, ]
    ZX_COLON,        // 0x31, \
    NONE,            // 0x32, Non-US #
    ZX_SEMICOLON,    // 0x33, ;
    ZX_QUOTE,        // 0x34, '
    ZX_GRAVE,        // 0x35, `
    ZX_COMMA,        // 0x36, ,
    ZX_DOT,          // 0x37, .
    ZX_SLASH,        // 0x38, /
    ZX_CAPS_LOCK,    // 0x39, Caps lock
    ZX_TRUE_VIDEO,   // 0x3a, F1
    ZX_INV_VIDEO,    // 0x3b, F2
    ZX_GRAPH,        // 0x3c, F3
    NONE,            // 0x3d, F4
    ZX_CURSOR_MODE,  // 0x3e, F5
    ZX_JOYSTICK_MODE, // 0x3f, F6
    NONE,            // 0x40, F7
    NONE,            // 0x41, F8
    NONE,            // 0x42, F9
    ZX_MAGIC,        // 0x43, F10
    NONE,            // 0x44, F11
    ZX_RESET,        // 0x45, F12
    ZX_PLUS,         // 0x46, Print screen
    NONE,            // 0x47, Scroll lock
    ZX_PLUS,         // 0x48, Pause
    NONE,            // 0x49, Insert
    NONE,            // 0x4a, Home
    NONE,            // 0x4b, Page up
    ZX_DELETE,       // 0x4c, Delete
    NONE,            // 0x4d, End
    NONE,            // 0x4e, Page down
    ZX_RIGHT,        // 0x4f, Right arrow
    ZX_LEFT,         // 0x50, Left arrow
    ZX_DOWN,         // 0x51, Down arrow
    ZX_UP,           // 0x52, Up arrow
    NONE,            // 0x53, Num lock
    ZX_SLASH,        // 0x54, Keypad /
    ZX_MULTIPLY,     // 0x55, Keypad *
    ZX_MINUS,        // 0x56, Keypad -
    ZX_PLUS,         // 0x57, Keypad +
    ZX_ENTER,        // 0x58, Keypad enter
    ZX_1,            // 0x59, Keypad 1
    ZX_2,            // 0x5a, Keypad 2
    ZX_3,            // 0x5b, Keypad 3
    ZX_4,            // 0x5c, Keypad 4
    ZX_5,            // 0x5d, Keypad 5
    ZX_6,            // 0x5e, Keypad 6
    ZX_7,            // 0x5f, Keypad 7
    ZX_8,            // 0x60, Keypad 8
    ZX_9,            // 0x61, Keypad 9
    ZX_0,            // 0x62, Keypad 0
    ZX_DOT,          // 0x63, Keypad .
    MatrixKey::SILENT, // 0x64, Non-US \
    ZX_0,            // 0x65, Application
];

/// Look up the Spectrum key for a usage code.  Both ordinary keys and the modifier codes
/// (0xe0-0xe7) are handled.  Anything we don't know gives [`MatrixKey::NONE`].
pub fn lookup(code: u8) -> MatrixKey {
    match code {
        KEY_LEFT_CONTROL..=KEY_RIGHT_GUI => MODIFIER_TABLE[(code - KEY_LEFT_CONTROL) as usize],
        _ => KEY_TABLE.get(code as usize).copied().unwrap_or(NONE),
    }
}

/// Look up the key for a modifier, by its bit number in the report's modifier byte.
pub fn lookup_modifier(bit: u8) -> MatrixKey {
    MODIFIER_TABLE.get(bit as usize).copied().unwrap_or(NONE)
}

/// In joystick mode, the arrow keys are the Sinclair (Interface 2, port 1) joystick: 6, 7, 8
/// and 9.  Returns `None` for anything that isn't an arrow key.
pub fn lookup_joystick(code: u8) -> Option<MatrixKey> {
    // Right, left, down, up.
    static JOYSTICK: [MatrixKey; 4] = [ZX_7, ZX_6, ZX_8, ZX_9];

    let index = code.wrapping_sub(crate::usage::KEY_RIGHT) as usize;
    JOYSTICK.get(index).copied()
}
