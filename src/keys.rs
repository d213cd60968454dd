//! Keys on the Spectrum keyboard
//!
//! The Spectrum's 40 keys are wired as 8 half-rows of 5 keys. The ULA selects half-rows with the
//! upper address lines A8-A15 (one line per row, active low) and reads the 5 key lines back on
//! D0-D4, also active low.
//!
//! ```text
//!  row  line   bit 0   bit 1   bit 2   bit 3   bit 4
//!   0   A8     CAPS    Z       X       C       V
//!   1   A9     A       S       D       F       G
//!   2   A10    Q       W       E       R       T
//!   3   A11    1       2       3       4       5
//!   4   A12    0       9       8       7       6
//!   5   A13    P       O       I       U       Y
//!   6   A14    ENTER   L       K       J       H
//!   7   A15    SPACE   SYM     M       N       B
//! ```
//!
//! A [`MatrixKey`] names one of these positions, and may also ask for CAPS SHIFT and/or SYMBOL
//! SHIFT to be held with it. Plenty of PC keys (cursor keys, punctuation, delete) are a shifted
//! key on the Spectrum, and there is no physical key behind that shift.
//!
//! Columns 5 and 6 don't exist on the real keyboard. They hold the reserved positions: reset,
//! the magic button and the two joystick mode keys. These never reach the data bus.

/// Number of half-rows, one per address line.
pub const ROWS: usize = 8;

/// Number of key lines per half-row.
pub const COLUMNS: usize = 5;

/// The data bits a half-row can drive.
pub const COLUMN_MASK: u8 = (1 << COLUMNS) - 1;

const COLUMN_BITS: u8 = 0b0000_0111;
const ROW_SHIFT: u8 = 3;
const ROW_BITS: u8 = 0b0000_0111;
const SYM_FLAG: u8 = 0b0100_0000;
const CAPS_FLAG: u8 = 0b1000_0000;

/// An encoded position in the key matrix.
///
/// Packs the column (bits 0-2), the row (bits 3-5), and two flags asking for SYMBOL SHIFT (bit
/// 6) and CAPS SHIFT (bit 7) to be pressed along with it.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixKey(u8);

impl MatrixKey {
    /// There is no key for this.
    pub const NONE: MatrixKey = MatrixKey(0xff);

    /// Known, but deliberately does nothing.  No diagnostic is produced for these.
    pub const SILENT: MatrixKey = MatrixKey(0xfe);

    /// The key at `row`, `column`.
    pub const fn new(row: u8, column: u8) -> MatrixKey {
        MatrixKey(((row & ROW_BITS) << ROW_SHIFT) | (column & COLUMN_BITS))
    }

    /// This key, with CAPS SHIFT held.
    pub const fn caps(self) -> MatrixKey {
        MatrixKey(self.0 | CAPS_FLAG)
    }

    /// This key, with SYMBOL SHIFT held.
    pub const fn sym(self) -> MatrixKey {
        MatrixKey(self.0 | SYM_FLAG)
    }

    pub const fn row(self) -> usize {
        ((self.0 >> ROW_SHIFT) & ROW_BITS) as usize
    }

    pub const fn column(self) -> usize {
        (self.0 & COLUMN_BITS) as usize
    }

    /// Is this an actual key, rather than one of the two placeholders.
    pub const fn is_key(self) -> bool {
        self.0 != Self::NONE.0 && self.0 != Self::SILENT.0
    }

    pub const fn has_caps(self) -> bool {
        self.is_key() && (self.0 & CAPS_FLAG) != 0
    }

    pub const fn has_sym(self) -> bool {
        self.is_key() && (self.0 & SYM_FLAG) != 0
    }

    /// Is this one of the reserved positions, outside of the physical keyboard.
    pub const fn is_reserved(self) -> bool {
        self.column() >= COLUMNS
    }

    /// The position alone, with the shift flags removed.
    pub const fn position(self) -> MatrixKey {
        MatrixKey(self.0 & !(CAPS_FLAG | SYM_FLAG))
    }
}

// The keys, in the order the ULA sees them.

pub const ZX_CAPS: MatrixKey = MatrixKey::new(0, 0);
pub const ZX_Z: MatrixKey = MatrixKey::new(0, 1);
pub const ZX_X: MatrixKey = MatrixKey::new(0, 2);
pub const ZX_C: MatrixKey = MatrixKey::new(0, 3);
pub const ZX_V: MatrixKey = MatrixKey::new(0, 4);

pub const ZX_A: MatrixKey = MatrixKey::new(1, 0);
pub const ZX_S: MatrixKey = MatrixKey::new(1, 1);
pub const ZX_D: MatrixKey = MatrixKey::new(1, 2);
pub const ZX_F: MatrixKey = MatrixKey::new(1, 3);
pub const ZX_G: MatrixKey = MatrixKey::new(1, 4);

pub const ZX_Q: MatrixKey = MatrixKey::new(2, 0);
pub const ZX_W: MatrixKey = MatrixKey::new(2, 1);
pub const ZX_E: MatrixKey = MatrixKey::new(2, 2);
pub const ZX_R: MatrixKey = MatrixKey::new(2, 3);
pub const ZX_T: MatrixKey = MatrixKey::new(2, 4);

pub const ZX_1: MatrixKey = MatrixKey::new(3, 0);
pub const ZX_2: MatrixKey = MatrixKey::new(3, 1);
pub const ZX_3: MatrixKey = MatrixKey::new(3, 2);
pub const ZX_4: MatrixKey = MatrixKey::new(3, 3);
pub const ZX_5: MatrixKey = MatrixKey::new(3, 4);

pub const ZX_0: MatrixKey = MatrixKey::new(4, 0);
pub const ZX_9: MatrixKey = MatrixKey::new(4, 1);
pub const ZX_8: MatrixKey = MatrixKey::new(4, 2);
pub const ZX_7: MatrixKey = MatrixKey::new(4, 3);
pub const ZX_6: MatrixKey = MatrixKey::new(4, 4);

pub const ZX_P: MatrixKey = MatrixKey::new(5, 0);
pub const ZX_O: MatrixKey = MatrixKey::new(5, 1);
pub const ZX_I: MatrixKey = MatrixKey::new(5, 2);
pub const ZX_U: MatrixKey = MatrixKey::new(5, 3);
pub const ZX_Y: MatrixKey = MatrixKey::new(5, 4);

pub const ZX_ENTER: MatrixKey = MatrixKey::new(6, 0);
pub const ZX_L: MatrixKey = MatrixKey::new(6, 1);
pub const ZX_K: MatrixKey = MatrixKey::new(6, 2);
pub const ZX_J: MatrixKey = MatrixKey::new(6, 3);
pub const ZX_H: MatrixKey = MatrixKey::new(6, 4);

pub const ZX_SPACE: MatrixKey = MatrixKey::new(7, 0);
pub const ZX_SYM: MatrixKey = MatrixKey::new(7, 1);
pub const ZX_M: MatrixKey = MatrixKey::new(7, 2);
pub const ZX_N: MatrixKey = MatrixKey::new(7, 3);
pub const ZX_B: MatrixKey = MatrixKey::new(7, 4);

// CAPS SHIFT combinations.
pub const ZX_EDIT: MatrixKey = ZX_1.caps();
pub const ZX_CAPS_LOCK: MatrixKey = ZX_2.caps();
pub const ZX_TRUE_VIDEO: MatrixKey = ZX_3.caps();
pub const ZX_INV_VIDEO: MatrixKey = ZX_4.caps();
pub const ZX_LEFT: MatrixKey = ZX_5.caps();
pub const ZX_DOWN: MatrixKey = ZX_6.caps();
pub const ZX_UP: MatrixKey = ZX_7.caps();
pub const ZX_RIGHT: MatrixKey = ZX_8.caps();
pub const ZX_GRAPH: MatrixKey = ZX_9.caps();
pub const ZX_DELETE: MatrixKey = ZX_0.caps();
pub const ZX_BREAK: MatrixKey = ZX_SPACE.caps();
pub const ZX_EXT_MODE: MatrixKey = ZX_SYM.caps();

// SYMBOL SHIFT combinations.
pub const ZX_GRAVE: MatrixKey = ZX_7.sym();
pub const ZX_OPEN: MatrixKey = ZX_8.sym();
pub const ZX_CLOSE: MatrixKey = ZX_9.sym();
pub const ZX_LESS: MatrixKey = ZX_R.sym();
pub const ZX_GREATER: MatrixKey = ZX_T.sym();
pub const ZX_SEMICOLON: MatrixKey = ZX_O.sym();
pub const ZX_QUOTE: MatrixKey = ZX_P.sym();
pub const ZX_MINUS: MatrixKey = ZX_J.sym();
pub const ZX_PLUS: MatrixKey = ZX_K.sym();
pub const ZX_EQUAL: MatrixKey = ZX_L.sym();
pub const ZX_COLON: MatrixKey = ZX_Z.sym();
pub const ZX_SLASH: MatrixKey = ZX_V.sym();
pub const ZX_MULTIPLY: MatrixKey = ZX_B.sym();
pub const ZX_COMMA: MatrixKey = ZX_N.sym();
pub const ZX_DOT: MatrixKey = ZX_M.sym();

// Reserved positions, off the edge of the keyboard.
pub const ZX_RESET: MatrixKey = MatrixKey::new(0, 5);
pub const ZX_MAGIC: MatrixKey = MatrixKey::new(0, 6);
/// Force the cursor keys back to being cursor keys.
pub const ZX_CURSOR_MODE: MatrixKey = MatrixKey::new(1, 5);
/// Turn the cursor keys into a Sinclair joystick.
pub const ZX_JOYSTICK_MODE: MatrixKey = MatrixKey::new(1, 6);
