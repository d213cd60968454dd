//! The emulated key matrix.
//!
//! The matrix is rebuilt from nothing on every keyboard report.  Nothing is carried from one
//! report to the next, other than the [`Mode`], which the caller owns and passes in.

use crate::keymap::{lookup, lookup_joystick, lookup_modifier};
use crate::keys::{MatrixKey, COLUMNS, COLUMN_MASK, ROWS, ZX_CAPS, ZX_SYM};
use crate::log::warn;
use crate::mode::Mode;
use crate::usage::Modifiers;

/// The state of every key position.
///
/// Each row byte has bit `c` set when the key in column `c` is down.  Only bits 0-4 are ever set
/// there.  The reserved positions (columns 5 and up) are tracked separately, so they can never
/// leak onto the data bus.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Matrix {
    rows: [u8; ROWS],
    reserved: [u8; ROWS],
}

impl Matrix {
    /// A matrix with nothing pressed.
    pub const fn new() -> Matrix {
        Matrix {
            rows: [0; ROWS],
            reserved: [0; ROWS],
        }
    }

    /// Build the matrix for a set of pressed keys.
    ///
    /// `pressed` is the ordinary (non-modifier) usage codes, `modifiers` the modifier byte from
    /// the same report.  In joystick mode, the four arrow keys are the joystick instead of their
    /// usual mapping.  Unknown codes are logged, and otherwise ignored.
    pub fn build<I>(pressed: I, modifiers: Modifiers, mode: Mode) -> Matrix
    where
        I: IntoIterator<Item = u8>,
    {
        let mut matrix = Matrix::new();

        for modifier in modifiers.iter() {
            matrix.press(lookup_modifier(modifier.bits().trailing_zeros() as u8));
        }

        for code in pressed {
            matrix.press_usage(code, mode);
        }

        matrix
    }

    /// Press the key for a single usage code.
    pub fn press_usage(&mut self, code: u8, mode: Mode) {
        if mode == Mode::Joystick {
            if let Some(key) = lookup_joystick(code) {
                self.press(key);
                return;
            }
        }

        let key = lookup(code);
        if key == MatrixKey::NONE {
            warn!("Unknown key {:x}", code);
            return;
        }
        self.press(key);
    }

    /// Press a key, along with whichever shift keys it asks for.  Placeholder keys do nothing.
    pub fn press(&mut self, key: MatrixKey) {
        if !key.is_key() {
            return;
        }
        self.set(key);
        if key.has_caps() {
            self.set(ZX_CAPS);
        }
        if key.has_sym() {
            self.set(ZX_SYM);
        }
    }

    fn set(&mut self, key: MatrixKey) {
        let column = key.column();
        if column < COLUMNS {
            self.rows[key.row()] |= 1 << column;
        } else {
            self.reserved[key.row()] |= 1 << (column - COLUMNS);
        }
    }

    /// Is the given position down.  The shift flags on `key` are ignored.
    pub fn get(&self, key: MatrixKey) -> bool {
        if !key.is_key() {
            return false;
        }
        let column = key.column();
        if column < COLUMNS {
            self.rows[key.row()] & (1 << column) != 0
        } else {
            self.reserved[key.row()] & (1 << (column - COLUMNS)) != 0
        }
    }

    /// The key lines for one half-row, active high.
    pub fn row(&self, row: usize) -> u8 {
        self.rows[row]
    }

    pub fn rows(&self) -> &[u8; ROWS] {
        &self.rows
    }

    /// The key lines seen with every row selected at once.
    pub fn any_row(&self) -> u8 {
        self.rows.iter().fold(0, |acc, row| acc | row) & COLUMN_MASK
    }

    /// Is anything at all down, including the reserved positions.
    pub fn is_pressed(&self) -> bool {
        self.any_row() != 0 || self.reserved.iter().any(|&r| r != 0)
    }

    /// Number of positions that are down.
    pub fn count(&self) -> u32 {
        self.rows
            .iter()
            .chain(self.reserved.iter())
            .map(|r| r.count_ones())
            .sum()
    }
}
