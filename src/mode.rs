//! Cursor key / joystick mode.

use crate::keys::{ZX_CURSOR_MODE, ZX_JOYSTICK_MODE};
use crate::log::info;
use crate::matrix::Matrix;

/// How the arrow keys are interpreted.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Arrow keys are the Spectrum cursor keys (CAPS SHIFT + 5-8).
    #[default]
    Keyboard,
    /// Arrow keys are a Sinclair joystick (6-9).
    Joystick,
}

impl Mode {
    /// The mode to use after a report that produced `matrix`.  The cursor mode key wins if both
    /// are down, and with neither down, the mode sticks.
    pub fn update(self, matrix: &Matrix) -> Mode {
        let next = if matrix.get(ZX_CURSOR_MODE) {
            Mode::Keyboard
        } else if matrix.get(ZX_JOYSTICK_MODE) {
            Mode::Joystick
        } else {
            self
        };
        if next != self {
            info!("Mode: {}", next.name());
        }
        next
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Keyboard => "keyboard",
            Mode::Joystick => "joystick",
        }
    }
}
