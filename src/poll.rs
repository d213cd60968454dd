//! The poll loop.
//!
//! Each time around, the controller takes the latest keyboard report, rebuilds the matrix,
//! publishes new responses for the bus handler, and takes care of the lines that aren't part of
//! the matrix: the status indicator, reset, and the magic button.

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::infallible;
use crate::keys::{ZX_MAGIC, ZX_RESET};
use crate::log::info;
use crate::magic::{CycleDelay, MagicButton};
use crate::matrix::Matrix;
use crate::mode::Mode;
use crate::report::{KeyReport, KeyReportSource};
use crate::response::Publisher;

/// Something to show whether any key is down.  Usually an LED.
pub trait Indicator {
    fn set_pressed(&mut self, pressed: bool);
}

/// Indicators that are just a pin.  The pin is driven high when something is pressed.
impl<P: OutputPin<Error = Infallible>> Indicator for P {
    fn set_pressed(&mut self, pressed: bool) {
        if pressed {
            infallible(self.set_high());
        } else {
            infallible(self.set_low());
        }
    }
}

/// Everything the poll loop owns.
pub struct Controller<'a, R, I, S, B, D> {
    publisher: Publisher<'a>,
    mode: Mode,
    reset: R,
    indicator: I,
    magic: MagicButton<S, B, D>,
}

impl<'a, R, I, S, B, D> Controller<'a, R, I, S, B, D>
where
    R: OutputPin<Error = Infallible>,
    I: Indicator,
    S: InputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
    D: CycleDelay,
{
    /// Build the controller.  The reset line starts out released, and the indicator off.
    pub fn new(
        publisher: Publisher<'a>,
        mut reset: R,
        mut indicator: I,
        magic: MagicButton<S, B, D>,
    ) -> Self {
        infallible(reset.set_high());
        indicator.set_pressed(false);
        Controller {
            publisher,
            mode: Mode::default(),
            reset,
            indicator,
            magic,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run one poll cycle.  Returns true if there was a new report to act on.  Without one,
    /// nothing changes, and the bus keeps answering with what was published last.
    pub fn poll<K: KeyReportSource + ?Sized>(&mut self, source: &mut K) -> bool {
        match source.poll() {
            Some(report) => {
                self.cycle(&report);
                true
            }
            None => false,
        }
    }

    /// Act on a single report.  Returns the matrix that was built for it.
    pub fn cycle(&mut self, report: &KeyReport) -> Matrix {
        let matrix = Matrix::build(report.pressed(), report.modifiers, self.mode);
        self.mode = self.mode.update(&matrix);

        self.publisher.update(&matrix);

        self.indicator.set_pressed(matrix.is_pressed());

        if matrix.get(ZX_RESET) {
            infallible(self.reset.set_low());
        } else {
            infallible(self.reset.set_high());
        }

        if matrix.get(ZX_MAGIC) {
            self.magic.press();
            info!("Magic button pressed");
        }

        matrix
    }
}
