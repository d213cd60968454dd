//! The status LED.
//!
//! The poll loop only records what is going on, in [`STATUS`].  The LED task picks an
//! indication from that every tick and plays it on the WS2812.

use core::iter::once;
use core::sync::atomic::{AtomicBool, Ordering};

use smart_leds::{SmartLedsWrite, RGB8};
use zx_keyboard::poll::Indicator;

const OFF: RGB8 = RGB8::new(0, 0, 0);

pub struct Indication(&'static [Step]);

struct Step {
    color: RGB8,
    count: usize,
}

/// No keyboard on the other end of the link.
pub static DETACHED_INDICATOR: Indication = Indication(&[
    Step { color: RGB8::new(8, 4, 0), count: 300 },
    Step { color: OFF,                count: 700 },
]);

/// Keyboard attached, nothing pressed.
pub static KEYBOARD_INDICATOR: Indication = Indication(&[
    Step { color: RGB8::new(0, 4, 0), count: 10000 },
]);

/// Same, but the arrows are a joystick.
pub static JOYSTICK_INDICATOR: Indication = Indication(&[
    Step { color: RGB8::new(0, 0, 8), count: 10000 },
]);

/// Something is pressed.
pub static PRESSED_INDICATOR: Indication = Indication(&[
    Step { color: RGB8::new(16, 16, 16), count: 10000 },
]);

/// What the LED should be showing.
pub struct Status {
    attached: AtomicBool,
    pressed: AtomicBool,
    joystick: AtomicBool,
}

pub static STATUS: Status = Status {
    attached: AtomicBool::new(false),
    pressed: AtomicBool::new(false),
    joystick: AtomicBool::new(false),
};

impl Status {
    pub fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::Relaxed);
    }

    pub fn set_joystick(&self, joystick: bool) {
        self.joystick.store(joystick, Ordering::Relaxed);
    }

    pub fn indication(&self) -> &'static Indication {
        if !self.attached.load(Ordering::Relaxed) {
            &DETACHED_INDICATOR
        } else if self.pressed.load(Ordering::Relaxed) {
            &PRESSED_INDICATOR
        } else if self.joystick.load(Ordering::Relaxed) {
            &JOYSTICK_INDICATOR
        } else {
            &KEYBOARD_INDICATOR
        }
    }
}

/// The controller's view of the LED.
pub struct StatusIndicator;

impl Indicator for StatusIndicator {
    fn set_pressed(&mut self, pressed: bool) {
        STATUS.pressed.store(pressed, Ordering::Relaxed);
    }
}

pub struct LedManager<L: SmartLedsWrite<Color = RGB8>> {
    leds: L,

    /// Repeats until changed.
    steps: &'static [Step],

    count: usize,
    phase: usize,
}

impl<L: SmartLedsWrite<Color = RGB8>> LedManager<L> {
    pub fn new(leds: L) -> Self {
        LedManager {
            leds,
            steps: DETACHED_INDICATOR.0,
            count: 0,
            phase: 0,
        }
    }

    /// Switch to a new indication, starting it from the top.  Setting the one already showing
    /// does nothing.
    pub fn set(&mut self, indicator: &'static Indication) {
        if core::ptr::eq(self.steps, indicator.0) {
            return;
        }
        self.steps = indicator.0;
        self.count = 0;
        self.phase = 0;
    }

    pub fn tick(&mut self) {
        if self.count > 0 {
            self.count -= 1;
            return;
        }

        if self.phase >= self.steps.len() {
            self.phase = 0;
        }
        let step = &self.steps[self.phase];
        let _ = self.leds.write(once(step.color));
        self.count = step.count;
        self.phase += 1;
    }
}
