//! Whole-system scenarios.
//!
//! Reports arrive over the link, the controller polls them, and the ULA side reads the bus
//! through a `BusResponder`.  Each scenario is a list of steps: things that happen, and things
//! we expect to see on the lines.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use zx_keyboard::bus::{AddressBus, BusResponder, DataBus};
use zx_keyboard::link::{LinkDecoder, LinkEvent};
use zx_keyboard::magic::{CycleDelay, MagicButton, MAGIC_HOLD_CYCLES};
use zx_keyboard::response::ResponseTables;
use zx_keyboard::usage::*;
use zx_keyboard::{Controller, KeyReport, Mode, Modifiers};

/// Row select masks, bit set for each selected half-row.
const ROW_CAPS_V: u8 = 1 << 0;
const ROW_A_G: u8 = 1 << 1;
const ROW_Q_T: u8 = 1 << 2;
const ROW_1_5: u8 = 1 << 3;
const ROW_6_0: u8 = 1 << 4;
const ROW_P_Y: u8 = 1 << 5;
const ROW_ENTER_H: u8 = 1 << 6;
const ROW_SPACE_B: u8 = 1 << 7;

const RELEASED: u8 = 0xff;

enum Step {
    /// The bridge sends a report.
    Report(Modifiers, &'static [u8]),
    /// The keyboard is unplugged.
    Detach,
    /// Raw bytes on the link.
    Noise(&'static [u8]),
    /// Run the poll loop, expecting it to have had something (or nothing) to do.
    Poll(bool),
    /// The ULA selects these rows, and should read back this.
    Read(u8, u8),
    /// Every selection except all rows at once reads as released.
    AllReleased,
    LedIs(bool),
    /// The level of the reset line.
    ResetLine(bool),
    InMode(Mode),
    /// The magic button was pressed once since the last check.
    Magic,
    /// It wasn't.
    NoMagic,
}

use Step::*;

/// The lines around the controller.
#[derive(Default)]
struct Lines {
    led: Cell<Option<bool>>,
    reset: Cell<Option<bool>>,
    select: Cell<u8>,
    data: Cell<u8>,
    /// Button levels, and the hold delay, in order.
    magic: RefCell<Vec<MagicTrace>>,
    /// How many M1 samples before the strobe goes high, then low.
    m1: Cell<usize>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum MagicTrace {
    Button(bool),
    Hold(u32),
}

struct Led(Rc<Lines>);
struct Reset(Rc<Lines>);
struct M1(Rc<Lines>);
struct MagicPin(Rc<Lines>);
struct Hold(Rc<Lines>);
struct Address(Rc<Lines>);
struct Data(Rc<Lines>);

impl OutputPin for Led {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.led.set(Some(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.led.set(Some(true));
        Ok(())
    }
}

impl OutputPin for Reset {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.reset.set(Some(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.reset.set(Some(true));
        Ok(())
    }
}

impl M1 {
    /// Low for a few samples, then one high sample, then low again.
    fn level(&self) -> bool {
        let n = self.0.m1.get() + 1;
        self.0.m1.set(n);
        n % 4 == 3
    }
}

impl InputPin for M1 {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.level())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.level())
    }
}

impl OutputPin for MagicPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.magic.borrow_mut().push(MagicTrace::Button(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.magic.borrow_mut().push(MagicTrace::Button(true));
        Ok(())
    }
}

impl CycleDelay for Hold {
    fn delay_cycles(&mut self, cycles: u32) {
        self.0.magic.borrow_mut().push(MagicTrace::Hold(cycles));
    }
}

impl AddressBus for Address {
    fn sample(&mut self) -> u8 {
        self.0.select.get()
    }

    fn acknowledge(&mut self) {}
}

impl DataBus for Data {
    fn write(&mut self, value: u8) {
        self.0.data.set(value);
    }
}

/// Play a scenario through a freshly powered up system.
fn run(steps: &[Step]) {
    let lines = Rc::new(Lines::default());
    let mut tables = ResponseTables::new();
    let (publisher, reader) = tables.split();

    let magic = MagicButton::new(
        M1(lines.clone()),
        MagicPin(lines.clone()),
        Hold(lines.clone()),
    );
    // Starting released isn't a press.
    assert_eq!(*lines.magic.borrow(), vec![MagicTrace::Button(true)]);
    lines.magic.borrow_mut().clear();

    let mut controller = Controller::new(
        publisher,
        Reset(lines.clone()),
        Led(lines.clone()),
        magic,
    );
    let mut bus = BusResponder::new(reader, Address(lines.clone()), Data(lines.clone()));
    let mut link = LinkDecoder::new();
    let mut pending: VecDeque<u8> = VecDeque::new();

    for (n, step) in steps.iter().enumerate() {
        match step {
            Report(mods, keys) => {
                let report = KeyReport::new(*mods, keys);
                pending.extend(LinkEvent::Report(report).encode());
            }
            Detach => pending.extend(LinkEvent::Detach.encode()),
            Noise(bytes) => pending.extend(bytes.iter().copied()),
            Poll(expected) => {
                for byte in pending.drain(..) {
                    link.push(byte);
                }
                assert_eq!(controller.poll(&mut link), *expected, "step {}", n);
            }
            Read(select, expected) => {
                lines.select.set(*select);
                bus.respond();
                assert_eq!(
                    lines.data.get(),
                    *expected,
                    "step {}: select {:#010b}",
                    n,
                    select
                );
            }
            AllReleased => {
                for select in 0..255u8 {
                    lines.select.set(select);
                    bus.respond();
                    assert_eq!(lines.data.get(), RELEASED, "step {}: select {}", n, select);
                }
            }
            LedIs(on) => assert_eq!(lines.led.get(), Some(*on), "step {}", n),
            ResetLine(level) => assert_eq!(lines.reset.get(), Some(*level), "step {}", n),
            InMode(mode) => assert_eq!(controller.mode(), *mode, "step {}", n),
            Magic => {
                let trace: Vec<_> = lines.magic.borrow_mut().drain(..).collect();
                assert_eq!(
                    trace,
                    vec![
                        MagicTrace::Button(false),
                        MagicTrace::Hold(MAGIC_HOLD_CYCLES),
                        MagicTrace::Button(true),
                    ],
                    "step {}",
                    n
                );
            }
            NoMagic => assert!(lines.magic.borrow().is_empty(), "step {}", n),
        }
    }
}

#[test]
fn power_up() {
    run(&[
        AllReleased,
        LedIs(false),
        ResetLine(true),
        InMode(Mode::Keyboard),
        // Nothing attached.
        Poll(false),
        AllReleased,
    ]);
}

#[test]
fn single_key() {
    run(&[
        Report(Modifiers::empty(), &[KEY_A]),
        Poll(true),
        Read(ROW_A_G, 0b1111_1110),
        Read(ROW_A_G | ROW_SPACE_B, 0b1111_1110),
        Read(ROW_CAPS_V, RELEASED),
        Read(ROW_Q_T | ROW_1_5 | ROW_6_0 | ROW_P_Y | ROW_ENTER_H, RELEASED),
        LedIs(true),
        // Release it.
        Report(Modifiers::empty(), &[]),
        Poll(true),
        AllReleased,
        LedIs(false),
    ]);
}

#[test]
fn injected_shifts() {
    run(&[
        // Backspace is CAPS SHIFT + 0.
        Report(Modifiers::empty(), &[KEY_BACKSPACE]),
        Poll(true),
        Read(ROW_CAPS_V, 0b1111_1110),
        Read(ROW_6_0, 0b1111_1110),
        Read(ROW_SPACE_B, RELEASED),
        // Semicolon is SYMBOL SHIFT + O.
        Report(Modifiers::empty(), &[KEY_SEMICOLON]),
        Poll(true),
        Read(ROW_CAPS_V, RELEASED),
        Read(ROW_SPACE_B, 0b1111_1101),
        Read(ROW_P_Y, 0b1111_1101),
        // Left alt is extended mode, both shifts together.
        Report(Modifiers::LEFT_ALT, &[]),
        Poll(true),
        Read(ROW_CAPS_V, 0b1111_1110),
        Read(ROW_SPACE_B, 0b1111_1101),
        Read(ROW_CAPS_V | ROW_SPACE_B, 0b1111_1100),
    ]);
}

#[test]
fn joystick() {
    run(&[
        Report(Modifiers::empty(), &[KEY_UP]),
        Poll(true),
        // Cursor up is CAPS SHIFT + 7.
        Read(ROW_CAPS_V, 0b1111_1110),
        Read(ROW_6_0, 0b1111_0111),
        // F6 switches to joystick.
        Report(Modifiers::empty(), &[KEY_F6]),
        Poll(true),
        InMode(Mode::Joystick),
        AllReleased,
        LedIs(true),
        Report(Modifiers::empty(), &[KEY_UP, KEY_RIGHT]),
        Poll(true),
        Read(ROW_CAPS_V, RELEASED),
        // 9 and 7.
        Read(ROW_6_0, 0b1111_0101),
        // It sticks with nothing pressed.
        Report(Modifiers::empty(), &[]),
        Poll(true),
        InMode(Mode::Joystick),
        // F5 is back to cursor keys, even with F6 down too.
        Report(Modifiers::empty(), &[KEY_F6, KEY_F5]),
        Poll(true),
        InMode(Mode::Keyboard),
        Report(Modifiers::empty(), &[KEY_LEFT]),
        Poll(true),
        Read(ROW_1_5, 0b1110_1111),
        Read(ROW_CAPS_V, 0b1111_1110),
    ]);
}

#[test]
fn detach_keeps_last_table() {
    run(&[
        Report(Modifiers::empty(), &[KEY_SPACE]),
        Poll(true),
        Read(ROW_SPACE_B, 0b1111_1110),
        Detach,
        Poll(false),
        Poll(false),
        Read(ROW_SPACE_B, 0b1111_1110),
        LedIs(true),
        // Plugged back in.
        Report(Modifiers::empty(), &[]),
        Poll(true),
        AllReleased,
    ]);
}

#[test]
fn corrupt_frames_are_dropped() {
    run(&[
        Noise(&[0x7e, 0x01, 0x00, 0x00, KEY_A, 0, 0, 0, 0, 0, 0x12, 0x34]),
        Poll(false),
        AllReleased,
        Noise(&[0x55, 0xaa]),
        Report(Modifiers::empty(), &[KEY_ENTER]),
        Poll(true),
        Read(ROW_ENTER_H, 0b1111_1110),
    ]);
}

#[test]
fn reset() {
    run(&[
        Report(Modifiers::empty(), &[KEY_F12]),
        Poll(true),
        ResetLine(false),
        // Held, but invisible to the ULA.
        AllReleased,
        LedIs(true),
        Report(Modifiers::empty(), &[]),
        Poll(true),
        ResetLine(true),
        LedIs(false),
    ]);
}

#[test]
fn magic() {
    run(&[
        Report(Modifiers::empty(), &[KEY_F10]),
        Poll(true),
        Magic,
        AllReleased,
        ResetLine(true),
        // Every report with it held presses again.
        Report(Modifiers::empty(), &[KEY_F10, KEY_A]),
        Poll(true),
        Magic,
        Read(ROW_A_G, 0b1111_1110),
        Poll(false),
        NoMagic,
        Report(Modifiers::empty(), &[KEY_A]),
        Poll(true),
        NoMagic,
    ]);
}
