//! Log capture for tests.
//!
//! Installs a `log` logger that records messages into a per-thread buffer, so each test only
//! sees what it logged itself.

use std::cell::RefCell;
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

struct Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| {
            if let Some(messages) = captured.borrow_mut().as_mut() {
                messages.push(format!("{}", record.args()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture;
static INSTALL: Once = Once::new();

/// Start capturing on this thread, discarding anything captured so far.
pub fn capture() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("Another logger is installed");
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
}

/// Everything captured on this thread since the last call.
pub fn take() -> Vec<String> {
    CAPTURED.with(|captured| {
        captured
            .borrow_mut()
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    })
}
