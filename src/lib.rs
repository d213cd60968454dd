//! ZX Spectrum keyboard matrix emulation
//!
//! A USB keyboard is turned into the 8 row by 5 column key matrix the Spectrum's ULA scans. Every
//! time a new keyboard report arrives, the poll loop rebuilds the matrix, folds it into a table of
//! responses for every possible combination of selected rows, and publishes that table. The bus
//! handler, running from the address line interrupt, only ever looks a byte up in the published
//! table and puts it on the data lines.
//!
//! Nothing in here touches hardware directly. Single bit lines go through the embedded-hal digital
//! traits, the two 8-bit buses and the status indicator through the small traits in [`bus`] and
//! [`poll`].

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod keymap;
pub mod keys;
pub mod link;
pub mod magic;
pub mod matrix;
pub mod mode;
pub mod poll;
pub mod report;
pub mod response;
pub mod usage;

pub use keys::MatrixKey;
pub use matrix::Matrix;
pub use mode::Mode;
pub use poll::Controller;
pub use report::{KeyReport, KeyReportSource};
pub use usage::Modifiers;

#[cfg(test)]
mod testlog;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        mod log {
            pub use defmt::{debug, info, warn};
        }
    } else {
        mod log {
            pub use log::{debug, info, warn};
        }
    }
}

/// Discharge a result that can't fail.  The RP2040 pins (and our test pins) all use
/// `Infallible` for their error type.
#[inline(always)]
pub(crate) fn infallible<T>(result: Result<T, core::convert::Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
