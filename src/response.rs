//! Precomputed bus responses.
//!
//! The ULA can select any combination of half-rows at once, and expects the key lines of all of
//! them ANDed together (active low).  There is far too little time in the bus interrupt to work
//! that out, so the poll loop works out the answer for every possible combination of selected
//! rows ahead of time.  The interrupt then just indexes a 256 byte table.
//!
//! There are two tables.  The poll loop only ever writes the one that isn't published, and then
//! publishes it with a single atomic store.  The interrupt only ever reads the published one.
//! Since the interrupt preempts the poll loop, and not the other way around, it always sees a
//! complete table, either the old one or the new one.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::keys::ROWS;
use crate::matrix::Matrix;

/// One entry per combination of selected rows.
pub const TABLE_SIZE: usize = 256;

/// Bit `r` of the index set means row `r` is selected.  Entries are the data lines, active low.
pub type Table = [u8; TABLE_SIZE];

/// The response with no keys down.
pub const RELEASED: u8 = 0xff;

/// Fill in the response for every selection of rows.
///
/// The last entry, with every row selected, is never written and keeps whatever it had.
pub fn precompute(matrix: &Matrix, table: &mut Table) {
    for (select, entry) in table.iter_mut().enumerate().take(TABLE_SIZE - 1) {
        let mut lines = 0;
        for row in 0..ROWS {
            if select & (1 << row) != 0 {
                lines |= matrix.row(row);
            }
        }
        *entry = !lines;
    }
}

/// The pair of tables.
///
/// This needs to live somewhere with a `'static` lifetime, and be [`split`] once into the
/// writing side and the reading side.
///
/// [`split`]: ResponseTables::split
pub struct ResponseTables {
    slots: [UnsafeCell<Table>; 2],
    active: AtomicU8,
}

// The slots are only reached through the Publisher (the unpublished slot, mutably) and Readers
// (the published slot, read only).
unsafe impl Sync for ResponseTables {}

impl ResponseTables {
    pub const fn new() -> ResponseTables {
        ResponseTables {
            slots: [
                UnsafeCell::new([RELEASED; TABLE_SIZE]),
                UnsafeCell::new([RELEASED; TABLE_SIZE]),
            ],
            active: AtomicU8::new(0),
        }
    }

    /// Split into the single writer and a reader.  The reader can be copied as needed.
    pub fn split(&mut self) -> (Publisher<'_>, Reader<'_>) {
        let tables: &ResponseTables = self;
        (Publisher { tables }, Reader { tables })
    }
}

impl Default for ResponseTables {
    fn default() -> Self {
        Self::new()
    }
}

/// The writing side.  There is only ever one of these.
pub struct Publisher<'a> {
    tables: &'a ResponseTables,
}

impl<'a> Publisher<'a> {
    /// The table that is not published, to be filled in.
    pub fn acquire(&mut self) -> &mut Table {
        // Only we store to `active`, so a relaxed load sees our own last store.
        let inactive = (self.tables.active.load(Ordering::Relaxed) ^ 1) as usize;
        // SAFETY: Readers never touch the inactive slot, and the `&mut self` borrow keeps us from
        // handing out a second reference, or publishing while this one is alive.
        unsafe { &mut *self.tables.slots[inactive].get() }
    }

    /// Make the table last handed out by [`acquire`](Self::acquire) the published one.
    pub fn publish(&mut self) {
        let next = self.tables.active.load(Ordering::Relaxed) ^ 1;
        self.tables.active.store(next, Ordering::Release);
    }

    /// Precompute the responses for `matrix` and publish them.
    pub fn update(&mut self, matrix: &Matrix) {
        precompute(matrix, self.acquire());
        self.publish();
    }
}

/// The reading side, for the bus interrupt.
#[derive(Clone, Copy)]
pub struct Reader<'a> {
    tables: &'a ResponseTables,
}

impl<'a> Reader<'a> {
    /// The data lines for the given selection of rows.
    #[inline(always)]
    pub fn response(&self, select: u8) -> u8 {
        let active = self.tables.active.load(Ordering::Acquire) as usize;
        // SAFETY: The publisher never writes the published slot.
        unsafe { (*self.tables.slots[active].get())[select as usize] }
    }

    /// A copy of the whole published table.
    pub fn snapshot(&self) -> Table {
        let active = self.tables.active.load(Ordering::Acquire) as usize;
        // SAFETY: As above.
        unsafe { *self.tables.slots[active].get() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::*;
    use crate::mode::Mode;
    use crate::usage::{Modifiers, KEY_A, KEY_BACKSPACE, KEY_SPACE};

    fn matrix(pressed: &[u8]) -> Matrix {
        Matrix::build(pressed.iter().copied(), Modifiers::empty(), Mode::Keyboard)
    }

    fn expected(matrix: &Matrix, select: usize) -> u8 {
        let mut lines = 0;
        for row in 0..ROWS {
            if select & (1 << row) != 0 {
                lines |= matrix.row(row);
            }
        }
        !lines
    }

    #[test]
    fn nothing_pressed() {
        let mut table = [0; TABLE_SIZE];
        precompute(&Matrix::new(), &mut table);
        assert!(table[..TABLE_SIZE - 1].iter().all(|&b| b == RELEASED));
        assert_eq!(table[TABLE_SIZE - 1], 0);
    }

    #[test]
    fn every_selection() {
        let m = matrix(&[KEY_A, KEY_BACKSPACE, KEY_SPACE]);
        let mut table = [0x55; TABLE_SIZE];
        precompute(&m, &mut table);
        for select in 0..TABLE_SIZE - 1 {
            assert_eq!(table[select], expected(&m, select), "select {:#x}", select);
        }
        assert_eq!(table[0], RELEASED);
        // Last entry is left alone.
        assert_eq!(table[TABLE_SIZE - 1], 0x55);
    }

    #[test]
    fn single_key_response() {
        let m = matrix(&[KEY_A]);
        let mut table = [RELEASED; TABLE_SIZE];
        precompute(&m, &mut table);

        let row = 1 << ZX_A.row();
        assert_eq!(table[row], RELEASED & !(1 << ZX_A.column()));
        // Selecting other rows along with it still shows the key.
        assert_eq!(table[row | 0x80], 0xfe);
        // Other rows alone don't.
        assert_eq!(table[0x80], RELEASED);
        assert_eq!(table[0x01], RELEASED);
    }

    #[test]
    fn all_rows_selected_reads_released() {
        // The "any key" read selects every row, and lands on the entry that is never written.
        let mut tables = ResponseTables::new();
        let (mut publisher, reader) = tables.split();
        publisher.update(&matrix(&[KEY_A]));
        publisher.update(&matrix(&[KEY_A, KEY_SPACE]));
        assert_eq!(reader.response(0xfe), 0xfe);
        assert_eq!(reader.response(0xff), RELEASED);
    }

    #[test]
    fn starts_released() {
        let mut tables = ResponseTables::new();
        let (_, reader) = tables.split();
        assert!(reader.snapshot().iter().all(|&b| b == RELEASED));
    }

    #[test]
    fn publish_swaps() {
        let mut tables = ResponseTables::new();
        let (mut publisher, reader) = tables.split();

        let first = matrix(&[KEY_A]);
        publisher.update(&first);
        assert_eq!(reader.response(0x02), 0xfe);

        let second = matrix(&[KEY_SPACE]);
        publisher.update(&second);
        assert_eq!(reader.response(0x02), RELEASED);
        assert_eq!(reader.response(0x80), 0xfe);

        // And back to the first slot.
        publisher.update(&Matrix::new());
        assert!(reader.snapshot()[..TABLE_SIZE - 1].iter().all(|&b| b == RELEASED));
    }

    /// The bus interrupt can land anywhere in the precompute.  Interrupt after every single
    /// entry, and make sure the reader only ever sees the old table, then the new one after the
    /// publish.
    #[test]
    fn never_torn() {
        let mut tables = ResponseTables::new();
        let (mut publisher, reader) = tables.split();

        let old = matrix(&[KEY_A, KEY_SPACE]);
        publisher.update(&old);
        let old_table = reader.snapshot();

        let new = matrix(&[KEY_BACKSPACE]);
        let mut new_table = [RELEASED; TABLE_SIZE];
        precompute(&new, &mut new_table);
        assert_ne!(old_table, new_table);

        for written in 0..TABLE_SIZE {
            {
                let target = publisher.acquire();
                target[written] = new_table[written];
            }
            assert_eq!(reader.snapshot(), old_table, "torn after {} entries", written);
            for select in 0..=255 {
                assert_eq!(reader.response(select), old_table[select as usize]);
            }
        }

        publisher.publish();
        assert_eq!(reader.snapshot()[..TABLE_SIZE - 1], new_table[..TABLE_SIZE - 1]);
    }
}
