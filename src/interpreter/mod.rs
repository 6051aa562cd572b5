pub mod machine;

use thiserror::Error;

use crate::cell::Cell;

pub use machine::VirtualMachine;

pub const DEFAULT_TAPE_LEN: usize = 30_000;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Tape must have at least one cell")]
    EmptyTape,

    #[error("Couldn't allocate a tape of {cells:} cells")]
    Allocation { cells: usize },

    #[error("Data pointer ({pointer:}) out of bounds (max length {tape_len:})")]
    TapeBoundsExceeded { pointer: usize, tape_len: usize },

    #[error("IO Error")]
    Io(
        #[from]
        std::io::Error,
    ),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// How many cells the tape holds
    pub tape_len: usize,

    /// Whether the data pointer wraps around the ends of the tape.
    /// Without it, moves are bounds checked and only ever shift by one.
    pub wraparound: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tape_len: DEFAULT_TAPE_LEN,
            wraparound: true,
        }
    }
}

impl MachineConfig {
    pub fn with_tape_len(mut self, tape_len: usize) -> Self {
        self.tape_len = tape_len;
        self
    }

    pub fn with_wraparound(mut self, wraparound: bool) -> Self {
        self.wraparound = wraparound;
        self
    }
}

/// What a single call to `run` got through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Instructions executed during this call
    pub steps: usize,
    /// Whether the instruction pointer reached the end of the program
    pub finished: bool,
}

pub struct Tape<C: Cell> {
    /// Pointer into the heap
    data_pointer: usize,

    /// Our statically allocated heap
    heap: Vec<C>,

    wraparound: bool,
}

impl<C: Cell> Tape<C> {
    pub fn new(len: usize, wraparound: bool) -> Result<Self, RuntimeError> {
        if len == 0 {
            return Err(RuntimeError::EmptyTape);
        }

        let mut heap = Vec::new();
        heap.try_reserve_exact(len)
            .map_err(|_| RuntimeError::Allocation { cells: len })?;
        heap.resize(len, C::zero());

        Ok(Self {
            data_pointer: 0,
            heap,
            wraparound,
        })
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn wraparound(&self) -> bool {
        self.wraparound
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    pub fn reset_memory(&mut self) {
        self.heap.fill(C::zero());
    }

    pub fn reset_data_pointer(&mut self) {
        self.data_pointer = 0;
    }

    /// Value of any cell, the index wraps if the tape does
    pub fn get(&self, index: usize) -> Result<C, RuntimeError> {
        let index = if self.wraparound {
            index % self.heap.len()
        } else {
            index
        };
        self.heap
            .get(index)
            .copied()
            .ok_or(RuntimeError::TapeBoundsExceeded {
                pointer: index,
                tape_len: self.heap.len(),
            })
    }

    /// The cell under the data pointer
    pub fn current(&self) -> C {
        self.heap[self.data_pointer]
    }

    pub fn set_current(&mut self, value: C) {
        self.heap[self.data_pointer] = value;
    }

    pub fn deref_and_add_value(&mut self, by: usize) {
        let cell = &mut self.heap[self.data_pointer];
        *cell = cell.add_count(by);
    }

    pub fn deref_and_sub_value(&mut self, by: usize) {
        let cell = &mut self.heap[self.data_pointer];
        *cell = cell.sub_count(by);
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> bool {
        self.current().is_zero()
    }

    /// Move the data pointer right.
    ///
    /// Only a wrapping tape honours `by`; a linear tape moves one cell no matter
    /// how many `>` were folded together.
    pub fn shift_right(&mut self, by: usize) -> Result<(), RuntimeError> {
        let len = self.heap.len();
        if self.wraparound {
            self.data_pointer = (self.data_pointer + by % len) % len;
            return Ok(());
        }

        let next = self.data_pointer + 1;
        if next >= len {
            return Err(RuntimeError::TapeBoundsExceeded {
                pointer: next,
                tape_len: len,
            });
        }
        self.data_pointer = next;
        Ok(())
    }

    /// Move the data pointer left, see [`Tape::shift_right`]
    pub fn shift_left(&mut self, by: usize) -> Result<(), RuntimeError> {
        let len = self.heap.len();
        if self.wraparound {
            self.data_pointer = (self.data_pointer + len - by % len) % len;
            return Ok(());
        }

        match self.data_pointer.checked_sub(1) {
            Some(next) => {
                self.data_pointer = next;
                Ok(())
            }
            None => Err(RuntimeError::TapeBoundsExceeded {
                pointer: usize::MAX,
                tape_len: len,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MachineConfig, RuntimeError, Tape, DEFAULT_TAPE_LEN};
    use assert2::{check, let_assert};

    #[test]
    fn default_config() {
        let config = MachineConfig::default();
        check!(config.tape_len == DEFAULT_TAPE_LEN);
        check!(config.wraparound);
        check!(MachineConfig::default().with_tape_len(3).with_wraparound(true).tape_len == 3);
    }

    #[test]
    fn empty_tape_is_rejected() {
        let_assert!(Err(RuntimeError::EmptyTape) = Tape::<u8>::new(0, false));
    }

    #[test]
    fn huge_tape_fails_to_allocate() {
        let_assert!(Err(RuntimeError::Allocation { .. }) = Tape::<u64>::new(usize::MAX, false));
    }

    #[test]
    fn wrapping_moves_use_modulo() {
        let mut tape = Tape::<u8>::new(3, true).unwrap();
        let_assert!(Ok(()) = tape.shift_right(5));
        check!(tape.data_pointer() == 2);
        let_assert!(Ok(()) = tape.shift_right(1));
        check!(tape.data_pointer() == 0);
        let_assert!(Ok(()) = tape.shift_left(7));
        check!(tape.data_pointer() == 2);
    }

    #[test]
    fn linear_moves_are_single_steps() {
        let mut tape = Tape::<u8>::new(3, false).unwrap();
        let_assert!(Ok(()) = tape.shift_right(5));
        check!(tape.data_pointer() == 1);
        let_assert!(Ok(()) = tape.shift_right(5));
        let_assert!(Err(RuntimeError::TapeBoundsExceeded { pointer: 3, tape_len: 3 }) = tape.shift_right(1));
        check!(tape.data_pointer() == 2);

        tape.reset_data_pointer();
        let_assert!(Err(RuntimeError::TapeBoundsExceeded { .. }) = tape.shift_left(1));
        check!(tape.data_pointer() == 0);
    }

    #[test]
    fn cell_access() {
        let mut tape = Tape::<i8>::new(4, false).unwrap();
        tape.deref_and_sub_value(1);
        check!(tape.current() == -1);
        let_assert!(Ok(-1) = tape.get(0));
        let_assert!(Err(RuntimeError::TapeBoundsExceeded { pointer: 4, .. }) = tape.get(4));
        tape.reset_memory();
        check!(tape.value_is_zero());

        let mut wrapping = Tape::<i8>::new(4, true).unwrap();
        wrapping.deref_and_add_value(300);
        let_assert!(Ok(44) = wrapping.get(8));
    }
}
