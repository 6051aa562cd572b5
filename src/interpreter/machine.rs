use tracing::{debug, instrument};

use crate::{
    bytecode::{Instruction, Op},
    cell::Cell,
    compiler::{compile, CompileDiagnostic},
    io::{self, Input, Output},
};

use super::{MachineConfig, RunOutcome, RuntimeError, Tape};

/// A compiled program together with the tape it runs on.
///
/// Execution is resumable: `run` picks up from wherever the last call stopped,
/// so a program can be stepped through in chunks by passing a step budget.
pub struct VirtualMachine<C: Cell> {
    instructions: Vec<Instruction>,
    diagnostic: CompileDiagnostic,

    /// Index of the next instruction to execute
    instruction_pointer: usize,
    /// Repeats of a folded `.`/`,` already done before an IO error interrupted it
    completed_repeats: usize,
    tape: Tape<C>,
}

impl<C: Cell> VirtualMachine<C> {
    /// Compile `source` against a default sized, wrapping tape
    pub fn new(source: &str) -> Result<Self, RuntimeError> {
        Self::with_config(source, MachineConfig::default())
    }

    pub fn with_config(source: &str, config: MachineConfig) -> Result<Self, RuntimeError> {
        let tape = Tape::new(config.tape_len, config.wraparound)?;
        let compiled = compile(source);

        Ok(Self {
            instructions: compiled.instructions,
            diagnostic: compiled.diagnostic,
            instruction_pointer: 0,
            completed_repeats: 0,
            tape,
        })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn diagnostic(&self) -> &CompileDiagnostic {
        &self.diagnostic
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    pub fn memory_pointer(&self) -> usize {
        self.tape.data_pointer()
    }

    pub fn tape_len(&self) -> usize {
        self.tape.len()
    }

    pub fn wraparound(&self) -> bool {
        self.tape.wraparound()
    }

    pub fn is_finished(&self) -> bool {
        self.instruction_pointer >= self.instructions.len()
    }

    /// Read any cell, out of range indices error unless the tape wraps
    pub fn memory(&self, index: usize) -> Result<C, RuntimeError> {
        self.tape.get(index)
    }

    pub fn reset_memory(&mut self) {
        self.tape.reset_memory();
    }

    pub fn reset_instruction_pointer(&mut self) {
        self.instruction_pointer = 0;
        self.completed_repeats = 0;
    }

    pub fn reset_memory_pointer(&mut self) {
        self.tape.reset_data_pointer();
    }

    /// Zero the tape and rewind both pointers, the program is kept
    pub fn reset(&mut self) {
        self.reset_memory();
        self.reset_instruction_pointer();
        self.reset_memory_pointer();
    }

    /// Execute until the program ends or `max_steps` instructions have run
    /// (`0` means no limit).
    ///
    /// Without an input every `,` leaves the cell untouched, without an output
    /// every `.` is skipped, either way the instruction still costs a step.
    /// On error the instruction pointer stays on the offending instruction. If an
    /// input or output fails partway through a folded `.`/`,` run, the next call
    /// carries on with the repeats that are left rather than starting over.
    #[instrument(skip_all, fields(ip = self.instruction_pointer, max_steps = max_steps))]
    pub fn run(
        &mut self,
        mut input: Option<&mut dyn Input<C>>,
        mut output: Option<&mut dyn Output<C>>,
        max_steps: usize,
    ) -> Result<RunOutcome, RuntimeError> {
        let mut steps = 0;

        while self.instruction_pointer < self.instructions.len() {
            if max_steps != 0 && steps == max_steps {
                break;
            }

            let Instruction { op, value } = self.instructions[self.instruction_pointer];
            match op {
                Op::DerefAdd => self.tape.deref_and_add_value(value),
                Op::DerefSub => self.tape.deref_and_sub_value(value),
                Op::ShiftRight => self.tape.shift_right(value)?,
                Op::ShiftLeft => self.tape.shift_left(value)?,
                Op::Write => {
                    if let Some(output) = output.as_deref_mut() {
                        let cell = self.tape.current();
                        while self.completed_repeats < value {
                            output.push(cell)?;
                            self.completed_repeats += 1;
                        }
                    }
                }
                Op::Read => {
                    if let Some(input) = input.as_deref_mut() {
                        while self.completed_repeats < value {
                            match input.pull()? {
                                Some(cell) => self.tape.set_current(cell),
                                None => break,
                            }
                            self.completed_repeats += 1;
                        }
                    }
                }
                Op::JumpIfZero => {
                    if self.tape.value_is_zero() {
                        self.instruction_pointer = value;
                        steps += 1;
                        // don't do the ++
                        continue;
                    }
                }
                Op::JumpIfNonZero => {
                    if !self.tape.value_is_zero() {
                        self.instruction_pointer = value;
                        steps += 1;
                        // don't do the ++
                        continue;
                    }
                }
            }

            self.completed_repeats = 0;
            self.instruction_pointer += 1;
            steps += 1;
        }

        let outcome = RunOutcome {
            steps,
            finished: self.is_finished(),
        };
        debug!(steps = outcome.steps, finished = outcome.finished, "run stopped");
        Ok(outcome)
    }

    /// Run with a slice of cells as input, collecting everything written
    pub fn run_vec(&mut self, input: &[C], max_steps: usize) -> Result<Vec<C>, RuntimeError> {
        let mut input = io::from_iter(input.iter().copied());
        let mut output: Vec<C> = Vec::new();
        self.run(Some(&mut input), Some(&mut output), max_steps)?;
        Ok(output)
    }

    /// Run with text as input (one cell per char), collecting the output as text
    pub fn run_text(&mut self, input: &str, max_steps: usize) -> Result<String, RuntimeError> {
        let mut input = io::from_str(input);
        let mut output = String::new();
        self.run(Some(&mut input), Some(&mut output), max_steps)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::VirtualMachine;
    use crate::{
        bytecode::Op,
        interpreter::{MachineConfig, RunOutcome, RuntimeError},
        io::{Input, Output},
    };
    use assert2::{check, let_assert};

    /// Sink that refuses the push with the given index, once
    struct FlakyOutput {
        pushed: Vec<u8>,
        attempts: usize,
        fail_on: Option<usize>,
    }

    impl Output<u8> for FlakyOutput {
        fn push(&mut self, value: u8) -> io::Result<()> {
            self.attempts += 1;
            if self.fail_on == Some(self.attempts) {
                self.fail_on = None;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "sink busy"));
            }
            self.pushed.push(value);
            Ok(())
        }
    }

    /// Source that refuses the pull with the given index once, without consuming anything
    struct FlakyInput {
        values: std::vec::IntoIter<u8>,
        attempts: usize,
        fail_on: Option<usize>,
    }

    impl Input<u8> for FlakyInput {
        fn pull(&mut self) -> io::Result<Option<u8>> {
            self.attempts += 1;
            if self.fail_on == Some(self.attempts) {
                self.fail_on = None;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "source busy"));
            }
            Ok(self.values.next())
        }
    }

    fn machine(source: &str) -> VirtualMachine<u8> {
        let_assert!(Ok(vm) = VirtualMachine::new(source));
        vm
    }

    #[test]
    fn empty_program_finishes_immediately() {
        let mut vm = machine("");
        let_assert!(Ok(outcome) = vm.run(None, None, 0));
        check!(outcome == RunOutcome { steps: 0, finished: true });
    }

    #[test]
    fn arithmetic_wraps() {
        let mut vm = machine("-");
        let_assert!(Ok(_) = vm.run(None, None, 0));
        let_assert!(Ok(255) = vm.memory(0));

        let mut vm = VirtualMachine::<i16>::new(">+++[-<->]").unwrap();
        let_assert!(Ok(_) = vm.run(None, None, 0));
        let_assert!(Ok(-3) = vm.memory(0));
    }

    #[test]
    fn step_budget_is_resumable() {
        let mut vm = machine("+++.");
        let mut output: Vec<u8> = Vec::new();
        let_assert!(Ok(first) = vm.run(None, Some(&mut output), 1));
        check!(first == RunOutcome { steps: 1, finished: false });
        check!(output.is_empty());
        check!(vm.instruction_pointer() == 1);

        let_assert!(Ok(second) = vm.run(None, Some(&mut output), 5));
        check!(second == RunOutcome { steps: 1, finished: true });
        check!(output == vec![3]);
    }

    #[test]
    fn jumps_count_as_steps() {
        // [ skip, then end
        let mut vm = machine("[-]");
        let_assert!(Ok(outcome) = vm.run(None, None, 0));
        check!(outcome.steps == 1);
    }

    #[test]
    fn missing_io_is_a_no_op() {
        let mut vm = machine("+,..");
        let_assert!(Ok(outcome) = vm.run(None, None, 0));
        check!(outcome.steps == 3);
        let_assert!(Ok(1) = vm.memory(0));
    }

    #[test]
    fn read_overwrites_and_stops_when_exhausted() {
        let mut vm = machine(",,,");
        let_assert!(Ok(output) = vm.run_vec(&[4, 9], 0));
        check!(output.is_empty());
        let_assert!(Ok(9) = vm.memory(0));
        check!(vm.is_finished());
    }

    #[test]
    fn write_repeats() {
        let mut vm = machine("+++...");
        let_assert!(Ok(output) = vm.run_vec(&[], 0));
        check!(output == vec![3, 3, 3]);
    }

    #[test]
    fn wraparound_moves_by_run_length() {
        let config = MachineConfig::default().with_tape_len(3).with_wraparound(true);
        let mut vm = VirtualMachine::<u8>::with_config(">>>>>", config).unwrap();
        check!(vm.instructions()[0].op == Op::ShiftRight);
        check!(vm.instructions()[0].value == 5);
        let_assert!(Ok(_) = vm.run(None, None, 0));
        check!(vm.memory_pointer() == 2);
    }

    #[test]
    fn linear_moves_ignore_run_length() {
        let config = MachineConfig::default().with_tape_len(3).with_wraparound(false);
        let mut vm = VirtualMachine::<u8>::with_config(">>>>>", config).unwrap();
        let_assert!(Ok(_) = vm.run(None, None, 0));
        check!(vm.memory_pointer() == 1);
    }

    #[test]
    fn leaving_a_linear_tape_is_an_error() {
        let config = MachineConfig::default().with_wraparound(false);
        let mut vm = VirtualMachine::<u8>::with_config("+<", config).unwrap();
        let_assert!(Err(RuntimeError::TapeBoundsExceeded { .. }) = vm.run(None, None, 0));
        check!(vm.instruction_pointer() == 1);
        check!(vm.memory_pointer() == 0);
    }

    #[test]
    fn memory_index_wraps_with_the_tape() {
        let config = MachineConfig::default().with_tape_len(3).with_wraparound(true);
        let mut vm = VirtualMachine::<u8>::with_config("<+", config).unwrap();
        let_assert!(Ok(_) = vm.run(None, None, 0));
        let_assert!(Ok(1) = vm.memory(2));
        let_assert!(Ok(1) = vm.memory(5));
    }

    #[test]
    fn resets() {
        let mut vm = machine("+>++");
        let_assert!(Ok(_) = vm.run(None, None, 0));
        check!(vm.memory_pointer() == 1);

        vm.reset_memory_pointer();
        check!(vm.memory_pointer() == 0);
        check!(vm.instruction_pointer() == 3);
        let_assert!(Ok(2) = vm.memory(1));

        vm.reset_instruction_pointer();
        check!(!vm.is_finished());
        vm.reset_memory();
        let_assert!(Ok(0) = vm.memory(1));

        let_assert!(Ok(_) = vm.run(None, None, 0));
        vm.reset();
        check!(vm.instruction_pointer() == 0);
        check!(vm.memory_pointer() == 0);
        let_assert!(Ok(0) = vm.memory(0));
    }

    #[test]
    fn failed_compile_still_runs() {
        let mut vm = machine("+]+.");
        check!(!vm.diagnostic().is_success());
        let_assert!(Ok(output) = vm.run_vec(&[], 0));
        check!(output == vec![2]);
    }

    #[test]
    fn text_io() {
        // echo every input char shifted by one, until a NUL
        let mut vm = machine(",[+.,]");
        let_assert!(Ok(output) = vm.run_text("HAL\0", 0));
        check!(output == "IBM");
    }

    #[test]
    fn interrupted_write_run_resumes_without_repeating() {
        let mut vm = machine("+++...");
        let mut output = FlakyOutput {
            pushed: vec![],
            attempts: 0,
            fail_on: Some(3),
        };

        let_assert!(Err(RuntimeError::Io(_)) = vm.run(None, Some(&mut output), 0));
        check!(output.pushed == vec![3, 3]);
        check!(vm.instruction_pointer() == 1);

        let_assert!(Ok(outcome) = vm.run(None, Some(&mut output), 0));
        check!(outcome.finished);
        check!(output.pushed == vec![3, 3, 3]);
    }

    #[test]
    fn interrupted_read_run_keeps_its_place() {
        let mut vm = machine(",,>,.");
        let mut input = FlakyInput {
            values: vec![1, 2, 3, 4].into_iter(),
            attempts: 0,
            fail_on: Some(2),
        };
        let mut output: Vec<u8> = vec![];

        let_assert!(Err(RuntimeError::Io(_)) = vm.run(Some(&mut input), Some(&mut output), 0));
        let_assert!(Ok(1) = vm.memory(0));

        let_assert!(Ok(_) = vm.run(Some(&mut input), Some(&mut output), 0));
        let_assert!(Ok(2) = vm.memory(0));
        check!(output == vec![3]);
    }

    #[test]
    fn rewinding_drops_partial_progress() {
        let mut vm = machine("..");
        let mut output = FlakyOutput {
            pushed: vec![],
            attempts: 0,
            fail_on: Some(2),
        };
        let_assert!(Err(RuntimeError::Io(_)) = vm.run(None, Some(&mut output), 0));

        vm.reset();
        let_assert!(Ok(_) = vm.run(None, Some(&mut output), 0));
        check!(output.pushed == vec![0, 0, 0]);
    }
}
