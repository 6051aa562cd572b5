use std::fmt;

use crate::lexer::LexerTokenKind;

/// A very simple set of operations, one per source operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Add `value` to the cell under the data pointer
    DerefAdd,

    /// Subtract `value` from the cell under the data pointer
    DerefSub,

    /// Move the data pointer right
    ShiftRight,

    /// Move the data pointer left
    ShiftLeft,

    /// Write the cell under the data pointer `value` times
    Write,

    /// Read up to `value` inputs into the cell under the data pointer
    Read,

    /// Jump to `value` if the cell is zero
    JumpIfZero,

    /// Jump to `value` if the cell is non-zero
    JumpIfNonZero,
}

impl Op {
    pub fn from_token(kind: LexerTokenKind) -> Option<Op> {
        Some(match kind {
            LexerTokenKind::Increment => Op::ShiftRight,
            LexerTokenKind::Decrement => Op::ShiftLeft,
            LexerTokenKind::DerefIncrement => Op::DerefAdd,
            LexerTokenKind::DerefDecrement => Op::DerefSub,
            LexerTokenKind::Write => Op::Write,
            LexerTokenKind::Read => Op::Read,
            LexerTokenKind::JumpStart => Op::JumpIfZero,
            LexerTokenKind::JumpEnd => Op::JumpIfNonZero,
            LexerTokenKind::Comment => return None,
        })
    }

    pub fn symbol(&self) -> char {
        match self {
            Op::DerefAdd => '+',
            Op::DerefSub => '-',
            Op::ShiftRight => '>',
            Op::ShiftLeft => '<',
            Op::Write => '.',
            Op::Read => ',',
            Op::JumpIfZero => '[',
            Op::JumpIfNonZero => ']',
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, Op::JumpIfZero | Op::JumpIfNonZero)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One compiled instruction.
///
/// For jumps `value` is an index into the instruction sequence (the instruction
/// right after the matching bracket), for everything else it's a repeat count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub op: Op,
    pub value: usize,
}

impl Instruction {
    pub fn new(op: Op, value: usize) -> Self {
        Self { op, value }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Instruction, Op};
    use crate::lexer::LexerTokenKind;
    use assert2::check;

    #[test]
    fn comments_have_no_op() {
        check!(Op::from_token(LexerTokenKind::Comment).is_none());
        check!(Op::from_token(LexerTokenKind::JumpEnd) == Some(Op::JumpIfNonZero));
    }

    #[test]
    fn displays_as_source() {
        check!(Instruction::new(Op::DerefAdd, 5).to_string() == "+5");
        check!(Instruction::new(Op::JumpIfZero, 12).to_string() == "[12");
        check!(Op::ShiftLeft.is_jump() == false);
        check!(Op::JumpIfNonZero.is_jump());
    }
}
