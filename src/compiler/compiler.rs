use tracing::{debug, instrument, warn};

use crate::{
    bytecode::{Instruction, Op},
    lexer::{Lexer, SourcePosition},
};

use super::{CompileDiagnostic, CompileError, Compiled};

fn misbalanced(symbol: char, position: SourcePosition) -> CompileError {
    CompileError::MisbalancedSymbol {
        symbol,
        line: position.line,
        column: position.column,
    }
}

/// Compile source into a flat instruction sequence in a single pass.
///
/// Runs of identical operators are coalesced (`+++` becomes one `DerefAdd` of 3)
/// and brackets are matched with a stack. Malformed brackets never make it into
/// the output as invalid jumps: a stray `]` is dropped and an unclosed `[` jumps
/// to the instruction right after itself. Only the first problem is reported.
#[instrument(skip_all, fields(source_len = source.len()))]
pub fn compile(source: &str) -> Compiled {
    let mut instructions = vec![];
    let mut diagnostic = CompileDiagnostic::success();

    // (index of the `[` instruction, where it was in the source)
    let mut open_brackets: Vec<(usize, SourcePosition)> = vec![];

    for token in Lexer::new(source) {
        let Some(op) = Op::from_token(token.kind) else {
            continue;
        };

        match op {
            Op::JumpIfZero => {
                open_brackets.push((instructions.len(), token.position));
                // target is filled in once we find the matching `]`
                instructions.push(Instruction::new(op, 0));
            }
            Op::JumpIfNonZero => match open_brackets.pop() {
                Some((start, _)) => {
                    instructions.push(Instruction::new(op, start + 1));
                    instructions[start].value = instructions.len();
                }
                None => diagnostic.record(misbalanced(token.symbol, token.position)),
            },
            _ => instructions.push(Instruction::new(op, token.run_length)),
        }
    }

    // the bottom of the stack is the outermost bracket that never got closed
    if let Some(&(_, position)) = open_brackets.first() {
        diagnostic.record(misbalanced('[', position));
    }
    for (start, _) in open_brackets {
        instructions[start].value = start + 1;
    }

    if diagnostic.is_success() {
        debug!(instructions = instructions.len(), "compiled");
    } else {
        warn!(error = %diagnostic.message(), "compiled with errors");
    }

    Compiled {
        instructions,
        diagnostic,
    }
}
