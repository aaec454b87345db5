//! The frontend: folds runs of Brainfuck operators into counted instructions.

use crate::errors::{CompilationError, Reason};

/// One folded Brainfuck operation.
///
/// A run of `+`/`-` collapses into a single [Add] or [Sub] holding the net
/// change; a run of `>`/`<` collapses the same way into [Right] or [Left].
/// The loop markers carry no payload; their partner is found positionally
/// when the branches are resolved.
///
/// [Add]: Instruction::Add
/// [Sub]: Instruction::Sub
/// [Right]: Instruction::Right
/// [Left]: Instruction::Left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Add(u8),
    Sub(u8),
    Right(u32),
    Left(u32),
    Write,
    Read,
    Loop,
    EndLoop,
}

/// Largest pointer shift that still fits the sign-extended imm32 encoding.
const MAX_SHIFT: i64 = i32::MAX as i64;

/// Parses source bytes into a folded instruction list.
///
/// Bracket balance is validated here: a stray `]` fails as soon as it is
/// seen, a missing `]` fails at the end of input. Bytes outside the
/// eight-symbol set are skipped (the CLI strips them up front; skipping
/// keeps this function total).
pub fn parse(source: &[u8]) -> Result<Vec<Instruction>, CompilationError> {
    use Instruction::*;

    let mut ops = Vec::new();
    let mut depth: u32 = 0;
    let mut i = 0;

    while i < source.len() {
        match source[i] {
            b'+' | b'-' => {
                let mut total: i64 = 0;
                while i < source.len() {
                    match source[i] {
                        b'+' => total += 1,
                        b'-' => total -= 1,
                        _ => break,
                    }
                    i += 1;
                }
                push_cell_arithmetic(&mut ops, total);
            }
            b'>' | b'<' => {
                let mut total: i64 = 0;
                while i < source.len() {
                    match source[i] {
                        b'>' => total += 1,
                        b'<' => total -= 1,
                        _ => break,
                    }
                    i += 1;
                }
                push_pointer_shift(&mut ops, total);
            }
            b'.' => {
                ops.push(Write);
                i += 1;
            }
            b',' => {
                ops.push(Read);
                i += 1;
            }
            b'[' => {
                depth += 1;
                ops.push(Loop);
                i += 1;
            }
            b']' => {
                if depth == 0 {
                    return Err(CompilationError::new(Reason::TooManyCloseBrackets));
                }
                depth -= 1;
                ops.push(EndLoop);
                i += 1;
            }
            _ => i += 1,
        }
    }

    if depth > 0 {
        return Err(CompilationError::new(Reason::NotEnoughCloseBrackets));
    }

    Ok(ops)
}

/// Emits the net cell change of one `+`/`-` run, split into chunks an
/// 8-bit immediate can carry. A run that folds to zero emits nothing.
fn push_cell_arithmetic(ops: &mut Vec<Instruction>, mut total: i64) {
    use Instruction::{Add, Sub};

    while total > 0 {
        let chunk = total.min(u8::MAX as i64);
        ops.push(Add(chunk as u8));
        total -= chunk;
    }
    while total < 0 {
        let chunk = (-total).min(u8::MAX as i64);
        ops.push(Sub(chunk as u8));
        total += chunk;
    }
}

/// Emits the net pointer shift of one `>`/`<` run, split so every count
/// fits a 32-bit branchless add/sub immediate.
fn push_pointer_shift(ops: &mut Vec<Instruction>, mut total: i64) {
    use Instruction::{Left, Right};

    while total > 0 {
        let chunk = total.min(MAX_SHIFT);
        ops.push(Right(chunk as u32));
        total -= chunk;
    }
    while total < 0 {
        let chunk = (-total).min(MAX_SHIFT);
        ops.push(Left(chunk as u32));
        total += chunk;
    }
}
