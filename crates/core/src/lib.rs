//! The compilation pipeline, from source bytes to runnable native code.
//!
//! The stages, in order:
//!
//!  - [parse] folds the eight Brainfuck symbols into counted
//!    [Instruction]s and rejects unbalanced brackets.
//!  - [ir::lower] splits the instruction list into straight-line blocks
//!    with a marker block for every `[` and `]`.
//!  - the code generator turns each block into x86-64 bytes and patches
//!    the loop branches once the distances between blocks are known.
//!  - [CompiledProgram] owns the executable mapping and calls into it
//!    with the tape base address in `rdi`.
//!
//! Everything before the mapping is ordinary safe code operating on byte
//! vectors; only the final jump into generated code is unsafe.

mod asm;
mod codegen;
mod jit;

pub mod errors;
pub mod ir;
pub mod parsing;

pub use crate::errors::CompilationError;
pub use crate::jit::CompiledProgram;
pub use crate::parsing::{parse, Instruction};

use crate::codegen::CodeGenerator;

/// Length in bytes of the data tape the generated code expects.
pub const TAPE_LEN: usize = 50_000;

/// Compiles a folded instruction list to native code, mapped into the
/// current process.
pub fn jit_compile(ops: &[Instruction]) -> CompiledProgram {
    let program = ir::lower(ops);

    let mut gen = CodeGenerator::new();
    let code = gen.compile(&program);

    CompiledProgram::from_binary(&code)
}
