//! Generates machine code for a given program.

use std::convert::TryFrom;

use crate::asm::amd64::{Amd64Assembly, AL, R64, R8, RAX, RBX, RCX, RDI, RDX, RSI};
use crate::ir::{BlockKind, Program};
use crate::parsing::Instruction;

// REGISTERS:
//
// rcx                - data pointer (address of the current tape cell)
const PTR: R64 = RCX;
// al                 - scratch byte for cell arithmetic and loop tests
const CELL: R8 = AL;
// rbx (callee-saved) - parks the data pointer across `syscall`, which
//                      clobbers rcx and r11
const SAVED_PTR: R64 = RBX;

/// Bytes of the `mov al, [rcx]; cmp al, 0; jz/jnz rel32` sequence that
/// branch resolution writes into every loop-marker block.
const LOOP_SEQ_LEN: usize = 10;

/// Takes a block program and compiles it to a flat x86-64 image.
///
/// One buffer per block: straight-line blocks are filled up front,
/// loop-marker blocks stay empty until the distance to their partner is
/// known, and finally everything is concatenated behind the prologue.
pub struct CodeGenerator {
    buffers: Vec<Amd64Assembly>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        CodeGenerator {
            buffers: Vec::new(),
        }
    }

    pub fn compile(&mut self, program: &Program) -> Vec<u8> {
        self.emit_prologue();

        for block in program.blocks() {
            let mut asm = Amd64Assembly::new();
            for &instr in block.instructions() {
                generate_instruction(&mut asm, instr);
            }
            self.buffers.push(asm);
        }

        self.resolve_branches(program);
        self.emit_epilogue();

        let mut image = Vec::new();
        for buffer in &self.buffers {
            image.extend_from_slice(buffer.code());
        }
        image
    }

    // The generated function follows the SysV AMD64 convention: the tape
    // base arrives in rdi and is parked in rcx for the duration. rbx is
    // callee-saved and the syscall sequences scribble on it, so it is
    // preserved around the whole function.
    fn emit_prologue(&mut self) {
        let mut asm = Amd64Assembly::new();
        asm.push(SAVED_PTR);
        asm.mov(PTR, RDI);
        self.buffers.push(asm);
    }

    fn emit_epilogue(&mut self) {
        let mut asm = Amd64Assembly::new();
        asm.mov_imm64(RAX, 0);
        asm.pop(SAVED_PTR);
        asm.ret();
        self.buffers.push(asm);
    }

    /// Writes the conditional branches for every `[`/`]` pair.
    ///
    /// A single left-to-right walk with a stack resolves inner loops
    /// before outer ones, so by the time a pair is patched the byte
    /// lengths of everything between its markers are final.
    ///
    /// Displacements are measured from the byte after the rel32 field:
    /// the forward `jz` lands just past the closer's `jnz`, the backward
    /// `jnz` lands just past the opener's `jz`. The two distances are
    /// therefore equal in magnitude: bytes-between plus one branch
    /// sequence.
    fn resolve_branches(&mut self, program: &Program) {
        let mut open_loops: Vec<usize> = Vec::new();

        for (i, block) in program.blocks().iter().enumerate() {
            match block.kind() {
                BlockKind::StraightLine => {}
                BlockKind::LoopOpen => open_loops.push(i),
                BlockKind::LoopClose => {
                    let o = open_loops
                        .pop()
                        .expect("unbalanced loops survived parsing");

                    // buffers[0] is the prologue, so block j lives in
                    // buffers[j + 1]
                    let between: usize = self.buffers[o + 2..=i]
                        .iter()
                        .map(Amd64Assembly::len)
                        .sum();
                    let distance = i32::try_from(between + LOOP_SEQ_LEN)
                        .expect("loop body exceeds the rel32 branch range");

                    let opener = &mut self.buffers[o + 1];
                    opener.load_byte(CELL, PTR);
                    opener.al_cmp(0);
                    opener.jz(distance);
                    debug_assert_eq!(opener.len(), LOOP_SEQ_LEN);

                    let closer = &mut self.buffers[i + 1];
                    closer.load_byte(CELL, PTR);
                    closer.al_cmp(0);
                    closer.jnz(-distance);
                    debug_assert_eq!(closer.len(), LOOP_SEQ_LEN);
                }
            }
        }
    }
}

fn generate_instruction(asm: &mut Amd64Assembly, instr: Instruction) {
    use Instruction::*;

    match instr {
        Add(n) => {
            asm.load_byte(CELL, PTR);
            asm.al_add(n);
            asm.store_byte(PTR, CELL);
        }
        Sub(n) => {
            asm.load_byte(CELL, PTR);
            asm.al_sub(n);
            asm.store_byte(PTR, CELL);
        }
        Right(n) => asm.add_imm(PTR, n),
        Left(n) => asm.sub_imm(PTR, n),
        Write => generate_syscall(asm, 1, 1),
        Read => generate_syscall(asm, 0, 0),
        // branch sequences need the distance to the partner block, so
        // they are emitted during resolution instead
        Loop | EndLoop => {}
    }
}

/// One-byte `read(2)` or `write(2)` on the current cell.
fn generate_syscall(asm: &mut Amd64Assembly, number: u64, fd: u64) {
    asm.mov_imm64(RAX, number);
    asm.mov_imm64(RDI, fd);
    asm.mov(RSI, PTR);
    asm.mov_imm64(RDX, 1);
    asm.mov(SAVED_PTR, PTR);
    asm.syscall();
    asm.mov(PTR, SAVED_PTR);
}
