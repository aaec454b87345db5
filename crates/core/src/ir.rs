//! The block-structured form the code generator consumes.

use crate::parsing::Instruction;

/// A program split at loop boundaries.
///
/// Every `[` and `]` gets a single-instruction block of its own, with a
/// straight-line block (possibly empty) on either side. Per-block byte
/// lengths are then all the branch resolver needs to measure jump
/// distances.
#[derive(Debug)]
pub struct Program {
    blocks: Vec<Block>,
}

/// A maximal straight-line run of instructions, or a single loop marker.
#[derive(Debug)]
pub struct Block {
    instructions: Vec<Instruction>,
}

/// The three shapes a [Block] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    StraightLine,
    LoopOpen,
    LoopClose,
}

impl Program {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

impl Block {
    fn new(instructions: Vec<Instruction>) -> Self {
        Block { instructions }
    }

    /// Return a borrowed view into all instructions in this block.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Straight-line blocks never contain a loop marker, so the first
    /// instruction determines the shape.
    pub fn kind(&self) -> BlockKind {
        match self.instructions.first() {
            Some(Instruction::Loop) => BlockKind::LoopOpen,
            Some(Instruction::EndLoop) => BlockKind::LoopClose,
            _ => BlockKind::StraightLine,
        }
    }
}

/// Splits a folded instruction list into blocks.
pub fn lower(ops: &[Instruction]) -> Program {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for &op in ops {
        match op {
            Instruction::Loop | Instruction::EndLoop => {
                blocks.push(Block::new(current));
                blocks.push(Block::new(vec![op]));
                current = Vec::new();
            }
            _ => current.push(op),
        }
    }

    blocks.push(Block::new(current));

    Program { blocks }
}

/// Prints one stanza per block to stderr. Wired to `--dump-ir`.
pub fn print_blocks(program: &Program) {
    for (i, block) in program.blocks().iter().enumerate() {
        eprintln!("Block {}", i);
        for instr in block.instructions() {
            eprintln!("  {:?}", instr);
        }
    }
}
