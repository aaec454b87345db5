//! brainforge: a JIT-compiling Brainfuck runner for x86-64 Linux.
//!
//! The interesting parts live in `brainforge-core`; this crate is the
//! thin shell around them: command-line handling, reading and scrubbing
//! the source file, and owning the data tape for the duration of the
//! run.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use structopt::StructOpt;

use brainforge_core::{ir, jit_compile, parse, TAPE_LEN};

#[derive(Debug, StructOpt)]
#[structopt(name = "brainforge", about = "JIT-compile and run a Brainfuck program")]
pub struct Opt {
    /// Brainfuck source file
    #[structopt(name = "FILE", parse(from_os_str))]
    file: PathBuf,

    /// Print the folded instruction blocks to stderr before running
    #[structopt(long)]
    dump_ir: bool,

    /// Compile the program but do not run it
    #[structopt(long)]
    no_run: bool,
}

/// Reads, compiles and runs the program named on the command line.
pub fn run(opt: Opt) -> Result<(), Box<dyn Error>> {
    let raw = fs::read(&opt.file)?;
    let source = sanitize(&raw);
    let ops = parse(&source)?;

    if opt.dump_ir {
        ir::print_blocks(&ir::lower(&ops));
    }

    let program = jit_compile(&ops);

    if opt.no_run {
        return Ok(());
    }

    let mut tape = vec![0u8; TAPE_LEN];
    program.run(&mut tape);

    Ok(())
}

/// Strips every byte that is not one of the eight Brainfuck symbols.
fn sanitize(raw: &[u8]) -> Vec<u8> {
    raw.iter()
        .copied()
        .filter(|&byte| {
            matches!(
                byte,
                b'+' | b'-' | b'>' | b'<' | b'.' | b',' | b'[' | b']'
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn sanitize_keeps_only_the_eight_symbols() {
        assert_eq!(sanitize(b"a+b-c[d]e.f,g>h<i\n"), b"+-[].,><");
    }

    #[test]
    fn sanitize_passes_instruction_bytes_through_unchanged() {
        let source = b"++[>+<-].,";
        assert_eq!(sanitize(source), source);
    }
}
