//! (only used in test cases)
//! Writes examples to memory

use crate::{ExecutableRegion, WritableRegion};

/// Writes a program equivalent to `fn(x: u64) -> u64 { x * x }` to the given buffer.
pub fn write_square_function(buffer: &mut [u8]) {
    let instructions = [
        // mov rax, rdi
        0x48, 0x89, 0xF8, //
        // imul rax, rdi
        0x48, 0x0F, 0xAF, 0xC7, //
        // ret
        0xC3u8, //
    ];

    let n = instructions.len();
    buffer[0..n].copy_from_slice(&instructions);
}

/// Returns an [ExecutableRegion] with the program created by [write_square_function].
pub fn generate_square_program() -> ExecutableRegion {
    let mut mem = WritableRegion::allocate(4096).unwrap();
    write_square_function(&mut mem[..]);

    mem.into_executable().unwrap()
}

#[cfg(test)]
mod tests {
    use super::generate_square_program;
    use crate::as_function;

    type Square = unsafe extern "C" fn(u64) -> u64;

    #[test]
    fn square_program_runs() {
        let code = generate_square_program();
        let square = unsafe { as_function!(code, Square) };

        assert_eq!(unsafe { square(12) }, 144);
        assert_eq!(unsafe { square(0) }, 0);
    }

    #[test]
    fn dropping_the_region_unmaps_it() {
        let code = generate_square_program();
        let addr = code.addr();
        assert!(!addr.is_null());
        drop(code);
    }
}
