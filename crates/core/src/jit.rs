use jitpage::{as_function, ExecutableRegion, WritableRegion};

/// A program compiled to native code, mapped into the current process and
/// ready to run. The mapping is released when this is dropped.
pub struct CompiledProgram {
    code: ExecutableRegion,
}

/// Signature of the generated function: tape base in, always-zero status
/// out.
type RawProgram = unsafe extern "C" fn(*mut u8) -> u64;

impl CompiledProgram {
    /// Copies a finished image into fresh executable memory.
    ///
    /// Mapping failures are fatal: there is no sensible recovery once the
    /// compiler has produced an image it cannot place.
    pub fn from_binary(binary: &[u8]) -> CompiledProgram {
        let mut mem = WritableRegion::allocate(binary.len())
            .expect("could not map memory for the compiled program");
        mem[0..binary.len()].copy_from_slice(binary);

        CompiledProgram {
            code: mem
                .into_executable()
                .expect("could not make the compiled program executable"),
        }
    }

    /// Runs the program over `tape`, returning the generated code's
    /// status value (always zero).
    ///
    /// The generated code performs no bounds checks: the tape must be at
    /// least as long as the furthest cell the program reaches.
    pub fn run(&self, tape: &mut [u8]) -> u64 {
        let program = unsafe { as_function!(self.code, RawProgram) };

        unsafe { program(tape.as_mut_ptr()) }
    }
}
