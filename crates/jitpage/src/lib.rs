//! Tiny wrappers around `mmap(2)` for JIT compilers on Linux.
//!
//! A region of memory moves through three states, one type per state:
//! a fresh [MappedRegion] has no access rights at all, a [WritableRegion]
//! accepts machine code, and an [ExecutableRegion] can be jumped to but
//! never written again. Writable and executable never overlap.
//!
//! The mapping is unmapped when the owning region is dropped.

mod error;
mod executable_region;
mod mapped_region;
mod writable_region;

pub mod examples;

pub use crate::error::{MappingError, Result};
pub use crate::executable_region::ExecutableRegion;
pub use crate::mapped_region::MappedRegion;
pub use crate::writable_region::WritableRegion;

/// Casts an [ExecutableRegion]'s base address to a callable function type.
///
/// # Safety
///
/// The region must contain valid machine code whose entry point sits at
/// the base address and whose calling convention matches `$fn_type`.
#[macro_export]
macro_rules! as_function {
    ($region:expr, $fn_type:ty) => {
        std::mem::transmute::<*const u8, $fn_type>($region.addr())
    };
}
