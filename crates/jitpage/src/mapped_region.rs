use std::ptr;

use errno::errno;
use libc::{c_void, size_t, MAP_ANONYMOUS, MAP_PRIVATE, PROT_NONE};

use crate::error::Result;

/// An anonymous, private memory mapping with no access rights yet.
///
/// This is the root of the W^X lifecycle: pages start inaccessible, are
/// re-protected read-write while machine code is copied in, and finish
/// read-execute. The mapping is released on drop.
pub struct MappedRegion {
    addr: *mut c_void,
    len: size_t,
}

impl MappedRegion {
    /// Maps `size` bytes of fresh memory.
    pub fn allocate(size: usize) -> Result<Self> {
        let memory = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                PROT_NONE,
                MAP_PRIVATE | MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if memory == libc::MAP_FAILED {
            return Err(errno().into());
        }

        Ok(MappedRegion {
            addr: memory,
            len: size,
        })
    }

    /// Returns the base address of the mapping.
    pub fn addr(&self) -> *const u8 {
        self.addr as *const u8
    }

    pub(crate) fn addr_mut(&self) -> *mut c_void {
        self.addr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.addr, self.len);
        }
        self.addr = ptr::null_mut();
        self.len = 0;
    }
}
