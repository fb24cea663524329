//! Core-Local Interruptor (CLINT).
//!
//! Holds the machine timer registers `mtime` and `mtimecmp`. Only the two
//! known offsets are backed; the rest of the block reads as zero and drops
//! writes. The real CLINT is accessed at 64-bit width only, so narrower
//! accesses fault.

use crate::common::Exception;
use crate::common::constants::{CLINT_MTIME, CLINT_MTIMECMP};

/// CLINT timer register block.
#[derive(Debug, Default)]
pub struct Clint {
    mtime: u64,
    mtimecmp: u64,
}

impl Clint {
    /// Creates a CLINT with both timer registers cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `size` bits at the absolute address `addr`.
    ///
    /// Only 64-bit accesses are decoded; unknown offsets read zero.
    pub fn load(&self, addr: u64, size: u64) -> Result<u64, Exception> {
        if size != 64 {
            return Err(Exception::LoadAccessFault);
        }
        Ok(match addr {
            CLINT_MTIMECMP => self.mtimecmp,
            CLINT_MTIME => self.mtime,
            _ => 0,
        })
    }

    /// Stores `size` bits of `value` at the absolute address `addr`.
    ///
    /// Only 64-bit accesses are decoded; writes to unknown offsets are
    /// silently dropped.
    pub fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Exception> {
        if size != 64 {
            return Err(Exception::StoreAmoAccessFault);
        }
        match addr {
            CLINT_MTIMECMP => self.mtimecmp = value,
            CLINT_MTIME => self.mtime = value,
            _ => {}
        }
        Ok(())
    }
}
