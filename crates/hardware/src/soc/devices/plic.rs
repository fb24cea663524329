//! Platform-Level Interrupt Controller (PLIC).
//!
//! A four-register subset sufficient for an xv6-style kernel: pending bits,
//! the supervisor-context enable, priority-threshold, and claim/complete
//! registers. There is no priority arbitration: the bus writes the active
//! IRQ number straight into `sclaim` when a device asserts, and the guest
//! reads it back to identify the source. 32-bit accesses only.

use crate::common::Exception;
use crate::common::constants::{PLIC_PENDING, PLIC_SCLAIM, PLIC_SENABLE, PLIC_SPRIORITY};

/// PLIC register block.
#[derive(Debug, Default)]
pub struct Plic {
    pending: u32,
    senable: u32,
    spriority: u32,
    sclaim: u32,
}

impl Plic {
    /// Creates a PLIC with all registers cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `size` bits at the absolute address `addr`.
    ///
    /// Only 32-bit accesses are decoded; unknown offsets read zero.
    pub fn load(&self, addr: u64, size: u64) -> Result<u64, Exception> {
        if size != 32 {
            return Err(Exception::LoadAccessFault);
        }
        Ok(u64::from(match addr {
            PLIC_PENDING => self.pending,
            PLIC_SENABLE => self.senable,
            PLIC_SPRIORITY => self.spriority,
            PLIC_SCLAIM => self.sclaim,
            _ => 0,
        }))
    }

    /// Stores `size` bits of `value` at the absolute address `addr`.
    ///
    /// Only 32-bit accesses are decoded; writes to unknown offsets are
    /// silently dropped.
    pub fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Exception> {
        if size != 32 {
            return Err(Exception::StoreAmoAccessFault);
        }
        let value = value as u32;
        match addr {
            PLIC_PENDING => self.pending = value,
            PLIC_SENABLE => self.senable = value,
            PLIC_SPRIORITY => self.spriority = value,
            PLIC_SCLAIM => self.sclaim = value,
            _ => {}
        }
        Ok(())
    }
}
