//! Emulated DRAM.
//!
//! A flat little-endian byte buffer mapped at [`DRAM_BASE`]. The kernel
//! image is copied to offset 0 at construction; afterwards the buffer is
//! mutated only through the bus (CPU loads/stores and VirtIO DMA).

use crate::common::Exception;
use crate::common::constants::{DRAM_BASE, DRAM_SIZE};

/// Emulated DRAM backing store.
pub struct Dram {
    data: Vec<u8>,
}

impl Dram {
    /// Creates DRAM with the kernel image copied to offset 0.
    ///
    /// An image larger than DRAM is truncated to the DRAM size.
    pub fn new(code: &[u8]) -> Self {
        let mut data = vec![0; DRAM_SIZE as usize];
        let len = code.len().min(data.len());
        data[..len].copy_from_slice(&code[..len]);
        Self { data }
    }

    /// Resolves a guest-physical range to a buffer offset, faulting with
    /// `fault` when any byte falls outside the backing store.
    fn index(&self, addr: u64, bytes: u64, fault: Exception) -> Result<usize, Exception> {
        let index = addr.wrapping_sub(DRAM_BASE);
        if index.checked_add(bytes).is_none_or(|end| end > self.data.len() as u64) {
            return Err(fault);
        }
        Ok(index as usize)
    }

    /// Loads `size` bits (8/16/32/64) little-endian at `addr`.
    ///
    /// Any other size, or an out-of-range address, is a load access fault.
    pub fn load(&self, addr: u64, size: u64) -> Result<u64, Exception> {
        if !matches!(size, 8 | 16 | 32 | 64) {
            return Err(Exception::LoadAccessFault);
        }
        let bytes = size / 8;
        let index = self.index(addr, bytes, Exception::LoadAccessFault)?;
        let mut raw = [0u8; 8];
        raw[..bytes as usize].copy_from_slice(&self.data[index..index + bytes as usize]);
        Ok(u64::from_le_bytes(raw))
    }

    /// Stores the low `size` bits (8/16/32/64) of `value` little-endian at
    /// `addr`.
    ///
    /// Any other size, or an out-of-range address, is a store access fault.
    pub fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Exception> {
        if !matches!(size, 8 | 16 | 32 | 64) {
            return Err(Exception::StoreAmoAccessFault);
        }
        let bytes = size / 8;
        let index = self.index(addr, bytes, Exception::StoreAmoAccessFault)?;
        let raw = value.to_le_bytes();
        self.data[index..index + bytes as usize].copy_from_slice(&raw[..bytes as usize]);
        Ok(())
    }
}
