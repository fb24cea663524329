//! CSR access with paging side effects.
//!
//! The raw 4096-slot file lives in [`crate::core::arch::CsrFile`]; this
//! layer is what the CSR instructions go through, so a write that targets
//! `satp` re-derives the paging state immediately.

use tracing::trace;

use super::Cpu;
use crate::common::constants::PAGE_SIZE;
use crate::core::arch::csr;

impl Cpu {
    /// Reads the CSR at `addr` (with the SIE alias applied).
    pub fn csr_read(&self, addr: u16) -> u64 {
        self.csrs.read(addr)
    }

    /// Writes the CSR at `addr`, re-deriving paging state on `satp` writes.
    pub fn csr_write(&mut self, addr: u16, value: u64) {
        self.csrs.write(addr, value);
        if addr == csr::SATP {
            self.update_paging();
        }
    }

    /// Recomputes the root page-table address and paging enable from `satp`.
    ///
    /// Mode 8 selects Sv39; every other mode value leaves translation off.
    fn update_paging(&mut self) {
        let satp = self.csrs.read(csr::SATP);
        self.pagetable = (satp & ((1 << 44) - 1)) * PAGE_SIZE;
        self.enable_paging = satp >> 60 == 8;
        trace!(
            satp = %format_args!("{satp:#x}"),
            enabled = self.enable_paging,
            root = %format_args!("{:#x}", self.pagetable),
            "paging update"
        );
    }
}
