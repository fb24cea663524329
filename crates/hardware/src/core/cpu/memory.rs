//! Address translation and memory access.
//!
//! Implements the Sv39 three-level page walk and the translated fetch,
//! load, and store entry points the interpreter uses. The caller of
//! [`Cpu::translate`] chooses the page-fault class to report, since the
//! same walk serves instruction fetches, loads, and stores/AMOs.

use super::Cpu;
use crate::common::Exception;
use crate::common::constants::PAGE_SIZE;

impl Cpu {
    /// Translates a virtual address, reporting failures as `fault`.
    ///
    /// With paging disabled the translation is the identity. Otherwise the
    /// 39-bit virtual address is split into three 9-bit VPN fields and a
    /// 12-bit offset and walked from level 2 down. A leaf at level 1 or 2
    /// maps a 2 MiB or 1 GiB superpage, splicing the lower VPN fields into
    /// the physical address. A bus fault while reading a PTE surfaces as
    /// `fault` too.
    pub fn translate(&mut self, addr: u64, fault: Exception) -> Result<u64, Exception> {
        if !self.enable_paging {
            return Ok(addr);
        }

        let vpn = [
            (addr >> 12) & 0x1ff,
            (addr >> 21) & 0x1ff,
            (addr >> 30) & 0x1ff,
        ];

        let mut a = self.pagetable;
        let mut i = 2usize;
        let pte = loop {
            let pte = self
                .bus
                .load(a + vpn[i] * 8, 64)
                .map_err(|_| fault)?;

            let v = pte & 1 != 0;
            let r = (pte >> 1) & 1 != 0;
            let w = (pte >> 2) & 1 != 0;
            let x = (pte >> 3) & 1 != 0;
            if !v || (!r && w) {
                return Err(fault);
            }

            if r || x {
                break pte;
            }

            if i == 0 {
                return Err(fault);
            }
            i -= 1;
            let ppn = (pte >> 10) & 0x0fff_ffff_ffff;
            a = ppn * PAGE_SIZE;
        };

        let ppn = [
            (pte >> 10) & 0x1ff,
            (pte >> 19) & 0x1ff,
            (pte >> 28) & 0x03ff_ffff,
        ];

        let offset = addr & 0xfff;
        match i {
            0 => {
                let ppn = (pte >> 10) & 0x0fff_ffff_ffff;
                Ok((ppn << 12) | offset)
            }
            1 => Ok((ppn[2] << 30) | (ppn[1] << 21) | (vpn[0] << 12) | offset),
            2 => Ok((ppn[2] << 30) | (vpn[1] << 21) | (vpn[0] << 12) | offset),
            _ => Err(fault),
        }
    }

    /// Fetches the 32-bit instruction at the current PC.
    ///
    /// Translation failures are instruction page faults; a bus fault on the
    /// translated address is an instruction access fault.
    pub fn fetch(&mut self) -> Result<u32, Exception> {
        let ppc = self.translate(self.pc, Exception::InstructionPageFault)?;
        match self.bus.load(ppc, 32) {
            Ok(inst) => Ok(inst as u32),
            Err(_) => Err(Exception::InstructionAccessFault),
        }
    }

    /// Loads `size` bits from virtual address `addr`.
    pub fn load(&mut self, addr: u64, size: u64) -> Result<u64, Exception> {
        let pa = self.translate(addr, Exception::LoadPageFault)?;
        self.bus.load(pa, size)
    }

    /// Stores the low `size` bits of `value` to virtual address `addr`.
    pub fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Exception> {
        let pa = self.translate(addr, Exception::StoreAmoPageFault)?;
        self.bus.store(pa, size, value)
    }
}
