//! CPU core definition and tick loop.
//!
//! This module defines the `Cpu` structure holding all architectural state
//! and drives the per-instruction cycle:
//! 1. **State:** Register file, program counter, CSR file, privilege mode,
//!    paging state, and the owned bus.
//! 2. **Tick:** Fetch, PC advance, execute, and interrupt polling, with trap
//!    delivery between each step.
//! 3. **Observability:** Register and CSR dumps for end-of-run reporting.

/// CSR access with paging side effects.
pub mod csr;

/// Instruction interpreter.
pub mod execution;

/// Address translation and memory access.
pub mod memory;

/// Trap delivery and interrupt polling.
pub mod trap;

use std::io::{self, Write};

use crate::common::constants::{DRAM_BASE, DRAM_SIZE};
use crate::common::{Cause, Exception};
use crate::core::arch::csr as csr_addr;
use crate::core::arch::{CsrFile, Gpr, PrivilegeMode};
use crate::soc::devices::Virtio;
use crate::soc::{Bus, Dram};
use crate::stats::SimStats;

/// Index of the stack pointer register (`x2`).
const REG_SP: usize = 2;

/// Single RV64 hart: registers, CSRs, paging state, and the system bus.
pub struct Cpu {
    /// Integer register file.
    pub regs: Gpr,
    /// Program counter.
    pub pc: u64,
    /// Control and status register file.
    pub csrs: CsrFile,
    /// Current privilege mode.
    pub mode: PrivilegeMode,
    /// System bus and devices.
    pub bus: Bus,
    /// Whether Sv39 translation is active.
    pub enable_paging: bool,
    /// Guest-physical address of the root page table.
    pub pagetable: u64,
    /// Run statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a hart at reset with `code` loaded at the DRAM base and
    /// `disk` backing the VirtIO block device.
    ///
    /// Reset state: `pc` at the DRAM base, stack pointer at the top of DRAM,
    /// machine mode, paging disabled, all CSRs zero.
    pub fn new(code: &[u8], disk: Vec<u8>) -> Self {
        let mut regs = Gpr::new();
        regs.write(REG_SP, DRAM_BASE + DRAM_SIZE);

        Self {
            regs,
            pc: DRAM_BASE,
            csrs: CsrFile::new(),
            mode: PrivilegeMode::Machine,
            bus: Bus::new(Dram::new(code), Virtio::new(disk)),
            enable_paging: false,
            pagetable: 0,
            stats: SimStats::default(),
        }
    }

    /// Runs one instruction cycle: fetch, advance, execute, poll interrupts.
    ///
    /// Non-fatal exceptions are delivered to the guest and execution
    /// continues from the handler. A fatal exception is delivered and then
    /// returned, signalling the caller to stop.
    ///
    /// A failed fetch substitutes instruction 0, which executes as an
    /// illegal instruction and lands the guest in its trap handler with the
    /// PC already redirected.
    pub fn tick(&mut self) -> Result<(), Exception> {
        let inst = match self.fetch() {
            Ok(inst) => inst,
            Err(e) => {
                self.take_trap(Cause::Exception(e));
                if e.is_fatal() {
                    return Err(e);
                }
                0
            }
        };

        self.pc = self.pc.wrapping_add(4);

        if let Err(e) = self.execute(inst) {
            self.take_trap(Cause::Exception(e));
            if e.is_fatal() {
                return Err(e);
            }
        }

        self.stats.instructions_retired += 1;

        if let Some(interrupt) = self.check_pending_interrupt() {
            self.take_trap(Cause::Interrupt(interrupt));
        }

        Ok(())
    }

    /// Dumps the 32 integer registers to stdout.
    pub fn dump_registers(&self) {
        self.regs.dump();
    }

    /// Dumps the machine and supervisor trap CSRs to stdout.
    pub fn dump_csrs(&self) {
        let mut out = io::stdout().lock();
        let _ = writeln!(
            out,
            "mstatus=0x{:016x} mtvec=0x{:016x} mepc=0x{:016x} mcause=0x{:016x}",
            self.csr_read(csr_addr::MSTATUS),
            self.csr_read(csr_addr::MTVEC),
            self.csr_read(csr_addr::MEPC),
            self.csr_read(csr_addr::MCAUSE),
        );
        let _ = writeln!(
            out,
            "sstatus=0x{:016x} stvec=0x{:016x} sepc=0x{:016x} scause=0x{:016x}",
            self.csr_read(csr_addr::SSTATUS),
            self.csr_read(csr_addr::STVEC),
            self.csr_read(csr_addr::SEPC),
            self.csr_read(csr_addr::SCAUSE),
        );
    }
}
