//! Trap delivery and interrupt polling.
//!
//! This module redirects the hart into a trap handler. It performs:
//! 1. **Delegation:** Decides between supervisor and machine delivery from
//!    the previous privilege mode and the delegation mask.
//! 2. **Context Saving:** Writes the xEPC/xCAUSE/xTVAL tuple and updates the
//!    IE/PIE/PP fields of the target status register.
//! 3. **Interrupt Polling:** Samples the devices once per instruction,
//!    routes claims through the PLIC, and picks the highest-priority
//!    pending-and-enabled interrupt.
//!
//! Supervisor and machine delivery are structurally identical, so one
//! helper is parameterized by the target mode's CSR tuple and status-bit
//! layout.

use tracing::trace;

use super::Cpu;
use crate::common::constants::{PLIC_SCLAIM, UART_IRQ, VIRTIO_IRQ};
use crate::common::{Cause, Interrupt};
use crate::core::arch::PrivilegeMode;
use crate::core::arch::csr;

/// CSR addresses and status-bit layout of one trap delivery target.
struct TrapTarget {
    tvec: u16,
    epc: u16,
    cause: u16,
    tval: u16,
    status: u16,
    ie_bit: u64,
    pie_bit: u64,
    pp_mask: u64,
    pp_value: u64,
}

impl Cpu {
    /// Delivers a trap, redirecting the PC into the selected handler.
    ///
    /// The faulting PC is the current PC minus the instruction width, since
    /// the tick loop advances the PC before executing. Delegation sends the
    /// trap to supervisor mode when the previous mode was at most supervisor
    /// and the cause's bit is set in `medeleg` (which gates interrupt causes
    /// here as well; the guest kernel programs both delegation masks
    /// identically).
    pub fn take_trap(&mut self, cause: Cause) {
        let exception_pc = self.pc.wrapping_sub(4);
        let previous_mode = self.mode;
        let cause_bits = cause.bits();

        self.stats.traps_taken += 1;
        if cause.is_interrupt() {
            self.stats.interrupts_taken += 1;
        }
        trace!(
            ?cause,
            epc = %format_args!("{exception_pc:#x}"),
            mode = %previous_mode,
            "taking trap"
        );

        let deleg_bit = (self.csrs.read(csr::MEDELEG) >> (cause_bits as u32 & 0x3f)) & 1;
        if previous_mode <= PrivilegeMode::Supervisor && deleg_bit != 0 {
            self.mode = PrivilegeMode::Supervisor;
            let target = TrapTarget {
                tvec: csr::STVEC,
                epc: csr::SEPC,
                cause: csr::SCAUSE,
                tval: csr::STVAL,
                status: csr::SSTATUS,
                ie_bit: 1 << 1,
                pie_bit: 1 << 5,
                pp_mask: 1 << 8,
                pp_value: if previous_mode == PrivilegeMode::User {
                    0
                } else {
                    1 << 8
                },
            };
            self.deliver(&target, cause, exception_pc);
        } else {
            self.mode = PrivilegeMode::Machine;
            let target = TrapTarget {
                tvec: csr::MTVEC,
                epc: csr::MEPC,
                cause: csr::MCAUSE,
                tval: csr::MTVAL,
                status: csr::MSTATUS,
                ie_bit: 1 << 3,
                pie_bit: 1 << 7,
                pp_mask: 3 << 11,
                pp_value: 0,
            };
            self.deliver(&target, cause, exception_pc);
        }
    }

    /// Writes the trap context into one mode's CSR tuple and redirects.
    ///
    /// Vectored dispatch applies to interrupts only: with bit 0 of xTVEC
    /// set, the handler address is `base + 4 * cause`.
    fn deliver(&mut self, target: &TrapTarget, cause: Cause, exception_pc: u64) {
        let cause_bits = cause.bits();
        let tvec = self.csrs.read(target.tvec);

        let vector = if cause.is_interrupt() && tvec & 1 == 1 {
            cause_bits.wrapping_mul(4)
        } else {
            0
        };
        self.pc = (tvec & !1).wrapping_add(vector);

        self.csrs.write(target.epc, exception_pc & !1);
        self.csrs.write(target.cause, cause_bits);
        self.csrs.write(target.tval, 0);

        let mut status = self.csrs.read(target.status);
        // PIE := IE, IE := 0, PP := previous mode.
        if status & target.ie_bit != 0 {
            status |= target.pie_bit;
        } else {
            status &= !target.pie_bit;
        }
        status &= !target.ie_bit;
        status = (status & !target.pp_mask) | target.pp_value;
        self.csrs.write(target.status, status);
    }

    /// Polls devices and returns the interrupt to take, if any.
    ///
    /// Gated on the current mode's interrupt-enable bit (user mode is never
    /// gated). A device claim is published through the PLIC claim register
    /// and raised as a supervisor external interrupt; the final selection
    /// walks `mie & mip` in fixed priority order, clearing the chosen bit.
    pub fn check_pending_interrupt(&mut self) -> Option<Interrupt> {
        match self.mode {
            PrivilegeMode::Machine => {
                if (self.csrs.read(csr::MSTATUS) >> 3) & 1 == 0 {
                    return None;
                }
            }
            PrivilegeMode::Supervisor => {
                if (self.csrs.read(csr::SSTATUS) >> 1) & 1 == 0 {
                    return None;
                }
            }
            PrivilegeMode::User => {}
        }

        let mut irq = 0;
        if self.bus.uart.is_interrupting() {
            irq = UART_IRQ;
        } else if self.bus.virtio.is_interrupting() {
            // An armed doorbell means the guest queued a disk request; serve
            // it now, then raise the completion interrupt.
            self.bus.disk_access();
            irq = VIRTIO_IRQ;
        }

        if irq != 0 {
            let _ = self.bus.store(PLIC_SCLAIM, 32, irq);
            self.csrs
                .write(csr::MIP, self.csrs.read(csr::MIP) | csr::MIP_SEIP);
        }

        let pending = self.csrs.read(csr::MIE) & self.csrs.read(csr::MIP);
        let claim = |cpu: &mut Cpu, bit: u64, interrupt: Interrupt| {
            cpu.csrs.write(csr::MIP, cpu.csrs.read(csr::MIP) & !bit);
            interrupt
        };

        if pending & csr::MIP_MEIP != 0 {
            return Some(claim(self, csr::MIP_MEIP, Interrupt::MachineExternal));
        }
        if pending & csr::MIP_MSIP != 0 {
            return Some(claim(self, csr::MIP_MSIP, Interrupt::MachineSoftware));
        }
        if pending & csr::MIP_MTIP != 0 {
            return Some(claim(self, csr::MIP_MTIP, Interrupt::MachineTimer));
        }
        if pending & csr::MIP_SEIP != 0 {
            return Some(claim(self, csr::MIP_SEIP, Interrupt::SupervisorExternal));
        }
        if pending & csr::MIP_SSIP != 0 {
            return Some(claim(self, csr::MIP_SSIP, Interrupt::SupervisorSoftware));
        }
        if pending & csr::MIP_STIP != 0 {
            return Some(claim(self, csr::MIP_STIP, Interrupt::SupervisorTimer));
        }

        None
    }
}
