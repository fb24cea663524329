//! Instruction interpreter.
//!
//! One `execute` call retires one instruction. The supported set is
//! RV64IMA + Zicsr as an xv6-style kernel exercises it: the full base
//! integer ISA, `mul`/`divu`/`remuw` from M, `amoadd`/`amoswap` from A, the
//! CSR instructions, and the privileged returns. Anything else raises an
//! illegal-instruction exception, which the guest kernel is expected to
//! handle.
//!
//! `execute` runs with the PC already advanced past the instruction, so
//! PC-relative arithmetic (`auipc`, branches, `jal`) subtracts 4 to recover
//! the instruction's own address, and `jal`/`jalr` link to the advanced PC
//! directly.

use super::Cpu;
use crate::common::Exception;
use crate::core::arch::PrivilegeMode;
use crate::core::arch::csr;

impl Cpu {
    /// Executes one 32-bit instruction.
    pub fn execute(&mut self, inst: u32) -> Result<(), Exception> {
        let opcode = inst & 0x7f;
        let rd = ((inst >> 7) & 0x1f) as usize;
        let rs1 = ((inst >> 15) & 0x1f) as usize;
        let rs2 = ((inst >> 20) & 0x1f) as usize;
        let funct3 = (inst >> 12) & 0x7;
        let funct7 = (inst >> 25) & 0x7f;

        match opcode {
            // LOAD
            0x03 => {
                let imm = ((inst as i32) >> 20) as u64;
                let addr = self.regs.read(rs1).wrapping_add(imm);
                let value = match funct3 {
                    0x0 => self.load(addr, 8)? as i8 as u64,
                    0x1 => self.load(addr, 16)? as i16 as u64,
                    0x2 => self.load(addr, 32)? as i32 as u64,
                    0x3 => self.load(addr, 64)?,
                    0x4 => self.load(addr, 8)?,
                    0x5 => self.load(addr, 16)?,
                    0x6 => self.load(addr, 32)?,
                    _ => return Err(Exception::IllegalInstruction),
                };
                self.regs.write(rd, value);
            }
            // MISC-MEM
            0x0f => match funct3 {
                // fence: a single hart with a serial memory model has
                // nothing to order.
                0x0 => {}
                _ => return Err(Exception::IllegalInstruction),
            },
            // OP-IMM
            0x13 => {
                let imm = ((inst & 0xfff0_0000) as i32 >> 20) as u64;
                let shamt = (imm & 0x3f) as u32;
                let value = match funct3 {
                    0x0 => self.regs.read(rs1).wrapping_add(imm),
                    0x1 => self.regs.read(rs1) << shamt,
                    0x2 => u64::from((self.regs.read(rs1) as i64) < imm as i64),
                    0x3 => u64::from(self.regs.read(rs1) < imm),
                    0x4 => self.regs.read(rs1) ^ imm,
                    0x5 => match funct7 >> 1 {
                        0x00 => self.regs.read(rs1) >> shamt,
                        0x10 => ((self.regs.read(rs1) as i64) >> shamt) as u64,
                        _ => return Err(Exception::IllegalInstruction),
                    },
                    0x6 => self.regs.read(rs1) | imm,
                    0x7 => self.regs.read(rs1) & imm,
                    _ => return Err(Exception::IllegalInstruction),
                };
                self.regs.write(rd, value);
            }
            // AUIPC
            0x17 => {
                let imm = (inst & 0xffff_f000) as i32 as u64;
                self.regs
                    .write(rd, self.pc.wrapping_add(imm).wrapping_sub(4));
            }
            // OP-IMM-32
            0x1b => {
                let imm = ((inst as i32) >> 20) as u64;
                let shamt = (imm & 0x1f) as u32;
                let value = match funct3 {
                    0x0 => self.regs.read(rs1).wrapping_add(imm) as i32 as u64,
                    0x1 => (self.regs.read(rs1) << shamt) as i32 as u64,
                    0x5 => match funct7 {
                        0x00 => (((self.regs.read(rs1) as u32) >> shamt) as i32) as u64,
                        0x20 => ((self.regs.read(rs1) as i32) >> shamt) as u64,
                        _ => return Err(Exception::IllegalInstruction),
                    },
                    _ => return Err(Exception::IllegalInstruction),
                };
                self.regs.write(rd, value);
            }
            // STORE
            0x23 => {
                let imm = (((inst & 0xfe00_0000) as i32 >> 20) as u64)
                    | u64::from((inst >> 7) & 0x1f);
                let addr = self.regs.read(rs1).wrapping_add(imm);
                let value = self.regs.read(rs2);
                match funct3 {
                    0x0 => self.store(addr, 8, value)?,
                    0x1 => self.store(addr, 16, value)?,
                    0x2 => self.store(addr, 32, value)?,
                    0x3 => self.store(addr, 64, value)?,
                    _ => return Err(Exception::IllegalInstruction),
                }
            }
            // AMO
            0x2f => {
                let funct5 = (funct7 & 0x7c) >> 2;
                let addr = self.regs.read(rs1);
                let src = self.regs.read(rs2);
                // Single hart: every AMO degenerates to load, op, store.
                let old = match (funct3, funct5) {
                    // amoadd.w
                    (0x2, 0x00) => {
                        let t = self.load(addr, 32)?;
                        self.store(addr, 32, t.wrapping_add(src))?;
                        t
                    }
                    // amoadd.d
                    (0x3, 0x00) => {
                        let t = self.load(addr, 64)?;
                        self.store(addr, 64, t.wrapping_add(src))?;
                        t
                    }
                    // amoswap.w
                    (0x2, 0x01) => {
                        let t = self.load(addr, 32)?;
                        self.store(addr, 32, src)?;
                        t
                    }
                    // amoswap.d
                    (0x3, 0x01) => {
                        let t = self.load(addr, 64)?;
                        self.store(addr, 64, src)?;
                        t
                    }
                    _ => return Err(Exception::IllegalInstruction),
                };
                self.regs.write(rd, old);
            }
            // OP
            0x33 => {
                let lhs = self.regs.read(rs1);
                let rhs = self.regs.read(rs2);
                let shamt = (rhs & 0x3f) as u32;
                let value = match (funct3, funct7) {
                    (0x0, 0x00) => lhs.wrapping_add(rhs),
                    (0x0, 0x01) => lhs.wrapping_mul(rhs),
                    (0x0, 0x20) => lhs.wrapping_sub(rhs),
                    (0x1, 0x00) => lhs << shamt,
                    (0x2, 0x00) => u64::from((lhs as i64) < rhs as i64),
                    (0x3, 0x00) => u64::from(lhs < rhs),
                    (0x4, 0x00) => lhs ^ rhs,
                    (0x5, 0x00) => lhs >> shamt,
                    (0x5, 0x20) => ((lhs as i64) >> shamt) as u64,
                    (0x6, 0x00) => lhs | rhs,
                    (0x7, 0x00) => lhs & rhs,
                    _ => return Err(Exception::IllegalInstruction),
                };
                self.regs.write(rd, value);
            }
            // LUI
            0x37 => {
                self.regs.write(rd, (inst & 0xffff_f000) as i32 as u64);
            }
            // OP-32
            0x3b => {
                let lhs = self.regs.read(rs1);
                let rhs = self.regs.read(rs2);
                let shamt = (rhs & 0x1f) as u32;
                let value = match (funct3, funct7) {
                    (0x0, 0x00) => lhs.wrapping_add(rhs) as i32 as u64,
                    (0x0, 0x20) => lhs.wrapping_sub(rhs) as i32 as u64,
                    (0x1, 0x00) => (((lhs as u32) << shamt) as i32) as u64,
                    (0x5, 0x00) => (((lhs as u32) >> shamt) as i32) as u64,
                    // divu operates on the full register width; division by
                    // zero yields all ones.
                    (0x5, 0x01) => {
                        if rhs == 0 {
                            u64::MAX
                        } else {
                            lhs / rhs
                        }
                    }
                    (0x5, 0x20) => ((lhs as i32) >> shamt) as u64,
                    // remuw with divisor zero yields the dividend.
                    (0x7, 0x01) => {
                        if rhs == 0 {
                            lhs
                        } else {
                            (((lhs as u32) % (rhs as u32)) as i32) as u64
                        }
                    }
                    _ => return Err(Exception::IllegalInstruction),
                };
                self.regs.write(rd, value);
            }
            // BRANCH
            0x63 => {
                let imm = (((inst & 0x8000_0000) as i32 >> 19) as u64)
                    | u64::from((inst & 0x80) << 4)
                    | u64::from((inst >> 20) & 0x7e0)
                    | u64::from((inst >> 7) & 0x1e);
                let lhs = self.regs.read(rs1);
                let rhs = self.regs.read(rs2);
                let taken = match funct3 {
                    0x0 => lhs == rhs,
                    0x1 => lhs != rhs,
                    0x4 => (lhs as i64) < rhs as i64,
                    0x5 => (lhs as i64) >= rhs as i64,
                    0x6 => lhs < rhs,
                    0x7 => lhs >= rhs,
                    _ => return Err(Exception::IllegalInstruction),
                };
                if taken {
                    self.pc = self.pc.wrapping_add(imm).wrapping_sub(4);
                }
            }
            // JALR
            0x67 => {
                let t = self.pc;
                let imm = ((inst & 0xfff0_0000) as i32 >> 20) as u64;
                self.pc = self.regs.read(rs1).wrapping_add(imm) & !1;
                self.regs.write(rd, t);
            }
            // JAL
            0x6f => {
                self.regs.write(rd, self.pc);
                let imm = (((inst & 0x8000_0000) as i32 >> 11) as u64)
                    | u64::from(inst & 0xf_f000)
                    | u64::from((inst >> 9) & 0x800)
                    | u64::from((inst >> 20) & 0x7fe);
                self.pc = self.pc.wrapping_add(imm).wrapping_sub(4);
            }
            // SYSTEM
            0x73 => {
                let addr = ((inst & 0xfff0_0000) >> 20) as u16;
                match funct3 {
                    0x0 => {
                        if rs2 == 0x0 && funct7 == 0x0 {
                            // ecall
                            return Err(match self.mode {
                                PrivilegeMode::User => Exception::EcallFromUmode,
                                PrivilegeMode::Supervisor => Exception::EcallFromSmode,
                                PrivilegeMode::Machine => Exception::EcallFromMmode,
                            });
                        } else if rs2 == 0x1 && funct7 == 0x0 {
                            // ebreak
                            return Err(Exception::Breakpoint);
                        } else if rs2 == 0x2 && funct7 == 0x08 {
                            self.sret();
                        } else if rs2 == 0x2 && funct7 == 0x18 {
                            self.mret();
                        } else if funct7 == 0x09 {
                            // sfence.vma: translations are re-walked on
                            // every access, nothing to invalidate.
                        } else {
                            return Err(Exception::IllegalInstruction);
                        }
                    }
                    // csrrw
                    0x1 => {
                        let t = self.csr_read(addr);
                        self.csr_write(addr, self.regs.read(rs1));
                        self.regs.write(rd, t);
                    }
                    // csrrs
                    0x2 => {
                        let t = self.csr_read(addr);
                        self.csr_write(addr, t | self.regs.read(rs1));
                        self.regs.write(rd, t);
                    }
                    // csrrc
                    0x3 => {
                        let t = self.csr_read(addr);
                        self.csr_write(addr, t & !self.regs.read(rs1));
                        self.regs.write(rd, t);
                    }
                    // csrrwi
                    0x5 => {
                        self.regs.write(rd, self.csr_read(addr));
                        self.csr_write(addr, rs1 as u64);
                    }
                    // csrrsi
                    0x6 => {
                        let t = self.csr_read(addr);
                        self.csr_write(addr, t | rs1 as u64);
                        self.regs.write(rd, t);
                    }
                    // csrrci
                    0x7 => {
                        let t = self.csr_read(addr);
                        self.csr_write(addr, t & !(rs1 as u64));
                        self.regs.write(rd, t);
                    }
                    _ => return Err(Exception::IllegalInstruction),
                }
            }
            _ => return Err(Exception::IllegalInstruction),
        }

        Ok(())
    }

    /// Returns from a supervisor trap handler.
    ///
    /// Restores the PC from `sepc` and the mode from `sstatus.SPP`, then
    /// pops the interrupt-enable stack: SIE takes SPIE's value, SPIE is set,
    /// and SPP is cleared back to user.
    fn sret(&mut self) {
        self.pc = self.csr_read(csr::SEPC);

        let sstatus = self.csr_read(csr::SSTATUS);
        self.mode = if (sstatus >> 8) & 1 == 1 {
            PrivilegeMode::Supervisor
        } else {
            PrivilegeMode::User
        };

        let sstatus = if (sstatus >> 5) & 1 == 1 {
            sstatus | (1 << 1)
        } else {
            sstatus & !(1 << 1)
        };
        self.csr_write(csr::SSTATUS, (sstatus | (1 << 5)) & !(1 << 8));
    }

    /// Returns from a machine trap handler.
    ///
    /// Restores the PC from `mepc` and the mode from `mstatus.MPP`, then
    /// pops the interrupt-enable stack: MIE takes MPIE's value, MPIE is set,
    /// and MPP is cleared.
    fn mret(&mut self) {
        self.pc = self.csr_read(csr::MEPC);

        let mstatus = self.csr_read(csr::MSTATUS);
        let mpp = (mstatus >> 11) & 3;
        self.mode = if mpp == 2 {
            PrivilegeMode::Machine
        } else if mpp == 1 {
            PrivilegeMode::Supervisor
        } else {
            PrivilegeMode::User
        };

        let mstatus = if (mstatus >> 7) & 1 == 1 {
            mstatus | (1 << 3)
        } else {
            mstatus & !(1 << 3)
        };
        self.csr_write(csr::MSTATUS, (mstatus | (1 << 7)) & !(3 << 11));
    }
}
