//! RISC-V general-purpose register file.
//!
//! This module implements the 32-entry integer register file. Register `x0`
//! is hardwired to zero: reads always return 0 and writes are discarded, so
//! the interpreter never has to special-case it.

use std::io::{self, Write};

/// ABI names for the 32 integer registers, used by the register dump.
const ABI_NAMES: [&str; 32] = [
    "zero", " ra ", " sp ", " gp ", " tp ", " t0 ", " t1 ", " t2 ", " s0 ", " s1 ", " a0 ", " a1 ",
    " a2 ", " a3 ", " a4 ", " a5 ", " a6 ", " a7 ", " s2 ", " s3 ", " s4 ", " s5 ", " s6 ", " s7 ",
    " s8 ", " s9 ", " s10", " s11", " t3 ", " t4 ", " t5 ", " t6 ",
];

/// General-purpose register file with `x0` hardwired to zero.
#[derive(Debug)]
pub struct Gpr {
    regs: [u64; 32],
}

impl Gpr {
    /// Creates a register file with all registers cleared.
    pub fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Reads register `idx`; `x0` always reads as zero.
    #[inline]
    pub fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes register `idx`; writes to `x0` are discarded.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Dumps all 32 registers to stdout, four per row with ABI names.
    pub fn dump(&self) {
        let mut out = io::stdout().lock();
        for i in (0..32).step_by(4) {
            let _ = writeln!(
                out,
                "x{:<2}({})=0x{:016x}  x{:<2}({})=0x{:016x}  x{:<2}({})=0x{:016x}  x{:<2}({})=0x{:016x}",
                i,
                ABI_NAMES[i],
                self.read(i),
                i + 1,
                ABI_NAMES[i + 1],
                self.read(i + 1),
                i + 2,
                ABI_NAMES[i + 2],
                self.read(i + 2),
                i + 3,
                ABI_NAMES[i + 3],
                self.read(i + 3),
            );
        }
    }
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}
