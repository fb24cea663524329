//! Exception and interrupt definitions.
//!
//! This module defines the fault taxonomy of the emulator. It provides:
//! 1. **Exceptions:** All synchronous faults the core can raise, with their
//!    architectural cause codes.
//! 2. **Interrupts:** The asynchronous causes delivered by the polling loop.
//! 3. **Cause:** The sum type handed to the trap engine, encoding the value
//!    written to `mcause`/`scause`.
//!
//! Faults are ordinary data values: device and memory accessors return them
//! through `Result` and the execute loop forwards them to the trap engine.

use thiserror::Error;

/// Synchronous exceptions, with `mcause` codes per the RISC-V privileged
/// specification.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    /// The program counter is not aligned to the instruction size.
    #[error("instruction address misaligned")]
    InstructionAddressMisaligned,
    /// An instruction fetch touched unmapped or invalid memory.
    #[error("instruction access fault")]
    InstructionAccessFault,
    /// The instruction encoding is invalid or unimplemented.
    #[error("illegal instruction")]
    IllegalInstruction,
    /// An `ebreak` was executed.
    #[error("breakpoint")]
    Breakpoint,
    /// A load accessed a misaligned address.
    #[error("load address misaligned")]
    LoadAddressMisaligned,
    /// A load touched unmapped memory or used an unsupported width.
    #[error("load access fault")]
    LoadAccessFault,
    /// A store or AMO accessed a misaligned address.
    #[error("store/AMO address misaligned")]
    StoreAmoAddressMisaligned,
    /// A store or AMO touched unmapped memory or used an unsupported width.
    #[error("store/AMO access fault")]
    StoreAmoAccessFault,
    /// An `ecall` was executed in user mode.
    #[error("environment call from U-mode")]
    EcallFromUmode,
    /// An `ecall` was executed in supervisor mode.
    #[error("environment call from S-mode")]
    EcallFromSmode,
    /// An `ecall` was executed in machine mode.
    #[error("environment call from M-mode")]
    EcallFromMmode,
    /// An instruction fetch failed Sv39 translation.
    #[error("instruction page fault")]
    InstructionPageFault,
    /// A load failed Sv39 translation.
    #[error("load page fault")]
    LoadPageFault,
    /// A store or AMO failed Sv39 translation.
    #[error("store/AMO page fault")]
    StoreAmoPageFault,
}

impl Exception {
    /// Returns the architectural cause code written to `xCAUSE`.
    pub fn code(self) -> u64 {
        match self {
            Exception::InstructionAddressMisaligned => 0,
            Exception::InstructionAccessFault => 1,
            Exception::IllegalInstruction => 2,
            Exception::Breakpoint => 3,
            Exception::LoadAddressMisaligned => 4,
            Exception::LoadAccessFault => 5,
            Exception::StoreAmoAddressMisaligned => 6,
            Exception::StoreAmoAccessFault => 7,
            Exception::EcallFromUmode => 8,
            Exception::EcallFromSmode => 9,
            Exception::EcallFromMmode => 11,
            Exception::InstructionPageFault => 12,
            Exception::LoadPageFault => 13,
            Exception::StoreAmoPageFault => 15,
        }
    }

    /// Returns `true` if the emulator must stop after taking the trap.
    ///
    /// Access faults and misaligned fetches/stores leave the guest with no
    /// sensible continuation; everything else is handled by the guest kernel.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Exception::InstructionAddressMisaligned
                | Exception::InstructionAccessFault
                | Exception::LoadAccessFault
                | Exception::StoreAmoAddressMisaligned
                | Exception::StoreAmoAccessFault
        )
    }
}

/// Asynchronous interrupt causes, with codes per the RISC-V privileged
/// specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Software interrupt targeting user mode.
    UserSoftware,
    /// Software interrupt targeting supervisor mode.
    SupervisorSoftware,
    /// Software interrupt targeting machine mode.
    MachineSoftware,
    /// Timer interrupt targeting user mode.
    UserTimer,
    /// Timer interrupt targeting supervisor mode.
    SupervisorTimer,
    /// Timer interrupt targeting machine mode.
    MachineTimer,
    /// External interrupt targeting user mode.
    UserExternal,
    /// External interrupt targeting supervisor mode.
    SupervisorExternal,
    /// External interrupt targeting machine mode.
    MachineExternal,
}

impl Interrupt {
    /// Returns the architectural cause code (without the interrupt bit).
    pub fn code(self) -> u64 {
        match self {
            Interrupt::UserSoftware => 0,
            Interrupt::SupervisorSoftware => 1,
            Interrupt::MachineSoftware => 3,
            Interrupt::UserTimer => 4,
            Interrupt::SupervisorTimer => 5,
            Interrupt::MachineTimer => 7,
            Interrupt::UserExternal => 8,
            Interrupt::SupervisorExternal => 9,
            Interrupt::MachineExternal => 11,
        }
    }
}

/// A trap cause: either a synchronous exception or an asynchronous interrupt.
///
/// Exactly one is delivered per tick; exceptions take precedence over
/// interrupts because polling happens only after execute completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Synchronous exception raised by fetch or execute.
    Exception(Exception),
    /// Asynchronous interrupt picked up by the polling loop.
    Interrupt(Interrupt),
}

impl Cause {
    /// Returns `true` for interrupt causes.
    pub fn is_interrupt(self) -> bool {
        matches!(self, Cause::Interrupt(_))
    }

    /// Returns the raw value written to `mcause`/`scause`.
    ///
    /// Interrupt causes carry bit 63; exception causes are the code itself.
    pub fn bits(self) -> u64 {
        match self {
            Cause::Exception(e) => e.code(),
            Cause::Interrupt(i) => (1 << 63) | i.code(),
        }
    }
}

impl From<Exception> for Cause {
    fn from(e: Exception) -> Self {
        Cause::Exception(e)
    }
}

impl From<Interrupt> for Cause {
    fn from(i: Interrupt) -> Self {
        Cause::Interrupt(i)
    }
}
