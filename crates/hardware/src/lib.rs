//! RISC-V RV64 system emulator library.
//!
//! This crate implements a single-hart RV64IMA+Zicsr emulator able to boot an
//! xv6-style kernel built for the QEMU `virt` platform. It provides:
//! 1. **Core:** Fetch/decode/execute interpreter, CSR file, Sv39 page walker,
//!    and delegation-aware trap delivery.
//! 2. **SoC:** Bus interconnect, DRAM, and MMIO devices (UART, CLINT, PLIC,
//!    VirtIO block) matching the QEMU `virt` memory map.
//! 3. **Simulation:** Binary loading and run statistics.

/// Common types and constants (memory map, IRQ lines, faults, interrupts).
pub mod common;
/// CPU core (architectural state, memory access, CSR access, traps).
pub mod core;
/// Simulation utilities: binary loading.
pub mod sim;
/// System-on-chip (bus, DRAM, MMIO devices).
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;

/// Main CPU type; owns the bus and all architectural state.
pub use crate::core::Cpu;
/// System bus; routes physical accesses to DRAM and MMIO devices.
pub use crate::soc::Bus;
