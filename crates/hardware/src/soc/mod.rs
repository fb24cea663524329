//! System-on-chip components.
//!
//! This module organizes the emulated system around the CPU: the bus that
//! routes guest-physical accesses, the DRAM it fronts, and the MMIO devices
//! of the QEMU `virt` platform.

/// Memory-mapped I/O device implementations.
pub mod devices;

/// System bus and the VirtIO descriptor pump.
pub mod interconnect;

/// Emulated DRAM.
pub mod memory;

pub use interconnect::Bus;
pub use memory::Dram;
