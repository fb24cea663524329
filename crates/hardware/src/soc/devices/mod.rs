//! Memory-mapped I/O devices.
//!
//! The four MMIO devices of the emulated platform: the CLINT timer block,
//! the PLIC external-interrupt controller, a minimal 16550-style UART, and
//! a legacy VirtIO block device. Each exposes `load`/`store` taking absolute
//! guest-physical addresses and a width in bits, faulting on widths the real
//! device would not decode.

/// Core-local interruptor (timer registers).
pub mod clint;

/// Platform-level interrupt controller.
pub mod plic;

/// 16550-style serial port with a background stdin reader.
pub mod uart;

/// VirtIO block device (legacy MMIO interface).
pub mod virtio;

pub use clint::Clint;
pub use plic::Plic;
pub use uart::Uart;
pub use virtio::Virtio;
