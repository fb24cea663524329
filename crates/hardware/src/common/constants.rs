//! Guest-physical memory map and system-wide constants.
//!
//! The layout mirrors the QEMU `virt` platform, which is what xv6-style
//! kernels are linked against:
//! 1. **DRAM:** 128 MiB starting at `0x8000_0000`.
//! 2. **MMIO blocks:** CLINT, PLIC, UART, and VirtIO windows below DRAM.
//! 3. **IRQ lines:** PLIC source numbers for the UART and the VirtIO disk.

/// Size of emulated DRAM in bytes (128 MiB, enough for xv6).
pub const DRAM_SIZE: u64 = 1024 * 1024 * 128;

/// Guest-physical base address of DRAM.
pub const DRAM_BASE: u64 = 0x8000_0000;

/// Base address of the CLINT register block.
pub const CLINT_BASE: u64 = 0x200_0000;

/// Size of the CLINT register block.
pub const CLINT_SIZE: u64 = 0x10000;

/// Machine timer compare register.
pub const CLINT_MTIMECMP: u64 = CLINT_BASE + 0x4000;

/// Machine timer register.
pub const CLINT_MTIME: u64 = CLINT_BASE + 0xbff8;

/// Base address of the PLIC register block.
pub const PLIC_BASE: u64 = 0xc00_0000;

/// Size of the PLIC register block.
pub const PLIC_SIZE: u64 = 0x400_0000;

/// Interrupt pending register.
pub const PLIC_PENDING: u64 = PLIC_BASE + 0x1000;

/// Supervisor-context interrupt enable register.
pub const PLIC_SENABLE: u64 = PLIC_BASE + 0x2080;

/// Supervisor-context priority threshold register.
pub const PLIC_SPRIORITY: u64 = PLIC_BASE + 0x201000;

/// Supervisor-context claim/complete register.
pub const PLIC_SCLAIM: u64 = PLIC_BASE + 0x201004;

/// Base address of the UART register window.
pub const UART_BASE: u64 = 0x1000_0000;

/// Size of the UART register window.
pub const UART_SIZE: u64 = 0x100;

/// Base address of the VirtIO MMIO window.
pub const VIRTIO_BASE: u64 = 0x1000_1000;

/// Size of the VirtIO MMIO window.
pub const VIRTIO_SIZE: u64 = 0x1000;

/// PLIC source number of the VirtIO block device.
pub const VIRTIO_IRQ: u64 = 1;

/// PLIC source number of the UART.
pub const UART_IRQ: u64 = 10;

/// Page size in bytes (4 KiB).
pub const PAGE_SIZE: u64 = 4096;
