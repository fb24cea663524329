//! Simulation utilities and program loading.
//!
//! Provides the host-file side of the emulator: reading kernel and disk
//! images into byte buffers for the CPU and VirtIO device.

pub mod loader;
