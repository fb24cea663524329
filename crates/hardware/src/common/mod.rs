//! Common types shared across the emulator.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Constants:** The guest-physical memory map, IRQ numbers, and paging
//!    constants.
//! 2. **Error Handling:** Exception and interrupt taxonomies and the trap
//!    cause sum type.

/// Guest-physical memory map and system-wide constants.
pub mod constants;

/// Exception, interrupt, and trap-cause definitions.
pub mod error;

pub use error::{Cause, Exception, Interrupt};
