//! Binary loading.
//!
//! Kernel and disk images are raw byte blobs: no ELF parsing, no size
//! validation. The kernel lands at the DRAM base; the disk image becomes
//! the VirtIO backing store.

use std::fs;
use std::process;

use tracing::debug;

/// Reads a binary file into a byte vector.
///
/// Prints an error and exits the process with code 1 if the file cannot be
/// read; a missing image leaves nothing meaningful to emulate.
pub fn load_binary(path: &str) -> Vec<u8> {
    match fs::read(path) {
        Ok(data) => {
            debug!(path, bytes = data.len(), "loaded binary");
            data
        }
        Err(e) => {
            eprintln!("nanoemu: cannot read '{path}': {e}");
            process::exit(1);
        }
    }
}
