//! RISC-V RV64 emulator CLI.
//!
//! This binary wires the emulator core to the host: it loads the kernel and
//! optional disk image as raw byte blobs, runs the fetch/execute loop until
//! a fatal exception, and prints the final register and CSR dumps to
//! stdout. Guest console output goes to stdout; diagnostics (tracing) go to
//! stderr so the two streams never interleave.

use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use nanoemu_core::Cpu;
use nanoemu_core::sim::loader;

#[derive(Parser, Debug)]
#[command(
    name = "nanoemu",
    version,
    about = "RISC-V RV64 system emulator for xv6-style kernels",
    long_about = "Boots a raw kernel binary built for the QEMU virt platform.\n\
                  The kernel is copied to the DRAM base (0x8000_0000); the optional\n\
                  disk image backs a VirtIO block device with 512-byte sectors.\n\n\
                  Examples:\n  nanoemu kernel.bin\n  nanoemu kernel.bin fs.img"
)]
struct Cli {
    /// Kernel binary, copied to the DRAM base.
    kernel: String,

    /// Raw disk image backing the VirtIO block device.
    disk: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Bad argument counts must exit with code 1; clap's default error path
    // exits with 2. Help and version keep their usual exit status.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit();
        }
        let _ = e.print();
        process::exit(1);
    });

    let kernel = loader::load_binary(&cli.kernel);
    let disk = cli
        .disk
        .as_deref()
        .map(loader::load_binary)
        .unwrap_or_default();

    let mut cpu = Cpu::new(&kernel, disk);
    drop(kernel);

    loop {
        if let Err(e) = cpu.tick() {
            warn!(error = %e, pc = %format_args!("{:#x}", cpu.pc), "halting on fatal exception");
            break;
        }
    }

    cpu.dump_registers();
    println!("{}", "-".repeat(118));
    cpu.dump_csrs();
    cpu.stats.print();
}
