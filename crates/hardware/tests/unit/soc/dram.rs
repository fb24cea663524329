//! DRAM unit tests.
//!
//! Verifies width handling, little-endian byte order, kernel image
//! placement, and bounds checking.

use nanoemu_core::common::Exception;
use nanoemu_core::common::constants::{DRAM_BASE, DRAM_SIZE};
use nanoemu_core::soc::Dram;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Width round-trips
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(8, 0xAB)]
#[case(16, 0xBEEF)]
#[case(32, 0xDEAD_BEEF)]
#[case(64, 0x0123_4567_89AB_CDEF)]
fn store_load_round_trip(#[case] size: u64, #[case] value: u64) {
    let mut dram = Dram::new(&[]);
    let addr = DRAM_BASE + 0x1000;
    dram.store(addr, size, value).unwrap();
    assert_eq!(dram.load(addr, size).unwrap(), value);
}

#[test]
fn narrow_store_leaves_neighbors() {
    let mut dram = Dram::new(&[]);
    let addr = DRAM_BASE + 0x2000;
    dram.store(addr, 64, u64::MAX).unwrap();
    dram.store(addr, 16, 0).unwrap();
    assert_eq!(dram.load(addr, 64).unwrap(), 0xFFFF_FFFF_FFFF_0000);
}

// ══════════════════════════════════════════════════════════
// 2. Little-endian layout
// ══════════════════════════════════════════════════════════

#[test]
fn bytes_are_little_endian() {
    let mut dram = Dram::new(&[]);
    let addr = DRAM_BASE + 0x3000;
    dram.store(addr, 32, 0x1122_3344).unwrap();
    assert_eq!(dram.load(addr, 8).unwrap(), 0x44);
    assert_eq!(dram.load(addr + 1, 8).unwrap(), 0x33);
    assert_eq!(dram.load(addr + 2, 8).unwrap(), 0x22);
    assert_eq!(dram.load(addr + 3, 8).unwrap(), 0x11);
}

// ══════════════════════════════════════════════════════════
// 3. Kernel image placement
// ══════════════════════════════════════════════════════════

#[test]
fn kernel_lands_at_dram_base() {
    let dram = Dram::new(&[0x13, 0x37, 0xAB]);
    assert_eq!(dram.load(DRAM_BASE, 8).unwrap(), 0x13);
    assert_eq!(dram.load(DRAM_BASE + 1, 8).unwrap(), 0x37);
    assert_eq!(dram.load(DRAM_BASE + 2, 8).unwrap(), 0xAB);
    assert_eq!(dram.load(DRAM_BASE + 3, 8).unwrap(), 0);
}

// ══════════════════════════════════════════════════════════
// 4. Faults
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0)]
#[case(12)]
#[case(24)]
#[case(128)]
fn unsupported_width_faults(#[case] size: u64) {
    let mut dram = Dram::new(&[]);
    assert_eq!(
        dram.load(DRAM_BASE, size),
        Err(Exception::LoadAccessFault)
    );
    assert_eq!(
        dram.store(DRAM_BASE, size, 0),
        Err(Exception::StoreAmoAccessFault)
    );
}

#[test]
fn out_of_range_faults() {
    let mut dram = Dram::new(&[]);
    let end = DRAM_BASE + DRAM_SIZE;
    assert_eq!(dram.load(end, 8), Err(Exception::LoadAccessFault));
    assert_eq!(
        dram.store(end, 8, 0),
        Err(Exception::StoreAmoAccessFault)
    );
    // A doubleword straddling the end of DRAM must not be served.
    assert_eq!(dram.load(end - 4, 64), Err(Exception::LoadAccessFault));
    assert_eq!(dram.load(end - 8, 64).map(|_| ()), Ok(()));
}
