//! Sv39 page walker unit tests.
//!
//! Page tables are staged directly in DRAM through the bus, then exercised
//! through `translate`, `load`, and `store` with each page-fault class.

use crate::common::cpu_with_program;
use nanoemu_core::common::Exception;
use nanoemu_core::core::Cpu;
use nanoemu_core::core::arch::csr::{MCAUSE, MEPC, MTVEC, SATP};

/// PTE valid bit.
const V: u64 = 1 << 0;
/// PTE read bit.
const R: u64 = 1 << 1;
/// PTE write bit.
const W: u64 = 1 << 2;
/// PTE execute bit.
const X: u64 = 1 << 3;

/// Root page table lives in the second DRAM page.
const ROOT: u64 = 0x8000_1000;
const L1: u64 = 0x8000_2000;
const L0: u64 = 0x8000_3000;

fn pte(ppn: u64, flags: u64) -> u64 {
    (ppn << 10) | flags
}

/// Boots a hart with Sv39 enabled and the root table at `ROOT`.
fn paging_cpu() -> Cpu {
    let mut cpu = cpu_with_program(&[]);
    cpu.csr_write(SATP, (8 << 60) | (ROOT >> 12));
    cpu
}

fn write_pte(cpu: &mut Cpu, table: u64, index: u64, entry: u64) {
    cpu.bus.store(table + index * 8, 64, entry).unwrap();
}

// ══════════════════════════════════════════════════════════
// 1. Identity when disabled
// ══════════════════════════════════════════════════════════

#[test]
fn translation_is_identity_without_paging() {
    let mut cpu = cpu_with_program(&[]);
    assert_eq!(
        cpu.translate(0xdead_beef, Exception::LoadPageFault),
        Ok(0xdead_beef)
    );
}

// ══════════════════════════════════════════════════════════
// 2. Three-level walk
// ══════════════════════════════════════════════════════════

#[test]
fn three_level_walk_maps_a_4k_page() {
    let mut cpu = paging_cpu();
    // va 0x1000: vpn2 = 0, vpn1 = 0, vpn0 = 1 -> pa 0x8000_4000.
    write_pte(&mut cpu, ROOT, 0, pte(L1 >> 12, V));
    write_pte(&mut cpu, L1, 0, pte(L0 >> 12, V));
    write_pte(&mut cpu, L0, 1, pte(0x80004, V | R | W | X));

    assert_eq!(
        cpu.translate(0x1234, Exception::LoadPageFault),
        Ok(0x8000_4234)
    );

    cpu.store(0x1238, 64, 0xfeed_f00d).unwrap();
    assert_eq!(cpu.load(0x1238, 64).unwrap(), 0xfeed_f00d);
    assert_eq!(cpu.bus.load(0x8000_4238, 64).unwrap(), 0xfeed_f00d);
}

#[test]
fn level_one_leaf_maps_a_2m_superpage() {
    let mut cpu = paging_cpu();
    // va 0x0020_1234: vpn2 = 0, vpn1 = 1, vpn0 = 1.
    // Leaf PPN 0x80200 is 2 MiB aligned; vpn0 passes through.
    write_pte(&mut cpu, ROOT, 0, pte(L1 >> 12, V));
    write_pte(&mut cpu, L1, 1, pte(0x80200, V | R | W | X));

    assert_eq!(
        cpu.translate(0x0020_1234, Exception::LoadPageFault),
        Ok(0x8020_1234)
    );
}

#[test]
fn level_two_leaf_maps_a_1g_superpage() {
    let mut cpu = paging_cpu();
    // va 0x8000_0000: vpn2 = 2. Leaf PPN 0x80000 is 1 GiB aligned, so DRAM
    // maps to itself; vpn1 and vpn0 pass through.
    write_pte(&mut cpu, ROOT, 2, pte(0x80000, V | R | W | X));

    assert_eq!(
        cpu.translate(0x8000_5678, Exception::LoadPageFault),
        Ok(0x8000_5678)
    );
    // The walk itself runs in DRAM, so a virtual load works end to end.
    cpu.bus.store(0x8040_0000, 32, 0xabcd).unwrap();
    assert_eq!(cpu.load(0x8040_0000, 32).unwrap(), 0xabcd);
}

// ══════════════════════════════════════════════════════════
// 3. Fault classes
// ══════════════════════════════════════════════════════════

#[test]
fn invalid_pte_reports_the_callers_fault_class() {
    let mut cpu = paging_cpu();
    // Root table is all zeroes: V = 0 everywhere.
    assert_eq!(
        cpu.translate(0x1000, Exception::LoadPageFault),
        Err(Exception::LoadPageFault)
    );
    assert_eq!(
        cpu.translate(0x1000, Exception::StoreAmoPageFault),
        Err(Exception::StoreAmoPageFault)
    );
    assert_eq!(
        cpu.translate(0x1000, Exception::InstructionPageFault),
        Err(Exception::InstructionPageFault)
    );
}

#[test]
fn write_without_read_is_reserved() {
    let mut cpu = paging_cpu();
    write_pte(&mut cpu, ROOT, 0, pte(0x80004, V | W));
    assert_eq!(
        cpu.translate(0x1000, Exception::LoadPageFault),
        Err(Exception::LoadPageFault)
    );
}

#[test]
fn pointer_chain_past_the_last_level_faults() {
    let mut cpu = paging_cpu();
    // Every level is a pointer; the walk runs out of levels.
    write_pte(&mut cpu, ROOT, 0, pte(L1 >> 12, V));
    write_pte(&mut cpu, L1, 0, pte(L0 >> 12, V));
    write_pte(&mut cpu, L0, 0, pte(0x80004, V));

    assert_eq!(
        cpu.translate(0x0, Exception::LoadPageFault),
        Err(Exception::LoadPageFault)
    );
}

#[test]
fn walk_outside_memory_reports_the_callers_fault_class() {
    let mut cpu = paging_cpu();
    // Pointer into unmapped physical space: the PTE read itself faults.
    write_pte(&mut cpu, ROOT, 0, pte(0x1, V));
    assert_eq!(
        cpu.translate(0x1000, Exception::StoreAmoPageFault),
        Err(Exception::StoreAmoPageFault)
    );
}

#[test]
fn load_and_store_report_their_own_classes() {
    let mut cpu = paging_cpu();
    assert_eq!(cpu.load(0x1000, 64), Err(Exception::LoadPageFault));
    assert_eq!(
        cpu.store(0x1000, 64, 0),
        Err(Exception::StoreAmoPageFault)
    );
}

// ══════════════════════════════════════════════════════════
// 4. Fetch faults through the tick loop
// ══════════════════════════════════════════════════════════

#[test]
fn fetch_page_fault_redirects_then_executes_the_substitute() {
    let mut cpu = paging_cpu();
    cpu.csr_write(MTVEC, 0x8000_0100);
    cpu.pc = 0x4000; // unmapped virtual address

    // The failed fetch traps (instruction page fault), then the substituted
    // zero instruction traps again as illegal, leaving its own context.
    cpu.tick().unwrap();
    assert_eq!(cpu.csr_read(MCAUSE), 2);
    assert_eq!(cpu.csr_read(MEPC), 0x8000_0100);
}
