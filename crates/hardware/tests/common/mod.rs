//! Shared test helpers.
//!
//! Small instruction encoders for each RISC-V format, and constructors that
//! boot a hart with a word-list program at the DRAM base.

use nanoemu_core::Cpu;

/// Encodes an R-type instruction.
pub fn r_type(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    funct7 << 25 | rs2 << 20 | rs1 << 15 | funct3 << 12 | rd << 7 | opcode
}

/// Encodes an I-type instruction with a sign-extended 12-bit immediate.
pub fn i_type(imm: i32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    ((imm as u32) & 0xfff) << 20 | rs1 << 15 | funct3 << 12 | rd << 7 | opcode
}

/// Encodes an S-type (store) instruction.
pub fn s_type(imm: i32, rs2: u32, rs1: u32, funct3: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 5) & 0x7f) << 25
        | rs2 << 20
        | rs1 << 15
        | funct3 << 12
        | (imm & 0x1f) << 7
        | 0x23
}

/// Encodes a B-type (branch) instruction.
pub fn b_type(imm: i32, rs2: u32, rs1: u32, funct3: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 12) & 1) << 31
        | ((imm >> 5) & 0x3f) << 25
        | rs2 << 20
        | rs1 << 15
        | funct3 << 12
        | ((imm >> 1) & 0xf) << 8
        | ((imm >> 11) & 1) << 7
        | 0x63
}

/// Encodes a U-type instruction from the upper 20 immediate bits.
pub fn u_type(imm20: u32, rd: u32, opcode: u32) -> u32 {
    imm20 << 12 | rd << 7 | opcode
}

/// Encodes a J-type (`jal`) instruction.
pub fn j_type(imm: i32, rd: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 20) & 1) << 31
        | ((imm >> 1) & 0x3ff) << 21
        | ((imm >> 11) & 1) << 20
        | ((imm >> 12) & 0xff) << 12
        | rd << 7
        | 0x6f
}

/// Encodes `addi rd, rs1, imm`.
pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0x0, rd, 0x13)
}

/// Encodes `lui rd, imm20`.
pub fn lui(rd: u32, imm20: u32) -> u32 {
    u_type(imm20, rd, 0x37)
}

/// Encodes a CSR instruction (`funct3` selects the variant).
pub fn csr_inst(csr: u32, rs1: u32, funct3: u32, rd: u32) -> u32 {
    csr << 20 | rs1 << 15 | funct3 << 12 | rd << 7 | 0x73
}

/// Flattens a word-list program into little-endian bytes.
pub fn assemble(words: &[u32]) -> Vec<u8> {
    let mut code = Vec::with_capacity(words.len() * 4);
    for word in words {
        code.extend_from_slice(&word.to_le_bytes());
    }
    code
}

/// Boots a hart with `words` as the kernel image and no disk.
pub fn cpu_with_program(words: &[u32]) -> Cpu {
    Cpu::new(&assemble(words), Vec::new())
}

/// Boots a hart with `words` as the kernel image and `disk` attached.
pub fn cpu_with_disk(words: &[u32], disk: Vec<u8>) -> Cpu {
    Cpu::new(&assemble(words), disk)
}
