/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::isa::{CategoryByte, Reg};

/// Third operand of an `R4R4I8O8_IFHBS` instruction: either a plain
/// 8-bit immediate, or a register plus a 4-bit immediate added to it.
/// `HbsForm::from_opcode_byte` recovers which form byte3 encodes.
pub enum Third {
    Immediate(u8),
    RegPlusImm4(Reg, u8),
}

fn byte0(cat: CategoryByte) -> u8 {
    cat.to_nibble()
}

pub fn encode_r4r4i8o8_ifhbs(op: u8, rd: Reg, ra: Reg, third: Third) -> [u8; 4] {
    match third {
        Third::Immediate(imm) => [
            byte0(CategoryByte::Integer),
            rd.index() | (ra.index() << 4),
            imm,
            op | 0x80,
        ],
        Third::RegPlusImm4(rb, imm4) => [
            byte0(CategoryByte::Integer),
            rd.index() | (ra.index() << 4),
            rb.index() | ((imm4 & 0x0f) << 4),
            op,
        ],
    }
}

/// `ret` — both operand bytes unused.
pub fn encode_u16o8(op: u8) -> [u8; 4] {
    [byte0(CategoryByte::Integer), 0, 0, op]
}

/// Branches and `call`: a register in the low nibble of byte1 (the
/// tested register for branches, the base register for `call`), a 4-bit
/// condition mask in the high nibble, and a relative displacement in
/// byte2. `rela` is a placeholder (0) when the target is a forward label
/// awaiting a `Fixup`.
pub fn encode_r4u4ra8o8(op: u8, rd: Reg, cond: u8, rela: i8) -> [u8; 4] {
    [
        byte0(CategoryByte::Integer),
        rd.index() | ((cond & 0x0f) << 4),
        rela as u8,
        op,
    ]
}

/// `jmp` — absolute 16-bit target, big-endian.
pub fn encode_aa16o8(op: u8, target: u16) -> [u8; 4] {
    [
        byte0(CategoryByte::Integer),
        (target >> 8) as u8,
        (target & 0xff) as u8,
        op,
    ]
}

/// `jmprel` — signed 16-bit relative displacement, big-endian.
pub fn encode_ra16o8(op: u8, rela: i16) -> [u8; 4] {
    let bits = rela as u16;
    [
        byte0(CategoryByte::Integer),
        (bits >> 8) as u8,
        (bits & 0xff) as u8,
        op,
    ]
}

/// All float-category instructions: four register indices packed two per
/// byte.
pub fn encode_f4f4f4f4(op: u8, fd: Reg, fa: Reg, fb: Reg, fc: Reg) -> [u8; 4] {
    [
        byte0(CategoryByte::Float),
        fd.index() | (fa.index() << 4),
        fb.index() | (fc.index() << 4),
        op,
    ]
}

/// `halt` — the opcode lives in the high nibble of byte0 itself.
pub fn encode_d8(op: u8) -> [u8; 4] {
    [(op << 4) | byte0(CategoryByte::Debug), 0, 0, 0]
}
