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

use super::Format;

/// One row of the opcode table: a mnemonic, the operand layout it uses,
/// and the opcode value within its category. Mnemonics are unique within
/// a category; so are opcodes (enforced by `table_invariants` below).
#[derive(Debug, Clone, Copy)]
pub struct InstEntry {
    pub name: &'static str,
    pub format: Format,
    pub op: u8,
}

macro_rules! inst_table {
    ($(($name:literal, $format:expr, $op:expr)),* $(,)?) => {
        &[$(InstEntry { name: $name, format: $format, op: $op }),*]
    };
}

/// The single source of truth for every instruction this machine defines.
/// Consumed by name (assembler) and by `(category, opcode)` (simulator,
/// disassembler).
pub static INST_TABLE: &[InstEntry] = inst_table![
    ("add", Format::R4R4I8O8IfHbs, 0x00),
    ("sub", Format::R4R4I8O8IfHbs, 0x01),
    ("mul", Format::R4R4I8O8IfHbs, 0x02),
    ("div", Format::R4R4I8O8IfHbs, 0x03),
    ("rem", Format::R4R4I8O8IfHbs, 0x04),
    ("imul", Format::R4R4I8O8IfHbs, 0x05),
    ("and", Format::R4R4I8O8IfHbs, 0x06),
    ("xor", Format::R4R4I8O8IfHbs, 0x07),
    ("or", Format::R4R4I8O8IfHbs, 0x08),
    ("shl", Format::R4R4I8O8IfHbs, 0x09),
    ("shr", Format::R4R4I8O8IfHbs, 0x0a),
    ("pcnt", Format::R4R4I8O8IfHbs, 0x0b),
    ("clz", Format::R4R4I8O8IfHbs, 0x0c),
    ("clo", Format::R4R4I8O8IfHbs, 0x0d),
    ("bswap", Format::R4R4I8O8IfHbs, 0x0e),
    ("ipcnt", Format::R4R4I8O8IfHbs, 0x0f),
    ("stb", Format::R4R4I8O8IfHbs, 0x10),
    ("stw", Format::R4R4I8O8IfHbs, 0x11),
    ("stl", Format::R4R4I8O8IfHbs, 0x12),
    ("stq", Format::R4R4I8O8IfHbs, 0x13),
    ("ldb", Format::R4R4I8O8IfHbs, 0x14),
    ("ldw", Format::R4R4I8O8IfHbs, 0x15),
    ("ldl", Format::R4R4I8O8IfHbs, 0x16),
    ("ldq", Format::R4R4I8O8IfHbs, 0x17),
    ("lea", Format::R4R4I8O8IfHbs, 0x18),
    // 0x19-0x1f reserved, no semantics defined (spec.md §9 open question)
    ("cmp", Format::R4R4I8O8IfHbs, 0x20),
    ("cmpkp", Format::R4R4I8O8IfHbs, 0x21),
    // 0x22-0x3f hole
    ("jmp", Format::AA16O8, 0x40),
    ("jmprel", Format::RA16O8, 0x41),
    ("call", Format::R4U4RA8O8, 0x42),
    ("ret", Format::U16O8, 0x43),
    // 0x44-0x4f hole
    ("bz", Format::R4U4RA8O8, 0x50),
    ("b", Format::R4U4RA8O8, 0x51),
    ("bgzs", Format::R4U4RA8O8, 0x52),
    ("bgpc", Format::R4U4RA8O8, 0x53),
    ("bgpcrela", Format::R4U4RA8O8, 0x54),
    ("bo", Format::R4U4RA8O8, 0x55),
    ("bgoz", Format::R4U4RA8O8, 0x56),
    ("bemax", Format::R4U4RA8O8, 0x57),
    ("bet0", Format::R4U4RA8O8, 0x58),
    ("bet1", Format::R4U4RA8O8, 0x59),
    ("bet2", Format::R4U4RA8O8, 0x5a),
    ("bet3", Format::R4U4RA8O8, 0x5b),
    ("bet4", Format::R4U4RA8O8, 0x5c),
    ("bet5", Format::R4U4RA8O8, 0x5d),
    ("bet6", Format::R4U4RA8O8, 0x5e),
    ("bet7", Format::R4U4RA8O8, 0x5f),
    // Floating point
    ("fadd3", Format::F4F4F4F4, 0x00),
    ("fsub3", Format::F4F4F4F4, 0x01),
    ("fdiv3", Format::F4F4F4F4, 0x02),
    ("fmul3", Format::F4F4F4F4, 0x03),
    ("fmod3", Format::F4F4F4F4, 0x04),
    ("fmadd", Format::F4F4F4F4, 0x05),
    ("fmsub", Format::F4F4F4F4, 0x06),
    ("fsqrt3", Format::F4F4F4F4, 0x07),
    ("fhyp", Format::F4F4F4F4, 0x08),
    ("fnorm", Format::F4F4F4F4, 0x09),
    ("fabs", Format::F4F4F4F4, 0x0a),
    ("fsign", Format::F4F4F4F4, 0x0b),
    ("fnabs", Format::F4F4F4F4, 0x0c),
    ("fcos", Format::F4F4F4F4, 0x0d),
    ("fsin", Format::F4F4F4F4, 0x0e),
    ("ftan", Format::F4F4F4F4, 0x0f),
    ("facos", Format::F4F4F4F4, 0x10),
    ("fatan", Format::F4F4F4F4, 0x11),
    ("fasin", Format::F4F4F4F4, 0x12),
    ("fcbrt", Format::F4F4F4F4, 0x13),
    ("fy0", Format::F4F4F4F4, 0x14),
    ("fy1", Format::F4F4F4F4, 0x15),
    ("fj0", Format::F4F4F4F4, 0x16),
    ("fj1", Format::F4F4F4F4, 0x17),
    ("fexp", Format::F4F4F4F4, 0x18),
    ("frsqrt", Format::F4F4F4F4, 0x19),
    ("frcbrt", Format::F4F4F4F4, 0x1a),
    ("fpow2", Format::F4F4F4F4, 0x1b),
    ("fpow3", Format::F4F4F4F4, 0x1c),
    ("fmax", Format::F4F4F4F4, 0x1d),
    ("fmin", Format::F4F4F4F4, 0x1e),
    ("fclamp", Format::F4F4F4F4, 0x1f),
    ("finv", Format::F4F4F4F4, 0x20),
    ("fconstpi", Format::F4F4F4F4, 0x21),
    ("fconste", Format::F4F4F4F4, 0x22),
    ("fconstpi2", Format::F4F4F4F4, 0x23),
    ("frad", Format::F4F4F4F4, 0x24),
    ("fdeg", Format::F4F4F4F4, 0x25),
    ("fsel", Format::F4F4F4F4, 0x26),
    ("fsel2", Format::F4F4F4F4, 0x27),
    ("fgamma", Format::F4F4F4F4, 0x28),
    ("flgamma", Format::F4F4F4F4, 0x29),
    // Complex ISA: (a, b) is a complex operand, c is a real operand.
    ("faddcrr", Format::F4F4F4F4, 0x30),
    ("fsubcrr", Format::F4F4F4F4, 0x31),
    ("fdivcrr", Format::F4F4F4F4, 0x32),
    ("fmulcrr", Format::F4F4F4F4, 0x33),
    ("fmodcrr", Format::F4F4F4F4, 0x34),
    // hole
    ("faddcri", Format::F4F4F4F4, 0x40),
    ("fsubcri", Format::F4F4F4F4, 0x41),
    ("fdivcri", Format::F4F4F4F4, 0x42),
    ("fmulcri", Format::F4F4F4F4, 0x43),
    ("fmodcri", Format::F4F4F4F4, 0x44),
    // Debug
    ("halt", Format::D8, 0x0f),
];

/// Look up a mnemonic, restricted to a category (mnemonics only need to be
/// unique within their category; `b`/`bz`/... vs `fadd3`/... reuse low
/// opcode values across categories).
pub fn lookup(name: &str) -> Option<&'static InstEntry> {
    INST_TABLE.iter().find(|e| e.name == name)
}

/// Find the table row matching a decoded `(category, opcode)` pair, the
/// way both the simulator and the disassembler dispatch. Integer-category
/// opcodes are matched against the low 7 bits, since bit 7 is the
/// `R4R4I8O8IfHbs` form selector rather than part of the opcode value.
pub fn lookup_by_opcode(category: super::CategoryByte, opcode_byte: u8) -> Option<&'static InstEntry> {
    use super::CategoryByte;
    let op = match category {
        CategoryByte::Integer => opcode_byte & 0x7f,
        _ => opcode_byte,
    };
    INST_TABLE
        .iter()
        .find(|e| e.format.category() == category && e.op == op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::CategoryByte;

    #[test]
    fn ifhbs_opcodes_have_high_bit_clear() {
        for e in INST_TABLE {
            if e.format == Format::R4R4I8O8IfHbs {
                assert_eq!(e.op & 0x80, 0, "{} stores a high-bit opcode", e.name);
            }
        }
    }

    #[test]
    fn opcodes_unique_within_category() {
        for a in INST_TABLE {
            for b in INST_TABLE {
                if std::ptr::eq(a, b) {
                    continue;
                }
                if a.format.category() == b.format.category() {
                    assert!(
                        a.op != b.op || a.name == b.name,
                        "{} and {} collide in category {:?}",
                        a.name,
                        b.name,
                        a.format.category()
                    );
                }
            }
        }
    }

    #[test]
    fn lookup_finds_every_name() {
        for e in INST_TABLE {
            assert!(lookup(e.name).is_some());
        }
    }

    #[test]
    fn lookup_by_opcode_round_trips() {
        for e in INST_TABLE {
            let byte3 = match e.format {
                Format::R4R4I8O8IfHbs => e.op | 0x80, // exercise the masked lookup too
                _ => e.op,
            };
            let found = lookup_by_opcode(e.format.category(), byte3).expect("found");
            assert_eq!(found.name, e.name);
        }
    }

    #[test]
    fn halt_is_debug_category() {
        let halt = lookup("halt").unwrap();
        assert_eq!(halt.format.category(), CategoryByte::Debug);
    }
}
