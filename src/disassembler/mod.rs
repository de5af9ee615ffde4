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

//! Binary-to-text disassembly: the structural inverse of
//! `assembler::encoder`. Every instruction word is exactly 4 bytes,
//! consumed unconditionally regardless of category — unlike the retrieved
//! `dis.c`, which has no `AA16O8`/`RA16O8` case and desynchronizes its
//! byte stream on Float/Vector/Tile words, this walks the image strictly
//! 4 bytes at a time.

use crate::errors::DecodeError;
use crate::isa::{table, CategoryByte, Format, HbsForm};

/// One decoded instruction: its address, the raw word, and the rendered
/// mnemonic + operand text (or `None` if the word had no table entry).
pub struct DecodedLine {
    pub addr: u32,
    pub bytes: [u8; 4],
    pub text: Result<String, DecodeError>,
}

/// Disassembles `code`, one 4-byte word per line, starting addresses at
/// `base`.
pub fn disassemble(code: &[u8], base: u32) -> Vec<DecodedLine> {
    code.chunks(4)
        .enumerate()
        .map(|(i, chunk)| {
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            let addr = base.wrapping_add((i as u32) * 4);
            DecodedLine { addr, bytes, text: disassemble_one(bytes) }
        })
        .collect()
}

fn int_reg(n: u8) -> String {
    format!("$r{n}")
}

fn float_reg(n: u8) -> String {
    format!("$f{n}")
}

/// Renders a 4-bit condition mask the way `operand::parse_condition`
/// reads it back: `!` for the invert bit, then `n`/`z`/`c` for whichever
/// flag bits are set. An all-zero mask renders as a bare `?`.
fn format_condition(mask: u8) -> String {
    let mut s = String::from("?");
    if mask & 0b0001 != 0 {
        s.push('!');
    }
    if mask & 0b0010 != 0 {
        s.push('n');
    }
    if mask & 0b0100 != 0 {
        s.push('z');
    }
    if mask & 0b1000 != 0 {
        s.push('c');
    }
    s
}

/// Decodes a single 4-byte word into `"mnemonic operand, operand, ..."`.
pub fn disassemble_one(bytes: [u8; 4]) -> Result<String, DecodeError> {
    let category = CategoryByte::from_nibble(bytes[0]);
    let opcode_byte = bytes[3];

    if category == CategoryByte::Debug {
        let op = bytes[0] >> 4;
        let entry = table::lookup_by_opcode(category, op).ok_or(DecodeError::UnknownOpcode {
            category: category.to_nibble(),
            opcode: op,
        })?;
        return Ok(entry.name.to_string());
    }

    let entry = table::lookup_by_opcode(category, opcode_byte).ok_or(DecodeError::UnknownOpcode {
        category: category.to_nibble(),
        opcode: opcode_byte,
    })?;

    let operands = match entry.format {
        Format::R4R4I8O8IfHbs => {
            let rd = bytes[1] & 0x0f;
            let ra = (bytes[1] >> 4) & 0x0f;
            match HbsForm::from_opcode_byte(opcode_byte) {
                HbsForm::Immediate => {
                    format!("{},{},{}", int_reg(rd), int_reg(ra), bytes[2] as i8)
                }
                HbsForm::Register => {
                    let rb = bytes[2] & 0x0f;
                    let imm4 = (bytes[2] >> 4) & 0x0f;
                    if imm4 == 0 {
                        format!("{},{},{}", int_reg(rd), int_reg(ra), int_reg(rb))
                    } else {
                        format!("{},{},{},{}", int_reg(rd), int_reg(ra), int_reg(rb), imm4)
                    }
                }
            }
        }
        Format::U16O8 => String::new(),
        Format::R4U4RA8O8 => {
            let rd = bytes[1] & 0x0f;
            let cond = (bytes[1] >> 4) & 0x0f;
            let rela = bytes[2] as i8;
            if cond == 0 {
                format!("{},{}", int_reg(rd), rela)
            } else {
                format!("{},{},{}", int_reg(rd), rela, format_condition(cond))
            }
        }
        Format::AA16O8 => {
            let target = ((bytes[1] as u16) << 8) | bytes[2] as u16;
            format!("{target}")
        }
        Format::RA16O8 => {
            let rela = i16::from_be_bytes([bytes[1], bytes[2]]);
            format!("{rela}")
        }
        Format::F4F4F4F4 => {
            let fd = bytes[1] & 0x0f;
            let fa = (bytes[1] >> 4) & 0x0f;
            let fb = bytes[2] & 0x0f;
            let fc = (bytes[2] >> 4) & 0x0f;
            format!("{},{},{},{}", float_reg(fd), float_reg(fa), float_reg(fb), float_reg(fc))
        }
        Format::D8 => String::new(),
        Format::R4R4R4I4O8 => unreachable!("no table entry uses R4R4R4I4O8 directly"),
    };

    if operands.is_empty() {
        Ok(entry.name.to_string())
    } else {
        Ok(format!("{} {}", entry.name, operands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_add_immediate() {
        let text = disassemble_one([0x00, 0x00, 0x05, 0x80]).unwrap();
        assert_eq!(text, "add $r0,$r0,5");
    }

    #[test]
    fn decodes_add_register_form() {
        let text = disassemble_one([0x00, 0x00, 0x21, 0x00]).unwrap();
        assert_eq!(text, "add $r0,$r0,$r1,2");
    }

    #[test]
    fn decodes_halt() {
        assert_eq!(disassemble_one([0xff, 0, 0, 0]).unwrap(), "halt");
    }

    #[test]
    fn decodes_jmp_absolute() {
        assert_eq!(disassemble_one([0x00, 0x12, 0x34, 0x40]).unwrap(), "jmp 4660");
    }

    #[test]
    fn decodes_float_add3() {
        let text = disassemble_one([0x01, 0x01 | (0x02 << 4), 0x03, 0x00]).unwrap();
        assert_eq!(text, "fadd3 $f0,$f1,$f2,$f3");
    }

    #[test]
    fn reserved_category_is_unknown_opcode() {
        let err = disassemble_one([0x02, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownOpcode { category: 2, .. }));
    }

    #[test]
    fn disassemble_walks_four_bytes_at_a_time_even_on_unknown_words() {
        let code = [0x02, 0, 0, 0, 0xff, 0, 0, 0];
        let lines = disassemble(&code, 0x8000);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].text.is_err());
        assert_eq!(lines[1].addr, 0x8004);
        assert_eq!(lines[1].text.as_deref(), Ok("halt"));
    }

    #[test]
    fn condition_mask_round_trips_through_operand_parser() {
        let text = disassemble_one([0x00, 0b0010 << 4, 0x02, 0x50]).unwrap();
        assert_eq!(text, "bz $r0,2,?n");
    }
}
