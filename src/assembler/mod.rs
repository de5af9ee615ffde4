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

//! Two-pass assembler: pass 1 tokenizes and emits bytes (deferring
//! label-dependent fields as fixups), pass 2 resolves every fixup
//! against the completed label table.

pub mod encoder;
pub mod fixup;
pub mod operand;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::AssemblyError;
use crate::file_reader::FileReader;
use crate::isa::{table, Format, Reg};
use encoder::Third;
use fixup::{Fixup, FixupKind};
use operand::Operand;

struct Line {
    label: Option<String>,
    mnemonic: Option<String>,
    operand_texts: Vec<String>,
    line_no: usize,
}

fn tokenize(source: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let without_comment = raw.split('#').next().unwrap_or("");
        let trimmed = without_comment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (label, rest) = split_label(trimmed);
        if rest.is_empty() {
            lines.push(Line {
                label,
                mnemonic: None,
                operand_texts: Vec::new(),
                line_no,
            });
            continue;
        }

        let (mnemonic, operand_part) = match rest.split_once(char::is_whitespace) {
            Some((m, r)) => (m, r.trim()),
            None => (rest, ""),
        };
        let operand_texts = if operand_part.is_empty() {
            Vec::new()
        } else {
            operand_part.split(',').map(|s| s.trim().to_string()).collect()
        };

        lines.push(Line {
            label,
            mnemonic: Some(mnemonic.to_lowercase()),
            operand_texts,
            line_no,
        });
    }
    lines
}

/// Splits a leading `identifier:` label off a stripped line, if present.
fn split_label(trimmed: &str) -> (Option<String>, &str) {
    if let Some(colon) = trimmed.find(':') {
        let candidate = &trimmed[..colon];
        let is_identifier = !candidate.is_empty()
            && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !candidate.chars().next().unwrap().is_ascii_digit();
        if is_identifier {
            return (Some(candidate.to_string()), trimmed[colon + 1..].trim());
        }
    }
    (None, trimmed)
}

fn int_reg(operands: &[Operand], idx: usize, mnemonic: &str, line: usize) -> Result<Reg, AssemblyError> {
    match operands.get(idx) {
        Some(Operand::IntReg(r)) => Ok(*r),
        Some(other) => Err(AssemblyError::OperandMismatch {
            line,
            mnemonic: mnemonic.to_string(),
            index: idx,
            expected: "an integer register",
            got: format!("{other:?}"),
        }),
        None => Err(AssemblyError::OperandMismatch {
            line,
            mnemonic: mnemonic.to_string(),
            index: idx,
            expected: "an integer register",
            got: "<missing>".to_string(),
        }),
    }
}

fn float_reg(operands: &[Operand], idx: usize, mnemonic: &str, line: usize) -> Result<Reg, AssemblyError> {
    match operands.get(idx) {
        Some(Operand::FloatReg(r)) => Ok(*r),
        Some(other) => Err(AssemblyError::OperandMismatch {
            line,
            mnemonic: mnemonic.to_string(),
            index: idx,
            expected: "a float register",
            got: format!("{other:?}"),
        }),
        None => Err(AssemblyError::OperandMismatch {
            line,
            mnemonic: mnemonic.to_string(),
            index: idx,
            expected: "a float register",
            got: "<missing>".to_string(),
        }),
    }
}

fn fits(value: i64, min: i64, max: i64, line: usize, text: &str, what: &str) -> Result<i64, AssemblyError> {
    if value < min || value > max {
        return Err(AssemblyError::BadOperand {
            line,
            text: text.to_string(),
            reason: format!("{what} must be in {min}..={max}"),
        });
    }
    Ok(value)
}

struct Assembler {
    pc: u32,
    out: Vec<u8>,
    labels: HashMap<String, u32>,
    fixups: Vec<Fixup>,
}

impl Assembler {
    fn new() -> Self {
        Assembler {
            pc: 0,
            out: Vec::new(),
            labels: HashMap::new(),
            fixups: Vec::new(),
        }
    }

    fn emit(&mut self, bytes: [u8; 4]) {
        self.out.extend_from_slice(&bytes);
        self.pc += 4;
    }

    /// Resolves `operand` as a relative-8 target, either directly (a
    /// bare immediate) or by recording a fixup against a label.
    fn resolve_rel8(
        &mut self,
        operand: &Operand,
        line: usize,
        text: &str,
    ) -> Result<i8, AssemblyError> {
        match operand {
            Operand::Immediate(v) => Ok(fits(*v, i8::MIN as i64, i8::MAX as i64, line, text, "relative displacement")? as i8),
            Operand::Label(name) => {
                self.fixups.push(Fixup {
                    label: name.clone(),
                    site_pc: self.pc,
                    out_offset: self.out.len(),
                    kind: FixupKind::Rel8,
                    line,
                });
                Ok(0)
            }
            other => Err(AssemblyError::BadOperand {
                line,
                text: format!("{other:?}"),
                reason: "expected a label or immediate displacement".to_string(),
            }),
        }
    }

    fn resolve_abs16(&mut self, operand: &Operand, line: usize, text: &str) -> Result<u16, AssemblyError> {
        match operand {
            Operand::Immediate(v) => Ok(fits(*v, 0, u16::MAX as i64, line, text, "absolute address")? as u16),
            Operand::Label(name) => {
                self.fixups.push(Fixup {
                    label: name.clone(),
                    site_pc: self.pc,
                    out_offset: self.out.len(),
                    kind: FixupKind::Abs16,
                    line,
                });
                Ok(0)
            }
            other => Err(AssemblyError::BadOperand {
                line,
                text: format!("{other:?}"),
                reason: "expected a label or immediate address".to_string(),
            }),
        }
    }

    fn resolve_rel16(&mut self, operand: &Operand, line: usize, text: &str) -> Result<i16, AssemblyError> {
        match operand {
            Operand::Immediate(v) => Ok(fits(*v, i16::MIN as i64, i16::MAX as i64, line, text, "relative displacement")? as i16),
            Operand::Label(name) => {
                self.fixups.push(Fixup {
                    label: name.clone(),
                    site_pc: self.pc,
                    out_offset: self.out.len(),
                    kind: FixupKind::Rel16,
                    line,
                });
                Ok(0)
            }
            other => Err(AssemblyError::BadOperand {
                line,
                text: format!("{other:?}"),
                reason: "expected a label or immediate displacement".to_string(),
            }),
        }
    }

    fn assemble_line(
        &mut self,
        mnemonic: &str,
        operand_texts: &[String],
        line: usize,
    ) -> Result<(), AssemblyError> {
        let entry = table::lookup(mnemonic).ok_or_else(|| AssemblyError::UnknownMnemonic {
            line,
            mnemonic: mnemonic.to_string(),
        })?;

        let operands: Vec<Operand> = operand_texts
            .iter()
            .map(|t| operand::parse_operand(t, line))
            .collect::<Result<_, _>>()?;
        let raw = |i: usize| operand_texts.get(i).map(String::as_str).unwrap_or("");

        match entry.format {
            Format::R4R4I8O8IfHbs => {
                let rd = int_reg(&operands, 0, mnemonic, line)?;
                let ra = int_reg(&operands, 1, mnemonic, line)?;
                let third = match operands.get(2) {
                    Some(Operand::Immediate(v)) => {
                        Third::Immediate(fits(*v, i8::MIN as i64, u8::MAX as i64, line, raw(2), "immediate")? as u8)
                    }
                    Some(Operand::IntReg(rb)) => {
                        let imm4 = match operands.get(3) {
                            Some(Operand::Immediate(v)) => {
                                fits(*v, -8, 15, line, raw(3), "4-bit immediate")? as u8 & 0x0f
                            }
                            None => 0,
                            Some(other) => {
                                return Err(AssemblyError::OperandMismatch {
                                    line,
                                    mnemonic: mnemonic.to_string(),
                                    index: 3,
                                    expected: "a 4-bit immediate",
                                    got: format!("{other:?}"),
                                });
                            }
                        };
                        Third::RegPlusImm4(*rb, imm4)
                    }
                    other => {
                        return Err(AssemblyError::OperandMismatch {
                            line,
                            mnemonic: mnemonic.to_string(),
                            index: 2,
                            expected: "an immediate or a register",
                            got: format!("{other:?}"),
                        });
                    }
                };
                self.emit(encoder::encode_r4r4i8o8_ifhbs(entry.op, rd, ra, third));
            }
            Format::U16O8 => {
                self.emit(encoder::encode_u16o8(entry.op));
            }
            Format::R4U4RA8O8 => {
                let rd = int_reg(&operands, 0, mnemonic, line)?;
                let target = operands.get(1).cloned().ok_or_else(|| AssemblyError::OperandMismatch {
                    line,
                    mnemonic: mnemonic.to_string(),
                    index: 1,
                    expected: "a label or relative displacement",
                    got: "<missing>".to_string(),
                })?;
                let cond = match operands.get(2) {
                    Some(Operand::Condition(mask)) => *mask,
                    None => 0,
                    Some(other) => {
                        return Err(AssemblyError::OperandMismatch {
                            line,
                            mnemonic: mnemonic.to_string(),
                            index: 2,
                            expected: "a condition-code operand",
                            got: format!("{other:?}"),
                        });
                    }
                };
                // Placeholder emitted now; resolve_rel8 may push a fixup
                // that patches out[pc+2] once every label is known.
                self.emit(encoder::encode_r4u4ra8o8(entry.op, rd, cond, 0));
                let rela = self.resolve_rel8(&target, line, raw(1))?;
                let last = self.out.len() - 4;
                self.out[last + 2] = rela as u8;
            }
            Format::AA16O8 => {
                let target = operands.first().cloned().ok_or_else(|| AssemblyError::OperandMismatch {
                    line,
                    mnemonic: mnemonic.to_string(),
                    index: 0,
                    expected: "a label or absolute address",
                    got: "<missing>".to_string(),
                })?;
                self.emit(encoder::encode_aa16o8(entry.op, 0));
                let addr = self.resolve_abs16(&target, line, raw(0))?;
                let last = self.out.len() - 4;
                self.out[last + 1] = (addr >> 8) as u8;
                self.out[last + 2] = (addr & 0xff) as u8;
            }
            Format::RA16O8 => {
                let target = operands.first().cloned().ok_or_else(|| AssemblyError::OperandMismatch {
                    line,
                    mnemonic: mnemonic.to_string(),
                    index: 0,
                    expected: "a label or relative displacement",
                    got: "<missing>".to_string(),
                })?;
                self.emit(encoder::encode_ra16o8(entry.op, 0));
                let rela = self.resolve_rel16(&target, line, raw(0))?;
                let bits = rela as u16;
                let last = self.out.len() - 4;
                self.out[last + 1] = (bits >> 8) as u8;
                self.out[last + 2] = (bits & 0xff) as u8;
            }
            Format::F4F4F4F4 => {
                let fd = float_reg(&operands, 0, mnemonic, line)?;
                let fa = float_reg(&operands, 1, mnemonic, line)?;
                let fb = float_reg(&operands, 2, mnemonic, line)?;
                let fc = float_reg(&operands, 3, mnemonic, line)?;
                self.emit(encoder::encode_f4f4f4f4(entry.op, fd, fa, fb, fc));
            }
            Format::D8 => {
                self.emit(encoder::encode_d8(entry.op));
            }
            Format::R4R4R4I4O8 => unreachable!("no table entry uses R4R4R4I4O8 directly"),
        }
        Ok(())
    }
}

/// Assembles the file at `source_path` (read through `reader`) into a raw
/// byte image. Aborts on the first error, per §7's escalation policy.
pub fn assemble<F: FileReader>(source_path: &Path, reader: &F) -> Result<Vec<u8>> {
    let source = reader
        .read_to_string(source_path)
        .with_context(|| format!("reading {}", source_path.display()))?;

    let lines = tokenize(&source);
    let mut asm = Assembler::new();

    for line in &lines {
        if let Some(name) = &line.label {
            if asm.labels.contains_key(name) {
                return Err(AssemblyError::DuplicateLabel {
                    line: line.line_no,
                    name: name.clone(),
                }
                .into());
            }
            asm.labels.insert(name.clone(), asm.pc);
        }
        if let Some(mnemonic) = &line.mnemonic {
            asm.assemble_line(mnemonic, &line.operand_texts, line.line_no)?;
        }
    }

    fixup::apply_fixups(&asm.fixups, &asm.labels, &mut asm.out)?;
    Ok(asm.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_reader::MockFileReader;
    use std::path::PathBuf;

    fn assemble_str(src: &str) -> Result<Vec<u8>> {
        let mut reader = MockFileReader::default();
        reader.add_file("in.asm", src);
        assemble(&PathBuf::from("in.asm"), &reader)
    }

    fn downcast(err: anyhow::Error) -> AssemblyError {
        err.downcast::<AssemblyError>().expect("expected an AssemblyError")
    }

    #[test]
    fn add_two_immediates_then_halt() {
        let out = assemble_str("start: add $r0,$r0,5\nadd $r0,$r0,7\nhalt\n").unwrap();
        assert_eq!(out.len(), 12);
        assert_eq!(&out[0..4], &[0x00, 0x00, 0x05, 0x80]);
        assert_eq!(&out[4..8], &[0x00, 0x00, 0x07, 0x80]);
        assert_eq!(&out[8..12], &[0xff, 0, 0, 0]);
    }

    #[test]
    fn forward_branch_fixup_resolves() {
        let out = assemble_str("start: b $r0,end,?z\nadd $r0,$r0,1\nend: halt\n").unwrap();
        // b is at pc 0, end is at pc 8: rela = 2
        assert_eq!(out[2], 2);
    }

    #[test]
    fn out_of_range_branch_fails() {
        let mut src = String::from("start: b $r0,end,?z\n");
        for _ in 0..200 {
            src.push_str("add $r0,$r0,1\n");
        }
        src.push_str("end: halt\n");
        let err = downcast(assemble_str(&src).unwrap_err());
        assert!(matches!(err, AssemblyError::DisplacementOutOfRange { .. }));
    }

    #[test]
    fn unknown_mnemonic_errors() {
        let err = downcast(assemble_str("bogus $r0,$r0,1\n").unwrap_err());
        assert!(matches!(err, AssemblyError::UnknownMnemonic { .. }));
    }

    #[test]
    fn duplicate_label_errors() {
        let err = downcast(assemble_str("a: halt\na: halt\n").unwrap_err());
        assert!(matches!(err, AssemblyError::DuplicateLabel { .. }));
    }

    #[test]
    fn jmp_absolute_and_jmprel() {
        let out = assemble_str("here: jmp here\njmprel here\n").unwrap();
        assert_eq!(&out[0..4], &[0x00, 0x00, 0x00, 0x40]);
        // jmprel at pc 4, target pc 0: rela = -4
        assert_eq!(out[6], (-4i16) as u16 as u8);
    }

    #[test]
    fn float_add_chain() {
        let out = assemble_str("fadd3 $f0,$f1,$f2,$f3\n").unwrap();
        assert_eq!(out, vec![0x01, 0x01 | (0x02 << 4), 0x03, 0x00]);
    }

    #[test]
    fn stq_and_ldq_encode_like_their_32_bit_siblings() {
        let stq = assemble_str("stq $r1,$r0,0\n").unwrap();
        let stl = assemble_str("stl $r1,$r0,0\n").unwrap();
        assert_eq!(stq[3], 0x13 | 0x80);
        assert_eq!(stl[3], 0x12 | 0x80);
        assert_eq!(stq[1], stl[1]);
    }
}
