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

use crate::errors::AssemblyError;
use crate::isa::Reg;
use crate::isa::registers::{ABI_A0, ABI_BP, ABI_RA, ABI_SP, ABI_T, ABI_TP};

/// A parsed operand, before it is bound to a particular instruction format.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    IntReg(Reg),
    FloatReg(Reg),
    VectorReg(Reg),
    ControlReg(Reg),
    TileReg(Reg),
    /// Condition-code mask: bit0 `!`, bit1 `N`, bit2 `Z`, bit3 `C`.
    Condition(u8),
    Immediate(i64),
    Label(String),
}

const COND_NOT: u8 = 1 << 0;
const COND_N: u8 = 1 << 1;
const COND_Z: u8 = 1 << 2;
const COND_C: u8 = 1 << 3;

/// Parse one comma-separated operand. Dispatches on the first character,
/// per the grammar in §4.2: `$` registers, `?` condition codes, a leading
/// digit or `-` for immediates, anything else is a label reference.
pub fn parse_operand(text: &str, line: usize) -> Result<Operand, AssemblyError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AssemblyError::BadOperand {
            line,
            text: text.to_string(),
            reason: "empty operand".to_string(),
        });
    }

    let mut chars = text.chars();
    match chars.next().unwrap() {
        '$' => parse_register(text, line),
        '?' => parse_condition(&text[1..], line),
        c if c.is_ascii_digit() || c == '-' => parse_immediate(text, line),
        _ => Ok(Operand::Label(text.to_string())),
    }
}

fn parse_register(text: &str, line: usize) -> Result<Operand, AssemblyError> {
    let body = &text[1..];
    let bad = |reason: &str| AssemblyError::BadOperand {
        line,
        text: text.to_string(),
        reason: reason.to_string(),
    };

    match text {
        "$sp" => return Ok(Operand::IntReg(Reg::from_nibble(ABI_SP))),
        "$bp" => return Ok(Operand::IntReg(Reg::from_nibble(ABI_BP))),
        "$tp" => return Ok(Operand::IntReg(Reg::from_nibble(ABI_TP))),
        "$ra" => return Ok(Operand::IntReg(Reg::from_nibble(ABI_RA))),
        _ => {}
    }

    if let Some(rest) = body.strip_prefix("cr") {
        return Ok(Operand::ControlReg(parse_reg_index(rest, 16, line, text)?));
    }
    if let Some(rest) = body.strip_prefix("tm") {
        return Ok(Operand::TileReg(parse_reg_index(rest, 16, line, text)?));
    }
    if let Some(rest) = body.strip_prefix('t') {
        let n = parse_index(rest, 8, line, text)?;
        return Ok(Operand::IntReg(Reg::from_nibble(ABI_T[n as usize])));
    }
    if let Some(rest) = body.strip_prefix('a') {
        let n = parse_index(rest, 4, line, text)?;
        return Ok(Operand::IntReg(Reg::from_nibble(ABI_A0 + n)));
    }
    if let Some(rest) = body.strip_prefix('r') {
        return Ok(Operand::IntReg(parse_reg_index(rest, 16, line, text)?));
    }
    if let Some(rest) = body.strip_prefix('v') {
        return Ok(Operand::VectorReg(parse_reg_index(rest, 16, line, text)?));
    }
    if let Some(rest) = body.strip_prefix('f') {
        return Ok(Operand::FloatReg(parse_reg_index(rest, 16, line, text)?));
    }

    Err(bad("unrecognized register operand"))
}

fn parse_index(rest: &str, limit: u8, line: usize, text: &str) -> Result<u8, AssemblyError> {
    let n: u8 = rest.parse().map_err(|_| AssemblyError::BadOperand {
        line,
        text: text.to_string(),
        reason: "expected a register number".to_string(),
    })?;
    if n >= limit {
        return Err(AssemblyError::BadOperand {
            line,
            text: text.to_string(),
            reason: format!("register index must be < {limit}"),
        });
    }
    Ok(n)
}

fn parse_reg_index(rest: &str, limit: u8, line: usize, text: &str) -> Result<Reg, AssemblyError> {
    let n = parse_index(rest, limit, line, text)?;
    Reg::new(n).ok_or_else(|| AssemblyError::BadOperand {
        line,
        text: text.to_string(),
        reason: "register index out of range".to_string(),
    })
}

fn parse_condition(rest: &str, line: usize) -> Result<Operand, AssemblyError> {
    let mut mask = 0u8;
    for c in rest.chars() {
        mask |= match c {
            '!' => COND_NOT,
            'n' => COND_N,
            'z' => COND_Z,
            'c' => COND_C,
            // shorthand: g(reater) = !zc, l(ess) = c, e(qual) = z
            'g' => COND_NOT | COND_Z | COND_C,
            'l' => COND_C,
            'e' => COND_Z,
            _ => {
                return Err(AssemblyError::BadOperand {
                    line,
                    text: format!("?{rest}"),
                    reason: format!("unknown condition flag `{c}`"),
                });
            }
        };
    }
    Ok(Operand::Condition(mask))
}

fn parse_immediate(text: &str, line: usize) -> Result<Operand, AssemblyError> {
    text.parse::<i64>()
        .map(Operand::Immediate)
        .map_err(|_| AssemblyError::BadOperand {
            line,
            text: text.to_string(),
            reason: "expected a signed decimal immediate".to_string(),
        })
}
