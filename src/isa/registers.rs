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

/// Index into one of the five 16-entry register files (integer, float,
/// vector, control, tile). All five are addressed the same way, so a
/// single newtype stands in for what the original C expressed as a bare
/// `uint8_t` into five different arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(u8);

impl Reg {
    pub const COUNT: u8 = 16;

    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Reg(index))
        } else {
            None
        }
    }

    /// Mask to the low nibble unconditionally; used when decoding a byte
    /// that packs a register index alongside other bits.
    pub const fn from_nibble(byte: u8) -> Self {
        Reg(byte & 0x0f)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ABI names for the integer register file. `t0`-`t7` are caller-saved
/// scratch, `a0`-`a3` carry arguments (`a0`/`r8` doubles as the return
/// value), and `ra`/`bp`/`sp`/`tp` are the fixed single-purpose registers.
pub const ABI_T0: u8 = 0;
pub const ABI_T1: u8 = 1;
pub const ABI_T2: u8 = 2;
pub const ABI_T3: u8 = 3;
pub const ABI_T4: u8 = 4;
pub const ABI_T5: u8 = 5;
pub const ABI_T6: u8 = 6;
pub const ABI_T7: u8 = 7;

pub const ABI_A0: u8 = 8;
pub const ABI_A1: u8 = 9;
pub const ABI_A2: u8 = 10;
pub const ABI_A3: u8 = 11;

pub const ABI_RA: u8 = 12;
pub const ABI_BP: u8 = 13;
pub const ABI_SP: u8 = 14;
pub const ABI_TP: u8 = 15;

/// The `t0..t7` scratch registers in order, used by branch base-condition
/// 8..15 (`r[Ra] == r[T{n}]`).
pub const ABI_T: [u8; 8] = [
    ABI_T0, ABI_T1, ABI_T2, ABI_T3, ABI_T4, ABI_T5, ABI_T6, ABI_T7,
];
