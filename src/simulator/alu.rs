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

//! Integer ALU primitives, computed via a 64-bit intermediate the way
//! `cpu_i_add32`/`cpu_i_sub32` do in the source, so the carry bit falls
//! out of the subtraction/addition directly instead of needing a
//! separate overflow check.

/// `a + b`, plus whether the unsigned sum overflowed 32 bits.
pub fn add32(a: u32, b: u32) -> (u32, bool) {
    let wide = a as u64 + b as u64;
    (wide as u32, wide > u32::MAX as u64)
}

/// `a - b`, plus whether the unsigned difference underflowed (borrow).
pub fn sub32(a: u32, b: u32) -> (u32, bool) {
    let wide = (a as i64) - (b as i64);
    (wide as u32, wide < 0)
}

pub fn popcount(x: u32) -> u32 {
    x.count_ones()
}

/// Counts trailing zero bits, scanning from bit 0 upward — the
/// direction the source's `cpu_i_clz` actually uses, despite the name.
/// Returns 32 for `x == 0`.
pub fn clz(x: u32) -> u32 {
    x.trailing_zeros()
}

/// Counts trailing one bits, same scan direction as `clz`. Fixes the
/// source's `cpu_i_clo`, which was byte-identical to `cpu_i_clz`.
/// Returns 32 for `x == u32::MAX`.
pub fn clo(x: u32) -> u32 {
    (!x).trailing_zeros()
}

pub fn bswap(x: u32) -> u32 {
    x.swap_bytes()
}

/// Inverse popcount: the number of zero bits.
pub fn ipcnt(x: u32) -> u32 {
    32 - x.count_ones()
}

/// Integer division/remainder, unsigned (only `imul` is signed),
/// defined as 0 on division by zero rather than the C source's
/// undefined behavior, consistent with the simulator's "never aborts
/// on program errors" policy (§7).
pub fn checked_div(a: u32, b: u32) -> u32 {
    a.checked_div(b).unwrap_or(0)
}

pub fn checked_rem(a: u32, b: u32) -> u32 {
    a.checked_rem(b).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add32_reports_carry_on_overflow() {
        assert_eq!(add32(u32::MAX, 1), (0, true));
        assert_eq!(add32(1, 1), (2, false));
    }

    #[test]
    fn sub32_reports_borrow_on_underflow() {
        assert_eq!(sub32(0, 1), (u32::MAX, true));
        assert_eq!(sub32(5, 3), (2, false));
    }

    #[test]
    fn clz_and_clo_scan_from_bit_zero() {
        assert_eq!(clz(0b1000), 3);
        assert_eq!(clz(0), 32);
        assert_eq!(clo(0b0111), 3);
        assert_eq!(clo(u32::MAX), 32);
    }

    #[test]
    fn clz_and_clo_are_not_copy_paste_identical() {
        assert_ne!(clz(0b0111), clo(0b0111));
    }

    #[test]
    fn div_and_rem_by_zero_return_zero() {
        assert_eq!(checked_div(10, 0), 0);
        assert_eq!(checked_rem(10, 0), 0);
        assert_eq!(checked_div(10, 2), 5);
    }

    #[test]
    fn div_is_unsigned_not_signed() {
        assert_eq!(checked_div(0x8000_0000, 2), 0x4000_0000);
    }
}
