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

//! Float-category execution. Every op reads `a = f[Fa]`, `b = f[Fb]`,
//! `c = f[Fc]` and produces the value written to `f[Fd]`.
//!
//! The "3-operand" family (`fadd3`/`fsub3`/`fdiv3`/`fmul3`/`fmod3`) all
//! combine `a` and `b` first, then apply the op against `c` — this is
//! what the source's `fmul3` bug (computing `(a+b)/c`, a copy-paste of
//! `fdiv3`) implies the *intended* shape is, once corrected to `*`. Most
//! of the remaining unary/transcendental ops are defined over
//! `s = a + b + c`, matching §4.4.5's "transcendental of a+b+c".

use std::f32::consts::PI;

fn sum3(a: f32, b: f32, c: f32) -> f32 {
    a + b + c
}

pub fn eval(op: u8, a: f32, b: f32, c: f32) -> f32 {
    let s = sum3(a, b, c);
    match op {
        0x00 => a + b + c,                       // fadd3
        0x01 => (a + b) - c,                     // fsub3
        0x02 => (a + b) / c,                     // fdiv3
        0x03 => (a + b) * c,                     // fmul3 (source bug fixed: was (a+b)/c)
        0x04 => (a + b) % c,                     // fmod3
        0x05 => a * b + c,                       // fmadd
        0x06 => a * b - c,                       // fmsub
        0x07 => s.sqrt(),                        // fsqrt3
        0x08 => (a * a + b * b + c * c).sqrt(),  // fhyp (3-argument norm)
        0x09 => (a * a + b * b + c * c).sqrt(),  // fnorm
        0x0a => s.abs(),                         // fabs
        0x0b => s.signum(),                      // fsign
        0x0c => -s.abs(),                        // fnabs
        0x0d => s.cos(),                         // fcos
        0x0e => s.sin(),                         // fsin
        0x0f => s.tan(),                         // ftan
        0x10 => s.clamp(-1.0, 1.0).acos(),       // facos
        0x11 => s.atan(),                        // fatan
        0x12 => s.clamp(-1.0, 1.0).asin(),       // fasin
        0x13 => s.cbrt(),                        // fcbrt
        0x14 => libm::y0f(s),                    // fy0
        0x15 => libm::y1f(s),                    // fy1
        0x16 => libm::j0f(s),                    // fj0
        0x17 => libm::j1f(s),                    // fj1
        0x18 => s.exp(),                         // fexp
        0x19 => 1.0 / s.sqrt(),                  // frsqrt
        0x1a => 1.0 / s.cbrt(),                  // frcbrt
        0x1b => s * s,                           // fpow2
        0x1c => s * s * s,                       // fpow3
        0x1d => (a + b).max(c),                   // fmax
        0x1e => (a + b).min(c),                   // fmin
        0x1f => a.clamp(b.min(c), b.max(c)),     // fclamp (a clamped to [b,c])
        0x20 => 1.0 / s,                         // finv
        0x21 => s * PI,                          // fconstpi
        0x22 => s * std::f32::consts::E,         // fconste
        0x23 => s * std::f32::consts::FRAC_PI_2, // fconstpi2
        0x24 => s.to_radians(),                  // frad
        0x25 => s.to_degrees(),                  // fdeg
        0x26 => if a > b { c } else { 0.0 },       // fsel: never returns b
        0x27 => if (a + b) > 0.0 { c } else { 0.0 }, // fsel2: also never returns b
        0x28 => libm::tgammaf(s),                // fgamma
        0x29 => libm::lgammaf(s),                // flgamma
        // Complex-ISA variants: (a, b) is a complex operand a+bi, c is a
        // real operand. Only the real component is written back, since
        // Fd is a single scalar register. The `cri` group (0x40-0x44)
        // has no distinguishing semantics in the spec beyond addressing,
        // so it reuses the `crr` formulas.
        0x30 | 0x40 => a + c,                    // faddcrr / faddcri
        0x31 | 0x41 => a - c,                    // fsubcrr / fsubcri
        0x32 | 0x42 => a / c,                    // fdivcrr / fdivcri
        0x33 | 0x43 => a * c,                    // fmulcrr / fmulcri
        0x34 | 0x44 => a % c,                    // fmodcrr / fmodcri
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fadd3_sums_all_three_operands() {
        assert_eq!(eval(0x00, 1.0, 2.0, 3.0), 6.0);
    }

    #[test]
    fn fmul3_uses_the_corrected_formula() {
        assert_eq!(eval(0x03, 1.0, 2.0, 3.0), 9.0);
    }

    #[test]
    fn fdiv3_matches_the_sources_intended_shape() {
        assert_eq!(eval(0x02, 1.0, 3.0, 2.0), 2.0);
    }

    #[test]
    fn fsqrt3_operates_on_the_three_way_sum() {
        assert_eq!(eval(0x07, 2.0, 2.0, 5.0), 3.0);
    }

    #[test]
    fn fsel_compares_a_against_b_and_never_returns_b() {
        assert_eq!(eval(0x26, 10.0, 1.0, 20.0), 20.0);
        assert_eq!(eval(0x26, 1.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn fsel2_tests_the_sign_of_a_plus_b_and_never_returns_b() {
        assert_eq!(eval(0x27, 1.0, 1.0, 20.0), 20.0);
        assert_eq!(eval(0x27, -1.0, -1.0, 20.0), 0.0);
    }

    #[test]
    fn fmax_and_fmin_combine_a_and_b_before_comparing_to_c() {
        assert_eq!(eval(0x1d, 1.0, 2.0, 2.5), 3.0);
        assert_eq!(eval(0x1e, 1.0, 2.0, 2.5), 2.5);
    }
}
