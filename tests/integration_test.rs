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

use std::path::Path;

use xm::assemble;
use xm::disassembler::disassemble_one;
use xm::errors::AssemblyError;
use xm::file_reader::MockFileReader;
use xm::isa::memory_map::{RAM_BASE, ROM_BASE};
use xm::isa::registers::{ABI_RA, ABI_T0};
use xm::simulator::{Options, Simulator, StepOutcome};

fn assemble_str(src: &str) -> anyhow::Result<Vec<u8>> {
    let mut reader = MockFileReader::default();
    reader.add_file("in.asm", src);
    assemble(Path::new("in.asm"), &reader)
}

fn run(rom: &[u8], init: impl FnOnce(&mut Simulator)) -> Simulator {
    let mut sim = Simulator::new(rom, Options { quiet: true, ..Default::default() });
    sim.cpu.pc = ROM_BASE;
    init(&mut sim);
    sim.run(25);
    sim
}

#[test]
fn add_two_immediates_then_halt() {
    let rom = assemble_str("start: add $r0,$r0,5\nadd $r0,$r0,7\nhalt\n").unwrap();
    let sim = run(&rom, |_| {});
    assert_eq!(sim.cpu.r[0], 12);
    assert_eq!(sim.perf.ticks, 3);
}

#[test]
fn forward_branch_taken_on_flag() {
    // cmp $r1,... writes the post-flags into r1, leaving r0 untouched; Z
    // comes from add32(r0, 0) = 0, so b $r0,end,?z is taken.
    let rom = assemble_str(
        "start: cmp $r1,$r0,0\nb $r0,end,?z\nadd $r0,$r0,1\nend: halt\n",
    )
    .unwrap();
    let sim = run(&rom, |_| {});
    assert_eq!(sim.cpu.r[0], 0);
}

#[test]
fn call_and_ret_round_trip() {
    let rom = assemble_str("main: call $t0,sub,?\nhalt\nsub: add $r0,$r0,1\nret\n").unwrap();
    let sim = run(&rom, |sim| sim.cpu.r[ABI_T0 as usize] = ROM_BASE);
    assert_eq!(sim.cpu.r[0], 1);
    assert_eq!(sim.cpu.r[ABI_RA as usize], ROM_BASE + 4);
}

#[test]
fn load_store_round_trip() {
    let rom = assemble_str("stl $r1,$r0,0\nldl $r2,$r0,0\nhalt\n").unwrap();
    let sim = run(&rom, |sim| {
        sim.cpu.r[0] = RAM_BASE;
        sim.cpu.r[1] = 0xDEADBEEF;
    });
    assert_eq!(sim.cpu.r[2], 0xDEADBEEF);
}

#[test]
fn out_of_range_branch_fails_to_assemble() {
    let mut src = String::from("start: b $r0,end,?z\n");
    for _ in 0..200 {
        src.push_str("add $r0,$r0,1\n");
    }
    src.push_str("end: halt\n");

    let err = assemble_str(&src).unwrap_err();
    let assembly_err = err.downcast::<AssemblyError>().unwrap();
    assert!(matches!(assembly_err, AssemblyError::DisplacementOutOfRange { .. }));
}

#[test]
fn float_add_chain() {
    let rom = assemble_str("fadd3 $f0,$f1,$f2,$f3\n").unwrap();
    let sim = run(&rom, |sim| {
        sim.cpu.f[1] = 1.0;
        sim.cpu.f[2] = 2.0;
        sim.cpu.f[3] = 3.0;
    });
    assert_eq!(sim.cpu.f[0], 6.0);
}

#[test]
fn reserved_opcode_halts_the_simulator_instead_of_aborting() {
    // The control category (nibble 0x2) has no defined instructions.
    let rom = vec![0x02, 0, 0, 0];
    let mut sim = Simulator::new(&rom, Options { quiet: true, ..Default::default() });
    sim.cpu.pc = ROM_BASE;
    assert_eq!(sim.step(), StepOutcome::Halt);
}

#[test]
fn assemble_then_disassemble_round_trips_every_line() {
    let src = "start: add $r0,$r0,5\nsub $r1,$r0,$r1,3\ncmp $r0,$r0,0\nb $r0,start,?z\nhalt\n";
    let rom = assemble_str(src).unwrap();
    let lines: Vec<String> = rom.chunks(4).map(|c| disassemble_one([c[0], c[1], c[2], c[3]]).unwrap()).collect();
    assert_eq!(
        lines,
        vec![
            "add $r0,$r0,5",
            "sub $r1,$r0,$r1,3",
            "cmp $r0,$r0,0",
            "b $r0,-12,?z",
            "halt",
        ]
    );
}

#[test]
fn unknown_mnemonic_is_reported_with_its_line_number() {
    let err = assemble_str("add $r0,$r0,1\nbogus $r0\n").unwrap_err();
    let assembly_err = err.downcast::<AssemblyError>().unwrap();
    assert!(matches!(assembly_err, AssemblyError::UnknownMnemonic { line: 2, .. }));
}
