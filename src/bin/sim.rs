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

//! `xmsim`'s flags are single-dash and multi-letter (`-quiet`, `-ticks
//! <N>`), not clap's `--long` convention, so argv is walked by hand here
//! the same way the retrieved `sim.c`'s option loop does.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use xm::isa::registers::{ABI_A0, ABI_RA, ABI_T0};
use xm::simulator::{Options, Simulator};

const DEFAULT_TICKS: u64 = 25;

struct Args {
    rom_path: PathBuf,
    options: Options,
    ticks: u64,
    init_t0: bool,
    init_ra: bool,
    a: [Option<u32>; 4],
}

fn parse_args() -> Result<Args> {
    let mut rom_path = None;
    let mut options = Options::default();
    let mut ticks = DEFAULT_TICKS;
    let mut init_t0 = false;
    let mut init_ra = false;
    let mut a = [None; 4];

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-quiet" => options.quiet = true,
            "-test" => options.test = true,
            "-trace-mem" => options.trace_mem = true,
            "-t0" => init_t0 = true,
            "-ra" => init_ra = true,
            "-ticks" => {
                i += 1;
                let n = argv.get(i).ok_or_else(|| anyhow!("-ticks requires a value"))?;
                ticks = n.parse().map_err(|_| anyhow!("-ticks value must be an integer: {n}"))?;
            }
            "-a0" | "-a1" | "-a2" | "-a3" => {
                let slot = argv[i].as_bytes()[2] - b'0';
                i += 1;
                let n = argv.get(i).ok_or_else(|| anyhow!("{} requires a value", argv[i - 1]))?;
                a[slot as usize] = Some(n.parse().map_err(|_| anyhow!("{} value must be an integer: {n}", argv[i - 1]))?);
            }
            other => {
                if rom_path.is_some() {
                    return Err(anyhow!("unexpected extra argument: {other}"));
                }
                rom_path = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    Ok(Args {
        rom_path: rom_path.ok_or_else(|| anyhow!("usage: xmsim [flags] <rom-file>"))?,
        options,
        ticks,
        init_t0,
        init_ra,
        a,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = parse_args()?;
    let rom = fs::read(&args.rom_path)?;

    let mut sim = Simulator::new(&rom, args.options);
    sim.cpu.pc = xm::isa::memory_map::ROM_BASE;

    if args.init_t0 {
        sim.cpu.r[ABI_T0 as usize] = xm::isa::memory_map::RAM_BASE;
    }
    if args.init_ra {
        sim.cpu.r[ABI_RA as usize] = xm::isa::memory_map::ROM_BASE;
    }
    for (i, value) in args.a.into_iter().enumerate() {
        if let Some(v) = value {
            sim.cpu.r[ABI_A0 as usize + i] = v;
        }
    }

    sim.run(args.ticks);

    if sim.options.test {
        for (i, r) in sim.cpu.r.iter().enumerate() {
            print!("r{i}={r:#010x} ");
        }
        println!();
    }

    Ok(())
}
