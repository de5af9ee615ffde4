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

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use xm::disassembler::disassemble;
use xm::isa::memory_map::ROM_BASE;

#[derive(Parser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// Binary file to disassemble. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Address of the first byte of `input`, for the printed addresses.
    #[clap(short, long, default_value_t = ROM_BASE)]
    base: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let opts: Opts = Opts::parse();
    let image = match &opts.input {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };

    for line in disassemble(&image, opts.base) {
        match line.text {
            Ok(text) => println!("{:#010x}: {}", line.addr, text),
            Err(err) => println!("{:#010x}: <invalid> ({err})", line.addr),
        }
    }

    Ok(())
}
