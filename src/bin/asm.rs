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
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use xm::assemble;
use xm::file_reader::AsmFileReader;

/// `asm <in> <out>`. Both paths are positional; a missing path exits 1.
#[derive(Parser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    input: PathBuf,
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let opts: Opts = Opts::try_parse().unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });
    let reader = AsmFileReader;
    let input_path: &Path = Path::new(&opts.input);

    let rom = assemble(input_path, &reader)?;

    fs::write(&opts.output, &rom)?;
    println!(
        "assembled {} ({} bytes) to {}",
        opts.input.display(),
        rom.len(),
        opts.output.display()
    );

    Ok(())
}
