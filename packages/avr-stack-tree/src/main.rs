// Copyright (c) 2026 AVR-Stack-Tree Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::warn;

use avr_stack_tree::call_tree::DEFAULT_MAX_DEPTH;
use avr_stack_tree::debug::init_logging;
use avr_stack_tree::report::{write_dump, write_json, write_tree};
use avr_stack_tree::{
    extract_functions, load_listing, walk, Function, FunctionIndex, RenderOptions, WalkOptions,
};

#[derive(Debug, Parser)]
#[command(
    name = "avr-stack-tree",
    version,
    about = "Analyse the AVR call tree from an .lss file, annotated with stack usage"
)]
struct Cli {
    /// The .lss file
    #[arg(value_name = "LSS")]
    lss: PathBuf,

    /// The function to print the call tree for
    #[arg(value_name = "FUNC")]
    func: String,

    /// Stop expanding a branch below this many levels
    #[arg(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print every function and its callees before the tree
    #[arg(long = "dump", default_value_t = false)]
    dump: bool,

    /// Print the tree as JSON instead of text
    #[arg(long = "json", default_value_t = false)]
    json: bool,

    /// Show demangled C++/Rust names
    #[arg(long = "demangle", default_value_t = false)]
    demangle: bool,

    /// Enable debug output
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    debug: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.debug)?;

    let text = load_listing(&cli.lss)?;
    let index = FunctionIndex::from_listing(&text);
    let render = RenderOptions {
        demangle: cli.demangle,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.dump {
        let functions: Vec<Function> = extract_functions(&text).collect();
        write_dump(&functions, render, &mut out)?;
    }

    if !index.contains(&cli.func) {
        warn!("Function \"{}\" not found", cli.func);
    }

    let tree = walk(
        &index,
        &cli.func,
        WalkOptions {
            max_depth: cli.max_depth,
        },
    );
    if cli.json {
        write_json(&tree, &mut out)?;
    } else {
        write_tree(&tree, render, &mut out)?;
    }
    out.flush()?;
    Ok(())
}
