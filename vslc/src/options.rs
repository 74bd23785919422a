// Copyright (c) 2021, BlockProject 3D
//
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//     * Redistributions in binary form must reproduce the above copyright notice,
//       this list of conditions and the following disclaimer in the documentation
//       and/or other materials provided with the distribution.
//     * Neither the name of BlockProject 3D nor the names of its contributors
//       may be used to endorse or promote products derived from this software
//       without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Resolved CLI options, collected once in `main` the way the teacher's
/// `shaderc/src/options.rs::Args` collects `clap`'s builder matches before
/// handing them to a target function.
#[derive(Parser, Debug)]
#[command(name = "vslc", version, about = "BlockProject 3D SDK - VSL shader compiler")]
pub struct Cli
{
    /// Shader units to compile (RON-encoded syntax trees; see vsl-ast)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output artifact path. Only valid with a single input file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Dump per-stage GLSL next to the output artifact
    #[arg(long)]
    pub save_intermediate: bool,

    /// Dump per-stage SPIR-V next to the output artifact
    #[arg(long)]
    pub save_bytecode: bool,

    /// Disable SPIR-V optimization in the driver interface
    #[arg(long)]
    pub no_optimize: bool,

    /// Stop after GLSL generation (skip SPIR-V compilation and artifact write)
    #[arg(long)]
    pub no_compile: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8
}

/// Sets the global log level from the `-v` occurrence count, the same
/// escalation the teacher's `main.rs` applies by hand against
/// `log::LevelFilter`, using `env_logger` in place of its private
/// `simple_logger`/`bp3d_logger`.
pub fn init_logging(verbosity: u8)
{
    let level = match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::Builder::new().filter_level(level).format_timestamp(None).init();
}
