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

mod options;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;

use clap::Parser;
use log::{debug, error, info};
use rayon::prelude::*;
use vsl_ast::ShaderFile;
use vsl_compiler::{Config, Shader, SpirvCompiler};

use crate::options::Cli;

/// The process exit code for one input file, in ascending severity so the
/// worst outcome across a batch of files can be picked with `max` (`spec.md`
/// §6: 0 success, 1 usage error, 2 compilation failure).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum FileOutcome
{
    Success = 0,
    Usage = 1,
    Failure = 2
}

fn default_output_path(input: &Path) -> PathBuf
{
    input.with_extension("vsp")
}

fn load_shader_file(path: &Path) -> Result<ShaderFile, String>
{
    let text = std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    ron::from_str(&text).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn write_intermediate(stem: &Path, stage_sources: &[(vsl_types::ShaderStages, String)]) -> std::io::Result<()>
{
    for (stage, source) in stage_sources {
        let path = stem.with_extension(stage.source_name());
        debug!("writing intermediate GLSL to {}", path.display());
        std::fs::write(path, source)?;
    }
    Ok(())
}

fn write_bytecode_dumps(stem: &Path, stage_bytecode: &[(vsl_types::ShaderStages, Vec<u32>)]) -> std::io::Result<()>
{
    for (stage, words) in stage_bytecode {
        let path = stem.with_extension(format!("{}.spv", stage.source_name()));
        debug!("writing SPIR-V dump to {}", path.display());
        let mut file = File::create(path)?;
        for w in words {
            file.write_all(&w.to_le_bytes())?;
        }
    }
    Ok(())
}

fn process_file(path: &Path, output: Option<&Path>, cli: &Cli) -> FileOutcome
{
    info!("compiling {}", path.display());
    let file = match load_shader_file(path) {
        Ok(f) => f,
        Err(e) => {
            error!("{e}");
            return FileOutcome::Usage;
        }
    };

    let config = Config { optimize: !cli.no_optimize, compile_spirv: !cli.no_compile, ..Config::default() };
    let mut shader = Shader::new(file, config);
    if let Err(e) = shader.parse() {
        error!("{e}");
        return FileOutcome::Failure;
    }
    if let Err(e) = shader.generate() {
        error!("{e}");
        return FileOutcome::Failure;
    }

    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| default_output_path(path));
    if cli.save_intermediate {
        if let Err(e) = write_intermediate(&out_path, shader.stage_sources()) {
            error!("failed to write intermediate GLSL for {}: {e}", path.display());
            return FileOutcome::Failure;
        }
    }

    if cli.no_compile {
        info!("stopping after GLSL generation for {} (--no-compile)", path.display());
        return FileOutcome::Success;
    }

    let driver = match SpirvCompiler::new(!cli.no_optimize) {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            return FileOutcome::Failure;
        }
    };
    if let Err(e) = shader.compile(&driver) {
        error!("{e}");
        return FileOutcome::Failure;
    }

    if cli.save_bytecode {
        if let Err(e) = write_bytecode_dumps(&out_path, shader.stage_bytecode()) {
            error!("failed to write SPIR-V dumps for {}: {e}", path.display());
            return FileOutcome::Failure;
        }
    }

    let result = File::create(&out_path).and_then(|f| shader.write(f).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string())));
    match result {
        Ok(_) => {
            info!("wrote {}", out_path.display());
            FileOutcome::Success
        },
        Err(e) => {
            error!("failed to write {}: {e}", out_path.display());
            FileOutcome::Failure
        }
    }
}

fn main() -> ProcessExitCode
{
    let cli = Cli::parse();
    options::init_logging(cli.verbose);
    info!("Initializing the VSL shader compiler...");

    if cli.files.len() > 1 && cli.output.is_some() {
        error!("--output cannot be combined with more than one input file");
        return ProcessExitCode::from(1);
    }

    let outcome = cli
        .files
        .par_iter()
        .map(|path| process_file(path, cli.output.as_deref(), &cli))
        .max()
        .unwrap_or(FileOutcome::Usage);

    ProcessExitCode::from(outcome as u8)
}
