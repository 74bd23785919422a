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

//! The shader orchestrator (component I): sequences parse -> generate ->
//! compile -> write over one `ShaderFile` and latches the first error, the
//! same progression as the original `vsl::Shader`'s `parsed`/`generated`/
//! `compiled` flags.
//!
//! There is no grammar in this workspace (`vsl-ast` is the contract an
//! external parser is assumed to produce), so `parse` here accepts an
//! already-built `ShaderFile` and checks the structural preconditions the
//! rest of the pipeline relies on; `generate` is where semantic analysis and
//! GLSL generation actually happen, mirroring how the original's `generate()`
//! drives the `Generator` family over a tree `parseFile`/`parseString`
//! already built.

use std::io::Write;

use log::{debug, info};
use vsl_ast::ShaderFile;
use vsl_symbols::artifact::write_artifact;
use vsl_types::ShaderStages;

use crate::analyzer::{self, CompiledShader};
use crate::config::Config;
use crate::error::{Result, ShaderError, ShaderErrorKind};
use crate::spirv::SpirvDriver;

const ENTRY_POINT: &str = "main";

#[derive(Default)]
struct Progress
{
    parsed: bool,
    generated: bool,
    compiled: bool
}

/// One shader compilation, taken through its phases in order. Each phase
/// method runs its corresponding transition exactly once and refuses to run
/// ahead of a phase it depends on.
pub struct Shader
{
    file: ShaderFile,
    config: Config,
    progress: Progress,
    compiled: Option<CompiledShader>,
    stage_bytecode: Vec<(ShaderStages, Vec<u32>)>
}

impl Shader
{
    pub fn new(file: ShaderFile, config: Config) -> Self
    {
        Shader { file, config, progress: Progress::default(), compiled: None, stage_bytecode: Vec::new() }
    }

    pub fn is_parsed(&self) -> bool
    {
        self.progress.parsed
    }

    pub fn is_generated(&self) -> bool
    {
        self.progress.generated
    }

    pub fn is_compiled(&self) -> bool
    {
        self.progress.compiled
    }

    /// Accepts the syntax tree: checks it declares at least one stage
    /// function, since a file with none has nothing for `generate` to walk.
    pub fn parse(&mut self) -> Result<()>
    {
        if self.progress.parsed {
            return Err(ShaderError::internal("parse() already ran for this shader"));
        }
        if self.file.stages.is_empty() {
            return Err(ShaderError::new(ShaderErrorKind::Syntax, vsl_ast::Span::default(), "", "shader declares no stage functions"));
        }
        debug!("accepted shader file with {} stage(s)", self.file.stages.len());
        self.progress.parsed = true;
        Ok(())
    }

    /// Runs semantic analysis and per-stage GLSL generation (components D
    /// through F).
    pub fn generate(&mut self) -> Result<()>
    {
        if !self.progress.parsed {
            return Err(ShaderError::internal("generate() called before parse() succeeded"));
        }
        if self.progress.generated {
            return Err(ShaderError::internal("generate() already ran for this shader"));
        }
        let compiled = analyzer::analyze(&self.file, &self.config)?;
        info!("generated GLSL for {} stage(s)", compiled.stage_sources.len());
        self.compiled = Some(compiled);
        self.progress.generated = true;
        Ok(())
    }

    /// Runs the SPIR-V driver over every generated stage (component G).
    pub fn compile(&mut self, driver: &dyn SpirvDriver) -> Result<()>
    {
        if !self.progress.generated {
            return Err(ShaderError::internal("compile() called before generate() succeeded"));
        }
        if self.progress.compiled {
            return Err(ShaderError::internal("compile() already ran for this shader"));
        }
        let compiled = self.compiled.as_ref().expect("generate() populated this before setting the generated flag");
        let mut bytecode = Vec::with_capacity(compiled.stage_sources.len());
        for (stage, glsl) in &compiled.stage_sources {
            debug!("compiling {} stage to SPIR-V", stage.source_name());
            let words = driver.compile(glsl, *stage, ENTRY_POINT)?;
            bytecode.push((*stage, words));
        }
        self.stage_bytecode = bytecode;
        self.progress.compiled = true;
        Ok(())
    }

    /// Writes the `.vsp` artifact (component H). Requires `compile()` to
    /// have produced bytecode for every generated stage.
    pub fn write<W: Write>(&self, out: W) -> Result<W>
    {
        if !self.progress.compiled {
            return Err(ShaderError::internal("write() called before compile() succeeded"));
        }
        let compiled = self.compiled.as_ref().expect("compile() requires generate() to have populated this");
        write_artifact(out, &compiled.registry, &compiled.info, 0, &self.stage_bytecode)
            .map_err(|e| ShaderError::internal(e.to_string()))
    }

    /// The per-stage GLSL text produced by `generate()`, for `--save-intermediate`.
    pub fn stage_sources(&self) -> &[(ShaderStages, String)]
    {
        match &self.compiled {
            Some(c) => &c.stage_sources,
            None => &[]
        }
    }

    /// The per-stage SPIR-V words produced by `compile()`, for `--save-bytecode`.
    pub fn stage_bytecode(&self) -> &[(ShaderStages, Vec<u32>)]
    {
        &self.stage_bytecode
    }
}

#[cfg(test)]
mod tests
{
    use vsl_ast::ShaderKind;

    use super::*;

    fn empty_file() -> ShaderFile
    {
        ShaderFile {
            kind: ShaderKind::Graphics,
            structs: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            uniform: None,
            bindings: Vec::new(),
            subpass_inputs: Vec::new(),
            locals: Vec::new(),
            stages: Vec::new()
        }
    }

    #[test]
    fn parse_rejects_a_file_with_no_stages()
    {
        let mut shader = Shader::new(empty_file(), Config::default());
        assert!(shader.parse().is_err());
    }

    #[test]
    fn generate_before_parse_is_an_error()
    {
        let mut file = empty_file();
        file.stages.push(vsl_ast::StageFunction { stage: ShaderStages::VERTEX, body: Vec::new(), span: vsl_ast::Span::default() });
        let mut shader = Shader::new(file, Config::default());
        assert!(shader.generate().is_err());
        assert!(shader.parse().is_ok());
        assert!(shader.generate().is_ok());
        assert!(shader.is_generated());
    }

    #[test]
    fn compile_before_generate_is_an_error()
    {
        let mut file = empty_file();
        file.stages.push(vsl_ast::StageFunction { stage: ShaderStages::VERTEX, body: Vec::new(), span: vsl_ast::Span::default() });
        let mut shader = Shader::new(file, Config::default());
        shader.parse().unwrap();
        struct NeverCalled;
        impl SpirvDriver for NeverCalled
        {
            fn compile(&self, _glsl: &str, _stage: ShaderStages, _entry_point: &str) -> Result<Vec<u32>>
            {
                panic!("driver should not run before generate()");
            }
        }
        assert!(shader.compile(&NeverCalled).is_err());
    }
}
