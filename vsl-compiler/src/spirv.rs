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

//! The SPIR-V driver binding (component G): turns one stage's generated GLSL
//! text into a SPIR-V module. The backend is treated as opaque, exactly as
//! `vsl::Shaderc` treats `shaderc::Compiler` in the original implementation:
//! any diagnostic the backend raises is surfaced as a single internal error
//! with no source line mapping, since the backend only ever sees generated
//! GLSL, not the original shader source.
//!
//! This binds Google's `shaderc` crate rather than `glslang-sys`/`rglslang`:
//! those crates FFI-bind a vendored glslang submodule through a hand-written
//! bindgen wrapper that cannot be regenerated without the submodule present,
//! while `shaderc` is a self-contained published crate offering the same
//! GLSL-to-SPIR-V path the original `vsl::Shaderc` already wrapped.

use shaderc::{CompileOptions, Compiler, OptimizationLevel, ShaderKind};
use vsl_types::ShaderStages;

use crate::error::{Result, ShaderError};

fn shader_kind(stage: ShaderStages) -> ShaderKind
{
    match stage {
        ShaderStages::VERTEX => ShaderKind::Vertex,
        ShaderStages::TESS_CONTROL => ShaderKind::TessControl,
        ShaderStages::TESS_EVAL => ShaderKind::TessEvaluation,
        ShaderStages::GEOMETRY => ShaderKind::Geometry,
        ShaderStages::FRAGMENT => ShaderKind::Fragment,
        _ => ShaderKind::InferFromSource
    }
}

/// A backend able to turn one stage's GLSL text into SPIR-V words.
pub trait SpirvDriver
{
    fn compile(&self, glsl: &str, stage: ShaderStages, entry_point: &str) -> Result<Vec<u32>>;
}

/// The `shaderc`-backed [`SpirvDriver`]. Holds its own compiler instance and
/// optimization preference; one instance is enough to compile every stage of
/// a `Shader`, and is cheap enough to create per-`Shader` instead of sharing
/// one process-wide (the original likewise keeps its `shaderc::Compiler`
/// handle scoped to a single `vsl::Shaderc` compilation task).
pub struct SpirvCompiler
{
    compiler: Compiler,
    optimize: bool
}

impl SpirvCompiler
{
    pub fn new(optimize: bool) -> Result<Self>
    {
        let compiler = Compiler::new().ok_or_else(|| ShaderError::internal("failed to initialize the SPIR-V compiler backend"))?;
        Ok(SpirvCompiler { compiler, optimize })
    }
}

impl SpirvDriver for SpirvCompiler
{
    fn compile(&self, glsl: &str, stage: ShaderStages, entry_point: &str) -> Result<Vec<u32>>
    {
        let mut options =
            CompileOptions::new().ok_or_else(|| ShaderError::internal("failed to initialize SPIR-V compile options"))?;
        options.set_optimization_level(if self.optimize { OptimizationLevel::Performance } else { OptimizationLevel::Zero });
        let kind = shader_kind(stage);
        let artifact = self
            .compiler
            .compile_into_spirv(glsl, kind, stage.source_name(), entry_point, Some(&options))
            .map_err(|e| ShaderError::internal(e.to_string()))?;
        Ok(artifact.as_binary().to_vec())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn shader_kind_maps_every_graphics_stage()
    {
        assert!(matches!(shader_kind(ShaderStages::VERTEX), ShaderKind::Vertex));
        assert!(matches!(shader_kind(ShaderStages::TESS_CONTROL), ShaderKind::TessControl));
        assert!(matches!(shader_kind(ShaderStages::TESS_EVAL), ShaderKind::TessEvaluation));
        assert!(matches!(shader_kind(ShaderStages::GEOMETRY), ShaderKind::Geometry));
        assert!(matches!(shader_kind(ShaderStages::FRAGMENT), ShaderKind::Fragment));
    }
}
