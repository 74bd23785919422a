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

use serde::{Deserialize, Serialize};
use vsl_types::ShaderStages;

use crate::span::Span;
use crate::stmt::Statement;

/// `shader graphics;` — the only pipeline kind this core analyzes
/// (`spec.md` §1 Non-goals excludes compute/ray-tracing).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderKind
{
    Graphics
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructMemberDecl
{
    pub name: String,
    pub type_name: String,
    pub array_size: u32,
    pub span: Span
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructDecl
{
    pub name: String,
    pub members: Vec<StructMemberDecl>,
    pub span: Span
}

/// `in(L) NAME: TYPE[;N];`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputDecl
{
    pub location: u32,
    pub name: String,
    pub type_name: String,
    pub array_size: u32,
    pub span: Span
}

/// `out(L) NAME: TYPE;`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputDecl
{
    pub location: u32,
    pub name: String,
    pub type_name: String,
    pub span: Span
}

/// `uniform NAME: STRUCT;`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformDecl
{
    pub name: String,
    pub struct_name: String,
    pub span: Span
}

/// `bind(S) NAME: TYPE;` — `type_name` may carry a `<...>` parametric
/// suffix (`image2D<rgba8_unorm>`, `ROBuffer<MyStruct>`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingDecl
{
    pub slot: u32,
    pub name: String,
    pub type_name: String,
    pub span: Span
}

/// `subpass(I) NAME: TYPE<FMT>;`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubpassDecl
{
    pub index: u32,
    pub name: String,
    pub type_name: String,
    pub span: Span
}

/// `local NAME: TYPE [flat];` — Vertex→Fragment interpolant. The grammar
/// has no syntax to override the stage pair, so the parser always fills
/// the `spec.md` §3 defaults (`source_stage = Vertex`, `dest_stage = Fragment`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalDecl
{
    pub name: String,
    pub type_name: String,
    pub flat: bool,
    pub source_stage: ShaderStages,
    pub dest_stage: ShaderStages,
    pub span: Span
}

/// `stage vert { ... }` / `stage frag { ... }` / ... one per declared stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageFunction
{
    pub stage: ShaderStages,
    pub body: Vec<Statement>,
    pub span: Span
}

/// The complete parsed unit for one `.vsl` source file, in file-level
/// declaration order (`spec.md` §4.4.1).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaderFile
{
    pub kind: ShaderKind,
    pub structs: Vec<StructDecl>,
    pub inputs: Vec<InputDecl>,
    pub outputs: Vec<OutputDecl>,
    pub uniform: Option<UniformDecl>,
    pub bindings: Vec<BindingDecl>,
    pub subpass_inputs: Vec<SubpassDecl>,
    pub locals: Vec<LocalDecl>,
    pub stages: Vec<StageFunction>
}

impl ShaderFile
{
    /// The bitmask of stages this file declares an entry point for.
    pub fn stage_mask(&self) -> ShaderStages
    {
        self.stages.iter().fold(ShaderStages::empty(), |acc, s| acc | s.stage)
    }
}
