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
use vsl_types::{ShaderStages, StructId, TypeId};

/// A vertex input or fragment output (`spec.md` §3 `InterfaceVariable`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceVariable
{
    pub name: String,
    pub location: u32,
    pub data_type: TypeId,
    pub array_size: u32
}

impl InterfaceVariable
{
    /// Number of consecutive locations this variable reserves: a matrix
    /// spans `matCols` locations, an array multiplies that by `array_size`.
    pub fn binding_count(&self, binding_count_of_type: u32) -> u32
    {
        binding_count_of_type * self.array_size
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingVariable
{
    pub name: String,
    pub slot: u32,
    pub data_type: TypeId,
    pub stage_mask: ShaderStages
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubpassInputVariable
{
    pub name: String,
    pub index: u32,
    pub data_type: TypeId,
    pub stage_mask: ShaderStages
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformVariable
{
    pub name: String,
    pub struct_id: StructId,
    pub stage_mask: ShaderStages
}
