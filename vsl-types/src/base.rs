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

/// Tag discriminating what kind of object a [`crate::ShaderType`] describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BaseType
{
    /// Special type for errors and function returns.
    Void = 0,
    Boolean = 1,
    Signed = 2,
    Unsigned = 3,
    Float = 4,
    /// Vk combined image/sampler, glsl `sampler*D`.
    Sampler = 5,
    /// Vk storage image, glsl `image*D` w/ layout.
    Image = 6,
    /// Vk readonly storage buffer, glsl `readonly buffer <name> { ... }`.
    ROBuffer = 7,
    /// Vk read/write storage buffer, glsl `buffer <name> { ... }`.
    RWBuffer = 8,
    /// Vk uniform texel buffer, glsl `textureBuffer`.
    ROTexels = 9,
    /// Vk storage texel buffer, glsl `imageBuffer` w/ layout.
    RWTexels = 10,
    /// Vk input attachment, glsl `[ui]subpassInput`.
    SubpassInput = 11,
    /// Vk uniform buffer, glsl `uniform <name> { ... }`.
    Uniform = 12,
    /// User-defined POD struct.
    Struct = 13
}

impl BaseType
{
    pub fn is_numeric(self) -> bool
    {
        matches!(self, BaseType::Boolean | BaseType::Signed | BaseType::Unsigned | BaseType::Float)
    }

    pub fn is_integer(self) -> bool
    {
        matches!(self, BaseType::Signed | BaseType::Unsigned)
    }

    pub fn is_texel_object(self) -> bool
    {
        matches!(
            self,
            BaseType::Sampler
                | BaseType::Image
                | BaseType::ROTexels
                | BaseType::RWTexels
                | BaseType::SubpassInput
        )
    }

    pub fn is_buffer_object(self) -> bool
    {
        matches!(self, BaseType::ROBuffer | BaseType::RWBuffer | BaseType::Uniform)
    }

    pub fn has_struct_payload(self) -> bool
    {
        self.is_buffer_object() || matches!(self, BaseType::Struct)
    }
}

/// The different ranks (dimension counts) that texel-like objects can have.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TexelRank
{
    E1D = 0,
    E2D = 1,
    E3D = 2,
    E1DArray = 3,
    E2DArray = 4,
    Cube = 5,
    /// The only rank valid for `ROTexels`/`RWTexels`.
    Buffer = 6
}

impl TexelRank
{
    /// GLSL sampler/image name suffix, e.g. `2DArray`.
    pub fn glsl_suffix(self) -> &'static str
    {
        match self {
            TexelRank::E1D => "1D",
            TexelRank::E2D => "2D",
            TexelRank::E3D => "3D",
            TexelRank::E1DArray => "1DArray",
            TexelRank::E2DArray => "2DArray",
            TexelRank::Cube => "Cube",
            TexelRank::Buffer => "Buffer"
        }
    }
}

/// The base types for texel formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TexelType
{
    Signed = 0,
    Unsigned = 1,
    Float = 2,
    UNorm = 3,
    SNorm = 4
}
