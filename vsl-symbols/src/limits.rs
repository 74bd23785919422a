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

//! Reflection-table limits, scaled from `original_source/vsl/Config.hpp`'s
//! Vulkan descriptor/attachment limits to round numbers (SPEC_FULL.md §12).

pub const MAX_INPUT_INDEX: u32 = 15;
pub const MAX_OUTPUT_INDEX: u32 = 7;
pub const MAX_BINDING_INDEX: u32 = 4095;
pub const MAX_SUBPASS_INPUTS: usize = 4;
pub const MAX_INPUT_ARRAY_SIZE: u32 = 16;

/// `BaseType` discriminants carrying a `TexelInfo` payload (Sampler=5,
/// Image=6, ROTexels=9, RWTexels=10), as opposed to a struct-backed buffer
/// (ROBuffer=7, RWBuffer=8, Uniform=12). Mirrors `vsl_types::BaseType`'s
/// numbering without requiring the artifact reader to depend on
/// `vsl-types::ShaderType` to tell the two payload shapes apart.
pub fn is_image_base_type(base_type: u8) -> bool
{
    matches!(base_type, 5 | 6 | 9 | 10)
}
