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

use thiserror::Error;

/// Failures raised by the type registry and struct layout rules.
///
/// These carry no line/column: the registry has no notion of source
/// position, callers in `vsl-compiler` attach that when they wrap a
/// `TypeError` into a `ShaderError`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError
{
    #[error("unknown type name '{0}'")]
    UnknownType(String),
    #[error("unknown texel format '{0}'")]
    UnknownTexelFormat(String),
    #[error("type name '{0}' collides with a builtin type")]
    CollidesWithBuiltin(String),
    #[error("struct '{0}' is already defined")]
    DuplicateStruct(String),
    #[error("struct '{name}' has {count} members, exceeding the limit of {limit}")]
    TooManyMembers { name: String, count: usize, limit: usize },
    #[error("struct '{name}' is {size} bytes, exceeding the limit of {limit}")]
    StructTooLarge { name: String, size: u32, limit: u32 },
    #[error("member '{0}' of a uniform/storage-backed struct may not be a sampler, image, or buffer type")]
    IllegalMemberType(String),
    #[error("array size {0} exceeds the limit of {1}")]
    ArrayTooLarge(u32, u32)
}
