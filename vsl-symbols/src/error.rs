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

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReflectionError
{
    #[error("input location {0} is already used")]
    DuplicateInputLocation(u32),
    #[error("output location {0} is already used")]
    DuplicateOutputLocation(u32),
    #[error("binding slot {0} is already used")]
    DuplicateBindingSlot(u32),
    #[error("subpass input index {0} is already used")]
    DuplicateSubpassIndex(u32),
    #[error("at most {0} subpass inputs are supported")]
    TooManySubpassInputs(usize),
    #[error("a uniform block is already declared")]
    UniformAlreadySet,
    #[error("input location {location} exceeds the limit of {limit}")]
    InputLocationOutOfRange { location: u32, limit: u32 },
    #[error("output location {location} exceeds the limit of {limit}")]
    OutputLocationOutOfRange { location: u32, limit: u32 },
    #[error("binding slot {slot} exceeds the limit of {limit}")]
    BindingSlotOutOfRange { slot: u32, limit: u32 },
    #[error("input array size {size} exceeds the limit of {limit}")]
    InputArrayTooLarge { size: u32, limit: u32 }
}
