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

//! On-disk record shapes for the `.vsp` container (`spec.md` §6). These are
//! plain data, decoupled from `vsl-types::TypeId`/`TypeRegistry` on purpose:
//! the writer resolves live types down to these records, and the reader
//! produces them back from bytes with no registry involved, which is what
//! makes the "artifact round-trip" property (`spec.md` §8) checkable
//! without re-standing a `TypeRegistry` on read.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceRecord
{
    pub location: u8,
    pub base_type: u8,
    pub dims: [u8; 2],
    pub array_size: u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingPayload
{
    Image
    {
        rank: u8, texel_type: u8, texel_size: u8, texel_count: u8
    },
    Buffer
    {
        size: u16
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingRecord
{
    pub slot: u8,
    pub base_type: u8,
    pub stage_mask: u16,
    pub payload: BindingPayload
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubpassRecord
{
    pub texel_format: u8,
    pub texel_count: u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructMemberRecord
{
    pub base_type: u8,
    pub dims: [u8; 2],
    pub array_size: u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructRecord
{
    pub name: String,
    pub members: Vec<StructMemberRecord>
}
