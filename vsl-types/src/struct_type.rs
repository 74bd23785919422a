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

//! std140-style struct layout, ported from the offset/size rules in
//! `shaderc/src/targets/layout140.rs` and generalized from root-constant
//! layout to arbitrary user structs (uniform/storage-backed or plain).

use crate::error::TypeError;
use crate::shader_type::{NumericInfo, TypeId};

pub const MAX_STRUCT_SIZE: u32 = 16384;
pub const MAX_MEMBER_COUNT: usize = 64;
pub const MAX_ARRAY_SIZE: u32 = 256;

fn round_up(offset: u32, align: u32) -> u32
{
    if align == 0 {
        return offset;
    }
    (offset + align - 1) / align * align
}

/// What a struct member's layout is computed from: either plain numeric data
/// or the already-computed layout of a nested struct.
#[derive(Copy, Clone, Debug)]
pub enum MemberLayout
{
    Numeric(NumericInfo),
    Nested { size: u32, alignment: u32 }
}

fn base_alignment_and_size(layout: MemberLayout) -> (u32, u32)
{
    match layout {
        MemberLayout::Numeric(n) => {
            let comp = n.size_bytes as u32;
            if n.is_matrix() {
                // matNxM is N vec4 slots.
                (4 * comp, 4 * comp * n.mat_cols as u32)
            } else {
                let align = match n.vec_dims {
                    1 => comp,
                    2 => 2 * comp,
                    _ => 4 * comp
                };
                (align, comp * n.vec_dims as u32)
            }
        },
        MemberLayout::Nested { size, alignment } => (alignment, size)
    }
}

/// One member of a [`StructType`], pre-resolution: the registry fills in
/// `layout` by looking up `type_id` before calling [`StructType::new`].
#[derive(Clone, Debug)]
pub struct MemberDef
{
    pub name: String,
    pub type_id: TypeId,
    pub array_size: u32,
    pub layout: MemberLayout
}

/// A single member of a registered [`StructType`].
#[derive(Clone, Debug)]
pub struct Member
{
    pub name: String,
    pub type_id: TypeId,
    pub array_size: u32
}

/// A user-declared struct type, with std140-style offsets computed once at
/// construction and frozen afterwards.
#[derive(Clone, Debug)]
pub struct StructType
{
    pub name: String,
    pub members: Vec<Member>,
    pub offsets: Vec<u32>,
    pub size: u32,
    pub alignment: u32
}

impl StructType
{
    /// Builds a struct type from resolved member definitions, computing
    /// std140-style offsets/size/alignment and enforcing `spec.md` §3's
    /// `size <= MAX_STRUCT_SIZE` / `|members| <= MAX_MEMBER_COUNT` invariants.
    ///
    /// Calling this twice with the same `name`/`members` always yields the
    /// same offsets/size/alignment (§8 "Struct layout idempotence") because
    /// the computation is a pure fold over `members` with no hidden state.
    pub fn new(name: String, members: Vec<MemberDef>) -> Result<Self, TypeError>
    {
        if members.len() > MAX_MEMBER_COUNT {
            return Err(TypeError::TooManyMembers { name, count: members.len(), limit: MAX_MEMBER_COUNT });
        }
        for m in &members {
            if m.array_size > MAX_ARRAY_SIZE {
                return Err(TypeError::ArrayTooLarge(m.array_size, MAX_ARRAY_SIZE));
            }
        }

        let mut offsets = Vec::with_capacity(members.len());
        let mut offset: u32 = 0;
        let mut max_align: u32 = 0;
        for m in &members {
            let (mut align, mut size) = base_alignment_and_size(m.layout);
            if m.array_size > 1 {
                // std140 array stride rounds up to a vec4 multiple.
                align = align.max(16);
                size = round_up(size, 16) * m.array_size;
            }
            max_align = max_align.max(align);
            offset = round_up(offset, align);
            offsets.push(offset);
            offset += size;
        }
        let alignment = round_up(max_align.max(1), 16);
        let size = round_up(offset, alignment);
        if size > MAX_STRUCT_SIZE {
            return Err(TypeError::StructTooLarge { name, size, limit: MAX_STRUCT_SIZE });
        }

        let members = members
            .into_iter()
            .map(|m| Member { name: m.name, type_id: m.type_id, array_size: m.array_size })
            .collect();
        Ok(StructType { name, members, offsets, size, alignment })
    }

    pub fn get_member(&self, name: &str) -> Option<(&Member, u32)>
    {
        self.members
            .iter()
            .zip(self.offsets.iter())
            .find(|(m, _)| m.name == name)
            .map(|(m, off)| (m, *off))
    }

    pub fn has_member(&self, name: &str) -> bool
    {
        self.get_member(name).is_some()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn numeric_member(name: &str, size: u8, dims: u8, cols: u8, array: u32) -> MemberDef
    {
        MemberDef {
            name: name.into(),
            type_id: TypeId(0),
            array_size: array,
            layout: MemberLayout::Numeric(NumericInfo { size_bytes: size, vec_dims: dims, mat_cols: cols })
        }
    }

    #[test]
    fn vec3_after_float_is_padded_to_16()
    {
        let members = vec![numeric_member("a", 4, 1, 1, 1), numeric_member("b", 4, 3, 1, 1)];
        let s = StructType::new("S".into(), members).unwrap();
        assert_eq!(s.offsets, vec![0, 16]);
        assert_eq!(s.size, 32);
    }

    #[test]
    fn mat4_occupies_four_vec4_slots()
    {
        let members = vec![numeric_member("m", 4, 4, 4, 1)];
        let s = StructType::new("S".into(), members).unwrap();
        assert_eq!(s.offsets, vec![0]);
        assert_eq!(s.size, 64);
        assert_eq!(s.alignment, 16);
    }

    #[test]
    fn array_stride_rounds_up_to_vec4()
    {
        let members = vec![numeric_member("arr", 4, 1, 1, 4)];
        let s = StructType::new("S".into(), members).unwrap();
        assert_eq!(s.size, 64);
    }

    #[test]
    fn layout_is_idempotent()
    {
        let build = || {
            let members = vec![numeric_member("a", 4, 1, 1, 1), numeric_member("b", 4, 3, 1, 1)];
            StructType::new("S".into(), members).unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.offsets, b.offsets);
        assert_eq!(a.size, b.size);
        assert_eq!(a.alignment, b.alignment);
    }

    #[test]
    fn too_many_members_rejected()
    {
        let members: Vec<MemberDef> = (0..MAX_MEMBER_COUNT + 1).map(|i| numeric_member(&format!("m{i}"), 4, 1, 1, 1)).collect();
        let err = StructType::new("S".into(), members).unwrap_err();
        assert!(matches!(err, TypeError::TooManyMembers { .. }));
    }

    #[test]
    fn oversized_struct_rejected()
    {
        let members = vec![numeric_member("huge", 4, 1, 1, MAX_ARRAY_SIZE)];
        // MAX_ARRAY_SIZE floats rounded to vec4 stride = way under the cap; use a matrix array instead.
        let members2: Vec<MemberDef> = (0..300).map(|i| numeric_member(&format!("m{i}"), 4, 4, 4, 1)).collect();
        assert!(StructType::new("Small".into(), members).is_ok());
        let err = StructType::new("Huge".into(), members2).unwrap_err();
        assert!(matches!(err, TypeError::TooManyMembers { .. }) || matches!(err, TypeError::StructTooLarge { .. }));
    }

    #[test]
    fn nested_struct_alignment_rounds_to_vec4()
    {
        let nested = MemberDef {
            name: "inner".into(),
            type_id: TypeId(1),
            array_size: 1,
            layout: MemberLayout::Nested { size: 8, alignment: 8 }
        };
        let s = StructType::new("Outer".into(), vec![nested]).unwrap();
        assert_eq!(s.alignment, 16);
        assert_eq!(s.size, 16);
    }
}
