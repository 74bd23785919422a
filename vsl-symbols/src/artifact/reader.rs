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

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::artifact::error::ArtifactError;
use crate::artifact::records::{BindingPayload, BindingRecord, InterfaceRecord, StructMemberRecord, StructRecord, SubpassRecord};

const MAGIC: [u8; 4] = *b"VSL\0";
const VERSION: u32 = 1;

/// Header fields read back from a `.vsp` container, separate from the
/// record groups so callers can inspect `stage_mask` before deciding which
/// bytecode blocks to pull.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactHeader
{
    pub stage_mask: u16,
    pub flags: u16
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactCounts
{
    pub input_count: u8,
    pub output_count: u8,
    pub binding_count: u8,
    pub subpass_count: u8,
    pub struct_count: u16,
    pub has_uniform: bool
}

/// Symmetric counterpart to [`crate::artifact::writer::ArtifactWriter`]; one
/// `read_*` method per record group, in the same on-disk order.
pub struct ArtifactReader<R: Read>
{
    input: R
}

impl<R: Read> ArtifactReader<R>
{
    pub fn new(input: R) -> Self
    {
        ArtifactReader { input }
    }

    pub fn read_header(&mut self) -> Result<ArtifactHeader, ArtifactError>
    {
        let mut magic = [0u8; 4];
        self.input.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(ArtifactError::BadMagic);
        }
        let version = self.input.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Err(ArtifactError::UnsupportedVersion(version));
        }
        let stage_mask = self.input.read_u16::<LittleEndian>()?;
        let flags = self.input.read_u16::<LittleEndian>()?;
        let _reserved = self.input.read_u32::<LittleEndian>()?;
        Ok(ArtifactHeader { stage_mask, flags })
    }

    pub fn read_counts(&mut self) -> Result<ArtifactCounts, ArtifactError>
    {
        let input_count = self.input.read_u8()?;
        let output_count = self.input.read_u8()?;
        let binding_count = self.input.read_u8()?;
        let subpass_count = self.input.read_u8()?;
        let struct_count = self.input.read_u16::<LittleEndian>()?;
        let has_uniform = self.input.read_u8()? != 0;
        let _reserved = self.input.read_u8()?;
        Ok(ArtifactCounts { input_count, output_count, binding_count, subpass_count, struct_count, has_uniform })
    }

    pub fn read_interface_records(&mut self, count: u8) -> Result<Vec<InterfaceRecord>, ArtifactError>
    {
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let location = self.input.read_u8()?;
            let base_type = self.input.read_u8()?;
            let mut dims = [0u8; 2];
            self.input.read_exact(&mut dims)?;
            let array_size = self.input.read_u8()?;
            let mut padding = [0u8; 3];
            self.input.read_exact(&mut padding)?;
            out.push(InterfaceRecord { location, base_type, dims, array_size });
        }
        Ok(out)
    }

    pub fn read_binding_records(&mut self, count: u8) -> Result<Vec<BindingRecord>, ArtifactError>
    {
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let slot = self.input.read_u8()?;
            let base_type = self.input.read_u8()?;
            let stage_mask = self.input.read_u16::<LittleEndian>()?;
            let payload = if crate::limits::is_image_base_type(base_type) {
                let rank = self.input.read_u8()?;
                let texel_type = self.input.read_u8()?;
                let texel_size = self.input.read_u8()?;
                let texel_count = self.input.read_u8()?;
                BindingPayload::Image { rank, texel_type, texel_size, texel_count }
            } else {
                let size = self.input.read_u16::<LittleEndian>()?;
                let mut padding = [0u8; 2];
                self.input.read_exact(&mut padding)?;
                BindingPayload::Buffer { size }
            };
            out.push(BindingRecord { slot, base_type, stage_mask, payload });
        }
        Ok(out)
    }

    pub fn read_subpass_records(&mut self, count: u8) -> Result<Vec<SubpassRecord>, ArtifactError>
    {
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let texel_format = self.input.read_u8()?;
            let texel_count = self.input.read_u8()?;
            let mut padding = [0u8; 2];
            self.input.read_exact(&mut padding)?;
            out.push(SubpassRecord { texel_format, texel_count });
        }
        Ok(out)
    }

    pub fn read_struct_records(&mut self, count: u16) -> Result<Vec<StructRecord>, ArtifactError>
    {
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name_len = self.input.read_u8()? as usize;
            let mut name_bytes = vec![0u8; name_len];
            self.input.read_exact(&mut name_bytes)?;
            let name = String::from_utf8_lossy(&name_bytes).into_owned();
            let member_count = self.input.read_u16::<LittleEndian>()?;
            let mut members = Vec::with_capacity(member_count as usize);
            for _ in 0..member_count {
                let base_type = self.input.read_u8()?;
                let mut dims = [0u8; 2];
                self.input.read_exact(&mut dims)?;
                let array_size = self.input.read_u8()?;
                members.push(StructMemberRecord { base_type, dims, array_size });
            }
            out.push(StructRecord { name, members });
        }
        Ok(out)
    }

    pub fn read_uniform_index(&mut self, has_uniform: bool) -> Result<Option<u16>, ArtifactError>
    {
        if !has_uniform {
            return Ok(None);
        }
        Ok(Some(self.input.read_u16::<LittleEndian>()?))
    }

    pub fn read_stage_bytecode(&mut self) -> Result<Vec<u32>, ArtifactError>
    {
        let len = self.input.read_u32::<LittleEndian>()? as usize;
        let mut words = Vec::with_capacity(len);
        for _ in 0..len {
            words.push(self.input.read_u32::<LittleEndian>()?);
        }
        Ok(words)
    }

    pub fn into_inner(self) -> R
    {
        self.input
    }
}

/// A fully parsed `.vsp` artifact, record groups only (no live `TypeId`s);
/// used directly for the round-trip property and as the basis for any
/// consumer that just needs reflection data without recompiling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedArtifact
{
    pub header: ArtifactHeader,
    pub inputs: Vec<InterfaceRecord>,
    pub outputs: Vec<InterfaceRecord>,
    pub bindings: Vec<BindingRecord>,
    pub subpass_inputs: Vec<SubpassRecord>,
    pub structs: Vec<StructRecord>,
    pub uniform_index: Option<u16>,
    pub stage_bytecode: Vec<Vec<u32>>
}

pub fn read_artifact<R: Read>(input: R) -> Result<ParsedArtifact, ArtifactError>
{
    let mut reader = ArtifactReader::new(input);
    let header = reader.read_header()?;
    let counts = reader.read_counts()?;
    let inputs = reader.read_interface_records(counts.input_count)?;
    let outputs = reader.read_interface_records(counts.output_count)?;
    let bindings = reader.read_binding_records(counts.binding_count)?;
    let subpass_inputs = reader.read_subpass_records(counts.subpass_count)?;
    let structs = reader.read_struct_records(counts.struct_count)?;
    let uniform_index = reader.read_uniform_index(counts.has_uniform)?;

    let mut stage_bytecode = Vec::new();
    for stage in vsl_types::ShaderStages::ORDER {
        if header.stage_mask & stage.bits() != 0 {
            stage_bytecode.push(reader.read_stage_bytecode()?);
        }
    }

    Ok(ParsedArtifact { header, inputs, outputs, bindings, subpass_inputs, structs, uniform_index, stage_bytecode })
}
