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

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use vsl_types::{TypeId, TypeRegistry};

use crate::artifact::error::ArtifactError;
use crate::artifact::records::{BindingPayload, BindingRecord, InterfaceRecord, StructMemberRecord, StructRecord, SubpassRecord};
use crate::shader_info::ShaderInfo;

const MAGIC: [u8; 4] = *b"VSL\0";
const VERSION: u32 = 1;

fn base_dims(registry: &TypeRegistry, id: TypeId) -> (u8, [u8; 2])
{
    let ty = registry.resolve(id);
    let dims = ty.numeric().map(|n| [n.vec_dims, n.mat_cols]).unwrap_or([0, 0]);
    (ty.base_type as u8, dims)
}

fn interface_record(registry: &TypeRegistry, name_location: u32, id: TypeId, array_size: u32) -> InterfaceRecord
{
    let (base_type, dims) = base_dims(registry, id);
    InterfaceRecord { location: name_location as u8, base_type, dims, array_size: array_size as u8 }
}

fn binding_payload(registry: &TypeRegistry, id: TypeId) -> BindingPayload
{
    let ty = registry.resolve(id);
    if let Some(texel) = ty.texel() {
        BindingPayload::Image {
            rank: texel.rank as u8,
            texel_type: texel.format.ty as u8,
            texel_size: texel.format.component_size_bytes,
            texel_count: texel.format.component_count
        }
    } else {
        let struct_id = ty.struct_ref().expect("buffer-backed binding types always carry a struct_ref");
        BindingPayload::Buffer { size: registry.resolve_struct(struct_id).size as u16 }
    }
}

/// Writes one `.vsp` artifact (`spec.md` §6), staged the way the teacher's
/// `BpxWriter::write_symbols` calls its `write_*` helpers in
/// `shaderc/src/targets/gl/bpx.rs`, one method per record group in on-disk
/// order.
pub struct ArtifactWriter<'a, W: Write>
{
    out: W,
    registry: &'a TypeRegistry
}

impl<'a, W: Write> ArtifactWriter<'a, W>
{
    pub fn new(out: W, registry: &'a TypeRegistry) -> Self
    {
        ArtifactWriter { out, registry }
    }

    pub fn write_header(&mut self, stage_mask: u16, flags: u16) -> Result<(), ArtifactError>
    {
        self.out.write_all(&MAGIC)?;
        self.out.write_u32::<LittleEndian>(VERSION)?;
        self.out.write_u16::<LittleEndian>(stage_mask)?;
        self.out.write_u16::<LittleEndian>(flags)?;
        self.out.write_u32::<LittleEndian>(0)?;
        Ok(())
    }

    pub fn write_counts(&mut self, info: &ShaderInfo, struct_count: u16) -> Result<(), ArtifactError>
    {
        self.out.write_u8(info.inputs.len() as u8)?;
        self.out.write_u8(info.outputs.len() as u8)?;
        self.out.write_u8(info.bindings.len() as u8)?;
        self.out.write_u8(info.subpass_inputs.len() as u8)?;
        self.out.write_u16::<LittleEndian>(struct_count)?;
        self.out.write_u8(info.uniform.is_some() as u8)?;
        self.out.write_u8(0)?;
        Ok(())
    }

    pub fn write_inputs(&mut self, info: &ShaderInfo) -> Result<(), ArtifactError>
    {
        for v in &info.inputs {
            self.write_interface_record(&interface_record(self.registry, v.location, v.data_type, v.array_size))?;
        }
        Ok(())
    }

    pub fn write_outputs(&mut self, info: &ShaderInfo) -> Result<(), ArtifactError>
    {
        for v in &info.outputs {
            self.write_interface_record(&interface_record(self.registry, v.location, v.data_type, 1))?;
        }
        Ok(())
    }

    fn write_interface_record(&mut self, rec: &InterfaceRecord) -> Result<(), ArtifactError>
    {
        self.out.write_u8(rec.location)?;
        self.out.write_u8(rec.base_type)?;
        self.out.write_all(&rec.dims)?;
        self.out.write_u8(rec.array_size)?;
        self.out.write_all(&[0u8; 3])?;
        Ok(())
    }

    pub fn write_bindings(&mut self, info: &ShaderInfo) -> Result<(), ArtifactError>
    {
        for b in &info.bindings {
            let (base_type, _) = base_dims(self.registry, b.data_type);
            let rec = BindingRecord { slot: b.slot as u8, base_type, stage_mask: b.stage_mask.bits(), payload: binding_payload(self.registry, b.data_type) };
            self.write_binding_record(&rec)?;
        }
        Ok(())
    }

    fn write_binding_record(&mut self, rec: &BindingRecord) -> Result<(), ArtifactError>
    {
        self.out.write_u8(rec.slot)?;
        self.out.write_u8(rec.base_type)?;
        self.out.write_u16::<LittleEndian>(rec.stage_mask)?;
        match rec.payload {
            BindingPayload::Image { rank, texel_type, texel_size, texel_count } => {
                self.out.write_u8(rank)?;
                self.out.write_u8(texel_type)?;
                self.out.write_u8(texel_size)?;
                self.out.write_u8(texel_count)?;
            },
            BindingPayload::Buffer { size } => {
                self.out.write_u16::<LittleEndian>(size)?;
                self.out.write_all(&[0u8; 2])?;
            }
        }
        Ok(())
    }

    pub fn write_subpass_inputs(&mut self, info: &ShaderInfo) -> Result<(), ArtifactError>
    {
        for s in &info.subpass_inputs {
            let texel = self.registry.resolve(s.data_type).texel().expect("subpass inputs always carry a texel payload");
            let rec = SubpassRecord { texel_format: texel.format.ty as u8, texel_count: texel.format.component_count };
            self.out.write_u8(rec.texel_format)?;
            self.out.write_u8(rec.texel_count)?;
            self.out.write_all(&[0u8; 2])?;
        }
        Ok(())
    }

    pub fn write_structs(&mut self) -> Result<(), ArtifactError>
    {
        for id in self.registry.all_struct_ids() {
            let st = self.registry.resolve_struct(id);
            let rec = StructRecord {
                name: st.name.clone(),
                members: st
                    .members
                    .iter()
                    .map(|m| {
                        let (base_type, dims) = base_dims(self.registry, m.type_id);
                        StructMemberRecord { base_type, dims, array_size: m.array_size as u8 }
                    })
                    .collect()
            };
            self.write_struct_record(&rec)?;
        }
        Ok(())
    }

    fn write_struct_record(&mut self, rec: &StructRecord) -> Result<(), ArtifactError>
    {
        if rec.name.len() > u8::MAX as usize {
            return Err(ArtifactError::NameTooLong(rec.name.clone()));
        }
        self.out.write_u8(rec.name.len() as u8)?;
        self.out.write_all(rec.name.as_bytes())?;
        self.out.write_u16::<LittleEndian>(rec.members.len() as u16)?;
        for m in &rec.members {
            self.out.write_u8(m.base_type)?;
            self.out.write_all(&m.dims)?;
            self.out.write_u8(m.array_size)?;
        }
        Ok(())
    }

    pub fn write_uniform(&mut self, info: &ShaderInfo) -> Result<(), ArtifactError>
    {
        if let Some(u) = &info.uniform {
            let index = self.registry.all_struct_ids().position(|id| id == u.struct_id).expect("uniform struct was registered in this registry") as u16;
            self.out.write_u16::<LittleEndian>(index)?;
        }
        Ok(())
    }

    pub fn write_stage_bytecode(&mut self, words: &[u32]) -> Result<(), ArtifactError>
    {
        self.out.write_u32::<LittleEndian>(words.len() as u32)?;
        for w in words {
            self.out.write_u32::<LittleEndian>(*w)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W
    {
        self.out
    }
}

/// Writes a complete artifact: header, counts, every record group in
/// `spec.md` §6 order, then one bytecode block per stage bit set in
/// `info.stage_mask`, ascending.
pub fn write_artifact<W: Write>(
    out: W,
    registry: &TypeRegistry,
    info: &ShaderInfo,
    flags: u16,
    stage_bytecode: &[(vsl_types::ShaderStages, Vec<u32>)]
) -> Result<W, ArtifactError>
{
    let mut writer = ArtifactWriter::new(out, registry);
    let struct_count = registry.all_struct_ids().count() as u16;
    writer.write_header(info.stage_mask.bits(), flags)?;
    writer.write_counts(info, struct_count)?;
    writer.write_inputs(info)?;
    writer.write_outputs(info)?;
    writer.write_bindings(info)?;
    writer.write_subpass_inputs(info)?;
    writer.write_structs()?;
    writer.write_uniform(info)?;
    for stage in vsl_types::ShaderStages::ORDER {
        if let Some((_, words)) = stage_bytecode.iter().find(|(s, _)| *s == stage) {
            writer.write_stage_bytecode(words)?;
        }
    }
    Ok(writer.into_inner())
}
