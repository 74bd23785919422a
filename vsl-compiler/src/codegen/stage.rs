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

//! Assembles a full GLSL translation unit for one stage out of the global
//! reflection recorded in a [`ShaderInfo`] plus the [`FuncGenerator`] body
//! captured while that stage's entry point was analyzed (`spec.md` §4.6).

use std::collections::HashSet;
use std::fmt::Write as _;

use vsl_symbols::{ShaderInfo, Variable, VariableExtra};
use vsl_types::{BaseType, ShaderStages, StructId, TypeId, TypeRegistry};

use crate::codegen::binding_layout::distinct_types_for_class;
use crate::codegen::glsl_type::glsl_type_name;
use crate::config::BindingTableSizes;

const SET_SAMPLERS: u32 = 0;
const SET_IMAGES: u32 = 1;
const SET_BUFFERS: u32 = 2;
const SET_RO_TEXELS: u32 = 3;
const SET_RW_TEXELS: u32 = 4;
const SET_SUBPASS: u32 = 5;
const SET_UNIFORM: u32 = 6;

/// Produces the GLSL source for one stage of one shader.
pub struct StageGenerator<'a>
{
    registry: &'a TypeRegistry,
    sizes: BindingTableSizes
}

impl<'a> StageGenerator<'a>
{
    pub fn new(registry: &'a TypeRegistry, sizes: BindingTableSizes) -> Self
    {
        StageGenerator { registry, sizes }
    }

    /// `locals` is every Vertex→Fragment interpolant declared at file scope
    /// (`VariableExtra::Local`), in declaration order; `body` is a finished
    /// [`crate::codegen::func::FuncGenerator`] buffer for this stage.
    pub fn generate(&self, stage: ShaderStages, info: &ShaderInfo, locals: &[Variable], body: &str) -> String
    {
        let mut out = String::new();
        self.emit_version(&mut out, stage, info);
        self.emit_structs(&mut out, stage, info);
        self.emit_interfaces(&mut out, stage, info);
        self.emit_binding_tables(&mut out, stage, info);
        self.emit_subpass_inputs(&mut out, stage, info);
        self.emit_locals(&mut out, stage, locals);
        self.emit_uniform_block(&mut out, stage, info);
        let _ = writeln!(out, "void main() {{");
        out.push_str(body);
        out.push_str("}\n");
        out
    }

    fn emit_version(&self, out: &mut String, stage: ShaderStages, info: &ShaderInfo)
    {
        out.push_str("#version 450\n");
        let any_binding = info.bindings.iter().any(|b| b.stage_mask.contains(stage));
        if any_binding {
            out.push_str("#extension GL_EXT_nonuniform_qualifier : require\n");
        }
        out.push('\n');
    }

    fn reachable_structs(&self, stage: ShaderStages, info: &ShaderInfo) -> Vec<StructId>
    {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        if let Some(u) = &info.uniform {
            if u.stage_mask.contains(stage) {
                stack.push(u.struct_id);
            }
        }
        for b in info.bindings.iter().filter(|b| b.stage_mask.contains(stage)) {
            if let Some(sid) = self.registry.resolve(b.data_type).struct_ref() {
                stack.push(sid);
            }
        }
        while let Some(sid) = stack.pop() {
            if !visited.insert(sid) {
                continue;
            }
            for m in &self.registry.resolve_struct(sid).members {
                if let Some(nested) = self.registry.resolve(m.type_id).struct_ref() {
                    stack.push(nested);
                }
            }
        }
        // Declaration order (registry assigns StructId in registration order)
        // rather than the arbitrary DFS order used to populate `visited`.
        self.registry.all_struct_ids().filter(|id| visited.contains(id)).collect()
    }

    fn emit_structs(&self, out: &mut String, stage: ShaderStages, info: &ShaderInfo)
    {
        for sid in self.reachable_structs(stage, info) {
            let st = self.registry.resolve_struct(sid);
            let _ = writeln!(out, "struct {} {{", st.name);
            for m in &st.members {
                let ty = glsl_type_name(self.registry, m.type_id);
                if m.array_size > 1 {
                    let _ = writeln!(out, "    {} {}[{}];", ty, m.name, m.array_size);
                } else {
                    let _ = writeln!(out, "    {} {};", ty, m.name);
                }
            }
            out.push_str("};\n");
        }
        out.push('\n');
    }

    fn emit_interfaces(&self, out: &mut String, stage: ShaderStages, info: &ShaderInfo)
    {
        if stage == ShaderStages::VERTEX {
            for v in &info.inputs {
                let ty = glsl_type_name(self.registry, v.data_type);
                if v.array_size > 1 {
                    let _ = writeln!(out, "layout(location = {}) in {} {}[{}];", v.location, ty, v.name, v.array_size);
                } else {
                    let _ = writeln!(out, "layout(location = {}) in {} {};", v.location, ty, v.name);
                }
            }
        }
        if stage == ShaderStages::FRAGMENT {
            for v in &info.outputs {
                let ty = glsl_type_name(self.registry, v.data_type);
                let _ = writeln!(out, "layout(location = {}) out {} {};", v.location, ty, v.name);
            }
        }
        out.push('\n');
    }

    /// Groups bindings of one resource class by their concrete GLSL type
    /// spelling, since a GLSL array must be homogeneous: two `bind()`
    /// declarations of the same class but different concrete type (e.g.
    /// `sampler2D` vs `samplerCube`) land in distinct arrays at the same set,
    /// one binding index apart. Indices are assigned from the full,
    /// stage-independent declaration order (see [`crate::codegen::binding_layout`])
    /// so a stage only ever omits a declaration it doesn't use, never
    /// renumbers one it does.
    fn emit_binding_class(&self, out: &mut String, set: u32, size: u32, array_label: &str, class: BaseType, stage: ShaderStages, info: &ShaderInfo, layout_extra: impl Fn(TypeId) -> String)
    {
        for (binding, ty) in distinct_types_for_class(self.registry, info, class).into_iter().enumerate() {
            let binding = binding as u32;
            let used_here = info.bindings.iter().any(|b| b.stage_mask.contains(stage) && self.registry.resolve(b.data_type).base_type == class && glsl_type_name(self.registry, b.data_type) == ty);
            if !used_here {
                continue;
            }
            let data_type = info.bindings.iter().find(|b| self.registry.resolve(b.data_type).base_type == class && glsl_type_name(self.registry, b.data_type) == ty).unwrap().data_type;
            let extra = layout_extra(data_type);
            if extra.is_empty() {
                let _ = writeln!(out, "layout(set = {set}, binding = {binding}) uniform {ty} {array_label}_{binding}[{size}];");
            } else {
                let _ = writeln!(out, "layout(set = {set}, binding = {binding}, {extra}) uniform {ty} {array_label}_{binding}[{size}];");
            }
        }
    }

    fn emit_binding_tables(&self, out: &mut String, stage: ShaderStages, info: &ShaderInfo)
    {
        self.emit_binding_class(out, SET_SAMPLERS, self.sizes.num_samplers, "_samplers", BaseType::Sampler, stage, info, |_| String::new());
        self.emit_binding_class(out, SET_IMAGES, self.sizes.num_images, "_images", BaseType::Image, stage, info, |id| {
            self.registry.resolve(id).texel().expect("Image binding always carries TexelInfo").format.glsl_layout_name()
        });

        for (binding, ty) in distinct_types_for_class(self.registry, info, BaseType::ROBuffer).into_iter().enumerate() {
            let binding = binding as u32;
            if !info.bindings.iter().any(|b| b.stage_mask.contains(stage) && self.registry.resolve(b.data_type).base_type == BaseType::ROBuffer && glsl_type_name(self.registry, b.data_type) == ty) {
                continue;
            }
            let _ = writeln!(out, "layout(set = {SET_BUFFERS}, binding = {binding}) readonly buffer _ROBuf_{binding} {{ {ty} data[]; }} _robuffers_{binding}[{}];", self.sizes.num_ro_buffers);
        }
        for (binding, ty) in distinct_types_for_class(self.registry, info, BaseType::RWBuffer).into_iter().enumerate() {
            let binding = binding as u32;
            if !info.bindings.iter().any(|b| b.stage_mask.contains(stage) && self.registry.resolve(b.data_type).base_type == BaseType::RWBuffer && glsl_type_name(self.registry, b.data_type) == ty) {
                continue;
            }
            let _ = writeln!(out, "layout(set = {SET_BUFFERS}, binding = {binding}) buffer _RWBuf_{binding} {{ {ty} data[]; }} _rwbuffers_{binding}[{}];", self.sizes.num_rw_buffers);
        }

        self.emit_binding_class(out, SET_RO_TEXELS, self.sizes.num_ro_texel_buffers, "_ro_texels", BaseType::ROTexels, stage, info, |_| String::new());
        self.emit_binding_class(out, SET_RW_TEXELS, self.sizes.num_rw_texel_buffers, "_rw_texels", BaseType::RWTexels, stage, info, |id| {
            self.registry.resolve(id).texel().expect("RWTexels binding always carries TexelInfo").format.glsl_layout_name()
        });

        let used = || info.bindings.iter().filter(|b| b.stage_mask.contains(stage));
        if info.bindings.iter().any(|b| b.stage_mask.contains(stage)) {
            out.push_str("layout(push_constant) uniform _BindIndices {\n");
            for b in used() {
                let _ = writeln!(out, "    uint slot{};", b.slot);
            }
            out.push_str("};\n");
        }
        out.push('\n');
    }

    fn emit_subpass_inputs(&self, out: &mut String, stage: ShaderStages, info: &ShaderInfo)
    {
        for s in info.subpass_inputs.iter().filter(|s| s.stage_mask.contains(stage)) {
            let ty = glsl_type_name(self.registry, s.data_type);
            let _ = writeln!(out, "layout(input_attachment_index = {0}, set = {SET_SUBPASS}, binding = {0}) uniform {ty} {1};", s.index, s.name);
        }
        out.push('\n');
    }

    fn emit_locals(&self, out: &mut String, stage: ShaderStages, locals: &[Variable])
    {
        let mut location = 0u32;
        for v in locals {
            let VariableExtra::Local { source_stage, flat } = v.extra else { continue };
            let dest_stage = ShaderStages::FRAGMENT;
            let direction = if stage == source_stage {
                Some("out")
            } else if stage == dest_stage {
                Some("in")
            } else {
                None
            };
            let Some(direction) = direction else { continue };
            let ty = glsl_type_name(self.registry, v.data_type);
            let qualifier = if flat { "flat " } else { "" };
            let _ = writeln!(out, "layout(location = {location}) {qualifier}{direction} {ty} {};", v.name);
            location += 1;
        }
        out.push('\n');
    }

    fn emit_uniform_block(&self, out: &mut String, stage: ShaderStages, info: &ShaderInfo)
    {
        let Some(u) = &info.uniform else { return };
        if !u.stage_mask.contains(stage) {
            return;
        }
        let st = self.registry.resolve_struct(u.struct_id);
        let _ = writeln!(out, "layout(set = {SET_UNIFORM}, binding = 0) uniform {} {{", st.name);
        for m in &st.members {
            let ty = glsl_type_name(self.registry, m.type_id);
            if m.array_size > 1 {
                let _ = writeln!(out, "    {} {}[{}];", ty, m.name, m.array_size);
            } else {
                let _ = writeln!(out, "    {} {};", ty, m.name);
            }
        }
        out.push_str("};\n\n");
    }
}

#[cfg(test)]
mod tests
{
    use vsl_symbols::{UniformVariable, VariableKind};
    use vsl_types::{MemberDef, MemberLayout};

    use super::*;

    #[test]
    fn vertex_stage_emits_inputs_but_not_outputs()
    {
        let reg = TypeRegistry::new();
        let mat4 = reg.get_builtin("mat4").unwrap();
        let mut info = ShaderInfo::new();
        info.add_input("model".into(), 0, mat4, 1, 4).unwrap();
        let gen = StageGenerator::new(&reg, BindingTableSizes::default());
        let out = gen.generate(ShaderStages::VERTEX, &info, &[], "");
        assert!(out.contains("layout(location = 0) in mat4 model;"));
        assert!(!out.contains(" out "));
        assert!(out.contains("void main() {"));
    }

    #[test]
    fn fragment_stage_emits_flat_local_as_input()
    {
        let reg = TypeRegistry::new();
        let vec3 = reg.get_builtin("vec3").unwrap();
        let info = ShaderInfo::new();
        let locals = vec![Variable {
            name: "v_color".into(),
            kind: VariableKind::Local,
            data_type: vec3,
            array_size: 1,
            access: vsl_symbols::Access::RW,
            extra: VariableExtra::Local { source_stage: ShaderStages::VERTEX, flat: true }
        }];
        let gen = StageGenerator::new(&reg, BindingTableSizes::default());
        let out = gen.generate(ShaderStages::FRAGMENT, &info, &locals, "");
        assert!(out.contains("layout(location = 0) flat in vec3 v_color;"));
    }

    #[test]
    fn uniform_block_has_no_instance_name()
    {
        let mut reg = TypeRegistry::new();
        let float_ty = reg.get_builtin("float").unwrap();
        let (struct_id, _) = reg
            .add_struct("Camera".into(), vec![MemberDef {
                name: "fov".into(),
                type_id: float_ty,
                array_size: 1,
                layout: MemberLayout::Numeric(reg.resolve(float_ty).numeric().unwrap())
            }])
            .unwrap();
        let mut info = ShaderInfo::new();
        info.set_uniform(UniformVariable { name: "Camera".into(), struct_id, stage_mask: ShaderStages::VERTEX }).unwrap();
        let gen = StageGenerator::new(&reg, BindingTableSizes::default());
        let out = gen.generate(ShaderStages::VERTEX, &info, &[], "");
        assert!(out.contains("uniform Camera {"));
        assert!(out.contains("    float fov;"));
        assert!(!out.contains("} Camera;"));
    }

    #[test]
    fn distinct_sampler_types_get_separate_binding_slots()
    {
        let mut reg = TypeRegistry::new();
        let sampler2d = reg.get_builtin("sampler2D").unwrap();
        let cube = reg.get_builtin("samplerCube").unwrap();
        let mut info = ShaderInfo::new();
        info.add_binding("albedo".into(), 0, sampler2d, ShaderStages::FRAGMENT).unwrap();
        info.add_binding("env".into(), 1, cube, ShaderStages::FRAGMENT).unwrap();
        let gen = StageGenerator::new(&reg, BindingTableSizes::default());
        let out = gen.generate(ShaderStages::FRAGMENT, &info, &[], "");
        assert!(out.contains("binding = 0) uniform sampler2D _samplers_0"));
        assert!(out.contains("binding = 1) uniform samplerCube _samplers_1"));
        assert!(out.contains("uint slot0;"));
        assert!(out.contains("uint slot1;"));
    }
}
