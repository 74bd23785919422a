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

//! Resource-class binding-table index assignment, shared by the semantic
//! analyzer (which needs a binding's array slot to build a reference while
//! walking a stage body) and the per-stage assembler (which declares the
//! array). Both derive the index the same way so they always agree: by a
//! binding's concrete GLSL type spelling's position among every binding of
//! its class declared anywhere in the file, file declaration order,
//! independent of which stages end up using it (`spec.md` §4.6).

use vsl_symbols::ShaderInfo;
use vsl_types::{BaseType, TypeId, TypeRegistry};

use crate::codegen::glsl_type::glsl_type_name;

/// The array-name prefix and descriptor set a resource-class binding lands
/// in, or `None` if `base` isn't a bindable resource type.
pub fn resource_class(base: BaseType) -> Option<&'static str>
{
    match base {
        BaseType::Sampler => Some("_samplers"),
        BaseType::Image => Some("_images"),
        BaseType::ROBuffer => Some("_robuffers"),
        BaseType::RWBuffer => Some("_rwbuffers"),
        BaseType::ROTexels => Some("_ro_texels"),
        BaseType::RWTexels => Some("_rw_texels"),
        _ => None
    }
}

/// Distinct GLSL type spellings within one resource class, across every
/// binding declared anywhere in the file, in first-declaration order. A
/// type's position in this list is its array index at the fixed
/// descriptor set for its class.
pub fn distinct_types_for_class(registry: &TypeRegistry, info: &ShaderInfo, class: BaseType) -> Vec<String>
{
    let mut seen = Vec::new();
    for b in info.bindings.iter().filter(|b| registry.resolve(b.data_type).base_type == class) {
        let ty = glsl_type_name(registry, b.data_type);
        if !seen.contains(&ty) {
            seen.push(ty);
        }
    }
    seen
}

/// The array index `data_type` is assigned within its resource class.
pub fn array_index_for(registry: &TypeRegistry, info: &ShaderInfo, data_type: TypeId) -> u32
{
    let class = registry.resolve(data_type).base_type;
    let ty = glsl_type_name(registry, data_type);
    distinct_types_for_class(registry, info, class)
        .iter()
        .position(|t| *t == ty)
        .expect("data_type's binding already registered in info.bindings") as u32
}

/// GLSL reference text for the binding declared at `slot`, once its index
/// has been loaded into the active function's `_BindIndices` block.
pub fn binding_ref(registry: &TypeRegistry, info: &ShaderInfo, slot: u32) -> String
{
    let b = info.bindings.iter().find(|b| b.slot == slot).expect("slot recorded by ShaderInfo::add_binding");
    let class = registry.resolve(b.data_type).base_type;
    let label = resource_class(class).expect("a registered binding's type always has a resource class");
    let idx = array_index_for(registry, info, b.data_type);
    format!("{label}_{idx}[_b{slot}]")
}

#[cfg(test)]
mod tests
{
    use vsl_types::ShaderStages;

    use super::*;

    #[test]
    fn distinct_sampler_types_get_stable_indices_regardless_of_stage()
    {
        let mut reg = TypeRegistry::new();
        let sampler2d = reg.get_builtin("sampler2D").unwrap();
        let cube = reg.get_builtin("samplerCube").unwrap();
        let mut info = ShaderInfo::new();
        info.add_binding("albedo".into(), 0, sampler2d, ShaderStages::FRAGMENT).unwrap();
        info.add_binding("env".into(), 1, cube, ShaderStages::FRAGMENT).unwrap();
        assert_eq!(array_index_for(&reg, &info, sampler2d), 0);
        assert_eq!(array_index_for(&reg, &info, cube), 1);
        assert_eq!(binding_ref(&reg, &info, 0), "_samplers_0[_b0]");
        assert_eq!(binding_ref(&reg, &info, 1), "_samplers_1[_b1]");
    }
}
