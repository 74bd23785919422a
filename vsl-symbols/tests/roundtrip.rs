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

use vsl_symbols::artifact::{read_artifact, write_artifact};
use vsl_symbols::{ShaderInfo, UniformVariable};
use vsl_types::{ShaderStages, TypeRegistry};

/// Writing an artifact and reading it back must reproduce identical record
/// bytes: a vertex shader with one matrix input, one interpolated output,
/// one sampler binding, and a uniform block.
#[test]
fn artifact_round_trip_reproduces_identical_records()
{
    let mut reg = TypeRegistry::new();
    let mat4 = reg.get_builtin("mat4").unwrap();
    let vec3 = reg.get_builtin("vec3").unwrap();
    let sampler = reg.get_builtin("sampler2D").unwrap();

    let (camera_id, _) = reg
        .add_struct(
            "Camera".into(),
            vec![vsl_types::MemberDef {
                name: "viewProj".into(),
                type_id: mat4,
                array_size: 1,
                layout: vsl_types::MemberLayout::Numeric(reg.resolve(mat4).numeric().unwrap())
            }]
        )
        .unwrap();
    let mut info = ShaderInfo::new();
    info.stage_mask = ShaderStages::VERTEX;
    info.add_input("model".into(), 0, mat4, 1, 4).unwrap();
    info.add_output("worldPos".into(), 0, vec3, 1).unwrap();
    info.add_binding("albedo".into(), 0, sampler, ShaderStages::FRAGMENT).unwrap();
    info.set_uniform(UniformVariable { name: "Camera".into(), struct_id: camera_id, stage_mask: ShaderStages::ALL_GRAPHICS }).unwrap();

    let stage_bytecode = vec![(ShaderStages::VERTEX, vec![0x0723_0203, 1, 2, 3])];
    let bytes = write_artifact(Vec::new(), &reg, &info, 0, &stage_bytecode).unwrap();

    let parsed = read_artifact(bytes.as_slice()).unwrap();
    let reparsed = read_artifact(bytes.as_slice()).unwrap();
    assert_eq!(parsed, reparsed);

    assert_eq!(parsed.header.stage_mask, ShaderStages::VERTEX.bits());
    assert_eq!(parsed.inputs.len(), 1);
    assert_eq!(parsed.inputs[0].array_size, 1);
    assert_eq!(parsed.outputs.len(), 1);
    assert_eq!(parsed.bindings.len(), 1);
    assert_eq!(parsed.structs.len(), 1);
    assert_eq!(parsed.structs[0].name, "Camera");
    assert_eq!(parsed.uniform_index, Some(0));
    assert_eq!(parsed.stage_bytecode, vec![vec![0x0723_0203, 1, 2, 3]]);
}

#[test]
fn artifact_with_no_uniform_omits_uniform_index()
{
    let mut reg = TypeRegistry::new();
    let float = reg.get_builtin("float").unwrap();
    let mut info = ShaderInfo::new();
    info.stage_mask = ShaderStages::FRAGMENT;
    info.add_output("color".into(), 0, float, 1).unwrap();

    let bytes = write_artifact(Vec::new(), &reg, &info, 0, &[(ShaderStages::FRAGMENT, vec![])]).unwrap();
    let parsed = read_artifact(bytes.as_slice()).unwrap();
    assert_eq!(parsed.uniform_index, None);
    assert!(parsed.structs.is_empty());
}
