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

use serde::{Deserialize, Serialize};
use vsl_types::{ShaderStages, TypeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access
{
    RO,
    WO,
    RW
}

impl Access
{
    pub fn readable(self) -> bool
    {
        matches!(self, Access::RO | Access::RW)
    }

    pub fn writable(self) -> bool
    {
        matches!(self, Access::WO | Access::RW)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind
{
    Input,
    Output,
    Binding,
    /// A subpass input, tracked separately from [`VariableKind::Binding`]
    /// since it occupies its own index space (set 5) rather than a
    /// resource-class binding table.
    SubpassInput,
    /// A uniform block member, lifted into global scope by name.
    UniformMember,
    Builtin,
    Constant,
    Local,
    Parameter,
    Private
}

/// `kind`-dependent extra payload a [`Variable`] carries (`spec.md` §3).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableExtra
{
    None,
    /// A Vertex→Fragment interpolant: `source_stage` is always `Vertex`
    /// and `flat` controls GLSL's `flat` interpolation qualifier.
    Local
    {
        source_stage: ShaderStages, flat: bool
    },
    Binding
    {
        slot: u32
    },
    Builtin
    {
        stage: ShaderStages, access: Access
    }
}

/// One named, typed slot visible to the analyzer: a global (input, output,
/// binding, builtin, constant) or something declared inside a stage
/// function body (local, parameter, private).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable
{
    pub name: String,
    pub kind: VariableKind,
    pub data_type: TypeId,
    pub array_size: u32,
    pub access: Access,
    pub extra: VariableExtra
}

impl Variable
{
    /// The stage-access rule of `spec.md` §3/§8: a `Local` is writable only
    /// in Vertex and readable only in Fragment; a `Builtin` is gated purely
    /// by its declared `access`; everything else follows `self.access`.
    pub fn readable_in(&self, stage: ShaderStages) -> bool
    {
        match self.extra {
            VariableExtra::Local { .. } => stage.contains(ShaderStages::FRAGMENT),
            VariableExtra::Builtin { access, .. } => access.readable(),
            _ => self.access.readable()
        }
    }

    pub fn writable_in(&self, stage: ShaderStages) -> bool
    {
        match self.extra {
            VariableExtra::Local { source_stage, .. } => stage == source_stage,
            VariableExtra::Builtin { access, .. } => access.writable(),
            _ => self.access.writable()
        }
    }
}

#[cfg(test)]
mod tests
{
    use vsl_types::TypeRegistry;

    use super::*;

    fn local(flat: bool) -> Variable
    {
        let reg = TypeRegistry::new();
        Variable {
            name: "v_color".into(),
            kind: VariableKind::Local,
            data_type: reg.get_builtin("vec4").unwrap(),
            array_size: 1,
            access: Access::RW,
            extra: VariableExtra::Local { source_stage: ShaderStages::VERTEX, flat }
        }
    }

    #[test]
    fn local_is_write_only_from_vertex_read_only_from_fragment()
    {
        let v = local(false);
        assert!(v.writable_in(ShaderStages::VERTEX));
        assert!(!v.writable_in(ShaderStages::FRAGMENT));
        assert!(v.readable_in(ShaderStages::FRAGMENT));
        assert!(!v.readable_in(ShaderStages::VERTEX));
    }

    #[test]
    fn builtin_write_only_rejects_read()
    {
        let reg = TypeRegistry::new();
        let v = Variable {
            name: "$Position".into(),
            kind: VariableKind::Builtin,
            data_type: reg.get_builtin("vec4").unwrap(),
            array_size: 1,
            access: Access::WO,
            extra: VariableExtra::Builtin { stage: ShaderStages::VERTEX, access: Access::WO }
        };
        assert!(v.writable_in(ShaderStages::VERTEX));
        assert!(!v.readable_in(ShaderStages::VERTEX));
    }
}
