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

use crate::error::ReflectionError;
use crate::limits::{MAX_BINDING_INDEX, MAX_INPUT_ARRAY_SIZE, MAX_INPUT_INDEX, MAX_OUTPUT_INDEX, MAX_SUBPASS_INPUTS};
use crate::reflection::{BindingVariable, InterfaceVariable, SubpassInputVariable, UniformVariable};

/// Aggregated reflection for one shader source file (`spec.md` §3
/// `ShaderInfo`). Records are appended in declaration order and frozen once
/// analysis completes; the analyzer is the only writer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShaderInfo
{
    pub stage_mask: ShaderStages,
    pub inputs: Vec<InterfaceVariable>,
    pub outputs: Vec<InterfaceVariable>,
    pub bindings: Vec<BindingVariable>,
    pub subpass_inputs: Vec<SubpassInputVariable>,
    pub uniform: Option<UniformVariable>
}

impl Default for ShaderInfo
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl ShaderInfo
{
    pub fn new() -> Self
    {
        ShaderInfo {
            stage_mask: ShaderStages::empty(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            bindings: Vec::new(),
            subpass_inputs: Vec::new(),
            uniform: None
        }
    }

    /// `binding_count` is the number of consecutive locations the type
    /// occupies per array element (`matCols` for a matrix, 1 otherwise);
    /// the analyzer computes it from the resolved `ShaderType` before
    /// calling in, since this crate does not depend on `vsl-compiler`.
    pub fn add_input(&mut self, name: String, location: u32, data_type: TypeId, array_size: u32, binding_count: u32) -> Result<(), ReflectionError>
    {
        if array_size > MAX_INPUT_ARRAY_SIZE {
            return Err(ReflectionError::InputArrayTooLarge { size: array_size, limit: MAX_INPUT_ARRAY_SIZE });
        }
        let span = binding_count * array_size;
        for l in location..location + span {
            if l > MAX_INPUT_INDEX {
                return Err(ReflectionError::InputLocationOutOfRange { location: l, limit: MAX_INPUT_INDEX });
            }
            if self.location_used(&self.inputs, l) {
                return Err(ReflectionError::DuplicateInputLocation(l));
            }
        }
        self.inputs.push(InterfaceVariable { name, location, data_type, array_size });
        Ok(())
    }

    pub fn add_output(&mut self, name: String, location: u32, data_type: TypeId, binding_count: u32) -> Result<(), ReflectionError>
    {
        for l in location..location + binding_count {
            if l > MAX_OUTPUT_INDEX {
                return Err(ReflectionError::OutputLocationOutOfRange { location: l, limit: MAX_OUTPUT_INDEX });
            }
            if self.location_used(&self.outputs, l) {
                return Err(ReflectionError::DuplicateOutputLocation(l));
            }
        }
        self.outputs.push(InterfaceVariable { name, location, data_type, array_size: 1 });
        Ok(())
    }

    pub fn add_binding(&mut self, name: String, slot: u32, data_type: TypeId, stage_mask: ShaderStages) -> Result<(), ReflectionError>
    {
        if slot > MAX_BINDING_INDEX {
            return Err(ReflectionError::BindingSlotOutOfRange { slot, limit: MAX_BINDING_INDEX });
        }
        if self.bindings.iter().any(|b| b.slot == slot) {
            return Err(ReflectionError::DuplicateBindingSlot(slot));
        }
        self.bindings.push(BindingVariable { name, slot, data_type, stage_mask });
        Ok(())
    }

    pub fn add_subpass_input(&mut self, name: String, index: u32, data_type: TypeId, stage_mask: ShaderStages) -> Result<(), ReflectionError>
    {
        if self.subpass_inputs.len() >= MAX_SUBPASS_INPUTS {
            return Err(ReflectionError::TooManySubpassInputs(MAX_SUBPASS_INPUTS));
        }
        if self.subpass_inputs.iter().any(|s| s.index == index) {
            return Err(ReflectionError::DuplicateSubpassIndex(index));
        }
        self.subpass_inputs.push(SubpassInputVariable { name, index, data_type, stage_mask });
        Ok(())
    }

    pub fn set_uniform(&mut self, uniform: UniformVariable) -> Result<(), ReflectionError>
    {
        if self.uniform.is_some() {
            return Err(ReflectionError::UniformAlreadySet);
        }
        self.uniform = Some(uniform);
        Ok(())
    }

    fn location_used(&self, list: &[InterfaceVariable], location: u32) -> bool
    {
        list.iter().any(|v| (v.location..v.location + v.array_size.max(1)).contains(&location))
    }
}

#[cfg(test)]
mod tests
{
    use vsl_types::TypeRegistry;

    use super::*;

    #[test]
    fn matrix_input_reserves_consecutive_locations_and_rejects_overlap()
    {
        let reg = TypeRegistry::new();
        let mat4 = reg.get_builtin("mat4").unwrap();
        let float = reg.get_builtin("float").unwrap();
        let mut info = ShaderInfo::new();
        info.add_input("m".into(), 2, mat4, 1, 4).unwrap();
        let err = info.add_input("q".into(), 3, float, 1, 1).unwrap_err();
        assert_eq!(err, ReflectionError::DuplicateInputLocation(3));
    }

    #[test]
    fn duplicate_binding_slot_rejected()
    {
        let reg = TypeRegistry::new();
        let sampler = reg.get_builtin("sampler2D").unwrap();
        let mut info = ShaderInfo::new();
        info.add_binding("a".into(), 3, sampler, ShaderStages::FRAGMENT).unwrap();
        let err = info.add_binding("b".into(), 3, sampler, ShaderStages::FRAGMENT).unwrap_err();
        assert_eq!(err, ReflectionError::DuplicateBindingSlot(3));
    }

    #[test]
    fn second_uniform_rejected()
    {
        let mut reg = TypeRegistry::new();
        let (id, _) = reg.add_struct("Camera".into(), vec![]).unwrap();
        let mut info = ShaderInfo::new();
        info.set_uniform(UniformVariable { name: "Camera".into(), struct_id: id, stage_mask: ShaderStages::ALL_GRAPHICS }).unwrap();
        let err = info
            .set_uniform(UniformVariable { name: "Other".into(), struct_id: id, stage_mask: ShaderStages::ALL_GRAPHICS })
            .unwrap_err();
        assert_eq!(err, ReflectionError::UniformAlreadySet);
    }
}
