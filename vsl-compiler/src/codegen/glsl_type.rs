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

//! Spells a [`TypeId`] the way the generated GLSL needs it written. The
//! registry's own builtin name table is private (it only exists to parse
//! source names back into ids), so this mirrors its naming convention in
//! the other direction.

use vsl_types::{BaseType, NumericInfo, TypeId, TypeRegistry};

fn numeric_name(base: BaseType, n: NumericInfo) -> String
{
    if n.is_matrix() {
        if n.vec_dims == n.mat_cols {
            format!("mat{}", n.mat_cols)
        } else {
            format!("mat{}x{}", n.mat_cols, n.vec_dims)
        }
    } else if n.is_scalar() {
        match base {
            BaseType::Boolean => "bool",
            BaseType::Signed => "int",
            BaseType::Unsigned => "uint",
            BaseType::Float => "float",
            _ => unreachable!("numeric_name only called with a numeric BaseType")
        }
        .to_string()
    } else {
        let prefix = match base {
            BaseType::Boolean => "b",
            BaseType::Signed => "i",
            BaseType::Unsigned => "u",
            BaseType::Float => "",
            _ => unreachable!("numeric_name only called with a numeric BaseType")
        };
        format!("{prefix}vec{}", n.vec_dims)
    }
}

/// The GLSL spelling of `id`: a scalar/vector/matrix keyword, a
/// `[i|u]sampler<rank>`/`[i|u]image<rank>`/texel-buffer keyword, or a
/// user struct's name.
pub fn glsl_type_name(registry: &TypeRegistry, id: TypeId) -> String
{
    let ty = registry.resolve(id);
    match ty.base_type {
        BaseType::Void => "void".to_string(),
        BaseType::Boolean | BaseType::Signed | BaseType::Unsigned | BaseType::Float => {
            numeric_name(ty.base_type, ty.numeric().expect("numeric BaseType always carries NumericInfo"))
        },
        BaseType::Sampler => {
            let t = ty.texel().expect("Sampler always carries TexelInfo");
            format!("{}sampler{}", t.format.glsl_prefix(), t.rank.glsl_suffix())
        },
        BaseType::Image => {
            let t = ty.texel().expect("Image always carries TexelInfo");
            format!("{}image{}", t.format.glsl_prefix(), t.rank.glsl_suffix())
        },
        BaseType::ROTexels => "textureBuffer".to_string(),
        BaseType::RWTexels => "imageBuffer".to_string(),
        BaseType::SubpassInput => {
            let t = ty.texel().expect("SubpassInput always carries TexelInfo");
            format!("{}subpassInput", t.format.glsl_prefix())
        },
        BaseType::ROBuffer | BaseType::RWBuffer | BaseType::Uniform | BaseType::Struct => {
            let struct_id = ty.struct_ref().expect("buffer/struct BaseType always carries a StructId");
            registry.resolve_struct(struct_id).name.clone()
        }
    }
}

#[cfg(test)]
mod tests
{
    use vsl_types::TypeRegistry;

    use super::*;

    #[test]
    fn scalars_and_vectors()
    {
        let reg = TypeRegistry::new();
        assert_eq!(glsl_type_name(&reg, reg.get_builtin("float").unwrap()), "float");
        assert_eq!(glsl_type_name(&reg, reg.get_builtin("ivec3").unwrap()), "ivec3");
        assert_eq!(glsl_type_name(&reg, reg.get_builtin("uvec2").unwrap()), "uvec2");
    }

    #[test]
    fn square_and_non_square_matrices()
    {
        let reg = TypeRegistry::new();
        assert_eq!(glsl_type_name(&reg, reg.get_builtin("mat4").unwrap()), "mat4");
        assert_eq!(glsl_type_name(&reg, reg.get_builtin("mat2x3").unwrap()), "mat2x3");
    }

    #[test]
    fn sampler_and_struct_names()
    {
        let mut reg = TypeRegistry::new();
        assert_eq!(glsl_type_name(&reg, reg.get_builtin("sampler2D").unwrap()), "sampler2D");
        let (_, struct_ty) = reg.add_struct("Camera".into(), vec![]).unwrap();
        assert_eq!(glsl_type_name(&reg, struct_ty), "Camera");
    }
}
