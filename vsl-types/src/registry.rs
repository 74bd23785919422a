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

use std::collections::HashMap;

use crate::base::{BaseType, TexelRank};
use crate::error::TypeError;
use crate::shader_type::{ShaderType, StructId, TypeId};
use crate::struct_type::{MemberDef, StructType};
use crate::texel::{texel_format, TexelFormat};

/// Default texel format assumed for a bare `sampler2D`/`image2D`/... builtin
/// name with no `<fmt>` suffix. `parse_or_get` replaces it once a concrete
/// format is named.
fn default_texel_format() -> &'static TexelFormat
{
    texel_format("rgba32_float").expect("rgba32_float is always in the closed texel format table")
}

struct NumericSpec
{
    base: BaseType,
    dims: u8,
    cols: u8
}

struct TexelSpec
{
    base: BaseType,
    rank: TexelRank
}

fn builtin_numeric_table() -> Vec<(&'static str, NumericSpec)>
{
    use BaseType::*;
    let mut v = vec![("void", NumericSpec { base: Void, dims: 1, cols: 1 }), ("bool", NumericSpec { base: Boolean, dims: 1, cols: 1 }), (
        "int",
        NumericSpec { base: Signed, dims: 1, cols: 1 }
    ), ("uint", NumericSpec { base: Unsigned, dims: 1, cols: 1 }), ("float", NumericSpec { base: Float, dims: 1, cols: 1 })];
    for n in 2..=4u8 {
        v.push((vec_name("", n), NumericSpec { base: Float, dims: n, cols: 1 }));
        v.push((vec_name("i", n), NumericSpec { base: Signed, dims: n, cols: 1 }));
        v.push((vec_name("u", n), NumericSpec { base: Unsigned, dims: n, cols: 1 }));
        v.push((vec_name("b", n), NumericSpec { base: Boolean, dims: n, cols: 1 }));
    }
    for c in 2..=4u8 {
        v.push((mat_name(c, c), NumericSpec { base: Float, dims: c, cols: c }));
        for r in 2..=4u8 {
            if r != c {
                v.push((mat_cxr_name(c, r), NumericSpec { base: Float, dims: r, cols: c }));
            }
        }
    }
    v
}

fn vec_name(prefix: &'static str, n: u8) -> &'static str
{
    match (prefix, n) {
        ("", 2) => "vec2",
        ("", 3) => "vec3",
        ("", 4) => "vec4",
        ("i", 2) => "ivec2",
        ("i", 3) => "ivec3",
        ("i", 4) => "ivec4",
        ("u", 2) => "uvec2",
        ("u", 3) => "uvec3",
        ("u", 4) => "uvec4",
        ("b", 2) => "bvec2",
        ("b", 3) => "bvec3",
        ("b", 4) => "bvec4",
        _ => unreachable!("vec_name only called with n in 2..=4")
    }
}

fn mat_name(c: u8, r: u8) -> &'static str
{
    debug_assert_eq!(c, r);
    match c {
        2 => "mat2",
        3 => "mat3",
        4 => "mat4",
        _ => unreachable!("mat_name only called with c in 2..=4")
    }
}

fn mat_cxr_name(c: u8, r: u8) -> &'static str
{
    match (c, r) {
        (2, 3) => "mat2x3",
        (2, 4) => "mat2x4",
        (3, 2) => "mat3x2",
        (3, 4) => "mat3x4",
        (4, 2) => "mat4x2",
        (4, 3) => "mat4x3",
        _ => unreachable!("mat_cxr_name only called with c != r in 2..=4")
    }
}

fn builtin_texel_table() -> Vec<(&'static str, TexelSpec)>
{
    use BaseType::*;
    use TexelRank::*;
    vec![
        ("sampler1D", TexelSpec { base: Sampler, rank: E1D }),
        ("sampler2D", TexelSpec { base: Sampler, rank: E2D }),
        ("sampler3D", TexelSpec { base: Sampler, rank: E3D }),
        ("sampler1DArray", TexelSpec { base: Sampler, rank: E1DArray }),
        ("sampler2DArray", TexelSpec { base: Sampler, rank: E2DArray }),
        ("samplerCube", TexelSpec { base: Sampler, rank: Cube }),
        ("image1D", TexelSpec { base: Image, rank: E1D }),
        ("image2D", TexelSpec { base: Image, rank: E2D }),
        ("image3D", TexelSpec { base: Image, rank: E3D }),
        ("image1DArray", TexelSpec { base: Image, rank: E1DArray }),
        ("image2DArray", TexelSpec { base: Image, rank: E2DArray }),
        ("imageCube", TexelSpec { base: Image, rank: Cube }),
        ("textureBuffer", TexelSpec { base: ROTexels, rank: Buffer }),
        ("imageBuffer", TexelSpec { base: RWTexels, rank: Buffer }),
        ("subpassInput", TexelSpec { base: SubpassInput, rank: E2D }),
    ]
}

/// Owns every [`ShaderType`] and [`StructType`] used by one shader
/// compilation, and guarantees `TypeId` equality for equal type references
/// (`spec.md` §8 "Type interning").
pub struct TypeRegistry
{
    types: Vec<ShaderType>,
    numeric_index: HashMap<(BaseType, u8, u8, u8), TypeId>,
    texel_index: HashMap<(BaseType, TexelRank, *const TexelFormat), TypeId>,
    buffer_index: HashMap<(BaseType, StructId), TypeId>,
    builtin_by_name: HashMap<&'static str, TypeId>,
    structs: Vec<StructType>,
    struct_by_name: HashMap<String, StructId>,
    struct_type_by_id: HashMap<StructId, TypeId>
}

impl Default for TypeRegistry
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl TypeRegistry
{
    pub fn new() -> Self
    {
        let mut reg = TypeRegistry {
            types: Vec::new(),
            numeric_index: HashMap::new(),
            texel_index: HashMap::new(),
            buffer_index: HashMap::new(),
            builtin_by_name: HashMap::new(),
            structs: Vec::new(),
            struct_by_name: HashMap::new(),
            struct_type_by_id: HashMap::new()
        };
        for (name, spec) in builtin_numeric_table() {
            let id = reg.intern_numeric(spec.base, 4, spec.dims, spec.cols);
            reg.builtin_by_name.insert(name, id);
        }
        for (name, spec) in builtin_texel_table() {
            let id = reg.intern_texel(spec.base, spec.rank, default_texel_format());
            reg.builtin_by_name.insert(name, id);
        }
        reg
    }

    fn push(&mut self, ty: ShaderType) -> TypeId
    {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn intern_numeric(&mut self, base: BaseType, size: u8, dims: u8, cols: u8) -> TypeId
    {
        let key = (base, size, dims, cols);
        if let Some(id) = self.numeric_index.get(&key) {
            return *id;
        }
        let id = self.push(ShaderType::numeric(base, size, dims, cols));
        self.numeric_index.insert(key, id);
        id
    }

    fn intern_texel(&mut self, base: BaseType, rank: TexelRank, format: &'static TexelFormat) -> TypeId
    {
        let key = (base, rank, format as *const TexelFormat);
        if let Some(id) = self.texel_index.get(&key) {
            return *id;
        }
        let id = self.push(ShaderType::texel_object(base, rank, format));
        self.texel_index.insert(key, id);
        id
    }

    fn intern_buffer(&mut self, base: BaseType, struct_id: StructId) -> TypeId
    {
        let key = (base, struct_id);
        if let Some(id) = self.buffer_index.get(&key) {
            return *id;
        }
        let id = self.push(ShaderType::buffer(base, struct_id));
        self.buffer_index.insert(key, id);
        id
    }

    pub fn resolve(&self, id: TypeId) -> &ShaderType
    {
        &self.types[id.0 as usize]
    }

    pub fn resolve_struct(&self, id: StructId) -> &StructType
    {
        &self.structs[id.0 as usize]
    }

    /// Every struct registered in this compilation, in declaration order;
    /// used by the artifact writer to emit the `StructRecord` array.
    pub fn all_struct_ids(&self) -> impl Iterator<Item = StructId> + '_
    {
        (0..self.structs.len() as u32).map(StructId)
    }

    /// Looks up an un-parameterized builtin type name: `void`, `bool`,
    /// `int`, `uint`, `float`, `vec2..4`, `ivec2..4`, `uvec2..4`,
    /// `bvec2..4`, `mat2..4`, the non-square `matCxR` forms, every
    /// `sampler{1D,2D,3D,1DArray,2DArray,Cube}`, `image{...}`,
    /// `textureBuffer`, `imageBuffer`, `subpassInput`.
    pub fn get_builtin(&self, name: &str) -> Option<TypeId>
    {
        self.builtin_by_name.get(name).copied()
    }

    pub fn texel_format(&self, name: &str) -> Option<&'static TexelFormat>
    {
        texel_format(name)
    }

    pub fn get_struct(&self, name: &str) -> Option<StructId>
    {
        self.struct_by_name.get(name).copied()
    }

    /// The plain `Struct`-tagged `TypeId` of an already registered struct,
    /// as opposed to one of its `Uniform`/`ROBuffer`/`RWBuffer` wrapper types.
    pub fn struct_type(&self, struct_id: StructId) -> TypeId
    {
        self.struct_type_by_id[&struct_id]
    }

    /// Registers a user struct. Fails if `name` collides with a builtin type
    /// name or a previously registered struct.
    pub fn add_struct(&mut self, name: String, members: Vec<MemberDef>) -> Result<(StructId, TypeId), TypeError>
    {
        if self.builtin_by_name.contains_key(name.as_str()) {
            return Err(TypeError::CollidesWithBuiltin(name));
        }
        if self.struct_by_name.contains_key(&name) {
            return Err(TypeError::DuplicateStruct(name));
        }
        let st = StructType::new(name.clone(), members)?;
        let struct_id = StructId(self.structs.len() as u32);
        self.structs.push(st);
        self.struct_by_name.insert(name, struct_id);
        let type_id = self.push(ShaderType::user_struct(struct_id));
        self.struct_type_by_id.insert(struct_id, type_id);
        Ok((struct_id, type_id))
    }

    /// Constructs (and interns) the `Uniform`-backed type for an already
    /// registered struct, used by the `uniform NAME: STRUCT;` file-level
    /// statement.
    pub fn uniform_type(&mut self, struct_id: StructId) -> TypeId
    {
        self.intern_buffer(BaseType::Uniform, struct_id)
    }

    /// Constructs (and interns) a readonly or read/write storage buffer type
    /// backed by an already registered struct.
    pub fn buffer_type(&mut self, readwrite: bool, struct_id: StructId) -> TypeId
    {
        let base = if readwrite { BaseType::RWBuffer } else { BaseType::ROBuffer };
        self.intern_buffer(base, struct_id)
    }

    /// Parses a parameterized type reference such as `image2D<rgba8_unorm>`,
    /// `ROBuffer<MyStruct>`, or `Uniform<MyStruct>`, resolving the bracketed
    /// parameter via `self` and caching the constructed type. Falls back to
    /// [`Self::get_builtin`] for names with no `<...>` suffix.
    pub fn parse_or_get(&mut self, name: &str) -> Result<TypeId, TypeError>
    {
        if let Some((base, param)) = split_parametric(name) {
            return match base {
                "sampler1D" | "sampler2D" | "sampler3D" | "sampler1DArray" | "sampler2DArray" | "samplerCube" | "image1D" | "image2D"
                | "image3D" | "image1DArray" | "image2DArray" | "imageCube" | "textureBuffer" | "imageBuffer" | "subpassInput" => {
                    let fmt = self.texel_format(param).ok_or_else(|| TypeError::UnknownTexelFormat(param.to_string()))?;
                    let spec = builtin_texel_table().into_iter().find(|(n, _)| *n == base).expect("validated against the same name list above");
                    Ok(self.intern_texel(spec.1.base, spec.1.rank, fmt))
                },
                "ROBuffer" | "RWBuffer" | "Uniform" => {
                    let struct_id = self.get_struct(param).ok_or_else(|| TypeError::UnknownType(param.to_string()))?;
                    let base_type = match base {
                        "ROBuffer" => BaseType::ROBuffer,
                        "RWBuffer" => BaseType::RWBuffer,
                        _ => BaseType::Uniform
                    };
                    Ok(self.intern_buffer(base_type, struct_id))
                },
                other => Err(TypeError::UnknownType(other.to_string()))
            };
        }
        if let Some(id) = self.get_builtin(name) {
            return Ok(id);
        }
        if let Some(struct_id) = self.get_struct(name) {
            return Ok(self.struct_type_by_id[&struct_id]);
        }
        Err(TypeError::UnknownType(name.to_string()))
    }
}

fn split_parametric(name: &str) -> Option<(&str, &str)>
{
    let name = name.trim();
    if !name.ends_with('>') {
        return None;
    }
    let open = name.find('<')?;
    Some((&name[..open], &name[open + 1..name.len() - 1]))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn builtin_scalars_resolve()
    {
        let reg = TypeRegistry::new();
        let id = reg.get_builtin("float").unwrap();
        assert!(reg.resolve(id).is_scalar());
        assert_eq!(reg.resolve(id).base_type, BaseType::Float);
    }

    #[test]
    fn vec3_is_not_vec4()
    {
        let reg = TypeRegistry::new();
        let v3 = reg.get_builtin("vec3").unwrap();
        let v4 = reg.get_builtin("vec4").unwrap();
        assert_ne!(v3, v4);
    }

    #[test]
    fn equal_numeric_keys_intern_to_the_same_id()
    {
        let mut reg = TypeRegistry::new();
        let a = reg.parse_or_get("vec3").unwrap();
        let b = reg.parse_or_get("vec3").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parameterized_image_type_caches_by_format()
    {
        let mut reg = TypeRegistry::new();
        let a = reg.parse_or_get("image2D<rgba8_unorm>").unwrap();
        let b = reg.parse_or_get("image2D<rgba8_unorm>").unwrap();
        let c = reg.parse_or_get("image2D<rgba16_float>").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(reg.resolve(a).base_type, BaseType::Image);
    }

    #[test]
    fn unknown_builtin_is_none()
    {
        let reg = TypeRegistry::new();
        assert!(reg.get_builtin("notatype").is_none());
    }

    #[test]
    fn add_struct_then_reference_as_uniform()
    {
        let mut reg = TypeRegistry::new();
        let float_ty = reg.get_builtin("float").unwrap();
        let (struct_id, _) = reg
            .add_struct("Camera".into(), vec![MemberDef {
                name: "fov".into(),
                type_id: float_ty,
                array_size: 1,
                layout: crate::struct_type::MemberLayout::Numeric(reg.resolve(float_ty).numeric().unwrap())
            }])
            .unwrap();
        let uniform_ty = reg.parse_or_get("Uniform<Camera>").unwrap();
        assert_eq!(reg.resolve(uniform_ty).base_type, BaseType::Uniform);
        assert_eq!(reg.resolve(uniform_ty).struct_ref(), Some(struct_id));
    }

    #[test]
    fn struct_name_colliding_with_builtin_rejected()
    {
        let mut reg = TypeRegistry::new();
        let err = reg.add_struct("float".into(), vec![]).unwrap_err();
        assert!(matches!(err, TypeError::CollidesWithBuiltin(_)));
    }

    #[test]
    fn duplicate_struct_rejected()
    {
        let mut reg = TypeRegistry::new();
        reg.add_struct("Foo".into(), vec![]).unwrap();
        let err = reg.add_struct("Foo".into(), vec![]).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateStruct(_)));
    }
}
